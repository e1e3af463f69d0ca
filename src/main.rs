use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waste_priority::{
    analytics::{cities, CitySelection, DashboardView},
    config::Config,
    data::{load_bins, load_first_available, write_classified},
    ml::{PipelineOutput, PriorityPipeline},
    models::BinRecord,
};

#[derive(Parser)]
#[command(name = "waste-priority")]
#[command(about = "Waste bin collection priority classifier", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long, env = "WASTE_PRIORITY_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset to load instead of the configured candidates
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Log output format (defaults to the configured one)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print model accuracy, most urgent bins and the priority summary
    Report {
        /// City to report on (defaults to the first city alphabetically)
        #[arg(short = 'C', long)]
        city: Option<String>,

        /// Number of bins in the urgency table
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the dashboard view as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the cities in the dataset
    Cities,

    /// Write every bin with its predicted priority as CSV
    Classify {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the map centre and colour-coded markers as JSON
    Map {
        #[arg(short = 'C', long)]
        city: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(format) = cli.log_format {
        config.observability.json_logs = format == LogFormat::Json;
    }

    init_tracing(&config);
    tracing::debug!("Starting waste-priority v{}", env!("CARGO_PKG_VERSION"));

    let records = load_records(&cli, &config)?;

    match cli.command {
        Commands::Report { city, top, json } => {
            let output = run_pipeline(&config, &records)?;
            let selection = CitySelection::resolve(&output.bins, city.as_deref())?;
            let view = DashboardView::build(&output, &selection, top.unwrap_or(config.report.top_n));

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_report(&view);
            }
        }

        Commands::Cities => {
            for city in cities(&records) {
                println!("{}", city);
            }
        }

        Commands::Classify { output: path } => {
            let output = run_pipeline(&config, &records)?;
            match path {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_classified(file, &output.bins)?;
                    tracing::info!("Wrote {} classified bins to {}", output.bins.len(), path.display());
                }
                None => write_classified(std::io::stdout().lock(), &output.bins)?,
            }
        }

        Commands::Map { city } => {
            let output = run_pipeline(&config, &records)?;
            let selection = CitySelection::resolve(&output.bins, city.as_deref())?;
            let view = DashboardView::build(&output, &selection, 0);

            let map = serde_json::json!({
                "selection": view.selection,
                "cities": cities(&records),
                "centre": view.centre,
                "markers": view.markers,
            });
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("waste_priority={}", config.observability.log_level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_records(cli: &Cli, config: &Config) -> anyhow::Result<Vec<BinRecord>> {
    match &cli.data {
        Some(path) => {
            load_bins(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => {
            let (path, records) = load_first_available(&config.data.candidates)?;
            tracing::info!("Using dataset {}", path.display());
            Ok(records)
        }
    }
}

fn run_pipeline(config: &Config, records: &[BinRecord]) -> anyhow::Result<PipelineOutput> {
    let output = PriorityPipeline::new(config.model.clone()).run(records)?;
    if !output.convergence.converged {
        eprintln!(
            "warning: classifier did not converge within {} iterations (gradient norm {:.4})",
            output.convergence.max_iterations, output.convergence.gradient_norm
        );
    }
    Ok(output)
}

fn print_report(view: &DashboardView) {
    println!(
        "Model accuracy (predicting priority categories): {}",
        view.accuracy_display()
    );
    println!();

    println!("Bin Locations and Priority - {}", view.selection);
    if let Some(centre) = &view.centre {
        println!(
            "  centre: {:.5}, {:.5}  ({} markers)",
            centre.latitude,
            centre.longitude,
            view.markers.len()
        );
    }
    println!();

    println!("Top Bins Needing Collection");
    println!("{:<12} {:<16} {:>12}  {}", "Bin ID", "Area", "Days to Full", "Priority");
    for row in &view.top_bins {
        println!(
            "{:<12} {:<16} {:>12}  {}",
            row.bin_id, row.area, row.days_to_full, row.priority
        );
    }
    println!();

    println!("Priority Summary");
    println!("{:<10} {:>6}", "Priority", "Count");
    for row in &view.summary {
        println!("{:<10} {:>6}", row.priority, row.count);
    }
}
