pub mod bin;

pub use bin::*;
