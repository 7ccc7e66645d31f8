//! File loading for dustcalc: circuit descriptions and run configuration,
//! in RON, JSON or TOML.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, RunConfig, load_circuit, load_run_config};
pub use schema::OutputFormat;
