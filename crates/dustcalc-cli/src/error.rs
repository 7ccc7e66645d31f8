use dustcalc_core::sim::SimulationError;
use dustcalc_data::DataLoadError;

/// Errors that end a `dustcalc` run with exit code 2.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The circuit or run configuration could not be loaded.
    #[error(transparent)]
    Load(#[from] DataLoadError),

    /// The graph could not be built or the trace did not converge.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// The JSON report could not be produced.
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    /// The text report could not be formatted.
    #[error("failed to format report")]
    Format(#[from] std::fmt::Error),

    /// The report could not be written out.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
