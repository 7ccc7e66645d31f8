//! Loading pipeline: reads circuit and run-configuration files.
//!
//! Format is picked by extension (RON/JSON/TOML). Circuit files are
//! converted into a [`CircuitDescription`]; run-configuration files are
//! checked and resolved into a [`RunConfig`].

use std::path::{Path, PathBuf};

use dustcalc_core::description::CircuitDescription;
use dustcalc_core::order::NotifyOrder;
use dustcalc_core::sim::SimulationConfig;
use dustcalc_core::trace::TraceConfig;
use serde::de::DeserializeOwned;

use crate::schema::{CircuitFile, OutputFormat, RunConfigData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading input files.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A run configuration parsed but its values contradict each other.
    #[error("invalid run configuration in {file}: {detail}")]
    InvalidConfig { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` as `format`. `file` is only used in error messages.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Circuits
// ===========================================================================

/// Load a circuit description. Mask length and power ranges are checked
/// later, when the graph is built.
pub fn load_circuit(path: &Path) -> Result<CircuitDescription, DataLoadError> {
    let file: CircuitFile = deserialize_file(path)?;
    let desc = CircuitDescription::from(file);
    log::info!(
        target: "dustcalc::data",
        "loaded {}: {} wires, {} transparent, {} blocking",
        path.display(),
        desc.wires.len(),
        desc.transparent.len(),
        desc.blocking.len()
    );
    Ok(desc)
}

// ===========================================================================
// Run configuration
// ===========================================================================

/// Resolved run settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub notify_order: NotifyOrder,
    pub trace: TraceConfig,
    pub format: OutputFormat,
}

impl RunConfig {
    /// Check raw values and fill in defaults.
    pub fn resolve(data: RunConfigData, file: &Path) -> Result<Self, DataLoadError> {
        let invalid = |detail: &str| DataLoadError::InvalidConfig {
            file: file.to_path_buf(),
            detail: detail.to_string(),
        };

        let trace = match (data.unbounded.unwrap_or(false), data.max_evaluations) {
            (true, Some(_)) => {
                return Err(invalid("`unbounded` and `max_evaluations` are mutually exclusive"));
            }
            (_, Some(0)) => return Err(invalid("`max_evaluations` must be at least 1")),
            (true, None) => TraceConfig::unbounded(),
            (false, Some(n)) => TraceConfig::with_max_evaluations(n),
            (false, None) => TraceConfig::default(),
        };

        Ok(Self {
            notify_order: data.notify_order.unwrap_or_default(),
            trace,
            format: data.format.unwrap_or_default(),
        })
    }

    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            notify_order: self.notify_order,
            trace: self.trace,
        }
    }
}

/// Load and resolve a run configuration file.
pub fn load_run_config(path: &Path) -> Result<RunConfig, DataLoadError> {
    let data: RunConfigData = deserialize_file(path)?;
    let config = RunConfig::resolve(data, path)?;
    log::debug!(target: "dustcalc::data", "run config from {}: {:?}", path.display(), config);
    Ok(config)
}

// ===========================================================================
// Tests
// ===========================================================================
