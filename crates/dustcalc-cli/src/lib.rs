//! The `dustcalc` command: load a circuit, run the pipeline, render a
//! report.

pub mod args;
pub mod error;
pub mod report;

use dustcalc_core::sim::simulate;
use dustcalc_data::{OutputFormat, RunConfig, load_circuit, load_run_config};

pub use args::CliArgs;
pub use error::CliError;

/// Run configuration from `--config` (or defaults) with flags applied.
pub fn resolve_config(args: &CliArgs) -> Result<RunConfig, CliError> {
    let base = match &args.config {
        Some(path) => load_run_config(path)?,
        None => RunConfig::default(),
    };
    Ok(args.apply_overrides(base))
}

/// Everything `main` does short of printing: returns the rendered report.
pub fn execute(args: &CliArgs) -> Result<String, CliError> {
    let config = resolve_config(args)?;
    let desc = load_circuit(&args.input)?;
    let sim = simulate(&desc, config.simulation())?;
    log::info!(
        "traced {} changes over {} wires ({} evaluations)",
        sim.trace.len(),
        sim.graph.wire_count(),
        sim.trace.evaluations()
    );

    let report = match config.format {
        OutputFormat::Text => report::render_text(&desc, &sim)?,
        OutputFormat::Json => {
            let mut json = report::render_json(&sim)?;
            json.push('\n');
            json
        }
    };
    Ok(report)
}
