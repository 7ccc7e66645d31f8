//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use dustcalc_core::order::NotifyOrder;
use dustcalc_core::trace::TraceConfig;
use dustcalc_data::{OutputFormat, RunConfig};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "dustcalc")]
#[command(version)]
#[command(about = "Trace power propagation through a redstone-wire circuit", long_about = None)]
pub struct CliArgs {
    /// Circuit file (.json, .ron or .toml)
    pub input: PathBuf,

    /// Run configuration file; flags given here override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drop repeated wires from each notify list
    #[arg(long)]
    pub dedup: bool,

    /// Stop with an error after this many wire evaluations
    #[arg(long, conflicts_with = "unbounded", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_evaluations: Option<u64>,

    /// Never stop early; runs until the walk settles
    #[arg(long)]
    pub unbounded: bool,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    ///
    /// When given, the log level is set from the count and `RUST_LOG` is
    /// ignored. Otherwise `RUST_LOG` is used.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl CliArgs {
    /// Layer the flags over a run configuration.
    pub fn apply_overrides(&self, mut config: RunConfig) -> RunConfig {
        if self.dedup {
            config.notify_order = NotifyOrder::Deduplicated;
        }
        if self.unbounded {
            config.trace = TraceConfig::unbounded();
        }
        if let Some(max) = self.max_evaluations {
            config.trace = TraceConfig::with_max_evaluations(max);
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }
        config
    }

    /// Explicit log level from `-v`, or `None` to defer to `RUST_LOG`.
    pub fn log_level(&self) -> Option<LevelFilter> {
        match self.verbose {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        }
    }
}
