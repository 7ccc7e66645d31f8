use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use dustcalc_cli::{CliArgs, CliError, execute};

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match args.log_level() {
        Some(level) => env_logger::builder().filter_level(level).init(),
        None => env_logger::init(),
    }
    log::debug!("arguments: {args:?}");

    match execute(&args).and_then(|report| write_report(&report)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}

fn write_report(report: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
