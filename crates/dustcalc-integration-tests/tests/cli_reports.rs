//! Integration test: the `dustcalc` command from parsed arguments to the
//! rendered report.

use std::path::PathBuf;

use clap::Parser;
use dustcalc_cli::{CliArgs, CliError, execute};
use dustcalc_core::sim::SimulationError;
use dustcalc_core::trace::TraceError;
use dustcalc_data::DataLoadError;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

fn args(list: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("dustcalc").chain(list.iter().copied()))
        .expect("arguments should parse")
}

#[test]
fn text_report_has_all_sections_in_order() {
    let report = execute(&args(&[fixture("staircase.json").as_str()])).unwrap();

    let headers: Vec<&str> = report.lines().filter(|l| l.starts_with("===")).collect();
    assert_eq!(
        headers,
        vec![
            "=== Loaded Instance ===",
            "=== Connectivity Graph ===",
            "=== Update Order Graph ===",
            "=== Trace IDs ===",
            "=== Trace Log ===",
        ]
    );
    assert!(report.contains("[ID=2] @ (2, 1, 0)"));
    assert!(report.contains("2,1,0        -> 3,2,0 | 1,0,0"));
    assert!(report.contains("@ power=12    [14, 13, 12]"));
}

#[test]
fn config_file_selects_dedup_and_json() {
    let report = execute(&args(&[
        fixture("staircase.json").as_str(),
        "--config",
        fixture("dedup_json.toml").as_str(),
    ]))
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    for node in nodes {
        let downstream: Vec<u64> = node["downstream"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_u64())
            .collect();
        let mut unique = downstream.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), downstream.len());
    }
    assert_eq!(value["trace"].as_array().unwrap().len(), 3);
}

#[test]
fn flag_overrides_config_format() {
    let report = execute(&args(&[
        fixture("staircase.json").as_str(),
        "--config",
        fixture("dedup_json.toml").as_str(),
        "--format",
        "text",
    ]))
    .unwrap();
    assert!(report.starts_with("=== Loaded Instance ==="));
}

#[test]
fn tiny_budget_reports_non_convergence() {
    let err = execute(&args(&[
        fixture("staircase.json").as_str(),
        "--config",
        fixture("tiny_budget.toml").as_str(),
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        CliError::Simulation(SimulationError::Trace(TraceError::DidNotConverge {
            evaluations: 2
        }))
    ));

    // --unbounded on the command line lifts the file's budget.
    let ok = execute(&args(&[
        fixture("staircase.json").as_str(),
        "--config",
        fixture("tiny_budget.toml").as_str(),
        "--unbounded",
    ]));
    assert!(ok.is_ok());
}

#[test]
fn missing_input_is_a_load_error() {
    let err = execute(&args(&[fixture("nope.json").as_str()])).unwrap_err();
    assert!(matches!(err, CliError::Load(DataLoadError::Io(_))));
}

#[test]
fn bad_mask_is_a_simulation_error() {
    let err = execute(&args(&[fixture("bad_mask.json").as_str()])).unwrap_err();
    assert!(matches!(err, CliError::Simulation(SimulationError::Circuit(_))));
    assert!(err.to_string().contains("exactly 6 entries"));
}
