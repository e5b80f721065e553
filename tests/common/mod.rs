//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::process::Command;

use ratepayer_impact::model::profile::{DEFAULT_DATA_CENTER, DEFAULT_UTILITY};
use ratepayer_impact::model::summary::{SummaryStats, calculate_summary_stats};
use ratepayer_impact::model::tariff::GENERIC_TARIFF;
use ratepayer_impact::model::trajectory::{Trajectories, generate_all_trajectories};

/// Default utility and data center on the generic tariff.
pub fn default_trajectories(years: u32) -> Trajectories {
    generate_all_trajectories(
        &DEFAULT_UTILITY,
        &DEFAULT_DATA_CENTER,
        years,
        Some(&GENERIC_TARIFF),
    )
    .expect("default inputs should be valid")
}

/// Default trajectories and their summary statistics.
pub fn default_summary(years: u32) -> (Trajectories, SummaryStats) {
    let t = default_trajectories(years);
    let s = calculate_summary_stats(&t, &DEFAULT_UTILITY);
    (t, s)
}

/// Runs the CLI binary with `args` and returns its stdout.
///
/// Panics if the process fails.
pub fn run_cli(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_ratepayer-impact"))
        .args(args)
        .output()
        .expect("ratepayer-impact process should run");

    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

/// Parses the first dollar amount on the report line starting with `label`.
pub fn parse_dollars(stdout: &str, label: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing report line `{label}` in output: {stdout}"));

    let raw = line
        .split_once('$')
        .map(|(_, right)| right)
        .unwrap_or_else(|| panic!("no dollar amount in line `{line}`"));
    let number: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    number
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("invalid amount `{number}` in line `{line}`"))
}
