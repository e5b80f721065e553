//! Runs the CLI against the bundled scenario files and presets.

mod common;

#[test]
fn large_load_tariff_turns_firm_load_into_a_benefit() {
    let with_tariff = common::run_cli(&["--scenario", "scenarios/default.toml"]);
    let without = common::run_cli(&["--scenario", "scenarios/no_tariff.toml"]);

    let baseline = common::parse_dollars(&with_tariff, "Final baseline bill:");
    let firm_tariff = common::parse_dollars(&with_tariff, "Final firm load bill:");
    let firm_generic = common::parse_dollars(&without, "Final firm load bill:");

    assert_eq!(
        baseline,
        common::parse_dollars(&without, "Final baseline bill:"),
        "baseline must not depend on the tariff"
    );
    assert!(
        firm_tariff < baseline,
        "expected tariff firm bill below baseline: firm={firm_tariff:.2}, baseline={baseline:.2}"
    );
    assert!(
        firm_generic > baseline,
        "expected generic firm bill above baseline: firm={firm_generic:.2}, baseline={baseline:.2}"
    );
}

#[test]
fn default_scenario_file_matches_default_preset() {
    let from_file = common::run_cli(&["--scenario", "scenarios/default.toml"]);
    let from_preset = common::run_cli(&[]);
    assert_eq!(from_file, from_preset);
}

#[test]
fn bundled_scenarios_all_run() {
    for path in [
        "scenarios/default.toml",
        "scenarios/no_tariff.toml",
        "scenarios/pjm_capacity.toml",
        "scenarios/ercot_4cp.toml",
    ] {
        let stdout = common::run_cli(&["--scenario", path]);
        assert!(stdout.contains("--- Bill Impact Summary ---"), "{path}");
        let flexible = common::parse_dollars(&stdout, "Final flexible bill:");
        let dispatchable = common::parse_dollars(&stdout, "Final dispatchable bill:");
        assert!(
            flexible >= dispatchable,
            "{path}: {flexible} < {dispatchable}"
        );
    }
}

#[test]
fn years_flag_sets_table_length() {
    let stdout = common::run_cli(&["--preset", "pso-oklahoma", "--years", "5"]);
    let rows = stdout.lines().filter(|l| l.starts_with("20")).count();
    assert_eq!(rows, 6);
}

#[test]
fn list_presets_names_every_utility() {
    let stdout = common::run_cli(&["--list-presets"]);
    assert!(stdout.lines().next().unwrap_or("").starts_with("default"));
    assert!(stdout.contains("ercot-texas"));
    assert!(stdout.contains("dominion-virginia"));
    let ercot = stdout
        .lines()
        .find(|l| l.starts_with("ercot-texas"))
        .unwrap_or_default();
    assert!(ercot.ends_with("Four coincident peak (ERCOT)"), "{ercot}");
}

#[test]
fn invalid_years_exit_with_error() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_ratepayer-impact"))
        .args(["--years", "51"])
        .output()
        .expect("ratepayer-impact process should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("projection.years"), "stderr={stderr}");
    let reported = stderr
        .lines()
        .filter(|l| l.starts_with("config error:"))
        .count();
    assert_eq!(reported, 1, "stderr={stderr}");
}

#[test]
fn zero_years_prints_base_year_only() {
    let stdout = common::run_cli(&["--years", "0"]);
    let rows: Vec<_> = stdout.lines().filter(|l| l.starts_with("20")).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("2025    $130.00"), "{}", rows[0]);
}
