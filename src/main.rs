//! Bill impact projector entry point: CLI wiring and report output.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ratepayer_impact::config::ProjectionConfig;
use ratepayer_impact::io::export::export_csv;
use ratepayer_impact::model::summary::calculate_summary_stats;
use ratepayer_impact::model::tariff::TariffStructure;
use ratepayer_impact::model::trajectory::ChartRow;
use ratepayer_impact::utilities::get_utility_by_id;

/// Residential bill impact projections for data center load scenarios.
#[derive(Debug, Parser)]
#[command(name = "ratepayer-impact", version)]
struct Cli {
    /// Load the projection from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (see --list-presets)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Override the projection horizon in years
    #[arg(long, value_name = "N")]
    years: Option<u32>,

    /// Override the large-load tariff with a tariff preset, or `none` for the
    /// generic rate structure
    #[arg(long, value_name = "PRESET")]
    tariff: Option<String>,

    /// Export the yearly bills of every scenario to CSV
    #[arg(long, value_name = "PATH")]
    csv_out: Option<PathBuf>,

    /// Print the available presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Start the REST API server after the projection
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_presets() {
    for name in ProjectionConfig::preset_names() {
        let label =
            get_utility_by_id(name).map_or_else(|| "Default utility".to_string(), |u| u.label());
        let tariff = ProjectionConfig::from_preset(name)
            .ok()
            .and_then(|c| c.tariff)
            .map_or("generic rate structure", |t| t.demand_charge_type.description());
        println!("{name:<24} {label:<32} {tariff}");
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn load_config(cli: &Cli) -> ProjectionConfig {
    // --scenario and --preset conflict; neither means the default preset
    let loaded = if let Some(ref path) = cli.scenario {
        ProjectionConfig::from_toml_file(path)
    } else {
        ProjectionConfig::from_preset(cli.preset.as_deref().unwrap_or("default"))
    };
    let mut config = loaded.unwrap_or_else(|e| fail(e));

    if let Some(years) = cli.years {
        config.projection.years = years;
    }
    match cli.tariff.as_deref() {
        None => {}
        Some("none") => config.tariff = None,
        Some(name) => {
            config.tariff = Some(TariffStructure::preset(name).unwrap_or_else(|e| fail(e)));
        }
    }
    config
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if cli.list_presets {
        print_presets();
        return;
    }

    let config = load_config(&cli);

    let trajectories = match config.project() {
        Ok(t) => t,
        Err(e) => {
            for problem in e.problems() {
                eprintln!("{problem}");
            }
            process::exit(1);
        }
    };
    let summary = calculate_summary_stats(&trajectories, &config.utility);
    info!(
        years = config.projection.years,
        market = %config.utility.market_type,
        demand_charge = config
            .tariff
            .as_ref()
            .map_or("none", |t| t.demand_charge_type.as_str()),
        "projection complete"
    );

    // Print per-year bills
    println!("{}", ChartRow::HEADER);
    for row in trajectories.chart_rows() {
        println!("{row}");
    }

    // Print summary report
    println!("\n{summary}");

    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_csv(&trajectories, path) {
            fail(format!("error: failed to write CSV: {e}"));
        }
        info!(path = %path.display(), "trajectories written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ratepayer_impact::api::AppState {
            config,
            trajectories,
            summary,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("error: failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(ratepayer_impact::api::serve(state, addr)) {
            fail(format!("error: API server failed: {e}"));
        }
    }
}
