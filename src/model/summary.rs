//! Summary statistics over the four scenario trajectories.

use std::fmt;

use serde::Serialize;

use super::profile::UtilityProfile;
use super::trajectory::{Scenario, Trajectories};

/// One value per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioValues<T> {
    pub baseline: T,
    pub unoptimized: T,
    pub flexible: T,
    pub dispatchable: T,
}

impl<T> ScenarioValues<T> {
    fn from_fn(mut f: impl FnMut(Scenario) -> T) -> Self {
        Self {
            baseline: f(Scenario::Baseline),
            unoptimized: f(Scenario::Unoptimized),
            flexible: f(Scenario::Flexible),
            dispatchable: f(Scenario::Dispatchable),
        }
    }
}

/// One value per data center scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataCenterValues<T> {
    pub unoptimized: T,
    pub flexible: T,
    pub dispatchable: T,
}

impl<T> DataCenterValues<T> {
    fn from_fn(mut f: impl FnMut(Scenario) -> T) -> Self {
        Self {
            unoptimized: f(Scenario::Unoptimized),
            flexible: f(Scenario::Flexible),
            dispatchable: f(Scenario::Dispatchable),
        }
    }

    fn map<U>(self, mut f: impl FnMut(T) -> U) -> DataCenterValues<U> {
        DataCenterValues {
            unoptimized: f(self.unoptimized),
            flexible: f(self.flexible),
            dispatchable: f(self.dispatchable),
        }
    }
}

/// Final-year savings of the flexible scenarios relative to firm load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlexibilitySavings {
    pub flexible: f64,
    pub dispatchable: f64,
}

/// Aggregate comparison of the four scenarios.
///
/// Computed from a complete [`Trajectories`] set; every field is derived,
/// nothing is cached between runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Current average monthly bill ($).
    pub current_monthly_bill: f64,
    /// Monthly bill in the last projected year ($).
    pub final_year_bills: ScenarioValues<f64>,
    /// Final-year bill minus the baseline final-year bill ($/month).
    pub final_year_difference: DataCenterValues<f64>,
    /// Whether the scenario ends below the baseline.
    pub benefits_ratepayers: DataCenterValues<bool>,
    /// Negated `final_year_difference` ($/month).
    pub savings_vs_baseline: DataCenterValues<f64>,
    /// Firm final bill minus the flexible scenario's final bill ($/month).
    pub savings_vs_unoptimized: FlexibilitySavings,
    /// Sum of annual bills over the horizon, per household ($).
    pub cumulative_costs: ScenarioValues<f64>,
    /// Cumulative baseline minus scenario cost, across all residential customers ($).
    pub cumulative_community_savings: DataCenterValues<f64>,
    /// Final-year bill relative to the current bill (fraction).
    pub percent_change: ScenarioValues<f64>,
}

/// Computes summary statistics from all four trajectories.
///
/// # Arguments
///
/// * `trajectories` - Output of `generate_all_trajectories`
/// * `utility` - The utility the trajectories were projected for
pub fn calculate_summary_stats(
    trajectories: &Trajectories,
    utility: &UtilityProfile,
) -> SummaryStats {
    let current = utility.avg_monthly_bill;
    let final_year_bills = ScenarioValues::from_fn(|s| trajectories.get(s).final_bill());
    let cumulative_costs = ScenarioValues::from_fn(|s| trajectories.get(s).cumulative_cost());

    let baseline_final = final_year_bills.baseline;
    let final_year_difference =
        DataCenterValues::from_fn(|s| trajectories.get(s).final_bill() - baseline_final);
    let households = utility.residential_customers as f64;

    SummaryStats {
        current_monthly_bill: current,
        final_year_bills,
        final_year_difference,
        benefits_ratepayers: final_year_difference.map(|d| d < 0.0),
        savings_vs_baseline: final_year_difference.map(|d| -d),
        savings_vs_unoptimized: FlexibilitySavings {
            flexible: final_year_bills.unoptimized - final_year_bills.flexible,
            dispatchable: final_year_bills.unoptimized - final_year_bills.dispatchable,
        },
        cumulative_costs,
        cumulative_community_savings: DataCenterValues::from_fn(|s| {
            (cumulative_costs.baseline - trajectories.get(s).cumulative_cost()) * households
        }),
        percent_change: ScenarioValues::from_fn(|s| {
            (trajectories.get(s).final_bill() - current) / current
        }),
    }
}

fn signed(v: f64) -> String {
    if v < 0.0 {
        format!("-${:.2}", -v)
    } else {
        format!("+${v:.2}")
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bills = &self.final_year_bills;
        let diff = &self.final_year_difference;
        writeln!(f, "--- Bill Impact Summary ---")?;
        writeln!(
            f,
            "Current monthly bill:       ${:.2}",
            self.current_monthly_bill
        )?;
        writeln!(
            f,
            "Final baseline bill:        ${:.2} ({:+.1}%)",
            bills.baseline,
            self.percent_change.baseline * 100.0
        )?;
        writeln!(
            f,
            "Final firm load bill:       ${:.2} ({} vs baseline)",
            bills.unoptimized,
            signed(diff.unoptimized)
        )?;
        writeln!(
            f,
            "Final flexible bill:        ${:.2} ({} vs baseline)",
            bills.flexible,
            signed(diff.flexible)
        )?;
        writeln!(
            f,
            "Final dispatchable bill:    ${:.2} ({} vs baseline)",
            bills.dispatchable,
            signed(diff.dispatchable)
        )?;
        writeln!(
            f,
            "Flexible savings vs firm:   ${:.2}/mo",
            self.savings_vs_unoptimized.flexible
        )?;
        writeln!(
            f,
            "Dispatchable savings vs firm: ${:.2}/mo",
            self.savings_vs_unoptimized.dispatchable
        )?;
        writeln!(
            f,
            "Cumulative household cost:  ${:.2} base, ${:.2} firm, ${:.2} flex, ${:.2} dispatch",
            self.cumulative_costs.baseline,
            self.cumulative_costs.unoptimized,
            self.cumulative_costs.flexible,
            self.cumulative_costs.dispatchable
        )?;
        write!(
            f,
            "Community savings (dispatchable): ${:.0}",
            self.cumulative_community_savings.dispatchable
        )
    }
}
