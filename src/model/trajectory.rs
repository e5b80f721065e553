//! Year-by-year bill trajectories for the four comparison scenarios.
//!
//! The baseline escalates the current bill at a fixed combined rate. Each
//! data center scenario adds an escalated per-customer impact on top of the
//! baseline, starting in the interconnection year at half weight.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{ConfigError, EngineError};
use crate::model::allocation::compute_residential_allocation;
use crate::model::constants::{
    DISPATCHABLE_SAVINGS_DAMPING, FIRM_SAVINGS_DAMPING, FIRST_YEAR_PHASE_IN,
    FLEXIBLE_SAVINGS_DAMPING, INTERCONNECTION_YEAR, MONTHS_PER_YEAR, TIME_PARAMS,
    baseline_escalation_rate,
};
use crate::model::impact::{ImpactResult, compute_net_residential_impact};
use crate::model::profile::{DataCenterProfile, UtilityProfile};
use crate::model::tariff::TariffStructure;

/// Longest accepted projection horizon (years).
pub const MAX_PROJECTION_YEARS: u32 = 50;

/// One of the four compared scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// No data center.
    Baseline,
    /// Firm (inflexible) data center load.
    Unoptimized,
    /// Data center curtails at system peak.
    Flexible,
    /// Flexible load plus onsite generation.
    Dispatchable,
}

impl Scenario {
    pub const ALL: [Self; 4] = [
        Self::Baseline,
        Self::Unoptimized,
        Self::Flexible,
        Self::Dispatchable,
    ];

    /// Scenarios that include a data center.
    pub const DATA_CENTER: [Self; 3] = [Self::Unoptimized, Self::Flexible, Self::Dispatchable];

    pub fn id(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Unoptimized => "unoptimized",
            Self::Flexible => "flexible",
            Self::Dispatchable => "dispatchable",
        }
    }

    /// Display name used in reports and charts.
    pub fn name(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline",
            Self::Unoptimized => "Firm Load",
            Self::Flexible => "Flexible Load",
            Self::Dispatchable => "Flex + Generation",
        }
    }

    /// Chart color as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Baseline => "#6B7280",
            Self::Unoptimized => "#DC2626",
            Self::Flexible => "#F59E0B",
            Self::Dispatchable => "#10B981",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scenario {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|sc| sc.id() == s).ok_or_else(|| {
            let ids: Vec<_> = Self::ALL.iter().map(|sc| sc.id()).collect();
            ConfigError::new(
                "scenario",
                format!("unknown scenario \"{s}\", available: {}", ids.join(", ")),
            )
        })
    }
}

/// Operating parameters of one data center scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioConfig {
    pub load_factor: f64,
    /// Peak coincidence billed by the tariff and used for infrastructure cost.
    pub peak_coincidence: f64,
    /// Peak coincidence seen by the residential allocation model.
    pub allocation_peak_coincidence: f64,
    pub onsite_gen_mw: f64,
    pub include_capacity_credit: bool,
    /// Fraction of general inflation applied to savings (negative impacts).
    pub savings_damping: f64,
}

impl ScenarioConfig {
    /// Firm load: full coincidence, no credits, no onsite generation.
    pub fn firm(dc: &DataCenterProfile) -> Self {
        Self {
            load_factor: dc.firm_load_factor,
            peak_coincidence: dc.firm_peak_coincidence,
            allocation_peak_coincidence: dc.firm_peak_coincidence,
            onsite_gen_mw: 0.0,
            include_capacity_credit: false,
            savings_damping: FIRM_SAVINGS_DAMPING,
        }
    }

    /// Flexible load earning demand-response capacity credit.
    pub fn flexible(dc: &DataCenterProfile) -> Self {
        Self {
            load_factor: dc.flex_load_factor,
            peak_coincidence: dc.flex_peak_coincidence,
            allocation_peak_coincidence: dc.flex_peak_coincidence,
            onsite_gen_mw: 0.0,
            include_capacity_credit: true,
            savings_damping: FLEXIBLE_SAVINGS_DAMPING,
        }
    }

    /// Flexible load with onsite generation netted against its peak.
    pub fn dispatchable(dc: &DataCenterProfile) -> Self {
        Self {
            load_factor: dc.flex_load_factor,
            peak_coincidence: dc.flex_peak_coincidence,
            allocation_peak_coincidence: dc.net_flex_peak_coincidence(),
            onsite_gen_mw: dc.onsite_generation_mw,
            include_capacity_credit: true,
            savings_damping: DISPATCHABLE_SAVINGS_DAMPING,
        }
    }

    /// Parameters for `scenario`, or `None` for the baseline.
    pub fn for_scenario(scenario: Scenario, dc: &DataCenterProfile) -> Option<Self> {
        match scenario {
            Scenario::Baseline => None,
            Scenario::Unoptimized => Some(Self::firm(dc)),
            Scenario::Flexible => Some(Self::flexible(dc)),
            Scenario::Dispatchable => Some(Self::dispatchable(dc)),
        }
    }

    /// Unescalated, unphased impact after `years_online` years of operation.
    pub fn impact_at(
        &self,
        utility: &UtilityProfile,
        dc_capacity_mw: f64,
        years_online: u32,
        tariff: Option<&TariffStructure>,
    ) -> ImpactResult {
        let allocation = compute_residential_allocation(
            utility,
            dc_capacity_mw,
            self.load_factor,
            self.allocation_peak_coincidence,
            years_online,
        );
        compute_net_residential_impact(
            dc_capacity_mw,
            self.load_factor,
            self.peak_coincidence,
            utility.residential_customers,
            allocation.allocation,
            self.include_capacity_credit,
            self.onsite_gen_mw,
            utility,
            tariff,
        )
    }

    /// Escalates a phase-weighted impact. Savings compound at a damped rate.
    fn escalate(&self, impact: f64, years_online: u32) -> f64 {
        let inflation = TIME_PARAMS.general_inflation;
        let rate = if impact > 0.0 {
            inflation
        } else {
            inflation * self.savings_damping
        };
        impact * (1.0 + rate).powf(f64::from(years_online))
    }
}

/// One projected year of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    /// Calendar year.
    pub year: u32,
    /// Years since the base year.
    pub year_index: u32,
    pub monthly_bill: f64,
    pub annual_bill: f64,
    /// Baseline bill in the same year.
    pub baseline_bill: f64,
    /// Escalated, phase-weighted data center impact added to the baseline.
    pub dc_impact: f64,
    pub dc_online: bool,
}

/// Bill series for one scenario, starting at the base year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub scenario: Scenario,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn years(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn monthly_bills(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.monthly_bill).collect()
    }

    /// Monthly bill in the last projected year.
    pub fn final_bill(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.monthly_bill)
    }

    /// Sum of annual bills over every year, undiscounted.
    pub fn cumulative_cost(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.monthly_bill * MONTHS_PER_YEAR)
            .sum()
    }
}

/// Baseline bills: the current bill escalated at the combined baseline rate.
pub fn calculate_baseline_trajectory(utility: &UtilityProfile, years: u32) -> Trajectory {
    let rate = baseline_escalation_rate();
    let points = (0..=years)
        .map(|i| {
            // (1 + r)^0 is exactly 1, so year 0 is the current bill
            let bill = utility.avg_monthly_bill * (1.0 + rate).powf(f64::from(i));
            TrajectoryPoint {
                year: TIME_PARAMS.base_year + i,
                year_index: i,
                monthly_bill: bill,
                annual_bill: bill * MONTHS_PER_YEAR,
                baseline_bill: bill,
                dc_impact: 0.0,
                dc_online: false,
            }
        })
        .collect();
    Trajectory {
        scenario: Scenario::Baseline,
        points,
    }
}

/// Projects one data center scenario on top of `baseline`.
pub fn project_scenario(
    scenario: Scenario,
    config: &ScenarioConfig,
    utility: &UtilityProfile,
    dc_capacity_mw: f64,
    baseline: &Trajectory,
    tariff: Option<&TariffStructure>,
) -> Trajectory {
    let points = baseline
        .points
        .iter()
        .map(|base| {
            let i = base.year_index;
            if i < INTERCONNECTION_YEAR {
                return TrajectoryPoint {
                    dc_online: false,
                    ..*base
                };
            }
            let years_online = i - INTERCONNECTION_YEAR;
            let phase_in = if years_online == 0 {
                FIRST_YEAR_PHASE_IN
            } else {
                1.0
            };
            let impact = config.impact_at(utility, dc_capacity_mw, years_online, tariff);
            let dc_impact = config.escalate(impact.per_customer_monthly * phase_in, years_online);
            let monthly_bill = base.baseline_bill + dc_impact;

            debug!(
                %scenario,
                year = base.year,
                years_online,
                per_customer_monthly = impact.per_customer_monthly,
                dc_impact,
                monthly_bill,
                "projected year"
            );

            TrajectoryPoint {
                year: base.year,
                year_index: i,
                monthly_bill,
                annual_bill: monthly_bill * MONTHS_PER_YEAR,
                baseline_bill: base.baseline_bill,
                dc_impact,
                dc_online: true,
            }
        })
        .collect();
    Trajectory { scenario, points }
}

/// Firm-load trajectory.
pub fn calculate_unoptimized_trajectory(
    utility: &UtilityProfile,
    datacenter: &DataCenterProfile,
    years: u32,
    tariff: Option<&TariffStructure>,
) -> Trajectory {
    let baseline = calculate_baseline_trajectory(utility, years);
    project_scenario(
        Scenario::Unoptimized,
        &ScenarioConfig::firm(datacenter),
        utility,
        datacenter.capacity_mw,
        &baseline,
        tariff,
    )
}

/// Flexible-load trajectory.
pub fn calculate_flexible_trajectory(
    utility: &UtilityProfile,
    datacenter: &DataCenterProfile,
    years: u32,
    tariff: Option<&TariffStructure>,
) -> Trajectory {
    let baseline = calculate_baseline_trajectory(utility, years);
    project_scenario(
        Scenario::Flexible,
        &ScenarioConfig::flexible(datacenter),
        utility,
        datacenter.capacity_mw,
        &baseline,
        tariff,
    )
}

/// Flexible load plus onsite generation trajectory.
pub fn calculate_dispatchable_trajectory(
    utility: &UtilityProfile,
    datacenter: &DataCenterProfile,
    years: u32,
    tariff: Option<&TariffStructure>,
) -> Trajectory {
    let baseline = calculate_baseline_trajectory(utility, years);
    project_scenario(
        Scenario::Dispatchable,
        &ScenarioConfig::dispatchable(datacenter),
        utility,
        datacenter.capacity_mw,
        &baseline,
        tariff,
    )
}

/// Monthly bills of all four scenarios in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartRow {
    pub year: u32,
    pub baseline: f64,
    pub unoptimized: f64,
    pub flexible: f64,
    pub dispatchable: f64,
}

impl ChartRow {
    /// Column header matching the `Display` layout.
    pub const HEADER: &'static str = "year    baseline     firm load    flexible     flex + gen";
}

impl fmt::Display for ChartRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}    ${:<10.2}  ${:<10.2}  ${:<10.2}  ${:.2}",
            self.year, self.baseline, self.unoptimized, self.flexible, self.dispatchable
        )
    }
}

/// The four scenario trajectories over a shared horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectories {
    pub baseline: Trajectory,
    pub unoptimized: Trajectory,
    pub flexible: Trajectory,
    pub dispatchable: Trajectory,
}

impl Trajectories {
    pub fn get(&self, scenario: Scenario) -> &Trajectory {
        match scenario {
            Scenario::Baseline => &self.baseline,
            Scenario::Unoptimized => &self.unoptimized,
            Scenario::Flexible => &self.flexible,
            Scenario::Dispatchable => &self.dispatchable,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        Scenario::ALL.into_iter().map(|s| self.get(s))
    }

    /// One row per year with every scenario's monthly bill.
    pub fn chart_rows(&self) -> Vec<ChartRow> {
        self.baseline
            .points
            .iter()
            .zip(&self.unoptimized.points)
            .zip(&self.flexible.points)
            .zip(&self.dispatchable.points)
            .map(|(((b, u), f), d)| ChartRow {
                year: b.year,
                baseline: b.monthly_bill,
                unoptimized: u.monthly_bill,
                flexible: f.monthly_bill,
                dispatchable: d.monthly_bill,
            })
            .collect()
    }
}

/// Collects every input violation for a projection run.
pub fn validate_inputs(
    utility: &UtilityProfile,
    datacenter: &DataCenterProfile,
    years: u32,
    tariff: Option<&TariffStructure>,
) -> Vec<ConfigError> {
    let mut errors = utility.validate("utility");
    errors.extend(datacenter.validate("datacenter"));
    if let Some(t) = tariff {
        errors.extend(t.validate("tariff"));
    }
    if years > MAX_PROJECTION_YEARS {
        errors.push(ConfigError::new(
            "projection.years",
            format!("must be <= {MAX_PROJECTION_YEARS}"),
        ));
    }
    errors
}

/// Validates the inputs, then projects all four scenarios.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] listing every violated input
/// constraint; no trajectory is computed in that case.
pub fn generate_all_trajectories(
    utility: &UtilityProfile,
    datacenter: &DataCenterProfile,
    years: u32,
    tariff: Option<&TariffStructure>,
) -> Result<Trajectories, EngineError> {
    let errors = validate_inputs(utility, datacenter, years, tariff);
    if !errors.is_empty() {
        return Err(EngineError::InvalidConfig(errors));
    }

    let baseline = calculate_baseline_trajectory(utility, years);
    let project = |scenario: Scenario, config: ScenarioConfig| {
        project_scenario(
            scenario,
            &config,
            utility,
            datacenter.capacity_mw,
            &baseline,
            tariff,
        )
    };
    let unoptimized = project(Scenario::Unoptimized, ScenarioConfig::firm(datacenter));
    let flexible = project(Scenario::Flexible, ScenarioConfig::flexible(datacenter));
    let dispatchable = project(
        Scenario::Dispatchable,
        ScenarioConfig::dispatchable(datacenter),
    );

    Ok(Trajectories {
        baseline,
        unoptimized,
        flexible,
        dispatchable,
    })
}
