//! Utility tariff structures and the tariff-aware demand charge calculator.
//!
//! Large-load tariffs differ mainly in how they measure billed demand:
//!
//! - [`DemandChargeType::TouPeakNcp`]: PSO/Dominion style, separate on-peak (TOU)
//!   and any-time max (NCP) charges.
//! - [`DemandChargeType::CoincidentPeak`]: Duke style, both charges follow the
//!   contribution to system coincident peak.
//! - [`DemandChargeType::Cp1_5`]: AEP Ohio/PJM style, 1CP transmission + 5CP capacity.
//! - [`DemandChargeType::Cp4`]: ERCOT style, four coincident peaks set transmission cost.
//! - [`DemandChargeType::RollingRatchet`]: Georgia Power style, 12-month rolling maximum.
//! - [`DemandChargeType::SimpleCpNcp`]: plain CP/NCP split on installed capacity.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::model::constants::{
    CP_1_5_FLEX_AVOIDANCE, CP_1_5_MAX_DEMAND_SHARE, CP_4_FLEX_AVOIDANCE, CP_4_MAX_DEMAND_SHARE,
    CP_MAX_DEMAND_SHARE, HOURS_PER_YEAR, MONTHS_PER_YEAR, ROLLING_RATCHET_FLEX_WEIGHT,
    TOU_FIRM_RATCHET_MULTIPLIER,
};

/// Structural variant of a tariff's demand charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandChargeType {
    #[serde(rename = "TOU_PEAK_NCP")]
    TouPeakNcp,
    #[serde(rename = "COINCIDENT_PEAK")]
    CoincidentPeak,
    #[serde(rename = "CP_1_5")]
    Cp1_5,
    #[serde(rename = "CP_4")]
    Cp4,
    #[serde(rename = "ROLLING_RATCHET")]
    RollingRatchet,
    #[serde(rename = "SIMPLE_CP_NCP")]
    SimpleCpNcp,
}

impl DemandChargeType {
    pub const ALL: [Self; 6] = [
        Self::TouPeakNcp,
        Self::CoincidentPeak,
        Self::Cp1_5,
        Self::Cp4,
        Self::RollingRatchet,
        Self::SimpleCpNcp,
    ];

    /// Wire name used in TOML and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TouPeakNcp => "TOU_PEAK_NCP",
            Self::CoincidentPeak => "COINCIDENT_PEAK",
            Self::Cp1_5 => "CP_1_5",
            Self::Cp4 => "CP_4",
            Self::RollingRatchet => "ROLLING_RATCHET",
            Self::SimpleCpNcp => "SIMPLE_CP_NCP",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::TouPeakNcp => "Time-of-use peak demand + Non-coincident peak",
            Self::CoincidentPeak => "Based on contribution to system peak",
            Self::Cp1_5 => "1CP transmission + 5CP capacity (PJM)",
            Self::Cp4 => "Four coincident peak (ERCOT)",
            Self::RollingRatchet => "NCP with rolling ratchet",
            Self::SimpleCpNcp => "Coincident peak on contribution, NCP on installed capacity",
        }
    }
}

impl fmt::Display for DemandChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demand and energy charges of a large-load tariff.
///
/// Demand charges are in $/MW-month and the energy charge in $/MWh, so a
/// published $7.05/kW is stored as `7050.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffStructure {
    pub demand_charge_type: DemandChargeType,
    /// Peak (TOU or coincident) demand charge ($/MW-month).
    pub peak_demand_charge: f64,
    /// Max (non-coincident) demand charge ($/MW-month).
    pub max_demand_charge: f64,
    /// Energy charge ($/MWh).
    pub energy_charge: f64,
    /// Ratchet floor as a share of capacity (0.0–1.0).
    #[serde(default)]
    pub ratchet_percent: Option<f64>,
    /// Ratchet look-back window (months).
    #[serde(default)]
    pub ratchet_months: u32,
    #[serde(default)]
    pub on_peak_definition: Cow<'static, str>,
    /// Scales the demand-charge savings credited to ratepayers for flexible loads.
    #[serde(default = "default_flex_multiplier")]
    pub flexibility_benefit_multiplier: f64,
    #[serde(default)]
    pub tariff_source: Cow<'static, str>,
}

fn default_flex_multiplier() -> f64 {
    1.0
}

/// PSO Large Power & Light, Schedule 242/244/246 (transmission level).
pub const PSO_TARIFF: TariffStructure = TariffStructure {
    demand_charge_type: DemandChargeType::TouPeakNcp,
    peak_demand_charge: 7050.0,
    max_demand_charge: 2470.0,
    energy_charge: 1.708,
    ratchet_percent: Some(0.90),
    ratchet_months: 11,
    on_peak_definition: Cow::Borrowed("2pm-9pm Mon-Fri, June 1 - September 30"),
    flexibility_benefit_multiplier: 1.4,
    tariff_source: Cow::Borrowed("PSO LPL Schedule 242/244/246, effective 1/30/2025"),
};

/// Dominion Virginia GS-4 (Large General Service).
pub const DOMINION_TARIFF: TariffStructure = TariffStructure {
    demand_charge_type: DemandChargeType::TouPeakNcp,
    peak_demand_charge: 8769.0,
    max_demand_charge: 515.0,
    energy_charge: 27.0,
    ratchet_percent: Some(0.90),
    ratchet_months: 11,
    on_peak_definition: Cow::Borrowed("Seasonal TOU periods defined by Dominion"),
    flexibility_benefit_multiplier: 1.6,
    tariff_source: Cow::Borrowed("Dominion Virginia GS-4 Schedule, effective 1/1/2025"),
};

/// Duke Energy Carolinas LGS (Large General Service).
pub const DUKE_TARIFF: TariffStructure = TariffStructure {
    demand_charge_type: DemandChargeType::CoincidentPeak,
    peak_demand_charge: 5200.0,
    max_demand_charge: 3500.0,
    energy_charge: 35.0,
    ratchet_percent: Some(0.70),
    ratchet_months: 12,
    on_peak_definition: Cow::Borrowed("System coincident peak hours"),
    flexibility_benefit_multiplier: 1.2,
    tariff_source: Cow::Borrowed("Duke Energy Carolinas LGS Schedule"),
};

/// Georgia Power PLL-18 (Power and Light Large).
pub const GEORGIA_POWER_TARIFF: TariffStructure = TariffStructure {
    demand_charge_type: DemandChargeType::RollingRatchet,
    peak_demand_charge: 13270.0,
    max_demand_charge: 0.0,
    energy_charge: 14.27,
    ratchet_percent: Some(0.95),
    ratchet_months: 12,
    on_peak_definition: Cow::Borrowed("Summer months weighted at 95%, Winter at 60%"),
    flexibility_benefit_multiplier: 1.3,
    tariff_source: Cow::Borrowed("Georgia Power PLL-18 Schedule, 2025"),
};

/// AEP Ohio GS-4 with PJM capacity overlay.
pub const AEP_OHIO_TARIFF: TariffStructure = TariffStructure {
    demand_charge_type: DemandChargeType::Cp1_5,
    peak_demand_charge: 6500.0,
    max_demand_charge: 2000.0,
    energy_charge: 45.0,
    ratchet_percent: Some(0.85),
    ratchet_months: 12,
    on_peak_definition: Cow::Borrowed("1CP for transmission, 5CP for PJM capacity"),
    flexibility_benefit_multiplier: 1.5,
    tariff_source: Cow::Borrowed("AEP Ohio GS-4 + PJM capacity charges"),
};

/// ERCOT 4CP transmission allocation.
pub const ERCOT_TARIFF: TariffStructure = TariffStructure {
    demand_charge_type: DemandChargeType::Cp4,
    peak_demand_charge: 5500.0,
    max_demand_charge: 1500.0,
    energy_charge: 50.0,
    ratchet_percent: None,
    ratchet_months: 0,
    on_peak_definition: Cow::Borrowed("4 highest system peak hours per year (one per season)"),
    flexibility_benefit_multiplier: 1.8,
    tariff_source: Cow::Borrowed("ERCOT 4CP transmission allocation methodology"),
};

/// Generic regulated utility assumptions.
pub const GENERIC_TARIFF: TariffStructure = TariffStructure {
    demand_charge_type: DemandChargeType::CoincidentPeak,
    peak_demand_charge: 5430.0,
    max_demand_charge: 3620.0,
    energy_charge: 30.0,
    ratchet_percent: Some(0.80),
    ratchet_months: 12,
    on_peak_definition: Cow::Borrowed("Utility-defined peak periods"),
    flexibility_benefit_multiplier: 1.0,
    tariff_source: Cow::Borrowed("Generic regulated utility assumptions"),
};

impl Default for TariffStructure {
    fn default() -> Self {
        GENERIC_TARIFF
    }
}

impl TariffStructure {
    /// Available preset names.
    pub const PRESETS: &[&str] = &[
        "pso",
        "dominion",
        "duke",
        "georgia_power",
        "aep_ohio",
        "ercot",
        "generic",
    ];

    /// Looks up a tariff preset by name.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "pso" => Ok(PSO_TARIFF),
            "dominion" => Ok(DOMINION_TARIFF),
            "duke" => Ok(DUKE_TARIFF),
            "georgia_power" => Ok(GEORGIA_POWER_TARIFF),
            "aep_ohio" => Ok(AEP_OHIO_TARIFF),
            "ercot" => Ok(ERCOT_TARIFF),
            "generic" => Ok(GENERIC_TARIFF),
            _ => Err(ConfigError::new(
                "tariff.preset",
                format!(
                    "unknown tariff preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Ratchet percentage when set to a nonzero value.
    fn active_ratchet(&self) -> Option<f64> {
        self.ratchet_percent.filter(|r| *r != 0.0)
    }

    /// Validates all fields, collecting every violation under `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let field = |name: &str| format!("{prefix}.{name}");
        for (name, value) in [
            ("peak_demand_charge", self.peak_demand_charge),
            ("max_demand_charge", self.max_demand_charge),
            ("energy_charge", self.energy_charge),
            (
                "flexibility_benefit_multiplier",
                self.flexibility_benefit_multiplier,
            ),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field(name), "must be finite and >= 0"));
            }
        }
        if let Some(r) = self.ratchet_percent
            && !(0.0..=1.0).contains(&r)
        {
            errors.push(ConfigError::new(field("ratchet_percent"), "must be in [0.0, 1.0]"));
        }
        errors
    }
}

/// Annual data center billing under a specific tariff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandChargeResult {
    /// Annual peak demand revenue ($).
    pub peak_demand_revenue: f64,
    /// Annual max demand revenue ($).
    pub max_demand_revenue: f64,
    pub total_demand_revenue: f64,
    /// Annual energy revenue ($).
    pub energy_revenue: f64,
    pub total_revenue: f64,
    /// Demand-charge savings vs. firm operation ($/year, 0 when firm).
    pub flexibility_benefit: f64,
    /// Billed peak demand (MW).
    pub peak_demand_mw: f64,
    /// Billed max demand (MW).
    pub max_demand_mw: f64,
    /// Annual consumption (MWh).
    pub annual_mwh: f64,
    pub tariff_type: DemandChargeType,
}

/// Computes the data center's demand and energy charges under `tariff`.
///
/// A load is treated as flexible when `peak_coincidence < 1.0`.
pub fn compute_tariff_demand_charges(
    dc_capacity_mw: f64,
    load_factor: f64,
    peak_coincidence: f64,
    tariff: &TariffStructure,
) -> DemandChargeResult {
    let is_flexible = peak_coincidence < 1.0;
    let annual_mwh = dc_capacity_mw * load_factor * HOURS_PER_YEAR;
    let coincident_mw = dc_capacity_mw * peak_coincidence;

    let (peak_demand_mw, max_demand_mw) = match tariff.demand_charge_type {
        DemandChargeType::TouPeakNcp => {
            let mut peak = coincident_mw;
            if tariff.active_ratchet().is_some() && tariff.ratchet_months > 0 && !is_flexible {
                peak *= TOU_FIRM_RATCHET_MULTIPLIER;
            }
            // NCP bills on installed capacity
            (peak, dc_capacity_mw)
        }
        DemandChargeType::CoincidentPeak => {
            let peak = match tariff.active_ratchet() {
                Some(r) => coincident_mw.max(dc_capacity_mw * r),
                None => coincident_mw,
            };
            (peak, coincident_mw * CP_MAX_DEMAND_SHARE)
        }
        DemandChargeType::Cp1_5 => {
            let avoidance = if is_flexible {
                CP_1_5_FLEX_AVOIDANCE
            } else {
                1.0
            };
            (
                coincident_mw * avoidance,
                dc_capacity_mw * CP_1_5_MAX_DEMAND_SHARE,
            )
        }
        DemandChargeType::Cp4 => {
            let avoidance = if is_flexible {
                CP_4_FLEX_AVOIDANCE
            } else {
                1.0
            };
            (
                coincident_mw * avoidance,
                dc_capacity_mw * CP_4_MAX_DEMAND_SHARE,
            )
        }
        DemandChargeType::RollingRatchet => {
            let peak = match tariff.active_ratchet() {
                Some(r) => {
                    let weight = if is_flexible {
                        ROLLING_RATCHET_FLEX_WEIGHT
                    } else {
                        1.0
                    };
                    coincident_mw * (1.0 + (r - 1.0) * weight)
                }
                None => coincident_mw,
            };
            (peak, 0.0)
        }
        DemandChargeType::SimpleCpNcp => (coincident_mw, dc_capacity_mw),
    };

    let peak_demand_revenue = peak_demand_mw * tariff.peak_demand_charge * MONTHS_PER_YEAR;
    let max_demand_revenue = max_demand_mw * tariff.max_demand_charge * MONTHS_PER_YEAR;
    let total_demand_revenue = peak_demand_revenue + max_demand_revenue;
    let energy_revenue = annual_mwh * tariff.energy_charge;
    let total_revenue = total_demand_revenue + energy_revenue;

    let firm_total_demand = dc_capacity_mw * tariff.peak_demand_charge * MONTHS_PER_YEAR
        + dc_capacity_mw * tariff.max_demand_charge * MONTHS_PER_YEAR;
    let flexibility_benefit = if is_flexible {
        firm_total_demand - total_demand_revenue
    } else {
        0.0
    };

    debug!(
        tariff_type = %tariff.demand_charge_type,
        peak_demand_mw,
        max_demand_mw,
        total_revenue,
        flexibility_benefit,
        "computed tariff demand charges"
    );

    DemandChargeResult {
        peak_demand_revenue,
        max_demand_revenue,
        total_demand_revenue,
        energy_revenue,
        total_revenue,
        flexibility_benefit,
        peak_demand_mw,
        max_demand_mw,
        annual_mwh,
        tariff_type: tariff.demand_charge_type,
    }
}
