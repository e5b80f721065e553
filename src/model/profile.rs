//! Utility and data center input profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::constants::DEFAULT_CAPACITY_COST_PASS_THROUGH;

/// Wholesale market structure the utility operates in.
///
/// Only [`MarketType::Ercot`] changes the engine arithmetic directly; the
/// capacity-market branches key off [`UtilityProfile::has_capacity_market`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    /// Vertically integrated utility under state PUC oversight.
    #[default]
    Regulated,
    /// PJM Interconnection.
    Pjm,
    /// ERCOT energy-only market with 4CP transmission allocation.
    Ercot,
    /// Midcontinent ISO.
    Miso,
    /// Southwest Power Pool.
    Spp,
}

impl MarketType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regulated => "regulated",
            Self::Pjm => "pjm",
            Self::Ercot => "ercot",
            Self::Miso => "miso",
            Self::Spp => "spp",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer, energy, and peak profile of the host utility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UtilityProfile {
    /// Residential customer count (> 0).
    pub residential_customers: u64,
    /// Commercial customer count (> 0).
    pub commercial_customers: u64,
    /// Industrial customer count (> 0).
    pub industrial_customers: u64,
    /// Current average residential monthly bill ($).
    pub avg_monthly_bill: f64,
    /// Annual system energy before the data center (GWh).
    pub pre_dc_system_energy_gwh: f64,
    /// Residential share of system energy (0.0–1.0).
    pub residential_energy_share: f64,
    /// System peak before the data center (MW).
    pub system_peak_mw: f64,
    /// Statically configured residential cost allocation (0.0–1.0).
    pub base_residential_allocation: f64,
    /// Wholesale market structure.
    pub market_type: MarketType,
    /// Whether capacity is procured through a capacity market.
    pub has_capacity_market: bool,
    /// 2024 capacity auction clearing price ($/MW-day).
    pub capacity_price_2024: Option<f64>,
    /// Share of capacity-market cost passed through to retail rates (0.0–1.0).
    pub capacity_cost_pass_through: f64,
}

/// Default utility: a mid-sized regulated utility.
pub const DEFAULT_UTILITY: UtilityProfile = UtilityProfile {
    residential_customers: 560_000,
    commercial_customers: 85_000,
    industrial_customers: 5_000,
    avg_monthly_bill: 130.0,
    pre_dc_system_energy_gwh: 20_000.0,
    residential_energy_share: 0.35,
    system_peak_mw: 4000.0,
    base_residential_allocation: 0.40,
    market_type: MarketType::Regulated,
    has_capacity_market: false,
    capacity_price_2024: None,
    capacity_cost_pass_through: DEFAULT_CAPACITY_COST_PASS_THROUGH,
};

impl Default for UtilityProfile {
    fn default() -> Self {
        DEFAULT_UTILITY
    }
}

impl UtilityProfile {
    /// Total customers across all classes.
    pub fn total_customers(&self) -> u64 {
        self.residential_customers
            .saturating_add(self.commercial_customers)
            .saturating_add(self.industrial_customers)
    }

    /// Capacity price when a capacity market is configured with a nonzero price.
    pub fn active_capacity_price(&self) -> Option<f64> {
        if !self.has_capacity_market {
            return None;
        }
        self.capacity_price_2024.filter(|p| *p != 0.0)
    }

    /// Validates all fields, collecting every violation under `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let field = |name: &str| format!("{prefix}.{name}");

        for (name, count) in [
            ("residential_customers", self.residential_customers),
            ("commercial_customers", self.commercial_customers),
            ("industrial_customers", self.industrial_customers),
        ] {
            if count == 0 {
                errors.push(ConfigError::new(field(name), "must be > 0"));
            }
        }
        for (name, value) in [
            ("avg_monthly_bill", self.avg_monthly_bill),
            ("pre_dc_system_energy_gwh", self.pre_dc_system_energy_gwh),
            ("system_peak_mw", self.system_peak_mw),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field(name), "must be finite and > 0"));
            }
        }
        for (name, value) in [
            ("residential_energy_share", self.residential_energy_share),
            ("base_residential_allocation", self.base_residential_allocation),
            ("capacity_cost_pass_through", self.capacity_cost_pass_through),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ConfigError::new(field(name), "must be in [0.0, 1.0]"));
            }
        }
        if let Some(price) = self.capacity_price_2024
            && !(price.is_finite() && price >= 0.0)
        {
            errors.push(ConfigError::new(field("capacity_price_2024"), "must be finite and >= 0"));
        }

        errors
    }
}

/// Size and operating characteristics of the hypothetical data center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataCenterProfile {
    /// Nameplate capacity (MW, > 0).
    pub capacity_mw: f64,
    /// Load factor when operated as firm load.
    pub firm_load_factor: f64,
    /// Share of capacity coincident with system peak when firm.
    pub firm_peak_coincidence: f64,
    /// Load factor when operated flexibly.
    pub flex_load_factor: f64,
    /// Share of capacity coincident with system peak when flexible.
    pub flex_peak_coincidence: f64,
    /// Onsite generation available during system peaks (MW).
    pub onsite_generation_mw: f64,
}

/// Default data center: 1 GW, 25% curtailable at system peak, 200 MW onsite.
pub const DEFAULT_DATA_CENTER: DataCenterProfile = DataCenterProfile {
    capacity_mw: 1000.0,
    firm_load_factor: 0.80,
    firm_peak_coincidence: 1.0,
    flex_load_factor: 0.95,
    flex_peak_coincidence: 0.75,
    onsite_generation_mw: 200.0,
};

impl Default for DataCenterProfile {
    fn default() -> Self {
        DEFAULT_DATA_CENTER
    }
}

impl DataCenterProfile {
    /// Flexible peak coincidence net of onsite generation, floored at zero.
    pub fn net_flex_peak_coincidence(&self) -> f64 {
        (self.flex_peak_coincidence - self.onsite_generation_mw / self.capacity_mw).max(0.0)
    }

    /// Validates all fields, collecting every violation under `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let field = |name: &str| format!("{prefix}.{name}");

        if !(self.capacity_mw.is_finite() && self.capacity_mw > 0.0) {
            errors.push(ConfigError::new(field("capacity_mw"), "must be finite and > 0"));
        }
        for (name, value) in [
            ("firm_load_factor", self.firm_load_factor),
            ("firm_peak_coincidence", self.firm_peak_coincidence),
            ("flex_load_factor", self.flex_load_factor),
            ("flex_peak_coincidence", self.flex_peak_coincidence),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(ConfigError::new(field(name), "must be in (0.0, 1.0]"));
            }
        }
        if self.flex_peak_coincidence > self.firm_peak_coincidence {
            errors.push(ConfigError::new(
                field("flex_peak_coincidence"),
                "must be <= firm_peak_coincidence",
            ));
        }
        if !(self.onsite_generation_mw.is_finite() && self.onsite_generation_mw >= 0.0) {
            errors.push(ConfigError::new(field("onsite_generation_mw"), "must be finite and >= 0"));
        } else if self.onsite_generation_mw > self.capacity_mw {
            errors.push(ConfigError::new(field("onsite_generation_mw"), "must be <= capacity_mw"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DEFAULT_UTILITY.validate("utility").is_empty());
        assert!(DEFAULT_DATA_CENTER.validate("datacenter").is_empty());
    }

    #[test]
    fn zero_customers_rejected() {
        let utility = UtilityProfile {
            commercial_customers: 0,
            ..UtilityProfile::default()
        };
        let errors = utility.validate("utility");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "utility.commercial_customers");
    }

    #[test]
    fn zero_peak_and_energy_rejected() {
        let utility = UtilityProfile {
            system_peak_mw: 0.0,
            pre_dc_system_energy_gwh: 0.0,
            ..UtilityProfile::default()
        };
        let errors = utility.validate("utility");
        assert!(errors.iter().any(|e| e.field == "utility.system_peak_mw"));
        assert!(
            errors
                .iter()
                .any(|e| e.field == "utility.pre_dc_system_energy_gwh")
        );
    }

    #[test]
    fn flex_coincidence_above_firm_rejected() {
        let dc = DataCenterProfile {
            firm_peak_coincidence: 0.7,
            flex_peak_coincidence: 0.9,
            ..DataCenterProfile::default()
        };
        let errors = dc.validate("datacenter");
        assert!(
            errors
                .iter()
                .any(|e| e.field == "datacenter.flex_peak_coincidence")
        );
    }

    #[test]
    fn onsite_generation_above_capacity_rejected() {
        let dc = DataCenterProfile {
            onsite_generation_mw: 1500.0,
            ..DataCenterProfile::default()
        };
        let errors = dc.validate("datacenter");
        assert!(
            errors
                .iter()
                .any(|e| e.field == "datacenter.onsite_generation_mw"
                    && e.message.contains("capacity_mw"))
        );
    }

    #[test]
    fn net_flex_coincidence_floors_at_zero() {
        let dc = DataCenterProfile {
            onsite_generation_mw: 1000.0,
            ..DataCenterProfile::default()
        };
        assert_eq!(dc.net_flex_peak_coincidence(), 0.0);
        let net = DEFAULT_DATA_CENTER.net_flex_peak_coincidence();
        assert!((net - 0.55).abs() < 1e-12);
    }

    #[test]
    fn capacity_price_needs_market_flag() {
        let mut utility = UtilityProfile {
            capacity_price_2024: Some(269.92),
            ..UtilityProfile::default()
        };
        assert_eq!(utility.active_capacity_price(), None);
        utility.has_capacity_market = true;
        assert_eq!(utility.active_capacity_price(), Some(269.92));
        utility.capacity_price_2024 = Some(0.0);
        assert_eq!(utility.active_capacity_price(), None);
    }

    #[test]
    fn negative_capacity_price_rejected() {
        let utility = UtilityProfile {
            capacity_price_2024: Some(-5.0),
            ..UtilityProfile::default()
        };
        let errors = utility.validate("utility");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "utility.capacity_price_2024");
        let unset = UtilityProfile {
            capacity_price_2024: None,
            ..UtilityProfile::default()
        };
        assert!(unset.validate("utility").is_empty());
    }

    #[test]
    fn total_customers_saturates() {
        let utility = UtilityProfile {
            residential_customers: u64::MAX,
            commercial_customers: u64::MAX,
            ..UtilityProfile::default()
        };
        assert_eq!(utility.total_customers(), u64::MAX);
        assert_eq!(DEFAULT_UTILITY.total_customers(), 650_000);
    }

    #[test]
    fn market_type_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            market: MarketType,
        }
        let w: Result<Wrapper, _> = toml::from_str("market = \"ercot\"");
        assert_eq!(w.ok().map(|w| w.market), Some(MarketType::Ercot));
        let bad: Result<Wrapper, _> = toml::from_str("market = \"caiso\"");
        assert!(bad.is_err());
    }
}
