//! Reference utility profiles compiled from EIA data, utility filings and
//! annual reports (2024 figures where available).

use serde::Serialize;

use crate::model::constants::{ESTIMATED_SYSTEM_LOAD_FACTOR, HOURS_PER_YEAR, MWH_PER_GWH};
use crate::model::profile::{
    DEFAULT_DATA_CENTER, DEFAULT_UTILITY, DataCenterProfile, MarketType, UtilityProfile,
};

/// Wholesale market parameters of a reference utility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketStructure {
    pub market_type: MarketType,
    pub has_capacity_market: bool,
    /// Typical residential share of allocated costs in this market.
    pub base_residential_allocation: f64,
    /// Share of capacity cost passed through to retail rates.
    pub capacity_cost_pass_through: f64,
    /// 2024 capacity auction clearing price ($/MW-day).
    pub capacity_price_2024: Option<f64>,
    pub utility_owns_generation: bool,
    pub notes: &'static str,
}

/// Vertically integrated utility under state PUC oversight.
pub const REGULATED_MARKET: MarketStructure = MarketStructure {
    market_type: MarketType::Regulated,
    has_capacity_market: false,
    base_residential_allocation: 0.40,
    capacity_cost_pass_through: 0.40,
    capacity_price_2024: None,
    utility_owns_generation: true,
    notes: "Vertically integrated utility. Infrastructure costs allocated through traditional rate base.",
};

pub const PJM_MARKET: MarketStructure = MarketStructure {
    market_type: MarketType::Pjm,
    has_capacity_market: true,
    base_residential_allocation: 0.35,
    capacity_cost_pass_through: 0.50,
    capacity_price_2024: Some(269.92),
    utility_owns_generation: false,
    notes: "PJM capacity market. 2024 auction cleared at $269.92/MW-day (10x increase).",
};

/// Energy-only market, no capacity payments.
pub const ERCOT_MARKET: MarketStructure = MarketStructure {
    market_type: MarketType::Ercot,
    has_capacity_market: false,
    base_residential_allocation: 0.30,
    capacity_cost_pass_through: 0.25,
    capacity_price_2024: None,
    utility_owns_generation: false,
    notes: "Energy-only market with no capacity payments. Price signals drive investment.",
};

pub const SPP_MARKET: MarketStructure = MarketStructure {
    market_type: MarketType::Spp,
    has_capacity_market: false,
    base_residential_allocation: 0.40,
    capacity_cost_pass_through: 0.40,
    capacity_price_2024: None,
    utility_owns_generation: true,
    notes: "Southwest Power Pool. Energy market but no mandatory capacity market.",
};

/// A published utility record the projection can be seeded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityReference {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    /// Empty for the custom entry.
    pub state: &'static str,
    pub region: &'static str,
    pub residential_customers: u64,
    pub total_customers: u64,
    pub system_peak_mw: f64,
    pub avg_monthly_bill: f64,
    pub avg_monthly_usage_kwh: f64,
    pub market: MarketStructure,
    pub has_dc_activity: bool,
    pub dc_notes: &'static str,
    /// Data center size to model by default (MW).
    pub default_dc_mw: f64,
    /// Tariff preset describing this utility's large-load rate.
    pub tariff_preset: &'static str,
}

/// Share of nameplate capacity assumed as onsite generation for reference sites.
const ONSITE_GENERATION_SHARE: f64 = 0.20;

impl UtilityReference {
    /// Overlays this record onto [`DEFAULT_UTILITY`].
    ///
    /// Non-residential customers are split between commercial and industrial
    /// in the default utility's proportion, and annual energy follows from
    /// the system peak at [`ESTIMATED_SYSTEM_LOAD_FACTOR`].
    pub fn to_profile(&self) -> UtilityProfile {
        let (commercial_customers, industrial_customers) = self.non_residential_split();
        UtilityProfile {
            residential_customers: self.residential_customers,
            commercial_customers,
            industrial_customers,
            avg_monthly_bill: self.avg_monthly_bill,
            pre_dc_system_energy_gwh: self.system_peak_mw
                * HOURS_PER_YEAR
                * ESTIMATED_SYSTEM_LOAD_FACTOR
                / MWH_PER_GWH,
            system_peak_mw: self.system_peak_mw,
            base_residential_allocation: self.market.base_residential_allocation,
            market_type: self.market.market_type,
            has_capacity_market: self.market.has_capacity_market,
            capacity_price_2024: self.market.capacity_price_2024,
            capacity_cost_pass_through: self.market.capacity_cost_pass_through,
            ..DEFAULT_UTILITY
        }
    }

    /// `(commercial, industrial)` customers summing to the non-residential count.
    fn non_residential_split(&self) -> (u64, u64) {
        let non_residential = self.total_customers.saturating_sub(self.residential_customers);
        let default_commercial = DEFAULT_UTILITY.commercial_customers;
        let default_industrial = DEFAULT_UTILITY.industrial_customers;
        let scaled = non_residential.saturating_mul(default_industrial);
        let industrial = (scaled / (default_commercial + default_industrial)).max(1);
        let commercial = non_residential.saturating_sub(industrial).max(1);
        (commercial, industrial)
    }

    /// Default data center sized for this utility.
    pub fn default_datacenter(&self) -> DataCenterProfile {
        DataCenterProfile {
            capacity_mw: self.default_dc_mw,
            onsite_generation_mw: self.default_dc_mw * ONSITE_GENERATION_SHARE,
            ..DEFAULT_DATA_CENTER
        }
    }

    /// Dropdown label, e.g. `"PSO Oklahoma (Oklahoma)"`.
    pub fn label(&self) -> String {
        if self.state.is_empty() {
            self.short_name.to_string()
        } else {
            format!("{} ({})", self.short_name, self.state)
        }
    }
}

pub const UTILITY_PROFILES: &[UtilityReference] = &[
    UtilityReference {
        id: "pso-oklahoma",
        name: "Public Service Company of Oklahoma (PSO)",
        short_name: "PSO Oklahoma",
        state: "Oklahoma",
        region: "Southwest",
        residential_customers: 460_000,
        total_customers: 575_000,
        system_peak_mw: 4400.0,
        avg_monthly_bill: 130.0,
        avg_monthly_usage_kwh: 1100.0,
        market: SPP_MARKET,
        has_dc_activity: true,
        dc_notes: "Proposed 2GW hyperscale facility; PSO facing 31% power deficit by 2031",
        default_dc_mw: 2000.0,
        tariff_preset: "pso",
    },
    UtilityReference {
        id: "dominion-virginia",
        name: "Dominion Energy Virginia",
        short_name: "Dominion Virginia",
        state: "Virginia",
        region: "Mid-Atlantic",
        residential_customers: 2_500_000,
        total_customers: 2_800_000,
        system_peak_mw: 18_000.0,
        avg_monthly_bill: 145.0,
        avg_monthly_usage_kwh: 1050.0,
        market: MarketStructure {
            utility_owns_generation: true,
            notes: "Dominion operates in PJM. Data center capital of the world.",
            ..PJM_MARKET
        },
        has_dc_activity: true,
        dc_notes: "Data center capital of the world; forecasting 9GW DC peak in 10 years",
        default_dc_mw: 1500.0,
        tariff_preset: "dominion",
    },
    UtilityReference {
        id: "duke-carolinas",
        name: "Duke Energy Carolinas",
        short_name: "Duke Carolinas",
        state: "NC / SC",
        region: "Southeast",
        residential_customers: 2_507_000,
        total_customers: 2_926_000,
        system_peak_mw: 20_700.0,
        avg_monthly_bill: 135.0,
        avg_monthly_usage_kwh: 1000.0,
        market: REGULATED_MARKET,
        has_dc_activity: true,
        dc_notes: "Growing data center presence in Charlotte metro",
        default_dc_mw: 1000.0,
        tariff_preset: "duke",
    },
    UtilityReference {
        id: "duke-progress",
        name: "Duke Energy Progress",
        short_name: "Duke Progress",
        state: "NC / SC",
        region: "Southeast",
        residential_customers: 1_400_000,
        total_customers: 1_700_000,
        system_peak_mw: 13_800.0,
        avg_monthly_bill: 132.0,
        avg_monthly_usage_kwh: 1000.0,
        market: REGULATED_MARKET,
        has_dc_activity: true,
        dc_notes: "Serves Raleigh area with growing tech sector",
        default_dc_mw: 800.0,
        tariff_preset: "generic",
    },
    UtilityReference {
        id: "georgia-power",
        name: "Georgia Power",
        short_name: "Georgia Power",
        state: "Georgia",
        region: "Southeast",
        residential_customers: 2_400_000,
        total_customers: 2_804_000,
        system_peak_mw: 17_100.0,
        avg_monthly_bill: 153.0,
        avg_monthly_usage_kwh: 1150.0,
        market: REGULATED_MARKET,
        has_dc_activity: true,
        dc_notes: "Projecting 8,200 MW load growth by 2030 including data centers",
        default_dc_mw: 1200.0,
        tariff_preset: "georgia_power",
    },
    UtilityReference {
        id: "aps-arizona",
        name: "Arizona Public Service (APS)",
        short_name: "APS Arizona",
        state: "Arizona",
        region: "Southwest",
        residential_customers: 1_200_000,
        total_customers: 1_400_000,
        system_peak_mw: 8212.0,
        avg_monthly_bill: 140.0,
        avg_monthly_usage_kwh: 1050.0,
        market: REGULATED_MARKET,
        has_dc_activity: true,
        dc_notes: "Phoenix metro data center growth; 40% peak growth by 2031",
        default_dc_mw: 800.0,
        tariff_preset: "generic",
    },
    UtilityReference {
        id: "nv-energy",
        name: "NV Energy",
        short_name: "NV Energy Nevada",
        state: "Nevada",
        region: "West",
        residential_customers: 610_000,
        total_customers: 2_400_000,
        system_peak_mw: 9000.0,
        avg_monthly_bill: 125.0,
        avg_monthly_usage_kwh: 900.0,
        market: REGULATED_MARKET,
        has_dc_activity: true,
        dc_notes: "Data centers requesting to triple peak demand",
        default_dc_mw: 1500.0,
        tariff_preset: "generic",
    },
    UtilityReference {
        id: "xcel-colorado",
        name: "Xcel Energy Colorado",
        short_name: "Xcel Colorado",
        state: "Colorado",
        region: "Mountain West",
        residential_customers: 1_400_000,
        total_customers: 1_600_000,
        system_peak_mw: 7200.0,
        avg_monthly_bill: 105.0,
        avg_monthly_usage_kwh: 700.0,
        market: REGULATED_MARKET,
        has_dc_activity: true,
        dc_notes: "Data centers to drive 2/3 of new demand",
        default_dc_mw: 600.0,
        tariff_preset: "generic",
    },
    UtilityReference {
        id: "aep-ohio",
        name: "AEP Ohio",
        short_name: "AEP Ohio",
        state: "Ohio",
        region: "Midwest",
        residential_customers: 1_200_000,
        total_customers: 1_500_000,
        system_peak_mw: 12_000.0,
        avg_monthly_bill: 135.0,
        avg_monthly_usage_kwh: 900.0,
        market: MarketStructure {
            notes: "AEP Ohio operates in PJM. Ohio is deregulated but AEP owns transmission.",
            ..PJM_MARKET
        },
        has_dc_activity: true,
        dc_notes: "Ohio seeing significant data center growth; AEP proposed new rate class",
        default_dc_mw: 1000.0,
        tariff_preset: "aep_ohio",
    },
    UtilityReference {
        id: "aep-indiana-michigan",
        name: "Indiana Michigan Power (I&M)",
        short_name: "AEP I&M",
        state: "Indiana / Michigan",
        region: "Midwest",
        residential_customers: 480_000,
        total_customers: 600_000,
        system_peak_mw: 5500.0,
        avg_monthly_bill: 130.0,
        avg_monthly_usage_kwh: 950.0,
        market: MarketStructure {
            utility_owns_generation: true,
            base_residential_allocation: 0.38,
            notes: "I&M operates in PJM but owns generation including Cook Nuclear.",
            ..PJM_MARKET
        },
        has_dc_activity: true,
        dc_notes: "Northeast Indiana seeing industrial and data center growth",
        default_dc_mw: 500.0,
        tariff_preset: "generic",
    },
    UtilityReference {
        id: "aep-appalachian",
        name: "Appalachian Power (APCo)",
        short_name: "AEP Appalachian",
        state: "Virginia / West Virginia",
        region: "Appalachian",
        residential_customers: 800_000,
        total_customers: 1_000_000,
        system_peak_mw: 7000.0,
        avg_monthly_bill: 125.0,
        avg_monthly_usage_kwh: 1000.0,
        market: MarketStructure {
            utility_owns_generation: true,
            base_residential_allocation: 0.40,
            notes: "Appalachian Power operates in PJM but WV remains traditionally regulated.",
            ..PJM_MARKET
        },
        has_dc_activity: true,
        dc_notes: "Virginia portion seeing data center interest as NoVA constrained",
        default_dc_mw: 600.0,
        tariff_preset: "generic",
    },
    UtilityReference {
        id: "aep-swepco",
        name: "Southwestern Electric Power (SWEPCO)",
        short_name: "AEP SWEPCO",
        state: "Arkansas / Louisiana / Texas",
        region: "Southwest",
        residential_customers: 400_000,
        total_customers: 540_000,
        system_peak_mw: 4800.0,
        avg_monthly_bill: 120.0,
        avg_monthly_usage_kwh: 1100.0,
        market: MarketStructure {
            notes: "SWEPCO operates in SPP. Vertically integrated with state PUC regulation.",
            ..SPP_MARKET
        },
        has_dc_activity: false,
        dc_notes: "Less data center activity than other AEP territories",
        default_dc_mw: 400.0,
        tariff_preset: "generic",
    },
    UtilityReference {
        id: "ercot-texas",
        name: "ERCOT (Texas Grid)",
        short_name: "ERCOT Texas",
        state: "Texas",
        region: "Texas",
        residential_customers: 12_000_000,
        total_customers: 26_000_000,
        system_peak_mw: 85_508.0,
        avg_monthly_bill: 140.0,
        avg_monthly_usage_kwh: 1100.0,
        market: MarketStructure {
            notes: "Energy-only market. 46% of projected load growth from data centers.",
            ..ERCOT_MARKET
        },
        has_dc_activity: true,
        dc_notes: "Data centers account for 46% of projected load growth",
        default_dc_mw: 3000.0,
        tariff_preset: "ercot",
    },
    UtilityReference {
        id: "custom",
        name: "Custom / Enter Your Own",
        short_name: "Custom",
        state: "",
        region: "",
        residential_customers: 500_000,
        total_customers: 600_000,
        system_peak_mw: 4000.0,
        avg_monthly_bill: 144.0,
        avg_monthly_usage_kwh: 865.0,
        market: REGULATED_MARKET,
        has_dc_activity: false,
        dc_notes: "Enter your own utility parameters",
        default_dc_mw: 1000.0,
        tariff_preset: "generic",
    },
];

/// Looks up a reference utility by id.
pub fn get_utility_by_id(id: &str) -> Option<&'static UtilityReference> {
    UTILITY_PROFILES.iter().find(|u| u.id == id)
}

/// `(label, id)` pairs for every reference utility, in table order.
pub fn utility_options() -> Vec<(String, &'static str)> {
    UTILITY_PROFILES.iter().map(|u| (u.label(), u.id)).collect()
}
