//! Cost, rate, and time constants shared by every stage of the engine.
//!
//! The escalation-damping and weighting factors here are scenario-fidelity
//! knobs, not derived quantities. Changing any of them changes published
//! projections.

/// Hours in a (non-leap) calendar year.
pub const HOURS_PER_YEAR: f64 = 8760.0;
/// Billing months per year.
pub const MONTHS_PER_YEAR: f64 = 12.0;
/// Days used to annualise $/MW-day capacity prices.
pub const DAYS_PER_YEAR: f64 = 365.0;
/// kW per MW.
pub const KW_PER_MW: f64 = 1000.0;
pub const MWH_PER_GWH: f64 = 1000.0;

/// Embedded infrastructure cost assumptions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfrastructureCosts {
    /// Transmission build cost ($/MW of effective peak).
    pub transmission_cost_per_mw: f64,
    /// Distribution build cost ($/MW of effective peak).
    pub distribution_cost_per_mw: f64,
    /// Capacity cost ($/MW-year).
    pub capacity_cost_per_mw_year: f64,
    /// Annual baseline infrastructure upgrade rate (fraction).
    pub annual_baseline_upgrade_pct: f64,
    /// Straight-line amortisation period for transmission and distribution (years).
    pub amortization_years: f64,
}

pub const INFRASTRUCTURE_COSTS: InfrastructureCosts = InfrastructureCosts {
    transmission_cost_per_mw: 350_000.0,
    distribution_cost_per_mw: 150_000.0,
    capacity_cost_per_mw_year: 150_000.0,
    annual_baseline_upgrade_pct: 0.015,
    amortization_years: 20.0,
};

/// Generic data center rate structure used when no tariff is supplied.
///
/// Demand charges split into a coincident-peak (CP) part, billed on the
/// contribution during system peak hours, and a non-coincident-peak (NCP)
/// part, billed on the customer's own monthly peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcRateStructure {
    /// CP demand charge ($/MW-month), ~60% of the total demand charge.
    pub coincident_peak_charge_per_mw_month: f64,
    /// NCP demand charge ($/MW-month), ~40% of the total demand charge.
    pub non_coincident_peak_charge_per_mw_month: f64,
    /// Utility margin on delivered energy ($/MWh).
    pub energy_margin_per_mwh: f64,
    /// ERCOT 4CP transmission allocation rate ($/kW-month).
    pub ercot_4cp_transmission_rate: f64,
}

impl DcRateStructure {
    /// Combined CP + NCP demand charge ($/MW-month).
    pub fn demand_charge_per_mw_month(&self) -> f64 {
        self.coincident_peak_charge_per_mw_month + self.non_coincident_peak_charge_per_mw_month
    }
}

pub const DC_RATE_STRUCTURE: DcRateStructure = DcRateStructure {
    coincident_peak_charge_per_mw_month: 5430.0,
    non_coincident_peak_charge_per_mw_month: 3620.0,
    energy_margin_per_mwh: 4.88,
    ercot_4cp_transmission_rate: 5.50,
};

/// Projection time parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeParams {
    /// Calendar year of projection index 0.
    pub base_year: u32,
    /// General inflation rate (fraction per year).
    pub general_inflation: f64,
    /// Default projection horizon (years after the base year).
    pub projection_years: u32,
}

pub const TIME_PARAMS: TimeParams = TimeParams {
    base_year: 2025,
    general_inflation: 0.025,
    projection_years: 10,
};

/// Grid modernisation component of the baseline escalation rate.
pub const GRID_MODERNIZATION_PCT: f64 = 0.005;

/// Combined annual baseline bill escalation (inflation + aging + modernisation).
pub fn baseline_escalation_rate() -> f64 {
    TIME_PARAMS.general_inflation
        + INFRASTRUCTURE_COSTS.annual_baseline_upgrade_pct
        + GRID_MODERNIZATION_PCT
}

// Residential allocation model.

/// Years for the data center's energy and peak to reach steady state.
pub const LOAD_RAMP_YEARS: f64 = 3.0;
/// Years for rate cases to fully reflect a new large load.
pub const REGULATORY_LAG_YEARS: f64 = 5.0;
/// Residential share of the pre-data-center system peak.
pub const RESIDENTIAL_PEAK_SHARE: f64 = 0.45;
/// System load factor used to derive annual energy from a reported peak.
pub const ESTIMATED_SYSTEM_LOAD_FACTOR: f64 = 0.55;
pub const VOLUMETRIC_WEIGHT: f64 = 0.40;
pub const DEMAND_WEIGHT: f64 = 0.40;
pub const CUSTOMER_WEIGHT: f64 = 0.20;
/// Hard floor on the residential allocation share.
pub const MIN_RESIDENTIAL_ALLOCATION: f64 = 0.15;
/// Hard ceiling on the residential allocation share.
pub const MAX_RESIDENTIAL_ALLOCATION: f64 = 0.50;

// Tariff demand-charge model.

/// Firm-load multiplier on TOU peak demand when the tariff has a ratchet.
pub const TOU_FIRM_RATCHET_MULTIPLIER: f64 = 1.05;
/// Coincident-peak tariffs bill max demand at this share of peak demand.
pub const CP_MAX_DEMAND_SHARE: f64 = 0.85;
/// 1CP/5CP: share of CP contribution a flexible load still pays for.
pub const CP_1_5_FLEX_AVOIDANCE: f64 = 0.65;
/// 1CP/5CP: distribution max demand as a share of capacity.
pub const CP_1_5_MAX_DEMAND_SHARE: f64 = 0.30;
/// 4CP: share of CP contribution a flexible load still pays for.
pub const CP_4_FLEX_AVOIDANCE: f64 = 0.50;
/// 4CP: distribution max demand as a share of capacity.
pub const CP_4_MAX_DEMAND_SHARE: f64 = 0.25;
/// Rolling ratchet: summer weighting for curtailable loads.
pub const ROLLING_RATCHET_FLEX_WEIGHT: f64 = 0.85;

// Net residential impact model.

/// Share of embedded transmission cost still charged under ERCOT 4CP.
pub const ERCOT_BASE_TRANSMISSION_SHARE: f64 = 0.30;
/// ERCOT has no capacity market; capacity is valued at this share of base.
pub const ERCOT_CAPACITY_COST_SHARE: f64 = 0.50;
/// Blend weight of the capacity-market price against the base capacity cost.
pub const CAPACITY_MARKET_BLEND: f64 = 0.50;
/// Default share of capacity-market cost passed through to retail rates.
pub const DEFAULT_CAPACITY_COST_PASS_THROUGH: f64 = 0.40;
/// Demand-response credit factor with a capacity market.
pub const DR_CREDIT_WITH_MARKET: f64 = 0.90;
/// Demand-response credit factor without a capacity market.
pub const DR_CREDIT_WITHOUT_MARKET: f64 = 0.80;
/// Capacity accreditation of onsite generation.
pub const GENERATION_CREDIT_FACTOR: f64 = 0.95;
/// Energy margin flowing through to other ratepayers under ERCOT.
pub const ERCOT_ENERGY_MARGIN_FLOW_THROUGH: f64 = 0.90;
/// Energy margin flowing through to other ratepayers elsewhere.
pub const ENERGY_MARGIN_FLOW_THROUGH: f64 = 0.85;
/// Share of NCP demand revenue credited to other ratepayers.
pub const NCP_DEMAND_BENEFIT_SHARE: f64 = 0.20;
/// Share of the scaled tariff flexibility benefit credited to ratepayers.
pub const FLEXIBILITY_BENEFIT_SHARE: f64 = 0.15;
/// Residential allocation scale under ERCOT 4CP.
pub const ERCOT_ALLOCATION_SCALE: f64 = 0.70;
/// Capacity price ($/MW-day) above which residential allocation is scaled up.
pub const HIGH_CAPACITY_PRICE_THRESHOLD: f64 = 100.0;
/// Price span ($/MW-day) over which the allocation scale rises by 100%.
pub const CAPACITY_PRICE_SCALE_SPAN: f64 = 1000.0;
/// Ceiling on the capacity-price allocation scale.
pub const MAX_CAPACITY_PRICE_ALLOCATION_SCALE: f64 = 1.15;

// Trajectory generation.

/// First projection index with data center impact (construction lead time).
pub const INTERCONNECTION_YEAR: u32 = 2;
/// Weight of the impact in the interconnection year (partial-year phase-in).
pub const FIRST_YEAR_PHASE_IN: f64 = 0.5;
/// Inflation damping on negative (savings) impacts: firm load.
pub const FIRM_SAVINGS_DAMPING: f64 = 0.80;
/// Inflation damping on negative (savings) impacts: flexible load.
pub const FLEXIBLE_SAVINGS_DAMPING: f64 = 0.90;
/// Inflation damping on negative (savings) impacts: flexible load + generation.
pub const DISPATCHABLE_SAVINGS_DAMPING: f64 = 0.95;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_rate_is_four_and_a_half_percent() {
        assert!((baseline_escalation_rate() - 0.045).abs() < 1e-12);
    }

    #[test]
    fn blend_weights_sum_to_one() {
        let total = VOLUMETRIC_WEIGHT + DEMAND_WEIGHT + CUSTOMER_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn generic_demand_charge_total() {
        assert_eq!(DC_RATE_STRUCTURE.demand_charge_per_mw_month(), 9050.0);
    }
}
