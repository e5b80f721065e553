//! Net residential bill impact of a data center load.
//!
//! Infrastructure and capacity costs caused by the data center are netted
//! against the revenue it pays the utility. The net annual amount is then
//! allocated to the residential class and spread over residential customers.

use serde::Serialize;
use tracing::debug;

use crate::model::constants::{
    CAPACITY_MARKET_BLEND, CAPACITY_PRICE_SCALE_SPAN, DAYS_PER_YEAR, DC_RATE_STRUCTURE,
    DR_CREDIT_WITH_MARKET, DR_CREDIT_WITHOUT_MARKET, ENERGY_MARGIN_FLOW_THROUGH,
    ERCOT_ALLOCATION_SCALE, ERCOT_BASE_TRANSMISSION_SHARE, ERCOT_CAPACITY_COST_SHARE,
    ERCOT_ENERGY_MARGIN_FLOW_THROUGH, FLEXIBILITY_BENEFIT_SHARE, GENERATION_CREDIT_FACTOR,
    HIGH_CAPACITY_PRICE_THRESHOLD, HOURS_PER_YEAR, INFRASTRUCTURE_COSTS, KW_PER_MW,
    MAX_CAPACITY_PRICE_ALLOCATION_SCALE, MONTHS_PER_YEAR, NCP_DEMAND_BENEFIT_SHARE,
};
use crate::model::profile::{MarketType, UtilityProfile};
use crate::model::tariff::{TariffStructure, compute_tariff_demand_charges};

/// Annual revenue the data center pays the utility ($/year).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueOffset {
    /// Coincident-peak demand revenue.
    pub cp_demand_revenue: f64,
    /// Non-coincident-peak demand revenue.
    pub ncp_demand_revenue: f64,
    pub demand_revenue: f64,
    /// Energy revenue (margin under the generic rate structure).
    pub energy_margin: f64,
    pub per_year: f64,
}

/// Revenue under the generic CP/NCP rate structure, used when no tariff is given.
///
/// CP charges bill on the contribution at system peak; NCP charges and
/// energy bill on installed capacity.
pub fn calculate_dc_revenue_offset(
    dc_capacity_mw: f64,
    load_factor: f64,
    peak_coincidence: f64,
) -> RevenueOffset {
    let rates = DC_RATE_STRUCTURE;
    let cp_demand_revenue = dc_capacity_mw
        * peak_coincidence
        * rates.coincident_peak_charge_per_mw_month
        * MONTHS_PER_YEAR;
    let ncp_demand_revenue =
        dc_capacity_mw * rates.non_coincident_peak_charge_per_mw_month * MONTHS_PER_YEAR;
    let demand_revenue = cp_demand_revenue + ncp_demand_revenue;
    let energy_margin = dc_capacity_mw * load_factor * HOURS_PER_YEAR * rates.energy_margin_per_mwh;

    RevenueOffset {
        cp_demand_revenue,
        ncp_demand_revenue,
        demand_revenue,
        energy_margin,
        per_year: demand_revenue + energy_margin,
    }
}

/// Net effect of the data center on the residential class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactResult {
    /// Change to the average residential bill ($/customer-month). Negative is a saving.
    pub per_customer_monthly: f64,
    /// Annualised infrastructure plus net capacity cost ($/year).
    pub gross_cost: f64,
    /// Data center revenue credited back to other ratepayers ($/year).
    pub revenue_offset: f64,
    /// `gross_cost - revenue_offset` ($/year).
    pub net_impact: f64,
    /// Residential share of `net_impact` ($/year).
    pub residential_impact: f64,
    pub market_type: MarketType,
    /// Residential allocation after market adjustments.
    pub adjusted_allocation: f64,
    /// Demand-response plus onsite generation capacity credit ($/year).
    pub capacity_credit: f64,
    pub is_flexible: bool,
}

/// Computes the per-customer monthly residential impact of a data center.
///
/// The load is flexible when `peak_coincidence < 1.0`. Capacity credits are
/// only granted to flexible loads, and only when `include_capacity_credit`
/// is set. `residential_customers` must be nonzero.
#[allow(clippy::too_many_arguments)]
pub fn compute_net_residential_impact(
    dc_capacity_mw: f64,
    load_factor: f64,
    peak_coincidence: f64,
    residential_customers: u64,
    residential_allocation: f64,
    include_capacity_credit: bool,
    onsite_gen_mw: f64,
    utility: &UtilityProfile,
    tariff: Option<&TariffStructure>,
) -> ImpactResult {
    let is_flexible = peak_coincidence < 1.0;
    let is_ercot = utility.market_type == MarketType::Ercot;
    let costs = INFRASTRUCTURE_COSTS;

    // Onsite generation can push this below zero; every use clamps it.
    let effective_peak_mw = dc_capacity_mw * peak_coincidence - onsite_gen_mw;
    let billed_peak_mw = effective_peak_mw.max(0.0);

    let transmission = if is_ercot {
        let four_cp = billed_peak_mw
            * KW_PER_MW
            * DC_RATE_STRUCTURE.ercot_4cp_transmission_rate
            * MONTHS_PER_YEAR;
        let interconnection = billed_peak_mw
            * costs.transmission_cost_per_mw
            * ERCOT_BASE_TRANSMISSION_SHARE;
        four_cp + interconnection / costs.amortization_years
    } else {
        billed_peak_mw * costs.transmission_cost_per_mw / costs.amortization_years
    };
    let distribution = billed_peak_mw * costs.distribution_cost_per_mw / costs.amortization_years;
    let annualized_infra_cost = transmission + distribution;

    let base_capacity_cost = if is_ercot {
        costs.capacity_cost_per_mw_year * ERCOT_CAPACITY_COST_SHARE
    } else if let Some(price) = utility.active_capacity_price() {
        let market_cost = price * DAYS_PER_YEAR * utility.capacity_cost_pass_through;
        costs.capacity_cost_per_mw_year * (1.0 - CAPACITY_MARKET_BLEND)
            + market_cost * CAPACITY_MARKET_BLEND
    } else {
        costs.capacity_cost_per_mw_year
    };

    // The CP demand charge pays down capacity cost but never below zero.
    let peak_demand_charge = tariff.map_or(
        DC_RATE_STRUCTURE.coincident_peak_charge_per_mw_month,
        |t| t.peak_demand_charge,
    );
    let net_capacity_cost_per_mw =
        (base_capacity_cost - peak_demand_charge * MONTHS_PER_YEAR).max(0.0);
    let mut capacity_cost = billed_peak_mw * net_capacity_cost_per_mw;

    let mut capacity_credit = 0.0;
    if include_capacity_credit && is_flexible {
        let curtailable_mw = dc_capacity_mw * (1.0 - peak_coincidence);
        let dr_factor = if utility.has_capacity_market {
            DR_CREDIT_WITH_MARKET
        } else {
            DR_CREDIT_WITHOUT_MARKET
        };
        let dr_credit = curtailable_mw * base_capacity_cost * dr_factor;
        let gen_credit = onsite_gen_mw * base_capacity_cost * GENERATION_CREDIT_FACTOR;
        capacity_credit = dr_credit + gen_credit;
        capacity_cost -= capacity_credit;
    }

    let gross_cost = annualized_infra_cost + capacity_cost;

    let (revenue, flexibility_credit) = match tariff {
        Some(t) => {
            let charges =
                compute_tariff_demand_charges(dc_capacity_mw, load_factor, peak_coincidence, t);
            let credit = if is_flexible && charges.flexibility_benefit > 0.0 {
                charges.flexibility_benefit
                    * t.flexibility_benefit_multiplier
                    * FLEXIBILITY_BENEFIT_SHARE
            } else {
                0.0
            };
            let revenue = RevenueOffset {
                cp_demand_revenue: charges.peak_demand_revenue,
                ncp_demand_revenue: charges.max_demand_revenue,
                demand_revenue: charges.total_demand_revenue,
                energy_margin: charges.energy_revenue,
                per_year: charges.total_revenue,
            };
            (revenue, credit)
        }
        None => (
            calculate_dc_revenue_offset(dc_capacity_mw, load_factor, peak_coincidence),
            0.0,
        ),
    };

    let flow_through = if is_ercot {
        ERCOT_ENERGY_MARGIN_FLOW_THROUGH
    } else {
        ENERGY_MARGIN_FLOW_THROUGH
    };
    let revenue_offset = revenue.energy_margin * flow_through
        + revenue.ncp_demand_revenue * NCP_DEMAND_BENEFIT_SHARE
        + flexibility_credit;

    let net_impact = gross_cost - revenue_offset;

    let adjusted_allocation = if is_ercot {
        residential_allocation * ERCOT_ALLOCATION_SCALE
    } else {
        match utility.active_capacity_price() {
            Some(price) if price > HIGH_CAPACITY_PRICE_THRESHOLD => {
                let excess = (price - HIGH_CAPACITY_PRICE_THRESHOLD) / CAPACITY_PRICE_SCALE_SPAN;
                let scale = (1.0 + excess).min(MAX_CAPACITY_PRICE_ALLOCATION_SCALE);
                residential_allocation * scale
            }
            _ => residential_allocation,
        }
    };

    let residential_impact = net_impact * adjusted_allocation;
    let per_customer_monthly = residential_impact / residential_customers as f64 / MONTHS_PER_YEAR;

    debug!(
        market = %utility.market_type,
        annualized_infra_cost,
        capacity_cost,
        capacity_credit,
        revenue_offset,
        net_impact,
        adjusted_allocation,
        per_customer_monthly,
        "net residential impact"
    );

    ImpactResult {
        per_customer_monthly,
        gross_cost,
        revenue_offset,
        net_impact,
        residential_impact,
        market_type: utility.market_type,
        adjusted_allocation,
        capacity_credit,
        is_flexible,
    }
}
