//! Residential cost allocation model.

use serde::Serialize;
use tracing::warn;

use crate::model::constants::{
    CUSTOMER_WEIGHT, DEMAND_WEIGHT, HOURS_PER_YEAR, LOAD_RAMP_YEARS, MAX_RESIDENTIAL_ALLOCATION,
    MIN_RESIDENTIAL_ALLOCATION, MWH_PER_GWH, REGULATORY_LAG_YEARS, RESIDENTIAL_PEAK_SHARE,
    VOLUMETRIC_WEIGHT,
};
use crate::model::profile::UtilityProfile;

/// Residential share of utility costs for one projection year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationResult {
    /// Blended, lag-adjusted, clamped residential allocation.
    pub allocation: f64,
    /// Residential share of post-data-center system energy.
    pub volumetric_share: f64,
    /// Residential share of post-data-center system peak.
    pub demand_share: f64,
    /// Residential share of customer count.
    pub customer_share: f64,
}

/// Linear 0→1 ramp over `span` years.
fn ramp(years_online: u32, span: f64) -> f64 {
    (f64::from(years_online) / span).min(1.0)
}

/// Computes the residential allocation after `years_online` years of data center operation.
///
/// The data center's energy and peak contribution ramp in over three years;
/// the blended share then replaces the utility's base allocation over a
/// five-year regulatory lag. The result is clamped to `[0.15, 0.50]`.
pub fn compute_residential_allocation(
    utility: &UtilityProfile,
    dc_capacity_mw: f64,
    dc_load_factor: f64,
    dc_peak_coincidence: f64,
    years_online: u32,
) -> AllocationResult {
    let phase_in_factor = ramp(years_online, LOAD_RAMP_YEARS);

    let pre_dc_system_energy_mwh = utility.pre_dc_system_energy_gwh * MWH_PER_GWH;
    let residential_energy_mwh = pre_dc_system_energy_mwh * utility.residential_energy_share;
    let dc_annual_energy_mwh = dc_capacity_mw * dc_load_factor * HOURS_PER_YEAR;
    let post_dc_system_energy_mwh =
        pre_dc_system_energy_mwh + dc_annual_energy_mwh * phase_in_factor;
    let volumetric_share = residential_energy_mwh / post_dc_system_energy_mwh;

    let residential_peak_mw = utility.system_peak_mw * RESIDENTIAL_PEAK_SHARE;
    let post_dc_peak_mw =
        utility.system_peak_mw + dc_capacity_mw * dc_peak_coincidence * phase_in_factor;
    let demand_share = residential_peak_mw / post_dc_peak_mw;

    // +1 keeps the share finite for an all-zero customer base
    let customer_share =
        utility.residential_customers as f64 / (utility.total_customers() as f64 + 1.0);

    let weighted = volumetric_share * VOLUMETRIC_WEIGHT
        + demand_share * DEMAND_WEIGHT
        + customer_share * CUSTOMER_WEIGHT;

    let lag = ramp(years_online, REGULATORY_LAG_YEARS);
    let adjusted = utility.base_residential_allocation * (1.0 - lag) + weighted * lag;
    let allocation = adjusted.clamp(MIN_RESIDENTIAL_ALLOCATION, MAX_RESIDENTIAL_ALLOCATION);
    if allocation != adjusted {
        warn!(
            adjusted,
            allocation, years_online, "residential allocation clamped"
        );
    }

    AllocationResult {
        allocation,
        volumetric_share,
        demand_share,
        customer_share,
    }
}
