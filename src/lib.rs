//! Residential bill impact projections for large data center loads.
//!
//! Projects average residential electricity bills under four scenarios: no
//! data center, firm data center load, flexible load that curtails at system
//! peak, and flexible load backed by onsite generation.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod utilities;
