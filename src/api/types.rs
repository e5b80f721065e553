//! API query and error types.

use serde::{Deserialize, Serialize};

/// Optional calendar-year range for the chart-row endpoint.
#[derive(Debug, Deserialize)]
pub struct YearRangeQuery {
    /// First year (inclusive).
    pub from: Option<u32>,
    /// Last year (inclusive).
    pub to: Option<u32>,
}

impl YearRangeQuery {
    /// Inclusive bounds with open ends filled in.
    pub fn bounds(&self) -> (u32, u32) {
        (self.from.unwrap_or(0), self.to.unwrap_or(u32::MAX))
    }
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
