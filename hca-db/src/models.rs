//! Query result model structs.
//!
//! All structs derive `Serialize` so the route layer can return them as
//! JSON without an intermediate conversion.

use serde::Serialize;

/// A single dated temperature reading.
///
/// Produced for the most-active station's recent observations; rows with a
/// NULL temperature are excluded at query time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TobsReading {
    /// Observation date (YYYY-MM-DD).
    pub date: String,
    /// Observed temperature in degrees Fahrenheit.
    pub temperature: f64,
}

/// Aggregate temperature statistics over a date range.
///
/// All three fields are `None` when the range matched zero rows with a
/// non-NULL temperature; callers decide how to surface that.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TempStats {
    /// Lowest temperature in the range.
    pub min: Option<f64>,
    /// Highest temperature in the range.
    pub max: Option<f64>,
    /// Arithmetic mean temperature over the range.
    pub avg: Option<f64>,
}

impl TempStats {
    /// True when the underlying query matched no temperature rows.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.avg.is_none()
    }
}
