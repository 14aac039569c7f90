use serde::{Deserialize, Serialize};

// =========================================================
// Pulse types
// =========================================================

/// Fixed-width value range and the number of contributions in it.
///
/// Ranges are half-open except the last, which includes the scale maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseSummary {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub buckets: Vec<DistributionBucket>,
}
