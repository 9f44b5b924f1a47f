use serde::{Deserialize, Serialize};

use crate::table::TableKind;

/// One measured phase value exceeding its declared regulatory maximum.
///
/// Produced only for strict exceedance (`measured > allowed`). Ephemeral:
/// recomputed per request, never persisted independently of its source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Harmonic index of the offending row.
    pub harmonic: u32,
    /// Phase identifier, `V1N`/`V2N`/`V3N` or `I1`/`I2`/`I3`.
    pub phase: String,
    /// Time-limit percentile of the row.
    pub time_limit: f64,
    /// Declared regulatory maximum, percent.
    pub allowed: f64,
    /// Measured value, percent.
    pub measured: f64,
    /// `measured - allowed`, percent.
    pub exceedance: f64,
    /// Table the violation was found in.
    pub table: TableKind,
}

impl Violation {
    /// Sorts violations for reporting: exceedance descending, then harmonic
    /// index descending.
    pub fn sort_for_report(violations: &mut [Violation]) {
        violations.sort_by(|a, b| {
            b.exceedance
                .partial_cmp(&a.exceedance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.harmonic.cmp(&a.harmonic))
        });
    }
}
