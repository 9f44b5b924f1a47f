use serde::{Deserialize, Serialize};

/// One day's total distortion reading (THD for voltage, TDD for current)
/// from a 7-day summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDistortion {
    /// Day label as printed, `dd-mm-yyyy`.
    pub day: String,
    /// Per-phase distortion, percent.
    pub phases: [f64; 3],
}

impl DailyDistortion {
    /// True when every phase is at or below `limit`. The daily compliance
    /// check is inclusive, unlike the per-harmonic violation check.
    pub fn within_limit(&self, limit: f64) -> bool {
        self.phases.iter().all(|v| *v <= limit)
    }
}

/// A daily distortion reading annotated with its recommended limit and a
/// compliance remark, as shown in the weekly summary tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRow {
    pub day: String,
    pub limit: f64,
    /// R/Y/B phase values, percent.
    pub phases: [f64; 3],
    pub remarks: String,
}

/// One power-quality event (swell, dip, interruption, transient) from the
/// event summary at the end of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: String,
    pub phase: String,
    pub start_time: String,
    pub duration: String,
    pub deviation: String,
}

/// One row of the generating/non-generating hours time table derived from
/// the report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub serial: usize,
    pub date_from: String,
    pub from: String,
    pub date_to: String,
    pub to: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_limit_is_inclusive() {
        let day = DailyDistortion {
            day: "14-05-2025".to_string(),
            phases: [7.5, 7.1, 6.9],
        };
        assert!(day.within_limit(7.5));
        assert!(!day.within_limit(7.0));
    }
}
