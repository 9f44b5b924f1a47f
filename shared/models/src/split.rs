use serde::{Deserialize, Serialize};

use crate::row::HarmonicRow;

/// A validated table partitioned by time-limit percentile and harmonic
/// parity.
///
/// Read-only view: the four subsets are pairwise disjoint, each sorted
/// ascending by harmonic index. Rows whose percentile is neither 95 nor 99
/// appear in none of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitTable {
    pub p95_odd: Vec<HarmonicRow>,
    pub p95_even: Vec<HarmonicRow>,
    pub p99_odd: Vec<HarmonicRow>,
    pub p99_even: Vec<HarmonicRow>,
}

impl SplitTable {
    /// Subsets in emission order with their (percentile, parity) sheet codes.
    pub fn subsets(&self) -> [(&'static str, char, &Vec<HarmonicRow>); 4] {
        [
            ("95", 'O', &self.p95_odd),
            ("95", 'E', &self.p95_even),
            ("99", 'O', &self.p99_odd),
            ("99", 'E', &self.p99_even),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.p95_odd.is_empty()
            && self.p95_even.is_empty()
            && self.p99_odd.is_empty()
            && self.p99_even.is_empty()
    }

    pub fn len(&self) -> usize {
        self.p95_odd.len() + self.p95_even.len() + self.p99_odd.len() + self.p99_even.len()
    }
}
