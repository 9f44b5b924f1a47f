//! Percentile and parity split of a normalized table.

use pqlens_models::{HarmonicRow, SplitTable};

/// Splits normalized rows into the four reporting subsets: 95th and 99th
/// percentile, each partitioned into odd and even harmonic orders. Rows
/// whose percentile is neither exactly 95 nor exactly 99 belong to no
/// subset. Each subset is sorted by ascending harmonic order.
pub fn split_table(rows: &[HarmonicRow]) -> SplitTable {
    let mut split = SplitTable::default();

    for row in rows {
        let bucket = if row.percentile == 95.0 {
            if row.is_odd() {
                &mut split.p95_odd
            } else {
                &mut split.p95_even
            }
        } else if row.percentile == 99.0 {
            if row.is_odd() {
                &mut split.p99_odd
            } else {
                &mut split.p99_even
            }
        } else {
            continue;
        };
        bucket.push(row.clone());
    }

    split.p95_odd.sort_by_key(|r| r.harmonic);
    split.p95_even.sort_by_key(|r| r.harmonic);
    split.p99_odd.sort_by_key(|r| r.harmonic);
    split.p99_even.sort_by_key(|r| r.harmonic);

    split
}
