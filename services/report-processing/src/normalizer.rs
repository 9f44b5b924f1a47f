//! Validation and normalization of raw candidate rows.
//!
//! Filters run in a fixed order: harmonic coercion, fundamental exclusion,
//! range check, duplicate collapse, then numeric coercion. Each drop is
//! counted so a document-level summary can report how much of the expected
//! harmonic range actually survived.

use std::collections::HashSet;

use pqlens_models::{
    is_valid_harmonic, HarmonicRow, RawRow, TableKind, HARMONIC_MAX, HARMONIC_MIN,
};

/// One validated table with its extraction accounting.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub kind: TableKind,
    pub rows: Vec<HarmonicRow>,
    pub summary: NormalizationSummary,
}

/// Accounting for one table's normalization pass.
#[derive(Debug, Clone, Default)]
pub struct NormalizationSummary {
    pub input_rows: usize,
    pub kept: usize,
    pub dropped_index: usize,
    pub dropped_range: usize,
    pub dropped_duplicate: usize,
    pub dropped_coercion: usize,
    /// Harmonic orders in the expected range with no surviving row.
    pub missing: Vec<u32>,
}

/// Validates and normalizes the raw rows of one table.
///
/// Duplicates are keyed on (harmonic, raw percentile text) and the first
/// occurrence wins, which preserves the structured-over-text insertion
/// order established upstream.
pub fn normalize_table(kind: TableKind, raw: &[RawRow]) -> NormalizedTable {
    let mut summary = NormalizationSummary {
        input_rows: raw.len(),
        ..Default::default()
    };
    let mut seen: HashSet<(u32, String)> = HashSet::new();
    let mut rows = Vec::new();

    for row in raw {
        let harmonic = match row.harmonic_index() {
            Some(h) => h,
            None => {
                summary.dropped_index += 1;
                continue;
            }
        };
        if harmonic == 1 {
            summary.dropped_index += 1;
            continue;
        }
        if !is_valid_harmonic(harmonic as i64) {
            summary.dropped_range += 1;
            continue;
        }
        if !seen.insert((harmonic, row.percentile_field().to_string())) {
            summary.dropped_duplicate += 1;
            continue;
        }

        match coerce(harmonic, row) {
            Some(normalized) => rows.push(normalized),
            None => summary.dropped_coercion += 1,
        }
    }

    summary.kept = rows.len();
    let found: HashSet<u32> = rows.iter().map(|r| r.harmonic).collect();
    summary.missing = (HARMONIC_MIN..=HARMONIC_MAX)
        .filter(|h| !found.contains(h))
        .collect();

    if summary.kept < summary.input_rows {
        tracing::debug!(
            table = %kind,
            input = summary.input_rows,
            kept = summary.kept,
            "normalization dropped rows"
        );
    }
    if !summary.missing.is_empty() {
        tracing::warn!(
            table = %kind,
            missing = summary.missing.len(),
            "harmonic orders absent after normalization"
        );
    }

    NormalizedTable {
        kind,
        rows,
        summary,
    }
}

fn coerce(harmonic: u32, row: &RawRow) -> Option<HarmonicRow> {
    let percentile: f64 = row.fields[1].trim().parse().ok()?;
    let reg_max: f64 = row.fields[2].trim().parse().ok()?;
    let measured = [
        row.fields[3].trim().parse().ok()?,
        row.fields[4].trim().parse().ok()?,
        row.fields[5].trim().parse().ok()?,
    ];
    Some(HarmonicRow {
        harmonic,
        percentile,
        reg_max,
        measured,
        results: [
            row.fields[6].clone(),
            row.fields[7].clone(),
            row.fields[8].clone(),
        ],
    })
}
