//! Regulatory violation analysis and the delimited violation report.

use std::io::Write;

use pqlens_models::{HarmonicRow, TableKind, Violation};
use pqlens_utils::PqResult;

use crate::normalizer::NormalizedTable;

/// Scans one table's normalized rows for measurements strictly above the
/// declared regulatory maximum. Equality is compliant. Rows whose limit did
/// not coerce to a finite number are skipped.
pub fn analyze_table(kind: TableKind, rows: &[HarmonicRow]) -> Vec<Violation> {
    let phases = kind.phase_labels();
    let mut violations = Vec::new();

    for row in rows {
        if !row.reg_max.is_finite() {
            continue;
        }
        for (phase, &measured) in phases.iter().zip(row.measured.iter()) {
            if measured > row.reg_max {
                violations.push(Violation {
                    harmonic: row.harmonic,
                    phase: phase.to_string(),
                    time_limit: row.percentile,
                    allowed: row.reg_max,
                    measured,
                    exceedance: measured - row.reg_max,
                    table: kind,
                });
            }
        }
    }

    violations
}

/// Analyzes every table of a document and returns the combined list sorted
/// by severity: exceedance descending, then harmonic order descending.
pub fn analyze_all(tables: &[NormalizedTable]) -> Vec<Violation> {
    let mut all: Vec<Violation> = tables
        .iter()
        .flat_map(|t| analyze_table(t.kind, &t.rows))
        .collect();
    Violation::sort_for_report(&mut all);

    if !all.is_empty() {
        tracing::info!(count = all.len(), "regulatory violations found");
    }
    all
}

/// Writes the violation report as CSV, one record per violating phase
/// measurement, in the order produced by [`analyze_all`].
pub fn write_violation_csv<W: Write>(writer: W, violations: &[Violation]) -> PqResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "Harmonic",
        "Phase",
        "Time Limit (%)",
        "Allowed (%)",
        "Measured (%)",
        "Exceedance (%)",
        "Table",
    ])?;

    for v in violations {
        csv.write_record([
            v.harmonic.to_string(),
            v.phase.clone(),
            format!("{}", v.time_limit),
            format!("{}", v.allowed),
            format!("{}", v.measured),
            format!("{:.4}", v.exceedance),
            v.table.display_name().to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
