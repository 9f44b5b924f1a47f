//! Spreadsheet emission.
//!
//! Two workbook layouts: a per-document workbook with one sheet per
//! (table kind, percentile, parity) subset, and a batch workbook that packs
//! one full-table sheet per (document, kind) pair under short
//! filename-derived prefixes. Failing measurements are highlighted in both.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use pqlens_models::{HarmonicRow, SplitTable, TableKind};
use pqlens_utils::{OutputConfig, PqResult};

use crate::normalizer::NormalizedTable;

const FAIL_FILL: u32 = 0xFFC7CE;
const FAIL_FONT: u32 = 0x9C0006;
const HARMONIC_FILL: u32 = 0xFFEB9C;

pub struct ReportEmitter<'a> {
    output: &'a OutputConfig,
    fail_format: Format,
    harmonic_format: Format,
}

impl<'a> ReportEmitter<'a> {
    pub fn new(output: &'a OutputConfig) -> Self {
        Self {
            output,
            fail_format: Format::new()
                .set_background_color(Color::RGB(FAIL_FILL))
                .set_font_color(Color::RGB(FAIL_FONT))
                .set_bold(),
            harmonic_format: Format::new().set_background_color(Color::RGB(HARMONIC_FILL)),
        }
    }

    /// Writes the per-document workbook: one sheet per non-empty split
    /// subset, named `H_<circuit><range>_<percentile>_<parity>`.
    pub fn write_document_workbook(
        &self,
        path: &Path,
        splits: &[(TableKind, SplitTable)],
    ) -> PqResult<()> {
        let mut workbook = self.build_document_workbook(splits)?;
        workbook.save(path)?;
        tracing::info!(path = %path.display(), "wrote document workbook");
        Ok(())
    }

    /// In-memory variant of [`write_document_workbook`].
    pub fn document_workbook_buffer(
        &self,
        splits: &[(TableKind, SplitTable)],
    ) -> PqResult<Vec<u8>> {
        let mut workbook = self.build_document_workbook(splits)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build_document_workbook(
        &self,
        splits: &[(TableKind, SplitTable)],
    ) -> PqResult<Workbook> {
        let mut workbook = Workbook::new();
        let mut used = HashSet::new();
        let mut sheets = 0usize;

        for (kind, split) in splits {
            for (percentile, parity, rows) in split.subsets() {
                if rows.is_empty() {
                    continue;
                }
                let base = format!(
                    "H_{}{}_{}_{}",
                    kind.circuit_code(),
                    kind.range_code(),
                    percentile,
                    parity
                );
                let name = self.unique_sheet_name(&base, &mut used);
                let sheet = workbook.add_worksheet();
                sheet.set_name(name)?;
                self.write_table(sheet, 0, *kind, rows)?;
                sheets += 1;
            }
        }

        if sheets == 0 {
            // An all-empty document still yields a readable workbook.
            workbook.add_worksheet().set_name("Empty")?;
        }

        Ok(workbook)
    }

    /// Writes the batch workbook: for every document, one sheet per
    /// non-empty table kind holding the full normalized table. The first
    /// row names the source file, so truncated sheet prefixes stay
    /// traceable.
    pub fn write_batch_workbook(
        &self,
        path: &Path,
        documents: &[(String, Vec<NormalizedTable>)],
    ) -> PqResult<()> {
        let mut workbook = self.build_batch_workbook(documents)?;
        workbook.save(path)?;
        tracing::info!(
            path = %path.display(),
            documents = documents.len(),
            "wrote batch workbook"
        );
        Ok(())
    }

    /// In-memory variant of [`write_batch_workbook`].
    pub fn batch_workbook_buffer(
        &self,
        documents: &[(String, Vec<NormalizedTable>)],
    ) -> PqResult<Vec<u8>> {
        let mut workbook = self.build_batch_workbook(documents)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build_batch_workbook(
        &self,
        documents: &[(String, Vec<NormalizedTable>)],
    ) -> PqResult<Workbook> {
        let mut workbook = Workbook::new();
        let mut used = HashSet::new();
        let mut sheets = 0usize;

        for (file_name, tables) in documents {
            let prefix = sheet_prefix(file_name);
            for table in tables {
                if table.rows.is_empty() {
                    continue;
                }
                let base = format!("{prefix}_H_{}", table.kind.abbreviation());
                let name = self.unique_sheet_name(&base, &mut used);
                let sheet = workbook.add_worksheet();
                sheet.set_name(name)?;
                sheet.write_string(0, 0, format!("File: {file_name}"))?;
                self.write_table(sheet, 1, table.kind, &table.rows)?;
                sheets += 1;
            }
        }

        if sheets == 0 {
            workbook.add_worksheet().set_name("Empty")?;
        }

        Ok(workbook)
    }

    /// Writes headers at `first_row` and data below, highlighting failing
    /// phase measurements and the harmonic cell of any failing row.
    fn write_table(
        &self,
        sheet: &mut Worksheet,
        first_row: u32,
        kind: TableKind,
        rows: &[HarmonicRow],
    ) -> PqResult<()> {
        for (col, header) in kind.column_headers().iter().enumerate() {
            sheet.write_string(first_row, col as u16, header)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = first_row + 1 + i as u32;
            let fails = phase_failures(row);

            if fails.iter().any(|f| *f) {
                sheet.write_number_with_format(r, 0, row.harmonic, &self.harmonic_format)?;
            } else {
                sheet.write_number(r, 0, row.harmonic)?;
            }
            sheet.write_number(r, 1, row.percentile)?;
            sheet.write_number(r, 2, row.reg_max)?;

            for (p, &measured) in row.measured.iter().enumerate() {
                let col = 3 + p as u16;
                if fails[p] {
                    sheet.write_number_with_format(r, col, measured, &self.fail_format)?;
                } else {
                    sheet.write_number(r, col, measured)?;
                }
            }
            for (p, result) in row.results.iter().enumerate() {
                sheet.write_string(r, 6 + p as u16, result)?;
            }
        }

        Ok(())
    }

    /// Truncates to the sheet-name limit, then resolves collisions with a
    /// numeric suffix, re-truncating the base so the suffix always fits.
    fn unique_sheet_name(&self, base: &str, used: &mut HashSet<String>) -> String {
        let max = self.output.max_sheet_name_len;
        let candidate = truncate_chars(base, max);
        if used.insert(candidate.clone()) {
            return candidate;
        }

        for n in 1.. {
            let suffix = format!("_{n}");
            let head = truncate_chars(base, max.saturating_sub(suffix.len()));
            let candidate = format!("{head}{suffix}");
            if used.insert(candidate.clone()) {
                return candidate;
            }
        }
        unreachable!()
    }
}

/// A phase fails when its measurement strictly exceeds the regulatory
/// maximum or its result annotation says so.
fn phase_failures(row: &HarmonicRow) -> [bool; 3] {
    let mut fails = [false; 3];
    for (i, fail) in fails.iter_mut().enumerate() {
        *fail = (row.reg_max.is_finite() && row.measured[i] > row.reg_max)
            || row.results[i].starts_with("Fail");
    }
    fails
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Derives the short sheet prefix for a document in the batch workbook.
///
/// `"7"` together with `"DAY"` anywhere in the name means a weekly report;
/// `Day <n> Day/Night` names compress to `<n>D`/`<n>N`; a bare `Day <n>`
/// becomes `<n>D`; anything else falls back to the first four word
/// characters of the stem, original case preserved.
pub fn sheet_prefix(file_name: &str) -> String {
    let upper = file_name.to_uppercase();

    if upper.contains('7') && upper.contains("DAY") {
        return "7Days".to_string();
    }

    let day_period = Regex::new(r"DAY\s*(\d+)\s*(DAY|NIGHT)").unwrap();
    if let Some(caps) = day_period.captures(&upper) {
        let code = if &caps[2] == "DAY" { 'D' } else { 'N' };
        return format!("{}{code}", &caps[1]);
    }

    let day_only = Regex::new(r"DAY\s*(\d+)").unwrap();
    if let Some(caps) = day_only.captures(&upper) {
        return format!("{}D", &caps[1]);
    }

    let stem = file_name
        .strip_suffix(".pdf")
        .or_else(|| file_name.strip_suffix(".PDF"))
        .unwrap_or(file_name);
    stem.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .take(4)
        .collect()
}
