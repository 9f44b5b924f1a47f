//! Candidate row extraction for an active table section.
//!
//! Two independent strategies run for every page of an active section:
//! structured table objects, and a layered regex fallback over the section
//! text. Structured rows always win the reconciliation; text rows only fill
//! harmonic indices the structured pass did not produce. This covers the
//! common case where table borders are lost in text extraction but table
//! objects survive, while still handling pages with no detected table at
//! all.

use std::collections::HashMap;

use regex::Regex;

use pqlens_models::{is_valid_harmonic, RawRow, TableKind};

use crate::document::StructuredTable;

/// How a fallback pattern's capture groups map onto the nine-field schema.
///
/// The patterns encode a fuzzy-matching precedence policy: the most
/// complete structural match for a harmonic index wins, so they are
/// evaluated in order and later patterns never overwrite an index an
/// earlier one produced.
#[derive(Debug, Clone, Copy)]
enum PatternShape {
    /// Explicit `Pass(x%)` / `Fail(x%)` markers for all three phases.
    WithResults,
    /// Bare parenthesized percentages; markers assumed `Pass`.
    BareParens,
    /// Measurements only; result fields filled with `N/A`.
    MeasurementsOnly,
}

struct TextPattern {
    regex: Regex,
    shape: PatternShape,
}

pub struct RowExtractor {
    patterns: Vec<TextPattern>,
    whitespace: Regex,
    result_spacing: Regex,
}

impl Default for RowExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RowExtractor {
    pub fn new() -> Self {
        let number = r"([\d.]+)\s*,?\s*";
        let with_results = format!(
            r"(?i)(\d+)\s*,?\s*(\d+)\s*,?\s*{number}{number}{number}{number}(Pass|Fail)\s*\(([\d.%]+)\)\s*,?\s*(Pass|Fail)\s*\(([\d.%]+)\)\s*,?\s*(Pass|Fail)\s*\(([\d.%]+)\)"
        );
        let bare_parens = format!(
            r"(?i)(\d+)\s*,?\s*(\d+)\s*,?\s*{number}{number}{number}{number}\(([\d.%]+)\)\s*,?\s*\(([\d.%]+)\)\s*,?\s*\(([\d.%]+)\)"
        );
        let measurements_only =
            format!(r"(?i)(\d+)\s*,?\s*(\d+)\s*,?\s*{number}{number}{number}([\d.]+)");

        let patterns = vec![
            TextPattern {
                regex: Regex::new(&with_results).unwrap(),
                shape: PatternShape::WithResults,
            },
            TextPattern {
                regex: Regex::new(&bare_parens).unwrap(),
                shape: PatternShape::BareParens,
            },
            TextPattern {
                regex: Regex::new(&measurements_only).unwrap(),
                shape: PatternShape::MeasurementsOnly,
            },
        ];

        Self {
            patterns,
            whitespace: Regex::new(r"\s+").unwrap(),
            result_spacing: Regex::new(r"(?i)(Pass|Fail)\s*\(\s*([\d.%]+)\s*\)").unwrap(),
        }
    }

    /// Extracts candidate rows from the structured table objects of a page.
    ///
    /// A row is a candidate when its first cell is a pure digit string that
    /// passes the harmonic range filter; the first nine cells become the raw
    /// fields and anything beyond the schema width is ignored. Rows narrower
    /// than the schema are skipped entirely so they never claim a harmonic
    /// index the text fallback could still supply in full.
    pub fn extract_structured(&self, tables: &[StructuredTable]) -> Vec<RawRow> {
        let mut rows = Vec::new();

        for table in tables {
            if table.len() <= 1 {
                continue;
            }
            for cells in table {
                let first = match cells.first().and_then(|c| c.as_deref()) {
                    Some(c) => c.trim(),
                    None => continue,
                };
                if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
                    continue;
                }
                let harmonic: i64 = match first.parse() {
                    Ok(h) => h,
                    Err(_) => continue, // overflows are noise, not data
                };
                if harmonic == 1 || !is_valid_harmonic(harmonic) {
                    continue;
                }
                if cells.len() < 9 {
                    continue;
                }

                let mut fields: [String; 9] = Default::default();
                for (field, cell) in fields.iter_mut().zip(cells.iter()) {
                    *field = cell.as_deref().unwrap_or("").trim().to_string();
                }
                rows.push(RawRow::new(fields));
            }
        }

        rows
    }

    /// Extracts candidate rows from section text via the layered patterns.
    ///
    /// Repeated whitespace is collapsed and `Pass ( x )` spacing normalized
    /// before matching. Patterns run in order; the first one to match a
    /// harmonic index claims it.
    pub fn extract_from_text(&self, text: &str) -> Vec<RawRow> {
        let text = self.whitespace.replace_all(text, " ");
        let text = self.result_spacing.replace_all(&text, "$1($2)");

        let mut rows: Vec<RawRow> = Vec::new();
        let mut claimed: std::collections::HashSet<u32> = std::collections::HashSet::new();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(&text) {
                let harmonic: i64 = match caps[1].parse() {
                    Ok(h) => h,
                    Err(_) => continue,
                };
                if harmonic == 1 || !is_valid_harmonic(harmonic) {
                    continue;
                }
                let harmonic = harmonic as u32;
                if claimed.contains(&harmonic) {
                    continue;
                }

                let results = match pattern.shape {
                    PatternShape::WithResults => [
                        format!("{}({})", &caps[7], &caps[8]),
                        format!("{}({})", &caps[9], &caps[10]),
                        format!("{}({})", &caps[11], &caps[12]),
                    ],
                    PatternShape::BareParens => [
                        format!("Pass({})", &caps[7]),
                        format!("Pass({})", &caps[8]),
                        format!("Pass({})", &caps[9]),
                    ],
                    PatternShape::MeasurementsOnly => [
                        "N/A".to_string(),
                        "N/A".to_string(),
                        "N/A".to_string(),
                    ],
                };

                let fields = [
                    harmonic.to_string(),
                    caps[2].to_string(),
                    caps[3].to_string(),
                    caps[4].to_string(),
                    caps[5].to_string(),
                    caps[6].to_string(),
                    results[0].clone(),
                    results[1].clone(),
                    results[2].clone(),
                ];

                claimed.insert(harmonic);
                rows.push(RawRow::new(fields));
            }
        }

        rows
    }
}

/// Accumulated raw rows per table kind for one document, with the
/// structured-over-text reconciliation rule.
#[derive(Debug, Default)]
pub struct TableData {
    tables: HashMap<TableKind, Vec<RawRow>>,
}

impl TableData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts structured-extraction rows unconditionally; duplicates are
    /// collapsed later by the normalizer (first-seen wins).
    pub fn add_structured(&mut self, kind: TableKind, rows: Vec<RawRow>) {
        self.tables.entry(kind).or_default().extend(rows);
    }

    /// Inserts text-fallback rows only for harmonic indices not already
    /// present for this table, so structured data always takes precedence.
    ///
    /// The merge key is the harmonic index alone, not (index, percentile) —
    /// a known ambiguity of the source behavior, preserved deliberately.
    pub fn add_text(&mut self, kind: TableKind, rows: Vec<RawRow>) {
        let existing = self.tables.entry(kind).or_default();
        let present: std::collections::HashSet<u32> = existing
            .iter()
            .filter_map(|r| r.harmonic_index())
            .collect();
        for row in rows {
            match row.harmonic_index() {
                Some(h) if !present.contains(&h) => existing.push(row),
                _ => {}
            }
        }
    }

    pub fn rows(&self, kind: TableKind) -> &[RawRow] {
        self.tables.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|v| v.is_empty())
    }
}
