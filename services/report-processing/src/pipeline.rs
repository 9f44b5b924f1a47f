//! Document processing pipeline.
//!
//! Wires the stages together for one document: metadata, section location,
//! row extraction with reconciliation, normalization, violation analysis
//! and the optional weekly summary. Stateless across documents; batch
//! callers isolate failures per document.

use std::path::Path;
use std::time::Duration;

use pqlens_models::{Report, SplitTable, TableKind, Violation};
use pqlens_utils::{AppConfig, PqResult};

use crate::document::SourceDocument;
use crate::locator::TableLocator;
use crate::metadata::extract_metadata;
use crate::normalizer::{normalize_table, NormalizedTable};
use crate::row_extractor::{RowExtractor, TableData};
use crate::splitter::split_table;
use crate::summary::{extract_weekly_summary, is_weekly_report, WeeklySummary};
use crate::violations::analyze_all;

/// Everything extracted from one source document.
#[derive(Debug)]
pub struct ProcessedDocument {
    pub report: Report,
    pub tables: Vec<NormalizedTable>,
    pub violations: Vec<Violation>,
    pub weekly: Option<WeeklySummary>,
}

impl ProcessedDocument {
    /// Splits every table for per-document emission, in the fixed kind
    /// order.
    pub fn splits(&self) -> Vec<(TableKind, SplitTable)> {
        self.tables
            .iter()
            .map(|t| (t.kind, split_table(&t.rows)))
            .collect()
    }
}

pub struct DocumentProcessor {
    config: AppConfig,
    extractor: RowExtractor,
}

impl DocumentProcessor {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            extractor: RowExtractor::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Opens a PDF under the configured timeout and processes it.
    pub fn process_path(&self, path: &Path) -> PqResult<ProcessedDocument> {
        let timeout = Duration::from_secs(self.config.processing.document_open_timeout_secs);
        let doc = SourceDocument::open_pdf(path, timeout)?;
        Ok(self.process(&doc))
    }

    /// Processes an already-loaded document. Extraction never fails a
    /// document: sparse metadata and empty tables flow through as empty
    /// results.
    pub fn process(&self, doc: &SourceDocument) -> ProcessedDocument {
        let report = extract_metadata(&doc.name, doc.first_page_text());
        let data = self.collect_tables(doc);

        let tables: Vec<NormalizedTable> = TableKind::ALL
            .iter()
            .filter(|kind| !data.rows(**kind).is_empty())
            .map(|kind| normalize_table(*kind, data.rows(*kind)))
            .collect();

        let violations = analyze_all(&tables);

        let weekly = if is_weekly_report(&doc.name) {
            Some(extract_weekly_summary(doc, &report, &self.config.output))
        } else {
            None
        };

        tracing::info!(
            document = %doc.name,
            tables = tables.len(),
            rows = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
            violations = violations.len(),
            weekly = weekly.is_some(),
            "processed document"
        );

        ProcessedDocument {
            report,
            tables,
            violations,
            weekly,
        }
    }

    /// Runs the section locator over the page sequence and both extraction
    /// strategies over every active page.
    fn collect_tables(&self, doc: &SourceDocument) -> TableData {
        let mut data = TableData::new();
        let mut locator = TableLocator::new(&self.config.boundaries);
        let skip = self.config.processing.skip_leading_pages;

        for page in doc.pages.iter().skip(skip) {
            let section = match locator.observe_page(&page.text) {
                Some(s) => s,
                None => continue,
            };

            let structured = self.extractor.extract_structured(&page.tables);
            data.add_structured(section.kind, structured);

            let span = page
                .text
                .get(section.text_range.clone())
                .unwrap_or(&page.text);
            let text_rows = self.extractor.extract_from_text(span);
            data.add_text(section.kind, text_rows);
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> DocumentProcessor {
        DocumentProcessor::new(AppConfig::default())
    }

    fn table_page(header: &str, rows: &[(u32, f64)]) -> String {
        let mut page = format!("{header}\nN [%] Reg Max[%]\n");
        for (harmonic, measured) in rows {
            page.push_str(&format!(
                "{harmonic} 99 5.0 {measured} 1.0 1.0 Pass(1%) Pass(1%) Pass(1%)\n"
            ));
        }
        page
    }

    #[test]
    fn test_end_to_end_voltage_table() {
        let rows: Vec<(u32, f64)> = (2..=10).map(|h| (h, 1.2)).collect();
        let pages = vec![
            "cover page, skipped".to_string(),
            table_page("Harmonic Voltage Full Time Range", &rows[..5]),
            table_page("more rows", &rows[5..]).replace("more rows\n", ""),
            "SUMMARY trailing section".to_string(),
        ];
        let doc = SourceDocument::from_texts("Day 1 Day (TATA Block-15).pdf", pages);
        let processed = processor().process(&doc);

        assert_eq!(processed.tables.len(), 1);
        let table = &processed.tables[0];
        assert_eq!(table.kind, TableKind::VoltageFullRange);
        assert_eq!(table.rows.len(), 9);

        let splits = processed.splits();
        let (_, split) = &splits[0];
        let odd: Vec<u32> = split.p99_odd.iter().map(|r| r.harmonic).collect();
        assert_eq!(odd, vec![3, 5, 7, 9]);
        let even: Vec<u32> = split.p99_even.iter().map(|r| r.harmonic).collect();
        assert_eq!(even, vec![2, 4, 6, 8, 10]);

        assert!(processed.violations.is_empty());
        assert!(processed.weekly.is_none());
        assert_eq!(processed.report.block.as_deref(), Some("15"));
    }

    #[test]
    fn test_first_page_never_extracted() {
        let pages = vec![
            table_page("Harmonic Voltage Full Time Range", &[(3, 1.0)]),
            "nothing here".to_string(),
        ];
        let doc = SourceDocument::from_texts("report.pdf", pages);
        let processed = processor().process(&doc);
        assert!(processed.tables.is_empty());
    }

    #[test]
    fn test_violation_flows_through() {
        let pages = vec![
            "cover".to_string(),
            table_page("Harmonic Current Daily", &[(5, 8.2)]),
        ];
        let doc = SourceDocument::from_texts("Day 2 Night.pdf", pages);
        let processed = processor().process(&doc);

        assert_eq!(processed.violations.len(), 1);
        let v = &processed.violations[0];
        assert_eq!(v.harmonic, 5);
        assert_eq!(v.phase, "I1");
        assert!((v.exceedance - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_document_carries_summary() {
        let pages = vec!["cover".to_string(), "no tables".to_string()];
        let doc = SourceDocument::from_texts("7 Days report (TATA).pdf", pages);
        let processed = processor().process(&doc);

        let weekly = processed.weekly.expect("weekly summary");
        assert_eq!(weekly.time_table.len(), 15);
    }
}
