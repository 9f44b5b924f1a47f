//! PQLens Report Processing
//!
//! Extraction engine for power-quality harmonic distortion reports: locates
//! the four harmonic table sections across a multi-page document, extracts
//! candidate rows from structured tables with a layered regex fallback over
//! the raw text, normalizes and range-validates them, splits them by
//! time-limit percentile and harmonic parity, flags regulatory violations,
//! and emits highlighted spreadsheets plus a delimited violation report.
//!
//! The sole contract with the PDF-parsing collaborator is
//! [`document::SourceDocument`]: per-page plain text, per-page structured
//! tables and a page count. The engine never re-parses raw bytes itself.

pub mod document;
pub mod emitter;
pub mod locator;
pub mod metadata;
pub mod normalizer;
pub mod pipeline;
pub mod row_extractor;
pub mod splitter;
pub mod summary;
pub mod violations;

pub use document::{Page, SourceDocument, StructuredTable};
pub use emitter::ReportEmitter;
pub use locator::{PageSection, TableLocator};
pub use normalizer::{normalize_table, NormalizationSummary, NormalizedTable};
pub use pipeline::{DocumentProcessor, ProcessedDocument};
pub use row_extractor::{RowExtractor, TableData};
pub use splitter::split_table;
pub use summary::{extract_weekly_summary, is_weekly_report, WeeklySummary};
pub use violations::{analyze_all, analyze_table, write_violation_csv};
