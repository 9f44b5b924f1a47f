use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel shown for identity fields the metadata extractor could not find.
/// Absence is recorded, never raised, so a document with sparse metadata is
/// still processed.
pub const NOT_FOUND: &str = "Not found";

/// Renders an optional metadata field, falling back to the sentinel.
pub fn field_or_not_found(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_FOUND)
}

/// Identity and time-window metadata for one source document, extracted from
/// the first page's free text and the filename. Immutable once extracted;
/// lifecycle ends with the enclosing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    /// Display name of the source file.
    pub file_name: String,
    /// Parenthesized component tag from the filename, e.g. `TATA Block-15 Bay-09`.
    pub component: Option<String>,
    /// Block number from filename or first page.
    pub block: Option<String>,
    /// Feeder/bay number from filename or first page.
    pub feeder: Option<String>,
    /// Operating company, matched against a fixed list.
    pub company: Option<String>,
    pub window: ReportWindow,
}

/// Declared measurement window and report format identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Start timestamp as printed, `dd-mm-yyyy hh:mm:ss AM/PM`.
    pub start_time: Option<String>,
    /// End timestamp as printed.
    pub end_time: Option<String>,
    /// GMT offset, `+hh:mm` or `-hh:mm`.
    pub gmt: Option<String>,
    /// Report format version.
    pub version: Option<String>,
    /// Free-form feeder name line.
    pub feeder_name: Option<String>,
    /// Nominal network voltage line.
    pub network_nominal: Option<String>,
}

impl Report {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            component: None,
            block: None,
            feeder: None,
            company: None,
            window: ReportWindow::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_rendering() {
        let report = Report::new("Day 1 Day.pdf");
        assert_eq!(field_or_not_found(&report.block), NOT_FOUND);
        assert_eq!(
            field_or_not_found(&Some("15".to_string())),
            "15"
        );
    }
}
