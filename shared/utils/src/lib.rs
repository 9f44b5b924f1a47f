pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

#[cfg(test)]
mod tests {
    use super::*;
    use pqlens_models::TableKind;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.processing.document_open_timeout_secs, 30);
        assert_eq!(config.output.max_sheet_name_len, 31);
        assert_eq!(config.processing.skip_leading_pages, 1);
    }

    #[test]
    fn test_boundary_tables() {
        let boundaries = SectionBoundaries::default();
        let daily = boundaries.rule(TableKind::CurrentDaily);
        assert!(daily.terminators.iter().any(|t| t == "FLICKER SEVERITY"));
        assert_eq!(daily.exception_markers, vec!["HARMONIC 5:".to_string()]);
        assert!(boundaries
            .rule(TableKind::VoltageFullRange)
            .exception_markers
            .is_empty());
    }

    #[test]
    fn test_error_handling() {
        let error = PqError::coercion("N", "not numeric");
        assert_eq!(error.error_code(), "COERCION_ERROR");
        assert!(!error.is_document_fatal());
        assert!(PqError::document("a.pdf", "corrupt").is_document_fatal());
    }
}
