use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error taxonomy for the extraction pipeline.
///
/// Extraction and metadata errors are absorbed close to where they occur
/// (empty result / sentinel); coercion errors drop a single row; document
/// errors are surfaced per document and, in batch mode, never abort the
/// remaining documents.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PqError {
    #[error("Extraction error: {message}")]
    Extraction { message: String },

    #[error("Coercion error: {field} - {message}")]
    Coercion { field: String, message: String },

    #[error("Metadata error: {message}")]
    Metadata { message: String },

    #[error("Document error: {name} - {message}")]
    Document { name: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Spreadsheet error: {message}")]
    Spreadsheet { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl PqError {
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn coercion(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Coercion {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    pub fn document(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Document {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn spreadsheet(message: impl Into<String>) -> Self {
        Self::Spreadsheet {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::Coercion { .. } => "COERCION_ERROR",
            Self::Metadata { .. } => "METADATA_ERROR",
            Self::Document { .. } => "DOCUMENT_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Spreadsheet { .. } => "SPREADSHEET_ERROR",
            Self::Io { .. } => "IO_ERROR",
        }
    }

    /// True for errors that abort processing of a whole document.
    pub fn is_document_fatal(&self) -> bool {
        matches!(self, Self::Document { .. } | Self::Io { .. })
    }
}

pub type PqResult<T> = Result<T, PqError>;

// Conversion from common error types

impl From<std::io::Error> for PqError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for PqError {
    fn from(error: csv::Error) -> Self {
        Self::spreadsheet(error.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for PqError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::spreadsheet(error.to_string())
    }
}

impl From<config::ConfigError> for PqError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

impl From<serde_json::Error> for PqError {
    fn from(error: serde_json::Error) -> Self {
        Self::coercion("JSON", error.to_string())
    }
}
