use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use pqlens_models::TableKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub boundaries: SectionBoundaries,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Upper bound on PDF open + text extraction. Malformed documents can
    /// hang the parser, so the open runs on a helper thread with a deadline.
    pub document_open_timeout_secs: u64,
    /// Pages to skip before table location begins. The first page carries
    /// report metadata, not table sections.
    pub skip_leading_pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spreadsheet sheet-name limit; names are truncated to this length.
    pub max_sheet_name_len: usize,
    /// Daily voltage THD recommended limit, percent.
    pub voltage_daily_limit: f64,
    /// Daily current TDD recommended limit, percent.
    pub current_daily_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

/// Section boundary keywords per table kind.
///
/// Headers and terminators are configuration data rather than inline
/// conditionals so new report template variants can be added without
/// touching the locator state machine. `exception_markers` lists substrings
/// whose presence on a page suppresses a terminator hit for that kind — the
/// one known case is `HARMONIC 5:` inside a Harmonic Current Daily section,
/// which collides lexically with an unrelated marker but does not end the
/// table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionBoundaries {
    pub voltage_full_range: SectionRule,
    pub current_full_range: SectionRule,
    pub voltage_daily: SectionRule,
    pub current_daily: SectionRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRule {
    /// Uppercased keywords that end the section, checked in order.
    pub terminators: Vec<String>,
    /// Substrings that must never themselves be treated as a terminator
    /// match while this kind is active.
    pub exception_markers: Vec<String>,
}

impl SectionBoundaries {
    pub fn rule(&self, kind: TableKind) -> &SectionRule {
        match kind {
            TableKind::VoltageFullRange => &self.voltage_full_range,
            TableKind::CurrentFullRange => &self.current_full_range,
            TableKind::VoltageDaily => &self.voltage_daily,
            TableKind::CurrentDaily => &self.current_daily,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SectionBoundaries {
    fn default() -> Self {
        Self {
            voltage_full_range: SectionRule {
                terminators: strings(&[
                    "SUMMARY",
                    "TOTAL HARMONIC VOLTAGE FULL TIME RANGE",
                    "TOTAL HARMONIC DISTORTION FULL TIME RANGE",
                    "HARMONIC CURRENT FULL TIME RANGE",
                ]),
                exception_markers: Vec::new(),
            },
            current_full_range: SectionRule {
                terminators: strings(&[
                    "TOTAL HARMONIC DISTORTION DAILY",
                    "TDD FULL TIME RANGE",
                    "HARMONIC VOLTAGE DAILY",
                    "TRANSIENT",
                ]),
                exception_markers: Vec::new(),
            },
            voltage_daily: SectionRule {
                terminators: strings(&[
                    "TOTAL HARMONIC DISTORTION FULL TIME RANGE",
                    "TOTAL HARMONIC VOLTAGE FULL TIME RANGE",
                    "HARMONIC CURRENT DAILY",
                    "TOTAL HARMONIC DISTORTION DAILY",
                ]),
                exception_markers: Vec::new(),
            },
            current_daily: SectionRule {
                terminators: strings(&[
                    "TDD FULL TIME RANGE",
                    "TDD DAILY",
                    "TRANSIENT",
                    "FLICKER SEVERITY",
                ]),
                exception_markers: strings(&["HARMONIC 5:"]),
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Start with default values
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with PQLENS prefix
            .add_source(Environment::with_prefix("PQLENS").separator("__"));

        config.build()?.try_deserialize()
    }

    /// Layered load with the built-in defaults filling anything the config
    /// sources leave out.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            document_open_timeout_secs: 30,
            skip_leading_pages: 1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_sheet_name_len: 31,
            voltage_daily_limit: 7.5,
            current_daily_limit: 10.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
            file_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            processing: ProcessingConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            boundaries: SectionBoundaries::default(),
        }
    }
}
