use serde::{Deserialize, Serialize};

/// Lowest valid harmonic index. Index 1 is the fundamental frequency and is
/// categorically excluded from harmonic tables.
pub const HARMONIC_MIN: u32 = 2;

/// Highest harmonic index reported by the fixed report template.
pub const HARMONIC_MAX: u32 = 50;

/// Range filter applied to every candidate harmonic index.
///
/// Anything outside [2, 50] is extraction noise (years, dates, page numbers)
/// and is discarded before a row is accepted.
pub fn is_valid_harmonic(n: i64) -> bool {
    n >= HARMONIC_MIN as i64 && n <= HARMONIC_MAX as i64
}

/// One harmonic observation exactly as extracted, nine string fields wide:
/// harmonic index, time percentile, regulatory max, three measured phase
/// values and three pass/fail result annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub fields: [String; 9],
}

impl RawRow {
    pub fn new(fields: [String; 9]) -> Self {
        Self { fields }
    }

    /// Harmonic index of this row, if the first field parses as an integer.
    pub fn harmonic_index(&self) -> Option<u32> {
        self.fields[0].trim().parse::<u32>().ok()
    }

    /// Raw percentile field, trimmed. Used as half of the dedup key before
    /// numeric coercion.
    pub fn percentile_field(&self) -> &str {
        self.fields[1].trim()
    }
}

/// A fully normalized harmonic observation: all numeric fields coerced,
/// range-validated and deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicRow {
    /// Harmonic index, in [2, 50].
    pub harmonic: u32,
    /// Time-limit percentile, 95.0 or 99.0 in well-formed reports.
    pub percentile: f64,
    /// Declared regulatory maximum, percent.
    pub reg_max: f64,
    /// Measured values for the three phases, percent.
    pub measured: [f64; 3],
    /// Result annotations per phase, `Pass(value%)` / `Fail(value%)` / `N/A`.
    pub results: [String; 3],
}

impl HarmonicRow {
    pub fn is_odd(&self) -> bool {
        self.harmonic % 2 == 1
    }
}
