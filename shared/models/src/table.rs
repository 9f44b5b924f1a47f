use serde::{Deserialize, Serialize};

/// The four harmonic table sections a power-quality report can contain.
///
/// Each kind fixes the column schema (voltage or current phase triplet) and
/// the sheet-name abbreviation used when emitting spreadsheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Harmonic voltage over the full measurement window
    VoltageFullRange,
    /// Harmonic current over the full measurement window
    CurrentFullRange,
    /// Harmonic voltage, daily statistics
    VoltageDaily,
    /// Harmonic current, daily statistics
    CurrentDaily,
}

impl TableKind {
    /// Fixed processing and emission order.
    pub const ALL: [TableKind; 4] = [
        TableKind::VoltageFullRange,
        TableKind::CurrentFullRange,
        TableKind::VoltageDaily,
        TableKind::CurrentDaily,
    ];

    /// Section header phrase as printed in the report.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::VoltageFullRange => "Harmonic Voltage Full Time Range",
            Self::CurrentFullRange => "Harmonic Current Full Time Range",
            Self::VoltageDaily => "Harmonic Voltage Daily",
            Self::CurrentDaily => "Harmonic Current Daily",
        }
    }

    /// Uppercased header phrase used for page matching.
    pub fn header_phrase(&self) -> &'static str {
        match self {
            Self::VoltageFullRange => "HARMONIC VOLTAGE FULL TIME RANGE",
            Self::CurrentFullRange => "HARMONIC CURRENT FULL TIME RANGE",
            Self::VoltageDaily => "HARMONIC VOLTAGE DAILY",
            Self::CurrentDaily => "HARMONIC CURRENT DAILY",
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, Self::CurrentFullRange | Self::CurrentDaily)
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, Self::VoltageDaily | Self::CurrentDaily)
    }

    /// `V` for voltage tables, `I` for current tables.
    pub fn circuit_code(&self) -> char {
        if self.is_current() {
            'I'
        } else {
            'V'
        }
    }

    /// `F` for full-time-range tables, `D` for daily tables.
    pub fn range_code(&self) -> char {
        if self.is_daily() {
            'D'
        } else {
            'F'
        }
    }

    /// Two-letter abbreviation used in sheet names, e.g. `VF`, `ID`.
    pub fn abbreviation(&self) -> String {
        format!("{}{}", self.circuit_code(), self.range_code())
    }

    /// Phase identifiers for the three measured columns.
    pub fn phase_labels(&self) -> [&'static str; 3] {
        if self.is_current() {
            ["I1", "I2", "I3"]
        } else {
            ["V1N", "V2N", "V3N"]
        }
    }

    /// Column headers for the nine-field table schema.
    pub fn column_headers(&self) -> [String; 9] {
        let [p1, p2, p3] = self.phase_labels();
        [
            "N".to_string(),
            "[%]".to_string(),
            "Reg Max[%]".to_string(),
            format!("Measured_{p1}"),
            format!("Measured_{p2}"),
            format!("Measured_{p3}"),
            format!("Result_{p1}"),
            format!("Result_{p2}"),
            format!("Result_{p3}"),
        ]
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
