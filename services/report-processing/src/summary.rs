//! Weekly (7-day) summary extraction.
//!
//! Seven-day reports carry daily THD/TDD compliance tables, a trailing
//! power-quality event summary and a generating-hours schedule derived from
//! the report window. These travel alongside the harmonic tables; a daily
//! report simply has none of them.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use regex::Regex;

use pqlens_models::{ComplianceRow, DailyDistortion, EventRecord, Report, TimeSlot};
use pqlens_utils::OutputConfig;

use crate::document::SourceDocument;

const PHASE_LABELS: [&str; 6] = ["V1N", "V2N", "V3N", "I1", "I2", "I3"];
const EVENT_TYPES: [&str; 4] = ["swell", "dip", "interruption", "transient"];

const WITHIN_REMARK: &str = "All values within limits";
const EXCEED_REMARK: &str = "Some values exceed limits";

/// Whether a filename names a 7-day summary report rather than a daily one.
pub fn is_weekly_report(file_name: &str) -> bool {
    let upper = file_name.to_uppercase();
    let patterns = [
        r"\b7\s*DAYS?\s+REPORT",
        r"\b7\s*DAYS?\s+SUMMARY",
        r"\bSEVEN\s*DAYS?\s+REPORT",
        r"\bWEEKLY\s+REPORT",
    ];
    patterns
        .iter()
        .any(|p| Regex::new(p).unwrap().is_match(&upper))
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct WeeklySummary {
    pub voltage_thd: Vec<ComplianceRow>,
    pub current_tdd: Vec<ComplianceRow>,
    pub events: Vec<EventRecord>,
    pub time_table: Vec<TimeSlot>,
}

/// Extracts the weekly summary sections of a 7-day report.
pub fn extract_weekly_summary(
    doc: &SourceDocument,
    report: &Report,
    output: &OutputConfig,
) -> WeeklySummary {
    let voltage = collect_daily(
        doc,
        "Total Harmonic Distortion Daily",
        "3sec THD",
        output.voltage_daily_limit,
    );
    let current = collect_daily(doc, "TDD Daily", "3sec TDD", output.current_daily_limit);

    WeeklySummary {
        voltage_thd: voltage,
        current_tdd: current,
        events: collect_events(doc),
        time_table: generate_time_table(&report.window),
    }
}

/// Collects one daily distortion table: every page containing both the
/// section marker and the column marker contributes its date-keyed rows.
fn collect_daily(
    doc: &SourceDocument,
    section_marker: &str,
    column_marker: &str,
    limit: f64,
) -> Vec<ComplianceRow> {
    let date_re = Regex::new(r"^\d{2}-\d{2}-\d{4}$").unwrap();
    let mut rows = Vec::new();

    for page in &doc.pages {
        if !(page.text.contains(section_marker) && page.text.contains(column_marker)) {
            continue;
        }

        // Structured tables first, text lines as fallback.
        let mut found_structured = false;
        for table in &page.tables {
            for cells in table {
                let day = match cells.first().and_then(|c| c.as_deref()) {
                    Some(c) if date_re.is_match(c.trim()) => c.trim().to_string(),
                    _ => continue,
                };
                let values: Vec<&str> = cells
                    .iter()
                    .skip(1)
                    .filter_map(|c| c.as_deref())
                    .map(str::trim)
                    .filter(|c| !c.is_empty() && !PHASE_LABELS.contains(c))
                    .collect();
                rows.push(compliance_row(day, &values, limit));
                found_structured = true;
            }
        }
        if found_structured {
            continue;
        }

        for line in page.text.lines() {
            let mut tokens = line.split_whitespace();
            let day = match tokens.next() {
                Some(t) if date_re.is_match(t) => t.to_string(),
                _ => continue,
            };
            let values: Vec<&str> = tokens
                .filter(|t| !PHASE_LABELS.contains(t))
                .collect();
            rows.push(compliance_row(day, &values, limit));
        }
    }

    rows
}

fn compliance_row(day: String, values: &[&str], limit: f64) -> ComplianceRow {
    let mut phases = [0.0f64; 3];
    for (slot, value) in phases.iter_mut().zip(values.iter()) {
        *slot = lenient_float(value);
    }
    let reading = DailyDistortion {
        day: day.clone(),
        phases,
    };
    let remarks = if reading.within_limit(limit) {
        WITHIN_REMARK
    } else {
        EXCEED_REMARK
    };
    ComplianceRow {
        day,
        limit,
        phases,
        remarks: remarks.to_string(),
    }
}

/// Distortion cells occasionally carry a percent sign or are blank; both
/// coerce leniently, defaulting to zero.
fn lenient_float(value: &str) -> f64 {
    value.trim().trim_end_matches('%').parse().unwrap_or(0.0)
}

/// Collects power-quality events from the last two pages of the document.
fn collect_events(doc: &SourceDocument) -> Vec<EventRecord> {
    let mut events = Vec::new();
    let tail_start = doc.pages.len().saturating_sub(2);

    for page in &doc.pages[tail_start..] {
        if !page.text.contains("Event Summary") {
            continue;
        }

        let mut found_structured = false;
        for table in &page.tables {
            let mut past_header = false;
            for cells in table {
                let texts: Vec<&str> = cells
                    .iter()
                    .filter_map(|c| c.as_deref())
                    .map(str::trim)
                    .collect();
                if !past_header {
                    past_header = texts.iter().any(|c| c.contains("Type"));
                    continue;
                }
                if texts.len() >= 5 {
                    events.push(EventRecord {
                        event_type: texts[0].to_string(),
                        phase: texts[1].to_string(),
                        start_time: texts[2].to_string(),
                        duration: texts[3].to_string(),
                        deviation: texts[4].to_string(),
                    });
                    found_structured = true;
                }
            }
        }
        if found_structured {
            continue;
        }

        for line in page.text.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 5 {
                continue;
            }
            if !EVENT_TYPES.contains(&tokens[0].to_lowercase().as_str()) {
                continue;
            }
            let last = tokens.len() - 1;
            events.push(EventRecord {
                event_type: tokens[0].to_string(),
                phase: tokens[1].to_string(),
                start_time: tokens[2..last - 1].join(" "),
                duration: tokens[last - 1].to_string(),
                deviation: tokens[last].to_string(),
            });
        }
    }

    events
}

const WINDOW_FORMAT: &str = "%d-%m-%Y %I:%M:%S %p";
const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%I:%M %p";

/// Builds the generating/non-generating hours table: one overall row for
/// the whole window, then seven day/night pairs. Generating hours run
/// 06:00 AM to 06:30 PM; the night slot covers 06:30 PM to 06:00 AM of the
/// next day. A window the metadata pass could not parse falls back to a
/// fixed reference week so the table shape is stable.
pub fn generate_time_table(window: &pqlens_models::ReportWindow) -> Vec<TimeSlot> {
    let start = window
        .start_time
        .as_deref()
        .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), WINDOW_FORMAT).ok())
        .unwrap_or_else(|| fallback_datetime(2025, 5, 14));
    let end = window
        .end_time
        .as_deref()
        .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), WINDOW_FORMAT).ok())
        .unwrap_or_else(|| fallback_datetime(2025, 5, 21));

    let mut slots = Vec::with_capacity(15);
    slots.push(TimeSlot {
        serial: 1,
        date_from: start.format(DATE_FORMAT).to_string(),
        from: start.format(TIME_FORMAT).to_string(),
        date_to: end.format(DATE_FORMAT).to_string(),
        to: end.format(TIME_FORMAT).to_string(),
        description: "Overall Report Window".to_string(),
    });

    for day in 0..7u32 {
        let date = start.date() + ChronoDuration::days(day as i64);
        let next = date + ChronoDuration::days(1);
        let label = date.format("%d-%m-%Y").to_string();

        slots.push(TimeSlot {
            serial: slots.len() + 1,
            date_from: date.format(DATE_FORMAT).to_string(),
            from: "06:00 AM".to_string(),
            date_to: date.format(DATE_FORMAT).to_string(),
            to: "06:30 PM".to_string(),
            description: format!("Day {} ({label}) Generating Hours", day + 1),
        });
        slots.push(TimeSlot {
            serial: slots.len() + 1,
            date_from: date.format(DATE_FORMAT).to_string(),
            from: "06:30 PM".to_string(),
            date_to: next.format(DATE_FORMAT).to_string(),
            to: "06:00 AM".to_string(),
            description: format!(
                "Night {} ({label} to {}) Non-Generating Hours",
                day + 1,
                next.format("%d-%m-%Y")
            ),
        });
    }

    slots
}

fn fallback_datetime(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .unwrap_or_default()
}
