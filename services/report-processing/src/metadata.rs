//! Report identity extraction from the first page's free text and the
//! filename.
//!
//! Every field is optional: a miss is recorded as `None` (rendered as the
//! `"Not found"` sentinel) so a document with sparse metadata still flows
//! through the rest of the pipeline.

use regex::Regex;

use pqlens_models::{Report, ReportWindow};

/// Extracts report metadata. `first_page_text` is the plain text of page 1.
pub fn extract_metadata(file_name: &str, first_page_text: &str) -> Report {
    let mut report = Report::new(file_name);

    // Parenthesized component tag from the filename, e.g.
    // "Day 3 Night (TATA Block-15 Bay-09).pdf"
    let component_re = Regex::new(r"\((.*?)\)").unwrap();
    report.component = component_re
        .captures(file_name)
        .map(|c| c[1].to_string());

    report.window = extract_window(first_page_text);

    let combined = format!("{file_name} {first_page_text}").to_uppercase();

    let block_re = Regex::new(r"\bBLOCK[-\s]*(\d{1,3})\b").unwrap();
    report.block = block_re.captures(&combined).map(|c| c[1].to_string());

    let feeder_re = Regex::new(r"\b(FEEDER|BAY)[-\s]*(\d{1,3})\b").unwrap();
    report.feeder = feeder_re.captures(&combined).map(|c| c[2].to_string());

    let company_re =
        Regex::new(r"\b(TATA|ADANI|NTPC|RELIANCE|POWERGRID|TORRENT)\b").unwrap();
    report.company = company_re.captures(&combined).map(|c| c[1].to_string());

    report
}

fn extract_window(text: &str) -> ReportWindow {
    let mut window = ReportWindow::default();

    let time_re = Regex::new(concat!(
        r"Start time:\s*(\d{2}-\d{2}-\d{4}\s*\d{2}:\d{2}:\d{2}\s*[AP]M)\s*",
        r"End time:\s*(\d{2}-\d{2}-\d{4}\s*\d{2}:\d{2}:\d{2}\s*[AP]M)\s*",
        r"GMT:\s*([+-]\d{2}:\d{2})\s*",
        r"Report Version:\s*([\d.]+)",
    ))
    .unwrap();

    if let Some(caps) = time_re.captures(text) {
        window.start_time = Some(caps[1].to_string());
        window.end_time = Some(caps[2].to_string());
        window.gmt = Some(caps[3].to_string());
        window.version = Some(caps[4].to_string());
    } else {
        tracing::debug!("report window block not found on first page");
    }

    let feeder_name_re = Regex::new(r"Feeder Name:\s*(.+?)(?:\n|Network)").unwrap();
    window.feeder_name = feeder_name_re
        .captures(text)
        .map(|c| c[1].trim().to_string());

    let nominal_re = Regex::new(r"Network Nominal:\s*(.+?)(?:\n|Device)").unwrap();
    window.network_nominal = nominal_re
        .captures(text)
        .map(|c| c[1].trim().to_string());

    window
}
