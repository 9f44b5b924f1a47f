//! End-to-end pipeline tests over synthetic documents.

use pqlens_models::TableKind;
use pqlens_report_processing::violations::write_violation_csv;
use pqlens_report_processing::{
    DocumentProcessor, Page, ReportEmitter, SourceDocument, StructuredTable,
};
use pqlens_utils::AppConfig;

fn processor() -> DocumentProcessor {
    DocumentProcessor::new(AppConfig::default())
}

fn text_row(harmonic: u32, percentile: u32, reg_max: f64, measured: [f64; 3]) -> String {
    format!(
        "{harmonic} {percentile} {reg_max} {} {} {} Pass(1%) Pass(1%) Pass(1%)\n",
        measured[0], measured[1], measured[2]
    )
}

fn structured_row(harmonic: &str, percentile: &str, measured: [&str; 3]) -> Vec<Option<String>> {
    vec![
        Some(harmonic.to_string()),
        Some(percentile.to_string()),
        Some("5.0".to_string()),
        Some(measured[0].to_string()),
        Some(measured[1].to_string()),
        Some(measured[2].to_string()),
        Some("Pass(1%)".to_string()),
        Some("Pass(1%)".to_string()),
        Some("Pass(1%)".to_string()),
    ]
}

#[test]
fn multi_page_voltage_table_splits_by_percentile_and_parity() {
    let mut header_page = "Harmonic Voltage Full Time Range\nN [%] Reg Max[%]\n".to_string();
    for h in 2..=6u32 {
        header_page.push_str(&text_row(h, 99, 5.0, [1.2, 1.1, 1.0]));
    }
    let mut continuation = String::new();
    for h in 7..=10u32 {
        continuation.push_str(&text_row(h, 99, 5.0, [1.2, 1.1, 1.0]));
    }

    let doc = SourceDocument::from_texts(
        "Day 1 Day (TATA Block-15 Bay-09).pdf",
        vec![
            "metadata cover page".to_string(),
            header_page,
            continuation,
            "SUMMARY ends the section".to_string(),
        ],
    );
    let processed = processor().process(&doc);

    assert_eq!(processed.tables.len(), 1);
    assert_eq!(processed.tables[0].kind, TableKind::VoltageFullRange);
    assert_eq!(processed.tables[0].rows.len(), 9);

    let splits = processed.splits();
    let (_, split) = &splits[0];
    assert!(split.p95_odd.is_empty() && split.p95_even.is_empty());
    let odd: Vec<u32> = split.p99_odd.iter().map(|r| r.harmonic).collect();
    assert_eq!(odd, vec![3, 5, 7, 9]);
    let even: Vec<u32> = split.p99_even.iter().map(|r| r.harmonic).collect();
    assert_eq!(even, vec![2, 4, 6, 8, 10]);
    assert_eq!(split.len(), 9);
}

#[test]
fn years_and_fundamental_never_survive() {
    let page = format!(
        "Harmonic Current Full Time Range\n{}{}{}",
        text_row(2024, 95, 5.0, [1.0, 1.0, 1.0]),
        text_row(1, 95, 5.0, [1.0, 1.0, 1.0]),
        text_row(13, 95, 5.0, [1.0, 1.0, 1.0]),
    );
    let doc =
        SourceDocument::from_texts("report.pdf", vec!["cover".to_string(), page]);
    let processed = processor().process(&doc);

    assert_eq!(processed.tables.len(), 1);
    let harmonics: Vec<u32> = processed.tables[0].rows.iter().map(|r| r.harmonic).collect();
    assert_eq!(harmonics, vec![13]);
}

#[test]
fn structured_rows_win_over_text_for_same_harmonic() {
    let table: StructuredTable = vec![
        structured_row("N", "[%]", ["a", "b", "c"]),
        structured_row("5", "95", ["1.2", "1.1", "1.0"]),
    ];
    let text = format!(
        "Harmonic Voltage Daily\n{}{}",
        text_row(5, 95, 5.0, [9.9, 9.9, 9.9]),
        text_row(6, 95, 5.0, [0.5, 0.5, 0.5]),
    );
    let doc = SourceDocument {
        name: "Day 2 Day.pdf".to_string(),
        pages: vec![
            Page::default(),
            Page {
                text,
                tables: vec![table],
            },
        ],
    };
    let processed = processor().process(&doc);

    let rows = &processed.tables[0].rows;
    assert_eq!(rows.len(), 2);
    let five = rows.iter().find(|r| r.harmonic == 5).unwrap();
    assert_eq!(five.measured, [1.2, 1.1, 1.0]);
    assert!(rows.iter().any(|r| r.harmonic == 6));
}

#[test]
fn narrow_structured_row_does_not_shadow_complete_text_row() {
    let table: StructuredTable = vec![
        structured_row("N", "[%]", ["a", "b", "c"]),
        vec![
            Some("9".to_string()),
            Some("95".to_string()),
            Some("5.0".to_string()),
        ],
    ];
    let text = format!(
        "Harmonic Voltage Daily\n{}",
        text_row(9, 95, 5.0, [1.2, 1.1, 1.0])
    );
    let doc = SourceDocument {
        name: "Day 2 Day.pdf".to_string(),
        pages: vec![
            Page::default(),
            Page {
                text,
                tables: vec![table],
            },
        ],
    };
    let processed = processor().process(&doc);

    assert_eq!(processed.tables.len(), 1);
    let harmonics: Vec<u32> = processed.tables[0].rows.iter().map(|r| r.harmonic).collect();
    assert_eq!(harmonics, vec![9]);
    assert_eq!(processed.tables[0].rows[0].measured, [1.2, 1.1, 1.0]);
}

#[test]
fn structured_daily_table_extracts_all_nine_rows() {
    let table: StructuredTable = (2..=10u32)
        .map(|h| structured_row(&h.to_string(), "99", ["1.2", "1.1", "1.0"]))
        .collect();
    let doc = SourceDocument {
        name: "Day 1 Day.pdf".to_string(),
        pages: vec![
            Page::default(),
            Page {
                text: "Harmonic Voltage Daily".to_string(),
                tables: vec![table],
            },
            Page {
                text: "TOTAL HARMONIC DISTORTION DAILY trend".to_string(),
                tables: Vec::new(),
            },
        ],
    };
    let processed = processor().process(&doc);

    assert_eq!(processed.tables.len(), 1);
    assert_eq!(processed.tables[0].kind, TableKind::VoltageDaily);
    let harmonics: Vec<u32> = processed.tables[0].rows.iter().map(|r| r.harmonic).collect();
    assert_eq!(harmonics, (2..=10).collect::<Vec<_>>());

    let splits = processed.splits();
    let (_, split) = &splits[0];
    let odd: Vec<u32> = split.p99_odd.iter().map(|r| r.harmonic).collect();
    assert_eq!(odd, vec![3, 5, 7, 9]);
    let even: Vec<u32> = split.p99_even.iter().map(|r| r.harmonic).collect();
    assert_eq!(even, vec![2, 4, 6, 8, 10]);
}

#[test]
fn violation_is_strict_and_reports_exceedance() {
    let page = format!(
        "Harmonic Voltage Daily\n{}{}",
        text_row(3, 95, 7.5, [8.2, 7.5, 7.4]),
        text_row(5, 95, 7.5, [7.5, 7.5, 7.5]),
    );
    let doc = SourceDocument::from_texts("Day 3 Night.pdf", vec!["cover".to_string(), page]);
    let processed = processor().process(&doc);

    assert_eq!(processed.violations.len(), 1);
    let v = &processed.violations[0];
    assert_eq!(v.harmonic, 3);
    assert_eq!(v.phase, "V1N");
    assert_eq!(v.allowed, 7.5);
    assert_eq!(v.measured, 8.2);
    assert!((v.exceedance - 0.7).abs() < 1e-9);

    let mut buf = Vec::new();
    write_violation_csv(&mut buf, &processed.violations).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Harmonic Voltage Daily"));
}

#[test]
fn harmonic_5_marker_keeps_current_daily_open() {
    let pages = vec![
        "cover".to_string(),
        format!(
            "Harmonic Current Daily\n{}",
            text_row(2, 95, 4.0, [1.0, 1.0, 1.0])
        ),
        // Terminator keyword present, but the colliding marker holds the
        // section open and the page is still extracted.
        format!(
            "HARMONIC 5: trend TDD DAILY\n{}",
            text_row(3, 95, 4.0, [1.0, 1.0, 1.0])
        ),
        format!(
            "TDD DAILY real terminator\n{}",
            text_row(4, 95, 4.0, [1.0, 1.0, 1.0])
        ),
    ];
    let doc = SourceDocument::from_texts("Day 4 Day.pdf", pages);
    let processed = processor().process(&doc);

    let harmonics: Vec<u32> = processed.tables[0].rows.iter().map(|r| r.harmonic).collect();
    // Row on the genuine terminator page is not extracted.
    assert_eq!(harmonics, vec![2, 3]);
}

#[test]
fn normalization_is_idempotent_on_its_own_output() {
    let page = format!(
        "Harmonic Voltage Full Time Range\n{}{}{}",
        text_row(3, 95, 5.0, [1.0, 1.0, 1.0]),
        text_row(3, 95, 5.0, [2.0, 2.0, 2.0]),
        text_row(4, 99, 5.0, [1.0, 1.0, 1.0]),
    );
    let doc = SourceDocument::from_texts("r.pdf", vec!["cover".to_string(), page]);
    let first = processor().process(&doc);
    let second = processor().process(&doc);

    assert_eq!(first.tables[0].rows, second.tables[0].rows);
    assert_eq!(first.tables[0].rows.len(), 2);
    // Repeated harmonic 3 collapsed to its first occurrence.
    let three = first.tables[0].rows.iter().find(|r| r.harmonic == 3).unwrap();
    assert_eq!(three.measured, [1.0, 1.0, 1.0]);
}

#[test]
fn workbooks_render_for_processed_documents() {
    let page = format!(
        "Harmonic Current Daily\n{}{}",
        text_row(5, 95, 4.0, [4.5, 1.0, 1.0]),
        text_row(6, 99, 4.0, [1.0, 1.0, 1.0]),
    );
    let doc = SourceDocument::from_texts(
        "Day 3 Night (TATA Block-15).pdf",
        vec!["cover".to_string(), page],
    );
    let processed = processor().process(&doc);

    let config = AppConfig::default();
    let emitter = ReportEmitter::new(&config.output);

    let per_doc = emitter.document_workbook_buffer(&processed.splits()).unwrap();
    assert!(!per_doc.is_empty());

    let batch = emitter
        .batch_workbook_buffer(&[(processed.report.file_name.clone(), processed.tables)])
        .unwrap();
    assert!(!batch.is_empty());
}

#[test]
fn weekly_report_gets_summary_daily_does_not() {
    let weekly_pages = vec![
        "cover".to_string(),
        "Total Harmonic Distortion Daily\n3sec THD\n14-05-2025 2.1 2.2 2.3\n".to_string(),
        "Event Summary\nType Phase Start Duration Deviation\n\
         Swell I1 15-05-2025 11:00:00 AM 0.5s +12%\n"
            .to_string(),
    ];
    let weekly = SourceDocument::from_texts("7 Days report (TATA).pdf", weekly_pages);
    let processed = processor().process(&weekly);
    let summary = processed.weekly.expect("weekly summary");
    assert_eq!(summary.voltage_thd.len(), 1);
    assert_eq!(summary.voltage_thd[0].phases, [2.1, 2.2, 2.3]);
    assert_eq!(summary.events.len(), 1);
    assert_eq!(summary.time_table.len(), 15);

    let daily = SourceDocument::from_texts("Day 5 Day.pdf", vec!["cover".to_string()]);
    assert!(processor().process(&daily).weekly.is_none());
}
