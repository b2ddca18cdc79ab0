use bulkspeed::models::{AnalysisRecord, AuditMetric, CategoryScores, RawAnalysis, Strategy};
use bulkspeed::services::report::{build_csv, build_pdf};
use lopdf::Document;
use std::collections::HashMap;

fn success_record(url: &str, performance: f64) -> AnalysisRecord {
    let mut audits = HashMap::new();
    audits.insert(
        "largest-contentful-paint".to_string(),
        AuditMetric {
            display_value: Some("2.5 s".to_string()),
            score: Some(0.8),
        },
    );
    audits.insert(
        "speed-index".to_string(),
        AuditMetric {
            display_value: Some("3.1 s".to_string()),
            score: Some(0.65),
        },
    );
    AnalysisRecord::success(
        url.to_string(),
        Strategy::Mobile,
        RawAnalysis {
            category_scores: CategoryScores {
                performance: Some(performance),
                accessibility: Some(0.91),
                best_practices: Some(0.83),
                seo: Some(1.0),
            },
            audits,
            analysis_timestamp: Some("2026-05-01T09:00:00Z".to_string()),
        },
    )
}

#[test]
fn thirty_records_paginate_with_correct_footers() {
    let records: Vec<AnalysisRecord> = (0..30)
        .map(|i| success_record(&format!("https://site-{i}.example"), 0.6))
        .collect();
    let bytes = build_pdf(&records, "Bulk Report").unwrap();

    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    let total = pages.len();
    assert!(total > 1, "30 records should overflow a single page");

    for page_num in pages.keys() {
        let text = doc.extract_text(&[*page_num]).unwrap();
        let footer = format!("Page {} of {}", page_num, total);
        assert!(
            text.contains(&footer),
            "page {page_num} is missing footer \"{footer}\""
        );
        assert!(text.contains("Generated "));
    }
}

#[test]
fn header_and_summary_land_on_the_first_page() {
    let records = vec![
        success_record("https://a.example", 0.92),
        success_record("https://a.example", 0.88),
        success_record("https://b.example", 0.7),
    ];
    let bytes = build_pdf(&records, "Two Sites").unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let first = doc.extract_text(&[1]).unwrap();
    assert!(first.contains("Website Performance Report"));
    assert!(first.contains("Two Sites"));
    assert!(first.contains("Summary"));
    assert!(first.contains("URLs tested: 2"));
    assert!(first.contains("Total test runs: 3"));
}

#[test]
fn detail_section_reports_errors_inline() {
    let records = vec![
        success_record("https://ok.example", 0.95),
        AnalysisRecord::failure(
            "https://down.example".to_string(),
            Strategy::Desktop,
            "API error (500): backend unreachable".to_string(),
        ),
    ];
    let bytes = build_pdf(&records, "Mixed Batch").unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let all_pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    let text = doc.extract_text(&all_pages).unwrap();
    assert!(text.contains("Detailed Results"));
    assert!(text.contains("https://ok.example"));
    assert!(text.contains("Strategy: Desktop"));
    assert!(text.contains("Error: API error (500): backend unreachable"));
    assert!(text.contains("Largest Contentful Paint (LCP)"));
}

#[test]
fn csv_emits_one_row_per_record() {
    let records = vec![
        success_record("https://a.example", 0.5),
        AnalysisRecord::failure(
            "https://b.example".to_string(),
            Strategy::Mobile,
            "quota exceeded".to_string(),
        ),
        success_record("https://c.example", 0.99),
    ];
    let csv_text = build_csv(&records).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 rows
    assert!(lines[0].starts_with("url,strategy,performanceScore"));
    assert!(lines[2].starts_with("https://b.example,mobile,N/A"));
}

#[test]
fn csv_is_byte_identical_across_runs_for_timestamped_records() {
    let records = vec![
        success_record("https://a.example", 0.5),
        success_record("https://b.example", 0.75),
    ];
    assert_eq!(build_csv(&records).unwrap(), build_csv(&records).unwrap());
}
