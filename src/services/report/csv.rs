use crate::error::ExportError;
use crate::models::AnalysisRecord;
use crate::services::report::extract::{extract, NOT_AVAILABLE};
use chrono::Utc;

pub const CSV_HEADERS: [&str; 13] = [
    "url",
    "strategy",
    "performanceScore",
    "accessibilityScore",
    "bestPracticesScore",
    "seoScore",
    "firstContentfulPaint",
    "largestContentfulPaint",
    "cumulativeLayoutShift",
    "totalBlockingTime",
    "speedIndex",
    "interactive",
    "testDate",
];

fn score_column(score: Option<u32>) -> String {
    // Unmeasured stays distinguishable from a measured zero in the export
    match score {
        Some(value) => value.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn csv_row(record: &AnalysisRecord) -> Vec<String> {
    let test_date = record
        .raw_analysis
        .as_ref()
        .and_then(|raw| raw.analysis_timestamp.clone())
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    if record.raw_analysis.is_none() {
        // Error or incomplete record: the row is still emitted, metrics empty
        let mut row = vec![record.url.clone(), record.strategy.to_string()];
        row.extend(std::iter::repeat(NOT_AVAILABLE.to_string()).take(10));
        row.push(test_date);
        return row;
    }

    let metrics = extract(record);
    vec![
        record.url.clone(),
        record.strategy.to_string(),
        score_column(metrics.scores.performance),
        score_column(metrics.scores.accessibility),
        score_column(metrics.scores.best_practices),
        score_column(metrics.scores.seo),
        metrics.vitals.fcp,
        metrics.vitals.lcp,
        metrics.vitals.cls,
        metrics.vitals.tbt,
        metrics.vitals.speed_index,
        metrics.vitals.tti,
        test_date,
    ]
}

// Flattens every record into one row; never drops a URL from the export.
pub fn build_csv(records: &[AnalysisRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(csv_row(record))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}
