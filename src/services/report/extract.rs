use crate::models::AnalysisRecord;

// Audit ids with their display names, in report order
pub const WEB_VITAL_METRICS: [(&str, &str); 7] = [
    ("largest-contentful-paint", "Largest Contentful Paint (LCP)"),
    ("max-potential-fid", "Max Potential FID"),
    ("cumulative-layout-shift", "Cumulative Layout Shift (CLS)"),
    ("first-contentful-paint", "First Contentful Paint (FCP)"),
    ("interactive", "Time to Interactive (TTI)"),
    ("total-blocking-time", "Total Blocking Time (TBT)"),
    ("speed-index", "Speed Index"),
];

pub const NOT_AVAILABLE: &str = "N/A";

// Rounded whole percentages per category. `None` means the category was not
// measured; the CSV keeps that distinct from a measured zero, while the
// screen/PDF paths use the `_or_zero` accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryPercents {
    pub performance: Option<u32>,
    pub accessibility: Option<u32>,
    pub best_practices: Option<u32>,
    pub seo: Option<u32>,
}

impl CategoryPercents {
    pub fn performance_or_zero(&self) -> u32 {
        self.performance.unwrap_or(0)
    }

    pub fn accessibility_or_zero(&self) -> u32 {
        self.accessibility.unwrap_or(0)
    }

    pub fn best_practices_or_zero(&self) -> u32 {
        self.best_practices.unwrap_or(0)
    }

    pub fn seo_or_zero(&self) -> u32 {
        self.seo.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebVitals {
    pub lcp: String,
    pub fid: String,
    pub cls: String,
    pub fcp: String,
    pub tti: String,
    pub tbt: String,
    pub speed_index: String,
}

#[derive(Debug, Clone)]
pub struct ExtractedMetrics {
    pub scores: CategoryPercents,
    pub vitals: WebVitals,
}

fn percent(fraction: Option<f64>) -> Option<u32> {
    fraction.map(|f| (f * 100.0).round() as u32)
}

fn vital_display(record: &AnalysisRecord, metric_id: &str) -> String {
    record
        .raw_analysis
        .as_ref()
        .and_then(|raw| raw.audits.get(metric_id))
        .and_then(|audit| audit.display_value.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// Raw fractional score for one audit, for color classification only
pub fn web_vital_score(record: &AnalysisRecord, metric_id: &str) -> Option<f64> {
    record
        .raw_analysis
        .as_ref()
        .and_then(|raw| raw.audits.get(metric_id))
        .and_then(|audit| audit.score)
}

// Pure view over one record; never fails on missing nested fields
pub fn extract(record: &AnalysisRecord) -> ExtractedMetrics {
    let scores = match &record.raw_analysis {
        Some(raw) => CategoryPercents {
            performance: percent(raw.category_scores.performance),
            accessibility: percent(raw.category_scores.accessibility),
            best_practices: percent(raw.category_scores.best_practices),
            seo: percent(raw.category_scores.seo),
        },
        None => CategoryPercents::default(),
    };

    ExtractedMetrics {
        scores,
        vitals: WebVitals {
            lcp: vital_display(record, "largest-contentful-paint"),
            fid: vital_display(record, "max-potential-fid"),
            cls: vital_display(record, "cumulative-layout-shift"),
            fcp: vital_display(record, "first-contentful-paint"),
            tti: vital_display(record, "interactive"),
            tbt: vital_display(record, "total-blocking-time"),
            speed_index: vital_display(record, "speed-index"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisRecord, AuditMetric, CategoryScores, RawAnalysis, Strategy};
    use std::collections::HashMap;

    fn full_record() -> AnalysisRecord {
        let mut audits = HashMap::new();
        audits.insert(
            "largest-contentful-paint".to_string(),
            AuditMetric {
                display_value: Some("2.4 s".to_string()),
                score: Some(0.85),
            },
        );
        audits.insert(
            "cumulative-layout-shift".to_string(),
            AuditMetric {
                display_value: Some("0.02".to_string()),
                score: Some(0.98),
            },
        );
        AnalysisRecord::success(
            "https://example.com".to_string(),
            Strategy::Mobile,
            RawAnalysis {
                category_scores: CategoryScores {
                    performance: Some(0.925),
                    accessibility: Some(0.88),
                    best_practices: None,
                    seo: Some(1.0),
                },
                audits,
                analysis_timestamp: Some("2026-01-15T10:00:00Z".to_string()),
            },
        )
    }

    #[test]
    fn scores_round_to_whole_percent() {
        let metrics = extract(&full_record());
        assert_eq!(metrics.scores.performance, Some(93));
        assert_eq!(metrics.scores.accessibility, Some(88));
        assert_eq!(metrics.scores.seo, Some(100));
    }

    #[test]
    fn missing_category_is_none_but_zero_for_screen() {
        let metrics = extract(&full_record());
        assert_eq!(metrics.scores.best_practices, None);
        assert_eq!(metrics.scores.best_practices_or_zero(), 0);
    }

    #[test]
    fn missing_vitals_render_not_available() {
        let metrics = extract(&full_record());
        assert_eq!(metrics.vitals.lcp, "2.4 s");
        assert_eq!(metrics.vitals.cls, "0.02");
        assert_eq!(metrics.vitals.fid, NOT_AVAILABLE);
        assert_eq!(metrics.vitals.speed_index, NOT_AVAILABLE);
    }

    #[test]
    fn error_record_degrades_to_defaults() {
        let record = AnalysisRecord::failure(
            "https://down.example".to_string(),
            Strategy::Desktop,
            "API error (500): backend unreachable".to_string(),
        );
        let metrics = extract(&record);
        assert_eq!(metrics.scores, CategoryPercents::default());
        assert_eq!(metrics.vitals.lcp, NOT_AVAILABLE);
        assert_eq!(web_vital_score(&record, "largest-contentful-paint"), None);
    }

    #[test]
    fn vital_score_is_raw_fraction() {
        let record = full_record();
        assert_eq!(
            web_vital_score(&record, "cumulative-layout-shift"),
            Some(0.98)
        );
        assert_eq!(web_vital_score(&record, "speed-index"), None);
    }
}
