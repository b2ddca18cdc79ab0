use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// Device profile used for a test run
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Mobile => "Mobile",
            Strategy::Desktop => "Desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// One (URL, strategy) outcome. Either `raw_analysis` is populated (success)
// or `error` is set (failed run). A record with neither is treated as
// incomplete and every consumer renders a "no data" placeholder for it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisRecord {
    pub url: String,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        rename = "rawAnalysis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_analysis: Option<RawAnalysis>,
}

impl AnalysisRecord {
    pub fn success(url: String, strategy: Strategy, raw: RawAnalysis) -> Self {
        AnalysisRecord {
            url,
            strategy,
            error: None,
            raw_analysis: Some(raw),
        }
    }

    pub fn failure(url: String, strategy: Strategy, message: String) -> Self {
        AnalysisRecord {
            url,
            strategy,
            error: Some(message),
            raw_analysis: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RawAnalysis {
    #[serde(rename = "categoryScores", default)]
    pub category_scores: CategoryScores,
    #[serde(default)]
    pub audits: HashMap<String, AuditMetric>,
    #[serde(
        rename = "analysisTimestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub analysis_timestamp: Option<String>,
}

// Category fractions in [0,1], each individually optional
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CategoryScores {
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    #[serde(rename = "best-practices")]
    pub best_practices: Option<f64>,
    pub seo: Option<f64>,
}

// One audit metric: display string plus an optional fractional score
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuditMetric {
    #[serde(rename = "displayValue", default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}
