use crate::models::analysis::{AnalysisRecord, Strategy};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub urls: Vec<String>,
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub results: Vec<AnalysisRecord>,
    #[serde(rename = "reportName", default)]
    pub report_name: Option<String>,
}
