use crate::error::AnalyzeError;
use crate::models::{AnalysisRecord, AuditMetric, CategoryScores, RawAnalysis, Strategy};
use crate::utils::normalize_url;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

const PSI_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
const CATEGORIES: [&str; 4] = ["performance", "accessibility", "best-practices", "seo"];

#[derive(Clone)]
pub struct PagespeedClient {
    http: Client,
    endpoint: String,
}

impl PagespeedClient {
    pub fn new(http: Client) -> Self {
        PagespeedClient {
            http,
            endpoint: PSI_ENDPOINT.to_string(),
        }
    }

    // Point the client at a different analysis endpoint (tests use this)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    // Fans out one request per URL and waits for all of them to settle.
    // Results come back in submission order; a failed URL becomes an
    // error-tagged record and never aborts its siblings.
    pub async fn run_batch(
        &self,
        urls: &[String],
        api_key: &str,
        strategy: Strategy,
    ) -> Vec<AnalysisRecord> {
        info!(count = urls.len(), %strategy, "running analysis batch");
        let tests = urls.iter().map(|url| self.analyze_url(url, api_key, strategy));
        join_all(tests).await
    }

    pub async fn analyze_url(
        &self,
        url: &str,
        api_key: &str,
        strategy: Strategy,
    ) -> AnalysisRecord {
        let url = normalize_url(url);
        match self.fetch_analysis(&url, api_key, strategy).await {
            Ok(raw) => AnalysisRecord::success(url, strategy, raw),
            Err(e) => {
                warn!(%url, error = %e, "analysis failed");
                AnalysisRecord::failure(url, strategy, e.to_string())
            }
        }
    }

    async fn fetch_analysis(
        &self,
        url: &str,
        api_key: &str,
        strategy: Strategy,
    ) -> Result<RawAnalysis, AnalyzeError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("url", url),
            ("key", api_key),
            ("strategy", strategy.as_str()),
        ];
        for category in CATEGORIES {
            query.push(("category", category));
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzeError::Api {
                status: status.as_u16(),
                message: extract_api_error(&body, status.as_u16()),
            });
        }

        let psi: PsiResponse = response.json().await?;
        raw_from_psi(psi)
    }
}

// Error bodies from the API come back as {"error": {"message": …}} JSON or
// as plain text; pull a readable message out of either shape.
fn extract_api_error(body: &str, status: u16) -> String {
    if let Ok(parsed) = serde_json::from_str::<PsiErrorBody>(body) {
        if let Some(message) = parsed.error.and_then(|e| e.message) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

fn raw_from_psi(psi: PsiResponse) -> Result<RawAnalysis, AnalyzeError> {
    let lighthouse = psi
        .lighthouse_result
        .ok_or_else(|| AnalyzeError::Malformed("response has no lighthouseResult".to_string()))?;

    let category_scores = CategoryScores {
        performance: lighthouse
            .categories
            .performance
            .and_then(|c| c.score),
        accessibility: lighthouse
            .categories
            .accessibility
            .and_then(|c| c.score),
        best_practices: lighthouse
            .categories
            .best_practices
            .and_then(|c| c.score),
        seo: lighthouse.categories.seo.and_then(|c| c.score),
    };

    let audits = lighthouse
        .audits
        .into_iter()
        .map(|(id, audit)| {
            (
                id,
                AuditMetric {
                    display_value: audit.display_value,
                    score: audit.score,
                },
            )
        })
        .collect();

    Ok(RawAnalysis {
        category_scores,
        audits,
        analysis_timestamp: lighthouse.fetch_time,
    })
}

#[derive(Deserialize)]
struct PsiResponse {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<PsiLighthouseResult>,
}

#[derive(Deserialize)]
struct PsiLighthouseResult {
    #[serde(default)]
    categories: PsiCategories,
    #[serde(default)]
    audits: HashMap<String, PsiAudit>,
    #[serde(rename = "fetchTime", default)]
    fetch_time: Option<String>,
}

#[derive(Deserialize, Default)]
struct PsiCategories {
    performance: Option<PsiCategory>,
    accessibility: Option<PsiCategory>,
    #[serde(rename = "best-practices")]
    best_practices: Option<PsiCategory>,
    seo: Option<PsiCategory>,
}

#[derive(Deserialize)]
struct PsiCategory {
    score: Option<f64>,
}

#[derive(Deserialize)]
struct PsiAudit {
    #[serde(rename = "displayValue", default)]
    display_value: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Deserialize)]
struct PsiErrorBody {
    error: Option<PsiErrorDetail>,
}

#[derive(Deserialize)]
struct PsiErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_from_json_body() {
        let body = r#"{"error": {"message": "API key not valid. Please pass a valid API key.", "code": 400}}"#;
        assert_eq!(
            extract_api_error(body, 400),
            "API key not valid. Please pass a valid API key."
        );
    }

    #[test]
    fn api_error_from_plain_text_body() {
        assert_eq!(extract_api_error("  Bad Gateway  ", 502), "Bad Gateway");
    }

    #[test]
    fn api_error_from_empty_body_falls_back_to_status() {
        assert_eq!(extract_api_error("", 503), "HTTP 503");
        assert_eq!(extract_api_error("{}", 500), "HTTP 500");
    }

    #[test]
    fn psi_response_maps_into_raw_analysis() {
        let json = r#"{
            "lighthouseResult": {
                "fetchTime": "2026-03-01T12:00:00.000Z",
                "categories": {
                    "performance": {"score": 0.87},
                    "best-practices": {"score": 0.92},
                    "seo": {"score": null}
                },
                "audits": {
                    "largest-contentful-paint": {"displayValue": "2.1 s", "score": 0.9},
                    "server-response-time": {"score": 1.0}
                }
            }
        }"#;
        let psi: PsiResponse = serde_json::from_str(json).unwrap();
        let raw = raw_from_psi(psi).unwrap();
        assert_eq!(raw.category_scores.performance, Some(0.87));
        assert_eq!(raw.category_scores.best_practices, Some(0.92));
        assert_eq!(raw.category_scores.accessibility, None);
        assert_eq!(raw.category_scores.seo, None);
        assert_eq!(
            raw.audits["largest-contentful-paint"].display_value.as_deref(),
            Some("2.1 s")
        );
        assert_eq!(raw.audits["server-response-time"].display_value, None);
        assert_eq!(
            raw.analysis_timestamp.as_deref(),
            Some("2026-03-01T12:00:00.000Z")
        );
    }

    #[test]
    fn missing_lighthouse_result_is_malformed() {
        let psi: PsiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            raw_from_psi(psi),
            Err(AnalyzeError::Malformed(_))
        ));
    }
}
