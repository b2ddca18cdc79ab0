use crate::api::analyze::error_response;
use crate::error::ExportError;
use crate::models::ExportRequest;
use crate::services::{build_csv, build_pdf};
use axum::{
    extract::{Json, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

const DEFAULT_REPORT_NAME: &str = "PageSpeed Report";

pub async fn export_handler(
    Path(format): Path<String>,
    Json(params): Json<ExportRequest>,
) -> Response {
    match build_export(&format, &params) {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, export.content_type),
                (
                    header::CONTENT_DISPOSITION,
                    export.content_disposition,
                ),
            ],
            export.bytes,
        )
            .into_response(),
        Err(e) if e.is_bad_input() => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        Err(e) => {
            error!(format = %format, error = %e, "report generation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

#[derive(Debug)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub content_disposition: &'static str,
}

// All-or-nothing: bad input is rejected before any generation work, and a
// generation failure never yields a partial file.
pub fn build_export(format: &str, params: &ExportRequest) -> Result<Export, ExportError> {
    if params.results.is_empty() {
        return Err(ExportError::EmptyResults);
    }
    match format {
        "csv" => Ok(Export {
            bytes: build_csv(&params.results)?.into_bytes(),
            content_type: "text/csv",
            content_disposition: "attachment; filename=\"pagespeed-report.csv\"",
        }),
        "pdf" => {
            let title = params
                .report_name
                .as_deref()
                .unwrap_or(DEFAULT_REPORT_NAME);
            Ok(Export {
                bytes: build_pdf(&params.results, title)?,
                content_type: "application/pdf",
                content_disposition: "attachment; filename=\"pagespeed-report.pdf\"",
            })
        }
        other => Err(ExportError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisRecord, Strategy};

    fn request(results: Vec<AnalysisRecord>) -> ExportRequest {
        ExportRequest {
            results,
            report_name: None,
        }
    }

    fn one_record() -> AnalysisRecord {
        AnalysisRecord::failure(
            "https://example.com".to_string(),
            Strategy::Mobile,
            "timeout".to_string(),
        )
    }

    #[test]
    fn empty_results_are_rejected_before_generation() {
        let err = build_export("csv", &request(vec![])).unwrap_err();
        assert!(matches!(err, ExportError::EmptyResults));
        assert!(err.is_bad_input());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = build_export("xlsx", &request(vec![one_record()])).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
        assert!(err.is_bad_input());
    }

    #[test]
    fn csv_export_sets_attachment_headers() {
        let export = build_export("csv", &request(vec![one_record()])).unwrap();
        assert_eq!(export.content_type, "text/csv");
        assert!(export
            .content_disposition
            .contains("pagespeed-report.csv"));
        assert!(!export.bytes.is_empty());
    }

    #[test]
    fn pdf_export_sets_attachment_headers() {
        let export = build_export("pdf", &request(vec![one_record()])).unwrap();
        assert_eq!(export.content_type, "application/pdf");
        assert!(export
            .content_disposition
            .contains("pagespeed-report.pdf"));
        assert!(export.bytes.starts_with(b"%PDF"));
    }
}
