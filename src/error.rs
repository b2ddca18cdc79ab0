use thiserror::Error;

// Failures while talking to the external analysis API. These never escape
// a batch: the orchestrator folds them into error-tagged records.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

// Failures while building an export. Bad-input variants are rejected before
// any generation work; the rest mean the whole export failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no results to export")]
    EmptyResults,
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("pdf assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),
}

impl ExportError {
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            ExportError::EmptyResults | ExportError::UnsupportedFormat(_)
        )
    }
}
