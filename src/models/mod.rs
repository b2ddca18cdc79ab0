pub mod analysis;
pub mod app;
pub mod params;

pub use analysis::{AnalysisRecord, AuditMetric, CategoryScores, RawAnalysis, Strategy};
pub use app::AppState;
pub use params::{AnalyzeRequest, ExportRequest};
