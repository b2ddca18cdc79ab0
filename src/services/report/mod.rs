pub mod classify;
pub mod csv;
pub mod extract;
pub mod pdf;

pub use self::classify::{classify, Scale, ScoreBand};
pub use self::csv::{build_csv, CSV_HEADERS};
pub use self::extract::{
    extract, web_vital_score, CategoryPercents, ExtractedMetrics, WebVitals, WEB_VITAL_METRICS,
};
pub use self::pdf::build_pdf;
