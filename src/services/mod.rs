pub mod pagespeed;
pub mod report;

pub use pagespeed::PagespeedClient;
pub use report::{build_csv, build_pdf};
