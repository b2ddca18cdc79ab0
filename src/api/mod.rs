pub mod analyze;
pub mod export;

pub use analyze::{analyze_handler, MAX_BATCH_SIZE};
pub use export::export_handler;
