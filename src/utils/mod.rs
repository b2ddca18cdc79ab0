pub mod url_utils;

pub use url_utils::normalize_url;
