use crate::services::PagespeedClient;

#[derive(Clone)]
pub struct AppState {
    pub pagespeed: PagespeedClient,
    pub default_api_key: Option<String>,
}

impl AppState {
    pub fn new(pagespeed: PagespeedClient, default_api_key: Option<String>) -> Self {
        AppState {
            pagespeed,
            default_api_key,
        }
    }
}
