use axum::{
    routing::{get, post},
    Router,
};
use bulkspeed::{api, models::AppState, services::PagespeedClient};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    // The analysis API routinely takes tens of seconds per URL
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;
    let state = Arc::new(AppState::new(
        PagespeedClient::new(http),
        std::env::var("PAGESPEED_API_KEY").ok(),
    ));

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(api::analyze_handler))
        .route("/api/export/{format}", post(api::export_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3043".to_string());
    let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}
