//! Page configuration endpoint

use axum::{extract::State, routing::get, Json, Router};
use ctat_common::workbook::WORKBOOK_EXTENSION;
use ctat_common::Bucket;
use serde::Serialize;

use crate::AppState;

/// GET /api/config response
#[derive(Debug, Serialize)]
pub struct PageConfig {
    /// Bucket labels in display and export order
    pub buckets: Vec<&'static str>,
    pub status_display_ms: u64,
    pub accepted_extension: &'static str,
}

/// GET /api/config
pub async fn get_page_config(State(state): State<AppState>) -> Json<PageConfig> {
    Json(PageConfig {
        buckets: Bucket::ALL.iter().map(|bucket| bucket.label()).collect(),
        status_display_ms: state.status_display_ms,
        accepted_extension: WORKBOOK_EXTENSION,
    })
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/api/config", get(get_page_config))
}
