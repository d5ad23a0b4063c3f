//! ctat-ui library - Conversation annotation web service
//!
//! Serves the annotation page and the JSON API it drives. The service owns
//! exactly one annotation session at a time.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use ctat_common::config::ServiceConfig;
use ctat_common::Session;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Current session; `None` until the first workbook is loaded
    pub session: Arc<RwLock<Option<Session>>>,
    /// How long the page shows a status message
    pub status_display_ms: u64,
    /// Largest accepted workbook upload
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create application state with no session loaded
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            status_display_ms: config.status_display_ms,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Create application state with a preloaded session
    pub fn with_session(config: &ServiceConfig, session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(Some(session))),
            ..Self::new(config)
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::settings_routes())
        .merge(api::workbook_routes().layer(DefaultBodyLimit::max(upload_limit)))
        .merge(api::conversation_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
