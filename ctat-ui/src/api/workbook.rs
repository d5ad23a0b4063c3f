//! Workbook upload and annotated export
//!
//! POST /api/workbook?filename=<name> (raw xlsx body), GET /api/export

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use ctat_common::workbook::{export_file_name, write_rows};
use ctat_common::Session;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ConversationView;
use crate::{error::ApiError, error::ApiResult, AppState};

/// Content type of generated workbooks
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Response header carrying the number of exported conversations
pub const ANNOTATED_COUNT_HEADER: &str = "x-annotated-conversations";

/// POST /api/workbook query parameters
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Original file name, used for the extension check
    pub filename: Option<String>,
}

/// POST /api/workbook response
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub loaded_conversations: usize,
    pub view: ConversationView,
}

pub fn workbook_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workbook", post(load_workbook))
        .route("/api/export", get(export_workbook))
}

/// POST /api/workbook
///
/// Parses the uploaded workbook and, only if that succeeds, replaces the
/// current session with a fresh one. A rejected upload leaves the existing
/// session untouched.
pub async fn load_workbook(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<LoadResponse>> {
    let file_name = query
        .filename
        .ok_or_else(|| ApiError::BadRequest("Missing filename query parameter".to_string()))?;
    info!(file = %file_name, bytes = body.len(), "Loading workbook");

    let parse_name = file_name.clone();
    let session = tokio::task::spawn_blocking(move || Session::from_workbook(&parse_name, &body))
        .await
        .map_err(|e| ApiError::Internal(format!("Workbook parser task failed: {}", e)))??;

    let view = ConversationView::from_session(&session)?;
    let loaded_conversations = session.conversations().len();

    *state.session.write().await = Some(session);

    info!(
        file = %file_name,
        conversations = loaded_conversations,
        "Workbook loaded, new session started"
    );

    Ok(Json(LoadResponse {
        loaded_conversations,
        view,
    }))
}

/// GET /api/export
///
/// Streams the annotated workbook back as an attachment. Rows are collected
/// under the read lock; encoding runs on the blocking pool after it is
/// released.
pub async fn export_workbook(State(state): State<AppState>) -> ApiResult<Response> {
    let export = {
        let guard = state.session.read().await;
        let session = guard.as_ref().ok_or(ctat_common::Error::NothingToExport)?;
        session.export()?
    };
    let annotated = export.annotated_conversations;

    let bytes = tokio::task::spawn_blocking(move || write_rows(&export.rows))
        .await
        .map_err(|e| ApiError::Internal(format!("Workbook writer task failed: {}", e)))??;
    let file_name = export_file_name(Utc::now());

    info!(file = %file_name, conversations = annotated, "Export downloaded");

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
        (
            header::HeaderName::from_static(ANNOTATED_COUNT_HEADER),
            annotated.to_string(),
        ),
    ];

    Ok((headers, bytes).into_response())
}
