//! Conversation view, navigation and annotation saving
//!
//! GET /api/conversation, POST /api/navigate/{next,previous},
//! PUT /api/annotations/:id

use std::collections::{BTreeSet, HashMap};

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use ctat_common::{Annotation, Bucket, ConversationId, NavOutcome, Session};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ApiResult, AppState};

/// Who produced a message bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Customer,
    Bot,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub position: usize,
    pub total: usize,
    pub percent: f64,
    pub label: String,
}

/// Everything the page needs to render the current conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub id: ConversationId,
    pub feedback: Option<String>,
    /// Display styling only; the exported label is untouched
    pub negative_feedback: bool,
    pub messages: Vec<Message>,
    pub progress: ProgressView,
    /// Saved buckets for this conversation; empty if never saved
    pub annotation: Annotation,
}

impl ConversationView {
    pub fn from_session(session: &Session) -> ApiResult<Self> {
        let conversation = session.current()?;
        let progress = session.progress().ok_or(ctat_common::Error::NoConversations)?;

        let messages = conversation
            .rows()
            .iter()
            .flat_map(|row| {
                let customer = row.user_message.as_ref().map(|text| Message {
                    speaker: Speaker::Customer,
                    text: text.clone(),
                });
                let bot = row.bot_message.as_ref().map(|text| Message {
                    speaker: Speaker::Bot,
                    text: text.clone(),
                });
                customer.into_iter().chain(bot)
            })
            .collect();

        Ok(Self {
            id: conversation.id().clone(),
            feedback: conversation.feedback().map(str::to_string),
            negative_feedback: conversation.has_negative_feedback(),
            messages,
            progress: ProgressView {
                position: progress.position,
                total: progress.total,
                percent: progress.percent,
                label: progress.label(),
            },
            annotation: session.annotation(conversation.id()),
        })
    }
}

/// POST /api/navigate/* response
#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub outcome: NavOutcome,
    pub view: ConversationView,
}

/// PUT /api/annotations/:id request
#[derive(Debug, Deserialize)]
pub struct SaveAnnotationRequest {
    /// Checked buckets
    pub selections: Vec<Bucket>,
    /// Comment text per bucket; entries for unchecked buckets are ignored
    #[serde(default)]
    pub comments: HashMap<Bucket, String>,
}

/// PUT /api/annotations/:id response
#[derive(Debug, Serialize)]
pub struct SaveAnnotationResponse {
    pub id: ConversationId,
    pub annotation: Annotation,
    /// Conversations with a saved annotation
    pub annotated_conversations: usize,
}

pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/conversation", get(get_current))
        .route("/api/navigate/next", post(navigate_next))
        .route("/api/navigate/previous", post(navigate_previous))
        .route("/api/annotations/:id", put(save_annotation))
}

/// GET /api/conversation
pub async fn get_current(State(state): State<AppState>) -> ApiResult<Json<ConversationView>> {
    let guard = state.session.read().await;
    let session = guard.as_ref().ok_or(ctat_common::Error::NoConversations)?;
    Ok(Json(ConversationView::from_session(session)?))
}

/// POST /api/navigate/next
pub async fn navigate_next(State(state): State<AppState>) -> ApiResult<Json<NavigateResponse>> {
    navigate(&state, Session::next).await
}

/// POST /api/navigate/previous
pub async fn navigate_previous(
    State(state): State<AppState>,
) -> ApiResult<Json<NavigateResponse>> {
    navigate(&state, Session::previous).await
}

async fn navigate(
    state: &AppState,
    step: fn(&mut Session) -> NavOutcome,
) -> ApiResult<Json<NavigateResponse>> {
    let mut guard = state.session.write().await;
    let session = guard.as_mut().ok_or(ctat_common::Error::NoConversations)?;

    let outcome = step(session);
    tracing::debug!(?outcome, index = session.current_index(), "Navigation");

    Ok(Json(NavigateResponse {
        outcome,
        view: ConversationView::from_session(session)?,
    }))
}

/// PUT /api/annotations/:id
pub async fn save_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SaveAnnotationRequest>,
) -> ApiResult<Json<SaveAnnotationResponse>> {
    let id = ConversationId::from(id);
    let selections: BTreeSet<Bucket> = request.selections.into_iter().collect();

    let mut guard = state.session.write().await;
    let session = guard.as_mut().ok_or(ctat_common::Error::NoConversations)?;

    session.save(&id, &selections, &request.comments)?;

    info!(conversation_id = %id, buckets = selections.len(), "Annotations saved");

    Ok(Json(SaveAnnotationResponse {
        annotation: session.annotation(&id),
        annotated_conversations: session.store().len(),
        id,
    }))
}
