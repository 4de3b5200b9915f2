use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::fit::{EvaluationTicket, EvaluationTrigger, FitVerdict, MeasuredHeight};
use crate::layout::geometry::PageGeometry;
use crate::preview::sessions::PreviewSession;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub budget_px: f64,
    pub generation: u64,
    pub latest: Option<FitVerdict>,
}

#[derive(Deserialize)]
pub struct BeginEvaluationRequest {
    pub trigger: EvaluationTrigger,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteEvaluationRequest {
    pub rendered_height_px: f64,
}

/// POST /api/v1/preview/sessions
pub async fn handle_open_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.previews.open(PageGeometry::default());
    (StatusCode::CREATED, Json(session_response(&session)))
}

/// GET /api/v1/preview/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id)?;
    Ok(Json(session_response(&session)))
}

/// DELETE /api/v1/preview/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.previews.close(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Preview session {id} not found")))
    }
}

/// POST /api/v1/preview/sessions/:id/evaluations
pub async fn handle_begin_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<BeginEvaluationRequest>,
) -> Result<Json<EvaluationTicket>, AppError> {
    let session = find_session(&state, id)?;
    Ok(Json(session.monitor.begin(req.trigger)))
}

/// POST /api/v1/preview/sessions/:id/evaluations/:generation
pub async fn handle_complete_evaluation(
    State(state): State<AppState>,
    Path((id, generation)): Path<(Uuid, u64)>,
    Json(req): Json<CompleteEvaluationRequest>,
) -> Result<Json<FitVerdict>, AppError> {
    let session = find_session(&state, id)?;
    let verdict = session
        .monitor
        .complete(generation, &MeasuredHeight(req.rendered_height_px))?;
    Ok(Json(verdict))
}

fn find_session(state: &AppState, id: Uuid) -> Result<std::sync::Arc<PreviewSession>, AppError> {
    state
        .previews
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Preview session {id} not found")))
}

fn session_response(session: &PreviewSession) -> SessionResponse {
    SessionResponse {
        session_id: session.id,
        created_at: session.created_at,
        last_seen_at: session.last_seen(),
        budget_px: session.monitor.geometry().content_height_px(),
        generation: session.monitor.current_generation(),
        latest: session.monitor.latest(),
    }
}
