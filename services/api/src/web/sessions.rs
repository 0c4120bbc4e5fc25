//! services/api/src/web/sessions.rs
//!
//! Practice session endpoints. Logging a completed session is what drives a
//! recurring goal's schedule forward, so the completion trigger lives here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use cadence_core::domain::{Goal, NewSession, Session, SessionUpdate};
use cadence_core::schedule::schedule_on_completion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::goals::owned_goal;
use crate::web::state::AppState;
use crate::web::port_error_response;

/// Placeholder title the quick-complete button submits; always replaced by
/// the goal-derived default.
const QUICK_COMPLETION_TITLE: &str = "Quick completion";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub goal_id: Uuid,
    pub title: Option<String>,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub note: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub completed: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            goal_id: session.goal_id,
            title: session.title,
            note: session.note,
            date: session.date,
            duration_minutes: session.duration_minutes,
            completed: session.completed,
            created_at: session.created_at,
        }
    }
}

/// A session joined with the title of the goal it belongs to.
#[derive(Serialize, ToSchema)]
pub struct SessionWithGoalResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub goal_title: String,
}

//=========================================================================================
// Shared Helpers
//=========================================================================================

/// Picks the stored title for a new session: an empty or placeholder title
/// becomes "<goal title> session".
fn resolve_session_title(title: Option<String>, goal_title: &str) -> String {
    match title {
        Some(t) if !t.is_empty() && t != QUICK_COMPLETION_TITLE => t,
        _ => format!("{} session", goal_title),
    }
}

/// Whether completing a session should overwrite its stored title with the
/// goal-derived default.
fn replaces_title_on_completion(stored_title: &str) -> bool {
    stored_title.is_empty() || stored_title == QUICK_COMPLETION_TITLE
}

/// Whether a write that sets `completed` should advance the goal's
/// schedule. Only an explicit false -> true transition fires; an absent
/// flag or a re-save of an already-completed session leaves the due date
/// alone.
fn fires_completion_schedule(requested: Option<bool>, was_completed: bool) -> bool {
    requested == Some(true) && !was_completed
}

/// Loads a session together with its goal and verifies ownership. Sessions
/// under another user's goal are reported as missing.
async fn owned_session(
    state: &AppState,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<(Session, Goal), (StatusCode, String)> {
    let session = state
        .db
        .get_session_by_id(session_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to load session"))?;
    let goal = state
        .db
        .get_goal_by_id(session.goal_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to load session"))?;
    if goal.owner_id != user_id {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Session {} not found", session_id),
        ));
    }
    Ok((session, goal))
}

/// Pushes the goal's schedule forward after a completion. A write failure
/// here is logged and swallowed; the session itself was already saved.
async fn apply_completion_schedule(state: &AppState, goal: &Goal) {
    if let Some(update) = schedule_on_completion(goal, true, Utc::now()) {
        if let Err(e) = state.db.apply_schedule_update(goal.id, update).await {
            error!("Failed to update schedule for goal {}: {:?}", goal.id, e);
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /sessions - Log a practice session against a goal
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid duration"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Goal not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let goal = owned_goal(&state, user_id, req.goal_id).await?;

    if req.duration_minutes < 1 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Session duration must be at least one minute".to_string(),
        ));
    }

    let session = state
        .db
        .create_session(NewSession {
            goal_id: goal.id,
            title: resolve_session_title(req.title, &goal.title),
            note: req.note,
            date: req.date,
            duration_minutes: req.duration_minutes,
            completed: req.completed,
        })
        .await
        .map_err(|e| port_error_response(e, "Failed to create session"))?;

    // A session logged as already-completed drives the schedule forward.
    if fires_completion_schedule(Some(session.completed), false) {
        apply_completion_schedule(&state, &goal).await;
    }

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

/// GET /sessions - All of the user's sessions, most recent first
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "The user's sessions", body = Vec<SessionWithGoalResponse>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_sessions_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<SessionWithGoalResponse>>, (StatusCode, String)> {
    let sessions = state
        .db
        .list_sessions_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch sessions"))?;

    Ok(Json(
        sessions
            .into_iter()
            .map(|(session, goal_title)| SessionWithGoalResponse {
                session: session.into(),
                goal_title,
            })
            .collect(),
    ))
}

/// GET /sessions/goal/{goal_id} - One goal's sessions, most recent first
#[utoipa::path(
    get,
    path = "/sessions/goal/{goal_id}",
    params(("goal_id" = Uuid, Path, description = "The goal ID")),
    responses(
        (status = 200, description = "The goal's sessions", body = Vec<SessionResponse>),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn sessions_for_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Vec<SessionResponse>>, (StatusCode, String)> {
    owned_goal(&state, user_id, goal_id).await?;

    let sessions = state
        .db
        .list_sessions_for_goal(goal_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch sessions"))?;

    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}

/// PUT /sessions/{id} - Patch a session; completing it fires the schedule
#[utoipa::path(
    put,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "The session ID")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "The updated session", body = SessionResponse),
        (status = 400, description = "Invalid duration"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn update_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let (session, goal) = owned_session(&state, user_id, session_id).await?;

    if req.duration_minutes == Some(0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Session duration must be at least one minute".to_string(),
        ));
    }

    let completing = req.completed == Some(true);
    let fires_schedule = fires_completion_schedule(req.completed, session.completed);

    // Completing an untitled or placeholder-titled session names it after
    // the goal, even over a title supplied in the same request.
    let mut title = req.title;
    if completing && replaces_title_on_completion(&session.title) {
        title = Some(format!("{} session", goal.title));
    }

    let updated = state
        .db
        .update_session(
            session_id,
            SessionUpdate {
                title,
                note: req.note,
                date: req.date,
                duration_minutes: req.duration_minutes,
                completed: req.completed,
            },
        )
        .await
        .map_err(|e| port_error_response(e, "Failed to update session"))?;

    if fires_schedule {
        apply_completion_schedule(&state, &goal).await;
    }

    Ok(Json(updated.into()))
}

/// DELETE /sessions/{id} - Delete a session
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "The session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    owned_session(&state, user_id, session_id).await?;

    state
        .db
        .delete_session(session_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to delete session"))?;

    Ok(StatusCode::NO_CONTENT)
}
