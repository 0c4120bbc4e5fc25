//! services/api/src/web/goals.rs
//!
//! Goal endpoints: CRUD, the scheduled view, and the weekly progress view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use cadence_core::domain::{Goal, GoalUpdate, NewGoal};
use cadence_core::progress::{weekly_progress, DEFAULT_WEEKLY_TARGET};
use cadence_core::schedule::list_scheduled;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::sessions::SessionResponse;
use crate::web::state::AppState;
use crate::web::port_error_response;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateGoalRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Recurrence interval in days; 0 leaves the goal unscheduled.
    #[serde(default)]
    pub frequency: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct GoalResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: u32,
    pub next_due_date: Option<NaiveDate>,
    pub last_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title,
            description: goal.description,
            category: goal.category,
            frequency: goal.frequency,
            next_due_date: goal.next_due_date,
            last_completed: goal.last_completed,
            created_at: goal.created_at,
        }
    }
}

/// A recurring goal with its due status and a handful of recent sessions.
#[derive(Serialize, ToSchema)]
pub struct ScheduledGoalResponse {
    pub goal: GoalResponse,
    /// One of `upcoming`, `due-today`, `overdue`.
    pub status: String,
    pub recent_sessions: Vec<SessionResponse>,
}

/// A goal with its completion count for the current week.
#[derive(Serialize, ToSchema)]
pub struct GoalWithProgressResponse {
    pub goal: GoalResponse,
    pub progress: u32,
    pub target: u32,
    pub percentage: u32,
}

//=========================================================================================
// Shared Helpers
//=========================================================================================

/// Loads a goal and verifies it belongs to `user_id`. Goals owned by other
/// users are reported as missing rather than forbidden.
pub(crate) async fn owned_goal(
    state: &AppState,
    user_id: Uuid,
    goal_id: Uuid,
) -> Result<Goal, (StatusCode, String)> {
    let goal = state
        .db
        .get_goal_by_id(goal_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to load goal"))?;
    if goal.owner_id != user_id {
        return Err((StatusCode::NOT_FOUND, format!("Goal {} not found", goal_id)));
    }
    Ok(goal)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /goals - Create a new goal
#[utoipa::path(
    post,
    path = "/goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalResponse),
        (status = 400, description = "Missing or blank title"),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Goal title is required".to_string()));
    }

    let goal = state
        .db
        .create_goal(
            user_id,
            NewGoal {
                title: req.title,
                description: req.description,
                category: req.category,
                frequency: req.frequency,
            },
        )
        .await
        .map_err(|e| port_error_response(e, "Failed to create goal"))?;

    Ok((StatusCode::CREATED, Json(GoalResponse::from(goal))))
}

/// GET /goals - List the user's goals, newest first
#[utoipa::path(
    get,
    path = "/goals",
    responses(
        (status = 200, description = "The user's goals", body = Vec<GoalResponse>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_goals_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<GoalResponse>>, (StatusCode, String)> {
    let goals = state
        .db
        .list_goals_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch goals"))?;

    Ok(Json(goals.into_iter().map(GoalResponse::from).collect()))
}

/// GET /goals/scheduled - Recurring goals with status and recent sessions
#[utoipa::path(
    get,
    path = "/goals/scheduled",
    responses(
        (status = 200, description = "Recurring goals ordered by due date", body = Vec<ScheduledGoalResponse>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn scheduled_goals_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<ScheduledGoalResponse>>, (StatusCode, String)> {
    let goals = state
        .db
        .list_goals_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch scheduled goals"))?;

    let today = Utc::now().date_naive();
    let mut response = Vec::new();
    for scheduled in list_scheduled(goals, today) {
        let recent = state
            .db
            .list_recent_sessions_for_goal(scheduled.goal.id, 10)
            .await
            .map_err(|e| port_error_response(e, "Failed to fetch recent sessions"))?;
        response.push(ScheduledGoalResponse {
            status: scheduled.status.as_str().to_string(),
            recent_sessions: recent.into_iter().map(SessionResponse::from).collect(),
            goal: scheduled.goal.into(),
        });
    }

    Ok(Json(response))
}

/// GET /goals/progress - Each goal's completions against this week's target
#[utoipa::path(
    get,
    path = "/goals/progress",
    responses(
        (status = 200, description = "Weekly progress per goal", body = Vec<GoalWithProgressResponse>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn goals_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<GoalWithProgressResponse>>, (StatusCode, String)> {
    let goals = state
        .db
        .list_goals_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch goals"))?;
    let sessions: Vec<_> = state
        .db
        .list_sessions_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch sessions"))?
        .into_iter()
        .map(|(session, _)| session)
        .collect();

    let now = Utc::now();
    let response = goals
        .into_iter()
        .map(|goal| {
            let week = weekly_progress(goal.id, &sessions, now, DEFAULT_WEEKLY_TARGET);
            GoalWithProgressResponse {
                goal: goal.into(),
                progress: week.progress,
                target: week.target,
                percentage: week.percentage,
            }
        })
        .collect();

    Ok(Json(response))
}

/// GET /goals/{id} - Fetch one goal
#[utoipa::path(
    get,
    path = "/goals/{id}",
    params(("id" = Uuid, Path, description = "The goal ID")),
    responses(
        (status = 200, description = "The goal", body = GoalResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn get_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    let goal = owned_goal(&state, user_id, goal_id).await?;
    Ok(Json(goal.into()))
}

/// PUT /goals/{id} - Patch a goal's fields
#[utoipa::path(
    put,
    path = "/goals/{id}",
    params(("id" = Uuid, Path, description = "The goal ID")),
    request_body = UpdateGoalRequest,
    responses(
        (status = 200, description = "The updated goal", body = GoalResponse),
        (status = 400, description = "Blank title"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn update_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Goal title is required".to_string()));
        }
    }
    owned_goal(&state, user_id, goal_id).await?;

    let updated = state
        .db
        .update_goal(
            goal_id,
            GoalUpdate {
                title: req.title,
                description: req.description,
                category: req.category,
                frequency: req.frequency,
            },
        )
        .await
        .map_err(|e| port_error_response(e, "Failed to update goal"))?;

    Ok(Json(updated.into()))
}

/// DELETE /goals/{id} - Delete a goal and all of its sessions
#[utoipa::path(
    delete,
    path = "/goals/{id}",
    params(("id" = Uuid, Path, description = "The goal ID")),
    responses(
        (status = 204, description = "Goal and related sessions deleted"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn delete_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    owned_goal(&state, user_id, goal_id).await?;

    state
        .db
        .delete_goal(goal_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to delete goal"))?;

    Ok(StatusCode::NO_CONTENT)
}
