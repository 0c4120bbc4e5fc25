//! services/api/src/web/analytics.rs
//!
//! Read-only analytics endpoints. Each handler fetches the user's goals and
//! sessions and hands them to the pure engine in `cadence_core::analytics`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use cadence_core::analytics::{
    activity_summary, detect_skipped_goals, longest_streak, progress_series,
    rank_consistent_goals, skill_distribution, streak_series, ConsistentGoal, LongestStreak,
    ProgressBucket, SkillRow, SkippedGoal, StreakBucket, TimeRange,
};
use cadence_core::domain::Session;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::state::AppState;
use crate::web::port_error_response;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RangeParam {
    #[default]
    Week,
    Month,
    Year,
}

impl From<RangeParam> for TimeRange {
    fn from(range: RangeParam) -> Self {
        match range {
            RangeParam::Week => TimeRange::Week,
            RangeParam::Month => TimeRange::Month,
            RangeParam::Year => TimeRange::Year,
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct RangeQuery {
    /// Chart window: `week` (default), `month`, or `year`.
    #[serde(default)]
    pub range: RangeParam,
}

#[derive(Serialize, ToSchema)]
pub struct ActivitySummaryResponse {
    pub completed_sessions: u32,
    pub current_streak_days: u32,
    pub total_hours: u32,
}

#[derive(Serialize, ToSchema)]
pub struct ProgressBucketResponse {
    pub label: String,
    pub completed: u32,
    pub target: u32,
}

impl From<ProgressBucket> for ProgressBucketResponse {
    fn from(bucket: ProgressBucket) -> Self {
        Self {
            label: bucket.label.to_string(),
            completed: bucket.completed,
            target: bucket.target,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct StreakBucketResponse {
    pub label: String,
    pub streak: u32,
}

impl From<StreakBucket> for StreakBucketResponse {
    fn from(bucket: StreakBucket) -> Self {
        Self {
            label: bucket.label.to_string(),
            streak: bucket.streak,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SkillRowResponse {
    pub subject: String,
    pub value: u32,
    pub target: u32,
}

impl From<SkillRow> for SkillRowResponse {
    fn from(row: SkillRow) -> Self {
        Self {
            subject: row.subject,
            value: row.value,
            target: row.target,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct StreakGoalResponse {
    pub goal_id: Uuid,
    pub title: String,
}

#[derive(Serialize, ToSchema)]
pub struct LongestStreakResponse {
    pub days: u32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub most_frequent_goal: Option<StreakGoalResponse>,
}

impl From<LongestStreak> for LongestStreakResponse {
    fn from(streak: LongestStreak) -> Self {
        Self {
            days: streak.days,
            start: streak.start,
            end: streak.end,
            most_frequent_goal: streak.most_frequent_goal.map(|g| StreakGoalResponse {
                goal_id: g.goal_id,
                title: g.title,
            }),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SkippedGoalResponse {
    pub goal_id: Uuid,
    pub title: String,
    pub skip_count: u32,
    pub avg_gap_days: u32,
}

impl From<SkippedGoal> for SkippedGoalResponse {
    fn from(skipped: SkippedGoal) -> Self {
        Self {
            goal_id: skipped.goal_id,
            title: skipped.title,
            skip_count: skipped.skip_count,
            avg_gap_days: skipped.avg_gap_days,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ConsistentGoalResponse {
    pub goal_id: Uuid,
    pub title: String,
    pub score: f64,
    pub session_count: u32,
    pub completion_rate_percent: u32,
}

impl From<ConsistentGoal> for ConsistentGoalResponse {
    fn from(ranked: ConsistentGoal) -> Self {
        Self {
            goal_id: ranked.goal_id,
            title: ranked.title,
            score: ranked.score,
            session_count: ranked.session_count,
            completion_rate_percent: ranked.completion_rate_percent,
        }
    }
}

/// The Smart Insights payload: one longest-streak card plus the skipped and
/// most-consistent goal lists.
#[derive(Serialize, ToSchema)]
pub struct InsightsResponse {
    pub longest_streak: LongestStreakResponse,
    pub skipped_goals: Vec<SkippedGoalResponse>,
    pub consistent_goals: Vec<ConsistentGoalResponse>,
}

//=========================================================================================
// Shared Helpers
//=========================================================================================

async fn user_sessions(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<Session>, (StatusCode, String)> {
    Ok(state
        .db
        .list_sessions_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch sessions"))?
        .into_iter()
        .map(|(session, _)| session)
        .collect())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /analytics/summary - Dashboard stat cards
#[utoipa::path(
    get,
    path = "/analytics/summary",
    responses(
        (status = 200, description = "Completion count, current streak and total hours", body = ActivitySummaryResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn analytics_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<ActivitySummaryResponse>, (StatusCode, String)> {
    let sessions = user_sessions(&state, user_id).await?;
    let summary = activity_summary(&sessions, Utc::now().date_naive());

    Ok(Json(ActivitySummaryResponse {
        completed_sessions: summary.completed_sessions,
        current_streak_days: summary.current_streak_days,
        total_hours: summary.total_hours,
    }))
}

/// GET /analytics/progress - Completed-vs-target series for a time window
#[utoipa::path(
    get,
    path = "/analytics/progress",
    params(RangeQuery),
    responses(
        (status = 200, description = "One bucket per day, week or month", body = Vec<ProgressBucketResponse>),
        (status = 400, description = "Unknown range"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn analytics_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<ProgressBucketResponse>>, (StatusCode, String)> {
    let sessions = user_sessions(&state, user_id).await?;
    let series = progress_series(&sessions, query.range.into(), Utc::now());

    Ok(Json(series.into_iter().map(Into::into).collect()))
}

/// GET /analytics/streaks - Streak series for a time window
#[utoipa::path(
    get,
    path = "/analytics/streaks",
    params(RangeQuery),
    responses(
        (status = 200, description = "One bucket per day, week or month", body = Vec<StreakBucketResponse>),
        (status = 400, description = "Unknown range"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn analytics_streaks_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<StreakBucketResponse>>, (StatusCode, String)> {
    let sessions = user_sessions(&state, user_id).await?;
    let series = streak_series(&sessions, query.range.into(), Utc::now());

    Ok(Json(series.into_iter().map(Into::into).collect()))
}

/// GET /analytics/skills - Completion percentage per skill
#[utoipa::path(
    get,
    path = "/analytics/skills",
    responses(
        (status = 200, description = "Radar chart rows", body = Vec<SkillRowResponse>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn analytics_skills_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<SkillRowResponse>>, (StatusCode, String)> {
    let goals = state
        .db
        .list_goals_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch goals"))?;
    let sessions = user_sessions(&state, user_id).await?;

    let rows = skill_distribution(&goals, &sessions);
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /analytics/insights - Longest streak, skipped and consistent goals
#[utoipa::path(
    get,
    path = "/analytics/insights",
    responses(
        (status = 200, description = "The Smart Insights payload", body = InsightsResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn analytics_insights_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<InsightsResponse>, (StatusCode, String)> {
    let goals = state
        .db
        .list_goals_for_user(user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch goals"))?;
    let sessions = user_sessions(&state, user_id).await?;

    Ok(Json(InsightsResponse {
        longest_streak: longest_streak(&sessions, &goals).into(),
        skipped_goals: detect_skipped_goals(&sessions, &goals)
            .into_iter()
            .map(Into::into)
            .collect(),
        consistent_goals: rank_consistent_goals(&sessions, &goals)
            .into_iter()
            .map(Into::into)
            .collect(),
    }))
}
