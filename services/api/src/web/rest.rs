//! services/api/src/web/rest.rs
//!
//! The health endpoint and the master definition for the OpenAPI
//! specification. The resource handlers live in their own modules.

use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::me_handler,
        crate::web::goals::create_goal_handler,
        crate::web::goals::list_goals_handler,
        crate::web::goals::scheduled_goals_handler,
        crate::web::goals::goals_progress_handler,
        crate::web::goals::get_goal_handler,
        crate::web::goals::update_goal_handler,
        crate::web::goals::delete_goal_handler,
        crate::web::sessions::create_session_handler,
        crate::web::sessions::list_sessions_handler,
        crate::web::sessions::sessions_for_goal_handler,
        crate::web::sessions::update_session_handler,
        crate::web::sessions::delete_session_handler,
        crate::web::analytics::analytics_summary_handler,
        crate::web::analytics::analytics_progress_handler,
        crate::web::analytics::analytics_streaks_handler,
        crate::web::analytics::analytics_skills_handler,
        crate::web::analytics::analytics_insights_handler,
    ),
    components(
        schemas(
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::AuthResponse,
            crate::web::goals::CreateGoalRequest,
            crate::web::goals::UpdateGoalRequest,
            crate::web::goals::GoalResponse,
            crate::web::goals::ScheduledGoalResponse,
            crate::web::goals::GoalWithProgressResponse,
            crate::web::sessions::CreateSessionRequest,
            crate::web::sessions::UpdateSessionRequest,
            crate::web::sessions::SessionResponse,
            crate::web::sessions::SessionWithGoalResponse,
            crate::web::analytics::RangeParam,
            crate::web::analytics::ActivitySummaryResponse,
            crate::web::analytics::ProgressBucketResponse,
            crate::web::analytics::StreakBucketResponse,
            crate::web::analytics::SkillRowResponse,
            crate::web::analytics::StreakGoalResponse,
            crate::web::analytics::LongestStreakResponse,
            crate::web::analytics::SkippedGoalResponse,
            crate::web::analytics::ConsistentGoalResponse,
            crate::web::analytics::InsightsResponse,
        )
    ),
    tags(
        (name = "Cadence API", description = "Goal scheduling, weekly progress and analytics endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET / - Liveness check
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = String)
    )
)]
pub async fn health_handler() -> &'static str {
    "API is running"
}
