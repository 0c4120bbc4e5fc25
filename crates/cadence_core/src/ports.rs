//! crates/cadence_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Goal, GoalUpdate, NewGoal, NewSession, Session, SessionUpdate, User, UserCredentials,
};
use crate::schedule::ScheduleUpdate;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait HabitStore: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Goal Management ---
    async fn create_goal(&self, owner_id: Uuid, goal: NewGoal) -> PortResult<Goal>;

    async fn get_goal_by_id(&self, goal_id: Uuid) -> PortResult<Goal>;

    /// Returns the user's goals, newest first.
    async fn list_goals_for_user(&self, owner_id: Uuid) -> PortResult<Vec<Goal>>;

    /// Applies the non-`None` fields of `update` and returns the new row.
    /// Setting `frequency` to 0 also clears `next_due_date`.
    async fn update_goal(&self, goal_id: Uuid, update: GoalUpdate) -> PortResult<Goal>;

    /// Writes the recurrence bookkeeping produced by a completed session.
    async fn apply_schedule_update(
        &self,
        goal_id: Uuid,
        update: ScheduleUpdate,
    ) -> PortResult<()>;

    /// Deletes the goal and, via the schema, all of its sessions.
    async fn delete_goal(&self, goal_id: Uuid) -> PortResult<()>;

    // --- Session Management ---
    async fn create_session(&self, session: NewSession) -> PortResult<Session>;

    async fn get_session_by_id(&self, session_id: Uuid) -> PortResult<Session>;

    /// All sessions across the user's goals, most recent date first.
    /// The second tuple element is the owning goal's title.
    async fn list_sessions_for_user(&self, owner_id: Uuid)
        -> PortResult<Vec<(Session, String)>>;

    /// Sessions for one goal, most recent date first.
    async fn list_sessions_for_goal(&self, goal_id: Uuid) -> PortResult<Vec<Session>>;

    /// The `limit` most recent sessions for one goal.
    async fn list_recent_sessions_for_goal(
        &self,
        goal_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Session>>;

    async fn update_session(
        &self,
        session_id: Uuid,
        update: SessionUpdate,
    ) -> PortResult<Session>;

    async fn delete_session(&self, session_id: Uuid) -> PortResult<()>;
}
