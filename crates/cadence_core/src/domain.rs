//! crates/cadence_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

// Represents a user - used throughout the app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// A recurring or one-off objective owned by a single user.
///
/// `frequency` is the recurrence interval in days; `0` means the goal is
/// not scheduled. `next_due_date` is only ever set while `frequency > 0`.
#[derive(Debug, Clone)]
pub struct Goal {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Optional skill-grouping key; analytics fall back to `title`.
    pub category: Option<String>,
    pub frequency: u32,
    pub next_due_date: Option<NaiveDate>,
    pub last_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A single logged practice instance tied to a goal.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    /// Minutes spent; at least 1, enforced at the mutation boundary.
    pub duration_minutes: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a goal. `next_due_date` is derived by the store
/// (today when `frequency > 0`, otherwise unset).
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: u32,
}

/// Partial goal update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<u32>,
}

/// Fields for creating a session. The title here is already resolved
/// (defaulting happens at the API boundary, not in the store).
#[derive(Debug, Clone)]
pub struct NewSession {
    pub goal_id: Uuid,
    pub title: String,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub completed: bool,
}

/// Partial session update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub title: Option<String>,
    pub note: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub completed: Option<bool>,
}
