//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `HabitStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use cadence_core::domain::{
    Goal, GoalUpdate, NewGoal, NewSession, Session, SessionUpdate, User, UserCredentials,
};
use cadence_core::ports::{HabitStore, PortError, PortResult};
use cadence_core::schedule::ScheduleUpdate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const GOAL_COLUMNS: &str =
    "id, owner_id, title, description, category, frequency, next_due_date, last_completed, created_at";
const SESSION_COLUMNS: &str =
    "id, goal_id, title, note, date, duration_minutes, completed, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `HabitStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct GoalRecord {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    category: Option<String>,
    frequency: i32,
    next_due_date: Option<NaiveDate>,
    last_completed: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}
impl GoalRecord {
    fn to_domain(self) -> Goal {
        Goal {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            category: self.category,
            frequency: self.frequency as u32,
            next_due_date: self.next_due_date,
            last_completed: self.last_completed,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct SessionRecord {
    id: Uuid,
    goal_id: Uuid,
    title: String,
    note: Option<String>,
    date: DateTime<Utc>,
    duration_minutes: i32,
    completed: bool,
    created_at: DateTime<Utc>,
}
impl SessionRecord {
    fn to_domain(self) -> Session {
        Session {
            id: self.id,
            goal_id: self.goal_id,
            title: self.title,
            note: self.note,
            date: self.date,
            duration_minutes: self.duration_minutes as u32,
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

/// A session row joined with the owning goal's title.
#[derive(FromRow)]
struct SessionWithGoalRecord {
    #[sqlx(flatten)]
    session: SessionRecord,
    goal_title: String,
}
impl SessionWithGoalRecord {
    fn to_domain(self) -> (Session, String) {
        (self.session.to_domain(), self.goal_title)
    }
}

//=========================================================================================
// `HabitStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl HabitStore for PgStore {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict(format!("An account for {} already exists", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("No account for {}", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, email FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("User {} not found", user_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => unexpected(e),
        })?;
        Ok(user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_goal(&self, owner_id: Uuid, goal: NewGoal) -> PortResult<Goal> {
        // A recurring goal starts due today; an unscheduled one has no date.
        let next_due_date = if goal.frequency > 0 {
            Some(Utc::now().date_naive())
        } else {
            None
        };
        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            "INSERT INTO goals (id, owner_id, title, description, category, frequency, next_due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {GOAL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(goal.title)
        .bind(goal.description)
        .bind(goal.category)
        .bind(goal.frequency as i32)
        .bind(next_due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_goal_by_id(&self, goal_id: Uuid) -> PortResult<Goal> {
        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1"
        ))
        .bind(goal_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Goal {} not found", goal_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn list_goals_for_user(&self, owner_id: Uuid) -> PortResult<Vec<Goal>> {
        let records = sqlx::query_as::<_, GoalRecord>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_goal(&self, goal_id: Uuid, update: GoalUpdate) -> PortResult<Goal> {
        // Patch semantics: NULL binds leave columns as they are. Dropping the
        // frequency to zero also clears the due date.
        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            "UPDATE goals SET \
               title = COALESCE($2, title), \
               description = COALESCE($3, description), \
               category = COALESCE($4, category), \
               frequency = COALESCE($5, frequency), \
               next_due_date = CASE WHEN $5 = 0 THEN NULL ELSE next_due_date END \
             WHERE id = $1 RETURNING {GOAL_COLUMNS}"
        ))
        .bind(goal_id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.category)
        .bind(update.frequency.map(|f| f as i32))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Goal {} not found", goal_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn apply_schedule_update(
        &self,
        goal_id: Uuid,
        update: ScheduleUpdate,
    ) -> PortResult<()> {
        sqlx::query("UPDATE goals SET last_completed = $2, next_due_date = $3 WHERE id = $1")
            .bind(goal_id)
            .bind(update.last_completed)
            .bind(update.next_due_date)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn delete_goal(&self, goal_id: Uuid) -> PortResult<()> {
        sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(goal_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_session(&self, session: NewSession) -> PortResult<Session> {
        let record = sqlx::query_as::<_, SessionRecord>(&format!(
            "INSERT INTO sessions (id, goal_id, title, note, date, duration_minutes, completed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {SESSION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(session.goal_id)
        .bind(session.title)
        .bind(session.note)
        .bind(session.date)
        .bind(session.duration_minutes as i32)
        .bind(session.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_session_by_id(&self, session_id: Uuid) -> PortResult<Session> {
        let record = sqlx::query_as::<_, SessionRecord>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Session {} not found", session_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn list_sessions_for_user(
        &self,
        owner_id: Uuid,
    ) -> PortResult<Vec<(Session, String)>> {
        let records = sqlx::query_as::<_, SessionWithGoalRecord>(
            "SELECT s.id, s.goal_id, s.title, s.note, s.date, s.duration_minutes, \
                    s.completed, s.created_at, g.title AS goal_title \
             FROM sessions s JOIN goals g ON s.goal_id = g.id \
             WHERE g.owner_id = $1 ORDER BY s.date DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_sessions_for_goal(&self, goal_id: Uuid) -> PortResult<Vec<Session>> {
        let records = sqlx::query_as::<_, SessionRecord>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE goal_id = $1 ORDER BY date DESC"
        ))
        .bind(goal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_recent_sessions_for_goal(
        &self,
        goal_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Session>> {
        let records = sqlx::query_as::<_, SessionRecord>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE goal_id = $1 \
             ORDER BY date DESC LIMIT $2"
        ))
        .bind(goal_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_session(
        &self,
        session_id: Uuid,
        update: SessionUpdate,
    ) -> PortResult<Session> {
        let record = sqlx::query_as::<_, SessionRecord>(&format!(
            "UPDATE sessions SET \
               title = COALESCE($2, title), \
               note = COALESCE($3, note), \
               date = COALESCE($4, date), \
               duration_minutes = COALESCE($5, duration_minutes), \
               completed = COALESCE($6, completed) \
             WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        ))
        .bind(session_id)
        .bind(update.title)
        .bind(update.note)
        .bind(update.date)
        .bind(update.duration_minutes.map(|m| m as i32))
        .bind(update.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Session {} not found", session_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_session(&self, session_id: Uuid) -> PortResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
