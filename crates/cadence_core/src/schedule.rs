//! crates/cadence_core/src/schedule.rs
//!
//! Recurrence scheduling for goals. Pure functions: the caller fetches the
//! goal, asks the engine what changed, and persists the answer through the
//! `HabitStore` port.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::Goal;

/// Schedule bookkeeping produced when a session completes a recurring goal.
/// The caller writes both fields back via `HabitStore::apply_schedule_update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleUpdate {
    pub last_completed: DateTime<Utc>,
    pub next_due_date: NaiveDate,
}

/// Where a goal stands relative to its next due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Upcoming,
    DueToday,
    Overdue,
}

impl GoalStatus {
    /// Wire representation used by the API layer.
    pub fn as_str(self) -> &'static str {
        match self {
            GoalStatus::Upcoming => "upcoming",
            GoalStatus::DueToday => "due-today",
            GoalStatus::Overdue => "overdue",
        }
    }
}

/// A goal joined with its computed status, for the scheduled view.
#[derive(Debug, Clone)]
pub struct ScheduledGoal {
    pub goal: Goal,
    pub status: GoalStatus,
}

/// Computes the schedule change caused by marking a session completed.
///
/// Returns `None` when nothing should change: the session is not completed,
/// or the goal has no recurrence (`frequency == 0`). Otherwise the next due
/// date is the completion's UTC calendar day plus `frequency` days.
///
/// The caller is responsible for invoking this exactly once per transition
/// into `completed = true`; re-saving an already-completed session must not
/// push the due date further out.
pub fn schedule_on_completion(
    goal: &Goal,
    completed: bool,
    completed_at: DateTime<Utc>,
) -> Option<ScheduleUpdate> {
    if !completed || goal.frequency == 0 {
        return None;
    }
    Some(ScheduleUpdate {
        last_completed: completed_at,
        next_due_date: completed_at.date_naive() + Duration::days(goal.frequency as i64),
    })
}

/// Classifies a goal against `today` at day granularity.
///
/// Unscheduled goals (`frequency == 0` or no due date on record) are always
/// `Upcoming`; a due date strictly before `today` is `Overdue`.
pub fn status_of(goal: &Goal, today: NaiveDate) -> GoalStatus {
    if goal.frequency == 0 {
        return GoalStatus::Upcoming;
    }
    match goal.next_due_date {
        None => GoalStatus::Upcoming,
        Some(due) => {
            if due < today {
                GoalStatus::Overdue
            } else if due == today {
                GoalStatus::DueToday
            } else {
                GoalStatus::Upcoming
            }
        }
    }
}

/// Builds the scheduled view: recurring goals only, each with its status,
/// ordered by next due date ascending with undated goals last.
pub fn list_scheduled(goals: Vec<Goal>, today: NaiveDate) -> Vec<ScheduledGoal> {
    let mut scheduled: Vec<ScheduledGoal> = goals
        .into_iter()
        .filter(|g| g.frequency > 0)
        .map(|goal| ScheduledGoal {
            status: status_of(&goal, today),
            goal,
        })
        .collect();
    scheduled.sort_by_key(|s| (s.goal.next_due_date.is_none(), s.goal.next_due_date));
    scheduled
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn goal(frequency: u32, next_due_date: Option<NaiveDate>) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Practice guitar".to_string(),
            description: None,
            category: None,
            frequency,
            next_due_date,
            last_completed: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn completion_of_weekly_goal_moves_due_date_seven_days_out() {
        let g = goal(7, Some(day(2024, 6, 1)));
        let completed_at = Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap();

        let update = schedule_on_completion(&g, true, completed_at).unwrap();

        assert_eq!(update.next_due_date, day(2024, 6, 8));
        assert_eq!(update.last_completed, completed_at);
    }

    #[test]
    fn incomplete_session_never_reschedules() {
        let g = goal(7, Some(day(2024, 6, 1)));
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap();

        assert!(schedule_on_completion(&g, false, at).is_none());
    }

    #[test]
    fn unscheduled_goal_never_reschedules() {
        let g = goal(0, None);
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap();

        assert!(schedule_on_completion(&g, true, at).is_none());
    }

    #[test]
    fn due_date_crosses_month_boundary() {
        let g = goal(3, None);
        let at = Utc.with_ymd_and_hms(2024, 1, 30, 23, 59, 0).unwrap();

        let update = schedule_on_completion(&g, true, at).unwrap();
        assert_eq!(update.next_due_date, day(2024, 2, 2));
    }

    #[test]
    fn zero_frequency_goal_is_always_upcoming() {
        let g = goal(0, Some(day(2020, 1, 1)));
        assert_eq!(status_of(&g, day(2024, 6, 3)), GoalStatus::Upcoming);
    }

    #[test]
    fn past_due_date_is_overdue() {
        let g = goal(7, Some(day(2024, 6, 1)));
        assert_eq!(status_of(&g, day(2024, 6, 3)), GoalStatus::Overdue);
    }

    #[test]
    fn matching_due_date_is_due_today() {
        let g = goal(7, Some(day(2024, 6, 3)));
        assert_eq!(status_of(&g, day(2024, 6, 3)), GoalStatus::DueToday);
    }

    #[test]
    fn future_due_date_is_upcoming() {
        let g = goal(7, Some(day(2024, 6, 10)));
        assert_eq!(status_of(&g, day(2024, 6, 3)), GoalStatus::Upcoming);
    }

    #[test]
    fn goal_without_due_date_is_upcoming() {
        let g = goal(7, None);
        assert_eq!(status_of(&g, day(2024, 6, 3)), GoalStatus::Upcoming);
    }

    #[test]
    fn scheduled_view_filters_and_sorts_by_due_date() {
        let today = day(2024, 6, 3);
        let goals = vec![
            goal(7, Some(day(2024, 6, 10))),
            goal(0, None),
            goal(1, Some(day(2024, 6, 1))),
            goal(14, None),
            goal(3, Some(day(2024, 6, 3))),
        ];

        let view = list_scheduled(goals, today);

        let dates: Vec<Option<NaiveDate>> =
            view.iter().map(|s| s.goal.next_due_date).collect();
        assert_eq!(
            dates,
            vec![
                Some(day(2024, 6, 1)),
                Some(day(2024, 6, 3)),
                Some(day(2024, 6, 10)),
                None,
            ]
        );
        assert_eq!(view[0].status, GoalStatus::Overdue);
        assert_eq!(view[1].status, GoalStatus::DueToday);
        assert_eq!(view[2].status, GoalStatus::Upcoming);
        assert_eq!(view[3].status, GoalStatus::Upcoming);
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(GoalStatus::Upcoming.as_str(), "upcoming");
        assert_eq!(GoalStatus::DueToday.as_str(), "due-today");
        assert_eq!(GoalStatus::Overdue.as_str(), "overdue");
    }
}
