//! crates/cadence_core/src/progress.rs
//!
//! Weekly progress aggregation. Weeks run Sunday through Saturday on the
//! UTC calendar.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::Session;

/// Fixed completions-per-week target applied to every goal.
pub const DEFAULT_WEEKLY_TARGET: u32 = 5;

/// Completed-session count for one goal inside the current week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyProgress {
    pub progress: u32,
    pub target: u32,
    pub percentage: u32,
}

/// Bounds of the week containing `reference`: Sunday 00:00:00 through
/// Saturday 23:59:59, both inclusive.
pub fn week_bounds(reference: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = reference.date_naive();
    let sunday = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
    let start = sunday.and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::days(7) - Duration::seconds(1);
    (start, end)
}

/// Counts the goal's completed sessions inside the week containing `now`.
///
/// `percentage` is `round(progress / target * 100)` capped at 100; a zero
/// target yields zero rather than a division error.
pub fn weekly_progress(
    goal_id: Uuid,
    sessions: &[Session],
    now: DateTime<Utc>,
    target: u32,
) -> WeeklyProgress {
    let (start, end) = week_bounds(now);
    let progress = sessions
        .iter()
        .filter(|s| s.goal_id == goal_id && s.completed && s.date >= start && s.date <= end)
        .count() as u32;
    let percentage = if target == 0 {
        0
    } else {
        let raw = (progress as f64 / target as f64 * 100.0).round() as u32;
        raw.min(100)
    };
    WeeklyProgress {
        progress,
        target,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Session;
    use chrono::TimeZone;

    fn session(goal_id: Uuid, date: DateTime<Utc>, completed: bool) -> Session {
        Session {
            id: Uuid::new_v4(),
            goal_id,
            title: "Morning run".to_string(),
            note: None,
            date,
            duration_minutes: 30,
            completed,
            created_at: date,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    // 2024-06-02 is a Sunday; the week runs through Saturday 2024-06-08.

    #[test]
    fn week_bounds_span_sunday_to_saturday() {
        let (start, end) = week_bounds(at(2024, 6, 5, 14));
        assert_eq!(start, at(2024, 6, 2, 0));
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 8, 23, 59, 59).unwrap());
    }

    #[test]
    fn week_bounds_on_sunday_start_that_same_day() {
        let (start, _) = week_bounds(at(2024, 6, 2, 0));
        assert_eq!(start, at(2024, 6, 2, 0));
    }

    #[test]
    fn week_bounds_on_saturday_reach_back_to_sunday() {
        let (start, end) = week_bounds(Utc.with_ymd_and_hms(2024, 6, 8, 23, 59, 59).unwrap());
        assert_eq!(start, at(2024, 6, 2, 0));
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 8, 23, 59, 59).unwrap());
    }

    #[test]
    fn counts_only_completed_sessions_in_week() {
        let goal_id = Uuid::new_v4();
        let sessions = vec![
            session(goal_id, at(2024, 6, 3, 9), true),
            session(goal_id, at(2024, 6, 4, 9), true),
            session(goal_id, at(2024, 6, 5, 9), true),
            session(goal_id, at(2024, 6, 5, 18), false),
            session(goal_id, at(2024, 6, 6, 9), false),
        ];

        let wp = weekly_progress(goal_id, &sessions, at(2024, 6, 5, 12), 5);

        assert_eq!(wp.progress, 3);
        assert_eq!(wp.target, 5);
        assert_eq!(wp.percentage, 60);
    }

    #[test]
    fn sessions_outside_the_week_are_ignored() {
        let goal_id = Uuid::new_v4();
        let sessions = vec![
            // Saturday of the previous week and Sunday of the next.
            session(goal_id, at(2024, 6, 1, 9), true),
            session(goal_id, at(2024, 6, 9, 9), true),
            session(goal_id, at(2024, 6, 4, 9), true),
        ];

        let wp = weekly_progress(goal_id, &sessions, at(2024, 6, 5, 12), 5);
        assert_eq!(wp.progress, 1);
        assert_eq!(wp.percentage, 20);
    }

    #[test]
    fn other_goals_do_not_count() {
        let goal_id = Uuid::new_v4();
        let sessions = vec![
            session(Uuid::new_v4(), at(2024, 6, 4, 9), true),
            session(goal_id, at(2024, 6, 4, 10), true),
        ];

        let wp = weekly_progress(goal_id, &sessions, at(2024, 6, 5, 12), 5);
        assert_eq!(wp.progress, 1);
    }

    #[test]
    fn percentage_caps_at_one_hundred() {
        let goal_id = Uuid::new_v4();
        let sessions: Vec<Session> = (0..7)
            .map(|i| session(goal_id, at(2024, 6, 2, 1) + Duration::hours(i * 20), true))
            .collect();

        let wp = weekly_progress(goal_id, &sessions, at(2024, 6, 5, 12), 5);
        assert_eq!(wp.progress, 7);
        assert_eq!(wp.percentage, 100);
    }

    #[test]
    fn zero_target_yields_zero_percentage() {
        let goal_id = Uuid::new_v4();
        let sessions = vec![session(goal_id, at(2024, 6, 4, 9), true)];

        let wp = weekly_progress(goal_id, &sessions, at(2024, 6, 5, 12), 0);
        assert_eq!(wp.progress, 1);
        assert_eq!(wp.percentage, 0);
    }
}
