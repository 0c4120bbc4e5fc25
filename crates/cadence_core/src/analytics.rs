//! crates/cadence_core/src/analytics.rs
//!
//! Derived analytics over goals and sessions: streaks, skip detection,
//! consistency ranking, charting series, and the skill radar. Everything
//! here is pure; empty input yields empty or zero output, never an error.
//! Calendar-day truncation is UTC throughout.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Goal, Session};
use crate::progress::week_bounds;

const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEK_LABELS: [&str; 4] = ["Week 1", "Week 2", "Week 3", "Week 4"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Chart window selector for the series endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    Year,
}

/// The goal most practiced inside the longest streak's date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakGoal {
    pub goal_id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongestStreak {
    pub days: u32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub most_frequent_goal: Option<StreakGoal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGoal {
    pub goal_id: Uuid,
    pub title: String,
    pub skip_count: u32,
    pub avg_gap_days: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsistentGoal {
    pub goal_id: Uuid,
    pub title: String,
    pub score: f64,
    pub session_count: u32,
    pub completion_rate_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBucket {
    pub label: &'static str,
    pub completed: u32,
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakBucket {
    pub label: &'static str,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRow {
    pub subject: String,
    pub value: u32,
    pub target: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySummary {
    pub completed_sessions: u32,
    pub current_streak_days: u32,
    pub total_hours: u32,
}

/// Current streak in days, counted backwards from `today`.
///
/// Walks the distinct session dates newest-first. The date at index `i`
/// extends the streak only when it is exactly `today - i` days and at
/// least one session that day is completed; the first date after index 0
/// to fail either test ends the walk. Index 0 alone may fail without
/// ending it, so an incomplete session logged today does not sever
/// yesterday's chain.
pub fn calculate_streak(sessions: &[Session], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = sessions.iter().map(|s| s.date.date_naive()).collect();
    dates.sort_by(|a, b| b.cmp(a));
    dates.dedup();

    let mut streak = 0;
    for (i, date) in dates.iter().enumerate() {
        let expected = today - Duration::days(i as i64);
        let day_completed = *date == expected
            && sessions
                .iter()
                .any(|s| s.completed && s.date.date_naive() == *date);
        if day_completed {
            streak += 1;
        } else if i > 0 {
            break;
        }
    }
    streak
}

/// The longest run of consecutive days carrying completed sessions, with
/// the goal practiced most inside that run. Ties keep the earliest run.
pub fn longest_streak(sessions: &[Session], goals: &[Goal]) -> LongestStreak {
    let mut dates: Vec<NaiveDate> = sessions
        .iter()
        .filter(|s| s.completed)
        .map(|s| s.date.date_naive())
        .collect();
    dates.sort();
    dates.dedup();

    if dates.is_empty() {
        return LongestStreak {
            days: 0,
            start: None,
            end: None,
            most_frequent_goal: None,
        };
    }

    let mut longest = 0u32;
    let mut best_start = dates[0];
    let mut best_end = dates[0];
    let mut current = 1u32;
    let mut run_start = dates[0];
    for i in 1..dates.len() {
        if (dates[i] - dates[i - 1]).num_days() == 1 {
            current += 1;
        } else {
            if current > longest {
                longest = current;
                best_start = run_start;
                best_end = dates[i - 1];
            }
            current = 1;
            run_start = dates[i];
        }
    }
    if current > longest {
        longest = current;
        best_start = run_start;
        best_end = dates[dates.len() - 1];
    }

    // Completed sessions inside the winning range, oldest first; the first
    // goal to reach the top count wins ties.
    let mut in_range: Vec<&Session> = sessions
        .iter()
        .filter(|s| {
            let d = s.date.date_naive();
            s.completed && d >= best_start && d <= best_end
        })
        .collect();
    in_range.sort_by(|a, b| a.date.cmp(&b.date));

    let mut counts: Vec<(Uuid, u32)> = Vec::new();
    for s in &in_range {
        match counts.iter_mut().find(|entry| entry.0 == s.goal_id) {
            Some(entry) => entry.1 += 1,
            None => counts.push((s.goal_id, 1)),
        }
    }
    let mut top: Option<(Uuid, u32)> = None;
    for &(goal_id, count) in &counts {
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((goal_id, count));
        }
    }

    let most_frequent_goal = top.map(|(goal_id, _)| StreakGoal {
        goal_id,
        title: goals
            .iter()
            .find(|g| g.id == goal_id)
            .map(|g| g.title.clone())
            .unwrap_or_else(|| "Unknown Goal".to_string()),
    });

    LongestStreak {
        days: longest,
        start: Some(best_start),
        end: Some(best_end),
        most_frequent_goal,
    }
}

/// Day gaps between a goal's consecutive sessions, oldest first. Gaps are
/// whole days (the timestamp difference truncated), so same-day pairs
/// contribute 0.
fn session_gaps(goal_sessions: &[&Session]) -> Vec<i64> {
    goal_sessions
        .windows(2)
        .map(|pair| (pair[1].date - pair[0].date).num_days())
        .collect()
}

/// Goals whose recent gaps blow past their own average cadence.
///
/// Per goal with at least two sessions: the average gap is the rounded mean
/// of the positive day-gaps, and a gap counts as a skip when it exceeds
/// twice that average. Reports the three worst offenders by skip count.
pub fn detect_skipped_goals(sessions: &[Session], goals: &[Goal]) -> Vec<SkippedGoal> {
    let mut skipped: Vec<SkippedGoal> = Vec::new();
    for goal in goals {
        let mut goal_sessions: Vec<&Session> =
            sessions.iter().filter(|s| s.goal_id == goal.id).collect();
        if goal_sessions.len() < 2 {
            continue;
        }
        goal_sessions.sort_by(|a, b| a.date.cmp(&b.date));

        let gaps = session_gaps(&goal_sessions);
        let positive: Vec<i64> = gaps.iter().copied().filter(|g| *g > 0).collect();
        let avg_gap = if positive.is_empty() {
            0
        } else {
            (positive.iter().sum::<i64>() as f64 / positive.len() as f64).round() as i64
        };
        let skip_count = gaps
            .iter()
            .filter(|&&gap| avg_gap > 0 && gap > 2 * avg_gap)
            .count() as u32;
        if skip_count > 0 {
            skipped.push(SkippedGoal {
                goal_id: goal.id,
                title: goal.title.clone(),
                skip_count,
                avg_gap_days: avg_gap as u32,
            });
        }
    }
    skipped.sort_by(|a, b| b.skip_count.cmp(&a.skip_count));
    skipped.truncate(3);
    skipped
}

/// Scores goals by volume, cadence regularity, and completion rate.
///
/// Per goal with at least three sessions: all consecutive day-gaps (zeros
/// included) feed an unrounded mean and population standard deviation;
/// a perfectly regular cadence scores 100 consistency, otherwise 100 / σ.
/// The blended score is `sessions·0.4 + consistency·0.3 + rate·100·0.3`.
/// Reports the top three by score.
pub fn rank_consistent_goals(sessions: &[Session], goals: &[Goal]) -> Vec<ConsistentGoal> {
    let mut ranked: Vec<ConsistentGoal> = Vec::new();
    for goal in goals {
        let mut goal_sessions: Vec<&Session> =
            sessions.iter().filter(|s| s.goal_id == goal.id).collect();
        if goal_sessions.len() < 3 {
            continue;
        }
        goal_sessions.sort_by(|a, b| a.date.cmp(&b.date));

        let gaps = session_gaps(&goal_sessions);
        let mean = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        let variance = gaps
            .iter()
            .map(|&g| (g as f64 - mean).powi(2))
            .sum::<f64>()
            / gaps.len() as f64;
        let std_dev = variance.sqrt();
        let consistency = if std_dev == 0.0 { 100.0 } else { 100.0 / std_dev };

        let completed = goal_sessions.iter().filter(|s| s.completed).count();
        let completion_rate = completed as f64 / goal_sessions.len() as f64;
        let score =
            goal_sessions.len() as f64 * 0.4 + consistency * 0.3 + completion_rate * 100.0 * 0.3;
        if score > 0.0 {
            ranked.push(ConsistentGoal {
                goal_id: goal.id,
                title: goal.title.clone(),
                score,
                session_count: goal_sessions.len() as u32,
                completion_rate_percent: (completion_rate * 100.0).round() as u32,
            });
        }
    }
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(3);
    ranked
}

/// Completed-vs-target chart series for the given window.
///
/// Week buckets are the seven days of the anchor's Sunday-started week.
/// Month buckets split days-of-month 1..=28 into four weeks (day 29 and
/// later fall outside), and Year buckets go by calendar month; both of
/// those slice the entire supplied history rather than one month or year.
/// Targets never drop below the display floors 5 / 20 / 80.
pub fn progress_series(
    sessions: &[Session],
    range: TimeRange,
    anchor: DateTime<Utc>,
) -> Vec<ProgressBucket> {
    match range {
        TimeRange::Week => {
            let sunday = week_bounds(anchor).0.date_naive();
            (0..7)
                .map(|i| {
                    let day = sunday + Duration::days(i as i64);
                    let total = sessions.iter().filter(|s| s.date.date_naive() == day);
                    let (mut completed, mut count) = (0u32, 0u32);
                    for s in total {
                        count += 1;
                        if s.completed {
                            completed += 1;
                        }
                    }
                    ProgressBucket {
                        label: DAY_LABELS[i],
                        completed,
                        target: count.max(5),
                    }
                })
                .collect()
        }
        TimeRange::Month => {
            let mut buckets = [(0u32, 0u32); 4];
            for s in sessions {
                let index = ((s.date.date_naive().day() - 1) / 7) as usize;
                if index < buckets.len() {
                    buckets[index].1 += 1;
                    if s.completed {
                        buckets[index].0 += 1;
                    }
                }
            }
            WEEK_LABELS
                .into_iter()
                .zip(buckets)
                .map(|(label, (completed, count))| ProgressBucket {
                    label,
                    completed,
                    target: count.max(20),
                })
                .collect()
        }
        TimeRange::Year => {
            let mut buckets = [(0u32, 0u32); 12];
            for s in sessions {
                let index = s.date.date_naive().month0() as usize;
                buckets[index].1 += 1;
                if s.completed {
                    buckets[index].0 += 1;
                }
            }
            MONTH_LABELS
                .into_iter()
                .zip(buckets)
                .map(|(label, (completed, count))| ProgressBucket {
                    label,
                    completed,
                    target: count.max(80),
                })
                .collect()
        }
    }
}

/// Streak chart series: week buckets flag days that had a completed
/// session, month and year buckets carry completed-session counts.
pub fn streak_series(
    sessions: &[Session],
    range: TimeRange,
    anchor: DateTime<Utc>,
) -> Vec<StreakBucket> {
    match range {
        TimeRange::Week => {
            let sunday = week_bounds(anchor).0.date_naive();
            (0..7)
                .map(|i| {
                    let day = sunday + Duration::days(i as i64);
                    let done = sessions
                        .iter()
                        .any(|s| s.completed && s.date.date_naive() == day);
                    StreakBucket {
                        label: DAY_LABELS[i],
                        streak: if done { 1 } else { 0 },
                    }
                })
                .collect()
        }
        TimeRange::Month => {
            let mut buckets = [0u32; 4];
            for s in sessions.iter().filter(|s| s.completed) {
                let index = ((s.date.date_naive().day() - 1) / 7) as usize;
                if index < buckets.len() {
                    buckets[index] += 1;
                }
            }
            WEEK_LABELS
                .into_iter()
                .zip(buckets)
                .map(|(label, streak)| StreakBucket { label, streak })
                .collect()
        }
        TimeRange::Year => {
            let mut buckets = [0u32; 12];
            for s in sessions.iter().filter(|s| s.completed) {
                buckets[s.date.date_naive().month0() as usize] += 1;
            }
            MONTH_LABELS
                .into_iter()
                .zip(buckets)
                .map(|(label, streak)| StreakBucket { label, streak })
                .collect()
        }
    }
}

/// Completion percentage per skill for the radar chart.
///
/// Goals group by `category`, falling back to `title` when the category is
/// unset or empty; keys that are blank after trimming are dropped. Skills
/// whose goals have no sessions sit at the neutral 50.
pub fn skill_distribution(goals: &[Goal], sessions: &[Session]) -> Vec<SkillRow> {
    // (key, total sessions, completed sessions), in first-appearance order.
    let mut skills: Vec<(String, u32, u32)> = Vec::new();
    for goal in goals {
        let key = match &goal.category {
            Some(category) if !category.is_empty() => category.as_str(),
            _ => goal.title.as_str(),
        };
        if key.trim().is_empty() {
            continue;
        }
        let total = sessions.iter().filter(|s| s.goal_id == goal.id).count() as u32;
        let completed = sessions
            .iter()
            .filter(|s| s.goal_id == goal.id && s.completed)
            .count() as u32;
        match skills.iter_mut().find(|entry| entry.0 == key) {
            Some(entry) => {
                entry.1 += total;
                entry.2 += completed;
            }
            None => skills.push((key.to_string(), total, completed)),
        }
    }
    skills
        .into_iter()
        .map(|(subject, total, completed)| SkillRow {
            subject,
            value: if total > 0 {
                (completed as f64 / total as f64 * 100.0).round() as u32
            } else {
                50
            },
            target: 100,
        })
        .collect()
}

/// Headline numbers for the dashboard stat cards. Hours tally every
/// session's minutes, completed or not.
pub fn activity_summary(sessions: &[Session], today: NaiveDate) -> ActivitySummary {
    let total_minutes: u32 = sessions.iter().map(|s| s.duration_minutes).sum();
    ActivitySummary {
        completed_sessions: sessions.iter().filter(|s| s.completed).count() as u32,
        current_streak_days: calculate_streak(sessions, today),
        total_hours: (total_minutes as f64 / 60.0).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn goal(id: Uuid, title: &str, category: Option<&str>) -> Goal {
        Goal {
            id,
            owner_id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            category: category.map(|c| c.to_string()),
            frequency: 0,
            next_due_date: None,
            last_completed: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn session_at(goal_id: Uuid, date: DateTime<Utc>, completed: bool) -> Session {
        Session {
            id: Uuid::new_v4(),
            goal_id,
            title: "Practice".to_string(),
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

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod current_streak {
        use super::*;

        #[test]
        fn no_sessions_means_no_streak() {
            assert_eq!(calculate_streak(&[], day(2024, 6, 5)), 0);
        }

        #[test]
        fn three_consecutive_completed_days_count_three() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 5, 9), true),
                session_at(g, at(2024, 6, 4, 9), true),
                session_at(g, at(2024, 6, 3, 9), true),
            ];
            assert_eq!(calculate_streak(&sessions, day(2024, 6, 5)), 3);
        }

        #[test]
        fn incomplete_day_today_does_not_sever_earlier_chain() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 5, 9), false),
                session_at(g, at(2024, 6, 4, 9), true),
                session_at(g, at(2024, 6, 3, 9), true),
            ];
            assert_eq!(calculate_streak(&sessions, day(2024, 6, 5)), 2);
        }

        #[test]
        fn incomplete_day_inside_the_chain_ends_the_walk() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 5, 9), true),
                // 6/4 was logged but never completed; 6/3 must not count.
                session_at(g, at(2024, 6, 4, 9), false),
                session_at(g, at(2024, 6, 3, 9), true),
            ];
            assert_eq!(calculate_streak(&sessions, day(2024, 6, 5)), 1);
        }

        #[test]
        fn missing_day_ends_the_walk() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 5, 9), true),
                // 6/4 has nothing; 6/3 should not be reached.
                session_at(g, at(2024, 6, 3, 9), true),
            ];
            assert_eq!(calculate_streak(&sessions, day(2024, 6, 5)), 1);
        }

        #[test]
        fn streak_that_ended_yesterday_reads_zero() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 4, 9), true),
                session_at(g, at(2024, 6, 3, 9), true),
            ];
            assert_eq!(calculate_streak(&sessions, day(2024, 6, 5)), 0);
        }

        #[test]
        fn multiple_sessions_on_one_day_count_once() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 5, 9), true),
                session_at(g, at(2024, 6, 5, 20), true),
                session_at(g, at(2024, 6, 4, 9), true),
            ];
            assert_eq!(calculate_streak(&sessions, day(2024, 6, 5)), 2);
        }
    }

    mod longest {
        use super::*;

        #[test]
        fn empty_history_reports_zero_days() {
            let result = longest_streak(&[], &[]);
            assert_eq!(result.days, 0);
            assert_eq!(result.start, None);
            assert_eq!(result.end, None);
            assert!(result.most_frequent_goal.is_none());
        }

        #[test]
        fn finds_the_three_day_run() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 2, 9), true),
                session_at(g, at(2024, 1, 3, 9), true),
                session_at(g, at(2024, 1, 10, 9), true),
            ];

            let result = longest_streak(&sessions, &goals);

            assert_eq!(result.days, 3);
            assert_eq!(result.start, Some(day(2024, 1, 1)));
            assert_eq!(result.end, Some(day(2024, 1, 3)));
            let top = result.most_frequent_goal.unwrap();
            assert_eq!(top.goal_id, g);
            assert_eq!(top.title, "Read");
        }

        #[test]
        fn incomplete_sessions_do_not_extend_runs() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 2, 9), false),
                session_at(g, at(2024, 1, 3, 9), true),
            ];
            let result = longest_streak(&sessions, &[]);
            assert_eq!(result.days, 1);
        }

        #[test]
        fn earliest_run_wins_ties() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 2, 9), true),
                session_at(g, at(2024, 1, 5, 9), true),
                session_at(g, at(2024, 1, 6, 9), true),
            ];
            let result = longest_streak(&sessions, &[]);
            assert_eq!(result.days, 2);
            assert_eq!(result.start, Some(day(2024, 1, 1)));
            assert_eq!(result.end, Some(day(2024, 1, 2)));
        }

        #[test]
        fn most_practiced_goal_in_range_is_reported() {
            let a = Uuid::new_v4();
            let b = Uuid::new_v4();
            let goals = vec![goal(a, "Guitar", None), goal(b, "Running", None)];
            let sessions = vec![
                session_at(a, at(2024, 1, 1, 9), true),
                session_at(b, at(2024, 1, 1, 18), true),
                session_at(b, at(2024, 1, 2, 9), true),
                session_at(b, at(2024, 1, 3, 9), true),
                // outside the run, must not count
                session_at(a, at(2024, 2, 10, 9), true),
            ];

            let result = longest_streak(&sessions, &goals);
            let top = result.most_frequent_goal.unwrap();
            assert_eq!(top.goal_id, b);
            assert_eq!(top.title, "Running");
        }

        #[test]
        fn orphaned_goal_is_labeled_unknown() {
            let g = Uuid::new_v4();
            let sessions = vec![session_at(g, at(2024, 1, 1, 9), true)];
            let result = longest_streak(&sessions, &[]);
            assert_eq!(result.most_frequent_goal.unwrap().title, "Unknown Goal");
        }
    }

    mod skipped {
        use super::*;

        #[test]
        fn single_session_goal_never_flags() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions = vec![session_at(g, at(2024, 1, 1, 9), true)];
            assert!(detect_skipped_goals(&sessions, &goals).is_empty());
        }

        #[test]
        fn same_day_sessions_produce_no_average_and_no_skips() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 1, 12), true),
                session_at(g, at(2024, 1, 1, 20), true),
            ];
            assert!(detect_skipped_goals(&sessions, &goals).is_empty());
        }

        #[test]
        fn gap_beyond_twice_the_average_counts_as_skip() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            // Gaps 1, 1, 10: average rounds to 4, and 10 > 8.
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 2, 9), true),
                session_at(g, at(2024, 1, 3, 9), true),
                session_at(g, at(2024, 1, 13, 9), true),
            ];

            let result = detect_skipped_goals(&sessions, &goals);
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].goal_id, g);
            assert_eq!(result[0].skip_count, 1);
            assert_eq!(result[0].avg_gap_days, 4);
        }

        #[test]
        fn steady_cadence_is_not_flagged() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions: Vec<Session> = (0..5)
                .map(|i| session_at(g, at(2024, 1, 1 + i * 2, 9), true))
                .collect();
            assert!(detect_skipped_goals(&sessions, &goals).is_empty());
        }

        #[test]
        fn worst_offenders_come_first_capped_at_three() {
            let mut goals = Vec::new();
            let mut sessions = Vec::new();
            // Four goals with 1, 2, 3, 4 skips respectively: regular daily
            // cadence broken by that many ten-day holes.
            for skips in 1..=4u32 {
                let g = Uuid::new_v4();
                goals.push(goal(g, &format!("Goal {skips}"), None));
                let mut d = day(2024, 1, 1);
                for _ in 0..(6 + skips) {
                    sessions.push(session_at(
                        g,
                        d.and_time(chrono::NaiveTime::MIN).and_utc(),
                        true,
                    ));
                    d += Duration::days(1);
                }
                // Append the big holes at the end of the run.
                for _ in 0..skips {
                    d += Duration::days(10);
                    sessions.push(session_at(
                        g,
                        d.and_time(chrono::NaiveTime::MIN).and_utc(),
                        true,
                    ));
                    d += Duration::days(1);
                }
            }

            let result = detect_skipped_goals(&sessions, &goals);
            assert_eq!(result.len(), 3);
            assert_eq!(result[0].title, "Goal 4");
            assert_eq!(result[1].title, "Goal 3");
            assert_eq!(result[2].title, "Goal 2");
        }
    }

    mod consistency {
        use super::*;

        #[test]
        fn needs_at_least_three_sessions() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 2, 9), true),
            ];
            assert!(rank_consistent_goals(&sessions, &goals).is_empty());
        }

        #[test]
        fn perfect_daily_cadence_scores_full_consistency() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions: Vec<Session> = (0..5)
                .map(|i| session_at(g, at(2024, 1, 1 + i, 9), true))
                .collect();

            let result = rank_consistent_goals(&sessions, &goals);
            assert_eq!(result.len(), 1);
            // 5 sessions * 0.4 + 100 consistency * 0.3 + 100% completion * 0.3
            assert!((result[0].score - 62.0).abs() < 1e-9);
            assert_eq!(result[0].session_count, 5);
            assert_eq!(result[0].completion_rate_percent, 100);
        }

        #[test]
        fn irregular_cadence_scores_below_regular() {
            let regular = Uuid::new_v4();
            let erratic = Uuid::new_v4();
            let goals = vec![goal(regular, "Regular", None), goal(erratic, "Erratic", None)];
            let mut sessions: Vec<Session> = (0..4)
                .map(|i| session_at(regular, at(2024, 1, 1 + i, 9), true))
                .collect();
            sessions.extend([
                session_at(erratic, at(2024, 1, 1, 9), true),
                session_at(erratic, at(2024, 1, 2, 9), true),
                session_at(erratic, at(2024, 1, 20, 9), true),
                session_at(erratic, at(2024, 1, 21, 9), true),
            ]);

            let result = rank_consistent_goals(&sessions, &goals);
            assert_eq!(result[0].title, "Regular");
            assert!(result[0].score > result[1].score);
        }

        #[test]
        fn completion_rate_is_rounded_percent() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 2, 9), true),
                session_at(g, at(2024, 1, 3, 9), false),
            ];

            let result = rank_consistent_goals(&sessions, &goals);
            // 2/3 rounds to 67.
            assert_eq!(result[0].completion_rate_percent, 67);
        }
    }

    mod series {
        use super::*;

        // 2024-06-02 is a Sunday.

        #[test]
        fn week_series_has_seven_day_buckets() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 3, 9), true),
                session_at(g, at(2024, 6, 3, 12), true),
                session_at(g, at(2024, 6, 3, 18), false),
                session_at(g, at(2024, 6, 7, 9), true),
                // previous week, ignored
                session_at(g, at(2024, 5, 28, 9), true),
            ];

            let series = progress_series(&sessions, TimeRange::Week, at(2024, 6, 5, 12));

            assert_eq!(series.len(), 7);
            let labels: Vec<&str> = series.iter().map(|b| b.label).collect();
            assert_eq!(labels, vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
            // Monday: 2 completed of 3 logged, target floored at 5.
            assert_eq!(series[1].completed, 2);
            assert_eq!(series[1].target, 5);
            // Friday: 1 completed.
            assert_eq!(series[5].completed, 1);
            // Untouched day.
            assert_eq!(series[0].completed, 0);
            assert_eq!(series[0].target, 5);
        }

        #[test]
        fn week_target_rises_above_floor_with_heavy_days() {
            let g = Uuid::new_v4();
            let sessions: Vec<Session> = (0..6)
                .map(|i| session_at(g, at(2024, 6, 3, 2 + i), i % 2 == 0))
                .collect();

            let series = progress_series(&sessions, TimeRange::Week, at(2024, 6, 5, 12));
            assert_eq!(series[1].target, 6);
            assert_eq!(series[1].completed, 3);
        }

        #[test]
        fn month_series_buckets_by_day_of_month_across_history() {
            let g = Uuid::new_v4();
            let sessions = vec![
                // Different months on purpose: bucketing only reads the day.
                session_at(g, at(2024, 1, 3, 9), true),
                session_at(g, at(2024, 2, 10, 9), true),
                session_at(g, at(2024, 3, 17, 9), false),
                session_at(g, at(2024, 4, 24, 9), true),
                // Day 29 falls outside the four weeks.
                session_at(g, at(2024, 5, 29, 9), true),
            ];

            let series = progress_series(&sessions, TimeRange::Month, at(2024, 6, 5, 12));

            assert_eq!(series.len(), 4);
            assert_eq!(series[0].label, "Week 1");
            assert_eq!(series[0].completed, 1);
            assert_eq!(series[1].completed, 1);
            assert_eq!(series[2].completed, 0);
            assert_eq!(series[3].completed, 1);
            for bucket in &series {
                assert_eq!(bucket.target, 20);
            }
        }

        #[test]
        fn year_series_buckets_by_month_ignoring_year() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2023, 3, 10, 9), true),
                session_at(g, at(2024, 3, 12, 9), true),
                session_at(g, at(2024, 11, 1, 9), false),
            ];

            let series = progress_series(&sessions, TimeRange::Year, at(2024, 6, 5, 12));

            assert_eq!(series.len(), 12);
            assert_eq!(series[2].label, "Mar");
            assert_eq!(series[2].completed, 2);
            assert_eq!(series[10].completed, 0);
            for bucket in &series {
                assert_eq!(bucket.target, 80);
            }
        }

        #[test]
        fn streak_week_buckets_are_binary() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 6, 3, 9), true),
                session_at(g, at(2024, 6, 3, 12), true),
                session_at(g, at(2024, 6, 4, 9), false),
            ];

            let series = streak_series(&sessions, TimeRange::Week, at(2024, 6, 5, 12));

            assert_eq!(series[1].streak, 1);
            assert_eq!(series[2].streak, 0);
            assert_eq!(series[0].streak, 0);
        }

        #[test]
        fn streak_year_buckets_count_completions() {
            let g = Uuid::new_v4();
            let sessions = vec![
                session_at(g, at(2024, 3, 10, 9), true),
                session_at(g, at(2023, 3, 12, 9), true),
                session_at(g, at(2024, 3, 14, 9), false),
            ];

            let series = streak_series(&sessions, TimeRange::Year, at(2024, 6, 5, 12));
            assert_eq!(series[2].streak, 2);
        }
    }

    mod skills {
        use super::*;

        #[test]
        fn sessionless_skill_sits_at_neutral_fifty() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Chess", None)];

            let rows = skill_distribution(&goals, &[]);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].subject, "Chess");
            assert_eq!(rows[0].value, 50);
            assert_eq!(rows[0].target, 100);
        }

        #[test]
        fn category_groups_goals_and_title_is_the_fallback() {
            let a = Uuid::new_v4();
            let b = Uuid::new_v4();
            let c = Uuid::new_v4();
            let goals = vec![
                goal(a, "Scales", Some("Music")),
                goal(b, "Ear training", Some("Music")),
                goal(c, "Chess", None),
            ];
            let sessions = vec![
                session_at(a, at(2024, 1, 1, 9), true),
                session_at(b, at(2024, 1, 2, 9), false),
                session_at(c, at(2024, 1, 3, 9), true),
            ];

            let rows = skill_distribution(&goals, &sessions);

            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].subject, "Music");
            assert_eq!(rows[0].value, 50); // 1 of 2 completed
            assert_eq!(rows[1].subject, "Chess");
            assert_eq!(rows[1].value, 100);
        }

        #[test]
        fn blank_keys_are_dropped() {
            let a = Uuid::new_v4();
            let b = Uuid::new_v4();
            let goals = vec![goal(a, "   ", None), goal(b, "Real", Some("   "))];

            let rows = skill_distribution(&goals, &[]);
            // Whitespace-only category and whitespace-only title both
            // trim to nothing.
            assert!(rows.is_empty());
        }

        #[test]
        fn empty_category_falls_back_to_title() {
            let a = Uuid::new_v4();
            let goals = vec![goal(a, "Running", Some(""))];

            let rows = skill_distribution(&goals, &[]);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].subject, "Running");
        }

        #[test]
        fn values_stay_within_percent_bounds() {
            let a = Uuid::new_v4();
            let goals = vec![goal(a, "Read", None)];
            let sessions = vec![
                session_at(a, at(2024, 1, 1, 9), true),
                session_at(a, at(2024, 1, 2, 9), true),
                session_at(a, at(2024, 1, 3, 9), false),
            ];

            let rows = skill_distribution(&goals, &sessions);
            assert!(rows[0].value <= 100);
            assert_eq!(rows[0].value, 67);
        }
    }

    mod summary {
        use super::*;

        #[test]
        fn tallies_completions_streak_and_hours() {
            let g = Uuid::new_v4();
            let mut s1 = session_at(g, at(2024, 6, 5, 9), true);
            s1.duration_minutes = 50;
            let mut s2 = session_at(g, at(2024, 6, 4, 9), true);
            s2.duration_minutes = 45;
            let mut s3 = session_at(g, at(2024, 6, 1, 9), false);
            s3.duration_minutes = 40;
            let sessions = vec![s1, s2, s3];

            let summary = activity_summary(&sessions, day(2024, 6, 5));

            assert_eq!(summary.completed_sessions, 2);
            assert_eq!(summary.current_streak_days, 2);
            // 135 minutes rounds to 2 hours, incomplete time included.
            assert_eq!(summary.total_hours, 2);
        }

        #[test]
        fn empty_history_is_all_zeroes() {
            let summary = activity_summary(&[], day(2024, 6, 5));
            assert_eq!(summary.completed_sessions, 0);
            assert_eq!(summary.current_streak_days, 0);
            assert_eq!(summary.total_hours, 0);
        }

        #[test]
        fn same_input_same_output() {
            let g = Uuid::new_v4();
            let goals = vec![goal(g, "Read", None)];
            let sessions = vec![
                session_at(g, at(2024, 1, 1, 9), true),
                session_at(g, at(2024, 1, 2, 9), true),
                session_at(g, at(2024, 1, 3, 9), false),
            ];

            assert_eq!(
                longest_streak(&sessions, &goals),
                longest_streak(&sessions, &goals)
            );
            assert_eq!(
                skill_distribution(&goals, &sessions),
                skill_distribution(&goals, &sessions)
            );
            assert_eq!(
                progress_series(&sessions, TimeRange::Year, at(2024, 6, 5, 12)),
                progress_series(&sessions, TimeRange::Year, at(2024, 6, 5, 12))
            );
        }
    }
}
