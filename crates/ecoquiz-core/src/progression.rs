//! Progression engine.
//!
//! Folds a completed attempt into a profile's running aggregates and
//! evaluates the achievement table against the result. The engine owns no
//! I/O; the profile store persists what it returns.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::achievements;
use crate::model::{Profile, QuizAttemptRecord};
use crate::scoring::{average_score, percentage};
use crate::traits::{Clock, SystemClock};

/// Applies attempts to profiles, stamping them with its clock.
#[derive(Clone)]
pub struct ProgressionEngine {
    clock: Arc<dyn Clock>,
}

impl ProgressionEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Record an attempt completed now. See [`record_attempt_at`].
    pub fn record_attempt(
        &self,
        profile: Profile,
        score: u32,
        question_count: u32,
        time_spent_minutes: u32,
    ) -> Profile {
        record_attempt_at(
            profile,
            score,
            question_count,
            time_spent_minutes,
            self.clock.now(),
        )
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

/// Record an attempt completed at `now` and return the updated profile.
///
/// Steps, in order: build the record, prepend it to history, bump the
/// attempt count, best score and total time, recompute the average over the
/// full history, then evaluate every achievement rule against the updated
/// profile. Time spent is whole minutes with a floor of 1.
pub fn record_attempt_at(
    mut profile: Profile,
    score: u32,
    question_count: u32,
    time_spent_minutes: u32,
    now: DateTime<Utc>,
) -> Profile {
    let time_spent_minutes = time_spent_minutes.max(1);
    let record = QuizAttemptRecord {
        id: next_attempt_id(&profile, now),
        date: now,
        score,
        question_count,
        percentage: percentage(score, question_count),
        time_spent_minutes,
    };

    tracing::debug!(
        "recording attempt {}: score {} over {} questions in {} min",
        record.id,
        score,
        question_count,
        time_spent_minutes
    );

    profile.history.insert(0, record);
    profile.total_attempts += 1;
    profile.best_score = profile.best_score.max(score);
    profile.total_time_spent += time_spent_minutes;
    profile.average_score = average_score(&profile.history);

    let unlocked = achievements::evaluate(&mut profile, now);
    if !unlocked.is_empty() {
        tracing::info!("unlocked achievements: {}", unlocked.join(", "));
    }

    profile
}

/// Millisecond timestamp, bumped past the newest recorded id if the clock
/// has not moved on.
fn next_attempt_id(profile: &Profile, now: DateTime<Utc>) -> i64 {
    let candidate = now.timestamp_millis();
    match profile.latest_attempt() {
        Some(latest) if candidate <= latest.id => latest.id + 1,
        _ => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::traits::ManualClock;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn unlocked(profile: &Profile, id: &str) -> bool {
        profile.achievement(id).is_some_and(|a| a.unlocked)
    }

    #[test]
    fn perfect_first_attempt() {
        let profile = record_attempt_at(Profile::new(start()), 100, 10, 2, start());

        let attempt = profile.latest_attempt().unwrap();
        assert!((attempt.percentage - 100.0).abs() < f64::EPSILON);
        assert_eq!(profile.total_attempts, 1);
        assert_eq!(profile.best_score, 100);
        assert_eq!(profile.average_score, 100);
        assert_eq!(profile.total_time_spent, 2);

        for id in ["first_quiz", "perfect_score", "high_scorer", "time_efficient"] {
            assert!(unlocked(&profile, id), "{id} should be unlocked");
        }
        for id in ["five_quizzes", "consistent_learner", "dedicated_learner"] {
            assert!(!unlocked(&profile, id), "{id} should be locked");
        }
        assert_eq!(
            profile.achievement("first_quiz").unwrap().unlocked_date,
            Some(start())
        );
    }

    #[test]
    fn five_mediocre_attempts() {
        let mut profile = Profile::new(start());
        for i in 0..5 {
            profile = record_attempt_at(profile, 50, 10, 5, start() + Duration::minutes(i));
        }

        assert!(unlocked(&profile, "five_quizzes"));
        assert_eq!(profile.total_attempts, 5);
        assert_eq!(profile.average_score, 50);
        assert_eq!(profile.best_score, 50);
        assert!(!unlocked(&profile, "consistent_learner"));
        assert_eq!(profile.achievement("consistent_learner").unwrap().progress, 0);
        assert_eq!(profile.achievement("ten_quizzes").unwrap().progress, 5);
        assert_eq!(profile.achievement("dedicated_learner").unwrap().progress, 25);
    }

    #[test]
    fn streak_unlocks_on_third_attempt_exactly() {
        let mut profile = Profile::new(start());
        for i in 1..=3 {
            profile = record_attempt_at(profile, 80, 10, 4, start() + Duration::minutes(i));
            let streak = profile.achievement("consistent_learner").unwrap();
            assert_eq!(streak.progress, i as u32);
            assert_eq!(streak.unlocked, i == 3, "after attempt {i}");
        }
    }

    #[test]
    fn zero_questions_reports_zero_percent() {
        let profile = record_attempt_at(Profile::new(start()), 30, 0, 1, start());
        assert_eq!(profile.latest_attempt().unwrap().percentage, 0.0);
        assert_eq!(profile.total_attempts, 1);
    }

    #[test]
    fn history_is_newest_first_with_increasing_ids() {
        let mut profile = Profile::new(start());
        // Same instant three times: ids must still increase.
        for score in [10, 20, 30] {
            profile = record_attempt_at(profile, score, 10, 3, start());
        }
        let scores: Vec<_> = profile.history.iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
        let ids: Vec<_> = profile.history.iter().map(|h| h.id).collect();
        assert!(ids.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn time_spent_has_a_one_minute_floor() {
        let profile = record_attempt_at(Profile::new(start()), 0, 10, 0, start());
        assert_eq!(profile.latest_attempt().unwrap().time_spent_minutes, 1);
        assert_eq!(profile.total_time_spent, 1);
        assert!(profile.achievement("time_efficient").unwrap().unlocked);
    }

    #[test]
    fn aggregates_hold_over_mixed_sequence() {
        let scores = [40, 90, 70, 100, 10, 55, 85];
        let mut profile = Profile::new(start());
        let mut best_so_far = 0;
        for (i, &score) in scores.iter().enumerate() {
            let before = profile.clone();
            profile =
                record_attempt_at(profile, score, 10, 7, start() + Duration::minutes(i as i64));

            assert!(profile.best_score >= best_so_far);
            best_so_far = profile.best_score;

            let sum: u32 = scores[..=i].iter().sum();
            let expected = (sum as f64 / (i + 1) as f64).round() as u32;
            assert_eq!(profile.average_score, expected);

            for old in before.unlocked_achievements() {
                let now = profile.achievement(&old.id).unwrap();
                assert!(now.unlocked);
                assert_eq!(now.unlocked_date, old.unlocked_date);
                assert_eq!(now.progress, old.progress);
            }
        }
        assert_eq!(profile.best_score, 100);
        assert_eq!(profile.total_time_spent, 49);
        assert!(unlocked(&profile, "five_quizzes"));
    }

    #[test]
    fn long_run_unlocks_counters_and_time() {
        let mut profile = Profile::new(start());
        for i in 0..20 {
            profile = record_attempt_at(profile, 60, 10, 4, start() + Duration::hours(i));
        }
        for id in ["ten_quizzes", "eco_master", "dedicated_learner"] {
            assert!(unlocked(&profile, id), "{id} should be unlocked");
        }
        // Unlocked at the 15th attempt (60 minutes) and frozen there.
        assert_eq!(profile.achievement("dedicated_learner").unwrap().progress, 60);
        assert_eq!(profile.achievement("ten_quizzes").unwrap().progress, 10);
    }

    #[test]
    fn engine_stamps_with_its_clock() {
        let clock = Arc::new(ManualClock::new(start()));
        let engine = ProgressionEngine::new(clock.clone());

        let profile = engine.record_attempt(Profile::new(start()), 70, 10, 6);
        clock.advance(Duration::minutes(10));
        let profile = engine.record_attempt(profile, 80, 10, 6);

        assert_eq!(profile.history[0].date, start() + Duration::minutes(10));
        assert_eq!(profile.history[1].date, start());
        assert_eq!(profile.history[0].id, (start() + Duration::minutes(10)).timestamp_millis());
    }
}
