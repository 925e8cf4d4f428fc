//! Achievement rule table and evaluation.
//!
//! Every achievement is a row of [`RULES`]: display metadata, a requirement
//! and a progress extractor. A rule is met when its extracted progress reaches
//! the requirement. Adding an achievement means adding a row; evaluation
//! never changes.

use chrono::{DateTime, Utc};

use crate::model::{Achievement, Profile, QuizAttemptRecord};

/// Score of a flawless ten-question attempt.
pub const PERFECT_SCORE: u32 = 100;
/// Minimum score for the high-scorer badge.
pub const HIGH_SCORE: u32 = 90;
/// Minimum score that keeps a passing streak alive.
pub const STREAK_SCORE: u32 = 70;
/// Attempts in a row needed for the streak badge.
pub const STREAK_LENGTH: u32 = 3;
/// Longest attempt, in minutes, that counts as a quick finish.
pub const QUICK_FINISH_MINUTES: u32 = 3;

/// State a rule is evaluated against: the profile after the attempt was
/// folded in, and that attempt.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub profile: &'a Profile,
    pub attempt: &'a QuizAttemptRecord,
}

/// One row of the achievement table.
pub struct AchievementRule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: u32,
    /// Progress value while locked; the rule is met once it reaches `requirement`.
    pub progress: fn(&RuleContext<'_>) -> u32,
}

impl AchievementRule {
    pub fn is_met(&self, ctx: &RuleContext<'_>) -> bool {
        (self.progress)(ctx) >= self.requirement
    }

    /// The locked, zero-progress state this achievement starts in.
    pub fn locked(&self) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            unlocked: false,
            unlocked_date: None,
            requirement: self.requirement,
            progress: 0,
        }
    }
}

fn attempts_completed(ctx: &RuleContext<'_>) -> u32 {
    ctx.profile.total_attempts
}

fn perfect_attempt(ctx: &RuleContext<'_>) -> u32 {
    u32::from(ctx.attempt.score == PERFECT_SCORE)
}

fn high_score_attempt(ctx: &RuleContext<'_>) -> u32 {
    u32::from(ctx.attempt.score >= HIGH_SCORE)
}

// Leading run, newest first.
fn passing_streak(ctx: &RuleContext<'_>) -> u32 {
    ctx.profile
        .history
        .iter()
        .take_while(|h| h.score >= STREAK_SCORE)
        .take(STREAK_LENGTH as usize)
        .count() as u32
}

fn quick_finish(ctx: &RuleContext<'_>) -> u32 {
    u32::from(ctx.attempt.time_spent_minutes <= QUICK_FINISH_MINUTES)
}

fn minutes_learned(ctx: &RuleContext<'_>) -> u32 {
    ctx.profile.total_time_spent
}

/// The fixed achievement set, in display order.
pub static RULES: &[AchievementRule] = &[
    AchievementRule {
        id: "first_quiz",
        title: "First Step",
        description: "Complete your first quiz",
        icon: "🌱",
        requirement: 1,
        progress: attempts_completed,
    },
    AchievementRule {
        id: "five_quizzes",
        title: "Dedicated Learner",
        description: "Complete 5 quizzes",
        icon: "📚",
        requirement: 5,
        progress: attempts_completed,
    },
    AchievementRule {
        id: "ten_quizzes",
        title: "Environmental Guardian",
        description: "Complete 10 quizzes",
        icon: "🛡️",
        requirement: 10,
        progress: attempts_completed,
    },
    AchievementRule {
        id: "perfect_score",
        title: "Perfect Score",
        description: "Achieve a perfect score (100 points)",
        icon: "💯",
        requirement: 1,
        progress: perfect_attempt,
    },
    AchievementRule {
        id: "high_scorer",
        title: "Outstanding Student",
        description: "Score 90 points or more",
        icon: "⭐",
        requirement: 1,
        progress: high_score_attempt,
    },
    AchievementRule {
        id: "consistent_learner",
        title: "Persistent",
        description: "Score 70 points or more in 3 consecutive quizzes",
        icon: "🔥",
        requirement: STREAK_LENGTH,
        progress: passing_streak,
    },
    AchievementRule {
        id: "time_efficient",
        title: "Speed Master",
        description: "Complete a quiz within 3 minutes",
        icon: "⚡",
        requirement: 1,
        progress: quick_finish,
    },
    AchievementRule {
        id: "dedicated_learner",
        title: "Learning Champion",
        description: "Accumulate 60 minutes of learning time",
        icon: "📖",
        requirement: 60,
        progress: minutes_learned,
    },
    AchievementRule {
        id: "eco_master",
        title: "Eco Master",
        description: "Complete 20 quizzes",
        icon: "🏆",
        requirement: 20,
        progress: attempts_completed,
    },
];

/// Look up a rule by achievement id.
pub fn rule(id: &str) -> Option<&'static AchievementRule> {
    RULES.iter().find(|r| r.id == id)
}

/// Every achievement in its locked starting state.
pub fn default_achievements() -> Vec<Achievement> {
    RULES.iter().map(AchievementRule::locked).collect()
}

/// Bring a stored achievement list up to the current rule set.
///
/// Stored entries are kept as they are, in table order; ids the table knows
/// but the list lacks are added locked. Entries the table does not know are
/// kept at the end.
pub fn reconcile_achievements(mut stored: Vec<Achievement>) -> Vec<Achievement> {
    let mut reconciled = Vec::with_capacity(RULES.len().max(stored.len()));
    for rule in RULES {
        match stored.iter().position(|a| a.id == rule.id) {
            Some(index) => reconciled.push(stored.remove(index)),
            None => reconciled.push(rule.locked()),
        }
    }
    reconciled.extend(stored);
    reconciled
}

/// Evaluate every rule against the profile's latest attempt.
///
/// Locked achievements get their progress refreshed; those whose rule is met
/// are unlocked and stamped with `now`. Unlocked achievements are left
/// untouched. Returns the ids unlocked by this call.
pub fn evaluate(profile: &mut Profile, now: DateTime<Utc>) -> Vec<&'static str> {
    let Some(attempt) = profile.history.first() else {
        return Vec::new();
    };
    let ctx = RuleContext {
        profile: &*profile,
        attempt,
    };
    let measured: Vec<(&'static AchievementRule, u32)> =
        RULES.iter().map(|r| (r, (r.progress)(&ctx))).collect();

    let mut unlocked = Vec::new();
    for (rule, progress) in measured {
        let Some(achievement) = profile.achievements.iter_mut().find(|a| a.id == rule.id) else {
            continue;
        };
        if achievement.unlocked {
            continue;
        }
        achievement.progress = progress;
        if progress >= rule.requirement {
            achievement.unlocked = true;
            achievement.unlocked_date = Some(now);
            unlocked.push(rule.id);
            tracing::debug!("achievement unlocked: {}", rule.id);
        }
    }
    unlocked
}

/// Achievements unlocked in `after` that were still locked in `before`.
pub fn newly_unlocked<'a>(before: &Profile, after: &'a Profile) -> Vec<&'a Achievement> {
    after
        .unlocked_achievements()
        .filter(|a| !before.achievement(&a.id).is_some_and(|old| old.unlocked))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::percentage;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    fn push_attempt(profile: &mut Profile, score: u32, minutes: u32) {
        let record = QuizAttemptRecord {
            id: profile.history.len() as i64 + 1,
            date: at(0),
            score,
            question_count: 10,
            percentage: percentage(score, 10),
            time_spent_minutes: minutes,
        };
        profile.history.insert(0, record);
        profile.total_attempts += 1;
        profile.total_time_spent += minutes;
    }

    #[test]
    fn rule_ids_are_unique() {
        let mut ids: Vec<_> = RULES.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), RULES.len());
        assert_eq!(default_achievements().len(), 9);
        assert!(default_achievements().iter().all(|a| !a.unlocked && a.progress == 0));
    }

    #[test]
    fn evaluate_without_history_does_nothing() {
        let mut profile = Profile::new(at(0));
        assert!(evaluate(&mut profile, at(1)).is_empty());
        assert_eq!(profile.achievements, default_achievements());
    }

    #[test]
    fn streak_counts_leading_run_only() {
        let mut profile = Profile::new(at(0));
        push_attempt(&mut profile, 80, 5);
        push_attempt(&mut profile, 80, 5);
        push_attempt(&mut profile, 40, 5);
        push_attempt(&mut profile, 75, 5);
        evaluate(&mut profile, at(1));
        let streak = profile.achievement("consistent_learner").unwrap();
        assert!(!streak.unlocked);
        assert_eq!(streak.progress, 1);
    }

    #[test]
    fn unlock_date_is_written_once() {
        let mut profile = Profile::new(at(0));
        push_attempt(&mut profile, 100, 2);
        let first = evaluate(&mut profile, at(1));
        assert!(first.contains(&"perfect_score"));

        push_attempt(&mut profile, 20, 9);
        let second = evaluate(&mut profile, at(2));
        assert!(!second.contains(&"perfect_score"));

        let perfect = profile.achievement("perfect_score").unwrap();
        assert!(perfect.unlocked);
        assert_eq!(perfect.unlocked_date, Some(at(1)));
        assert_eq!(perfect.progress, 1);
    }

    #[test]
    fn reconcile_fills_missing_and_keeps_unknown() {
        let mut stored = default_achievements();
        stored.retain(|a| a.id != "eco_master");
        stored[0].unlocked = true;
        stored[0].progress = 1;
        stored.push(Achievement {
            id: "legacy_badge".into(),
            title: "Legacy".into(),
            description: String::new(),
            icon: String::new(),
            unlocked: true,
            unlocked_date: None,
            requirement: 1,
            progress: 1,
        });

        let reconciled = reconcile_achievements(stored);
        assert_eq!(reconciled.len(), RULES.len() + 1);
        assert!(reconciled[0].unlocked);
        assert_eq!(reconciled[8].id, "eco_master");
        assert!(!reconciled[8].unlocked);
        assert_eq!(reconciled[9].id, "legacy_badge");
    }

    #[test]
    fn newly_unlocked_diffs_profiles() {
        let before = Profile::new(at(0));
        let mut after = before.clone();
        push_attempt(&mut after, 95, 10);
        evaluate(&mut after, at(1));
        let ids: Vec<_> = newly_unlocked(&before, &after)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first_quiz", "high_scorer"]);
        assert!(newly_unlocked(&after, &after).is_empty());
    }

    #[test]
    fn rule_lookup() {
        assert_eq!(rule("dedicated_learner").unwrap().requirement, 60);
        assert!(rule("missing").is_none());
    }
}
