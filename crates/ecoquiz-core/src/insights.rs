//! Read-side helpers for result and dashboard screens.
//!
//! Everything here is derived from a profile or a single attempt and has no
//! side effects.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::model::{ExperienceLevel, Profile, QuizAttemptRecord, UserPreferences};

pub use crate::achievements::newly_unlocked;

/// Longest tip list a result screen shows.
pub const MAX_TIPS: usize = 5;

/// Dashboard level, earned by attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LearnerLevel {
    EcoBeginner,
    EnvironmentalGuardian,
    EnvironmentalExpert,
    EcoMaster,
}

impl LearnerLevel {
    pub fn for_attempts(total: u32) -> Self {
        match total {
            20.. => LearnerLevel::EcoMaster,
            10.. => LearnerLevel::EnvironmentalExpert,
            5.. => LearnerLevel::EnvironmentalGuardian,
            _ => LearnerLevel::EcoBeginner,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LearnerLevel::EcoBeginner => "Eco Beginner",
            LearnerLevel::EnvironmentalGuardian => "Environmental Guardian",
            LearnerLevel::EnvironmentalExpert => "Environmental Expert",
            LearnerLevel::EcoMaster => "Eco Master",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            LearnerLevel::EcoBeginner => "🌱",
            LearnerLevel::EnvironmentalGuardian => "🛡️",
            LearnerLevel::EnvironmentalExpert => "🌟",
            LearnerLevel::EcoMaster => "🏆",
        }
    }

    /// Attempts still needed to reach the next level; `None` at the top.
    pub fn attempts_to_next(total: u32) -> Option<u32> {
        let next = match Self::for_attempts(total) {
            LearnerLevel::EcoBeginner => 5,
            LearnerLevel::EnvironmentalGuardian => 10,
            LearnerLevel::EnvironmentalExpert => 20,
            LearnerLevel::EcoMaster => return None,
        };
        Some(next - total)
    }
}

impl fmt::Display for LearnerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Verdict on a single attempt, by percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ResultTier {
    EnvironmentalBeginner,
    EnvironmentalLearner,
    EnvironmentalGuardian,
    EnvironmentalExpert,
}

impl ResultTier {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            ResultTier::EnvironmentalExpert
        } else if percentage >= 70.0 {
            ResultTier::EnvironmentalGuardian
        } else if percentage >= 50.0 {
            ResultTier::EnvironmentalLearner
        } else {
            ResultTier::EnvironmentalBeginner
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResultTier::EnvironmentalExpert => "Environmental Expert",
            ResultTier::EnvironmentalGuardian => "Environmental Guardian",
            ResultTier::EnvironmentalLearner => "Environmental Learner",
            ResultTier::EnvironmentalBeginner => "Environmental Beginner",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResultTier::EnvironmentalExpert => {
                "You have excellent knowledge of environmental protection!"
            }
            ResultTier::EnvironmentalGuardian => "You have great environmental awareness!",
            ResultTier::EnvironmentalLearner => "Keep learning, you'll do better!",
            ResultTier::EnvironmentalBeginner => {
                "Learn more about environmental protection and make a difference!"
            }
        }
    }
}

impl fmt::Display for ResultTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How the latest attempt compares with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressInsight {
    FirstQuiz,
    Improved(u32),
    Declined(u32),
    Steady,
}

impl fmt::Display for ProgressInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressInsight::FirstQuiz => {
                write!(f, "This is your first quiz, keep up the good work!")
            }
            ProgressInsight::Improved(points) => write!(
                f,
                "Great! You improved by {points} points compared to last time!"
            ),
            ProgressInsight::Declined(points) => write!(
                f,
                "You scored {points} points less than last time, keep trying!"
            ),
            ProgressInsight::Steady => write!(f, "Maintaining stability, keep it up!"),
        }
    }
}

/// Compare the newest attempt with the previous one.
pub fn progress_insight(profile: &Profile) -> ProgressInsight {
    let [latest, previous, ..] = profile.history.as_slice() else {
        return ProgressInsight::FirstQuiz;
    };
    match latest.score.cmp(&previous.score) {
        std::cmp::Ordering::Greater => ProgressInsight::Improved(latest.score - previous.score),
        std::cmp::Ordering::Less => ProgressInsight::Declined(previous.score - latest.score),
        std::cmp::Ordering::Equal => ProgressInsight::Steady,
    }
}

const GENERIC_TIPS: [&str; 5] = [
    "Reduce the use of single-use plastic products",
    "Turn off lights when not in use to save energy",
    "Practice waste sorting starting today",
    "Use public transportation or cycling more often",
    "Conserve water and protect water resources",
];

const INTEREST_TIPS: [(&str, [&str; 2]); 6] = [
    (
        "recycling",
        [
            "Learn waste sorting standards in depth and properly dispose of various types of waste",
            "Explore ways to reuse recyclables, such as repurposing old clothes",
        ],
    ),
    (
        "energy",
        [
            "Use energy-efficient light bulbs and appliances to reduce energy consumption",
            "Learn about renewable energy, such as solar and wind power applications",
        ],
    ),
    (
        "water",
        [
            "Learn water-saving tips, such as reusing vegetable washing water",
            "Focus on water resource protection and learn about water pollution prevention",
        ],
    ),
    (
        "biodiversity",
        [
            "Protect wildlife and do not purchase wildlife products",
            "Learn about local ecosystems and participate in biodiversity conservation activities",
        ],
    ),
    (
        "sustainable",
        [
            "Practice a low-carbon lifestyle and reduce your carbon footprint",
            "Choose eco-friendly products and support sustainable development",
        ],
    ),
    (
        "climate",
        [
            "Understand the causes and impacts of climate change",
            "Participate in climate change mitigation actions, such as tree planting",
        ],
    ),
];

const GOAL_TIPS: [(&str, &[&str]); 4] = [
    (
        "practice",
        &[
            "Apply what you've learned to daily life",
            "Record your environmental practices and form good habits",
        ],
    ),
    (
        "share",
        &[
            "Share your environmental experiences with others",
            "Motivate people around you to participate in environmental actions",
        ],
    ),
    (
        "challenge",
        &["Take more quizzes to challenge yourself and test your knowledge"],
    ),
    (
        "learn",
        &["Explore additional environmental topics to broaden your knowledge"],
    ),
];

/// Tips for a result screen, at most [`MAX_TIPS`].
///
/// Order: interest tips, experience tips, goal tips, then review tips when
/// the attempt scored under 70%. Without preferences a fixed generic list is
/// returned.
pub fn personalized_tips(preferences: Option<&UserPreferences>, percentage: f64) -> Vec<String> {
    let Some(preferences) = preferences else {
        return GENERIC_TIPS.iter().map(|t| t.to_string()).collect();
    };

    let mut tips: Vec<&str> = Vec::new();
    for (interest, pair) in INTEREST_TIPS {
        if preferences.is_interested_in(interest) {
            tips.extend(pair);
        }
    }

    match preferences.experience {
        ExperienceLevel::Beginner => tips.extend([
            "Start with small daily actions to develop environmental habits",
            "Read more environmental science articles to increase awareness",
        ]),
        ExperienceLevel::Advanced => tips.extend([
            "Participate in environmental volunteer activities and spread environmental concepts",
            "Study cutting-edge knowledge in the environmental field",
        ]),
        ExperienceLevel::Intermediate => {}
    }

    for (goal, goal_tips) in GOAL_TIPS {
        if preferences.goals.contains(goal) {
            tips.extend(goal_tips.iter().copied());
        }
    }

    if percentage < 70.0 {
        tips.extend([
            "Review the questions you got wrong in this quiz to consolidate weak knowledge points",
            "Focus on learning environmental topics you're interested in and gradually improve",
        ]);
    }

    tips.into_iter().take(MAX_TIPS).map(String::from).collect()
}

/// A welcome line for a returning learner; `None` before the survey.
pub fn greeting<R: Rng>(
    preferences: Option<&UserPreferences>,
    rng: &mut R,
) -> Option<String> {
    let preferences = preferences?;
    let options = match preferences.display_name() {
        Some(name) => [
            format!("Welcome back, {name}!"),
            format!("Hello {name}, ready to learn more?"),
            format!("Great to see you again, {name}!"),
        ],
        None => [
            format!("Welcome back, {}!", preferences.experience.label()),
            "Continue your environmental learning journey!".to_string(),
            "Ready to challenge your environmental knowledge?".to_string(),
        ],
    };
    let pick = rng.random_range(0..options.len());
    options.into_iter().nth(pick)
}

/// Calendar days since joining, counting the join day as day one.
pub fn days_active(join_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - join_date).num_days().max(0) + 1
}

/// The last `n` attempts, oldest first, for charting.
pub fn score_trend(profile: &Profile, n: usize) -> Vec<&QuizAttemptRecord> {
    profile.history.iter().take(n).rev().collect()
}
