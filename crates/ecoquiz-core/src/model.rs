//! Core data model types for ecoquiz.
//!
//! These are the types the whole system shares: learner preferences, quiz
//! questions, attempt records, achievements and the profile aggregate that
//! ties them together. Serialized field names follow the profile blob layout
//! written by earlier ecoquiz clients so stored profiles keep loading.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::achievements::{default_achievements, reconcile_achievements};
use crate::error::PreferencesError;

/// Self-declared experience with the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    /// Label shown to learners.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Expert",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "beginner"),
            ExperienceLevel::Intermediate => write!(f, "intermediate"),
            ExperienceLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" | "expert" => Ok(ExperienceLevel::Advanced),
            other => Err(format!("unknown experience level: {other}")),
        }
    }
}

/// Answers collected by the onboarding survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Topic tags the learner wants to focus on.
    pub interests: BTreeSet<String>,
    /// Declared experience level.
    pub experience: ExperienceLevel,
    /// Learning goals. Older blobs stored a single `goal` string.
    #[serde(default, alias = "goal", deserialize_with = "one_or_many")]
    pub goals: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserPreferences {
    /// Create preferences with the required survey answers.
    pub fn new<I, S>(interests: I, experience: ExperienceLevel) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interests: interests.into_iter().map(Into::into).collect(),
            experience,
            goals: BTreeSet::new(),
            age: None,
            grade: None,
            name: None,
        }
    }

    /// Check the survey answers a front-end must enforce before saving.
    pub fn validate(&self) -> Result<(), PreferencesError> {
        if self.interests.iter().all(|i| i.trim().is_empty()) {
            return Err(PreferencesError::NoInterests);
        }
        if let Some(age) = self.age {
            if !(1..=120).contains(&age) {
                return Err(PreferencesError::InvalidAge(age));
            }
        }
        Ok(())
    }

    /// The learner's name, if one was given and is not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Case-insensitive interest lookup.
    pub fn is_interested_in(&self, tag: &str) -> bool {
        self.interests.iter().any(|i| i.eq_ignore_ascii_case(tag))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(BTreeSet<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(goal) if goal.trim().is_empty() => BTreeSet::new(),
        OneOrMany::One(goal) => BTreeSet::from([goal]),
        OneOrMany::Many(goals) => goals,
    })
}

/// Older clients may write `null` for a list; read it as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Declared difficulty of a question. Ordered easiest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    /// Unique identifier within its bank.
    pub id: u32,
    /// The question text.
    pub prompt: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer: usize,
    /// Shown after the learner answers.
    #[serde(default)]
    pub explanation: String,
    /// Topic tags matched against learner interests.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl QuestionItem {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }

    /// Text of the correct option, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}

/// A named, ordered collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<QuestionItem>,
}

/// One completed pass through a question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptRecord {
    /// Strictly increasing across a profile's history.
    pub id: i64,
    /// When the attempt was completed.
    pub date: DateTime<Utc>,
    /// Raw points earned.
    pub score: u32,
    #[serde(rename = "totalQuestions")]
    pub question_count: u32,
    /// Share of available points earned, 0–100.
    pub percentage: f64,
    #[serde(rename = "timeSpent")]
    pub time_spent_minutes: u32,
}

/// A milestone badge and its unlock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Stable identifier (e.g. "first_quiz").
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub unlocked: bool,
    /// Written once, when `unlocked` flips to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_date: Option<DateTime<Utc>>,
    /// Progress value needed to unlock.
    pub requirement: u32,
    #[serde(default)]
    pub progress: u32,
}

/// The durable per-learner record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// `None` until the onboarding survey is completed.
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
    /// Attempts, newest first.
    #[serde(default, rename = "quizHistory")]
    pub history: Vec<QuizAttemptRecord>,
    #[serde(default, rename = "totalQuizzes")]
    pub total_attempts: u32,
    #[serde(default)]
    pub best_score: u32,
    /// Rounded mean of every recorded score.
    #[serde(default)]
    pub average_score: u32,
    /// Sum of minutes across all attempts.
    #[serde(default)]
    pub total_time_spent: u32,
    #[serde(default = "Utc::now")]
    pub join_date: DateTime<Utc>,
    #[serde(default = "default_achievements", deserialize_with = "null_as_empty")]
    pub achievements: Vec<Achievement>,
}

impl Profile {
    /// A fresh profile with every achievement locked.
    pub fn new(join_date: DateTime<Utc>) -> Self {
        Self {
            preferences: None,
            history: Vec::new(),
            total_attempts: 0,
            best_score: 0,
            average_score: 0,
            total_time_spent: 0,
            join_date,
            achievements: default_achievements(),
        }
    }

    /// Parse a stored blob, filling in any achievements it is missing.
    pub fn from_json(blob: &str) -> serde_json::Result<Self> {
        let mut profile: Profile = serde_json::from_str(blob)?;
        profile.achievements = reconcile_achievements(std::mem::take(&mut profile.achievements));
        Ok(profile)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn unlocked_achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(|a| a.unlocked)
    }

    /// The most recent attempt, if any.
    pub fn latest_attempt(&self) -> Option<&QuizAttemptRecord> {
        self.history.first()
    }

    pub fn has_completed_survey(&self) -> bool {
        self.preferences.is_some()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}
