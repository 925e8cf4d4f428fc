//! Personalized question selection.
//!
//! Ranks a question bank by how well each item matches the learner's
//! declared interests and experience, then takes the top of the ranking.
//! Selection is pure: no randomness, no mutation of the bank.

use std::cmp::Reverse;

use crate::model::{Difficulty, ExperienceLevel, QuestionItem, UserPreferences};

/// Pick `count` questions from `bank` for a learner.
///
/// Without preferences the first `count` questions are returned in bank
/// order. With preferences, questions are ranked by relevance (highest
/// first), then difficulty (easiest first), then bank position.
pub fn select(
    bank: &[QuestionItem],
    preferences: Option<&UserPreferences>,
    count: usize,
) -> Vec<QuestionItem> {
    if count == 0 || bank.is_empty() {
        return Vec::new();
    }

    let Some(preferences) = preferences else {
        return bank.iter().take(count).cloned().collect();
    };

    let mut ranked: Vec<(usize, i32, &QuestionItem)> = bank
        .iter()
        .enumerate()
        .map(|(position, q)| (position, relevance(q, preferences), q))
        .collect();
    ranked.sort_by_key(|&(position, score, q)| (Reverse(score), q.difficulty, position));

    tracing::debug!(
        "selected {} of {} questions for {} learner",
        count.min(bank.len()),
        bank.len(),
        preferences.experience
    );

    ranked
        .into_iter()
        .take(count)
        .map(|(_, _, q)| q.clone())
        .collect()
}

/// Relevance of one question to a learner.
///
/// One point per question tag the learner is interested in, adjusted by
/// [`experience_weight`].
pub fn relevance(question: &QuestionItem, preferences: &UserPreferences) -> i32 {
    let matches = question
        .tags
        .iter()
        .filter(|tag| preferences.is_interested_in(tag))
        .count() as i32;
    matches + experience_weight(preferences.experience, question.difficulty)
}

/// Advanced learners lean towards hard questions and beginners towards easy
/// ones; intermediate learners get no adjustment.
pub fn experience_weight(experience: ExperienceLevel, difficulty: Difficulty) -> i32 {
    match (experience, difficulty) {
        (ExperienceLevel::Advanced, Difficulty::Hard) => 1,
        (ExperienceLevel::Advanced, Difficulty::Easy) => -1,
        (ExperienceLevel::Beginner, Difficulty::Easy) => 1,
        (ExperienceLevel::Beginner, Difficulty::Hard) => -1,
        _ => 0,
    }
}
