//! Attempt scoring arithmetic.

use std::time::Duration;

use crate::model::{QuestionItem, QuizAttemptRecord};

/// Points awarded for each correctly answered question.
pub const POINTS_PER_QUESTION: u32 = 10;

/// Score a set of answers against the questions they were given for.
///
/// `answers[i]` is the option index chosen for `questions[i]`; `None` means
/// the question was left unanswered. Extra answers are ignored.
pub fn score_answers(questions: &[QuestionItem], answers: &[Option<usize>]) -> u32 {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| a.is_some_and(|a| q.is_correct(a)))
        .count() as u32
        * POINTS_PER_QUESTION
}

/// Share of available points earned, 0 when there were no questions.
pub fn percentage(score: u32, question_count: u32) -> f64 {
    if question_count == 0 {
        return 0.0;
    }
    let available = question_count as f64 * POINTS_PER_QUESTION as f64;
    (score as f64 / available) * 100.0
}

/// Rounded mean score of a history, 0 when empty.
///
/// Rounds half up, computed in integers so `.5` boundaries are exact.
pub fn average_score(history: &[QuizAttemptRecord]) -> u32 {
    if history.is_empty() {
        return 0;
    }
    let n = history.len() as u64;
    let sum: u64 = history.iter().map(|h| h.score as u64).sum();
    ((2 * sum + n) / (2 * n)) as u32
}

/// Convert elapsed quiz time to whole minutes, never less than one.
pub fn minutes_from_elapsed(elapsed: Duration) -> u32 {
    let minutes = (elapsed.as_secs_f64() / 60.0).round() as u32;
    minutes.max(1)
}
