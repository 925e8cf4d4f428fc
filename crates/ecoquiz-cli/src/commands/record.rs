//! The `ecoquiz record` command.

use std::path::PathBuf;

use anyhow::Result;

use ecoquiz_core::insights::{newly_unlocked, personalized_tips, progress_insight, ResultTier};
use ecoquiz_core::model::Profile;
use ecoquiz_core::scoring::POINTS_PER_QUESTION;

use crate::config::load_config_from;

pub fn execute(
    score: u32,
    questions: u32,
    minutes: u32,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let max = questions.saturating_mul(POINTS_PER_QUESTION);
    if questions > 0 && score > max {
        anyhow::bail!("score {score} exceeds the maximum of {max} for {questions} questions");
    }

    let config = load_config_from(config_path.as_deref())?;
    let store = super::open_store(&config);

    let before = store.load_profile();
    let after = store.record_attempt(score, questions, minutes);
    print_attempt_summary(&before, &after);

    Ok(())
}

/// Result screen for the attempt just folded into `after`.
pub(crate) fn print_attempt_summary(before: &Profile, after: &Profile) {
    let Some(attempt) = after.latest_attempt() else {
        return;
    };
    let tier = ResultTier::for_percentage(attempt.percentage);

    println!(
        "Score: {} / {} ({:.0}%)",
        attempt.score,
        attempt.question_count.saturating_mul(POINTS_PER_QUESTION),
        attempt.percentage
    );
    println!("{tier}: {}", tier.description());
    println!("{}", progress_insight(after));

    let unlocked = newly_unlocked(before, after);
    if !unlocked.is_empty() {
        println!("\nAchievements unlocked:");
        for a in unlocked {
            println!("  {} {} - {}", a.icon, a.title, a.description);
        }
    }

    let tips = personalized_tips(after.preferences.as_ref(), attempt.percentage);
    println!("\nTips for you:");
    for tip in tips {
        println!("  * {tip}");
    }
}
