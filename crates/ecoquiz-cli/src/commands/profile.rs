//! The `ecoquiz profile` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Table};

use ecoquiz_core::insights::{days_active, score_trend, LearnerLevel};
use ecoquiz_core::model::Profile;

use crate::config::load_config_from;

/// Attempts shown in the recent history table.
const RECENT_ATTEMPTS: usize = 5;

pub fn execute(format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let profile = super::open_store(&config).load_profile();

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&profile)?),
        "text" => print_dashboard(&profile),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_dashboard(profile: &Profile) {
    let level = LearnerLevel::for_attempts(profile.total_attempts);
    println!("{} {}", level.icon(), level);
    match LearnerLevel::attempts_to_next(profile.total_attempts) {
        Some(n) => println!("{n} more quizzes to next level"),
        None => println!("Top level reached"),
    }
    if let Some(prefs) = &profile.preferences {
        let name = prefs.display_name().unwrap_or("Learner");
        println!("{name} ({})", prefs.experience.label());
    }

    let mut stats = Table::new();
    stats.set_header(vec![
        "Total quizzes",
        "Best score",
        "Average score",
        "Time spent",
        "Active days",
    ]);
    stats.add_row(vec![
        Cell::new(profile.total_attempts),
        Cell::new(profile.best_score),
        Cell::new(profile.average_score),
        Cell::new(format!("{} min", profile.total_time_spent)),
        Cell::new(days_active(profile.join_date, Utc::now())),
    ]);
    println!("\n{stats}");

    let unlocked = profile.unlocked_achievements().count();
    println!("\nAchievements ({unlocked}/{}):", profile.achievements.len());
    for a in &profile.achievements {
        let mark = if a.unlocked { "x" } else { " " };
        println!(
            "  [{mark}] {} {} ({}/{}) - {}",
            a.icon, a.title, a.progress, a.requirement, a.description
        );
    }

    if profile.history.is_empty() {
        println!("\nNo quizzes taken yet.");
        return;
    }

    let mut history = Table::new();
    history.set_header(vec!["Date", "Score", "Percentage", "Minutes"]);
    for attempt in score_trend(profile, RECENT_ATTEMPTS).into_iter().rev() {
        history.add_row(vec![
            Cell::new(attempt.date.format("%Y-%m-%d %H:%M")),
            Cell::new(attempt.score),
            Cell::new(format!("{:.0}%", attempt.percentage)),
            Cell::new(attempt.time_spent_minutes),
        ]);
    }
    println!("\nRecent quizzes:\n{history}");
}
