//! The `ecoquiz survey` command.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use ecoquiz_core::insights::greeting;
use ecoquiz_core::model::{ExperienceLevel, UserPreferences};

use crate::config::load_config_from;

/// Raw survey answers from the command line.
pub struct SurveyAnswers {
    pub interests: String,
    pub experience: String,
    pub goals: Option<String>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub grade: Option<String>,
}

impl SurveyAnswers {
    fn into_preferences(self) -> Result<UserPreferences> {
        let experience: ExperienceLevel = self.experience.parse().map_err(|e| anyhow!("{e}"))?;
        let mut prefs = UserPreferences::new(split_list(&self.interests), experience);
        if let Some(goals) = &self.goals {
            prefs.goals = split_list(goals).collect();
        }
        prefs.name = self.name.filter(|n| !n.trim().is_empty());
        prefs.age = self.age;
        prefs.grade = self.grade.filter(|g| !g.trim().is_empty());
        prefs.validate()?;
        Ok(prefs)
    }
}

fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

pub fn execute(answers: SurveyAnswers, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let prefs = answers.into_preferences()?;

    let store = super::open_store(&config);
    let profile = store.save_preferences(prefs);

    if let Some(prefs) = &profile.preferences {
        let interests: Vec<&str> = prefs.interests.iter().map(String::as_str).collect();
        println!("Preferences saved.");
        println!("  Interests:  {}", interests.join(", "));
        println!("  Experience: {}", prefs.experience.label());
        if !prefs.goals.is_empty() {
            let goals: Vec<&str> = prefs.goals.iter().map(String::as_str).collect();
            println!("  Goals:      {}", goals.join(", "));
        }
    }

    if let Some(line) = greeting(profile.preferences.as_ref(), &mut rand::rng()) {
        println!("\n{line}");
    }

    Ok(())
}
