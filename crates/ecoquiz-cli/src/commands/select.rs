//! The `ecoquiz select` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use ecoquiz_core::model::QuestionItem;
use ecoquiz_core::selector::{relevance, select};

use crate::config::load_config_from;

pub fn execute(
    bank: Option<PathBuf>,
    count: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let questions = super::load_questions(bank, &config)?;
    let count = count.unwrap_or(config.question_count);

    let profile = super::open_store(&config).load_profile();
    let prefs = profile.preferences.as_ref();
    if prefs.is_none() {
        println!("No survey answers yet; showing questions in bank order.");
    }

    let selected = select(&questions, prefs, count);
    println!("{}", selection_table(&selected, |q| prefs.map(|p| relevance(q, p))));
    println!("{} of {} questions selected.", selected.len(), questions.len());

    Ok(())
}

fn selection_table(
    selected: &[QuestionItem],
    score: impl Fn(&QuestionItem) -> Option<i32>,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Difficulty", "Tags", "Relevance", "Prompt"]);

    for q in selected {
        table.add_row(vec![
            Cell::new(q.id),
            Cell::new(q.difficulty),
            Cell::new(q.tags.join(", ")),
            Cell::new(score(q).map(|s| s.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(&q.prompt),
        ]);
    }

    table
}
