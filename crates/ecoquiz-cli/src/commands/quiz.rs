//! The `ecoquiz quiz` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use ecoquiz_core::model::QuestionItem;
use ecoquiz_core::scoring::{minutes_from_elapsed, score_answers};
use ecoquiz_core::selector::select;

use crate::config::load_config_from;

pub fn execute(
    bank: Option<PathBuf>,
    count: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let questions = super::load_questions(bank, &config)?;
    let count = count.unwrap_or(config.question_count);

    let store = super::open_store(&config);
    let before = store.load_profile();
    let selected = select(&questions, before.preferences.as_ref(), count);
    if selected.is_empty() {
        anyhow::bail!("no questions to ask (count is {count})");
    }

    let started = Instant::now();
    let stdin = io::stdin();
    let answers = run_quiz(&selected, stdin.lock(), io::stdout().lock())?;
    let minutes = minutes_from_elapsed(started.elapsed());

    let score = score_answers(&selected, &answers);
    let after = store.record_attempt(score, selected.len() as u32, minutes);

    println!();
    super::record::print_attempt_summary(&before, &after);

    Ok(())
}

/// Ask each question in turn and collect zero-based answers.
///
/// Answers are read as 1-based option numbers. Invalid input re-prompts;
/// end of input leaves the remaining questions unanswered.
pub fn run_quiz<R: BufRead, W: Write>(
    questions: &[QuestionItem],
    mut input: R,
    mut out: W,
) -> Result<Vec<Option<usize>>> {
    let mut answers = Vec::with_capacity(questions.len());
    let mut line = String::new();
    let mut eof = false;

    for (n, q) in questions.iter().enumerate() {
        writeln!(out, "\nQuestion {} of {}: {}", n + 1, questions.len(), q.prompt)?;
        for (i, option) in q.options.iter().enumerate() {
            writeln!(out, "  {}. {option}", i + 1)?;
        }

        let mut answer = None;
        while !eof {
            write!(out, "Your answer (1-{}): ", q.options.len())?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                eof = true;
                break;
            }
            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=q.options.len()).contains(&choice) => {
                    answer = Some(choice - 1);
                    break;
                }
                _ => writeln!(out, "Please enter a number between 1 and {}.", q.options.len())?,
            }
        }

        match answer {
            Some(a) if q.is_correct(a) => writeln!(out, "Correct!")?,
            _ => writeln!(
                out,
                "The answer was: {}",
                q.correct_option().unwrap_or("(missing option)")
            )?,
        }
        if !q.explanation.is_empty() {
            writeln!(out, "{}", q.explanation)?;
        }
        answers.push(answer);
    }

    Ok(answers)
}
