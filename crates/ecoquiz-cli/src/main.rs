//! ecoquiz CLI: personalized environmental quizzes in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "ecoquiz",
    version,
    about = "Personalized environmental quizzes with achievements"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and a sample question bank
    Init,

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Answer the onboarding survey
    Survey {
        /// Topics of interest (comma-separated, e.g. "energy,water")
        #[arg(long)]
        interests: String,

        /// Experience level: beginner, intermediate, advanced
        #[arg(long)]
        experience: String,

        /// Learning goals (comma-separated: learn, practice, share, challenge)
        #[arg(long)]
        goals: Option<String>,

        /// Name to greet you by
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long)]
        grade: Option<String>,
    },

    /// Show the personalized question selection without taking a quiz
    Select {
        /// Path to a bank file or directory (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Number of questions (default: from config)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Take a quiz, reading answers from stdin
    Quiz {
        /// Path to a bank file or directory (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Number of questions (default: from config)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Record a completed attempt
    Record {
        /// Points earned (10 per correct answer)
        #[arg(long)]
        score: u32,

        /// Number of questions in the attempt
        #[arg(long)]
        questions: u32,

        /// Minutes spent
        #[arg(long, default_value = "1")]
        minutes: u32,
    },

    /// Show the learner dashboard
    Profile {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Clear the stored profile
    Reset,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ecoquiz=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Survey {
            interests,
            experience,
            goals,
            name,
            age,
            grade,
        } => commands::survey::execute(
            commands::survey::SurveyAnswers {
                interests,
                experience,
                goals,
                name,
                age,
                grade,
            },
            config,
        ),
        Commands::Select { bank, count } => commands::select::execute(bank, count, config),
        Commands::Quiz { bank, count } => commands::quiz::execute(bank, count, config),
        Commands::Record {
            score,
            questions,
            minutes,
        } => commands::record::execute(score, questions, minutes, config),
        Commands::Profile { format } => commands::profile::execute(format, config),
        Commands::Reset => commands::reset::execute(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
