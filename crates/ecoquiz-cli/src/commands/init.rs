//! The `ecoquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create ecoquiz.toml
    if std::path::Path::new("ecoquiz.toml").exists() {
        println!("ecoquiz.toml already exists, skipping.");
    } else {
        std::fs::write("ecoquiz.toml", SAMPLE_CONFIG)?;
        println!("Created ecoquiz.toml");
    }

    // Create sample question bank
    std::fs::create_dir_all("question-banks")?;
    let bank_path = std::path::Path::new("question-banks/eco-basics.toml");
    if bank_path.exists() {
        println!("question-banks/eco-basics.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, SAMPLE_BANK)?;
        println!("Created question-banks/eco-basics.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: ecoquiz survey --interests energy,water --experience beginner");
    println!("  2. Run: ecoquiz quiz");
    println!("  3. Run: ecoquiz profile");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# ecoquiz configuration

# Where your profile is stored.
data_dir = "./ecoquiz-data"

# Question bank file or directory.
question_bank = "question-banks/eco-basics.toml"

# Questions per quiz.
question_count = 10
"#;

const SAMPLE_BANK: &str = include_str!("../../../../question-banks/eco-basics.toml");
