use anyhow::{Context, Result};
use coach_infrastructure::SecretStorage;
use colored::Colorize;

pub fn handle() -> Result<()> {
    let storage = SecretStorage::new().context("failed to locate the config directory")?;
    write_template(&storage)
}

fn write_template(storage: &SecretStorage) -> Result<()> {
    let created = storage
        .ensure_template()
        .with_context(|| format!("failed to write {}", storage.path().display()))?;

    if created {
        println!(
            "{} {}",
            "Created".bright_green(),
            storage.path().display()
        );
        println!("Add your OpenAI API key to the \"api_key\" field.");
    } else {
        println!(
            "{} {}",
            "Already exists:".yellow(),
            storage.path().display()
        );
    }

    Ok(())
}
