use anyhow::Result;
use coach_core::{CaseType, FeedbackStyle};
use colored::Colorize;

pub fn handle() -> Result<()> {
    println!("{}", "Case types".bright_blue().bold());
    for case_type in CaseType::all() {
        println!(
            "  {} {}",
            case_type.label().bold(),
            format!("({})", case_type.slug()).bright_black()
        );
        println!("    {}", case_type.description());
    }

    println!();
    println!("{}", "Feedback styles".bright_blue().bold());
    for style in FeedbackStyle::all() {
        let default = if style == FeedbackStyle::default() {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {} {}{}",
            style.label().bold(),
            format!("({})", style.alias()).bright_black(),
            default
        );
    }

    Ok(())
}
