//! Console output for an interview session.

use coach_core::{CaseType, FeedbackOutcome, FeedbackStyle};
use colored::Colorize;

pub fn banner(case_type: CaseType, style: FeedbackStyle, end_token: &str) {
    println!("{}", "=== Case Interview Practice ===".bright_cyan().bold());
    println!(
        "{} {}  {} {}",
        "Case:".bright_black(),
        case_type.label().bold(),
        "Feedback:".bright_black(),
        style.label().bold()
    );
    println!(
        "{}",
        format!("Answer each question. Enter a blank line or '{end_token}' to finish.").dimmed()
    );
    println!();
}

pub fn scenario(text: &str) {
    println!("{}", "Scenario".bright_blue().bold());
    println!("{}", text.trim());
    println!();
}

pub fn question(text: &str) {
    println!("{} {}", "Interviewer:".bright_green().bold(), text.trim());
}

/// Echoes a scripted answer so the transcript reads like a live session.
pub fn answer(text: &str) {
    println!("{} {}", "Candidate:".bright_yellow().bold(), text);
    println!();
}

pub fn notice(text: &str) {
    println!("{}", text.dimmed());
}

pub fn feedback(outcome: &FeedbackOutcome) {
    println!();
    match outcome {
        FeedbackOutcome::Delivered(text) => {
            println!("{}", "Feedback".bright_magenta().bold());
            println!("{}", text.trim());
        }
        FeedbackOutcome::InsufficientData => {
            println!(
                "{}",
                "No answers were recorded, so there is nothing to give feedback on.".yellow()
            );
        }
    }
}
