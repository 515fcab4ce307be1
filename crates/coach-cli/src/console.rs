//! Terminal drivers: an interactive rustyline console and a script replayer.

use std::borrow::Cow::{self, Borrowed, Owned};

use coach_core::{
    CandidateDriver, CandidateReply, CaseType, CoachError, FeedbackOutcome, ScriptedDriver,
};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::render;

/// Rustyline helper that completes and hints a fixed word list.
#[derive(Clone, Default)]
struct CliHelper {
    words: Vec<String>,
}

impl CliHelper {
    fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    fn matches<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        let prefix = prefix.to_lowercase();
        self.words
            .iter()
            .filter(move |word| !prefix.is_empty() && word.to_lowercase().starts_with(&prefix))
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .matches(&line[..pos])
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.words.iter().any(|word| word.eq_ignore_ascii_case(line.trim())) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let typed = &line[..pos];
        self.matches(typed)
            .find(|word| word.len() > typed.len())
            .and_then(|word| word.get(typed.len()..))
            .map(str::to_string)
    }
}

impl Validator for CliHelper {}

/// Reads candidate replies from the terminal.
///
/// Ctrl-C prints a hint and re-prompts. Ctrl-D ends the interview.
pub struct ConsoleDriver {
    editor: Editor<CliHelper, DefaultHistory>,
    end_token: String,
}

impl ConsoleDriver {
    pub fn new(end_token: impl Into<String>) -> Result<Self, CoachError> {
        let end_token = end_token.into();
        let mut editor = Editor::new().map_err(driver_error)?;
        editor.set_helper(Some(CliHelper::new([end_token.clone()])));
        Ok(Self { editor, end_token })
    }

    /// Asks for a case type. An unknown label is an error, not a retry.
    pub fn prompt_case_type(&mut self) -> Result<CaseType, CoachError> {
        println!("{}", "Choose a case type:".bright_blue().bold());
        for case_type in CaseType::all() {
            println!("  - {}", case_type.label());
        }

        self.set_words(CaseType::all().into_iter().map(CaseType::label));
        let line = self.read_line("Case type> ");
        self.set_words([self.end_token.clone()]);

        match line? {
            Some(line) => CaseType::from_label(&line),
            None => Err(CoachError::invalid_case_type("")),
        }
    }

    fn set_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(helper) = self.editor.helper_mut() {
            *helper = CliHelper::new(words);
        }
    }

    /// Returns `None` on Ctrl-D.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CoachError> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!(
                        "{}",
                        format!(
                            "CTRL-C detected. Enter a blank line or '{}' to finish.",
                            self.end_token
                        )
                        .yellow()
                    );
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(driver_error(err)),
            }
        }
    }
}

impl CandidateDriver for ConsoleDriver {
    fn present_scenario(&mut self, scenario: &str) -> coach_core::Result<()> {
        render::scenario(scenario);
        Ok(())
    }

    fn reply_to(&mut self, question: &str) -> coach_core::Result<CandidateReply> {
        render::question(question);
        let reply = match self.read_line(">> ")? {
            Some(line) => CandidateReply::from_input(&line, Some(self.end_token.as_str())),
            None => CandidateReply::End,
        };
        if let CandidateReply::Answer(answer) = &reply {
            println!("{}", format!("> {answer}").green());
            println!();
        }
        Ok(reply)
    }

    fn present_feedback(&mut self, outcome: &FeedbackOutcome) -> coach_core::Result<()> {
        render::feedback(outcome);
        Ok(())
    }
}

fn driver_error(err: ReadlineError) -> CoachError {
    CoachError::driver(format!("readline failed: {err}"))
}

/// Replays `--script` answers and prints the session as it goes.
pub struct ScriptDriver {
    inner: ScriptedDriver,
}

impl ScriptDriver {
    pub fn new(text: &str, end_token: &str) -> Self {
        Self {
            inner: ScriptedDriver::from_lines(text).with_end_token(end_token),
        }
    }

    /// Lines left in the script after the interview ended.
    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

impl CandidateDriver for ScriptDriver {
    fn present_scenario(&mut self, scenario: &str) -> coach_core::Result<()> {
        render::scenario(scenario);
        self.inner.present_scenario(scenario)
    }

    fn reply_to(&mut self, question: &str) -> coach_core::Result<CandidateReply> {
        render::question(question);
        let reply = self.inner.reply_to(question)?;
        match &reply {
            CandidateReply::Answer(answer) => render::answer(answer),
            CandidateReply::End => render::notice("(end of answers)"),
        }
        Ok(reply)
    }

    fn present_feedback(&mut self, outcome: &FeedbackOutcome) -> coach_core::Result<()> {
        render::feedback(outcome);
        self.inner.present_feedback(outcome)
    }
}
