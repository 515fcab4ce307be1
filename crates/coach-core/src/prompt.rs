//! Prompt templates for the three interview phases.

use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::case::CaseType;
use crate::error::Result;
use crate::style::FeedbackStyle;
use crate::transcript::Transcript;

const SCENARIO_TEMPLATE: &str = "You are a case study expert. Based on the following description, \
create a unique, realistic case scenario:\n\n\
{{ case_description }}\n\n\
The scenario should be challenging and relevant for a case interview. \
Make sure to provide sufficient details for the candidate to analyze.";

const QUESTION_TEMPLATE: &str = "You are an interviewer conducting a case study interview. \
Based on the following scenario, ask the next question in a way that guides the candidate \
through analyzing the scenario. Do not provide any candidate responses.\n\n\
Scenario:\n{{ scenario }}\n\n\
Previous responses:\n{{ previous_responses }}\n\n\
Next Question:";

const FEEDBACK_TEMPLATE: &str = "Provide feedback in the style of {{ feedback_style }} for the \
following conversation. Analyze the user's responses, highlight strengths (if there are no \
strengths, be honest but kind), areas for improvement, and suggestions for a strategic approach.\n\n\
Conversation:\n{{ conversation_history }}";

/// Which phase a prompt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    #[strum(serialize = "case scenario")]
    Scenario,
    #[strum(serialize = "interview question")]
    Question,
    #[strum(serialize = "feedback")]
    Feedback,
}

impl PromptKind {
    fn template(self) -> &'static str {
        match self {
            Self::Scenario => SCENARIO_TEMPLATE,
            Self::Question => QUESTION_TEMPLATE,
            Self::Feedback => FEEDBACK_TEMPLATE,
        }
    }
}

/// Renders the interview prompts.
///
/// Values are inserted verbatim: the environment has no auto-escaping and the
/// transcript keeps its trailing newline.
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Instruction to invent a scenario for `case_type`.
    pub fn scenario(&self, case_type: CaseType) -> Result<String> {
        let rendered = self.env.render_str(
            PromptKind::Scenario.template(),
            context! { case_description => case_type.description() },
        )?;
        Ok(rendered)
    }

    /// Instruction to ask the next question given everything said so far.
    pub fn question(&self, scenario: &str, transcript: &Transcript) -> Result<String> {
        let rendered = self.env.render_str(
            PromptKind::Question.template(),
            context! {
                scenario => scenario,
                previous_responses => transcript.serialize(),
            },
        )?;
        Ok(rendered)
    }

    /// Instruction to critique the whole transcript in `style`.
    pub fn feedback(&self, style: FeedbackStyle, transcript: &Transcript) -> Result<String> {
        let rendered = self.env.render_str(
            PromptKind::Feedback.template(),
            context! {
                feedback_style => style.label(),
                conversation_history => transcript.serialize(),
            },
        )?;
        Ok(rendered)
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_prompt_embeds_description() {
        let prompts = PromptLibrary::new();
        for case in CaseType::all() {
            let prompt = prompts.scenario(case).unwrap();
            assert!(prompt.starts_with("You are a case study expert."));
            assert!(prompt.contains(case.description()));
            assert!(prompt.ends_with("sufficient details for the candidate to analyze."));
        }
    }

    #[test]
    fn test_question_prompt_layout() {
        let prompts = PromptLibrary::new();
        let mut transcript = Transcript::new();
        transcript.push("What is the target market?", "Western Europe, electronics");

        let prompt = prompts.question("A TV maker & its rivals", &transcript).unwrap();

        assert!(prompt.contains("Scenario:\nA TV maker & its rivals\n\n"));
        assert!(prompt.contains(
            "Previous responses:\nInterviewer: What is the target market?\n\
             Candidate: Western Europe, electronics\n\n\nNext Question:"
        ));
        assert!(prompt.ends_with("Next Question:"));
    }

    #[test]
    fn test_question_prompt_with_empty_transcript() {
        let prompts = PromptLibrary::new();
        let prompt = prompts.question("scenario", &Transcript::new()).unwrap();
        assert!(prompt.contains("Previous responses:\n\n\nNext Question:"));
    }

    #[test]
    fn test_feedback_prompt_names_style() {
        let prompts = PromptLibrary::new();
        let mut transcript = Transcript::new();
        transcript.push("Q1", "A1");

        let prompt = prompts.feedback(FeedbackStyle::Bcg, &transcript).unwrap();

        assert!(prompt.starts_with("Provide feedback in the style of BCG-style"));
        assert!(prompt.ends_with("Conversation:\nInterviewer: Q1\nCandidate: A1\n"));
    }
}
