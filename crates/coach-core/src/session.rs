//! Per-session interview state.
//!
//! A [`SessionState`] is an explicit value owned by one orchestrator. Nothing
//! here is global, so independent sessions can run side by side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::error::{CoachError, Result};
use crate::transcript::Transcript;

/// Where the interview currently stands.
///
/// Transitions only move forward:
/// `AwaitingScenario → AwaitingQuestion ⇄ AwaitingResponse → Terminated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    /// No scenario has been generated yet.
    #[default]
    #[strum(serialize = "awaiting the case scenario")]
    AwaitingScenario,
    /// The next interviewer question must be generated.
    #[strum(serialize = "awaiting the next question")]
    AwaitingQuestion,
    /// A question is on screen and the candidate has not answered.
    #[strum(serialize = "awaiting a candidate response")]
    AwaitingResponse,
    /// The candidate ended the interview.
    #[strum(serialize = "the interview is terminated")]
    Terminated,
}

/// What the candidate did with the pending question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateReply {
    /// A non-empty answer to record.
    Answer(String),
    /// End the interview.
    End,
}

impl CandidateReply {
    /// Interprets raw driver input.
    ///
    /// Blank input always ends the interview. When `end_token` is set, input
    /// equal to it (ignoring ASCII case and surrounding whitespace) ends it too.
    /// Any other input is recorded exactly as typed.
    pub fn from_input(input: &str, end_token: Option<&str>) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::End;
        }
        match end_token.map(str::trim) {
            Some(token) if !token.is_empty() && trimmed.eq_ignore_ascii_case(token) => Self::End,
            _ => Self::Answer(input.to_string()),
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

/// Everything one interview session accumulates.
///
/// The phase is the only record of termination, so a terminated session can
/// never be observed in an earlier phase.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    id: String,
    started_at: DateTime<Utc>,
    scenario: Option<String>,
    transcript: Transcript,
    pending_question: Option<String>,
    unanswered_question: Option<String>,
    phase: InterviewPhase,
    feedback_generated: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            scenario: None,
            transcript: Transcript::new(),
            pending_question: None,
            unanswered_question: None,
            phase: InterviewPhase::AwaitingScenario,
            feedback_generated: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The question currently waiting for an answer.
    pub fn pending_question(&self) -> Option<&str> {
        self.pending_question.as_deref()
    }

    /// The question that was on screen when the candidate ended the interview.
    /// It is never part of the transcript.
    pub fn unanswered_question(&self) -> Option<&str> {
        self.unanswered_question.as_deref()
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == InterviewPhase::Terminated
    }

    pub fn feedback_generated(&self) -> bool {
        self.feedback_generated
    }

    pub(crate) fn ensure_phase(
        &self,
        expected: InterviewPhase,
        operation: &'static str,
    ) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CoachError::invalid_transition(operation, self.phase))
        }
    }

    pub(crate) fn set_scenario(&mut self, text: String) -> &str {
        self.phase = InterviewPhase::AwaitingQuestion;
        self.scenario.insert(text)
    }

    pub(crate) fn set_pending_question(&mut self, text: String) -> &str {
        self.phase = InterviewPhase::AwaitingResponse;
        self.pending_question.insert(text)
    }

    /// Applies the candidate's reply to the pending question.
    pub(crate) fn apply_reply(&mut self, reply: CandidateReply) -> Result<InterviewPhase> {
        self.ensure_phase(InterviewPhase::AwaitingResponse, "record a candidate response")?;

        let question = self.pending_question.take().unwrap_or_default();
        match reply {
            CandidateReply::Answer(answer) => {
                self.transcript.push(question, answer);
                self.phase = InterviewPhase::AwaitingQuestion;
            }
            CandidateReply::End => {
                self.unanswered_question = Some(question);
                self.phase = InterviewPhase::Terminated;
            }
        }
        Ok(self.phase)
    }

    pub(crate) fn mark_feedback_generated(&mut self) {
        self.feedback_generated = true;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
