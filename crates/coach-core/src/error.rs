//! Error types for the case interview core.

use thiserror::Error;

use crate::completion::CompletionError;
use crate::prompt::PromptKind;
use crate::session::InterviewPhase;

/// The error type shared by every interview operation.
///
/// Input problems (`InvalidCaseType`, `InvalidFeedbackStyle`) are raised before
/// any model call is issued. `ModelCallFailure` is never recovered locally: it
/// aborts the session and is surfaced to the driver as-is.
#[derive(Error, Debug, Clone)]
pub enum CoachError {
    /// The supplied case type label does not name a known case type.
    #[error("Invalid case type '{label}' (expected one of: {expected})")]
    InvalidCaseType { label: String, expected: String },

    /// The supplied feedback style label does not name a known style.
    #[error("Invalid feedback style '{label}' (expected one of: {expected})")]
    InvalidFeedbackStyle { label: String, expected: String },

    /// The completion capability failed during the given phase.
    #[error("Model call failed while generating the {phase}: {source}")]
    ModelCallFailure {
        phase: PromptKind,
        #[source]
        source: CompletionError,
    },

    /// Feedback was requested for a session without a single exchange.
    #[error("Cannot generate feedback: the transcript has no exchanges")]
    EmptyTranscript,

    /// An operation was invoked in a phase that does not allow it.
    #[error("Cannot {operation} while {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: InterviewPhase,
    },

    /// A serialized transcript could not be parsed back.
    #[error("Transcript parse error at line {line}: {message}")]
    TranscriptParse { line: usize, message: String },

    /// Prompt template rendering failed.
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error (missing credentials, bad settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The candidate driver could not read input or show output.
    #[error("Driver error: {0}")]
    Driver(String),
}

impl CoachError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidCaseType error listing the accepted labels.
    pub fn invalid_case_type(label: impl Into<String>) -> Self {
        Self::InvalidCaseType {
            label: label.into(),
            expected: crate::case::CaseType::expected_labels(),
        }
    }

    /// Creates an InvalidFeedbackStyle error listing the accepted labels.
    pub fn invalid_feedback_style(label: impl Into<String>) -> Self {
        Self::InvalidFeedbackStyle {
            label: label.into(),
            expected: crate::style::FeedbackStyle::expected_labels(),
        }
    }

    /// Wraps a completion failure with the phase whose prompt was being completed.
    pub fn model_call(phase: PromptKind, source: CompletionError) -> Self {
        Self::ModelCallFailure { phase, source }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(operation: &'static str, phase: InterviewPhase) -> Self {
        Self::InvalidTransition { operation, phase }
    }

    /// Creates a TranscriptParse error
    pub fn transcript_parse(line: usize, message: impl Into<String>) -> Self {
        Self::TranscriptParse {
            line,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error was raised by the completion capability
    pub fn is_model_call_failure(&self) -> bool {
        matches!(self, Self::ModelCallFailure { .. })
    }

    /// Check if this error rejected the driver's input before any model call
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidCaseType { .. } | Self::InvalidFeedbackStyle { .. }
        )
    }

    /// Check if this is an EmptyTranscript error
    pub fn is_empty_transcript(&self) -> bool {
        matches!(self, Self::EmptyTranscript)
    }

    /// Check if this is an InvalidTransition error
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

impl From<minijinja::Error> for CoachError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

/// A type alias for `Result<T, CoachError>`.
pub type Result<T> = std::result::Result<T, CoachError>;
