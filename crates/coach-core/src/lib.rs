//! Core of the case interview coach.
//!
//! An interview runs in three phases against a single [`CompletionClient`]:
//! a scenario is generated once, questions are asked until the candidate ends
//! the interview, and the transcript is critiqued in a chosen
//! [`FeedbackStyle`]. All state lives in a per-session [`SessionState`].

pub mod case;
pub mod completion;
pub mod driver;
pub mod error;
pub mod interview;
pub mod prompt;
pub mod session;
pub mod style;
pub mod transcript;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use case::CaseType;
pub use completion::{CompletionClient, CompletionError};
pub use driver::{CandidateDriver, ScriptedDriver};
pub use error::{CoachError, Result};
pub use interview::{FeedbackOutcome, InterviewOrchestrator, SessionReport};
pub use prompt::{PromptKind, PromptLibrary};
pub use session::{CandidateReply, InterviewPhase, SessionState};
pub use style::FeedbackStyle;
pub use transcript::{Exchange, Transcript};
