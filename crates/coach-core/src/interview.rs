//! The interview orchestrator: scenario, question loop, feedback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::case::CaseType;
use crate::completion::{CompletionClient, CompletionError};
use crate::driver::CandidateDriver;
use crate::error::{CoachError, Result};
use crate::prompt::{PromptKind, PromptLibrary};
use crate::session::{CandidateReply, InterviewPhase, SessionState};
use crate::style::FeedbackStyle;
use crate::transcript::Transcript;

/// Result of the feedback phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedbackOutcome {
    /// The model's critique, verbatim.
    Delivered(String),
    /// The candidate ended the interview before answering anything, so no
    /// feedback request was made.
    InsufficientData,
}

impl FeedbackOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Delivered(text) => Some(text),
            Self::InsufficientData => None,
        }
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub case_type: CaseType,
    pub feedback_style: FeedbackStyle,
    pub scenario: String,
    pub transcript: Transcript,
    /// The question shown when the candidate ended the interview.
    pub unanswered_question: Option<String>,
    pub feedback: FeedbackOutcome,
}

/// Drives one interview session against a completion client.
///
/// Every model call is awaited before the next step; the orchestrator never
/// retries a failed call. The client may be shared between sessions, the
/// [`SessionState`] may not.
pub struct InterviewOrchestrator {
    client: Arc<dyn CompletionClient>,
    prompts: PromptLibrary,
    state: SessionState,
}

impl InterviewOrchestrator {
    /// Starts a fresh session.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            prompts: PromptLibrary::new(),
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    // ============================================================================
    // Scenario phase
    // ============================================================================

    /// Resolves `identifier` and generates the scenario for it.
    ///
    /// An unknown identifier fails with [`CoachError::InvalidCaseType`] before
    /// any model call.
    pub async fn generate_scenario(&mut self, identifier: &str) -> Result<&str> {
        let case_type = CaseType::from_label(identifier).inspect_err(|_| {
            warn!(identifier, "Rejected unknown case type");
        })?;
        self.generate_scenario_for(case_type).await
    }

    /// Generates the scenario text. Allowed once per session.
    pub async fn generate_scenario_for(&mut self, case_type: CaseType) -> Result<&str> {
        self.state
            .ensure_phase(InterviewPhase::AwaitingScenario, "generate a scenario")?;

        info!(session_id = %self.state.id(), case_type = %case_type, "Generating case scenario");
        let prompt = self.prompts.scenario(case_type)?;
        let scenario = self.complete(PromptKind::Scenario, &prompt).await?;

        Ok(self.state.set_scenario(scenario))
    }

    // ============================================================================
    // Question loop
    // ============================================================================

    /// Generates the next interviewer question from the scenario and the
    /// transcript so far.
    pub async fn next_question(&mut self) -> Result<&str> {
        self.state
            .ensure_phase(InterviewPhase::AwaitingQuestion, "generate a question")?;

        let scenario = self.state.scenario().unwrap_or_default();
        let prompt = self.prompts.question(scenario, self.state.transcript())?;
        debug!(
            session_id = %self.state.id(),
            exchanges = self.state.transcript().len(),
            "Requesting next question"
        );
        let question = self.complete(PromptKind::Question, &prompt).await?;

        Ok(self.state.set_pending_question(question))
    }

    /// Records the candidate's reply to the pending question.
    ///
    /// An answer is appended to the transcript and the loop goes back to
    /// [`InterviewPhase::AwaitingQuestion`]. [`CandidateReply::End`] terminates
    /// the loop and the pending question is dropped from the transcript.
    pub fn respond(&mut self, reply: CandidateReply) -> Result<InterviewPhase> {
        let ending = reply.is_end();
        let phase = self.state.apply_reply(reply)?;
        if ending {
            info!(
                session_id = %self.state.id(),
                exchanges = self.state.transcript().len(),
                "Candidate ended the interview"
            );
        }
        Ok(phase)
    }

    /// Alternates questions and replies until the driver ends the interview.
    ///
    /// Returns the number of recorded exchanges.
    pub async fn run_question_loop<D>(&mut self, driver: &mut D) -> Result<usize>
    where
        D: CandidateDriver + ?Sized,
    {
        while self.state.phase() != InterviewPhase::Terminated {
            let question = self.next_question().await?.to_string();
            let reply = driver.reply_to(&question)?;
            self.respond(reply)?;
        }
        Ok(self.state.transcript().len())
    }

    // ============================================================================
    // Feedback phase
    // ============================================================================

    /// Critiques the transcript in `style`. Allowed once, after termination.
    ///
    /// With no exchanges recorded this fails with
    /// [`CoachError::EmptyTranscript`] and issues no model call.
    pub async fn feedback(&mut self, style: FeedbackStyle) -> Result<String> {
        self.state
            .ensure_phase(InterviewPhase::Terminated, "generate feedback")?;
        if self.state.feedback_generated() {
            return Err(CoachError::invalid_transition(
                "generate feedback twice",
                self.state.phase(),
            ));
        }
        if self.state.transcript().is_empty() {
            return Err(CoachError::EmptyTranscript);
        }

        info!(
            session_id = %self.state.id(),
            style = %style,
            exchanges = self.state.transcript().len(),
            "Generating feedback"
        );
        let prompt = self.prompts.feedback(style, self.state.transcript())?;
        let feedback = self.complete(PromptKind::Feedback, &prompt).await?;
        self.state.mark_feedback_generated();

        Ok(feedback)
    }

    // ============================================================================
    // Whole session
    // ============================================================================

    /// Runs scenario, question loop and feedback in order.
    ///
    /// The whole session runs inside an `interview` span.
    pub async fn run<D>(
        self,
        case_type: CaseType,
        style: FeedbackStyle,
        driver: &mut D,
    ) -> Result<SessionReport>
    where
        D: CandidateDriver + ?Sized,
    {
        let span = info_span!(
            "interview",
            session_id = %self.state.id(),
            case_type = %case_type,
            style = %style
        );
        self.run_phases(case_type, style, driver).instrument(span).await
    }

    async fn run_phases<D>(
        mut self,
        case_type: CaseType,
        style: FeedbackStyle,
        driver: &mut D,
    ) -> Result<SessionReport>
    where
        D: CandidateDriver + ?Sized,
    {
        let scenario = self.generate_scenario_for(case_type).await?.to_string();
        driver.present_scenario(&scenario)?;

        self.run_question_loop(driver).await?;

        let feedback = match self.feedback(style).await {
            Ok(text) => FeedbackOutcome::Delivered(text),
            Err(CoachError::EmptyTranscript) => {
                info!(session_id = %self.state.id(), "No exchanges recorded, skipping feedback");
                FeedbackOutcome::InsufficientData
            }
            Err(err) => return Err(err),
        };
        driver.present_feedback(&feedback)?;

        let state = self.into_state();
        Ok(SessionReport {
            session_id: state.id().to_string(),
            started_at: state.started_at(),
            case_type,
            feedback_style: style,
            scenario,
            transcript: state.transcript().clone(),
            unanswered_question: state.unanswered_question().map(str::to_string),
            feedback,
        })
    }

    /// Issues one completion inside a `completion` span and rejects blank
    /// output.
    async fn complete(&self, kind: PromptKind, prompt: &str) -> Result<String> {
        let span = info_span!(
            "completion",
            session_id = %self.state.id(),
            phase = %kind,
            model = self.client.model_name()
        );
        debug!(
            parent: &span,
            prompt_chars = prompt.chars().count(),
            "Requesting completion"
        );
        let text = self
            .client
            .complete(prompt)
            .instrument(span)
            .await
            .map_err(|err| CoachError::model_call(kind, err))?;

        if text.trim().is_empty() {
            return Err(CoachError::model_call(kind, CompletionError::EmptyCompletion));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tracing::span::{Attributes, Id};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::driver::ScriptedDriver;
    use crate::testing::RecordingClient;

    fn orchestrator(client: &Arc<RecordingClient>) -> InterviewOrchestrator {
        InterviewOrchestrator::new(client.clone())
    }

    #[tokio::test]
    async fn test_scenario_prompt_for_every_case_type() {
        for case in CaseType::all() {
            let client = Arc::new(RecordingClient::new(["A generated scenario"]));
            let mut interview = orchestrator(&client);

            let scenario = interview.generate_scenario(case.label()).await.unwrap();

            assert_eq!(scenario, "A generated scenario");
            assert_eq!(client.call_count(), 1);
            assert!(client.prompts()[0].contains(case.description()));
            assert_eq!(interview.state().phase(), InterviewPhase::AwaitingQuestion);
        }
    }

    #[tokio::test]
    async fn test_invalid_case_type_issues_no_request() {
        let client = Arc::new(RecordingClient::default());
        let mut interview = orchestrator(&client);

        let err = interview.generate_scenario("Pricing").await.unwrap_err();

        assert!(matches!(err, CoachError::InvalidCaseType { .. }));
        assert_eq!(client.call_count(), 0);
        assert_eq!(interview.state().phase(), InterviewPhase::AwaitingScenario);
    }

    #[tokio::test]
    async fn test_scenario_is_generated_once() {
        let client = Arc::new(RecordingClient::new(["first scenario", "second scenario"]));
        let mut interview = orchestrator(&client);

        interview.generate_scenario_for(CaseType::Profitability).await.unwrap();
        let err = interview
            .generate_scenario_for(CaseType::Profitability)
            .await
            .unwrap_err();

        assert!(err.is_invalid_transition());
        assert_eq!(client.call_count(), 1);
        assert_eq!(interview.state().scenario(), Some("first scenario"));
    }

    #[tokio::test]
    async fn test_scenario_is_returned_verbatim() {
        let raw = "  **Case:** TechCo & friends\n\n";
        let client = Arc::new(RecordingClient::new([raw]));
        let mut interview = orchestrator(&client);

        let scenario = interview.generate_scenario_for(CaseType::GrowthStrategy).await.unwrap();
        assert_eq!(scenario, raw);
    }

    #[tokio::test]
    async fn test_question_loop_records_n_pairs_with_n_plus_one_requests() {
        for n in 0..4 {
            let client = Arc::new(RecordingClient::default());
            let mut interview = orchestrator(&client);
            interview.generate_scenario_for(CaseType::MarketEntry).await.unwrap();

            let answers: Vec<String> = (0..n).map(|i| format!("answer {i}")).collect();
            let mut inputs = answers.clone();
            inputs.push(String::new());
            let mut driver = ScriptedDriver::new(inputs);

            let recorded = interview.run_question_loop(&mut driver).await.unwrap();

            assert_eq!(recorded, n);
            // one scenario call plus n + 1 question calls
            assert_eq!(client.call_count(), 1 + n + 1);
            let transcript = interview.state().transcript();
            for (i, exchange) in transcript.iter().enumerate() {
                assert_eq!(exchange.question, driver.questions()[i]);
                assert_eq!(exchange.answer, answers[i]);
            }
            assert_eq!(
                interview.state().unanswered_question(),
                driver.questions().last().map(String::as_str)
            );
        }
    }

    #[tokio::test]
    async fn test_question_prompt_carries_previous_exchanges() {
        let client = Arc::new(RecordingClient::new(["scenario text", "Q1", "Q2"]));
        let mut interview = orchestrator(&client);
        interview.generate_scenario_for(CaseType::MarketEntry).await.unwrap();

        interview.next_question().await.unwrap();
        interview
            .respond(CandidateReply::Answer("A1".into()))
            .unwrap();
        interview.next_question().await.unwrap();

        let prompts = client.prompts();
        assert!(prompts[1].contains("Scenario:\nscenario text"));
        assert!(prompts[1].contains("Previous responses:\n\n"));
        assert!(prompts[2].contains("Interviewer: Q1\nCandidate: A1\n"));
        assert_eq!(interview.state().pending_question(), Some("Q2"));
    }

    #[tokio::test]
    async fn test_no_question_after_termination() {
        let client = Arc::new(RecordingClient::default());
        let mut interview = orchestrator(&client);
        interview.generate_scenario_for(CaseType::MarketEntry).await.unwrap();
        interview.next_question().await.unwrap();
        interview.respond(CandidateReply::End).unwrap();
        let calls = client.call_count();

        let err = interview.next_question().await.unwrap_err();

        assert!(err.is_invalid_transition());
        assert_eq!(client.call_count(), calls);
        assert!(interview.state().is_terminated());
    }

    #[tokio::test]
    async fn test_respond_before_question_is_rejected() {
        let client = Arc::new(RecordingClient::default());
        let mut interview = orchestrator(&client);
        interview.generate_scenario_for(CaseType::MarketEntry).await.unwrap();

        let err = interview.respond(CandidateReply::Answer("early".into())).unwrap_err();
        assert!(err.is_invalid_transition());
        assert!(interview.state().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_feedback_before_termination_is_rejected() {
        let client = Arc::new(RecordingClient::default());
        let mut interview = orchestrator(&client);
        interview.generate_scenario_for(CaseType::MarketEntry).await.unwrap();
        interview.next_question().await.unwrap();
        let calls = client.call_count();

        let err = interview.feedback(FeedbackStyle::Bain).await.unwrap_err();

        assert!(err.is_invalid_transition());
        assert_eq!(client.call_count(), calls);
    }

    #[tokio::test]
    async fn test_feedback_is_generated_once() {
        let client = Arc::new(RecordingClient::default());
        let mut interview = orchestrator(&client);
        interview.generate_scenario_for(CaseType::MarketEntry).await.unwrap();
        let mut driver = ScriptedDriver::new(["an answer"]);
        interview.run_question_loop(&mut driver).await.unwrap();

        interview.feedback(FeedbackStyle::McKinsey).await.unwrap();
        let calls = client.call_count();
        let err = interview.feedback(FeedbackStyle::McKinsey).await.unwrap_err();

        assert!(err.is_invalid_transition());
        assert_eq!(client.call_count(), calls);
    }

    #[tokio::test]
    async fn test_market_entry_session() {
        let client = Arc::new(RecordingClient::new([
            "TechCo wants to sell electronics in Europe.",
            "What is the target market?",
            "What are the entry barriers?",
            "How would you size the market?",
            "Solid structure, quantify more.",
        ]));
        let mut driver = ScriptedDriver::new([
            "Western Europe, electronics",
            "High tariffs and certification costs",
            "",
        ]);

        let report = orchestrator(&client)
            .run(CaseType::MarketEntry, FeedbackStyle::Bain, &mut driver)
            .await
            .unwrap();

        let exchanges = report.transcript.exchanges();
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[0].question, "What is the target market?");
        assert_eq!(exchanges[0].answer, "Western Europe, electronics");
        assert_eq!(exchanges[1].question, "What are the entry barriers?");
        assert_eq!(exchanges[1].answer, "High tariffs and certification costs");
        assert_eq!(
            report.unanswered_question.as_deref(),
            Some("How would you size the market?")
        );
        assert_eq!(
            report.feedback,
            FeedbackOutcome::Delivered("Solid structure, quantify more.".into())
        );
        assert_eq!(driver.scenario(), Some("TechCo wants to sell electronics in Europe."));
        assert!(report.started_at <= Utc::now());
        assert_eq!(driver.feedback(), Some(&report.feedback));

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 5);
        let feedback_requests: Vec<_> = prompts
            .iter()
            .filter(|p| p.starts_with("Provide feedback in the style of"))
            .collect();
        assert_eq!(feedback_requests.len(), 1);
        let feedback_prompt = feedback_requests[0];
        assert!(
            FeedbackStyle::all()
                .iter()
                .any(|style| feedback_prompt.contains(style.label()))
        );
        assert!(feedback_prompt.contains(&report.transcript.serialize()));
        assert!(!feedback_prompt.contains("How would you size the market?"));
    }

    #[tokio::test]
    async fn test_immediate_end_yields_insufficient_data() {
        let client = Arc::new(RecordingClient::new(["scenario", "first question"]));
        let mut driver = ScriptedDriver::new([""]);

        let report = orchestrator(&client)
            .run(CaseType::Profitability, FeedbackStyle::Bcg, &mut driver)
            .await
            .unwrap();

        assert!(report.transcript.is_empty());
        assert_eq!(report.feedback, FeedbackOutcome::InsufficientData);
        // scenario and one question, no feedback request
        assert_eq!(client.call_count(), 2);
        assert_eq!(driver.feedback(), Some(&FeedbackOutcome::InsufficientData));
    }

    #[tokio::test]
    async fn test_feedback_with_empty_transcript_is_an_error() {
        let client = Arc::new(RecordingClient::default());
        let mut interview = orchestrator(&client);
        interview.generate_scenario_for(CaseType::MarketEntry).await.unwrap();
        interview.next_question().await.unwrap();
        interview.respond(CandidateReply::End).unwrap();

        let err = interview.feedback(FeedbackStyle::Bain).await.unwrap_err();

        assert!(err.is_empty_transcript());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_model_failure_aborts_session() {
        let client = Arc::new(RecordingClient::new(["scenario"]));
        client.push_error(CompletionError::RateLimited {
            message: "quota exceeded".into(),
            retry_after: None,
        });
        let mut driver = ScriptedDriver::new(["never used"]);

        let err = orchestrator(&client)
            .run(CaseType::MarketEntry, FeedbackStyle::Bain, &mut driver)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoachError::ModelCallFailure {
                phase: PromptKind::Question,
                source: CompletionError::RateLimited { .. },
            }
        ));
        assert_eq!(client.call_count(), 2);
        assert!(driver.questions().is_empty());
    }

    #[tokio::test]
    async fn test_blank_completion_is_rejected() {
        let client = Arc::new(RecordingClient::new(["  \n "]));
        let mut interview = orchestrator(&client);

        let err = interview
            .generate_scenario_for(CaseType::MarketEntry)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoachError::ModelCallFailure {
                phase: PromptKind::Scenario,
                source: CompletionError::EmptyCompletion,
            }
        ));
        assert!(interview.state().scenario().is_none());
        assert_eq!(interview.state().phase(), InterviewPhase::AwaitingScenario);
    }

    /// Records the name of every span opened while it is installed.
    #[derive(Clone, Default)]
    struct SpanRecorder {
        names: Arc<Mutex<Vec<String>>>,
    }

    impl<S: Subscriber> Layer<S> for SpanRecorder {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            self.names
                .lock()
                .unwrap()
                .push(attrs.metadata().name().to_string());
        }
    }

    #[tokio::test]
    async fn test_session_and_completions_run_in_spans() {
        let recorder = SpanRecorder::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(recorder.clone()),
        );
        let client = Arc::new(RecordingClient::new(["scenario", "Q1", "Q2", "feedback"]));
        let mut driver = ScriptedDriver::new(["A1", ""]);

        orchestrator(&client)
            .run(CaseType::MarketEntry, FeedbackStyle::Bain, &mut driver)
            .await
            .unwrap();

        let names = recorder.names.lock().unwrap().clone();
        assert_eq!(names.iter().filter(|name| *name == "interview").count(), 1);
        assert_eq!(
            names.iter().filter(|name| *name == "completion").count(),
            client.call_count()
        );
    }

    #[tokio::test]
    async fn test_sessions_sharing_a_client_are_independent() {
        let client = Arc::new(RecordingClient::default());
        let mut first = orchestrator(&client);
        let mut second = orchestrator(&client);

        first.generate_scenario_for(CaseType::MarketEntry).await.unwrap();
        first.next_question().await.unwrap();
        first.respond(CandidateReply::Answer("only mine".into())).unwrap();
        second.generate_scenario_for(CaseType::GrowthStrategy).await.unwrap();

        assert_eq!(first.state().transcript().len(), 1);
        assert!(second.state().transcript().is_empty());
        assert_ne!(first.state().id(), second.state().id());
        assert_eq!(second.state().phase(), InterviewPhase::AwaitingQuestion);
    }
}
