//! The candidate side of the interview.

use std::collections::VecDeque;

use crate::error::Result;
use crate::interview::FeedbackOutcome;
use crate::session::CandidateReply;

/// Supplies candidate replies and shows interview output.
///
/// The question loop calls [`CandidateDriver::reply_to`] once per generated
/// question. Console, scripted, and test drivers all plug in here.
pub trait CandidateDriver {
    /// Shows the generated scenario. Called once, before the first question.
    fn present_scenario(&mut self, _scenario: &str) -> Result<()> {
        Ok(())
    }

    /// Shows `question` and returns the candidate's reply.
    fn reply_to(&mut self, question: &str) -> Result<CandidateReply>;

    /// Shows the final feedback. Called once, after the loop terminated.
    fn present_feedback(&mut self, _outcome: &FeedbackOutcome) -> Result<()> {
        Ok(())
    }
}

/// Replays a fixed list of raw inputs.
///
/// Each input goes through [`CandidateReply::from_input`], so a blank entry
/// or the end token terminates the interview. Running out of inputs also
/// terminates it.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    inputs: VecDeque<String>,
    end_token: Option<String>,
    questions: Vec<String>,
    scenario: Option<String>,
    feedback: Option<FeedbackOutcome>,
}

impl ScriptedDriver {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Reads one input per line.
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn with_end_token(mut self, token: impl Into<String>) -> Self {
        self.end_token = Some(token.into());
        self
    }

    /// Every question this driver was asked, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    pub fn feedback(&self) -> Option<&FeedbackOutcome> {
        self.feedback.as_ref()
    }

    /// Inputs that were never consumed.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl CandidateDriver for ScriptedDriver {
    fn present_scenario(&mut self, scenario: &str) -> Result<()> {
        self.scenario = Some(scenario.to_string());
        Ok(())
    }

    fn reply_to(&mut self, question: &str) -> Result<CandidateReply> {
        self.questions.push(question.to_string());
        let reply = match self.inputs.pop_front() {
            Some(input) => CandidateReply::from_input(&input, self.end_token.as_deref()),
            None => CandidateReply::End,
        };
        Ok(reply)
    }

    fn present_feedback(&mut self, outcome: &FeedbackOutcome) -> Result<()> {
        self.feedback = Some(outcome.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_driver_replays_inputs() {
        let mut driver = ScriptedDriver::new(["first", "second"]);

        assert_eq!(
            driver.reply_to("Q1").unwrap(),
            CandidateReply::Answer("first".into())
        );
        assert_eq!(
            driver.reply_to("Q2").unwrap(),
            CandidateReply::Answer("second".into())
        );
        assert_eq!(driver.reply_to("Q3").unwrap(), CandidateReply::End);
        assert_eq!(driver.questions(), ["Q1", "Q2", "Q3"]);
    }

    #[test]
    fn test_scripted_driver_end_token() {
        let mut driver = ScriptedDriver::from_lines("answer\nEnd\nnever read").with_end_token("end");

        assert!(!driver.reply_to("Q1").unwrap().is_end());
        assert!(driver.reply_to("Q2").unwrap().is_end());
        assert_eq!(driver.remaining(), 1);
    }
}
