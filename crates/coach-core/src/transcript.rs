//! The ordered record of interview exchanges.

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

const INTERVIEWER_PREFIX: &str = "Interviewer: ";
const CANDIDATE_PREFIX: &str = "Candidate: ";
const CONTINUATION_INDENT: &str = "  ";

/// One interviewer question and the candidate's answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

impl Exchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Chronological list of exchanges for one session.
///
/// Entries are only ever appended; nothing is removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    exchanges: Vec<Exchange>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.exchanges.push(Exchange::new(question, answer));
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exchange> {
        self.exchanges.iter()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Renders the transcript as plain-text blocks, oldest first:
    ///
    /// ```text
    /// Interviewer: <question>
    /// Candidate: <answer>
    /// ```
    ///
    /// Every further line of a multi-line question or answer is indented by
    /// two spaces, so text that itself starts with `Candidate: ` stays inside
    /// its field. An empty transcript renders as an empty string.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for exchange in &self.exchanges {
            push_field(&mut out, INTERVIEWER_PREFIX, &exchange.question);
            push_field(&mut out, CANDIDATE_PREFIX, &exchange.answer);
        }
        out
    }

    /// Parses text produced by [`Transcript::serialize`].
    ///
    /// Only `\n` separates lines; a `\r` is kept as part of the text.
    /// Indented lines continue the open question or answer. Blank lines
    /// between blocks are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let mut transcript = Self::new();
        let mut question: Option<String> = None;
        let mut answer: Option<String> = None;
        let mut line_count = 0;

        for (index, line) in body.split('\n').enumerate() {
            let line_no = index + 1;
            line_count = line_no;

            if let Some(rest) = line.strip_prefix(CONTINUATION_INDENT) {
                let Some(open) = answer.as_mut().or(question.as_mut()) else {
                    return Err(CoachError::transcript_parse(
                        line_no,
                        "continuation line outside of an exchange",
                    ));
                };
                open.push('\n');
                open.push_str(rest);
            } else if let Some(rest) = line.strip_prefix(INTERVIEWER_PREFIX) {
                match (question.take(), answer.take()) {
                    (Some(q), Some(a)) => transcript.push(q, a),
                    (Some(_), None) => {
                        return Err(CoachError::transcript_parse(
                            line_no,
                            "question has no candidate answer",
                        ));
                    }
                    _ => {}
                }
                question = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix(CANDIDATE_PREFIX) {
                if question.is_none() {
                    return Err(CoachError::transcript_parse(
                        line_no,
                        "candidate answer without a preceding question",
                    ));
                }
                if answer.is_some() {
                    return Err(CoachError::transcript_parse(
                        line_no,
                        "question already has an answer",
                    ));
                }
                answer = Some(rest.to_string());
            } else if !line.trim().is_empty() {
                return Err(CoachError::transcript_parse(
                    line_no,
                    "text outside of an exchange",
                ));
            }
        }

        match (question, answer) {
            (Some(q), Some(a)) => transcript.push(q, a),
            (Some(_), None) => {
                return Err(CoachError::transcript_parse(
                    line_count,
                    "question has no candidate answer",
                ));
            }
            _ => {}
        }

        Ok(transcript)
    }
}

fn push_field(out: &mut String, prefix: &str, text: &str) {
    let mut lines = text.split('\n');
    out.push_str(prefix);
    out.push_str(lines.next().unwrap_or_default());
    out.push('\n');
    for line in lines {
        out.push_str(CONTINUATION_INDENT);
        out.push_str(line);
        out.push('\n');
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Exchange;
    type IntoIter = std::slice::Iter<'a, Exchange>;

    fn into_iter(self) -> Self::IntoIter {
        self.exchanges.iter()
    }
}
