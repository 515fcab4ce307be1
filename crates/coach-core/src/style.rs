//! Feedback style personas.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::{CoachError, Result};

/// The consulting persona whose tone shapes the final feedback.
///
/// The style changes the wording of the critique, not what it evaluates.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
pub enum FeedbackStyle {
    #[default]
    #[strum(serialize = "Bain-style")]
    #[serde(rename = "Bain-style")]
    Bain,
    #[strum(serialize = "McKinsey-style")]
    #[serde(rename = "McKinsey-style")]
    McKinsey,
    #[strum(serialize = "BCG-style")]
    #[serde(rename = "BCG-style")]
    Bcg,
}

impl FeedbackStyle {
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Short alias accepted on the command line.
    pub fn alias(self) -> &'static str {
        match self {
            Self::Bain => "bain",
            Self::McKinsey => "mckinsey",
            Self::Bcg => "bcg",
        }
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Resolves a label (`BCG-style`) or alias (`bcg`), ignoring ASCII case.
    pub fn from_label(label: &str) -> Result<Self> {
        let wanted = label.trim();
        Self::iter()
            .find(|style| {
                style.label().eq_ignore_ascii_case(wanted) || style.alias().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CoachError::invalid_feedback_style(label))
    }

    pub(crate) fn expected_labels() -> String {
        Self::iter()
            .map(Self::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for FeedbackStyle {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}
