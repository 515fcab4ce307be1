//! Case types offered by the interview and their scenario descriptions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::{CoachError, Result};

/// The fixed set of case interview types.
///
/// Each variant carries the description handed to the scenario prompt. The set
/// is closed: there is no fallback description for unknown labels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
pub enum CaseType {
    #[strum(serialize = "Market Entry")]
    #[serde(rename = "Market Entry")]
    MarketEntry,
    #[strum(serialize = "Profitability")]
    #[serde(rename = "Profitability")]
    Profitability,
    #[strum(serialize = "Growth Strategy")]
    #[serde(rename = "Growth Strategy")]
    GrowthStrategy,
    #[strum(serialize = "Mergers and Acquisitions")]
    #[serde(rename = "Mergers and Acquisitions")]
    MergersAndAcquisitions,
}

impl CaseType {
    /// Human-readable label, e.g. `Market Entry`.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Command-line friendly alias, e.g. `market-entry`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::MarketEntry => "market-entry",
            Self::Profitability => "profitability",
            Self::GrowthStrategy => "growth-strategy",
            Self::MergersAndAcquisitions => "mergers-and-acquisitions",
        }
    }

    /// The instruction describing what kind of scenario to generate.
    pub fn description(self) -> &'static str {
        match self {
            Self::MarketEntry => {
                "Generate a realistic market entry scenario where a company is considering \
                 entering a new geographical or product market. Consider factors like market \
                 size, competition, entry barriers, and regulatory environment."
            }
            Self::Profitability => {
                "Generate a realistic profitability case scenario where a company is \
                 experiencing declining profits. The scenario should involve analysis of \
                 revenue streams, cost structures, and market trends to determine why profits \
                 are falling and suggest improvements."
            }
            Self::GrowthStrategy => {
                "Generate a realistic growth strategy case scenario where a company is \
                 exploring ways to increase revenue or market share. Consider opportunities \
                 for new markets, customer segments, or product lines."
            }
            Self::MergersAndAcquisitions => {
                "Generate a realistic M&A case scenario where a company is evaluating the \
                 potential acquisition of another company. Consider synergies, valuation, \
                 cultural fit, and integration challenges."
            }
        }
    }

    /// Returns every case type in display order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Resolves a label or slug, ignoring ASCII case and surrounding whitespace.
    pub fn from_label(label: &str) -> Result<Self> {
        let wanted = label.trim();
        Self::iter()
            .find(|case| {
                case.label().eq_ignore_ascii_case(wanted) || case.slug().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CoachError::invalid_case_type(label))
    }

    pub(crate) fn expected_labels() -> String {
        Self::iter()
            .map(Self::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for CaseType {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}
