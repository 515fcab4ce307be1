//! Merges command-line flags with `config.toml`.

use std::path::PathBuf;
use std::time::Duration;

use coach_core::{CaseType, CoachError, FeedbackStyle};
use coach_infrastructure::CoachSettings;

use crate::InterviewArgs;

/// Effective options for one interview run. Flags win over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// `None` means the console driver asks for it.
    pub case_type: Option<CaseType>,
    pub style: FeedbackStyle,
    pub end_token: String,
    pub script: Option<PathBuf>,
    pub model: ModelOptions,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOptions {
    pub name: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    pub base_url: Option<String>,
}

pub fn resolve(args: &InterviewArgs, settings: &CoachSettings) -> Result<SessionOptions, CoachError> {
    let case_type = match args.case_type.as_deref() {
        Some(label) => Some(CaseType::from_label(label)?),
        None => settings.interview.default_case_type,
    };

    let style = match args.style.as_deref() {
        Some(label) => FeedbackStyle::from_label(label)?,
        None => settings.interview.default_style.unwrap_or_default(),
    };

    let end_token = args
        .end_token
        .clone()
        .unwrap_or_else(|| settings.interview.end_token.clone());

    let model = ModelOptions {
        name: args.model.clone().or_else(|| settings.model.name.clone()),
        temperature: args.temperature.or(settings.model.temperature),
        max_tokens: settings.model.max_tokens,
        timeout: settings.model.timeout_secs.map(Duration::from_secs),
        base_url: settings.model.base_url.clone(),
    };

    Ok(SessionOptions {
        case_type,
        style,
        end_token,
        script: args.script.clone(),
        model,
    })
}
