use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use coach_core::{CandidateDriver, CaseType, InterviewOrchestrator};
use coach_infrastructure::{CoachSettings, SettingsStorage};
use coach_interaction::OpenAiClient;
use tracing::{info, warn};

use crate::InterviewArgs;
use crate::console::{ConsoleDriver, ScriptDriver};
use crate::options::{self, ModelOptions, SessionOptions};
use crate::render;

pub async fn handle(args: &InterviewArgs) -> Result<()> {
    let settings = load_settings()?;
    let options = options::resolve(args, &settings)?;

    // Credentials are checked before the candidate is asked anything.
    let client = apply_model_options(OpenAiClient::try_from_env()?, &options.model)?;
    info!(model = %client.model(), "Using OpenAI model");

    match &options.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            let case_type = options
                .case_type
                .ok_or_else(|| anyhow!("--case-type is required when answers come from --script"))?;
            let mut driver = ScriptDriver::new(&text, &options.end_token);
            run_session(client, case_type, &options, &mut driver).await?;
            if driver.remaining() > 0 {
                warn!(lines = driver.remaining(), "Script lines after the end of the interview were ignored");
            }
            Ok(())
        }
        None => {
            let mut driver = ConsoleDriver::new(options.end_token.clone())?;
            let case_type = match options.case_type {
                Some(case_type) => case_type,
                None => driver.prompt_case_type()?,
            };
            run_session(client, case_type, &options, &mut driver).await
        }
    }
}

/// A missing config directory is not an error; a broken config file is.
fn load_settings() -> Result<CoachSettings> {
    match SettingsStorage::new() {
        Ok(storage) => storage
            .load()
            .with_context(|| format!("failed to load {}", storage.path().display())),
        Err(err) => {
            warn!(error = %err, "Config directory unavailable, using default settings");
            Ok(CoachSettings::default())
        }
    }
}

fn apply_model_options(mut client: OpenAiClient, model: &ModelOptions) -> Result<OpenAiClient> {
    if let Some(name) = &model.name {
        client = client.with_model(name.as_str());
    }
    if let Some(temperature) = model.temperature {
        client = client.with_temperature(temperature);
    }
    if let Some(max_tokens) = model.max_tokens {
        client = client.with_max_tokens(max_tokens);
    }
    if let Some(base_url) = &model.base_url {
        client = client.with_base_url(base_url.as_str());
    }
    if let Some(timeout) = model.timeout {
        client = client.with_timeout(timeout)?;
    }
    Ok(client)
}

async fn run_session(
    client: OpenAiClient,
    case_type: CaseType,
    options: &SessionOptions,
    driver: &mut dyn CandidateDriver,
) -> Result<()> {
    render::banner(case_type, options.style, &options.end_token);

    let report = InterviewOrchestrator::new(Arc::new(client))
        .run(case_type, options.style, driver)
        .await?;

    info!(
        session_id = %report.session_id,
        exchanges = report.transcript.len(),
        "Interview finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_apply_model_options_overrides_model() {
        let model = ModelOptions {
            name: Some("gpt-4o-mini".into()),
            temperature: Some(0.2),
            timeout: Some(Duration::from_secs(10)),
            base_url: Some("http://localhost:8080/v1/".into()),
            ..ModelOptions::default()
        };

        let client = apply_model_options(OpenAiClient::new("sk-test", "gpt-3.5-turbo"), &model)
            .unwrap();

        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_apply_model_options_keeps_defaults() {
        let client = apply_model_options(
            OpenAiClient::new("sk-test", "gpt-3.5-turbo"),
            &ModelOptions::default(),
        )
        .unwrap();

        assert_eq!(client.model(), "gpt-3.5-turbo");
    }
}
