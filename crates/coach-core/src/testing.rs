//! Test doubles for the completion capability.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::completion::{CompletionClient, CompletionError};

/// A completion client that replays canned results and records every prompt.
///
/// Once the queue is empty it answers `completion #<n>`, where `n` is the
/// 1-based call number, so long loops need no setup.
#[derive(Default)]
pub struct RecordingClient {
    responses: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_error(&self, error: CompletionError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }
}

#[async_trait]
impl CompletionClient for RecordingClient {
    fn model_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let call = {
            let mut prompts = lock(&self.prompts);
            prompts.push(prompt.to_string());
            prompts.len()
        };
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Ok(format!("completion #{call}")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
