//! Language-model clients for case-coach.

pub mod openai_client;

pub use openai_client::{DEFAULT_OPENAI_MODEL, DEFAULT_TEMPERATURE, OpenAiClient};
