//! Text-generation client
//!
//! `FortuneSource` is the seam the orchestrator depends on; `OpenAiClient`
//! is the production implementation over the Responses API.

mod openai;
mod wire;

pub(crate) use openai::OpenAiClient;

use crate::core::Fortune;
use crate::error::FetchError;

/// Produces one fortune per call
pub(crate) trait FortuneSource {
    fn generate(&self, prompt: &str, api_key: &str, model: &str) -> Result<Fortune, FetchError>;
}
