//! Request and response bodies for the Responses API

use serde::{Deserialize, Serialize};

use crate::core::Fortune;
use crate::error::FetchError;

const SYSTEM_INSTRUCTION: &str = "You are a fortune cookie generator.";
const MAX_OUTPUT_TOKENS: u32 = 60;
const TEMPERATURE: f64 = 0.9;

#[derive(Debug, Serialize)]
pub(super) struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateRequest<'a> {
    model: &'a str,
    input: [Message<'a>; 2],
    max_output_tokens: u32,
    temperature: f64,
}

impl<'a> GenerateRequest<'a> {
    pub(super) fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            input: [
                Message {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    output_text: Option<String>,
}

impl GenerateResponse {
    /// First content entry of the first output item, else the flat field
    fn text(&self) -> &str {
        if let Some(part) = self.output.first().and_then(|item| item.content.first()) {
            return &part.text;
        }
        self.output_text.as_deref().unwrap_or_default()
    }
}

/// Parse a successful response body into a fortune
pub(super) fn parse_fortune(body: &str) -> Result<Fortune, FetchError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    Fortune::generated(response.text()).ok_or(FetchError::EmptyResponse)
}
