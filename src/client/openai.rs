use std::time::Duration;

use tracing::debug;

use crate::core::Fortune;
use crate::error::FetchError;

use super::FortuneSource;
use super::wire::{GenerateRequest, parse_fortune};

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking client for the OpenAI Responses API
pub(crate) struct OpenAiClient {
    endpoint: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub(crate) fn new() -> Self {
        Self::with_endpoint(RESPONSES_URL, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    fn agent(&self) -> ureq::Agent {
        ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build()
            .into()
    }

    fn map_transport(&self, err: ureq::Error) -> FetchError {
        match err {
            ureq::Error::Timeout(_) => FetchError::Timeout(self.timeout.as_secs()),
            other => FetchError::Network(other.to_string()),
        }
    }
}

impl FortuneSource for OpenAiClient {
    fn generate(&self, prompt: &str, api_key: &str, model: &str) -> Result<Fortune, FetchError> {
        if api_key.trim().is_empty() {
            return Err(FetchError::NoKey);
        }

        debug!("POST {} (model {model})", self.endpoint);
        let response = self
            .agent()
            .post(self.endpoint.as_str())
            .header("Authorization", format!("Bearer {api_key}"))
            .send_json(GenerateRequest::new(model, prompt))
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
                body,
            });
        }

        parse_fortune(&body)
    }
}
