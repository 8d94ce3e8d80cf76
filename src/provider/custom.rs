//! Self-hosted refactor server: `POST {code}` answers `{refactored, summary}`
//! or `{error}`.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::http::{build_client, check_response, transport_error};
use super::{ModelBackend, ProviderId, ProviderRequest, ProviderRunResult};
use crate::config::CustomModelConfig;
use crate::error::CleanupError;

const TRAILER_MARKER: &str = "###";

#[derive(Debug, Deserialize)]
struct RefactorReply {
    refactored: Option<String>,
    #[serde(default)]
    summary: Vec<String>,
    error: Option<String>,
}

pub struct CustomModelBackend {
    client: Client,
    endpoint: String,
}

impl CustomModelBackend {
    pub fn new(config: &CustomModelConfig) -> Result<Self, CleanupError> {
        Ok(Self {
            client: build_client(ProviderId::CustomFinetuned, config.timeout_secs)?,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl ModelBackend for CustomModelBackend {
    fn id(&self) -> ProviderId {
        ProviderId::CustomFinetuned
    }

    fn complete(&self, request: &ProviderRequest) -> Result<ProviderRunResult, CleanupError> {
        let provider = ProviderId::CustomFinetuned;
        tracing::debug!(endpoint = %self.endpoint, "sending refactor request");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "code": request.code }))
            .send()
            .map_err(|error| transport_error(provider, error))?;
        let resp = check_response(provider, resp)?;

        let reply: RefactorReply = resp.json().map_err(|error| CleanupError::ProviderRequestFailed {
            provider,
            message: format!("malformed refactor response: {}", error),
        })?;

        if let Some(error) = reply.error {
            return Err(CleanupError::ProviderRequestFailed {
                provider,
                message: error,
            });
        }

        let (cleaned_code, fallback_used) = match reply.refactored {
            Some(refactored) => (strip_trailer(&refactored).to_string(), false),
            None => (request.code.clone(), true),
        };
        Ok(ProviderRunResult {
            cleaned_code,
            summary: reply.summary,
            tokens: None,
            fallback_used,
        })
    }
}

/// Drop anything the model appended after a `###` marker.
fn strip_trailer(text: &str) -> &str {
    text.split(TRAILER_MARKER).next().unwrap_or(text).trim()
}
