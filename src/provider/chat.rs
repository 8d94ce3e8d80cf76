//! OpenAI-compatible chat-completions backend, used for `openai` and `groq`.

use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::http::{build_client, check_response, transport_error};
use super::{parse_model_output, ModelBackend, ProviderId, ProviderRequest, ProviderRunResult};
use crate::config::ChatProviderConfig;
use crate::error::CleanupError;

pub struct ChatCompletionsBackend {
    id: ProviderId,
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl ChatCompletionsBackend {
    pub fn new(
        id: ProviderId,
        config: &ChatProviderConfig,
        api_key: &str,
    ) -> Result<Self, CleanupError> {
        Ok(Self {
            id,
            client: build_client(id, config.timeout_secs)?,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn request_body(&self, request: &ProviderRequest) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
        })
    }
}

impl ModelBackend for ChatCompletionsBackend {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn complete(&self, request: &ProviderRequest) -> Result<ProviderRunResult, CleanupError> {
        tracing::debug!(provider = %self.id, model = %self.model, "sending chat completion");

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .map_err(|error| transport_error(self.id, error))?;
        let resp = check_response(self.id, resp)?;

        let payload: Value = resp.json().map_err(|error| CleanupError::ProviderRequestFailed {
            provider: self.id,
            message: format!("malformed completion response: {}", error),
        })?;

        let text = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CleanupError::ProviderRequestFailed {
                provider: self.id,
                message: "malformed completion response: missing choices[0].message.content"
                    .into(),
            })?;
        let tokens = payload["usage"]["total_tokens"].as_u64();

        Ok(ProviderRunResult::from_output(
            parse_model_output(text, &request.code),
            tokens,
        ))
    }
}
