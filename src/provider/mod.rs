//! Language-model backend boundary.
//!
//! The cleanup pipeline never depends on anything in here. A backend gets
//! the deterministic output wrapped in a prompt and hands back opaque text,
//! which is parsed into `{ cleanedCode, summary }` and displayed as is.

mod deterministic;
mod output;
mod usage;

#[cfg(feature = "http-providers")]
mod chat;
#[cfg(feature = "http-providers")]
mod custom;
#[cfg(feature = "http-providers")]
mod http;

pub use deterministic::{DeterministicBackend, DETERMINISTIC_SUMMARY};
pub use output::{parse_model_output, ModelOutput, UNPARSEABLE_SUMMARY};
pub use usage::{UsageCounter, UsageSnapshot};

#[cfg(feature = "http-providers")]
pub use chat::ChatCompletionsBackend;
#[cfg(feature = "http-providers")]
pub use custom::CustomModelBackend;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::CleanupConfig;
use crate::error::CleanupError;

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER IDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "custom-finetuned")]
    CustomFinetuned,
    #[serde(rename = "deterministic")]
    Deterministic,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAi,
        ProviderId::Groq,
        ProviderId::CustomFinetuned,
        ProviderId::Deterministic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Groq => "groq",
            ProviderId::CustomFinetuned => "custom-finetuned",
            ProviderId::Deterministic => "deterministic",
        }
    }

    /// The setting that has to be present for this backend to be registered.
    pub fn credential_key(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "OPENAI_API_KEY",
            ProviderId::Groq => "GROQ_API_KEY",
            ProviderId::CustomFinetuned => "CUSTOM_MODEL_URL",
            ProviderId::Deterministic => "deterministic backend",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = CleanupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CleanupError::InvalidInput(format!("Unsupported provider: {}", s)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REQUESTS AND BACKENDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub provider: ProviderId,
    pub system_prompt: String,
    pub user_prompt: String,
    /// The deterministic output the prompt was built from. Backends fall back
    /// to it when a reply carries no usable code.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRunResult {
    pub cleaned_code: String,
    pub summary: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    pub fallback_used: bool,
}

impl ProviderRunResult {
    pub(crate) fn from_output(output: ModelOutput, tokens: Option<u64>) -> Self {
        Self {
            cleaned_code: output.cleaned_code,
            summary: output.summary,
            tokens,
            fallback_used: output.fallback_used,
        }
    }
}

pub trait ModelBackend: Send + Sync {
    fn id(&self) -> ProviderId;

    fn complete(&self, request: &ProviderRequest) -> Result<ProviderRunResult, CleanupError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ProviderRegistry {
    backends: BTreeMap<ProviderId, Box<dyn ModelBackend>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(DeterministicBackend);
        registry
    }
}

impl ProviderRegistry {
    /// A registry with nothing registered, not even the deterministic backend.
    pub fn empty() -> Self {
        Self {
            backends: BTreeMap::new(),
        }
    }

    /// Register every backend the configuration has settings for. The
    /// deterministic backend is always present.
    pub fn from_config(config: &CleanupConfig) -> Result<Self, CleanupError> {
        #[allow(unused_mut)]
        let mut registry = Self::default();

        #[cfg(feature = "http-providers")]
        {
            if let Some(api_key) = config.openai.api_key.as_deref().filter(|key| !key.is_empty()) {
                registry.register(ChatCompletionsBackend::new(
                    ProviderId::OpenAi,
                    &config.openai,
                    api_key,
                )?);
            }
            if let Some(api_key) = config.groq.api_key.as_deref().filter(|key| !key.is_empty()) {
                registry.register(ChatCompletionsBackend::new(
                    ProviderId::Groq,
                    &config.groq,
                    api_key,
                )?);
            }
            registry.register(CustomModelBackend::new(&config.custom)?);
        }

        #[cfg(not(feature = "http-providers"))]
        if config.openai.is_configured() || config.groq.is_configured() {
            tracing::debug!("http-providers feature disabled; remote backends not registered");
        }

        Ok(registry)
    }

    pub fn register(&mut self, backend: impl ModelBackend + 'static) {
        self.backends.insert(backend.id(), Box::new(backend));
    }

    pub fn is_registered(&self, provider: ProviderId) -> bool {
        self.backends.contains_key(&provider)
    }

    pub fn registered(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.backends.keys().copied()
    }

    /// Dispatch `request` to its backend. `usage` is bumped only when the
    /// backend completes.
    pub fn run_model(
        &self,
        request: &ProviderRequest,
        usage: &UsageCounter,
    ) -> Result<ProviderRunResult, CleanupError> {
        let backend = self.backends.get(&request.provider).ok_or_else(|| {
            CleanupError::ProviderUnavailable {
                provider: request.provider,
                reason: format!("{} is not configured.", request.provider.credential_key()),
            }
        })?;

        let result = backend.complete(request)?;
        usage.record(request.provider);

        if result.fallback_used {
            tracing::warn!(provider = %request.provider, "model reply fell back to unstructured output");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FailingBackend;

    impl ModelBackend for FailingBackend {
        fn id(&self) -> ProviderId {
            ProviderId::Groq
        }

        fn complete(&self, _request: &ProviderRequest) -> Result<ProviderRunResult, CleanupError> {
            Err(CleanupError::ProviderRequestFailed {
                provider: ProviderId::Groq,
                message: "502 Bad Gateway".into(),
            })
        }
    }

    fn request(provider: ProviderId) -> ProviderRequest {
        ProviderRequest {
            provider,
            system_prompt: "system".into(),
            user_prompt: "user".into(),
            code: "const a = 1;".into(),
        }
    }

    #[test]
    fn test_provider_id_round_trips_through_strings() {
        for id in ProviderId::ALL {
            assert_eq!(id.as_str().parse::<ProviderId>().unwrap(), id);
            assert_eq!(
                serde_json::to_string(&id).unwrap(),
                format!("\"{}\"", id.as_str())
            );
        }
        assert!("anthropic".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_missing_backend_is_unavailable() {
        let registry = ProviderRegistry::default();
        let usage = UsageCounter::new();
        let err = registry
            .run_model(&request(ProviderId::OpenAi), &usage)
            .unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY is not configured.");
        assert_eq!(err.status_code(), 500);
        assert_eq!(usage.get(ProviderId::OpenAi), 0);
    }

    #[test]
    fn test_usage_counts_only_completed_calls() {
        let mut registry = ProviderRegistry::default();
        registry.register(FailingBackend);
        let usage = UsageCounter::new();

        registry
            .run_model(&request(ProviderId::Deterministic), &usage)
            .unwrap();
        registry
            .run_model(&request(ProviderId::Deterministic), &usage)
            .unwrap();
        assert!(registry
            .run_model(&request(ProviderId::Groq), &usage)
            .is_err());

        assert_eq!(usage.get(ProviderId::Deterministic), 2);
        assert_eq!(usage.get(ProviderId::Groq), 0);
    }

    #[test]
    fn test_default_registry_has_only_deterministic() {
        let registry = ProviderRegistry::default();
        assert_eq!(
            registry.registered().collect::<Vec<_>>(),
            vec![ProviderId::Deterministic]
        );
        assert!(!ProviderRegistry::empty().is_registered(ProviderId::Deterministic));
    }
}
