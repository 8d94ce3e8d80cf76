//! Layered configuration.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. `CODE_CLEANUP_*` environment variables, `__` separating sections
//!    (`CODE_CLEANUP_GROQ__MODEL`)
//! 3. The conventional raw keys `OPENAI_API_KEY`, `GROQ_API_KEY` and
//!    `CUSTOM_MODEL_URL`

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::attributes::SpreadPolicy;
use crate::error::CleanupError;
use crate::provider::ProviderId;

pub const ENV_PREFIX: &str = "CODE_CLEANUP_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatProviderConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl ChatProviderConfig {
    fn openai() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.1,
            timeout_secs: 60,
        }
    }

    fn groq() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.groq.com/openai/v1/chat/completions".into(),
            model: "llama3-70b-8192".into(),
            temperature: 0.2,
            timeout_secs: 60,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomModelConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for CustomModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/refactor".into(),
            timeout_secs: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupConfig {
    pub default_provider: ProviderId,
    pub spread_policy: SpreadPolicy,
    pub openai: ChatProviderConfig,
    pub groq: ChatProviderConfig,
    pub custom: CustomModelConfig,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderId::OpenAi,
            spread_policy: SpreadPolicy::Barrier,
            openai: ChatProviderConfig::openai(),
            groq: ChatProviderConfig::groq(),
            custom: CustomModelConfig::default(),
        }
    }
}

impl CleanupConfig {
    pub fn load() -> Result<Self, CleanupError> {
        Self::figment().extract().map_err(CleanupError::from)
    }

    /// The provider chain, public so callers can merge their own layers on top.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "openai.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&["GROQ_API_KEY"])
                    .map(|_| "groq.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&["CUSTOM_MODEL_URL"])
                    .map(|_| "custom.endpoint".into()),
            )
    }
}
