//! Request-handling boundary: validate, run the deterministic pipeline, hand
//! its output to the selected model backend and assemble the response.

use serde::{Deserialize, Serialize};

use crate::config::CleanupConfig;
use crate::diagnostics::CleanupDiagnostics;
use crate::error::CleanupError;
use crate::pipeline::{run_deterministic_cleanup_with, CleanupOptions, CleanupResult};
use crate::provider::{ProviderId, ProviderRegistry, ProviderRequest, UsageCounter, UsageSnapshot};

pub const CODE_REQUIRED: &str = "Code is required for refactoring.";

pub const SYSTEM_PROMPT: &str = "\
You are an expert React UI refactor assistant. When you receive a component file:
- Clean up Tailwind utility class order (use logical grouping).
- Remove unused imports.
- Prefer functional components and concise hooks.
- Normalize inline styles into Tailwind classes when possible.
- Preserve behavior; only improve readability and consistency.
Respond with a single JSON object of the form {\"cleanedCode\": string, \"summary\": string[]}.";

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderId>,
}

impl CleanRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Decode a JSON body. A malformed body, a non-string `code` or an
    /// unknown provider is an input error.
    pub fn from_json(body: &str) -> Result<Self, CleanupError> {
        serde_json::from_str(body)
            .map_err(|error| CleanupError::InvalidInput(format!("Invalid request body: {}", error)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifacts {
    pub original: String,
    pub deterministic: String,
    pub ai_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanResponse {
    pub provider: ProviderId,
    pub diagnostics: CleanupDiagnostics,
    pub summary: Vec<String>,
    pub artifacts: Artifacts,
    pub usage: UsageSnapshot,
    pub fallback_used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    /// The deterministic result, when the failure happened after it was
    /// produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deterministic: Option<CleanupResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub body: ErrorBody,
}

impl ApiError {
    fn with_deterministic(error: &CleanupError, deterministic: CleanupResult) -> Self {
        let mut api_error = ApiError::from(error);
        api_error.body.deterministic = Some(deterministic);
        api_error
    }
}

impl From<&CleanupError> for ApiError {
    fn from(error: &CleanupError) -> Self {
        Self {
            status: error.status_code(),
            body: ErrorBody {
                error: error.to_string(),
                deterministic: None,
            },
        }
    }
}

impl From<CleanupError> for ApiError {
    fn from(error: CleanupError) -> Self {
        ApiError::from(&error)
    }
}

/// The user message: optional `File:` line, an instruction, and the code in
/// a fenced `tsx` block.
pub fn build_user_prompt(file_name: Option<&str>, code: &str) -> String {
    let mut lines = Vec::with_capacity(5);
    if let Some(name) = file_name.filter(|name| !name.is_empty()) {
        lines.push(format!("File: {}", name));
    }
    lines.push("Refactor the following component:".to_string());
    lines.push("```tsx".to_string());
    lines.push(code.to_string());
    lines.push("```".to_string());
    lines.join("\n")
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE
// ═══════════════════════════════════════════════════════════════════════════════

pub struct CleanService {
    registry: ProviderRegistry,
    usage: UsageCounter,
    options: CleanupOptions,
    default_provider: ProviderId,
}

impl CleanService {
    pub fn new(registry: ProviderRegistry, options: CleanupOptions, default_provider: ProviderId) -> Self {
        Self {
            registry,
            usage: UsageCounter::new(),
            options,
            default_provider,
        }
    }

    pub fn from_config(config: &CleanupConfig) -> Result<Self, CleanupError> {
        let options = CleanupOptions::default().with_spread_policy(config.spread_policy);
        Ok(Self::new(
            ProviderRegistry::from_config(config)?,
            options,
            config.default_provider,
        ))
    }

    pub fn usage(&self) -> &UsageCounter {
        &self.usage
    }

    pub fn handle(&self, request: &CleanRequest) -> Result<CleanResponse, ApiError> {
        if request.code.trim().is_empty() {
            return Err(CleanupError::InvalidInput(CODE_REQUIRED.to_string()).into());
        }

        let deterministic = run_deterministic_cleanup_with(&request.code, &self.options)
            .map_err(|error| {
                tracing::debug!(%error, "deterministic cleanup rejected input");
                ApiError::from(error)
            })?;

        let provider = request.provider.unwrap_or(self.default_provider);
        let provider_request = ProviderRequest {
            provider,
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(request.file_name.as_deref(), &deterministic.code),
            code: deterministic.code.clone(),
        };

        let run = match self.registry.run_model(&provider_request, &self.usage) {
            Ok(run) => run,
            Err(error) => {
                tracing::warn!(%error, %provider, "provider step failed");
                return Err(ApiError::with_deterministic(&error, deterministic));
            }
        };

        Ok(CleanResponse {
            provider,
            diagnostics: deterministic.diagnostics,
            summary: run.summary,
            artifacts: Artifacts {
                original: request.code.clone(),
                deterministic: deterministic.code,
                ai_output: run.cleaned_code,
            },
            usage: self.usage.snapshot(),
            fallback_used: run.fallback_used,
        })
    }
}
