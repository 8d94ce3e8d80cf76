//! Node binding.

use napi_derive::napi;

use crate::pipeline::run_deterministic_cleanup;
use crate::provider::ProviderId;
use crate::request::{build_user_prompt, SYSTEM_PROMPT};

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// `{ code, diagnostics: { removedImports, sortedJsxProps, normalizedTailwindClasses } }`
#[napi(js_name = "runDeterministicCleanup")]
pub fn run_deterministic_cleanup_native(code: String) -> napi::Result<serde_json::Value> {
    let result = run_deterministic_cleanup(&code).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(result).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[napi(js_name = "buildRefactorPrompt")]
pub fn build_refactor_prompt_native(code: String, file_name: Option<String>) -> serde_json::Value {
    serde_json::json!({
        "systemPrompt": SYSTEM_PROMPT,
        "userPrompt": build_user_prompt(file_name.as_deref(), &code),
    })
}

#[napi(js_name = "providerIds")]
pub fn provider_ids_native() -> Vec<String> {
    ProviderId::ALL.iter().map(|id| id.to_string()).collect()
}
