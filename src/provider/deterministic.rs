use super::{ModelBackend, ProviderId, ProviderRequest, ProviderRunResult};
use crate::error::CleanupError;

pub const DETERMINISTIC_SUMMARY: &str = "Returned deterministic output only (no LLM used).";

/// Echoes the deterministic pipeline output without calling a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicBackend;

impl ModelBackend for DeterministicBackend {
    fn id(&self) -> ProviderId {
        ProviderId::Deterministic
    }

    fn complete(&self, request: &ProviderRequest) -> Result<ProviderRunResult, CleanupError> {
        Ok(ProviderRunResult {
            cleaned_code: request.code.clone(),
            summary: vec![DETERMINISTIC_SUMMARY.to_string()],
            tokens: None,
            fallback_used: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echoes_code_not_prompt() {
        let request = ProviderRequest {
            provider: ProviderId::Deterministic,
            system_prompt: "system".into(),
            user_prompt: "Refactor the following component:".into(),
            code: "export const A = () => <div />;".into(),
        };
        let result = DeterministicBackend.complete(&request).unwrap();
        assert_eq!(result.cleaned_code, request.code);
        assert_eq!(result.summary, vec![DETERMINISTIC_SUMMARY.to_string()]);
        assert!(!result.fallback_used);
    }
}
