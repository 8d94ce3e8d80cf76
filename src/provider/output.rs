//! Parsing free-form model replies into `{ cleanedCode, summary }`.

use serde_json::Value;

pub const UNPARSEABLE_SUMMARY: &str = "Model response could not be parsed. Returning raw output.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOutput {
    pub cleaned_code: String,
    pub summary: Vec<String>,
    /// Set when the reply was not usable structured output and something
    /// else (the raw text, or `input_code`) was substituted.
    pub fallback_used: bool,
}

/// Extract the JSON object spanning the first `{` to the last `}` of `text`.
///
/// No parseable object means the raw text is returned as the code. A parsed
/// object without a string `cleanedCode` falls back to `input_code`.
/// Non-string summary entries are stringified.
pub fn parse_model_output(text: &str, input_code: &str) -> ModelOutput {
    let Some(payload) = extract_payload(text) else {
        tracing::warn!(len = text.len(), "model reply has no JSON payload");
        return ModelOutput {
            cleaned_code: text.to_string(),
            summary: vec![UNPARSEABLE_SUMMARY.to_string()],
            fallback_used: true,
        };
    };

    let summary = match payload.get("summary") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    match payload.get("cleanedCode").and_then(Value::as_str) {
        Some(code) => ModelOutput {
            cleaned_code: code.to_string(),
            summary,
            fallback_used: false,
        },
        None => ModelOutput {
            cleaned_code: input_code.to_string(),
            summary,
            fallback_used: true,
        },
    }
}

fn extract_payload(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(error) => {
            tracing::debug!(%error, "model reply payload is not valid JSON");
            None
        }
    }
}
