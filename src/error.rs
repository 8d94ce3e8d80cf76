use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::provider::ProviderId;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_INVALID_INPUT: &str = "CLEAN-ERR-INPUT";
pub const ERR_PARSE: &str = "CLEAN-ERR-PARSE";
pub const ERR_PROVIDER_UNAVAILABLE: &str = "CLEAN-ERR-PROVIDER-UNAVAILABLE";
pub const ERR_PROVIDER_QUOTA: &str = "CLEAN-ERR-PROVIDER-QUOTA";
pub const ERR_PROVIDER_REQUEST: &str = "CLEAN-ERR-PROVIDER-REQUEST";
pub const ERR_CONFIG: &str = "CLEAN-ERR-CONFIG";

// ═══════════════════════════════════════════════════════════════════════════════
// PARSE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// A grammar rejection of the input source.
///
/// `line` and `column` are 1-based and only present when the parser
/// attached a location to its first diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub message: String,
    pub offset: Option<u32>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: None,
            line: None,
            column: None,
        }
    }

    /// Attach a byte offset into `source`, deriving line and column from it.
    pub fn at_offset(mut self, source: &str, offset: usize) -> Self {
        let (line, column) = line_column(source, offset);
        self.offset = Some(offset as u32);
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "Parse error at {}:{}: {}", line, column, self.message)
            }
            _ => write!(f, "Parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let mut clamped = offset.min(source.len());
    while !source.is_char_boundary(clamped) {
        clamped -= 1;
    }
    let before = &source[..clamped];
    let line = before.matches('\n').count() as u32 + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() as u32 + 1;
    (line, column)
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLEANUP ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum CleanupError {
    /// Empty or non-string input, rejected before parsing.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Missing credentials or configuration for the selected backend.
    #[error("{reason}")]
    ProviderUnavailable { provider: ProviderId, reason: String },

    /// Upstream billing or rate-limit signal.
    #[error("{provider} quota exceeded: {message}")]
    ProviderQuotaExceeded { provider: ProviderId, message: String },

    /// Non-2xx or malformed reply from a backend.
    #[error("{provider} request failed: {message}")]
    ProviderRequestFailed { provider: ProviderId, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl CleanupError {
    pub fn code(&self) -> &'static str {
        match self {
            CleanupError::InvalidInput(_) => ERR_INVALID_INPUT,
            CleanupError::Parse(_) => ERR_PARSE,
            CleanupError::ProviderUnavailable { .. } => ERR_PROVIDER_UNAVAILABLE,
            CleanupError::ProviderQuotaExceeded { .. } => ERR_PROVIDER_QUOTA,
            CleanupError::ProviderRequestFailed { .. } => ERR_PROVIDER_REQUEST,
            CleanupError::Config(_) => ERR_CONFIG,
        }
    }

    /// Status the request layer answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            CleanupError::InvalidInput(_) | CleanupError::Parse(_) => 400,
            CleanupError::ProviderQuotaExceeded { .. } => 429,
            CleanupError::ProviderUnavailable { .. }
            | CleanupError::ProviderRequestFailed { .. }
            | CleanupError::Config(_) => 500,
        }
    }

    /// Deterministic, function-of-input failures. Never worth retrying.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CleanupError::InvalidInput(_) | CleanupError::Parse(_))
    }
}
