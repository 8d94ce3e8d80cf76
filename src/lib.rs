//! # Component Cleanup Pipeline
//!
//! Deterministic cleanup for JSX/TSX component sources:
//! `source -> (code, diagnostics)`.
//!
//! ## Pipeline Invariants
//!
//! 1. **One Grammar**: sources parse as ES modules with JSX and TypeScript.
//!    Any parser diagnostic aborts the run with a `ParseError`; no partial output.
//!
//! 2. **Read-Only Resolution**: `ScopeTree::build` walks the tree once and never
//!    mutates it. Unresolved references (globals) are recorded, never an error.
//!
//! 3. **Dead Import Criterion**: an import specifier is dead exactly when its
//!    module-scope binding has zero reference sites. Side-effect imports
//!    (`import "./globals.css"`) are never touched and are emitted
//!    byte-identical to their source text.
//!
//! 4. **Single Transform Pass**: pruning, attribute ordering and class
//!    normalization run in one `VisitMut` traversal over disjoint node kinds.
//!
//! 5. **Attribute Order**: named attributes sort by lowercase name with a stable
//!    sort. Spread and namespaced attributes keep their slots. Under the default
//!    `SpreadPolicy::Barrier` no named attribute crosses a spread.
//!
//! 6. **No Shared State**: every run owns its allocator, tree, scopes and
//!    counters. The only process-wide counter (`UsageCounter`) lives in the
//!    request layer and is passed in by reference.

#[cfg(feature = "napi")]
mod native;

pub mod attributes;
pub mod class_names;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod provider;
pub mod prune;
pub mod request;
pub mod scope;
pub mod transform;

#[cfg(test)]
mod pipeline_tests;

#[cfg(feature = "napi")]
pub use native::{
    build_refactor_prompt_native, provider_ids_native, run_deterministic_cleanup_native,
};

pub use attributes::SpreadPolicy;
pub use class_names::{ClassNormalizer, CollapseWhitespace, IdentityNormalizer};
pub use config::{ChatProviderConfig, CleanupConfig, CustomModelConfig};
pub use diagnostics::CleanupDiagnostics;
pub use error::*;
pub use parse::{component_source_type, parse_component};
pub use pipeline::{
    run_deterministic_cleanup, run_deterministic_cleanup_with, CleanupOptions, CleanupResult,
    Pipeline, PipelineState,
};
pub use provider::{
    parse_model_output, DeterministicBackend, ModelBackend, ModelOutput, ProviderId,
    ProviderRegistry, ProviderRequest, ProviderRunResult, UsageCounter, UsageSnapshot,
};
#[cfg(feature = "http-providers")]
pub use provider::{ChatCompletionsBackend, CustomModelBackend};
pub use request::{
    build_user_prompt, ApiError, Artifacts, CleanRequest, CleanResponse, CleanService, ErrorBody,
    SYSTEM_PROMPT,
};
pub use scope::{Binding, BindingId, BindingKind, LexicalScopeId, ScopeTree};
