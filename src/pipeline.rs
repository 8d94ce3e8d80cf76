//! Deterministic cleanup pipeline.
//!
//! `Idle -> Parsed -> Resolved -> Transformed -> Generated`, or `Failed` from
//! any stage. Every run owns its allocator, tree, scopes and counters, and
//! drops them before returning, so a run never observes another one.

use oxc_allocator::Allocator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::attributes::SpreadPolicy;
use crate::class_names::{ClassNormalizer, IdentityNormalizer};
use crate::codegen::{generate, VerbatimImports};
use crate::diagnostics::CleanupDiagnostics;
use crate::error::CleanupError;
use crate::parse::parse_component;
use crate::scope::ScopeTree;
use crate::transform::CleanupTransformer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResult {
    pub code: String,
    pub diagnostics: CleanupDiagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Parsed,
    Resolved,
    Transformed,
    Generated,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Generated | PipelineState::Failed)
    }
}

#[derive(Clone)]
pub struct CleanupOptions {
    pub spread_policy: SpreadPolicy,
    pub normalizer: Arc<dyn ClassNormalizer + Send + Sync>,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            spread_policy: SpreadPolicy::Barrier,
            normalizer: Arc::new(IdentityNormalizer),
        }
    }
}

impl CleanupOptions {
    pub fn with_spread_policy(mut self, spread_policy: SpreadPolicy) -> Self {
        self.spread_policy = spread_policy;
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl ClassNormalizer + Send + Sync + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }
}

impl fmt::Debug for CleanupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupOptions")
            .field("spread_policy", &self.spread_policy)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Pipeline {
    options: CleanupOptions,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(options: CleanupOptions) -> Self {
        Self {
            options,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::trace!(from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
    }

    /// Run the whole pipeline over `source`.
    ///
    /// Blank input is the caller's to reject; it parses to an empty program
    /// here.
    pub fn run(&mut self, source: &str) -> Result<CleanupResult, CleanupError> {
        self.state = PipelineState::Idle;
        match self.run_stages(source) {
            Ok(result) => Ok(result),
            Err(error) => {
                self.advance(PipelineState::Failed);
                Err(error)
            }
        }
    }

    fn run_stages(&mut self, source: &str) -> Result<CleanupResult, CleanupError> {
        let allocator = Allocator::default();

        let mut program = parse_component(&allocator, source)?;
        self.advance(PipelineState::Parsed);

        let scopes = ScopeTree::build(&program);
        self.advance(PipelineState::Resolved);

        let diagnostics = CleanupTransformer::new(
            &allocator,
            &scopes,
            self.options.spread_policy,
            self.options.normalizer.as_ref(),
        )
        .run(&mut program);
        self.advance(PipelineState::Transformed);

        let verbatim = VerbatimImports::capture(&allocator, &mut program, source);
        let code = verbatim.restore(generate(&program));
        self.advance(PipelineState::Generated);

        tracing::debug!(
            removed_imports = diagnostics.removed_imports,
            sorted_jsx_props = diagnostics.sorted_jsx_props,
            normalized_tailwind_classes = diagnostics.normalized_tailwind_classes,
            verbatim_imports = verbatim.len(),
            "deterministic cleanup complete"
        );

        Ok(CleanupResult { code, diagnostics })
    }
}

/// Run the pipeline with default options.
pub fn run_deterministic_cleanup(source: &str) -> Result<CleanupResult, CleanupError> {
    Pipeline::new(CleanupOptions::default()).run(source)
}

pub fn run_deterministic_cleanup_with(
    source: &str,
    options: &CleanupOptions,
) -> Result<CleanupResult, CleanupError> {
    Pipeline::new(options.clone()).run(source)
}
