//! The single combined cleanup traversal.
//!
//! Import pruning runs at the program node, attribute canonicalization at
//! each opening element, and class normalization at each attribute. The
//! three touch disjoint node kinds, so their relative order inside the walk
//! does not affect the result.

use oxc_allocator::Allocator;
use oxc_ast::ast::{JSXAttribute, JSXAttributeValue, JSXOpeningElement, Program};
use oxc_ast::AstBuilder;
use oxc_ast_visit::{walk_mut, VisitMut};
use oxc_span::GetSpan;

use crate::attributes::{canonicalize_attributes, SpreadPolicy};
use crate::class_names::{is_class_attribute, static_class_value, ClassNormalizer};
use crate::diagnostics::CleanupDiagnostics;
use crate::prune::prune_unused_imports;
use crate::scope::ScopeTree;

pub struct CleanupTransformer<'a, 's> {
    ast: AstBuilder<'a>,
    scopes: &'s ScopeTree,
    spread_policy: SpreadPolicy,
    normalizer: &'s dyn ClassNormalizer,
    pub diagnostics: CleanupDiagnostics,
}

impl<'a, 's> CleanupTransformer<'a, 's> {
    pub fn new(
        allocator: &'a Allocator,
        scopes: &'s ScopeTree,
        spread_policy: SpreadPolicy,
        normalizer: &'s dyn ClassNormalizer,
    ) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            scopes,
            spread_policy,
            normalizer,
            diagnostics: CleanupDiagnostics::new(),
        }
    }

    /// Run the pass over `program` and hand back the counters.
    pub fn run(mut self, program: &mut Program<'a>) -> CleanupDiagnostics {
        self.visit_program(program);
        self.diagnostics
    }

    fn normalize_class_attribute(&mut self, attr: &mut JSXAttribute<'a>) {
        if !is_class_attribute(attr) {
            return;
        }
        let Some(value) = &attr.value else {
            return;
        };
        let Some(original) = static_class_value(value) else {
            return;
        };

        let normalized = self.normalizer.normalize(&original);
        if normalized == original {
            return;
        }

        tracing::debug!(from = %original, to = %normalized, "normalized class value");
        let span = value.span();
        let atom = self.ast.allocator.alloc_str(&normalized);
        attr.value = Some(JSXAttributeValue::StringLiteral(
            self.ast.alloc_string_literal(span, atom, None),
        ));
        self.diagnostics.record_normalized_class();
    }
}

impl<'a, 's> VisitMut<'a> for CleanupTransformer<'a, 's> {
    fn visit_program(&mut self, program: &mut Program<'a>) {
        prune_unused_imports(&mut program.body, self.scopes, &mut self.diagnostics);
        walk_mut::walk_program(self, program);
    }

    fn visit_jsx_opening_element(&mut self, element: &mut JSXOpeningElement<'a>) {
        if canonicalize_attributes(&mut element.attributes, self.spread_policy) {
            self.diagnostics.record_sorted_props();
        }
        walk_mut::walk_jsx_opening_element(self, element);
    }

    fn visit_jsx_attribute(&mut self, attr: &mut JSXAttribute<'a>) {
        self.normalize_class_attribute(attr);
        walk_mut::walk_jsx_attribute(self, attr);
    }
}
