//! Dead import removal.
//!
//! A specifier is dead when its module-scope binding has no reference sites.
//! Statements are removed only when pruning emptied them: side-effect imports
//! (`import "./globals.css"`) and `import {} from "x"` are never touched.

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::{ImportDeclaration, ImportDeclarationSpecifier, Statement};

use crate::diagnostics::CleanupDiagnostics;
use crate::scope::ScopeTree;

pub fn local_name<'s>(specifier: &'s ImportDeclarationSpecifier<'_>) -> &'s str {
    match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(s) => s.local.name.as_str(),
        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => s.local.name.as_str(),
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => s.local.name.as_str(),
    }
}

fn is_live(scopes: &ScopeTree, name: &str) -> bool {
    scopes
        .module_binding(name)
        .map(|binding| binding.is_referenced())
        .unwrap_or(false)
}

/// Remove unreferenced specifiers from the top-level import statements of
/// `body`, in source order, then drop any statement left without specifiers.
pub fn prune_unused_imports<'a>(
    body: &mut ArenaVec<'a, Statement<'a>>,
    scopes: &ScopeTree,
    diagnostics: &mut CleanupDiagnostics,
) {
    let mut keep = Vec::with_capacity(body.len());

    for stmt in body.iter_mut() {
        let Statement::ImportDeclaration(decl) = stmt else {
            keep.push(true);
            continue;
        };
        let decl: &mut ImportDeclaration<'a> = decl;
        let source = decl.source.value.as_str();
        let Some(specifiers) = decl.specifiers.as_mut() else {
            keep.push(true);
            continue;
        };
        if specifiers.is_empty() {
            keep.push(true);
            continue;
        }

        specifiers.retain(|specifier| {
            let name = local_name(specifier);
            let live = is_live(scopes, name);
            if !live {
                tracing::debug!(specifier = name, source, "removing unused import");
                diagnostics.record_removed_import();
            }
            live
        });

        keep.push(!specifiers.is_empty());
    }

    if keep.iter().all(|k| *k) {
        return;
    }

    let mut index = 0;
    body.retain(|_| {
        let retained = keep[index];
        index += 1;
        retained
    });
}
