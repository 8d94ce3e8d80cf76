//! Code generation for the cleaned program.
//!
//! `oxc_codegen` prints every node from the tree, so untouched subtrees
//! re-parse to the same structure. Whitespace and quote style are the
//! printer's, and it keeps comments; original line numbers are not retained.
//!
//! Side-effect imports are the exception: they come out byte-identical to
//! the input. [`VerbatimImports`] swaps each one's specifier for a unique
//! marker before printing and splices the original statement text back over
//! the printed one afterwards.

use oxc_allocator::Allocator;
use oxc_ast::ast::{Program, Statement};
use oxc_codegen::Codegen;

pub fn generate(program: &Program<'_>) -> String {
    Codegen::new().build(program).code
}

const MARKER_PREFIX: &str = "__cleanup_verbatim_import_";

struct VerbatimImport {
    marker: String,
    original: String,
}

/// Original text of every specifier-less import in a program.
pub struct VerbatimImports {
    imports: Vec<VerbatimImport>,
}

impl VerbatimImports {
    /// Record the source text of each `import "x"` / `import {} from "x"` in
    /// `program.body` and replace its specifier with a marker. `source` must
    /// be the text `program` was parsed from.
    pub fn capture<'a>(allocator: &'a Allocator, program: &mut Program<'a>, source: &str) -> Self {
        let mut salt = String::new();
        while source.contains(&format!("{}{}", MARKER_PREFIX, salt)) {
            salt.push('x');
        }

        let mut imports = Vec::new();
        for stmt in program.body.iter_mut() {
            let Statement::ImportDeclaration(decl) = stmt else {
                continue;
            };
            if !decl.specifiers.as_ref().map_or(true, |s| s.is_empty()) {
                continue;
            }
            let Some(original) = source.get(decl.span.start as usize..decl.span.end as usize)
            else {
                continue;
            };

            let marker = format!("{}{}{}__", MARKER_PREFIX, salt, imports.len());
            decl.source.value = allocator.alloc_str(&marker).into();
            decl.source.raw = None;
            decl.with_clause = None;
            imports.push(VerbatimImport {
                marker,
                original: original.to_string(),
            });
        }

        Self { imports }
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Replace each printed marker statement in `code` with its original
    /// text. A statement written without a semicolon gets one appended.
    pub fn restore(&self, mut code: String) -> String {
        for import in &self.imports {
            let Some(range) = printed_statement(&code, &import.marker) else {
                tracing::warn!(marker = %import.marker, "printed side-effect import not found");
                continue;
            };
            let mut original = import.original.clone();
            if !original.trim_end().ends_with(';') {
                original.push(';');
            }
            code.replace_range(range, &original);
        }
        code
    }
}

/// Byte range of `import ... "<marker>";` in printed code.
fn printed_statement(code: &str, marker: &str) -> Option<std::ops::Range<usize>> {
    let at = code.find(marker)?;
    let start = code[..at].rfind("import")?;
    let end = at + code[at..].find(';')? + 1;
    Some(start..end)
}
