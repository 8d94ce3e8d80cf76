//! Source parser for component files.
//!
//! Thin wrapper over `oxc_parser` with the one grammar the cleanup pipeline
//! accepts: ES modules with JSX and TypeScript syntax. Any parser diagnostic
//! rejects the whole input; there is no recovery into a partial tree.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::ParseError;

/// Module + JSX + TypeScript. Decorators come with the TypeScript grammar.
pub fn component_source_type() -> SourceType {
    SourceType::default()
        .with_typescript(true)
        .with_module(true)
        .with_jsx(true)
}

/// Parse `source` into a program allocated in `allocator`.
pub fn parse_component<'a>(
    allocator: &'a Allocator,
    source: &'a str,
) -> Result<Program<'a>, ParseError> {
    let ret = Parser::new(allocator, source, component_source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let error = match ret.errors.first() {
            Some(diagnostic) => {
                let parse_error = ParseError::new(diagnostic.to_string());
                let offset = diagnostic
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.first())
                    .map(|label| label.offset());
                match offset {
                    Some(offset) => parse_error.at_offset(source, offset),
                    None => parse_error,
                }
            }
            None => ParseError::new("Parser aborted before producing a syntax tree"),
        };
        tracing::debug!(
            error_count = ret.errors.len(),
            message = %error.message,
            "component source rejected by parser"
        );
        return Err(error);
    }

    Ok(ret.program)
}
