//! `className` / `class` value normalization.
//!
//! Only statically known values are touched: a string literal, or an
//! expression container holding a string literal or a template literal with
//! no interpolations. Anything dynamic is left exactly as written.
//!
//! The default strategy is [`IdentityNormalizer`]; class-token ordering is a
//! strategy the caller plugs in.

use lazy_static::lazy_static;
use oxc_ast::ast::{JSXAttribute, JSXAttributeName, JSXAttributeValue, JSXExpression};
use regex::Regex;

pub trait ClassNormalizer {
    fn normalize(&self, value: &str) -> String;
}

impl<F> ClassNormalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, value: &str) -> String {
        self(value)
    }
}

/// Returns every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl ClassNormalizer for IdentityNormalizer {
    fn normalize(&self, value: &str) -> String {
        value.to_string()
    }
}

/// Trims the value and collapses whitespace runs to a single space. Token
/// order is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseWhitespace;

impl ClassNormalizer for CollapseWhitespace {
    fn normalize(&self, value: &str) -> String {
        lazy_static! {
            static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
        }
        WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
    }
}

pub fn is_class_attribute(attr: &JSXAttribute<'_>) -> bool {
    match &attr.name {
        JSXAttributeName::Identifier(id) => id.name == "className" || id.name == "class",
        JSXAttributeName::NamespacedName(_) => false,
    }
}

/// The statically known string behind an attribute value, if it has one of
/// the three accepted shapes.
pub fn static_class_value(value: &JSXAttributeValue<'_>) -> Option<String> {
    match value {
        JSXAttributeValue::StringLiteral(lit) => Some(lit.value.to_string()),
        JSXAttributeValue::ExpressionContainer(container) => match &container.expression {
            JSXExpression::StringLiteral(lit) => Some(lit.value.to_string()),
            JSXExpression::TemplateLiteral(template) if template.expressions.is_empty() => Some(
                template
                    .quasis
                    .iter()
                    .map(|quasi| quasi.value.cooked.as_ref().map_or("", |c| c.as_str()))
                    .collect(),
            ),
            _ => None,
        },
        _ => None,
    }
}
