//! End-to-end tests for the deterministic cleanup pipeline.

#[cfg(test)]
mod tests {
    use crate::attributes::SpreadPolicy;
    use crate::class_names::CollapseWhitespace;
    use crate::diagnostics::CleanupDiagnostics;
    use crate::error::CleanupError;
    use crate::parse::parse_component;
    use crate::pipeline::{
        run_deterministic_cleanup, run_deterministic_cleanup_with, CleanupOptions, Pipeline,
        PipelineState,
    };
    use oxc_allocator::Allocator;
    use pretty_assertions::assert_eq;

    const CARD: &str = r#"import React, { useState, useEffect, useMemo } from "react";
import * as Icons from "lucide-react";
import type { CardProps } from "./types";
import "./globals.css";

export default function Card({ title, onSelect }: CardProps) {
    const [open, setOpen] = useState(false);
    return (
        <section role="region" className="p-4 flex" aria-label={title}>
            <button type="button" onClick={() => setOpen(!open)} disabled={!onSelect}>
                <Icons.Chevron size={16} />
            </button>
        </section>
    );
}
"#;

    fn position(code: &str, needle: &str) -> usize {
        code.find(needle)
            .unwrap_or_else(|| panic!("`{}` not found in:\n{}", needle, code))
    }

    fn reparses(code: &str) -> bool {
        let allocator = Allocator::default();
        parse_component(&allocator, code).is_ok()
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // IMPORTS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_unreferenced_specifiers_are_removed() {
        let result = run_deterministic_cleanup(CARD).unwrap();

        assert!(!result.code.contains("useEffect"));
        assert!(!result.code.contains("useMemo"));
        assert!(!result.code.contains("React"));
        assert!(result.code.contains("useState"));
        assert!(result.code.contains("* as Icons"));
        assert!(result.code.contains("CardProps"));
        assert_eq!(result.diagnostics.removed_imports, 3);
    }

    #[test]
    fn test_statement_removed_when_emptied() {
        let source = r#"
import { a, b } from "./unused";
import { c } from "./used";
export const value = c;
"#;
        let result = run_deterministic_cleanup(source).unwrap();
        assert!(!result.code.contains("./unused"));
        assert!(result.code.contains("./used"));
        assert_eq!(result.diagnostics.removed_imports, 2);
    }

    #[test]
    fn test_side_effect_import_is_preserved() {
        let source = r#"import "./globals.css";
import { unused } from "./lib";
export const A = () => <div />;
"#;
        let result = run_deterministic_cleanup(source).unwrap();
        assert!(result.code.contains(r#"import "./globals.css";"#));
        assert!(!result.code.contains("./lib"));
    }

    #[test]
    fn test_side_effect_imports_are_byte_identical() {
        let statements = [
            "import './globals.css';",
            r#"import   "./reset.css"  ;"#,
            r#"import "./theme.css" with { type: "css" };"#,
            "import {} from './polyfill';",
        ];
        let source = format!(
            "{}\nimport {{ unused }} from './lib';\nexport const A = () => <div b=\"1\" a=\"2\" />;\n",
            statements.join("\n")
        );
        let result = run_deterministic_cleanup(&source).unwrap();

        for statement in statements {
            assert!(
                result.code.contains(statement),
                "`{}` not kept verbatim in:\n{}",
                statement,
                result.code
            );
        }
        assert!(!result.code.contains("./lib"));
        assert_eq!(result.diagnostics.removed_imports, 1);
        assert_eq!(result.diagnostics.sorted_jsx_props, 1);

        let second = run_deterministic_cleanup(&result.code).unwrap();
        assert_eq!(second.code, result.code);
        assert_eq!(second.diagnostics, CleanupDiagnostics::default());
    }

    #[test]
    fn test_empty_named_import_is_preserved() {
        let result = run_deterministic_cleanup(r#"import {} from "./polyfill";"#).unwrap();
        assert!(result.code.contains(r#"import {} from "./polyfill";"#));
        assert_eq!(result.diagnostics.removed_imports, 0);
    }

    #[test]
    fn test_shadowed_import_is_dead() {
        let source = r#"
import { value } from "./value";
export function read(value: number) {
    return value * 2;
}
"#;
        let result = run_deterministic_cleanup(source).unwrap();
        assert!(!result.code.contains("./value"));
        assert_eq!(result.diagnostics.removed_imports, 1);
    }

    #[test]
    fn test_reexports_are_untouched() {
        let source = r#"
export { Button } from "./Button";
export * from "./icons";
import { Card } from "./Card";
export { Card };
"#;
        let result = run_deterministic_cleanup(source).unwrap();
        assert!(result.code.contains("./Button"));
        assert!(result.code.contains("./icons"));
        assert!(result.code.contains("./Card"));
        assert!(result.diagnostics.is_clean());
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ATTRIBUTES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_spread_is_an_ordering_barrier() {
        let source = r#"export const A = (rest) => <input b="1" a="2" {...rest} c="3" />;"#;
        let result = run_deterministic_cleanup(source).unwrap();

        let a = position(&result.code, r#"a="2""#);
        let b = position(&result.code, r#"b="1""#);
        let spread = position(&result.code, "...rest");
        let c = position(&result.code, r#"c="3""#);
        assert!(a < b && b < spread && spread < c);
        assert_eq!(result.diagnostics.sorted_jsx_props, 1);
    }

    #[test]
    fn test_unrestricted_policy_sorts_across_spreads() {
        let source = r#"export const A = (rest) => <input c="3" {...rest} a="1" />;"#;
        let options = CleanupOptions::default().with_spread_policy(SpreadPolicy::Unrestricted);
        let result = run_deterministic_cleanup_with(source, &options).unwrap();

        let a = position(&result.code, r#"a="1""#);
        let spread = position(&result.code, "...rest");
        let c = position(&result.code, r#"c="3""#);
        assert!(a < spread && spread < c);
        assert_eq!(result.diagnostics.sorted_jsx_props, 1);

        let barrier = run_deterministic_cleanup(source).unwrap();
        assert_eq!(barrier.diagnostics.sorted_jsx_props, 0);
    }

    #[test]
    fn test_sorted_props_counted_once_per_tag() {
        let result = run_deterministic_cleanup(CARD).unwrap();
        // <section> and <button> move, <Icons.Chevron> has a single attribute.
        assert_eq!(result.diagnostics.sorted_jsx_props, 2);

        let code = &result.code;
        assert!(position(code, "aria-label") < position(code, "className"));
        assert!(position(code, "className") < position(code, "role"));
        assert!(position(code, "disabled") < position(code, "onClick"));
        assert!(position(code, "onClick") < position(code, r#"type="button""#));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // CLASS NAMES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_identity_normalizer_changes_nothing() {
        let source = r#"
export const A = () => <div className="p-2   flex" />;
export const B = () => <div className={`p-2   flex`} />;
"#;
        let result = run_deterministic_cleanup(source).unwrap();
        assert_eq!(result.diagnostics.normalized_tailwind_classes, 0);
        assert!(result.code.contains("`p-2   flex`"));
    }

    #[test]
    fn test_class_value_shape_gating() {
        let source = r#"
export const A = () => <div className="p-2   flex" />;
export const B = () => <div className={"p-2   flex"} />;
export const C = () => <div className={`p-2   flex`} />;
export const D = ({ isActive }) => <div className={isActive ? "a   b" : "b"} />;
export const E = () => <div class="m-1  " />;
"#;
        let options = CleanupOptions::default().with_normalizer(CollapseWhitespace);
        let result = run_deterministic_cleanup_with(source, &options).unwrap();

        assert_eq!(result.diagnostics.normalized_tailwind_classes, 4);
        assert!(!result.code.contains('`'));
        assert!(result.code.contains(r#""a   b""#));
        assert!(result.code.contains(r#""m-1""#));
        assert_eq!(result.code.matches(r#""p-2 flex""#).count(), 3);
    }

    #[test]
    fn test_closure_normalizer() {
        let options = CleanupOptions::default().with_normalizer(|value: &str| {
            let mut tokens: Vec<&str> = value.split_whitespace().collect();
            tokens.sort_unstable();
            tokens.join(" ")
        });
        let result = run_deterministic_cleanup_with(
            r#"export const A = () => <div className="p-2 flex bg-white" />;"#,
            &options,
        )
        .unwrap();
        assert!(result.code.contains(r#""bg-white flex p-2""#));
        assert_eq!(result.diagnostics.normalized_tailwind_classes, 1);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // PIPELINE PROPERTIES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_second_pass_is_a_no_op() {
        let first = run_deterministic_cleanup(CARD).unwrap();
        let second = run_deterministic_cleanup(&first.code).unwrap();

        assert_eq!(second.diagnostics, CleanupDiagnostics::default());
        assert_eq!(second.code, first.code);
    }

    #[test]
    fn test_output_reparses() {
        let sources = [
            CARD,
            r#"@Component() export class Widget { render() { return <div {...this.props} />; } }"#,
            r#"export const List = ({ items }: { items: string[] }) => <ul>{items.map((i) => <li key={i}>{i}</li>)}</ul>;"#,
            "",
        ];
        for source in sources {
            let result = run_deterministic_cleanup(source).unwrap();
            assert!(reparses(&result.code), "output does not reparse:\n{}", result.code);
        }
    }

    #[test]
    fn test_identical_input_identical_output() {
        let a = run_deterministic_cleanup(CARD).unwrap();
        let b = run_deterministic_cleanup(CARD).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_input_fails() {
        let mut pipeline = Pipeline::new(CleanupOptions::default());
        let err = pipeline
            .run("export const A = () => <div className=\"x\"")
            .unwrap_err();

        assert!(matches!(err, CleanupError::Parse(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_state_machine_resets_per_run() {
        let mut pipeline = Pipeline::new(CleanupOptions::default());
        assert_eq!(pipeline.state(), PipelineState::Idle);

        assert!(pipeline.run("const a = ;").is_err());
        assert_eq!(pipeline.state(), PipelineState::Failed);

        let result = pipeline.run(CARD).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Generated);
        assert!(pipeline.state().is_terminal());
        assert_eq!(result.diagnostics.removed_imports, 3);
    }
}
