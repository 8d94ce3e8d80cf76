use serde::{Deserialize, Serialize};

/// Per-run change counters.
///
/// Every counter starts at zero for a pipeline run and only ever grows while
/// the transform pass is active; nothing decrements them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupDiagnostics {
    /// Import specifiers removed because nothing referenced them.
    pub removed_imports: u32,
    /// Opening tags whose attribute order changed (once per tag).
    pub sorted_jsx_props: u32,
    /// `className`/`class` values rewritten by the normalizer.
    pub normalized_tailwind_classes: u32,
}

impl CleanupDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_removed_import(&mut self) {
        self.removed_imports += 1;
    }

    pub(crate) fn record_sorted_props(&mut self) {
        self.sorted_jsx_props += 1;
    }

    pub(crate) fn record_normalized_class(&mut self) {
        self.normalized_tailwind_classes += 1;
    }

    pub fn total(&self) -> u32 {
        self.removed_imports + self.sorted_jsx_props + self.normalized_tailwind_classes
    }

    /// True when the run changed nothing.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_wire_names() {
        let mut diagnostics = CleanupDiagnostics::new();
        diagnostics.record_removed_import();
        diagnostics.record_removed_import();
        diagnostics.record_sorted_props();

        let json = serde_json::to_value(diagnostics).unwrap();
        assert_eq!(json["removedImports"], 2);
        assert_eq!(json["sortedJsxProps"], 1);
        assert_eq!(json["normalizedTailwindClasses"], 0);
        assert_eq!(diagnostics.total(), 3);
        assert!(!diagnostics.is_clean());
    }
}
