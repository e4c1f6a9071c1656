// SPDX-License-Identifier: GPL-3.0-only

//! Validation of layout grid and space-span invariants.
//!
//! The space collapse constants are load-bearing for remote navigation: every
//! grid cell must map to exactly one logical key, and logical indices must be
//! contiguous after collapsing the space span. Violations that would break the
//! hit-test mapping are errors; mismatches a layout can survive (for example a
//! popup layout that never uses the grid) are warnings.

use crate::layout::types::{Severity, ValidationIssue};
use crate::layout::Layout;

/// Checks a flattened layout against the grid and space invariants.
///
/// Returns every issue found; callers decide whether warnings are acceptable.
pub fn validate_layout(layout: &Layout) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (grid, path) in [(layout.abc_grid, "abc_grid"), (layout.num_grid, "num_grid")] {
        if grid.rows == 0 || grid.cols == 0 {
            issues.push(ValidationIssue::new(
                Severity::Error,
                format!("Grid dimensions must be positive, got {}x{}", grid.rows, grid.cols),
                path,
            ));
        }
    }

    let space = layout.space;
    if space.span == 0 {
        issues.push(
            ValidationIssue::new(Severity::Error, "Space span must be at least 1", "space.span")
                .with_suggestion("Use span 1 for layouts without a wide space key"),
        );
    }

    let cols = layout.abc_grid.cols;
    if space.span > 0 && cols > 0 {
        if space.index % cols + space.span > cols {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    format!(
                        "Space span of {} starting at index {} straddles a row boundary",
                        space.span, space.index
                    ),
                    "space",
                )
                .with_suggestion("The whole span must fit within one grid row"),
            );
        }

        if space.index + space.span > layout.abc_grid.cells() {
            issues.push(ValidationIssue::new(
                Severity::Error,
                format!(
                    "Space span of {} starting at index {} exceeds the {}-cell grid",
                    space.span,
                    space.index,
                    layout.abc_grid.cells()
                ),
                "space",
            ));
        }

        // Dense-index invariant: grid cells minus the extra space cells must
        // equal the logical key count, or hit testing will return stale
        // indices. Popup layouts never consult the grid, so this is a warning.
        let expected = layout.abc_grid.cells().saturating_sub(space.span - 1);
        if !layout.keys.is_empty() && layout.keys.len() != expected {
            issues.push(
                ValidationIssue::new(
                    Severity::Warning,
                    format!(
                        "Layout has {} keys but the grid maps {} logical indices",
                        layout.keys.len(),
                        expected
                    ),
                    "rows",
                )
                .with_suggestion("Check the grid dimensions and the space span"),
            );
        }
    }

    for (i, key) in layout.keys.iter().enumerate() {
        if key.width <= 0.0 || key.height <= 0.0 {
            issues.push(ValidationIssue::new(
                Severity::Error,
                format!("Key size must be positive, got {}x{}", key.width, key.height),
                format!("keys[{}]", i),
            ));
        }

        if let Some(label) = &key.label {
            if label.contains('|') {
                let halves: Vec<&str> = label.split('|').collect();
                if halves.len() != 2 || halves.iter().any(|half| half.is_empty()) {
                    issues.push(
                        ValidationIssue::new(
                            Severity::Warning,
                            format!("Dual label '{}' is not of the form \"l|U\"", label),
                            format!("keys[{}].label", i),
                        )
                        .with_suggestion("Dual labels need exactly two non-empty halves"),
                    );
                }
            }
        }

        if let Some(popup) = &key.popup {
            if popup.is_empty() {
                issues.push(ValidationIssue::new(
                    Severity::Warning,
                    "Popup reference is empty",
                    format!("keys[{}].popup", i),
                ));
            }
        }
    }

    issues
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{GridDims, Key, KeyCode, SpaceSpan};

    fn grid_layout(rows: usize, cols: usize, space: SpaceSpan, key_count: usize) -> Layout {
        let keys = (0..key_count)
            .map(|_| Key {
                codes: vec![KeyCode::Character('a')],
                label: Some("a|A".to_string()),
                ..Key::default()
            })
            .collect();

        Layout {
            name: "test".to_string(),
            abc_grid: GridDims { rows, cols },
            num_grid: GridDims { rows, cols },
            space,
            keys,
            shifted: false,
        }
    }

    /// Test 1: A consistent layout validates cleanly
    #[test]
    fn test_consistent_layout_is_clean() {
        // 2x5 grid, space spans 3 cells: 10 - 2 = 8 logical keys
        let layout = grid_layout(2, 5, SpaceSpan { index: 5, span: 3 }, 8);
        let issues = validate_layout(&layout);
        assert!(issues.is_empty(), "Expected no issues, got {:?}", issues);
    }

    /// Test 2: A zero span is an error
    #[test]
    fn test_zero_span_is_error(){
        let layout = grid_layout(2, 5, SpaceSpan { index: 0, span: 0 }, 10);
        let issues = validate_layout(&layout);
        assert!(issues
            .iter()
            .any(|issue| issue.severity == Severity::Error && issue.field_path == "space.span"));
    }

    /// Test 3: A span straddling a row boundary is an error
    #[test]
    fn test_straddling_span_is_error() {
        let layout = grid_layout(2, 5, SpaceSpan { index: 4, span: 2 }, 9);
        let issues = validate_layout(&layout);
        assert!(
            issues
                .iter()
                .any(|issue| issue.severity == Severity::Error && issue.field_path == "space"),
            "Span crossing a row boundary should be rejected"
        );
    }

    /// Test 4: A span exceeding the grid is an error
    #[test]
    fn test_span_past_grid_is_error() {
        let layout = grid_layout(1, 5, SpaceSpan { index: 3, span: 2 }, 4);
        let mut layout = layout;
        layout.space = SpaceSpan { index: 10, span: 2 };
        let issues = validate_layout(&layout);
        assert!(issues.iter().any(|issue| issue.severity == Severity::Error));
    }

    /// Test 5: Key-count mismatch is only a warning
    #[test]
    fn test_key_count_mismatch_is_warning() {
        let layout = grid_layout(2, 5, SpaceSpan { index: 5, span: 3 }, 6);
        let issues = validate_layout(&layout);
        assert!(issues.iter().all(|issue| issue.severity == Severity::Warning));
        assert!(!issues.is_empty(), "Mismatch should be reported");
    }

    /// Test 6: Malformed dual labels are warnings
    #[test]
    fn test_malformed_dual_label_warns() {
        let mut layout = grid_layout(1, 2, SpaceSpan { index: 0, span: 1 }, 2);
        layout.keys[0].label = Some("a|".to_string());
        let issues = validate_layout(&layout);
        assert!(issues
            .iter()
            .any(|issue| issue.field_path == "keys[0].label"));
    }
}
