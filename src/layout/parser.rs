// SPDX-License-Identifier: GPL-3.0-only

//! Layout parsing logic for loading JSON layout definitions.
//!
//! Layout files describe keys row by row with relative cell widths; the parser
//! flattens them into a [`Layout`] with absolute geometry, derives the grid
//! dimensions and space span when they are not declared, and validates the
//! result. Validation warnings are returned alongside the layout; validation
//! errors fail the parse.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::layout::types::{
    EdgeFlags, GridDims, Key, KeyCode, ParseError, ParseResult, Severity, SpaceSpan,
};
use crate::layout::validation::validate_layout;
use crate::layout::Layout;

/// Cell unit size used when a layout does not declare one, in logical pixels.
const DEFAULT_UNIT: f32 = 56.0;

/// Inter-key gap used when a layout does not declare one, in logical pixels.
const DEFAULT_GAP: f32 = 6.0;

// ============================================================================
// Source Format
// ============================================================================

/// A key as written in a layout file.
#[derive(Debug, Clone, Deserialize)]
struct KeyDef {
    /// Text label, possibly dual-cased ("a|A")
    #[serde(default)]
    label: Option<String>,

    /// Symbolic icon name
    #[serde(default)]
    icon: Option<String>,

    /// Output codes
    #[serde(default)]
    codes: Vec<KeyCode>,

    /// Name of the popup layout opened on long press
    #[serde(default)]
    popup: Option<String>,

    /// Width in grid cells (1.0 = one cell)
    #[serde(default = "default_key_width")]
    width: f32,
}

fn default_key_width() -> f32 {
    1.0
}

/// A row of key definitions.
#[derive(Debug, Clone, Deserialize)]
struct RowDef {
    keys: Vec<KeyDef>,
}

/// A layout file as written on disk.
#[derive(Debug, Clone, Deserialize)]
struct LayoutDef {
    name: String,

    /// Grid dimensions in alphabetic mode; derived from the rows if omitted
    #[serde(default)]
    abc_grid: Option<GridDims>,

    /// Grid dimensions in numeric mode; falls back to the alphabetic grid
    #[serde(default)]
    num_grid: Option<GridDims>,

    /// Space key invariants; derived from the widest space key if omitted
    #[serde(default)]
    space: Option<SpaceSpan>,

    /// Cell unit size in logical pixels
    #[serde(default = "default_unit")]
    unit: f32,

    /// Inter-key gap in logical pixels
    #[serde(default = "default_gap")]
    gap: f32,

    rows: Vec<RowDef>,
}

fn default_unit() -> f32 {
    DEFAULT_UNIT
}

fn default_gap() -> f32 {
    DEFAULT_GAP
}

// ============================================================================
// Public API
// ============================================================================

/// Parses a keyboard layout from a JSON file.
///
/// Distinguishes I/O errors (file not found, permission denied) from JSON and
/// validation errors, and attaches the file path to the error context.
pub fn parse_layout_file(path: impl AsRef<Path>) -> Result<ParseResult<Layout>, ParseError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let json = fs::read_to_string(path).map_err(|e| ParseError::io_error_with_path(e, &display))?;

    parse_layout_str(&json).map_err(|err| match err {
        ParseError::JsonError {
            source,
            line_number,
            ..
        } => ParseError::JsonError {
            source,
            file_path: Some(display.clone()),
            line_number,
        },
        ParseError::ValidationError { issues, .. } => ParseError::ValidationError {
            issues,
            file_path: Some(display.clone()),
        },
        other => other,
    })
}

/// Parses a keyboard layout from a JSON string.
///
/// Returns the flattened layout together with any non-fatal validation
/// warnings, or a [`ParseError`] when the JSON is malformed or a validation
/// error is found.
pub fn parse_layout_str(json: &str) -> Result<ParseResult<Layout>, ParseError> {
    let def: LayoutDef = serde_json::from_str(json).map_err(ParseError::json_error)?;

    let layout = flatten(def);

    let issues = validate_layout(&layout);
    let (errors, warnings): (Vec<_>, Vec<_>) = issues
        .into_iter()
        .partition(|issue| issue.severity == Severity::Error);

    if !errors.is_empty() {
        return Err(ParseError::validation_error(errors));
    }

    Ok(ParseResult::with_warnings(layout, warnings))
}

// ============================================================================
// Flattening
// ============================================================================

/// Resolves a layout definition into absolute key geometry.
fn flatten(def: LayoutDef) -> Layout {
    let unit = def.unit;
    let gap = def.gap;
    let row_count = def.rows.len();

    let mut keys = Vec::new();
    let mut max_row_cells = 0usize;
    let mut derived_space: Option<SpaceSpan> = None;
    let mut flat_cell = 0usize;

    for (r, row) in def.rows.iter().enumerate() {
        let mut x = 0.0f32;
        let mut row_cells = 0usize;
        let last = row.keys.len().saturating_sub(1);

        for (i, key_def) in row.keys.iter().enumerate() {
            let cells = key_def.width.max(1.0).round() as usize;

            // The widest space key defines the collapse invariants.
            let is_space = key_def.codes.first() == Some(&KeyCode::Character(' '));
            if is_space && cells > 1 && derived_space.is_none() {
                derived_space = Some(SpaceSpan {
                    index: flat_cell,
                    span: cells,
                });
            }

            keys.push(Key {
                x,
                y: r as f32 * unit,
                width: key_def.width.max(1.0) * unit - gap,
                height: unit - gap,
                gap,
                codes: key_def.codes.clone(),
                icon: key_def.icon.clone(),
                label: key_def.label.clone(),
                popup: key_def.popup.clone(),
                edge_flags: EdgeFlags {
                    left: i == 0,
                    right: i == last,
                    top: r == 0,
                    bottom: r + 1 == row_count,
                },
            });

            x += key_def.width.max(1.0) * unit;
            row_cells += cells;
            flat_cell += cells;
        }

        max_row_cells = max_row_cells.max(row_cells);
    }

    let abc_grid = def.abc_grid.unwrap_or(GridDims {
        rows: row_count,
        cols: max_row_cells,
    });
    let num_grid = def.num_grid.unwrap_or(abc_grid);
    let space = def
        .space
        .or(derived_space)
        .unwrap_or(SpaceSpan { index: 0, span: 1 });

    Layout {
        name: def.name,
        abc_grid,
        num_grid,
        space,
        keys,
        shifted: false,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::FunctionKey;
    use std::io::Write;

    const SMALL_LAYOUT: &str = r#"{
        "name": "small",
        "unit": 10.0,
        "gap": 2.0,
        "rows": [
            {"keys": [
                {"label": "a|A", "codes": ["a"]},
                {"label": "b|B", "codes": ["b"]},
                {"icon": "edit-delete-symbolic", "codes": ["delete"]}
            ]},
            {"keys": [
                {"label": "c|C", "codes": ["c"]},
                {"codes": [" "], "width": 2.0}
            ]}
        ]
    }"#;

    /// Test 1: Flattening assigns absolute geometry row by row
    #[test]
    fn test_flatten_geometry() {
        let result = parse_layout_str(SMALL_LAYOUT).expect("Should parse");
        let layout = result.into_layout();

        assert_eq!(layout.keys.len(), 5);

        // First row at y = 0, keys advancing by one unit
        assert_eq!(layout.keys[0].x, 0.0);
        assert_eq!(layout.keys[1].x, 10.0);
        assert_eq!(layout.keys[2].x, 20.0);
        assert_eq!(layout.keys[0].y, 0.0);

        // Second row at y = unit
        assert_eq!(layout.keys[3].y, 10.0);

        // Drawn sizes exclude the gap; the wide key spans two cells
        assert_eq!(layout.keys[0].width, 8.0);
        assert_eq!(layout.keys[0].height, 8.0);
        assert_eq!(layout.keys[4].width, 18.0);
    }

    /// Test 2: Edge flags mark the outer keys of the grid
    #[test]
    fn test_flatten_edge_flags() {
        let layout = parse_layout_str(SMALL_LAYOUT)
            .expect("Should parse")
            .into_layout();

        assert!(layout.keys[0].edge_flags.left);
        assert!(layout.keys[0].edge_flags.top);
        assert!(!layout.keys[0].edge_flags.right);

        assert!(layout.keys[2].edge_flags.right);
        assert!(layout.keys[3].edge_flags.bottom);
        assert!(layout.keys[4].edge_flags.right);
        assert!(layout.keys[4].edge_flags.bottom);
    }

    /// Test 3: Grid dimensions and space span are derived when omitted
    #[test]
    fn test_flatten_derives_grid_and_space() {
        let layout = parse_layout_str(SMALL_LAYOUT)
            .expect("Should parse")
            .into_layout();

        // Two rows; widest row has three cells
        assert_eq!(layout.abc_grid, GridDims { rows: 2, cols: 3 });
        assert_eq!(layout.num_grid, layout.abc_grid);

        // The wide space key starts at flattened cell 4 and spans two cells
        assert_eq!(layout.space, SpaceSpan { index: 4, span: 2 });
    }

    /// Test 4: Function codes parse alongside characters
    #[test]
    fn test_parse_function_codes() {
        let layout = parse_layout_str(SMALL_LAYOUT)
            .expect("Should parse")
            .into_layout();

        assert!(layout.keys[2].is_function_key(FunctionKey::Delete));
        assert!(layout.keys[4].is_space());
    }

    /// Test 5: Malformed JSON surfaces a JsonError with a line number
    #[test]
    fn test_parse_malformed_json() {
        let err = parse_layout_str("{\"name\": \"broken\",\n  \"rows\":\n}").unwrap_err();
        match err {
            ParseError::JsonError { line_number, .. } => {
                assert!(line_number.is_some(), "JSON errors should carry a line number");
            }
            other => panic!("Expected JsonError, got {:?}", other),
        }
    }

    /// Test 6: Parsing from a file attaches the path to error context
    #[test]
    fn test_parse_layout_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(SMALL_LAYOUT.as_bytes())
            .expect("Should write layout");

        let result = parse_layout_file(file.path()).expect("Should parse from file");
        assert_eq!(result.layout.name, "small");

        let err = parse_layout_file("/nonexistent/layout.json").unwrap_err();
        match err {
            ParseError::IoError { file_path, .. } => {
                assert_eq!(file_path.as_deref(), Some("/nonexistent/layout.json"));
            }
            other => panic!("Expected IoError, got {:?}", other),
        }
    }

    /// Test 7: A declared space span that straddles a row boundary fails the parse
    #[test]
    fn test_parse_rejects_straddling_space() {
        let json = r#"{
            "name": "bad_space",
            "abc_grid": {"rows": 2, "cols": 3},
            "space": {"index": 2, "span": 2},
            "rows": [
                {"keys": [{"codes": ["a"]}, {"codes": ["b"]}, {"codes": ["c"]}]},
                {"keys": [{"codes": ["d"]}, {"codes": ["e"]}, {"codes": ["f"]}]}
            ]
        }"#;

        let err = parse_layout_str(json).unwrap_err();
        assert!(
            matches!(err, ParseError::ValidationError { .. }),
            "Straddling space span should be a validation error"
        );
    }
}
