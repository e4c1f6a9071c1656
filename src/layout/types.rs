// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyboard layout definitions.
//!
//! This module defines the key and layout data model plus the error types used
//! when parsing layout definitions from JSON files.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Error Handling Types
// ============================================================================

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal error that prevents the layout from being used
    Error,
    /// Non-fatal issue that should be addressed
    Warning,
}

/// A validation issue discovered during layout parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level (Error or Warning)
    pub severity: Severity,
    /// Human-readable description of the issue
    pub message: String,
    /// Path to the field that caused the issue (e.g., "rows[1].keys[2]")
    pub field_path: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to the validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_str = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };

        write!(f, "[{}] {}: {}", severity_str, self.field_path, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Error type for layout parsing operations.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error occurred while reading a layout file
    IoError {
        /// The underlying I/O error
        source: std::io::Error,
        /// Optional file path that caused the error
        file_path: Option<String>,
    },

    /// JSON parsing error
    JsonError {
        /// The underlying JSON parsing error
        source: serde_json::Error,
        /// Optional file path being parsed
        file_path: Option<String>,
        /// Line number where the error occurred (from serde_json)
        line_number: Option<usize>,
    },

    /// Validation errors found during parsing
    ValidationError {
        /// List of validation issues found
        issues: Vec<ValidationIssue>,
        /// Optional file path being validated
        file_path: Option<String>,
    },
}

impl ParseError {
    /// Creates an I/O error with file path context.
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::IoError {
            source,
            file_path: Some(file_path.into()),
        }
    }

    /// Creates a JSON parsing error with context.
    pub fn json_error(source: serde_json::Error) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: None,
            line_number,
        }
    }

    /// Creates a JSON parsing error with file path.
    pub fn json_error_with_path(source: serde_json::Error, file_path: impl Into<String>) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: Some(file_path.into()),
            line_number,
        }
    }

    /// Creates a validation error from a list of issues.
    pub fn validation_error(issues: Vec<ValidationIssue>) -> Self {
        Self::ValidationError {
            issues,
            file_path: None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IoError { source, file_path } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)
            }
            ParseError::JsonError {
                source,
                file_path,
                line_number,
            } => {
                write!(f, "JSON parsing error")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)
            }
            ParseError::ValidationError { issues, file_path } => {
                write!(f, "Validation failed")?;
                if let Some(path) = file_path {
                    write!(f, " for file '{}'", path)?;
                }
                writeln!(f, " with {} issue(s):", issues.len())?;
                for (i, issue) in issues.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, issue)?;
                    if i < issues.len() - 1 {
                        writeln!(f)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoError { source, .. } => Some(source),
            ParseError::JsonError { source, .. } => Some(source),
            ParseError::ValidationError { .. } => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            source: err,
            file_path: None,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::json_error(err)
    }
}

// ============================================================================
// ParseResult Type
// ============================================================================

/// Result of successfully parsing a layout with optional warnings.
///
/// The parser operates in permissive mode, returning a usable layout even when
/// non-fatal validation issues are found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully parsed layout
    pub layout: T,
    /// Non-fatal validation warnings
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with no warnings.
    pub fn new(layout: T) -> Self {
        Self {
            layout,
            warnings: Vec::new(),
        }
    }

    /// Creates a new parse result with warnings.
    pub fn with_warnings(layout: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { layout, warnings }
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Consumes the result and returns the layout, discarding warnings.
    pub fn into_layout(self) -> T {
        self.layout
    }
}

// ============================================================================
// Key Data Structures
// ============================================================================

/// Function keys that do not emit a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKey {
    /// Toggle shift / engage caps lock
    Shift,
    /// Switch between alphabetic and symbol layouts
    SymToggle,
    /// Move the cursor left
    Left,
    /// Move the cursor right
    Right,
    /// Delete backwards
    Delete,
    /// Engage caps lock directly
    CapsLock,
    /// Start voice input
    Voice,
    /// Close an open mini keyboard
    DismissMiniKeyboard,
    /// Cycle the input language
    LangToggle,
    /// Paste from the clipboard
    Clipboard,
}

/// Output code for a key press.
///
/// Keys emit either a Unicode character or a function-key action. The first
/// code of a key distinguishes function keys from character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyCode {
    /// Regular character key (e.g., 'a', '1', ' ')
    Character(char),
    /// Function key (shift, delete, mode toggles, ...)
    Function(FunctionKey),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Character(c) => write!(f, "'{}'", c),
            KeyCode::Function(func) => write!(f, "{:?}", func),
        }
    }
}

impl Default for KeyCode {
    fn default() -> Self {
        KeyCode::Character(' ')
    }
}

/// Flags marking which edges of the keyboard a key touches.
///
/// Used by the renderer for layout-adjacent styling, and copied onto accent
/// keys so a mini keyboard overlay inherits the edge treatment of the slots it
/// covers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlags {
    /// Key touches the left edge
    #[serde(default)]
    pub left: bool,
    /// Key touches the right edge
    #[serde(default)]
    pub right: bool,
    /// Key touches the top edge
    #[serde(default)]
    pub top: bool,
    /// Key touches the bottom edge
    #[serde(default)]
    pub bottom: bool,
}

/// A keyboard key with resolved absolute geometry.
///
/// Produced by the layout parser; positions and sizes are in logical pixels.
/// The label may encode two characters in the form `"l|U"` (lowercase then
/// uppercase); the case converter picks one half at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    /// Horizontal position of the key's top-left corner
    pub x: f32,

    /// Vertical position of the key's top-left corner
    pub y: f32,

    /// Drawn width of the key
    pub width: f32,

    /// Drawn height of the key
    pub height: f32,

    /// Gap to the neighboring key
    #[serde(default)]
    pub gap: f32,

    /// Output codes; the first code distinguishes function keys from character keys
    #[serde(default)]
    pub codes: Vec<KeyCode>,

    /// Symbolic icon name, if the key is drawn as an icon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Text label, possibly dual-cased ("a|A")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Name of the mini-keyboard layout opened on long press
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,

    /// Which keyboard edges this key touches
    #[serde(default)]
    pub edge_flags: EdgeFlags,
}

impl Default for Key {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            gap: 0.0,
            codes: Vec::new(),
            icon: None,
            label: None,
            popup: None,
            edge_flags: EdgeFlags::default(),
        }
    }
}

impl Key {
    /// Returns `true` if the key's primary code is a function key.
    pub fn is_function(&self) -> bool {
        matches!(self.codes.first(), Some(KeyCode::Function(_)))
    }

    /// Returns `true` if the key's primary code is the given function key.
    pub fn is_function_key(&self, func: FunctionKey) -> bool {
        self.codes.first() == Some(&KeyCode::Function(func))
    }

    /// Returns `true` if the key's primary code is the space character.
    pub fn is_space(&self) -> bool {
        self.codes.first() == Some(&KeyCode::Character(' '))
    }
}

// ============================================================================
// Grid Data Structures
// ============================================================================

/// Logical row/column counts for one keyboard mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
}

impl GridDims {
    /// Total number of grid cells.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// Which grid dimensions a layout install should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    /// Alphabetic keyboard mode
    Alphabetic,
    /// Numeric / symbol keyboard mode
    Numeric,
}

/// Position and width of the oversized space key in the flattened grid.
///
/// `index` is the logical index the whole space region collapses to; `span`
/// is the number of grid cells the key occupies. Both are navigation
/// invariants validated at layout load: every grid cell must map to exactly
/// one logical key and logical keys must stay contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSpan {
    /// Logical index of the space key
    pub index: usize,
    /// Number of grid cells the space key spans
    pub span: usize,
}

impl Default for SpaceSpan {
    fn default() -> Self {
        Self {
            index: crate::app_settings::DEFAULT_SPACE_INDEX,
            span: crate::app_settings::DEFAULT_SPACE_SPAN,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: JSON parse error includes line number and file path
    #[test]
    fn test_json_error_includes_line_number() {
        let invalid_json = r#"{
  "name": "test",
  "invalid":
}"#;

        let result: Result<serde_json::Value, _> = serde_json::from_str(invalid_json);
        let json_err = result.unwrap_err();

        let parse_err = ParseError::json_error_with_path(json_err, "test.json");

        let display_str = format!("{}", parse_err);
        assert!(
            display_str.contains("line"),
            "Error message should include line number"
        );
        assert!(
            display_str.contains("test.json"),
            "Error message should include file path"
        );
    }

    /// Test 2: ValidationIssue Display format
    #[test]
    fn test_validation_issue_display() {
        let warning = ValidationIssue::new(
            Severity::Warning,
            "Key count does not match the grid",
            "rows[4]",
        )
        .with_suggestion("Check the space span against the column count");

        let display_str = format!("{}", warning);
        assert!(display_str.contains("WARNING"));
        assert!(display_str.contains("rows[4]"));
        assert!(display_str.contains("Suggestion"));
    }

    /// Test 3: ParseResult with and without warnings
    #[test]
    fn test_parse_result_warnings() {
        let warnings = vec![ValidationIssue::new(
            Severity::Warning,
            "Missing description",
            "description",
        )];
        let result = ParseResult::with_warnings("layout", warnings);
        assert!(result.has_warnings());

        let result = ParseResult::new("layout");
        assert!(!result.has_warnings());
        assert_eq!(result.into_layout(), "layout");
    }

    /// Test 4: KeyCode serde distinguishes characters from function keys
    #[test]
    fn test_keycode_serde_untagged() {
        let character: KeyCode = serde_json::from_str("\"a\"").expect("Should parse character");
        assert_eq!(character, KeyCode::Character('a'));

        let function: KeyCode = serde_json::from_str("\"shift\"").expect("Should parse function");
        assert_eq!(function, KeyCode::Function(FunctionKey::Shift));

        let dismiss: KeyCode =
            serde_json::from_str("\"dismiss_mini_keyboard\"").expect("Should parse function");
        assert_eq!(
            dismiss,
            KeyCode::Function(FunctionKey::DismissMiniKeyboard)
        );

        // Round-trip a character back to a bare string
        let json = serde_json::to_string(&KeyCode::Character('q')).expect("Should serialize");
        assert_eq!(json, "\"q\"");
    }

    /// Test 5: Key classification helpers
    #[test]
    fn test_key_classification() {
        let shift = Key {
            codes: vec![KeyCode::Function(FunctionKey::Shift)],
            icon: Some("keyboard-shift-symbolic".to_string()),
            ..Key::default()
        };
        assert!(shift.is_function());
        assert!(shift.is_function_key(FunctionKey::Shift));
        assert!(!shift.is_space());

        let space = Key {
            codes: vec![KeyCode::Character(' ')],
            ..Key::default()
        };
        assert!(space.is_space());
        assert!(!space.is_function());

        let blank = Key::default();
        assert!(!blank.is_function(), "Key without codes is not a function key");
    }

    /// Test 6: SpaceSpan defaults match the application settings
    #[test]
    fn test_space_span_default() {
        let space = SpaceSpan::default();
        assert_eq!(space.index, crate::app_settings::DEFAULT_SPACE_INDEX);
        assert_eq!(space.span, crate::app_settings::DEFAULT_SPACE_SPAN);
    }

    /// Test 7: GridDims cell count
    #[test]
    fn test_grid_dims_cells() {
        let grid = GridDims { rows: 5, cols: 11 };
        assert_eq!(grid.cells(), 55);
    }
}
