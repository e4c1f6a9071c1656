// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard layout model and loading.
//!
//! A [`Layout`] is an ordered list of keys with resolved absolute geometry,
//! plus the logical row/column counts for the alphabetic and numeric modes and
//! the space-span navigation invariants. Layouts are defined as JSON files;
//! the default set ships embedded in the binary and is resolved through a
//! [`LayoutLibrary`], which is also how mini-keyboard popup references are
//! looked up by name.
//!
//! # Modules
//!
//! - `types`: key and grid data structures, parse error types
//! - `parser`: JSON parsing and geometry flattening
//! - `validation`: grid and space-span invariant checks

pub mod parser;
pub mod types;
pub mod validation;

pub use parser::{parse_layout_file, parse_layout_str};
pub use types::{
    EdgeFlags, FunctionKey, GridDims, GridMode, Key, KeyCode, ParseError, ParseResult, Severity,
    SpaceSpan, ValidationIssue,
};
pub use validation::validate_layout;

use rust_embed::RustEmbed;
use std::collections::HashMap;

/// A complete keyboard layout with resolved key geometry.
///
/// Immutable once loaded, except for the shifted-state flag which the view
/// updates as the shift state changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Layout name; popup references resolve against this
    pub name: String,
    /// Logical grid dimensions in alphabetic mode
    pub abc_grid: GridDims,
    /// Logical grid dimensions in numeric mode
    pub num_grid: GridDims,
    /// Space key position and span in the flattened grid
    pub space: SpaceSpan,
    /// Ordered keys with absolute geometry
    pub keys: Vec<Key>,
    /// Whether the keyboard currently renders shifted labels
    pub shifted: bool,
}

impl Layout {
    /// Returns the grid dimensions for the given mode.
    pub fn grid(&self, mode: GridMode) -> GridDims {
        match mode {
            GridMode::Alphabetic => self.abc_grid,
            GridMode::Numeric => self.num_grid,
        }
    }

    /// Total width of the key area, including trailing gaps.
    pub fn total_width(&self) -> f32 {
        self.keys
            .iter()
            .map(|key| key.x + key.width + key.gap)
            .fold(0.0, f32::max)
    }

    /// Total height of the key area, including trailing gaps.
    pub fn total_height(&self) -> f32 {
        self.keys
            .iter()
            .map(|key| key.y + key.height + key.gap)
            .fold(0.0, f32::max)
    }
}

/// Embedded default layout definitions.
#[derive(RustEmbed)]
#[folder = "assets/layouts/"]
struct LayoutAssets;

/// A named collection of layouts.
///
/// Holds the base keyboards and the mini-keyboard popup layouts referenced by
/// key `popup` fields.
#[derive(Debug, Default)]
pub struct LayoutLibrary {
    layouts: HashMap<String, Layout>,
}

impl LayoutLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every embedded layout definition.
    ///
    /// Definitions that fail to parse are skipped with a warning; the library
    /// is usable with whatever subset loaded cleanly.
    pub fn embedded() -> Self {
        let mut library = Self::new();

        for path in LayoutAssets::iter() {
            let Some(asset) = LayoutAssets::get(&path) else {
                continue;
            };
            let json = String::from_utf8_lossy(&asset.data);

            match parse_layout_str(&json) {
                Ok(result) => {
                    for warning in &result.warnings {
                        tracing::warn!("Layout '{}': {}", path, warning);
                    }
                    library.insert(result.into_layout());
                }
                Err(err) => {
                    tracing::warn!("Skipping embedded layout '{}': {}", path, err);
                }
            }
        }

        tracing::debug!("Loaded {} embedded layouts", library.len());
        library
    }

    /// Inserts a layout, replacing any existing layout with the same name.
    pub fn insert(&mut self, layout: Layout) {
        self.layouts.insert(layout.name.clone(), layout);
    }

    /// Looks up a layout by name.
    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    /// Number of layouts in the library.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Returns `true` if the library holds no layouts.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Names of all loaded layouts.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================
