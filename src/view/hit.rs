// SPDX-License-Identifier: GPL-3.0-only

//! Mapping pointer and remote-control coordinates to logical key indices.
//!
//! The visual grid reserves several cell widths for the space key, while the
//! logical key list stores it once. The mapper flattens a position into a grid
//! cell, collapses any cell inside the space span to the space index, and
//! shifts the indices after it so the logical index space stays dense.

use crate::layout::types::SpaceSpan;

/// Padding around the key area, in logical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PaddingBox {
    /// Left padding
    pub left: f32,
    /// Top padding
    pub top: f32,
    /// Right padding
    pub right: f32,
    /// Bottom padding
    pub bottom: f32,
}

impl PaddingBox {
    /// Uniform padding on all sides.
    pub fn uniform(padding: f32) -> Self {
        Self {
            left: padding,
            top: padding,
            right: padding,
            bottom: padding,
        }
    }
}

/// Returns the logical key index nearest to a position.
///
/// Total over its whole input range: coordinates outside the view clamp to
/// the nearest edge cell, stale geometry clamps to the last key, and an empty
/// key list maps everything to index 0.
#[allow(clippy::too_many_arguments)]
pub fn nearest_index(
    x: f32,
    y: f32,
    view_width: f32,
    view_height: f32,
    padding: PaddingBox,
    rows: usize,
    cols: usize,
    space: SpaceSpan,
    key_count: usize,
) -> usize {
    if key_count == 0 || rows == 0 || cols == 0 {
        return 0;
    }

    let usable_height = (view_height - padding.top - padding.bottom).max(1.0);
    let usable_width = (view_width - padding.left - padding.right).max(1.0);

    let row = ((y - padding.top) / usable_height * rows as f32).floor();
    let row = (row.max(0.0) as usize).min(rows - 1);

    let col = ((x - padding.left) / usable_width * cols as f32).floor();
    let col = (col.max(0.0) as usize).min(cols - 1);

    let mut index = row * cols + col;

    // Cells inside the space span all belong to the space key.
    if index > space.index && index < space.index + space.span {
        index = space.index;
    }

    // Keys after the span shift down so logical indices stay contiguous.
    if index >= space.index + space.span {
        index -= space.span - 1;
    }

    index.min(key_count - 1)
}

// ============================================================================
// Tests
// ============================================================================
