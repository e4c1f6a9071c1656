// SPDX-License-Identifier: GPL-3.0-only

//! Per-key tile composition.
//!
//! Each key renders into one tile: an icon, a styled text label, or a blank
//! filler, positioned absolutely within the keyboard. Composition is pure —
//! the result describes what a backend should draw into the key's offscreen
//! bitmap, it does not draw anything itself.

use crate::app_settings;
use crate::layout::types::{FunctionKey, Key};
use crate::view::case::{display_label, effective_shift};
use crate::view::hit::PaddingBox;
use crate::view::slots::Slot;
use crate::view::ShiftState;

/// Font weight for key labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// Light face used for single-character key labels
    Light,
    /// Normal face used for multi-character mode-change labels
    Normal,
}

/// What a key tile draws.
#[derive(Debug, Clone, PartialEq)]
pub enum TileContent {
    /// An icon, scaled and offset within the key
    Icon {
        /// Symbolic icon name
        name: String,
        /// Drawn icon width
        width: f32,
        /// Drawn icon height
        height: f32,
        /// Horizontal draw offset within the key
        dx: f32,
        /// Vertical draw offset within the key
        dy: f32,
    },
    /// A text label with resolved styling and baseline position
    Text {
        /// Display label after case selection
        text: String,
        /// Font size in logical pixels
        font_size: f32,
        /// Font weight
        weight: FontWeight,
        /// ARGB text color
        color: u32,
        /// Horizontal center position within the key
        x: f32,
        /// Baseline position within the key
        y: f32,
    },
    /// Structural filler occupying its slot without drawing
    Blank,
}

/// A fully composed key tile ready for a surface to attach.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyTile {
    /// Logical key index the tile renders
    pub index: usize,
    /// Absolute horizontal position including keyboard padding
    pub x: f32,
    /// Absolute vertical position including keyboard padding
    pub y: f32,
    /// Tile width
    pub width: f32,
    /// Tile height
    pub height: f32,
    /// Opacity (0-255); dimmed when outside an open mini keyboard
    pub alpha: u8,
    /// What the tile draws
    pub content: TileContent,
    /// Accessibility content description (the display label, if any)
    pub description: Option<String>,
}

/// Inputs the composition rules depend on.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    /// Whether the keyboard renders shifted labels
    pub shifted: bool,
    /// Shift state selecting the shift-key icon variant
    pub shift_state: ShiftState,
    /// Whether a mini keyboard is on screen
    pub mini_keyboard_open: bool,
    /// Font size for single-character labels
    pub key_font_size: f32,
    /// Font size for multi-character mode-change labels
    pub mode_change_font_size: f32,
    /// Padding around the key area
    pub padding: PaddingBox,
    /// Enlarge-keyboard preference, read fresh for each composition
    pub enlarge_keyboard: bool,
    /// Number of grid cells the space key spans
    pub space_span: usize,
    /// Custom caps-lock icon override
    pub caps_lock_icon: Option<&'a str>,
    /// ARGB text color
    pub text_color: u32,
}

/// Composes the tile for one key slot.
pub fn compose(index: usize, key: &Key, slot: Slot, ctx: &ComposeContext<'_>) -> KeyTile {
    let padding = ctx.padding;

    let label = key
        .label
        .as_deref()
        .map(|raw| display_label(raw, effective_shift(ctx.shifted, slot)));

    let content = if key.icon.is_some() {
        compose_icon(key, ctx)
    } else if let Some(text) = label.clone() {
        compose_text(key, text, ctx)
    } else {
        TileContent::Blank
    };

    let alpha = if ctx.mini_keyboard_open && !slot.in_mini_kb {
        app_settings::INACTIVE_MINI_KB_ALPHA
    } else {
        255
    };

    KeyTile {
        index,
        x: key.x + padding.left,
        y: key.y + padding.top,
        width: key.width,
        height: key.height,
        alpha,
        content,
        description: label,
    }
}

/// Icon rules: shift-state substitution, square fit, enlarged-space correction.
fn compose_icon(key: &Key, ctx: &ComposeContext<'_>) -> TileContent {
    let mut name = key.icon.clone().unwrap_or_default();

    if key.is_function_key(FunctionKey::Shift) {
        name = match ctx.shift_state {
            ShiftState::Off => app_settings::SHIFT_OFF_ICON.to_string(),
            ShiftState::On => app_settings::SHIFT_ON_ICON.to_string(),
            ShiftState::Locked => ctx
                .caps_lock_icon
                .unwrap_or(app_settings::SHIFT_LOCKED_ICON)
                .to_string(),
        };
    }

    let mut icon_width = key.width;
    let mut icon_height = key.height;

    // Square keys draw a proper-fit icon instead of filling the tile.
    if key.width == key.height {
        let size = (key.width * app_settings::SQUARE_ICON_SCALE_FACTOR).round();
        icon_width = size;
        icon_height = size;
    }

    // The enlarged keyboard widens gaps; shrink the space icon so it does not
    // bleed into the neighboring keys.
    if key.is_space() && ctx.enlarge_keyboard {
        let gap_delta = key.gap * app_settings::ENLARGE_FACTOR - key.gap;
        icon_width -= gap_delta * (ctx.space_span.saturating_sub(1)) as f32;
    }

    let padding = ctx.padding;
    let dx = (key.width - padding.left - padding.right - icon_width) / 2.0 + padding.left;
    let dy = (key.height - padding.top - padding.bottom - icon_height) / 2.0 + padding.top;

    TileContent::Icon {
        name,
        width: icon_width,
        height: icon_height,
        dx,
        dy,
    }
}

/// Text rules: font selection by label length, optical nudges, baseline math.
fn compose_text(key: &Key, text: String, ctx: &ComposeContext<'_>) -> TileContent {
    let (font_size, weight) = if text.chars().count() > 1 {
        (ctx.mode_change_font_size, FontWeight::Normal)
    } else {
        (ctx.key_font_size, FontWeight::Light)
    };

    // Digit glyphs sit slightly right of center; lowercase glyphs sit low and
    // right. Nudge them back toward the optical center.
    let mut dx = 0.0;
    let mut dy = 0.0;
    if is_digits_only(&text) {
        dx = key.width * app_settings::LOWER_CASE_TRANSLATION_X_FACTOR;
    } else if text.to_uppercase() != text {
        dx = key.width * app_settings::LOWER_CASE_TRANSLATION_X_FACTOR;
        dy = key.height * app_settings::LOWER_CASE_TRANSLATION_Y_FACTOR;
    }

    let padding = ctx.padding;
    let descent = font_size * app_settings::FONT_DESCENT_FACTOR;
    let x = (key.width - padding.left - padding.right) / 2.0 + padding.left + dx;
    let y = (key.height - padding.top - padding.bottom) / 2.0
        + (font_size - descent) / 2.0
        + padding.top
        + dy;

    TileContent::Text {
        text,
        font_size,
        weight,
        color: ctx.text_color,
        x,
        y,
    }
}

fn is_digits_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

// ============================================================================
// Tests
// ============================================================================
