// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "io.github.teleboard.Teleboard";

/// Application version for config/state versioning.
pub const APP_VERSION: u64 = 1;

/// Font size for single-character key labels, in logical pixels.
pub const KEY_FONT_SIZE: f32 = 32.0;

/// Font size for multi-character mode-change labels ("SYM", "ABC"), in logical pixels.
pub const MODE_CHANGE_FONT_SIZE: f32 = 18.0;

/// Scale applied to the focused key tile while hover-focused.
pub const FOCUSED_SCALE: f32 = 1.33;

/// Scale applied to the focused key tile while clicked.
pub const CLICKED_SCALE: f32 = 1.17;

/// Square keys draw their icon at this fraction of the key size.
pub const SQUARE_ICON_SCALE_FACTOR: f32 = 0.45;

/// Duration of the focus scale animation in milliseconds.
pub const CLICK_ANIM_DURATION_MS: u64 = 100;

/// Delay before the previously focused tile starts settling back, in milliseconds.
pub const UNFOCUS_START_DELAY_MS: u64 = 100;

/// Alpha applied to tiles outside an open mini keyboard (0-255).
pub const INACTIVE_MINI_KB_ALPHA: u8 = 140;

/// Geometry and font multiplier used when the enlarge-keyboard preference is set.
pub const ENLARGE_FACTOR: f32 = 1.3;

/// Horizontal nudge factor for digit and lowercase labels, relative to key width.
pub const LOWER_CASE_TRANSLATION_X_FACTOR: f32 = -0.01;

/// Vertical nudge factor for lowercase labels, relative to key height.
pub const LOWER_CASE_TRANSLATION_Y_FACTOR: f32 = -0.075;

/// Approximation of the font descent metric as a fraction of the font size.
///
/// Used to vertically center key labels without a live text stack.
pub const FONT_DESCENT_FACTOR: f32 = 0.24;

/// Default ARGB color for key label text.
pub const KEY_TEXT_COLOR_DEFAULT: u32 = 0xFFEE_EEEE;

/// Icon name drawn on the shift key while shift is off.
pub const SHIFT_OFF_ICON: &str = "keyboard-shift-symbolic";

/// Icon name drawn on the shift key while shift is on.
pub const SHIFT_ON_ICON: &str = "keyboard-shift-filled-symbolic";

/// Icon name drawn on the shift key while caps lock is engaged.
pub const SHIFT_LOCKED_ICON: &str = "keyboard-caps-lock-symbolic";

/// Default logical index of the space key in the flattened grid.
///
/// Layouts carry their own value; a wrong value breaks remote navigation.
pub const DEFAULT_SPACE_INDEX: usize = 47;

/// Default number of grid cells the space key spans.
///
/// Layouts carry their own value; a wrong value breaks remote navigation.
pub const DEFAULT_SPACE_SPAN: usize = 5;
