// SPDX-License-Identifier: GPL-3.0-only

//! Enlarged-keyboard support.
//!
//! When the enlarge-keyboard preference is set, key geometry and label fonts
//! scale by a fixed factor. Geometry scaling must happen at most once per
//! layout: re-installing an already-scaled layout is detected by comparing
//! the first key's width against its originally recorded value. The scaled
//! layout is wrapped in an adapter that also declares independent width and
//! height factors for the surrounding panel layout.

use crate::app_settings;
use crate::config::Preferences;
use crate::layout::Layout;

/// A layout together with the panel-level scale factors it was prepared with.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledLayout {
    /// The (possibly geometry-scaled) layout
    pub layout: Layout,
    /// Declared width factor for downstream panel sizing
    pub width_factor: f32,
    /// Declared height factor for downstream panel sizing
    pub height_factor: f32,
}

/// Applies the enlarge-keyboard preference to layouts and fonts.
#[derive(Debug)]
pub struct ResizePolicy {
    key_font_origin: f32,
    mode_change_font_origin: f32,
    key_font: f32,
    mode_change_font: f32,
    key_origin_width: f32,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizePolicy {
    /// Creates a policy with the default font sizes.
    pub fn new() -> Self {
        Self {
            key_font_origin: app_settings::KEY_FONT_SIZE,
            mode_change_font_origin: app_settings::MODE_CHANGE_FONT_SIZE,
            key_font: app_settings::KEY_FONT_SIZE,
            mode_change_font: app_settings::MODE_CHANGE_FONT_SIZE,
            key_origin_width: 0.0,
        }
    }

    /// Current font size for single-character key labels.
    pub fn key_font_size(&self) -> f32 {
        self.key_font
    }

    /// Current font size for mode-change labels.
    pub fn mode_change_font_size(&self) -> f32 {
        self.mode_change_font
    }

    /// Prepares a layout for installation, honoring the preference.
    ///
    /// The preference is read fresh on every call, so a toggle takes effect
    /// at the next install without recreating the view.
    pub fn prepare(&mut self, mut layout: Layout, prefs: &dyn Preferences) -> ScaledLayout {
        if prefs.enlarge_keyboard() {
            let factor = app_settings::ENLARGE_FACTOR;
            self.key_font = self.key_font_origin * factor;
            self.mode_change_font = self.mode_change_font_origin * factor;

            if self.is_not_sized_yet(&layout) {
                for key in &mut layout.keys {
                    key.width *= factor;
                    key.height *= factor;
                    key.gap *= factor;
                    key.x *= factor;
                    key.y *= factor;
                }
            }

            ScaledLayout {
                layout,
                width_factor: factor,
                height_factor: factor,
            }
        } else {
            self.key_font = self.key_font_origin;
            self.mode_change_font = self.mode_change_font_origin;

            ScaledLayout {
                layout,
                width_factor: 1.0,
                height_factor: 1.0,
            }
        }
    }

    /// Detects whether the layout geometry is still unscaled.
    ///
    /// The first install records the first key's width; while the incoming
    /// layout still matches that width, it has not been scaled.
    fn is_not_sized_yet(&mut self, layout: &Layout) -> bool {
        let Some(first) = layout.keys.first() else {
            return false;
        };

        if self.key_origin_width == 0.0 {
            self.key_origin_width = first.width;
        }

        self.key_origin_width == first.width
    }
}

// ============================================================================
// Tests
// ============================================================================
