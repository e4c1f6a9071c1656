// SPDX-License-Identifier: GPL-3.0-only

//! Mini keyboards: transient accent overlays opened by long press.
//!
//! A mini keyboard occupies a contiguous run of existing slots near the
//! pressed key instead of floating above the layout. Opening overlays accent
//! keys onto the slot store; dismissing reloads the base layout, so overlay
//! state is never persisted.

use crate::layout::LayoutLibrary;
use crate::view::slots::SlotMap;

/// State machine for the accent overlay.
#[derive(Debug, Default)]
pub struct MiniKeyboard {
    base_index: Option<usize>,
    visible: bool,
}

impl MiniKeyboard {
    /// Creates a closed mini keyboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while the overlay is on screen.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Slot index where the accent run begins, while visible.
    pub fn base_index(&self) -> Option<usize> {
        self.base_index
    }

    /// Opens the mini keyboard for the key at `focus_index`.
    ///
    /// Keys with a popup reference overlay that layout's keys onto the slots
    /// around the focus; the anchor shifts left when the run would straddle a
    /// row boundary, so the whole run ends exactly at the boundary. Plain
    /// character keys without a popup open a single-slot case-flip preview.
    /// Icon keys without a popup do nothing.
    ///
    /// Returns `true` if the overlay changed and the keys need re-rendering.
    pub fn open_for(
        &mut self,
        focus_index: usize,
        slots: &mut SlotMap,
        library: &LayoutLibrary,
    ) -> bool {
        let Some(key) = slots.key(focus_index) else {
            return false;
        };

        if let Some(popup_name) = key.popup.clone() {
            let Some(popup) = library.get(&popup_name) else {
                tracing::warn!("Popup layout '{}' is not in the library", popup_name);
                return false;
            };
            let accents: Vec<_> = popup.keys.clone();
            if accents.is_empty() {
                tracing::warn!("Popup layout '{}' has no keys", popup_name);
                return false;
            }

            self.dismiss(slots);

            let anchor = anchor_for(focus_index, accents.len(), slots.cols());
            slots.overlay(anchor, accents);

            self.visible = true;
            self.base_index = Some(anchor);
            tracing::debug!("Opened mini keyboard at slot {}", anchor);
            true
        } else if key.icon.is_none() {
            // Plain character key: preview the same slot with its case flipped.
            self.dismiss(slots);

            if slots.mark_mini(focus_index) {
                self.visible = true;
                self.base_index = Some(focus_index);
                true
            } else {
                false
            }
        } else {
            // Function keys without a popup (space, voice, paste) have no
            // long-press behavior.
            false
        }
    }

    /// Closes the overlay and restores the base layout.
    ///
    /// Returns `true` if an overlay was actually dismissed; callers use this
    /// to decide whether to swallow the triggering input event. The caller
    /// re-renders and re-reads `layout` through the slot store, which still
    /// holds the authoritative keys.
    pub fn dismiss(&mut self, slots: &mut SlotMap) -> bool {
        if !self.visible {
            return false;
        }

        slots.clear_overlay();
        self.visible = false;
        self.base_index = None;
        true
    }
}

/// Computes the first slot of an accent run.
///
/// Defaults to the focus itself; when the run would cross into the next row,
/// the anchor moves left so the run ends exactly at the row boundary.
fn anchor_for(focus_index: usize, accent_count: usize, cols: usize) -> usize {
    if cols == 0 {
        return focus_index;
    }

    let current_row = focus_index / cols;
    let next_row = (focus_index + accent_count) / cols;
    if current_row == next_row {
        focus_index
    } else {
        (cols * next_row).saturating_sub(accent_count)
    }
}

// ============================================================================
// Tests
// ============================================================================
