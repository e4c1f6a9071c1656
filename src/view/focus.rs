// SPDX-License-Identifier: GPL-3.0-only

//! Focus tracking and scale animation control.
//!
//! At most one key is focused at a time. A focus change settles the
//! previously scaled element back to unit scale (after the configured
//! unfocus delay), then animates the new target to the clicked or
//! hover-focus scale. Animations are fire-and-forget; the controller never
//! waits for completion, it only redirects on the next change.

use futures::channel::mpsc;

use crate::app_settings;
use crate::view::surface::{
    send_accessibility_event, AccessibilityEvent, ScaleAnimator, TileHandle,
};

/// Tracks the focused key index and the element being scale-animated.
#[derive(Debug, Default)]
pub struct FocusTracker {
    focus_index: Option<usize>,
    clicked: bool,
    current_target: Option<TileHandle>,
}

impl FocusTracker {
    /// Creates a tracker with no focus.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently focused logical index, if any.
    pub fn focus_index(&self) -> Option<usize> {
        self.focus_index
    }

    /// Whether the current focus is due to a click.
    pub fn is_clicked(&self) -> bool {
        self.clicked
    }

    /// Drops all focus state without animating.
    ///
    /// Used when the slot list is rebuilt and every handle becomes stale.
    pub fn reset(&mut self) {
        self.focus_index = None;
        self.clicked = false;
        self.current_target = None;
    }

    /// Points the in-flight animation target at a replacement element.
    ///
    /// Used when the focused slot is re-rendered and its handle changes.
    pub fn retarget(&mut self, handle: TileHandle) {
        if self.current_target.is_some() {
            self.current_target = Some(handle);
        }
    }

    /// Moves focus to `index`, animating the transition.
    ///
    /// Out-of-range indices are normalized to "no focus". Returns `true` when
    /// the transition was applied, `false` for a no-op (nothing changed, or
    /// nothing is rendered yet).
    pub fn set_focus<A: ScaleAnimator>(
        &mut self,
        index: Option<usize>,
        clicked: bool,
        show_focus_scale: bool,
        tiles: &[Option<TileHandle>],
        animator: &mut A,
        mut events: Option<&mut mpsc::Sender<AccessibilityEvent>>,
    ) -> bool {
        if tiles.is_empty() {
            return false;
        }

        let index = index.filter(|&i| i < tiles.len());

        if index == self.focus_index && clicked == self.clicked {
            return false;
        }

        if index != self.focus_index {
            if let Some(tx) = events.as_deref_mut() {
                if let Some(old_handle) = self.focus_index.and_then(|i| tiles[i]) {
                    send_accessibility_event(
                        tx,
                        AccessibilityEvent {
                            handle: old_handle,
                            focused: false,
                        },
                    );
                }
                if let Some(new_handle) = index.and_then(|i| tiles[i]) {
                    send_accessibility_event(
                        tx,
                        AccessibilityEvent {
                            handle: new_handle,
                            focused: true,
                        },
                    );
                }
            }
        }

        // Settle whatever is still scaled before touching the new target.
        if let Some(previous) = self.current_target {
            animator.begin_scale(
                previous,
                1.0,
                app_settings::UNFOCUS_START_DELAY_MS,
                app_settings::CLICK_ANIM_DURATION_MS,
            );
        }

        if let Some(i) = index {
            let scale = if clicked {
                app_settings::CLICKED_SCALE
            } else if show_focus_scale {
                app_settings::FOCUSED_SCALE
            } else {
                1.0
            };

            if let Some(handle) = tiles[i] {
                animator.begin_scale(handle, scale, 0, app_settings::CLICK_ANIM_DURATION_MS);
                self.current_target = Some(handle);
            }
        }

        self.focus_index = index;
        self.clicked = clicked;
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
