// SPDX-License-Identifier: GPL-3.0-only

//! Label case selection.
//!
//! A key label may encode both cases as `"l|U"` (lowercase half, then
//! uppercase half, separated by a literal `|`). Labels live in an immutable
//! key arena, so every conversion starts from the canonical label and case
//! flips can never compound.

use crate::view::slots::Slot;

/// Computes the effective shift for a slot.
///
/// Inside a mini keyboard, the invertible slot shows the opposite case from
/// what the keyboard shift state dictates: an unshifted keyboard opens a mini
/// keyboard whose first key displays uppercase. The XOR below is
/// correctness-critical and easy to get backwards; keep it exactly as
/// written.
pub fn effective_shift(keyboard_shifted: bool, slot: Slot) -> bool {
    keyboard_shifted ^ (slot.in_mini_kb && slot.invertible)
}

/// Produces the label to display for the given effective shift.
///
/// Dual labels yield the matching half; plain labels are case-folded whole.
pub fn display_label(label: &str, upper: bool) -> String {
    match split_dual(label) {
        Some((lower_half, upper_half)) => {
            if upper {
                upper_half.to_string()
            } else {
                lower_half.to_string()
            }
        }
        None => {
            if upper {
                label.to_uppercase()
            } else {
                label.to_lowercase()
            }
        }
    }
}

/// Splits a dual label into its lowercase and uppercase halves.
///
/// Only labels with exactly two non-empty halves count; anything else (a bare
/// `"|"` key, a trailing separator) falls back to whole-label folding.
fn split_dual(label: &str) -> Option<(&str, &str)> {
    let mut parts = label.split('|');
    let lower_half = parts.next()?;
    let upper_half = parts.next()?;

    if parts.next().is_none() && !lower_half.is_empty() && !upper_half.is_empty() {
        Some((lower_half, upper_half))
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
