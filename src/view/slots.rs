// SPDX-License-Identifier: GPL-3.0-only

//! The key geometry store.
//!
//! Logical key slots are kept separate from the keys themselves: slots hold
//! indices into an append-only key arena. A mini-keyboard overlay appends the
//! accent keys to the arena and remaps the covered slots, so the base keys are
//! never mutated and dismissal is a cheap reset back to the authoritative
//! layout.

use crate::layout::types::{GridMode, Key};
use crate::layout::Layout;

/// Index into the key arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyId(usize);

/// Per-slot transient state.
///
/// `in_mini_kb` marks a slot currently displaying a mini-keyboard key;
/// `invertible` marks the one slot whose label case flips relative to the
/// keyboard shift state (the first key of an opened mini keyboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    key: KeyId,
    /// Slot currently displays a mini-keyboard key
    pub in_mini_kb: bool,
    /// Shift state swap-cases this slot's label
    pub invertible: bool,
}

/// Ordered logical key slots with grid dimensions for the installed mode.
#[derive(Debug, Default)]
pub struct SlotMap {
    arena: Vec<Key>,
    base_len: usize,
    slots: Vec<Slot>,
    rows: usize,
    cols: usize,
}

impl SlotMap {
    /// Creates an empty store; [`install`](Self::install) populates it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the slot list 1:1 from a layout's key sequence.
    ///
    /// Selects the row/column counts for the requested mode and discards any
    /// overlay state. Visual elements rendered for the previous contents must
    /// be torn down by the caller first.
    pub fn install(&mut self, layout: &Layout, mode: GridMode) {
        let grid = layout.grid(mode);
        self.rows = grid.rows;
        self.cols = grid.cols;

        self.arena = layout.keys.clone();
        self.base_len = self.arena.len();
        self.slots = (0..self.base_len)
            .map(|i| Slot {
                key: KeyId(i),
                in_mini_kb: false,
                invertible: false,
            })
            .collect();
    }

    /// Number of logical slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no layout is installed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grid row count for the installed mode.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid column count for the installed mode.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the key at a logical index, or `None` outside `[0, len)`.
    pub fn key(&self, index: usize) -> Option<&Key> {
        let slot = self.slots.get(index)?;
        self.arena.get(slot.key.0)
    }

    /// Returns the slot state at a logical index.
    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    /// Overlays accent keys onto the contiguous slot range starting at `anchor`.
    ///
    /// Each accent key takes the position and edge flags of the slot it
    /// covers, keeping its own size and content. The covered slots are marked
    /// as mini-keyboard members and only the first is invertible. Returns the
    /// number of slots actually overlaid (less than requested when the run
    /// would leave the slot list).
    pub fn overlay(&mut self, anchor: usize, accents: Vec<Key>) -> usize {
        let mut placed = 0;

        for (i, mut accent) in accents.into_iter().enumerate() {
            let index = anchor + i;
            let Some(slot) = self.slots.get(index).copied() else {
                tracing::warn!("Accent run truncated at slot {} of {}", index, self.len());
                break;
            };
            let base = &self.arena[slot.key.0];

            accent.x = base.x;
            accent.y = base.y;
            accent.edge_flags = base.edge_flags;

            let id = KeyId(self.arena.len());
            self.arena.push(accent);
            self.slots[index] = Slot {
                key: id,
                in_mini_kb: true,
                invertible: i == 0,
            };
            placed += 1;
        }

        placed
    }

    /// Marks a single existing slot as a one-key mini keyboard.
    ///
    /// The slot keeps its key; only the transient flags change.
    pub fn mark_mini(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.in_mini_kb = true;
                slot.invertible = true;
                true
            }
            None => false,
        }
    }

    /// Discards all overlay state, restoring the 1:1 base mapping.
    pub fn clear_overlay(&mut self) {
        self.arena.truncate(self.base_len);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = Slot {
                key: KeyId(i),
                in_mini_kb: false,
                invertible: false,
            };
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{GridDims, KeyCode, SpaceSpan};

    fn test_layout(count: usize, rows: usize, cols: usize) -> Layout {
        let keys = (0..count)
            .map(|i| Key {
                x: (i % cols) as f32 * 10.0,
                y: (i / cols) as f32 * 10.0,
                width: 8.0,
                height: 8.0,
                codes: vec![KeyCode::Character('a')],
                label: Some("a|A".to_string()),
                ..Key::default()
            })
            .collect();

        Layout {
            name: "test".to_string(),
            abc_grid: GridDims { rows, cols },
            num_grid: GridDims { rows: 1, cols: count },
            space: SpaceSpan { index: 0, span: 1 },
            keys,
            shifted: false,
        }
    }

    /// Test 1: Install replaces slots 1:1 and selects mode dimensions
    #[test]
    fn test_install_replaces_slots() {
        let layout = test_layout(6, 2, 3);
        let mut slots = SlotMap::new();

        slots.install(&layout, GridMode::Alphabetic);
        assert_eq!(slots.len(), 6);
        assert_eq!((slots.rows(), slots.cols()), (2, 3));

        slots.install(&layout, GridMode::Numeric);
        assert_eq!((slots.rows(), slots.cols()), (1, 6));

        assert!(slots.key(5).is_some());
        assert!(slots.key(6).is_none(), "Out-of-range index should be None");
    }

    /// Test 2: Overlay copies position and edge flags but keeps accent content
    #[test]
    fn test_overlay_copies_geometry() {
        let layout = test_layout(6, 2, 3);
        let mut slots = SlotMap::new();
        slots.install(&layout, GridMode::Alphabetic);

        let accent = Key {
            x: 999.0,
            y: 999.0,
            width: 20.0,
            height: 20.0,
            label: Some("é".to_string()),
            codes: vec![KeyCode::Character('é')],
            ..Key::default()
        };

        let placed = slots.overlay(2, vec![accent.clone(), accent]);
        assert_eq!(placed, 2);

        let overlaid = slots.key(2).expect("Slot should exist");
        assert_eq!(overlaid.x, 20.0, "Accent should take the base slot's x");
        assert_eq!(overlaid.y, 0.0, "Accent should take the base slot's y");
        assert_eq!(overlaid.width, 20.0, "Accent keeps its own width");
        assert_eq!(overlaid.label.as_deref(), Some("é"));

        let slot = slots.slot(2).unwrap();
        assert!(slot.in_mini_kb);
        assert!(slot.invertible, "First accent slot is invertible");
        let slot = slots.slot(3).unwrap();
        assert!(slot.in_mini_kb);
        assert!(!slot.invertible, "Later accent slots are not invertible");
    }

    /// Test 3: Overlay past the end of the slot list is truncated, not a panic
    #[test]
    fn test_overlay_truncates_at_end() {
        let layout = test_layout(4, 1, 4);
        let mut slots = SlotMap::new();
        slots.install(&layout, GridMode::Alphabetic);

        let accent = Key::default();
        let placed = slots.overlay(3, vec![accent.clone(), accent.clone(), accent]);
        assert_eq!(placed, 1, "Only the in-range slot should be overlaid");
    }

    /// Test 4: Clearing the overlay restores the base mapping element-wise
    #[test]
    fn test_clear_overlay_restores_base() {
        let layout = test_layout(6, 2, 3);
        let mut slots = SlotMap::new();
        slots.install(&layout, GridMode::Alphabetic);

        slots.overlay(1, vec![Key::default(), Key::default()]);
        slots.clear_overlay();

        for i in 0..slots.len() {
            let slot = slots.slot(i).unwrap();
            assert!(!slot.in_mini_kb, "Slot {} should be reset", i);
            assert!(!slot.invertible, "Slot {} should be reset", i);
            assert_eq!(
                slots.key(i),
                layout.keys.get(i),
                "Slot {} should show the base key again",
                i
            );
        }
    }

    /// Test 5: Single-slot mini keyboard marking
    #[test]
    fn test_mark_mini() {
        let layout = test_layout(3, 1, 3);
        let mut slots = SlotMap::new();
        slots.install(&layout, GridMode::Alphabetic);

        assert!(slots.mark_mini(1));
        let slot = slots.slot(1).unwrap();
        assert!(slot.in_mini_kb && slot.invertible);

        assert!(!slots.mark_mini(9), "Out-of-range mark should report false");
    }
}
