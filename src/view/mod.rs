// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard view core.
//!
//! This module owns everything between an installed layout and the visual
//! elements a backend draws: the slot store with its key arena, label case
//! selection, pointer-to-index hit testing, tile composition, focus and scale
//! animation control, mini-keyboard overlays, and enlarged-keyboard scaling.
//!
//! # Modules
//!
//! - `slots`: logical key slots over an immutable key arena
//! - `case`: label case selection (the effective-shift XOR)
//! - `hit`: pointer/remote coordinate to logical index mapping
//! - `tile`: per-key tile composition rules
//! - `surface`: presentation capability traits and the headless test surface
//! - `focus`: focus tracking and scale animation control
//! - `mini`: long-press accent overlays
//! - `resize`: enlarged-keyboard scaling
//! - `state`: the [`KeyboardView`](state::KeyboardView) orchestrator

pub mod case;
pub mod focus;
pub mod hit;
pub mod mini;
pub mod resize;
pub mod slots;
pub mod state;
pub mod surface;
pub mod tile;

pub use focus::FocusTracker;
pub use hit::PaddingBox;
pub use mini::MiniKeyboard;
pub use resize::{ResizePolicy, ScaledLayout};
pub use slots::{Slot, SlotMap};
pub use state::KeyboardView;
pub use surface::{
    AccessibilityEvent, HeadlessSurface, ScaleAnimator, TileHandle, TileSurface,
};
pub use tile::{ComposeContext, FontWeight, KeyTile, TileContent};

/// Keyboard shift state.
///
/// Drives both label case selection and which shift-key icon variant is
/// drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    /// Lowercase labels
    #[default]
    Off,
    /// Uppercase until the next key press
    On,
    /// Uppercase until explicitly released
    Locked,
}

impl ShiftState {
    /// Returns `true` when labels render uppercase.
    pub fn is_shifted(&self) -> bool {
        matches!(self, ShiftState::On | ShiftState::Locked)
    }
}
