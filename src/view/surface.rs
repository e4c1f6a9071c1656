// SPDX-License-Identifier: GPL-3.0-only

//! Presentation capabilities the keyboard view renders through.
//!
//! The view never touches a real rendering surface. It composes [`KeyTile`]
//! descriptions and hands them to a [`TileSurface`], and drives focus scaling
//! through a [`ScaleAnimator`]. A platform backend implements both against its
//! widget toolkit; tests and the demo binary use [`HeadlessSurface`].
//!
//! Accessibility notifications are fire-and-forget messages on a channel, in
//! the same shape the rest of the application uses for inter-component
//! commands.

use std::collections::HashMap;

use futures::channel::mpsc;

use crate::view::tile::KeyTile;

/// Opaque handle to a visual element owned by a [`TileSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileHandle(pub u64);

/// Attaches and releases per-key visual elements.
///
/// Every attached element owns presentation resources (an offscreen bitmap on
/// real backends), so callers must detach an element before attaching a
/// replacement for the same slot.
pub trait TileSurface {
    /// Creates a visual element for a composed tile and returns its handle.
    fn attach(&mut self, tile: KeyTile) -> TileHandle;

    /// Releases the visual element behind a handle.
    ///
    /// Detaching an unknown handle is a no-op.
    fn detach(&mut self, handle: TileHandle);
}

/// Drives scale animations on visual elements.
///
/// Animations are fire-and-forget: starting a new animation on a handle
/// supersedes any in-flight animation on the same handle.
pub trait ScaleAnimator {
    /// Animates the element toward `scale` after `delay_ms`, over `duration_ms`.
    fn begin_scale(&mut self, handle: TileHandle, scale: f32, delay_ms: u64, duration_ms: u64);

    /// Cancels any in-flight animation on the element.
    fn cancel_scale(&mut self, handle: TileHandle);

    /// Returns the element's current (or target) scale.
    fn current_scale(&self, handle: TileHandle) -> f32;
}

/// A focus change notification for assistive technology.
///
/// Keyed by the visual element so the platform layer can resolve it without
/// consulting keyboard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityEvent {
    /// The visual element whose focus changed
    pub handle: TileHandle,
    /// `true` for focus gained, `false` for focus lost
    pub focused: bool,
}

/// Sends an accessibility event without blocking.
///
/// Delivery is best effort; a full or disconnected channel is logged and
/// otherwise ignored.
pub fn send_accessibility_event(tx: &mut mpsc::Sender<AccessibilityEvent>, event: AccessibilityEvent) {
    if let Err(e) = tx.try_send(event) {
        tracing::error!("Failed to send accessibility event: {}", e);
    }
}

// ============================================================================
// Headless Surface
// ============================================================================

/// In-memory surface used by tests and the demo binary.
///
/// Tracks attached tiles and animation targets so assertions can observe what
/// a real backend would have drawn.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next_handle: u64,
    tiles: HashMap<TileHandle, KeyTile>,
    scales: HashMap<TileHandle, f32>,
    /// Total number of attach calls over the surface's lifetime
    pub attach_count: usize,
    /// Total number of detach calls that released a live element
    pub detach_count: usize,
}

impl HeadlessSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently attached elements.
    pub fn live_count(&self) -> usize {
        self.tiles.len()
    }

    /// Returns the tile behind a handle, if still attached.
    pub fn tile(&self, handle: TileHandle) -> Option<&KeyTile> {
        self.tiles.get(&handle)
    }
}

impl TileSurface for HeadlessSurface {
    fn attach(&mut self, tile: KeyTile) -> TileHandle {
        let handle = TileHandle(self.next_handle);
        self.next_handle += 1;
        self.tiles.insert(handle, tile);
        self.scales.insert(handle, 1.0);
        self.attach_count += 1;
        handle
    }

    fn detach(&mut self, handle: TileHandle) {
        if self.tiles.remove(&handle).is_some() {
            self.detach_count += 1;
        }
        self.scales.remove(&handle);
    }
}

impl ScaleAnimator for HeadlessSurface {
    fn begin_scale(&mut self, handle: TileHandle, scale: f32, _delay_ms: u64, _duration_ms: u64) {
        // Headless animations settle instantly on their target.
        if self.scales.contains_key(&handle) {
            self.scales.insert(handle, scale);
        }
    }

    fn cancel_scale(&mut self, handle: TileHandle) {
        if let Some(scale) = self.scales.get_mut(&handle) {
            *scale = 1.0;
        }
    }

    fn current_scale(&self, handle: TileHandle) -> f32 {
        self.scales.get(&handle).copied().unwrap_or(1.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tile::{KeyTile, TileContent};

    fn blank_tile(index: usize) -> KeyTile {
        KeyTile {
            index,
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            alpha: 255,
            content: TileContent::Blank,
            description: None,
        }
    }

    /// Test 1: Attach and detach keep the live element count balanced
    #[test]
    fn test_headless_attach_detach() {
        let mut surface = HeadlessSurface::new();
        let a = surface.attach(blank_tile(0));
        let b = surface.attach(blank_tile(1));
        assert_eq!(surface.live_count(), 2);
        assert_ne!(a, b, "Handles should be unique");

        surface.detach(a);
        assert_eq!(surface.live_count(), 1);
        assert_eq!(surface.detach_count, 1);

        // Detaching a stale handle is a no-op
        surface.detach(a);
        assert_eq!(surface.detach_count, 1);
    }

    /// Test 2: Scale animations settle instantly and cancel back to unit scale
    #[test]
    fn test_headless_scale_animation() {
        let mut surface = HeadlessSurface::new();
        let handle = surface.attach(blank_tile(0));

        assert_eq!(surface.current_scale(handle), 1.0);
        surface.begin_scale(handle, 1.33, 0, 100);
        assert_eq!(surface.current_scale(handle), 1.33);

        surface.cancel_scale(handle);
        assert_eq!(surface.current_scale(handle), 1.0);
    }

    /// Test 3: Accessibility events flow through the channel, and a closed
    /// channel does not propagate the failure
    #[test]
    fn test_accessibility_event_channel() {
        let (mut tx, mut rx) = mpsc::channel::<AccessibilityEvent>(4);
        let event = AccessibilityEvent {
            handle: TileHandle(7),
            focused: true,
        };

        send_accessibility_event(&mut tx, event);
        assert_eq!(rx.try_next().expect("Should receive").unwrap(), event);

        drop(rx);
        // Must not panic even though the receiver is gone
        send_accessibility_event(&mut tx, event);
    }
}
