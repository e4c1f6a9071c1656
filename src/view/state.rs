// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard view orchestrator.
//!
//! [`KeyboardView`] ties the slot store, tile composition, focus control, and
//! the mini-keyboard overlay together over an injected presentation surface.
//! All operations run on the caller's event loop; nothing here blocks or
//! panics on malformed input.

use futures::channel::mpsc;

use crate::app_settings;
use crate::config::Preferences;
use crate::layout::types::{GridMode, Key};
use crate::layout::{Layout, LayoutLibrary};
use crate::view::focus::FocusTracker;
use crate::view::hit::{self, PaddingBox};
use crate::view::mini::MiniKeyboard;
use crate::view::resize::ResizePolicy;
use crate::view::slots::SlotMap;
use crate::view::surface::{AccessibilityEvent, ScaleAnimator, TileHandle, TileSurface};
use crate::view::tile::{compose, ComposeContext, KeyTile};
use crate::view::ShiftState;

/// The keyboard view core, generic over its presentation backend.
pub struct KeyboardView<S: TileSurface + ScaleAnimator> {
    surface: S,
    prefs: Box<dyn Preferences>,
    library: LayoutLibrary,
    layout: Option<Layout>,
    slots: SlotMap,
    tiles: Vec<Option<TileHandle>>,
    shift_state: ShiftState,
    focus: FocusTracker,
    mini: MiniKeyboard,
    resize: ResizePolicy,
    padding: PaddingBox,
    events: Option<mpsc::Sender<AccessibilityEvent>>,
    caps_lock_icon: Option<String>,
    text_color: u32,
    width_factor: f32,
    height_factor: f32,
}

impl<S: TileSurface + ScaleAnimator> KeyboardView<S> {
    /// Creates a view over a surface, popup library, and preference source.
    pub fn new(surface: S, library: LayoutLibrary, prefs: Box<dyn Preferences>) -> Self {
        Self {
            surface,
            prefs,
            library,
            layout: None,
            slots: SlotMap::new(),
            tiles: Vec::new(),
            shift_state: ShiftState::Off,
            focus: FocusTracker::new(),
            mini: MiniKeyboard::new(),
            resize: ResizePolicy::new(),
            padding: PaddingBox::default(),
            events: None,
            caps_lock_icon: None,
            text_color: app_settings::KEY_TEXT_COLOR_DEFAULT,
            width_factor: 1.0,
            height_factor: 1.0,
        }
    }

    /// Sets the channel focus-change notifications are sent on.
    pub fn set_accessibility_sender(&mut self, tx: mpsc::Sender<AccessibilityEvent>) {
        self.events = Some(tx);
    }

    /// Sets the padding around the key area.
    pub fn set_padding(&mut self, padding: PaddingBox) {
        self.padding = padding;
    }

    /// Overrides the icon shown on the shift key while caps lock is engaged.
    pub fn set_caps_lock_icon(&mut self, icon: impl Into<String>) {
        self.caps_lock_icon = Some(icon.into());
    }

    /// Sets the ARGB color key labels are drawn with.
    pub fn set_key_text_color(&mut self, color: u32) {
        self.text_color = color;
    }

    // ========================================================================
    // Layout Installation
    // ========================================================================

    /// Installs a layout for the given mode and renders every key.
    ///
    /// The enlarge-keyboard preference is read fresh on each install. Focus
    /// resets to none; any open mini keyboard is discarded; the shift state
    /// carries over onto the new layout.
    pub fn set_keyboard(&mut self, layout: Layout, mode: GridMode) {
        let prepared = self.resize.prepare(layout, self.prefs.as_ref());
        self.width_factor = prepared.width_factor;
        self.height_factor = prepared.height_factor;

        let mut layout = prepared.layout;
        layout.shifted = self.shift_state.is_shifted();

        self.teardown_tiles();
        self.slots.install(&layout, mode);
        self.mini = MiniKeyboard::new();
        self.focus.reset();
        self.layout = Some(layout);

        tracing::debug!(
            "Installed layout with {} keys ({} x {})",
            self.slots.len(),
            self.slots.rows(),
            self.slots.cols()
        );

        self.render_all();
    }

    /// The installed layout, if any.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Panel scale factors declared by the last install.
    pub fn scale_factors(&self) -> (f32, f32) {
        (self.width_factor, self.height_factor)
    }

    /// Grid row count for the installed mode.
    pub fn row_count(&self) -> usize {
        self.slots.rows()
    }

    /// Grid column count for the installed mode.
    pub fn col_count(&self) -> usize {
        self.slots.cols()
    }

    /// Measured view size: key area extents plus padding.
    pub fn measured_size(&self) -> (f32, f32) {
        let (width, height) = match &self.layout {
            Some(layout) => (layout.total_width(), layout.total_height()),
            None => (0.0, 0.0),
        };
        (
            width + self.padding.left + self.padding.right,
            height + self.padding.top + self.padding.bottom,
        )
    }

    // ========================================================================
    // Shift State
    // ========================================================================

    /// Current shift state.
    pub fn shift_state(&self) -> ShiftState {
        self.shift_state
    }

    /// Returns `true` when labels render uppercase.
    pub fn is_shifted(&self) -> bool {
        self.shift_state.is_shifted()
    }

    /// Changes the shift state, re-rendering every key when it differs.
    pub fn set_shift_state(&mut self, state: ShiftState) {
        if self.shift_state == state {
            return;
        }

        self.shift_state = state;
        if let Some(layout) = &mut self.layout {
            layout.shifted = state.is_shifted();
        }
        self.render_all();
    }

    // ========================================================================
    // Key Access and Hit Testing
    // ========================================================================

    /// Returns the key at a logical index, or `None` for a stale index.
    pub fn key(&self, index: usize) -> Option<&Key> {
        self.slots.key(index)
    }

    /// Returns the currently focused key, if any.
    pub fn focused_key(&self) -> Option<&Key> {
        self.slots.key(self.focus.focus_index()?)
    }

    /// Index of the key under a pointer position.
    ///
    /// Total over all coordinates; see [`hit::nearest_index`].
    pub fn nearest_index(&self, x: f32, y: f32) -> usize {
        let (width, height) = self.measured_size();
        let space = self
            .layout
            .as_ref()
            .map(|layout| layout.space)
            .unwrap_or_default();

        hit::nearest_index(
            x,
            y,
            width,
            height,
            self.padding,
            self.slots.rows(),
            self.slots.cols(),
            space,
            self.slots.len(),
        )
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Currently focused logical index.
    pub fn focus_index(&self) -> Option<usize> {
        self.focus.focus_index()
    }

    /// Moves focus, showing the hover scale.
    pub fn set_focus(&mut self, index: Option<usize>, clicked: bool) {
        self.set_focus_scaled(index, clicked, true);
    }

    /// Moves focus to a grid cell.
    pub fn set_focus_cell(&mut self, row: usize, col: usize, clicked: bool) {
        let index = self.slots.cols() * row + col;
        self.set_focus(Some(index), clicked);
    }

    /// Moves focus with explicit control over the hover scale.
    ///
    /// When the newly focused slot is not part of an open mini keyboard, the
    /// overlay is dismissed as a side effect.
    pub fn set_focus_scaled(&mut self, index: Option<usize>, clicked: bool, show_focus_scale: bool) {
        let changed = self.focus.set_focus(
            index,
            clicked,
            show_focus_scale,
            &self.tiles,
            &mut self.surface,
            self.events.as_mut(),
        );
        if !changed {
            return;
        }

        if let Some(focused) = self.focus.focus_index() {
            let in_mini = self
                .slots
                .slot(focused)
                .is_some_and(|slot| slot.in_mini_kb);
            if !in_mini {
                self.dismiss_mini_keyboard();
            }
        }
    }

    // ========================================================================
    // Mini Keyboard
    // ========================================================================

    /// Returns `true` while a mini keyboard is on screen.
    pub fn mini_keyboard_visible(&self) -> bool {
        self.mini.is_visible()
    }

    /// Slot index where the open accent run begins.
    pub fn base_mini_kb_index(&self) -> Option<usize> {
        self.mini.base_index()
    }

    /// Handles a long press on the focused key.
    ///
    /// Returns `true` if a mini keyboard opened.
    pub fn on_key_long_press(&mut self) -> bool {
        let Some(focus) = self.focus.focus_index() else {
            return false;
        };

        if self.mini.open_for(focus, &mut self.slots, &self.library) {
            self.render_all();
            true
        } else {
            false
        }
    }

    /// Dismisses an open mini keyboard, restoring the base layout.
    ///
    /// Returns `true` if a dismissal actually occurred; callers use this to
    /// decide whether to swallow the triggering input event.
    pub fn dismiss_mini_keyboard(&mut self) -> bool {
        if self.mini.dismiss(&mut self.slots) {
            self.render_all();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Tears down and re-creates every visual element in index order.
    pub fn render_all(&mut self) {
        self.teardown_tiles();

        let count = self.slots.len();
        let mut tiles = Vec::with_capacity(count);
        for index in 0..count {
            let handle = match self.compose_tile(index) {
                Some(tile) => Some(self.surface.attach(tile)),
                None => None,
            };
            tiles.push(handle);
        }
        self.tiles = tiles;

        // The focused slot's element was replaced; keep the animation target
        // pointing at a live handle.
        if let Some(focused) = self.focus.focus_index() {
            if let Some(handle) = self.tiles.get(focused).copied().flatten() {
                self.focus.retarget(handle);
            }
        }
    }

    /// Replaces the visual element for a single slot.
    pub fn render_one(&mut self, index: usize) {
        if index >= self.tiles.len() {
            return;
        }

        if let Some(handle) = self.tiles[index].take() {
            self.surface.cancel_scale(handle);
            self.surface.detach(handle);
        }

        if let Some(tile) = self.compose_tile(index) {
            let handle = self.surface.attach(tile);
            self.tiles[index] = Some(handle);
            if self.focus.focus_index() == Some(index) {
                self.focus.retarget(handle);
            }
        }
    }

    /// Handles to the attached visual elements, in slot order.
    pub fn tile_handles(&self) -> &[Option<TileHandle>] {
        &self.tiles
    }

    /// The presentation surface, for backends that need to flush it.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the presentation surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn compose_tile(&self, index: usize) -> Option<KeyTile> {
        let key = self.slots.key(index)?;
        let slot = self.slots.slot(index)?;

        let ctx = ComposeContext {
            shifted: self.layout.as_ref().is_some_and(|layout| layout.shifted),
            shift_state: self.shift_state,
            mini_keyboard_open: self.mini.is_visible(),
            key_font_size: self.resize.key_font_size(),
            mode_change_font_size: self.resize.mode_change_font_size(),
            padding: self.padding,
            enlarge_keyboard: self.prefs.enlarge_keyboard(),
            space_span: self
                .layout
                .as_ref()
                .map_or(1, |layout| layout.space.span),
            caps_lock_icon: self.caps_lock_icon.as_deref(),
            text_color: self.text_color,
        };

        Some(compose(index, key, slot, &ctx))
    }

    /// Releases every visual element before a rebuild so the surface never
    /// leaks offscreen bitmaps.
    fn teardown_tiles(&mut self) {
        for handle in self.tiles.drain(..).flatten() {
            self.surface.cancel_scale(handle);
            self.surface.detach(handle);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SharedConfig};
    use crate::layout::parse_layout_str;
    use crate::view::surface::HeadlessSurface;
    use crate::view::tile::TileContent;

    fn accents_popup() -> &'static str {
        r#"{
            "name": "accents_a",
            "unit": 50.0,
            "gap": 6.0,
            "rows": [{"keys": [
                {"label": "à|À", "codes": ["à"]},
                {"label": "á|Á", "codes": ["á"]}
            ]}]
        }"#
    }

    fn base_layout() -> Layout {
        // 2x4 grid: letters with one popup key, one shift icon key
        let json = r#"{
            "name": "mini_qwerty",
            "unit": 50.0,
            "gap": 6.0,
            "rows": [
                {"keys": [
                    {"label": "a|A", "codes": ["a"], "popup": "accents_a"},
                    {"label": "b|B", "codes": ["b"]},
                    {"label": "c|C", "codes": ["c"]},
                    {"label": "7", "codes": ["7"]}
                ]},
                {"keys": [
                    {"icon": "keyboard-shift-symbolic", "codes": ["shift"]},
                    {"label": "d|D", "codes": ["d"]},
                    {"label": "e|E", "codes": ["e"]},
                    {"label": "SYM", "codes": ["sym_toggle"]}
                ]}
            ]
        }"#;
        parse_layout_str(json).expect("Layout should parse").into_layout()
    }

    fn library() -> LayoutLibrary {
        let mut library = LayoutLibrary::new();
        library.insert(
            parse_layout_str(accents_popup())
                .expect("Popup should parse")
                .into_layout(),
        );
        library
    }

    fn view() -> KeyboardView<HeadlessSurface> {
        let mut view = KeyboardView::new(
            HeadlessSurface::new(),
            library(),
            Box::new(Config::default()),
        );
        view.set_keyboard(base_layout(), GridMode::Alphabetic);
        view
    }

    fn label_at(view: &KeyboardView<HeadlessSurface>, index: usize) -> String {
        let handle = view.tile_handles()[index].expect("Tile should exist");
        match &view.surface().tile(handle).expect("Tile should be live").content {
            TileContent::Text { text, .. } => text.clone(),
            other => panic!("Expected text tile, got {:?}", other),
        }
    }

    /// Test 1: Install renders one element per key, in slot order
    #[test]
    fn test_install_renders_all_keys() {
        let view = view();
        assert_eq!(view.tile_handles().len(), 8);
        assert_eq!(view.surface().live_count(), 8);
        assert_eq!(label_at(&view, 0), "a");
        assert_eq!(label_at(&view, 7), "SYM");
    }

    /// Test 2: Re-install and shift changes release every old element first
    #[test]
    fn test_rendering_releases_old_elements() {
        let mut view = view();
        view.set_shift_state(ShiftState::On);
        assert_eq!(label_at(&view, 1), "B");

        view.set_keyboard(base_layout(), GridMode::Alphabetic);
        let surface = view.surface();
        assert_eq!(
            surface.attach_count - surface.detach_count,
            surface.live_count(),
            "Every replaced element must have been detached"
        );
        assert_eq!(surface.live_count(), 8);
    }

    /// Test 3: Shift state carries across installs
    #[test]
    fn test_shift_carries_across_install() {
        let mut view = view();
        view.set_shift_state(ShiftState::Locked);
        view.set_keyboard(base_layout(), GridMode::Alphabetic);
        assert_eq!(label_at(&view, 1), "B", "New layout should render shifted");
        assert_eq!(view.shift_state(), ShiftState::Locked);
    }

    /// Test 4: Focus scaling through the view, including clearing focus
    #[test]
    fn test_focus_scaling() {
        let mut view = view();
        view.set_focus(Some(5), false);

        let handle = view.tile_handles()[5].unwrap();
        assert_eq!(
            view.surface().current_scale(handle),
            crate::app_settings::FOCUSED_SCALE
        );

        view.set_focus(None, false);
        assert_eq!(view.surface().current_scale(handle), 1.0);
        assert_eq!(view.focus_index(), None);
    }

    /// Test 5: Long press opens the popup overlay and dims the rest
    #[test]
    fn test_long_press_opens_popup() {
        let mut view = view();
        view.set_focus(Some(0), false);
        assert!(view.on_key_long_press());
        assert!(view.mini_keyboard_visible());
        assert_eq!(view.base_mini_kb_index(), Some(0));

        // Invertible first accent renders uppercase on an unshifted keyboard
        assert_eq!(label_at(&view, 0), "À");
        assert_eq!(label_at(&view, 1), "á");

        let outside = view.tile_handles()[4].unwrap();
        assert_eq!(
            view.surface().tile(outside).unwrap().alpha,
            crate::app_settings::INACTIVE_MINI_KB_ALPHA,
            "Keys outside the overlay render dimmed"
        );
    }

    /// Test 6: Focusing outside the overlay dismisses it
    #[test]
    fn test_focus_outside_dismisses_mini_keyboard() {
        let mut view = view();
        view.set_focus(Some(0), false);
        view.on_key_long_press();
        assert!(view.mini_keyboard_visible());

        // Slot 1 is part of the two-key overlay; focusing it keeps the overlay
        view.set_focus(Some(1), false);
        assert!(view.mini_keyboard_visible());

        view.set_focus(Some(6), false);
        assert!(!view.mini_keyboard_visible(), "Overlay should dismiss");
        assert_eq!(label_at(&view, 0), "a", "Base key should be restored");
    }

    /// Test 7: Long press on a plain key previews its flipped case in place
    #[test]
    fn test_long_press_plain_key_preview() {
        let mut view = view();
        view.set_focus(Some(2), false);
        assert!(view.on_key_long_press());
        assert_eq!(view.base_mini_kb_index(), Some(2));
        assert_eq!(label_at(&view, 2), "C", "Preview shows the flipped case");

        assert!(view.dismiss_mini_keyboard());
        assert_eq!(label_at(&view, 2), "c");
        assert!(!view.dismiss_mini_keyboard(), "Second dismissal reports false");
    }

    /// Test 8: Long press on an icon key is a no-op
    #[test]
    fn test_long_press_icon_key_no_op() {
        let mut view = view();
        view.set_focus(Some(4), false);
        assert!(!view.on_key_long_press());
        assert!(!view.mini_keyboard_visible());
    }

    /// Test 9: Hit testing round-trips key centers through the view
    #[test]
    fn test_nearest_index_round_trip() {
        let view = view();
        for index in 0..8 {
            let key = view.key(index).unwrap();
            let x = key.x + key.width / 2.0;
            let y = key.y + key.height / 2.0;
            assert_eq!(view.nearest_index(x, y), index, "Center of key {}", index);
        }
    }

    /// Test 10: Enlarge preference toggling takes effect on the next install
    #[test]
    fn test_enlarge_toggle_between_installs() {
        let shared = SharedConfig::new(Config::default());
        let mut view = KeyboardView::new(
            HeadlessSurface::new(),
            library(),
            Box::new(shared.clone()),
        );

        view.set_keyboard(base_layout(), GridMode::Alphabetic);
        let plain_width = view.key(0).unwrap().width;
        assert_eq!(view.scale_factors(), (1.0, 1.0));

        shared.set_enlarge_keyboard(true);
        view.set_keyboard(base_layout(), GridMode::Alphabetic);
        let factor = crate::app_settings::ENLARGE_FACTOR;
        assert_eq!(view.key(0).unwrap().width, plain_width * factor);
        assert_eq!(view.scale_factors(), (factor, factor));
    }

    /// Test 11: render_one replaces a single element without touching others
    #[test]
    fn test_render_one_replaces_single_element() {
        let mut view = view();
        let before: Vec<_> = view.tile_handles().to_vec();

        view.set_focus(Some(3), false);
        view.render_one(3);

        let after: Vec<_> = view.tile_handles().to_vec();
        assert_ne!(after[3], before[3], "Slot 3 should get a fresh element");
        for index in [0, 1, 2, 4, 5, 6, 7] {
            assert_eq!(after[index], before[index], "Slot {} untouched", index);
        }
        assert_eq!(view.surface().live_count(), 8);

        // The replacement stays the animation target for the focused slot
        assert_eq!(
            view.surface().current_scale(after[3].unwrap()),
            1.0,
            "A fresh element starts at unit scale"
        );
        view.set_focus(None, false);
        assert_eq!(view.surface().current_scale(after[3].unwrap()), 1.0);

        // Out-of-range render_one is a no-op
        view.render_one(99);
        assert_eq!(view.surface().live_count(), 8);
    }

    /// Test 12: Grid-cell focus resolves through the installed column count
    #[test]
    fn test_set_focus_cell() {
        let mut view = view();
        view.set_focus_cell(1, 2, false);
        assert_eq!(view.focus_index(), Some(6));
    }

    /// Test 13: Stale indices degrade to sentinels instead of panicking
    #[test]
    fn test_total_over_stale_indices() {
        let mut view = view();
        assert!(view.key(99).is_none());
        view.set_focus(Some(99), false);
        assert_eq!(view.focus_index(), None);
        assert_eq!(view.nearest_index(-500.0, 9000.0), 4, "Clamps to an edge key");
    }
}
