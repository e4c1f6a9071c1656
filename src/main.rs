// SPDX-License-Identifier: GPL-3.0-only

//! Teleboard headless demo
//!
//! Loads the embedded default layout into a keyboard view over the headless
//! surface and logs what a platform backend would render. Useful for sanity
//! checking layouts and navigation without a compositor.

use teleboard::layout::types::GridMode;
use teleboard::view::surface::{HeadlessSurface, ScaleAnimator};
use teleboard::{Config, KeyboardView, LayoutLibrary, ShiftState};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("teleboard=info".parse().expect("directive parses")),
        )
        .init();

    let library = LayoutLibrary::embedded();
    let Some(layout) = library.get("qwerty_us").cloned() else {
        tracing::error!("Default layout missing from the embedded library");
        return;
    };

    let mut view = KeyboardView::new(
        HeadlessSurface::new(),
        LayoutLibrary::embedded(),
        Box::new(Config::default()),
    );
    view.set_keyboard(layout, GridMode::Alphabetic);

    let (width, height) = view.measured_size();
    tracing::info!(
        "Installed 'qwerty_us': {} keys on a {}x{} grid, {:.0}x{:.0} px",
        view.tile_handles().len(),
        view.row_count(),
        view.col_count(),
        width,
        height
    );

    // Walk the center of every grid cell and report the space collapse
    let space = view.layout().expect("layout installed").space;
    tracing::info!(
        "Space key occupies logical index {} across {} cells",
        space.index,
        space.span
    );

    view.set_shift_state(ShiftState::On);
    view.set_focus(Some(space.index), false);
    tracing::info!(
        "Focused the space key; focused tile scale is {}",
        view.surface()
            .current_scale(view.tile_handles()[space.index].expect("tile attached"))
    );
}
