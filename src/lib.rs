// SPDX-License-Identifier: GPL-3.0-only

//! Teleboard - A soft keyboard core for TV-style interfaces
//!
//! This crate provides the core of an on-screen keyboard driven by a remote
//! control or pointer at a distance: key geometry, hit testing with an
//! oversized space key, shift and caps-lock state, long-press accent mini
//! keyboards, and focus scale animations.
//!
//! # Architecture
//!
//! The view never draws. It composes per-key tiles and drives two capability
//! traits — a tile surface and a scale animator — that a platform backend
//! implements against its widget toolkit. Everything above those traits is
//! plain state and arithmetic, testable headless.
//!
//! # Modules
//!
//! - `app_settings`: centralized application constants
//! - `config`: injected user preferences (the enlarge-keyboard toggle)
//! - `diagnostics`: crash-report broadcasts and system log capture
//! - `layout`: JSON layout definitions, flattening, and validation
//! - `view`: the keyboard view core (slots, hit testing, tiles, focus,
//!   mini keyboards, resizing)

pub mod app_settings;
pub mod config;
pub mod diagnostics;
pub mod layout;
pub mod view;

pub use crate::config::{Config, Preferences, SharedConfig};
pub use crate::layout::{Layout, LayoutLibrary};
pub use crate::view::{KeyboardView, ShiftState};

// ============================================================================
// Integration Tests
// ============================================================================
