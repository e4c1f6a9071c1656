// SPDX-License-Identifier: GPL-3.0-only

//! User configuration for the keyboard view.
//!
//! Preferences are injected into the view as a capability rather than read from
//! global state, so callers decide where the values come from (a settings file,
//! a D-Bus service, a test fixture). The view re-reads the preference on every
//! layout install and on space-key tile composition, so a toggle takes effect
//! without recreating the view.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Read access to user preferences the keyboard view depends on.
pub trait Preferences {
    /// Whether the user asked for an enlarged keyboard.
    fn enlarge_keyboard(&self) -> bool;
}

/// User configuration that persists between application runs.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Config {
    /// Whether key geometry and fonts are scaled up for readability at a distance.
    #[serde(default)]
    pub enlarge_keyboard: bool,
}

impl Preferences for Config {
    fn enlarge_keyboard(&self) -> bool {
        self.enlarge_keyboard
    }
}

/// A shared, mutable handle to a [`Config`].
///
/// The view holds one clone while the settings surface holds another, so a
/// preference toggle is visible to the view on its next read.
#[derive(Debug, Default, Clone)]
pub struct SharedConfig {
    inner: Rc<RefCell<Config>>,
}

impl SharedConfig {
    /// Creates a shared handle around an initial configuration.
    pub fn new(config: Config) -> Self {
        Self {
            inner: Rc::new(RefCell::new(config)),
        }
    }

    /// Updates the enlarge-keyboard preference.
    pub fn set_enlarge_keyboard(&self, enlarge: bool) {
        self.inner.borrow_mut().enlarge_keyboard = enlarge;
    }

    /// Returns a snapshot of the current configuration.
    pub fn snapshot(&self) -> Config {
        self.inner.borrow().clone()
    }
}

impl Preferences for SharedConfig {
    fn enlarge_keyboard(&self) -> bool {
        self.inner.borrow().enlarge_keyboard
    }
}
