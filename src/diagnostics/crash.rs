// SPDX-License-Identifier: GPL-3.0-only

//! Crash-report broadcasts.
//!
//! On an uncaught error, a [`CrashBroadcast`] carrying the app identity, the
//! error, and recently captured log lines is sent over a channel for an
//! external collector to forward. Delivery is best effort; a full or
//! disconnected channel is logged and dropped.

use futures::channel::mpsc;

/// Action tag carried by uncaught-error broadcasts.
pub const ACTION_UNCAUGHT_ERROR: &str = "app-uncaught-error";

/// Identity of the running application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInfo {
    /// Package name
    pub package: String,
    /// Human-readable version
    pub version_name: String,
    /// Monotonic version code
    pub version_code: u64,
}

impl AppInfo {
    /// Identity of this crate build.
    pub fn current() -> Self {
        Self {
            package: env!("CARGO_PKG_NAME").to_string(),
            version_name: env!("CARGO_PKG_VERSION").to_string(),
            version_code: crate::app_settings::APP_VERSION,
        }
    }
}

/// A crash report ready for an external collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashBroadcast {
    /// Broadcast action tag
    pub action: &'static str,
    /// Package name of the reporting app
    pub app_name: String,
    /// Human-readable version
    pub app_version_name: String,
    /// Monotonic version code
    pub app_version_code: u64,
    /// Short error name
    pub name: String,
    /// Stack trace or error chain
    pub trace: String,
    /// Recently captured log lines
    pub logs: String,
}

/// Sends crash reports stamped with the app identity.
#[derive(Debug)]
pub struct CrashReporter {
    info: AppInfo,
    tx: mpsc::Sender<CrashBroadcast>,
}

impl CrashReporter {
    /// Creates a reporter.
    ///
    /// Absent package metadata is tolerated: the failure is logged and the
    /// reports carry empty defaults instead.
    pub fn new(info: Option<AppInfo>, tx: mpsc::Sender<CrashBroadcast>) -> Self {
        let info = match info {
            Some(info) => info,
            None => {
                tracing::error!("Package metadata unavailable, reporting with empty defaults");
                AppInfo::default()
            }
        };

        Self { info, tx }
    }

    /// Broadcasts a crash report.
    pub fn send_crash(&mut self, name: impl Into<String>, trace: impl Into<String>, logs: impl Into<String>) {
        let broadcast = CrashBroadcast {
            action: ACTION_UNCAUGHT_ERROR,
            app_name: self.info.package.clone(),
            app_version_name: self.info.version_name.clone(),
            app_version_code: self.info.version_code,
            name: name.into(),
            trace: trace.into(),
            logs: logs.into(),
        };

        if let Err(e) = self.tx.try_send(broadcast) {
            tracing::error!("Failed to send crash report: {}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
