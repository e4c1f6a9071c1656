// SPDX-License-Identifier: GPL-3.0-only

//! Crash reporting and log capture utilities.
//!
//! These are one-shot collaborators the keyboard core never depends on: a
//! broadcast channel for uncaught-error reports and an async tail over the
//! platform log reader. Both degrade silently — a missing log reader or a
//! closed channel is logged, never propagated.
//!
//! # Modules
//!
//! - `crash`: crash-report broadcasts with app metadata
//! - `logtail`: most-recent-lines capture from the system log

pub mod crash;
pub mod logtail;

pub use crash::{AppInfo, CrashBroadcast, CrashReporter, ACTION_UNCAUGHT_ERROR};
pub use logtail::{read_log, read_system_log, MAX_LOG_LINES};
