// SPDX-License-Identifier: GPL-3.0-only

//! Most-recent-lines capture from the system log.
//!
//! Shells out to the platform's log reader and keeps only the tail, so crash
//! reports carry recent context without unbounded buffers. Failures produce
//! an empty capture, never an error.

use std::collections::VecDeque;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Maximum number of log lines retained by a capture.
pub const MAX_LOG_LINES: usize = 150;

/// Default platform log reader invocation.
const SYSTEM_LOG_COMMAND: &str = "journalctl";
const SYSTEM_LOG_ARGS: &[&str] = &["--no-pager", "-b"];

/// Captures the tail of the platform log.
pub async fn read_system_log() -> String {
    read_log(SYSTEM_LOG_COMMAND, SYSTEM_LOG_ARGS).await
}

/// Runs a log reader command and returns its most recent lines.
///
/// At most [`MAX_LOG_LINES`] lines are kept, each newline-terminated. A
/// command that cannot be spawned or read yields an empty string.
pub async fn read_log(command: &str, args: &[&str]) -> String {
    let child = Command::new(command)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!("Failed to spawn log reader '{}': {}", command, e);
            return String::new();
        }
    };

    let Some(stdout) = child.stdout.take() else {
        return String::new();
    };

    let mut lines = BufReader::new(stdout).lines();
    let mut tail: VecDeque<String> = VecDeque::with_capacity(MAX_LOG_LINES);

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tail.len() == MAX_LOG_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Failed reading log output: {}", e);
                break;
            }
        }
    }

    // Reap the child so it does not linger as a zombie.
    if let Err(e) = child.wait().await {
        tracing::debug!("Log reader did not exit cleanly: {}", e);
    }

    let mut capture = String::new();
    for line in tail {
        capture.push_str(&line);
        capture.push('\n');
    }
    capture
}

// ============================================================================
// Tests
// ============================================================================
