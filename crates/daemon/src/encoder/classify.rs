// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Stderr line classification (§10.E.6), carried over from the legacy
//! encoder's case-insensitive substring heuristic.

/// Classification of one encoder stderr line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Counts against the stream's error ring and fires `OnError`.
    Error,
    /// Logged at warn level only.
    Warning,
    /// A progress/stats line (`frame=`, `fps=`, `bitrate=`, `speed=`);
    /// logged at debug level to avoid flooding normal logs.
    Progress,
    /// Anything else.
    Info,
}

pub fn classify_stderr_line(line: &str) -> LineClass {
    let lower = line.to_lowercase();
    if lower.contains("error") || lower.contains("failed") || lower.contains("fatal") {
        LineClass::Error
    } else if lower.contains("warning") {
        LineClass::Warning
    } else if ["frame=", "fps=", "bitrate=", "speed="].iter().any(|marker| lower.contains(marker)) {
        LineClass::Progress
    } else {
        LineClass::Info
    }
}
