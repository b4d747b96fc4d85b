// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Shared validation rules for `stream.start` and `settings.update`.
//!
//! Both call sites must reject the same malformed input before any state
//! mutation happens (§4.D.2, and the settings-update supplement in
//! SPEC_FULL.md §10.E.3), so the rules live in one place.

use crate::constants::{START_FPS_MAX, START_FPS_MIN, START_RESOLUTION_MAX};
use crate::error::DomainError;

/// A `WxH` resolution string that has already been parsed and range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedResolution {
    pub width: u32,
    pub height: u32,
}

impl ValidatedResolution {
    pub fn as_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Parses and validates a `WxH` resolution string.
///
/// Matches `settings_manager.validate_settings_update`: requires a literal
/// `x` separator, both dimensions positive, and each dimension no larger
/// than [`START_RESOLUTION_MAX`].
pub fn validate_resolution(resolution: &str) -> Result<ValidatedResolution, DomainError> {
    let Some((width_str, height_str)) = resolution.split_once('x') else {
        return Err(DomainError::InvalidConfiguration {
            reason: format!("invalid resolution format: {resolution} (use e.g. '1920x1080')"),
        });
    };

    let parse_dim = |s: &str| -> Result<u32, DomainError> {
        s.parse::<u32>().map_err(|_| DomainError::InvalidConfiguration {
            reason: format!("invalid resolution format: {resolution}"),
        })
    };

    let width = parse_dim(width_str)?;
    let height = parse_dim(height_str)?;

    if width == 0 || height == 0 {
        return Err(DomainError::InvalidConfiguration {
            reason: "resolution dimensions must be positive".into(),
        });
    }
    if width > START_RESOLUTION_MAX || height > START_RESOLUTION_MAX {
        return Err(DomainError::InvalidConfiguration {
            reason: format!("resolution too large (max {START_RESOLUTION_MAX}x{START_RESOLUTION_MAX})"),
        });
    }

    Ok(ValidatedResolution { width, height })
}

/// Validates a frame rate falls within `[START_FPS_MIN, START_FPS_MAX]`.
pub fn validate_fps(fps: u32) -> Result<(), DomainError> {
    if fps < START_FPS_MIN || fps > START_FPS_MAX {
        return Err(DomainError::InvalidConfiguration {
            reason: format!("fps must be between {START_FPS_MIN} and {START_FPS_MAX}"),
        });
    }
    Ok(())
}

/// Validates a stream name is non-empty, matching the original's
/// `"Stream name cannot be empty"` rule.
pub fn validate_stream_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::InvalidConfiguration {
            reason: "stream name cannot be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod validate_tests;
