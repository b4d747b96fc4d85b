// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use super::*;
use yare::parameterized;

#[parameterized(
    ok_hd = { "1920x1080", true },
    ok_vga = { "640x480", true },
    missing_separator = { "1920-1080", false },
    zero_width = { "0x1080", false },
    not_a_number = { "ax1080", false },
    too_large = { "4097x2160", false },
    max_boundary = { "4096x4096", true },
)]
fn resolution_cases(resolution: &str, should_pass: bool) {
    assert_eq!(validate_resolution(resolution).is_ok(), should_pass);
}

#[parameterized(
    min_boundary = { 1, true },
    max_boundary = { 120, true },
    zero = { 0, false },
    too_high = { 121, false },
    typical = { 30, true },
)]
fn fps_cases(fps: u32, should_pass: bool) {
    assert_eq!(validate_fps(fps).is_ok(), should_pass);
}

#[test]
fn validated_resolution_formats_back_to_wxh() {
    let r = validate_resolution("1920x1080").expect("valid");
    assert_eq!(r.as_string(), "1920x1080");
}

#[test]
fn empty_stream_name_is_rejected() {
    assert!(validate_stream_name("").is_err());
    assert!(validate_stream_name("Cam").is_ok());
}
