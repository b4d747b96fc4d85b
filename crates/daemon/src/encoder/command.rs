// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Command-line construction for the encoder subprocess (§4.C).
//!
//! The exact flag layout is not part of the contract (§4.C): only the
//! required inputs (device, resolution, fps, pixel format, stream name,
//! groups) and the resulting NDI-visible stream name are. This lays the
//! flags out the way `ffmpeg`'s V4L2-input/NDI-output muxer expects them.

use exostream_core::{StreamParams, VideoParams};

pub fn build_command_args(video: VideoParams, params: &StreamParams) -> Vec<String> {
    let input_format = if params.raw_input { "yuyv422" } else { "mjpeg" };

    let mut args = vec![
        "-f".into(),
        "v4l2".into(),
        "-input_format".into(),
        input_format.into(),
        "-video_size".into(),
        format!("{}x{}", video.width, video.height),
        "-framerate".into(),
        video.fps.to_string(),
        "-thread_queue_size".into(),
        "512".into(),
        "-i".into(),
        params.device_path.to_string(),
        "-pix_fmt".into(),
        "uyvy422".into(),
        "-f".into(),
        "libndi_newtek".into(),
        "-clock_video".into(),
        "1".into(),
        "-clock_audio".into(),
        "1".into(),
    ];

    if let Some(groups) = &params.groups {
        args.push("-ndi_groups".into());
        args.push(groups.to_string());
    }

    args.push(params.stream_name.to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use exostream_core::test_support::StreamParamsBuilder;

    fn video() -> VideoParams {
        VideoParams {
            width: 1920,
            height: 1080,
            fps: 30,
            bitrate_kbps: None,
            keyframe_interval: None,
        }
    }

    #[test]
    fn builds_input_and_output_flags() {
        let params = StreamParamsBuilder::new().stream_name("Cam").build();
        let args = build_command_args(video(), &params);

        assert!(args.windows(2).any(|w| w == ["-video_size", "1920x1080"]));
        assert!(args.windows(2).any(|w| w == ["-framerate", "30"]));
        assert!(args.windows(2).any(|w| w == ["-i", "/dev/video0"]));
        assert_eq!(args.last().map(String::as_str), Some("Cam"));
    }

    #[test]
    fn raw_input_selects_yuyv_pixel_format() {
        let params = StreamParamsBuilder::new().raw_input(true).build();
        let args = build_command_args(video(), &params);
        assert!(args.windows(2).any(|w| w == ["-input_format", "yuyv422"]));
    }

    #[test]
    fn groups_append_ndi_groups_flag() {
        let params = StreamParamsBuilder::new().groups("studio").build();
        let args = build_command_args(video(), &params);
        assert!(args.windows(2).any(|w| w == ["-ndi_groups", "studio"]));
    }

    #[test]
    fn no_groups_omits_the_flag() {
        let params = StreamParamsBuilder::new().build();
        let args = build_command_args(video(), &params);
        assert!(!args.iter().any(|a| a == "-ndi_groups"));
    }
}
