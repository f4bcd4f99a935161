//! Encoder command construction.

use std::path::Path;

use crate::session::{FrameRate, Session};

/// Default encoder binary name.
pub const DEFAULT_ENCODER: &str = "ffmpeg";

/// Video codecs in fallback priority order.
///
/// H.264 gives the best quality/size tradeoff but is not present in
/// every ffmpeg build; MPEG-4 part 2 is in effectively all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    H264,
    Mpeg4,
}

impl Codec {
    /// Fixed attempt order: high quality first, maximally compatible second.
    pub const FALLBACK_ORDER: [Codec; 2] = [Codec::H264, Codec::Mpeg4];

    /// The ffmpeg `-c:v` selector for this codec.
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            Codec::H264 => "libx264",
            Codec::Mpeg4 => "mpeg4",
        }
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ffmpeg_name())
    }
}

/// A fully specified encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeCommand {
    /// Encoder binary to execute.
    pub program: String,

    /// Argument vector, in exact order.
    pub args: Vec<String>,
}

impl EncodeCommand {
    /// Render the invocation as a single shell-style line for log echoing.
    pub fn shell_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Build the encoder invocation for one attempt.
///
/// Pure and deterministic: identical inputs produce byte-identical
/// commands. Policy is fixed: unconditional overwrite, frames consumed
/// via the zero-padded sequence pattern, pixel format normalized to
/// 4:2:0 so the output plays on the broadest range of devices.
pub fn build_encode_command(
    session: &Session,
    rate: FrameRate,
    codec: Codec,
    output: &Path,
) -> EncodeCommand {
    let args = vec![
        "-y".to_string(),
        "-framerate".to_string(),
        rate.to_string(),
        "-i".to_string(),
        session.frame_pattern().display().to_string(),
        "-c:v".to_string(),
        codec.ffmpeg_name().to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        output.display().to_string(),
    ];

    EncodeCommand {
        program: DEFAULT_ENCODER.to_string(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_deterministic() {
        let session = Session::new("/data/s1");
        let output = session.output_path();
        let a = build_encode_command(&session, FrameRate::new(24), Codec::H264, &output);
        let b = build_encode_command(&session, FrameRate::new(24), Codec::H264, &output);
        assert_eq!(a, b);
        assert_eq!(a.shell_line(), b.shell_line());
    }

    #[test]
    fn test_command_references_pattern_rate_and_output() {
        let session = Session::new("/data/s1");
        let output = session.output_path();
        let cmd = build_encode_command(&session, FrameRate::new(24), Codec::H264, &output);

        assert_eq!(cmd.program, "ffmpeg");
        assert_eq!(cmd.args[0], "-y");
        assert!(cmd.args.contains(&"/data/s1/img_%05d.jpg".to_string()));
        let framerate_idx = cmd.args.iter().position(|a| a == "-framerate").unwrap();
        assert_eq!(cmd.args[framerate_idx + 1], "24");
        assert_eq!(cmd.args.last().unwrap(), "/data/s1/timelapse.mp4");
    }

    #[test]
    fn test_command_normalizes_pixel_format() {
        let session = Session::new("/data/s1");
        let output = session.output_path();
        for codec in Codec::FALLBACK_ORDER {
            let cmd = build_encode_command(&session, FrameRate::default(), codec, &output);
            let idx = cmd.args.iter().position(|a| a == "-pix_fmt").unwrap();
            assert_eq!(cmd.args[idx + 1], "yuv420p");
        }
    }

    #[test]
    fn test_fallback_order_is_quality_first() {
        assert_eq!(Codec::FALLBACK_ORDER[0].ffmpeg_name(), "libx264");
        assert_eq!(Codec::FALLBACK_ORDER[1].ffmpeg_name(), "mpeg4");
    }

    #[test]
    fn test_shell_line_round_trips_args() {
        let session = Session::new("/data/s1");
        let output = session.output_path();
        let cmd = build_encode_command(&session, FrameRate::new(30), Codec::Mpeg4, &output);
        let line = cmd.shell_line();
        assert!(line.starts_with("ffmpeg -y -framerate 30 -i "));
        assert!(line.contains("-c:v mpeg4"));
        assert!(line.ends_with("/data/s1/timelapse.mp4"));
    }
}
