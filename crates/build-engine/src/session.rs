//! Session and frame-rate model.

use std::path::{Path, PathBuf};

/// Fixed frame file name prefix.
pub const FRAME_PREFIX: &str = "img_";

/// Fixed zero-padded index width.
pub const FRAME_PAD_WIDTH: usize = 5;

/// Fixed frame file extension.
pub const FRAME_EXTENSION: &str = "jpg";

/// Fixed output file name inside the session directory.
pub const OUTPUT_FILENAME: &str = "timelapse.mp4";

/// A session directory holding one frame sequence for one build.
///
/// Frames follow the fixed convention `img_00001.jpg`, `img_00002.jpg`, ...
/// in strictly increasing order. The session is immutable for the
/// duration of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    dir: PathBuf,
}

impl Session {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Session directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The ffmpeg input sequence pattern for this session.
    pub fn frame_pattern(&self) -> PathBuf {
        self.dir.join(format!(
            "{FRAME_PREFIX}%0{FRAME_PAD_WIDTH}d.{FRAME_EXTENSION}"
        ))
    }

    /// Deterministic output artifact path (same directory, fixed name).
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILENAME)
    }
}

/// A validated frames-per-second value, always within [1, 120].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameRate(u32);

impl FrameRate {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 120;
    pub const DEFAULT: u32 = 30;

    /// Clamp a numeric rate into the supported range.
    pub fn new(fps: u32) -> Self {
        Self(fps.clamp(Self::MIN, Self::MAX))
    }

    /// Resolve user input into a valid frame rate.
    ///
    /// Missing or non-numeric input coerces to the default before clamping.
    pub fn resolve(input: Option<&str>) -> Self {
        let fps = input
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(Self::DEFAULT);
        Self::new(fps)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_rate_resolves_numeric_input() {
        assert_eq!(FrameRate::resolve(Some("24")).get(), 24);
        assert_eq!(FrameRate::resolve(Some("120")).get(), 120);
        assert_eq!(FrameRate::resolve(Some("1")).get(), 1);
    }

    #[test]
    fn test_frame_rate_clamps_out_of_range() {
        assert_eq!(FrameRate::resolve(Some("500")).get(), 120);
        assert_eq!(FrameRate::resolve(Some("0")).get(), 1);
    }

    #[test]
    fn test_frame_rate_defaults_missing_or_invalid() {
        assert_eq!(FrameRate::resolve(None).get(), 30);
        assert_eq!(FrameRate::resolve(Some("")).get(), 30);
        assert_eq!(FrameRate::resolve(Some("abc")).get(), 30);
        assert_eq!(FrameRate::resolve(Some("-5")).get(), 30);
        assert_eq!(FrameRate::resolve(Some("12.5")).get(), 30);
    }

    #[test]
    fn test_session_derived_paths() {
        let session = Session::new("/data/s1");
        assert_eq!(
            session.frame_pattern(),
            std::path::PathBuf::from("/data/s1/img_%05d.jpg")
        );
        assert_eq!(
            session.output_path(),
            std::path::PathBuf::from("/data/s1/timelapse.mp4")
        );
    }

    proptest! {
        #[test]
        fn prop_resolved_rate_always_in_range(input in "\\PC*") {
            let rate = FrameRate::resolve(Some(&input)).get();
            prop_assert!((FrameRate::MIN..=FrameRate::MAX).contains(&rate));
        }

        #[test]
        fn prop_numeric_rate_clamped(fps in 0u32..10_000) {
            let rate = FrameRate::resolve(Some(&fps.to_string())).get();
            prop_assert_eq!(rate, fps.clamp(1, 120));
        }
    }
}
