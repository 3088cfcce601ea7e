//! Target encoding profile for transcoding

use crate::domain::recording::MediaMimeType;

/// x264 presets accepted by the profile
pub const VALID_PRESETS: &[&str] = &[
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
];

pub const DEFAULT_PRESET: &str = "ultrafast";
pub const DEFAULT_CRF: u8 = 27;
pub const MAX_CRF: u8 = 51;

/// Engine-side file names of one job
pub const INPUT_STEM: &str = "input";
pub const OUTPUT_STEM: &str = "output";

/// Check an x264 preset name
pub fn is_valid_preset(preset: &str) -> bool {
    VALID_PRESETS.contains(&preset)
}

/// Re-encode settings: H.264 video at a fast preset and fixed quality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeProfile {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub output: MediaMimeType,
}

impl TranscodeProfile {
    pub fn new(preset: impl Into<String>, crf: u8) -> Self {
        Self {
            preset: preset.into(),
            crf,
            ..Self::default()
        }
    }

    /// Engine input file name for a source container
    pub fn input_name(source: MediaMimeType) -> String {
        format!("{}.{}", INPUT_STEM, source.extension())
    }

    /// Engine output file name
    pub fn output_name(&self) -> String {
        format!("{}.{}", OUTPUT_STEM, self.output.extension())
    }

    /// Engine arguments: decode `input`, re-encode video, write `output`
    pub fn command(&self, input: &str) -> Vec<String> {
        vec![
            "-i".to_string(),
            input.to_string(),
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
            self.output_name(),
        ]
    }
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            output: MediaMimeType::Mp4,
        }
    }
}
