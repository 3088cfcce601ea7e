//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::capture::{
    CapabilityCatalog, Resolution, DEFAULT_FRAME_RATE, DEFAULT_MODE_KEY, DEFAULT_RESOLUTION_KEY,
};
use crate::domain::recording::{Duration, DEFAULT_AUDIO_BITRATE};
use crate::domain::transcode::{TranscodeProfile, DEFAULT_CRF, DEFAULT_PRESET};

/// Default X11 display for screen capture
pub const DEFAULT_DISPLAY: &str = ":0.0";

/// Default V4L2 camera node
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

/// Default PulseAudio source
pub const DEFAULT_AUDIO_SOURCE: &str = "default";

/// Linux capture device configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinuxConfig {
    pub display: Option<String>,
    pub camera_device: Option<String>,
    pub audio_source: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: Option<u32>,
    pub resolution: Option<u32>,
    pub duration: Option<String>,
    pub frame_rate: Option<u32>,
    pub audio_bitrate: Option<u32>,
    pub output_dir: Option<String>,
    pub preset: Option<String>,
    pub crf: Option<u8>,
    pub stall_timeout: Option<String>,
    pub progress: Option<bool>,
    /// Resolution catalog override, each entry as `WxH`
    pub resolutions: Option<Vec<String>>,
    pub linux: Option<LinuxConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            mode: Some(DEFAULT_MODE_KEY),
            resolution: Some(DEFAULT_RESOLUTION_KEY),
            duration: None,
            frame_rate: Some(DEFAULT_FRAME_RATE),
            audio_bitrate: Some(DEFAULT_AUDIO_BITRATE),
            output_dir: None,
            preset: Some(DEFAULT_PRESET.to_string()),
            crf: Some(DEFAULT_CRF),
            stall_timeout: Some(Duration::default_stall_timeout().to_string()),
            progress: Some(true),
            resolutions: None,
            linux: Some(LinuxConfig {
                display: Some(DEFAULT_DISPLAY.to_string()),
                camera_device: Some(DEFAULT_CAMERA_DEVICE.to_string()),
                audio_source: Some(DEFAULT_AUDIO_SOURCE.to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            mode: other.mode.or(self.mode),
            resolution: other.resolution.or(self.resolution),
            duration: other.duration.or(self.duration),
            frame_rate: other.frame_rate.or(self.frame_rate),
            audio_bitrate: other.audio_bitrate.or(self.audio_bitrate),
            output_dir: other.output_dir.or(self.output_dir),
            preset: other.preset.or(self.preset),
            crf: other.crf.or(self.crf),
            stall_timeout: other.stall_timeout.or(self.stall_timeout),
            progress: other.progress.or(self.progress),
            resolutions: other.resolutions.or(self.resolutions),
            linux: Self::merge_linux_config(self.linux, other.linux),
        }
    }

    /// Merge Linux config sections
    fn merge_linux_config(
        base: Option<LinuxConfig>,
        other: Option<LinuxConfig>,
    ) -> Option<LinuxConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(LinuxConfig {
                display: o.display.or(b.display),
                camera_device: o.camera_device.or(b.camera_device),
                audio_source: o.audio_source.or(b.audio_source),
            }),
        }
    }

    pub fn mode_or_default(&self) -> u32 {
        self.mode.unwrap_or(DEFAULT_MODE_KEY)
    }

    pub fn resolution_or_default(&self) -> u32 {
        self.resolution.unwrap_or(DEFAULT_RESOLUTION_KEY)
    }

    pub fn frame_rate_or_default(&self) -> u32 {
        self.frame_rate.unwrap_or(DEFAULT_FRAME_RATE)
    }

    pub fn audio_bitrate_or_default(&self) -> u32 {
        self.audio_bitrate.unwrap_or(DEFAULT_AUDIO_BITRATE)
    }

    pub fn progress_or_default(&self) -> bool {
        self.progress.unwrap_or(true)
    }

    /// Get stall_timeout as parsed Duration, or default if not set/invalid
    pub fn stall_timeout_or_default(&self) -> Duration {
        self.stall_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_stall_timeout)
    }

    /// Output directory; falls back to the user's video dir, then the cwd
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::video_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Transcode profile from preset/crf, defaults for unset values
    pub fn transcode_profile(&self) -> TranscodeProfile {
        TranscodeProfile::new(
            self.preset.as_deref().unwrap_or(DEFAULT_PRESET),
            self.crf.unwrap_or(DEFAULT_CRF),
        )
    }

    /// Catalog from the configured resolution list; unparsable
    /// entries are skipped
    pub fn catalog(&self) -> CapabilityCatalog {
        let resolutions = self
            .resolutions
            .as_ref()
            .map(|list| {
                list.iter()
                    .filter_map(|s| s.parse::<Resolution>().ok())
                    .collect()
            })
            .unwrap_or_default();
        CapabilityCatalog::with_resolutions(resolutions)
    }

    pub fn display_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.display.as_deref())
            .unwrap_or(DEFAULT_DISPLAY)
    }

    pub fn camera_device_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.camera_device.as_deref())
            .unwrap_or(DEFAULT_CAMERA_DEVICE)
    }

    pub fn audio_source_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.audio_source.as_deref())
            .unwrap_or(DEFAULT_AUDIO_SOURCE)
    }
}
