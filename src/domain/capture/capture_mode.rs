//! Capture mode value object

use std::fmt;

use serde::Serialize;

/// Where video is captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    Screen,
    Camera,
}

impl CaptureSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Camera => "camera",
        }
    }
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recording type selected by the user: capture source plus audio flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    ScreenNoAudio,
    ScreenWithAudio,
    CamNoAudio,
    CamWithAudio,
}

impl CaptureMode {
    /// All modes in catalog key order (key 1 first)
    pub const ALL: [CaptureMode; 4] = [
        Self::ScreenNoAudio,
        Self::ScreenWithAudio,
        Self::CamNoAudio,
        Self::CamWithAudio,
    ];

    pub const fn source(&self) -> CaptureSource {
        match self {
            Self::ScreenNoAudio | Self::ScreenWithAudio => CaptureSource::Screen,
            Self::CamNoAudio | Self::CamWithAudio => CaptureSource::Camera,
        }
    }

    pub const fn audio_enabled(&self) -> bool {
        matches!(self, Self::ScreenWithAudio | Self::CamWithAudio)
    }

    pub const fn is_screen(&self) -> bool {
        matches!(self.source(), CaptureSource::Screen)
    }

    /// Human-readable label, as shown in the catalog listing
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ScreenNoAudio => "Screen (no audio)",
            Self::ScreenWithAudio => "Screen with audio",
            Self::CamNoAudio => "Camera (no audio)",
            Self::CamWithAudio => "Camera with audio",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_modes_map_to_screen_source() {
        assert_eq!(CaptureMode::ScreenNoAudio.source(), CaptureSource::Screen);
        assert_eq!(CaptureMode::ScreenWithAudio.source(), CaptureSource::Screen);
        assert!(CaptureMode::ScreenWithAudio.is_screen());
    }

    #[test]
    fn camera_modes_map_to_camera_source() {
        assert_eq!(CaptureMode::CamNoAudio.source(), CaptureSource::Camera);
        assert_eq!(CaptureMode::CamWithAudio.source(), CaptureSource::Camera);
        assert!(!CaptureMode::CamNoAudio.is_screen());
    }

    #[test]
    fn audio_flags() {
        assert!(!CaptureMode::ScreenNoAudio.audio_enabled());
        assert!(CaptureMode::ScreenWithAudio.audio_enabled());
        assert!(!CaptureMode::CamNoAudio.audio_enabled());
        assert!(CaptureMode::CamWithAudio.audio_enabled());
    }
}
