//! Recording encoder settings

use super::MediaMimeType;

/// Audio bitrate used when the stream carries audio
pub const DEFAULT_AUDIO_BITRATE: u32 = 128_000;

/// Video codec of the capture container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VideoCodec {
    #[default]
    Vp8,
}

impl VideoCodec {
    /// Codec name as used in a MIME `codecs=` parameter
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vp8 => "vp8",
        }
    }
}

/// Fixed encoding configuration for a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConfig {
    pub video_codec: VideoCodec,
    pub container: MediaMimeType,
    /// `None` for video-only streams
    pub audio_bitrate: Option<u32>,
}

impl EncodingConfig {
    /// Configuration for a stream with or without audio
    pub fn for_stream(has_audio: bool, audio_bitrate: u32) -> Self {
        Self {
            video_codec: VideoCodec::Vp8,
            container: MediaMimeType::Webm,
            audio_bitrate: has_audio.then_some(audio_bitrate),
        }
    }

    /// Full MIME string, e.g. `video/webm; codecs=vp8`
    pub fn mime_string(&self) -> String {
        format!("{}; codecs={}", self.container.as_str(), self.video_codec.as_str())
    }
}
