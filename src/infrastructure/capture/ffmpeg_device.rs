//! FFmpeg capture device adapter
//!
//! Screens are grabbed from an X11 display, cameras from V4L2 device nodes
//! and audio from a PulseAudio source. This adapter only checks that the
//! sources are usable and describes them as tracks; the recording engine
//! opens them when encoding starts.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{CaptureDevice, CaptureError};
use crate::domain::capture::{CaptureConstraints, LiveStream, MediaTrack, TrackKind};
use crate::domain::config::{DEFAULT_AUDIO_SOURCE, DEFAULT_CAMERA_DEVICE, DEFAULT_DISPLAY};

/// Capture sources backed by FFmpeg input devices
#[derive(Debug, Clone)]
pub struct FfmpegCaptureDevice {
    display: String,
    camera_device: String,
    audio_source: String,
}

impl FfmpegCaptureDevice {
    pub fn new(
        display: impl Into<String>,
        camera_device: impl Into<String>,
        audio_source: impl Into<String>,
    ) -> Self {
        Self {
            display: display.into(),
            camera_device: camera_device.into(),
            audio_source: audio_source.into(),
        }
    }

    /// Use `$DISPLAY` when set, the default display otherwise
    pub fn from_env() -> Self {
        let display = std::env::var("DISPLAY").unwrap_or_else(|_| DEFAULT_DISPLAY.to_string());
        Self::new(display, DEFAULT_CAMERA_DEVICE, DEFAULT_AUDIO_SOURCE)
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn camera_device(&self) -> &str {
        &self.camera_device
    }

    pub fn audio_source(&self) -> &str {
        &self.audio_source
    }

    fn with_audio(&self, constraints: &CaptureConstraints, video: MediaTrack) -> LiveStream {
        let mut tracks = vec![video];
        if constraints.has_audio() {
            tracks.push(MediaTrack::new(TrackKind::Audio, self.audio_source.clone()));
        }
        LiveStream::new(*constraints, tracks)
    }

    /// Camera nodes must exist and be readable by this user
    async fn check_camera(path: &Path) -> Result<(), CaptureError> {
        let metadata = fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => permission_denied(path),
            _ => CaptureError::DeviceUnavailable(format!("{}: {}", path.display(), e)),
        })?;

        if metadata.is_dir() {
            return Err(CaptureError::DeviceUnavailable(format!(
                "{} is not a device",
                path.display()
            )));
        }

        fs::File::open(path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => permission_denied(path),
            _ => CaptureError::DeviceUnavailable(format!("{}: {}", path.display(), e)),
        })?;

        Ok(())
    }
}

impl Default for FfmpegCaptureDevice {
    fn default() -> Self {
        Self::from_env()
    }
}

fn permission_denied(path: &Path) -> CaptureError {
    CaptureError::PermissionDenied(format!(
        "cannot read {} (is your user in the 'video' group?)",
        path.display()
    ))
}

#[async_trait]
impl CaptureDevice for FfmpegCaptureDevice {
    async fn request_display(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<LiveStream, CaptureError> {
        if self.display.trim().is_empty() {
            return Err(CaptureError::DeviceUnavailable(
                "no X11 display configured".to_string(),
            ));
        }

        tracing::debug!(display = %self.display, "display capture granted");
        let video = MediaTrack::new(TrackKind::Video, self.display.clone());
        Ok(self.with_audio(constraints, video))
    }

    async fn request_camera(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<LiveStream, CaptureError> {
        Self::check_camera(Path::new(&self.camera_device)).await?;

        tracing::debug!(device = %self.camera_device, "camera capture granted");
        let video = MediaTrack::new(TrackKind::Video, self.camera_device.clone());
        Ok(self.with_audio(constraints, video))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::{AudioConstraints, CaptureSource, Resolution};

    fn constraints(source: CaptureSource, audio: bool) -> CaptureConstraints {
        CaptureConstraints {
            source,
            video: Resolution::new(640, 360).unwrap(),
            audio: audio.then(AudioConstraints::raw),
            frame_rate: 30,
        }
    }

    #[tokio::test]
    async fn display_stream_carries_display_and_audio_source() {
        let device = FfmpegCaptureDevice::new(":1", "/dev/video9", "mic");
        let stream = device
            .request_display(&constraints(CaptureSource::Screen, true))
            .await
            .unwrap();

        assert_eq!(stream.video_track().unwrap().label(), ":1");
        assert_eq!(stream.audio_track().unwrap().label(), "mic");
    }

    #[tokio::test]
    async fn video_only_stream_has_no_audio_track() {
        let device = FfmpegCaptureDevice::new(":1", "/dev/video9", "mic");
        let stream = device
            .request_display(&constraints(CaptureSource::Screen, false))
            .await
            .unwrap();
        assert!(stream.audio_track().is_none());
    }

    #[tokio::test]
    async fn empty_display_is_unavailable() {
        let device = FfmpegCaptureDevice::new("", DEFAULT_CAMERA_DEVICE, DEFAULT_AUDIO_SOURCE);
        let err = device
            .request_display(&constraints(CaptureSource::Screen, false))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::DeviceUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_camera_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("video42");
        let device = FfmpegCaptureDevice::new(":0", missing.to_string_lossy(), "default");

        let err = device
            .request_camera(&constraints(CaptureSource::Camera, false))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::DeviceUnavailable(_)));
    }

    #[tokio::test]
    async fn directory_is_not_a_camera() {
        let dir = tempfile::tempdir().unwrap();
        let device = FfmpegCaptureDevice::new(":0", dir.path().to_string_lossy(), "default");

        let err = device
            .request_camera(&constraints(CaptureSource::Camera, false))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::DeviceUnavailable(_)));
    }

    #[tokio::test]
    async fn readable_node_is_granted() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let device = FfmpegCaptureDevice::new(":0", file.path().to_string_lossy(), "default");

        let stream = device
            .request_camera(&constraints(CaptureSource::Camera, true))
            .await
            .unwrap();
        assert_eq!(stream.tracks().len(), 2);
        assert!(stream.is_live());
    }
}
