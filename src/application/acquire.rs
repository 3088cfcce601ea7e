//! Stream acquisition use case

use crate::domain::capture::{
    AudioConstraints, CaptureConstraints, CaptureMode, LiveStream, Resolution, DEFAULT_FRAME_RATE,
};
use crate::domain::error::InvalidSelection;

use super::ports::{CaptureDevice, CaptureError};

/// Opens a live stream for a capture mode and resolution
pub struct StreamAcquirer<D: CaptureDevice> {
    device: D,
    frame_rate: u32,
}

impl<D: CaptureDevice> StreamAcquirer<D> {
    /// Create an acquirer capturing at the default frame rate
    pub fn new(device: D) -> Self {
        Self::with_frame_rate(device, DEFAULT_FRAME_RATE)
    }

    pub fn with_frame_rate(device: D, frame_rate: u32) -> Self {
        Self { device, frame_rate }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Build the constraints for a selection
    pub fn constraints(
        &self,
        mode: CaptureMode,
        resolution: Resolution,
    ) -> Result<CaptureConstraints, InvalidSelection> {
        if self.frame_rate == 0 {
            return Err(InvalidSelection::FrameRate(self.frame_rate));
        }
        Ok(CaptureConstraints {
            source: mode.source(),
            video: resolution,
            audio: mode.audio_enabled().then(AudioConstraints::raw),
            frame_rate: self.frame_rate,
        })
    }

    /// Request a stream: display capture for screen modes,
    /// camera capture otherwise.
    pub async fn acquire(
        &self,
        mode: CaptureMode,
        resolution: Resolution,
    ) -> Result<LiveStream, CaptureError> {
        let constraints = self.constraints(mode, resolution)?;

        tracing::debug!(
            source = %constraints.source,
            size = %resolution.as_video_size(),
            audio = constraints.has_audio(),
            frame_rate = constraints.frame_rate,
            "requesting capture stream"
        );

        let stream = if mode.is_screen() {
            self.device.request_display(&constraints).await?
        } else {
            self.device.request_camera(&constraints).await?
        };

        tracing::info!(tracks = stream.tracks().len(), "capture stream acquired");
        Ok(stream)
    }
}
