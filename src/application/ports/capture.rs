//! Capture device port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::{CaptureConstraints, LiveStream};
use crate::domain::error::InvalidSelection;

/// Stream acquisition errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Capture permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error(transparent)]
    InvalidSelection(#[from] InvalidSelection),
}

/// Port for opening live capture streams
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Open a display (screen) capture stream.
    ///
    /// # Arguments
    /// * `constraints` - Video size, frame rate and optional audio settings
    ///
    /// # Returns
    /// A live stream whose tracks hold the capture sources
    async fn request_display(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<LiveStream, CaptureError>;

    /// Open a camera capture stream.
    async fn request_camera(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<LiveStream, CaptureError>;
}
