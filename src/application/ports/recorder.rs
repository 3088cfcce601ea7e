//! Recording engine port interfaces

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::capture::LiveStream;
use crate::domain::recording::{EncodedChunk, EncodingConfig};

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Encoder unavailable: {0}")]
    EncoderUnavailable(String),

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Invalid recorder transition: cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

/// Chunks produced by a running recorder, in arrival order.
/// The channel closes once `stop` has flushed the last chunk.
pub type ChunkReceiver = mpsc::UnboundedReceiver<EncodedChunk>;

/// Port for creating recorders bound to a live stream
#[async_trait]
pub trait RecordingEngine: Send + Sync {
    /// Create a recorder for `stream` with a fixed encoding configuration.
    async fn create(
        &self,
        stream: &LiveStream,
        config: &EncodingConfig,
    ) -> Result<Box<dyn RecorderHandle>, RecordingError>;
}

/// A single-use recorder.
#[async_trait]
pub trait RecorderHandle: Send + Sync {
    /// Begin encoding.
    ///
    /// # Returns
    /// The chunk channel, or `EncoderUnavailable` when the codec is missing
    async fn start(&mut self) -> Result<ChunkReceiver, RecordingError>;

    /// Finalize encoding. Pending data is sent before the channel closes.
    async fn stop(&mut self) -> Result<(), RecordingError>;
}
