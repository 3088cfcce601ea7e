//! Transcoding engine port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::Duration;

/// Transcoding errors
#[derive(Debug, Clone, Error)]
pub enum TranscodeError {
    #[error("Transcoding engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Transcode engine error: {0}")]
    EngineError(String),

    #[error("Transcode timed out: no progress for {stalled_for}")]
    Timeout { stalled_for: Duration },

    #[error("Transcode file error: {0}")]
    FileError(String),
}

/// Port for loading transcoding engines.
/// Every job gets its own freshly loaded instance.
#[async_trait]
pub trait TranscodingEngine: Send + Sync {
    /// Load and initialize an engine instance
    async fn load(&self) -> Result<Box<dyn EngineInstance>, TranscodeError>;
}

/// A loaded engine with a private working area
#[async_trait]
pub trait EngineInstance: Send {
    /// Write `bytes` into the engine's input slot `name`
    async fn write_input_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), TranscodeError>;

    /// Run the engine with `args`, forwarding every log line to `on_log`.
    /// Fails with `EngineError` on a non-zero exit.
    async fn run(
        &mut self,
        args: &[String],
        on_log: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), TranscodeError>;

    /// Read back an output file
    async fn read_output_file(&mut self, name: &str) -> Result<Vec<u8>, TranscodeError>;
}
