//! Artifact delivery port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcode::Artifact;

/// Artifact delivery errors
#[derive(Debug, Clone, Error)]
pub enum ArtifactError {
    #[error("Failed to write artifact: {0}")]
    WriteFailed(String),
}

/// Port for handing finished files to the user
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Deliver the artifact.
    ///
    /// # Returns
    /// Where the artifact ended up (a path for file sinks)
    async fn deliver(&self, artifact: &Artifact) -> Result<String, ArtifactError>;
}
