//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod artifact;
pub mod capture;
pub mod config;
pub mod recorder;
pub mod transcoder;
pub mod view;

// Re-export common types
pub use artifact::{ArtifactError, ArtifactSink};
pub use capture::{CaptureDevice, CaptureError};
pub use config::ConfigStore;
pub use recorder::{ChunkReceiver, RecorderHandle, RecordingEngine, RecordingError};
pub use transcoder::{EngineInstance, TranscodeError, TranscodingEngine};
pub use view::SessionView;
