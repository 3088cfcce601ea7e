//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with FFmpeg and the filesystem.

pub mod artifact;
pub mod capture;
pub mod config;
pub mod recording;
pub mod transcoding;

// Re-export adapters
pub use artifact::FileArtifactSink;
pub use capture::FfmpegCaptureDevice;
pub use config::XdgConfigStore;
pub use recording::FfmpegRecordingEngine;
pub use transcoding::FfmpegTranscodingEngine;
