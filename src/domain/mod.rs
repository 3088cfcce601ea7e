//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod recording;
pub mod session;
pub mod transcode;

// Re-export common types
pub use capture::{CapabilityCatalog, CaptureMode, CaptureSource, LiveStream, Resolution, Selection};
pub use config::AppConfig;
pub use error::*;
pub use recording::{Duration, MediaData, MediaMimeType};
pub use session::{SessionLifecycle, SessionState, ToggleLabel};
pub use transcode::{Artifact, TranscodeProfile};
