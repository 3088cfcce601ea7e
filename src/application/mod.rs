//! Application layer - Use cases and port interfaces
//!
//! Contains the capture pipeline (acquire, record, transcode) and the
//! controller that drives it from a single toggle.

pub mod acquire;
pub mod controller;
pub mod ports;
pub mod session_recorder;
pub mod transcode;

// Re-export use cases
pub use acquire::StreamAcquirer;
pub use controller::{
    ControllerConfig, SessionController, SessionError, SessionReport, ToggleOutcome,
    COMPLETION_DISPLAY,
};
pub use session_recorder::{AssembledCallback, RecorderState, SessionRecorder};
pub use transcode::{PercentCallback, ProgressReporting, Transcoder};
