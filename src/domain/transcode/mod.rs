//! Transcode domain module

mod artifact;
mod profile;
mod progress;

pub use artifact::{Artifact, ARTIFACT_TIMESTAMP_FORMAT};
pub use profile::{
    is_valid_preset, TranscodeProfile, DEFAULT_CRF, DEFAULT_PRESET, MAX_CRF, VALID_PRESETS,
};
pub use progress::{frame_percent, parse_frame_line, ProgressTracker, ASSUMED_FRAME_RATE};
