//! Recording infrastructure module
//!
//! FFmpeg reads the capture sources and encodes VP8/Opus WebM chunks.

mod ffmpeg;

pub use ffmpeg::{FfmpegRecorderHandle, FfmpegRecordingEngine};
