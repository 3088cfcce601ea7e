//! Transcoding infrastructure module

mod ffmpeg_engine;

pub use ffmpeg_engine::{FfmpegEngineInstance, FfmpegTranscodingEngine, LogLineSplitter};
