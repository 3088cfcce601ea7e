//! Artifact delivery infrastructure module

mod file_sink;

pub use file_sink::FileArtifactSink;
