//! Clipcast - screen and camera clip recorder
//!
//! This crate records the screen or a camera (optionally with audio) into
//! an incrementally delivered WebM stream and transcodes the finished
//! recording to MP4 with FFmpeg.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Capture catalog, recording buffers, session state machine, transcode profile
//! - **Application**: Session controller, recorder, transcoder and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (FFmpeg capture/encode/transcode, files, config)
//! - **CLI**: Command-line interface, argument parsing, toggle input and presentation

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
