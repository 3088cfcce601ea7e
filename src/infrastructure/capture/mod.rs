//! Capture infrastructure module

mod ffmpeg_device;

pub use ffmpeg_device::FfmpegCaptureDevice;
