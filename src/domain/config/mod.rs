//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, LinuxConfig, DEFAULT_AUDIO_SOURCE, DEFAULT_CAMERA_DEVICE, DEFAULT_DISPLAY,
};
