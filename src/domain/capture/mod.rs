//! Capture domain module

mod capture_mode;
mod catalog;
mod resolution;
mod stream;

pub use capture_mode::{CaptureMode, CaptureSource};
pub use catalog::{
    CapabilityCatalog, CatalogEntry, Selection, DEFAULT_MODE_KEY, DEFAULT_RESOLUTIONS,
    DEFAULT_RESOLUTION_KEY,
};
pub use resolution::Resolution;
pub use stream::{
    AudioConstraints, CaptureConstraints, LiveStream, MediaTrack, TrackKind, DEFAULT_FRAME_RATE,
};
