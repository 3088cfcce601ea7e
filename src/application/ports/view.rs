//! Session view port interface
//!
//! The user-facing surface of a recording session: one toggle control,
//! a progress indicator and a completion indicator.

use crate::domain::session::ToggleLabel;

/// Port for reflecting session state to the user
pub trait SessionView: Send + Sync {
    /// The toggle control changed label
    fn toggle_changed(&self, label: ToggleLabel);

    /// The recorder delivered a new assembled buffer of `bytes` total
    fn recording_buffer(&self, _bytes: usize) {}

    /// Transcoding began; `show_percent` is false for the silent strategy
    fn transcode_started(&self, show_percent: bool);

    /// Transcode progress in percent, [0, 100]
    fn transcode_progress(&self, percent: f64);

    /// Transcoding finished and the artifact was delivered to `location`
    fn transcode_complete(&self, location: &str);

    /// A step failed; the session is back to idle
    fn session_failed(&self, message: &str);
}
