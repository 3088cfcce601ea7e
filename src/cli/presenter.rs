//! CLI presenter for output formatting
//!
//! Also the terminal rendition of the session view: the toggle hint, the
//! recorded-size spinner, the transcode progress bar and the completion line.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration as StdDuration;

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::application::ports::SessionView;
use crate::application::COMPLETION_DISPLAY;
use crate::domain::recording::human_readable_size;
use crate::domain::session::ToggleLabel;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            hidden: false,
        }
    }

    /// Presenter whose spinners and bars draw nowhere
    pub fn hidden() -> Self {
        Self {
            spinner: Mutex::new(None),
            hidden: true,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.spinner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn prepare(&self, bar: &ProgressBar) {
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
    }

    fn install(&self, bar: ProgressBar) {
        if let Some(previous) = self.slot().replace(bar) {
            previous.finish_and_clear();
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        self.prepare(&spinner);
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(StdDuration::from_millis(80));
        self.install(spinner);
    }

    /// Start a 0..=100 percent bar
    pub fn start_percent_bar(&self, message: &str) {
        let bar = ProgressBar::new(100);
        self.prepare(&bar);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:20.cyan/white}] {pos:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░ "),
        );
        bar.set_message(message.to_string());
        self.install(bar);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = *self.slot() {
            spinner.set_message(message.to_string());
        }
    }

    /// Move the percent bar
    pub fn set_percent(&self, percent: f64) {
        if let Some(ref bar) = *self.slot() {
            bar.set_position(percent.clamp(0.0, 100.0).round() as u64);
        }
    }

    /// Position of the active bar, if any
    pub fn position(&self) -> Option<u64> {
        self.slot().as_ref().map(ProgressBar::position)
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&self, message: &str) {
        if let Some(spinner) = self.slot().take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&self, message: &str) {
        if let Some(spinner) = self.slot().take() {
            spinner.finish_and_clear();
        }
        self.error(message);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&self) {
        if let Some(spinner) = self.slot().take() {
            spinner.finish_and_clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    /// Show `message` as a transient indicator for `window`
    fn flash(&self, message: &str, window: StdDuration) {
        let indicator = ProgressBar::new_spinner();
        self.prepare(&indicator);
        indicator.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        indicator.set_message(message.to_string());
        indicator.tick();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(window).await;
                    indicator.finish_and_clear();
                });
            }
            Err(_) => indicator.finish_and_clear(),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Prompt for the toggle in its current state
    pub fn toggle_hint(&self, label: ToggleLabel) {
        eprintln!("{} Press Enter to {}", "●".cyan(), label);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner text while recording
pub fn recording_message(bytes: usize) -> String {
    format!("Recording... {}", human_readable_size(bytes))
}

impl SessionView for Presenter {
    fn toggle_changed(&self, label: ToggleLabel) {
        match label {
            ToggleLabel::StopRecording => {
                self.start_spinner(&format!("{} (Enter: {})", recording_message(0), label));
            }
            ToggleLabel::RecordNow => self.spinner_success("Recording stopped"),
        }
    }

    fn recording_buffer(&self, bytes: usize) {
        self.update_spinner(&format!(
            "{} (Enter: {})",
            recording_message(bytes),
            ToggleLabel::StopRecording
        ));
    }

    fn transcode_started(&self, show_percent: bool) {
        if show_percent {
            self.start_percent_bar("Transcoding");
        } else {
            self.start_spinner("Transcoding...");
        }
    }

    fn transcode_progress(&self, percent: f64) {
        self.set_percent(percent);
    }

    fn transcode_complete(&self, location: &str) {
        self.stop_spinner();
        self.flash(&format!("{} Transcoding complete", "✓".green()), COMPLETION_DISPLAY);
        self.success(&format!("Saved {}", location));
    }

    fn session_failed(&self, message: &str) {
        self.spinner_fail(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_message_shows_size() {
        assert_eq!(recording_message(0), "Recording... 0 B");
        assert!(recording_message(2048).contains("KB"));
    }

    #[test]
    fn percent_bar_tracks_progress() {
        let presenter = Presenter::hidden();
        presenter.transcode_started(true);
        presenter.transcode_progress(42.4);
        assert_eq!(presenter.position(), Some(42));
        presenter.transcode_progress(250.0);
        assert_eq!(presenter.position(), Some(100));
    }

    #[test]
    fn completion_clears_active_bar() {
        let presenter = Presenter::hidden();
        presenter.transcode_started(false);
        assert!(presenter.is_active());
        presenter.transcode_complete("/tmp/out.mp4");
        assert!(!presenter.is_active());
    }

    #[test]
    fn toggle_labels_drive_spinner() {
        let presenter = Presenter::hidden();
        presenter.toggle_changed(ToggleLabel::StopRecording);
        assert!(presenter.is_active());
        presenter.recording_buffer(1500);
        presenter.toggle_changed(ToggleLabel::RecordNow);
        assert!(!presenter.is_active());
    }
}
