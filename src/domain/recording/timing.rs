//! Recording timing record

use tokio::time::Instant;

use super::Duration;

/// Start/stop timestamps of one recording.
///
/// The elapsed time is only an estimate used to normalise transcode
/// progress, never a deadline.
#[derive(Debug, Clone, Copy)]
pub struct TimingRecord {
    started_at: Instant,
    stopped_at: Option<Instant>,
}

impl TimingRecord {
    /// Start timing now
    pub fn start() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(instant: Instant) -> Self {
        Self {
            started_at: instant,
            stopped_at: None,
        }
    }

    /// Record the stop time. Only the first call has an effect.
    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn stop_at(&mut self, instant: Instant) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(instant);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Time between start and stop, or until now while still running
    pub fn elapsed(&self) -> Duration {
        let end = self.stopped_at.unwrap_or_else(Instant::now);
        Duration::from(end.saturating_duration_since(self.started_at))
    }
}
