//! Transcode use case

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use tokio::time::{sleep, Instant};

use crate::domain::recording::{Duration, MediaData};
use crate::domain::transcode::{ProgressTracker, TranscodeProfile};

use super::ports::{TranscodeError, TranscodingEngine};

/// Percent callback, called with values in [0, 100]
pub type PercentCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// How a transcode job reports progress
#[derive(Clone, Default)]
pub enum ProgressReporting {
    /// No progress reports
    #[default]
    Silent,
    /// Non-decreasing percent reports ending with exactly 100
    Percent(PercentCallback),
}

impl ProgressReporting {
    pub fn percent(callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self::Percent(Arc::new(callback))
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Silent)
    }

    fn report(&self, percent: f64) {
        if let Self::Percent(cb) = self {
            cb(percent);
        }
    }
}

/// Re-encodes an assembled recording into the target profile
pub struct Transcoder<T: TranscodingEngine> {
    engine: T,
    profile: TranscodeProfile,
    stall_timeout: Duration,
}

impl<T: TranscodingEngine> Transcoder<T> {
    pub fn new(engine: T, profile: TranscodeProfile) -> Self {
        Self {
            engine,
            profile,
            stall_timeout: Duration::default_stall_timeout(),
        }
    }

    /// Give up when no frame progress is seen for `timeout`
    pub fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = timeout;
        self
    }

    pub fn profile(&self) -> &TranscodeProfile {
        &self.profile
    }

    /// Transcode `input`.
    ///
    /// # Arguments
    /// * `input` - The assembled capture container
    /// * `expected_duration_secs` - Recording length, used to estimate progress
    /// * `progress` - Reporting strategy
    ///
    /// # Returns
    /// The output container tagged with its MIME type
    pub async fn transcode(
        &self,
        input: &MediaData,
        expected_duration_secs: f64,
        progress: &ProgressReporting,
    ) -> Result<MediaData, TranscodeError> {
        let mut instance = self.engine.load().await?;

        let input_name = TranscodeProfile::input_name(input.mime_type());
        instance.write_input_file(&input_name, input.data()).await?;

        let args = self.profile.command(&input_name);
        tracing::info!(
            input = %input.human_readable_size(),
            expected_secs = expected_duration_secs,
            args = ?args,
            "transcode started"
        );

        let mut tracker = ProgressTracker::new(expected_duration_secs);
        let last_progress = Arc::new(Mutex::new(Instant::now()));

        {
            let last_progress_log = Arc::clone(&last_progress);
            let mut on_log = |line: &str| {
                tracing::trace!(target: "clipcast::engine", "{}", line);
                if let Some(percent) = tracker.observe_line(line) {
                    *last_progress_log.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
                    progress.report(percent);
                }
            };

            let run = instance.run(&args, &mut on_log);
            let watchdog = stall_watchdog(Arc::clone(&last_progress), self.stall_timeout.as_std());

            tokio::select! {
                result = run => result?,
                stalled_for = watchdog => {
                    tracing::warn!(stalled_for = %stalled_for, "transcode stalled");
                    return Err(TranscodeError::Timeout { stalled_for });
                }
            }
        }

        let output = instance.read_output_file(&self.profile.output_name()).await?;
        if output.is_empty() {
            return Err(TranscodeError::EngineError("Engine produced an empty output".to_string()));
        }

        progress.report(tracker.finish());

        let output = MediaData::new(output, self.profile.output);
        tracing::info!(output = %output.human_readable_size(), "transcode finished");
        Ok(output)
    }
}

/// Resolves once `last_progress` is older than `window`
async fn stall_watchdog(last_progress: Arc<Mutex<Instant>>, window: StdDuration) -> Duration {
    let poll = (window / 4).max(StdDuration::from_millis(10));
    loop {
        sleep(poll).await;
        let idle = last_progress
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed();
        if idle >= window {
            return Duration::from(idle);
        }
    }
}
