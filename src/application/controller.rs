//! Session controller
//!
//! Binds the single record/stop toggle to the capture pipeline:
//! acquire a stream, record it, transcode the result and deliver the file.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::capture::{CapabilityCatalog, LiveStream, Selection};
use crate::domain::error::InvalidSelection;
use crate::domain::recording::{
    ChunkBuffer, Duration, EncodingConfig, MediaData, TimingRecord, DEFAULT_AUDIO_BITRATE,
};
use crate::domain::session::{InvalidStateTransition, SessionLifecycle, SessionState, ToggleLabel};
use crate::domain::transcode::Artifact;

use super::acquire::StreamAcquirer;
use super::ports::{
    ArtifactError, ArtifactSink, CaptureDevice, CaptureError, RecordingEngine, RecordingError,
    SessionView, TranscodeError, TranscodingEngine,
};
use super::session_recorder::{AssembledCallback, SessionRecorder};
use super::transcode::{ProgressReporting, Transcoder};

/// How long the completion indicator stays visible
pub const COMPLETION_DISPLAY: StdDuration = StdDuration::from_millis(2500);

/// Errors from the session controller
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidSelection(#[from] InvalidSelection),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidStateTransition),

    #[error("Another start or stop is still in progress")]
    TransitionInProgress,
}

impl SessionError {
    /// The user asked for something that does not exist (bad keys, bad frame rate)
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSelection(_) | Self::Capture(CaptureError::InvalidSelection(_))
        )
    }
}

/// Controller settings
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Audio bitrate for modes with audio
    pub audio_bitrate: u32,
    /// Report transcode percent, or transcode silently
    pub show_progress: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            audio_bitrate: DEFAULT_AUDIO_BITRATE,
            show_progress: true,
        }
    }
}

/// Summary of one completed record/transcode cycle
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Where the artifact was delivered
    pub location: String,
    pub selection: Selection,
    /// Recording length, also the transcoder's expected duration
    pub elapsed: Duration,
    pub recorded_size: String,
    pub output_size: String,
}

/// Result of a toggle
#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    Started(Selection),
    Finished(SessionReport),
}

struct ActiveRecording {
    selection: Selection,
    stream: LiveStream,
    recorder: SessionRecorder,
    timing: TimingRecord,
}

struct CapturedRecording {
    selection: Selection,
    recorder: SessionRecorder,
    media: MediaData,
    elapsed: Duration,
}

#[derive(Default)]
struct SessionSlot {
    lifecycle: SessionLifecycle,
    active: Option<ActiveRecording>,
}

/// One toggle, one pipeline
pub struct SessionController<D, R, T, A, V>
where
    D: CaptureDevice,
    R: RecordingEngine,
    T: TranscodingEngine,
    A: ArtifactSink,
    V: SessionView + 'static,
{
    catalog: CapabilityCatalog,
    acquirer: StreamAcquirer<D>,
    engine: R,
    transcoder: Transcoder<T>,
    sink: A,
    view: Arc<V>,
    config: ControllerConfig,
    transition: Mutex<()>,
    slot: Mutex<SessionSlot>,
}

impl<D, R, T, A, V> SessionController<D, R, T, A, V>
where
    D: CaptureDevice,
    R: RecordingEngine,
    T: TranscodingEngine,
    A: ArtifactSink,
    V: SessionView + 'static,
{
    pub fn new(
        catalog: CapabilityCatalog,
        acquirer: StreamAcquirer<D>,
        engine: R,
        transcoder: Transcoder<T>,
        sink: A,
        view: Arc<V>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            catalog,
            acquirer,
            engine,
            transcoder,
            sink,
            view,
            config,
            transition: Mutex::new(()),
            slot: Mutex::new(SessionSlot::default()),
        }
    }

    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    pub async fn state(&self) -> SessionState {
        self.slot.lock().await.lifecycle.state()
    }

    /// Press the toggle with the current selection keys.
    ///
    /// Idle starts a recording, Recording stops it and runs the transcode.
    /// Pressing while processing fails with `InvalidTransition`.
    pub async fn toggle(&self, mode_key: u32, resolution_key: u32) -> Result<ToggleOutcome, SessionError> {
        match self.state().await {
            SessionState::Idle => self.start(mode_key, resolution_key).await.map(ToggleOutcome::Started),
            SessionState::Recording => self.stop().await.map(ToggleOutcome::Finished),
            SessionState::Processing => Err(InvalidStateTransition {
                current_state: SessionState::Processing,
                action: "toggle".to_string(),
            }
            .into()),
        }
    }

    /// Validate the selection, acquire a stream and start recording it.
    ///
    /// Any failure leaves the controller idle with no open stream.
    pub async fn start(&self, mode_key: u32, resolution_key: u32) -> Result<Selection, SessionError> {
        let _guard = self.lock_transition()?;

        let selection = self.catalog.select(mode_key, resolution_key)?;
        self.slot.lock().await.lifecycle.ensure_idle("start recording")?;

        tracing::info!(
            mode = selection.mode.label(),
            resolution = %selection.resolution,
            "starting session"
        );

        let stream = self.acquirer.acquire(selection.mode, selection.resolution).await?;

        let recorder = match self.start_recorder(&stream).await {
            Ok(recorder) => recorder,
            Err(e) => {
                let stopped = stream.stop_tracks();
                tracing::debug!(tracks = stopped, "released stream after failed start");
                return Err(e);
            }
        };

        {
            let mut slot = self.slot.lock().await;
            slot.lifecycle.start_recording()?;
            slot.active = Some(ActiveRecording {
                selection,
                stream,
                recorder,
                timing: TimingRecord::start(),
            });
        }

        self.view.toggle_changed(ToggleLabel::StopRecording);
        Ok(selection)
    }

    /// Stop the recording, transcode it and deliver the artifact.
    ///
    /// A transcode or delivery failure returns the controller to idle so a
    /// new recording can be started.
    pub async fn stop(&self) -> Result<SessionReport, SessionError> {
        let captured = {
            let _guard = self.lock_transition()?;
            self.stop_recording().await?
        };
        self.process(captured).await
    }

    fn lock_transition(&self) -> Result<MutexGuard<'_, ()>, SessionError> {
        self.transition
            .try_lock()
            .map_err(|_| SessionError::TransitionInProgress)
    }

    async fn start_recorder(&self, stream: &LiveStream) -> Result<SessionRecorder, SessionError> {
        let encoding = EncodingConfig::for_stream(
            stream.constraints().has_audio(),
            self.config.audio_bitrate,
        );

        let view = Arc::clone(&self.view);
        let on_assembled: AssembledCallback =
            Arc::new(move |buffer: &ChunkBuffer| view.recording_buffer(buffer.total_bytes()));

        let mut recorder =
            SessionRecorder::create(&self.engine, stream.clone(), encoding, Some(on_assembled))
                .await?;
        recorder.start().await?;
        Ok(recorder)
    }

    async fn stop_recording(&self) -> Result<CapturedRecording, SessionError> {
        let mut active = {
            let mut slot = self.slot.lock().await;
            slot.lifecycle.stop_recording()?;
            match slot.active.take() {
                Some(active) => active,
                None => {
                    slot.lifecycle.complete_processing()?;
                    return Err(InvalidStateTransition {
                        current_state: SessionState::Idle,
                        action: "stop recording".to_string(),
                    }
                    .into());
                }
            }
        };

        let stopped = active.stream.stop_tracks();
        tracing::debug!(tracks = stopped, "stream tracks stopped");

        let stopped = active.recorder.stop().await;
        active.timing.stop();
        self.view.toggle_changed(ToggleLabel::RecordNow);

        let media = match stopped {
            Ok(media) => media,
            Err(e) => {
                self.fail(&active.recorder, &e.to_string()).await;
                return Err(e.into());
            }
        };

        let elapsed = active.timing.elapsed();
        tracing::info!(elapsed = %elapsed, size = %media.human_readable_size(), "recording captured");

        Ok(CapturedRecording {
            selection: active.selection,
            recorder: active.recorder,
            media,
            elapsed,
        })
    }

    async fn process(&self, captured: CapturedRecording) -> Result<SessionReport, SessionError> {
        let reporting = if self.config.show_progress {
            let view = Arc::clone(&self.view);
            ProgressReporting::percent(move |percent| view.transcode_progress(percent))
        } else {
            ProgressReporting::Silent
        };

        self.view.transcode_started(!reporting.is_silent());

        let delivered = self
            .transcode_and_deliver(&captured.media, captured.elapsed.as_secs_f64(), &reporting)
            .await;

        let (location, output) = match delivered {
            Ok(delivered) => delivered,
            Err(e) => {
                self.fail(&captured.recorder, &e.to_string()).await;
                return Err(e);
            }
        };

        captured.recorder.release().await;
        self.slot.lock().await.lifecycle.complete_processing()?;
        self.view.transcode_complete(&location);

        Ok(SessionReport {
            location,
            selection: captured.selection,
            elapsed: captured.elapsed,
            recorded_size: captured.media.human_readable_size(),
            output_size: output.human_readable_size(),
        })
    }

    async fn transcode_and_deliver(
        &self,
        media: &MediaData,
        expected_secs: f64,
        reporting: &ProgressReporting,
    ) -> Result<(String, MediaData), SessionError> {
        let output = self.transcoder.transcode(media, expected_secs, reporting).await?;
        let artifact = Artifact::completed_now(output.clone());
        let location = self.sink.deliver(&artifact).await?;
        tracing::info!(location = %location, "artifact delivered");
        Ok((location, output))
    }

    /// Release buffers and return to idle after a failed stop or transcode
    async fn fail(&self, recorder: &SessionRecorder, message: &str) {
        recorder.release().await;
        {
            let mut slot = self.slot.lock().await;
            if slot.lifecycle.is_processing() {
                let _ = slot.lifecycle.complete_processing();
            }
        }
        tracing::warn!(error = %message, "session failed");
        self.view.session_failed(message);
    }
}
