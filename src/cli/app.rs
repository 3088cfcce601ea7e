//! Session runners for interactive and one-shot modes

use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::ConfigStore;
use crate::application::{
    ControllerConfig, SessionController, SessionError, SessionReport, StreamAcquirer, Transcoder,
};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::domain::session::{SessionState, ToggleLabel};
use crate::infrastructure::{
    FfmpegCaptureDevice, FfmpegRecordingEngine, FfmpegTranscodingEngine, FileArtifactSink,
    XdgConfigStore,
};

use super::presenter::Presenter;
use super::signals::{SessionSignal, SessionSignalHandler};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Controller wired to the FFmpeg adapters and the terminal presenter
pub type CliController = SessionController<
    FfmpegCaptureDevice,
    FfmpegRecordingEngine,
    FfmpegTranscodingEngine,
    FileArtifactSink,
    Presenter,
>;

/// What to record, and for how long in one-shot mode
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub mode: u32,
    pub resolution: u32,
    /// `Some` runs a single timed recording instead of the toggle loop
    pub duration: Option<Duration>,
}

impl SessionOptions {
    pub fn from_config(config: &AppConfig, duration: Option<Duration>) -> Self {
        Self {
            mode: config.mode_or_default(),
            resolution: config.resolution_or_default(),
            duration,
        }
    }
}

/// Build the controller from merged configuration
pub fn build_controller(config: &AppConfig, presenter: Arc<Presenter>) -> CliController {
    let device = FfmpegCaptureDevice::new(
        config.display_or_default(),
        config.camera_device_or_default(),
        config.audio_source_or_default(),
    );
    let transcoder = Transcoder::new(FfmpegTranscodingEngine::new(), config.transcode_profile())
        .with_stall_timeout(config.stall_timeout_or_default());
    let sink = FileArtifactSink::new(config.output_dir_or_default());

    SessionController::new(
        config.catalog(),
        StreamAcquirer::with_frame_rate(device, config.frame_rate_or_default()),
        FfmpegRecordingEngine::new(),
        transcoder,
        sink,
        presenter,
        ControllerConfig {
            audio_bitrate: config.audio_bitrate_or_default(),
            show_progress: config.progress_or_default(),
        },
    )
}

/// Run a recording session with the merged configuration
pub async fn run_session(config: AppConfig, options: SessionOptions) -> ExitCode {
    let presenter = Arc::new(Presenter::new());
    let controller = build_controller(&config, Arc::clone(&presenter));

    // Reject bad keys before touching any device
    if let Err(e) = controller.catalog().select(options.mode, options.resolution) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    match options.duration {
        Some(duration) => run_timed(&controller, &presenter, options, duration).await,
        None => run_interactive(&controller, &presenter, options).await,
    }
}

/// Toggle loop: Enter starts and stops, Ctrl+C stops and exits
async fn run_interactive(
    controller: &CliController,
    presenter: &Presenter,
    options: SessionOptions,
) -> ExitCode {
    let mut signals = match SessionSignalHandler::with_stdin() {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.toggle_hint(ToggleLabel::RecordNow);

    loop {
        match signals.recv().await {
            Some(SessionSignal::Toggle) => match controller.state().await {
                SessionState::Idle => {
                    if let Err(e) = controller.start(options.mode, options.resolution).await {
                        presenter.error(&e.to_string());
                        presenter.toggle_hint(ToggleLabel::RecordNow);
                    }
                }
                _ => {
                    let (result, shutdown) = finish(controller, presenter, &mut signals).await;
                    report_stop_error(presenter, &result);
                    if shutdown {
                        return exit_code(&result);
                    }
                    presenter.toggle_hint(ToggleLabel::RecordNow);
                }
            },
            Some(SessionSignal::Shutdown) | None => {
                if controller.state().await == SessionState::Recording {
                    let (result, _) = finish(controller, presenter, &mut signals).await;
                    report_stop_error(presenter, &result);
                    return exit_code(&result);
                }
                return ExitCode::from(EXIT_SUCCESS);
            }
        }
    }
}

/// Record for `duration` (or until Ctrl+C), then transcode and exit
async fn run_timed(
    controller: &CliController,
    presenter: &Presenter,
    options: SessionOptions,
    duration: Duration,
) -> ExitCode {
    let (mut signals, _sender) = match SessionSignalHandler::new() {
        Ok(pair) => pair,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = controller.start(options.mode, options.resolution).await {
        presenter.error(&e.to_string());
        return ExitCode::from(start_error_code(&e));
    }

    tokio::select! {
        _ = tokio::time::sleep(duration.as_std()) => {}
        _ = signals.recv() => {
            tracing::debug!("recording cut short by signal");
        }
    }

    let (result, _) = finish(controller, presenter, &mut signals).await;
    report_stop_error(presenter, &result);
    exit_code(&result)
}

/// Stop and transcode, answering signals that arrive meanwhile.
/// Returns the outcome and whether a shutdown was requested.
async fn finish(
    controller: &CliController,
    presenter: &Presenter,
    signals: &mut SessionSignalHandler,
) -> (Result<SessionReport, SessionError>, bool) {
    let stop = controller.stop();
    tokio::pin!(stop);
    let mut shutdown = false;

    loop {
        tokio::select! {
            result = &mut stop => return (result, shutdown),
            signal = signals.recv(), if !shutdown => match signal {
                Some(SessionSignal::Toggle) => presenter.warn("Still processing, please wait"),
                Some(SessionSignal::Shutdown) | None => {
                    presenter.warn("Finishing the current recording before exit");
                    shutdown = true;
                }
            },
        }
    }
}

/// Stop failures from the pipeline are already shown by the view
fn report_stop_error(presenter: &Presenter, result: &Result<SessionReport, SessionError>) {
    match result {
        Ok(report) => tracing::debug!(
            recorded = %report.recorded_size,
            output = %report.output_size,
            elapsed = %report.elapsed,
            "session complete"
        ),
        Err(e @ (SessionError::InvalidTransition(_) | SessionError::TransitionInProgress)) => {
            presenter.error(&e.to_string())
        }
        Err(_) => {}
    }
}

fn start_error_code(error: &SessionError) -> u8 {
    if error.is_usage_error() {
        EXIT_USAGE_ERROR
    } else {
        EXIT_ERROR
    }
}

fn exit_code(result: &Result<SessionReport, SessionError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(_) => ExitCode::from(EXIT_ERROR),
    }
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::InvalidSelection;

    #[test]
    fn options_follow_config() {
        let config = AppConfig {
            mode: Some(3),
            resolution: Some(5),
            ..AppConfig::defaults()
        };
        let options = SessionOptions::from_config(&config, Some(Duration::from_secs(10)));
        assert_eq!(options.mode, 3);
        assert_eq!(options.resolution, 5);
        assert_eq!(options.duration, Some(Duration::from_secs(10)));
    }

    #[test]
    fn options_default_to_catalog_defaults() {
        let options = SessionOptions::from_config(&AppConfig::empty(), None);
        assert_eq!(options.mode, 2);
        assert_eq!(options.resolution, 2);
        assert!(options.duration.is_none());
    }

    #[test]
    fn invalid_selection_is_a_usage_error() {
        let error = SessionError::from(InvalidSelection::UnknownMode { key: 9, max: 4 });
        assert_eq!(start_error_code(&error), EXIT_USAGE_ERROR);
        assert_eq!(start_error_code(&SessionError::TransitionInProgress), EXIT_ERROR);
    }

    #[test]
    fn controller_uses_configured_catalog() {
        let config = AppConfig {
            resolutions: Some(vec!["800x600".to_string(), "640x480".to_string()]),
            ..AppConfig::defaults()
        };
        let controller = build_controller(&config, Arc::new(Presenter::hidden()));
        assert_eq!(controller.catalog().resolution_count(), 2);
        assert!(controller.catalog().select(1, 3).is_err());
    }

    #[tokio::test]
    async fn new_controller_is_idle() {
        let controller = build_controller(&AppConfig::defaults(), Arc::new(Presenter::hidden()));
        assert_eq!(controller.state().await, SessionState::Idle);
    }
}
