//! FFmpeg-based recording engine adapter
//!
//! Spawns one FFmpeg process per recording that reads the capture sources and
//! streams a WebM container to stdout. Every stdout read becomes one chunk.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::ports::{ChunkReceiver, RecorderHandle, RecordingEngine, RecordingError};
use crate::domain::capture::{CaptureSource, LiveStream};
use crate::domain::recording::{Bitrates, EncodedChunk, EncodingConfig, VideoCodec};

/// Bytes requested per stdout read
const CHUNK_READ_SIZE: usize = 64 * 1024;

/// Target VP8 bitrate
const VIDEO_BITRATE: &str = "2500k";

const AUDIO_ENCODER: &str = "libopus";

fn video_encoder(codec: VideoCodec) -> &'static str {
    match codec {
        VideoCodec::Vp8 => "libvpx",
    }
}

/// True when an `ffmpeg -encoders` listing contains `name`
fn has_encoder(listing: &str, name: &str) -> bool {
    listing
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .any(|encoder| encoder == name)
}

/// Creates FFmpeg recorders
pub struct FfmpegRecordingEngine {
    binary: String,
}

impl FfmpegRecordingEngine {
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Build FFmpeg args for recording `stream` to WebM on stdout
    fn build_ffmpeg_args(
        stream: &LiveStream,
        config: &EncodingConfig,
    ) -> Result<Vec<String>, RecordingError> {
        let constraints = stream.constraints();
        let video = stream
            .video_track()
            .ok_or_else(|| RecordingError::StartFailed("stream has no video track".to_string()))?;

        let input_format = match constraints.source {
            CaptureSource::Screen => "x11grab",
            CaptureSource::Camera => "v4l2",
        };

        let mut args: Vec<String> = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "warning".to_string(),
            "-f".to_string(),
            input_format.to_string(),
            "-framerate".to_string(),
            constraints.frame_rate.to_string(),
            "-video_size".to_string(),
            constraints.video.as_video_size(),
            "-i".to_string(),
            video.label().to_string(),
        ];

        let audio_source = match (stream.audio_track(), config.audio_bitrate) {
            (Some(track), Some(bitrate)) => Some((track.label(), bitrate)),
            _ => None,
        };

        if let Some((source, _)) = audio_source {
            args.extend([
                "-f".to_string(),
                "pulse".to_string(),
                "-i".to_string(),
                source.to_string(),
            ]);
        }

        args.extend([
            "-c:v".to_string(),
            video_encoder(config.video_codec).to_string(),
            "-b:v".to_string(),
            VIDEO_BITRATE.to_string(),
            "-deadline".to_string(),
            "realtime".to_string(),
            "-cpu-used".to_string(),
            "8".to_string(),
        ]);

        match audio_source {
            Some((_, bitrate)) => args.extend([
                "-c:a".to_string(),
                AUDIO_ENCODER.to_string(),
                "-b:a".to_string(),
                bitrate.to_string(),
            ]),
            None => args.push("-an".to_string()),
        }

        args.extend([
            "-f".to_string(),
            config.container.extension().to_string(),
            "pipe:1".to_string(),
        ]);

        Ok(args)
    }
}

impl Default for FfmpegRecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordingEngine for FfmpegRecordingEngine {
    async fn create(
        &self,
        stream: &LiveStream,
        config: &EncodingConfig,
    ) -> Result<Box<dyn RecorderHandle>, RecordingError> {
        if !stream.is_live() {
            return Err(RecordingError::StartFailed(
                "capture stream has already ended".to_string(),
            ));
        }

        let args = Self::build_ffmpeg_args(stream, config)?;
        let mut required = vec![video_encoder(config.video_codec)];
        if args.iter().any(|a| a == AUDIO_ENCODER) {
            required.push(AUDIO_ENCODER);
        }

        Ok(Box::new(FfmpegRecorderHandle {
            binary: self.binary.clone(),
            args,
            required_encoders: required,
            audio_bps: config.audio_bitrate.map(u64::from).unwrap_or(0),
            child: None,
            reader: None,
            started: false,
        }))
    }
}

/// One FFmpeg recording process
pub struct FfmpegRecorderHandle {
    binary: String,
    args: Vec<String>,
    required_encoders: Vec<&'static str>,
    audio_bps: u64,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
    started: bool,
}

impl FfmpegRecorderHandle {
    /// Fail with `EncoderUnavailable` unless every required encoder is built in
    async fn probe_encoders(&self) -> Result<(), RecordingError> {
        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecordingError::EncoderUnavailable(format!("{} not found in PATH", self.binary))
                } else {
                    RecordingError::StartFailed(e.to_string())
                }
            })?;

        let listing = String::from_utf8_lossy(&output.stdout);
        for encoder in &self.required_encoders {
            if !has_encoder(&listing, encoder) {
                return Err(RecordingError::EncoderUnavailable(format!(
                    "{} is not built with {}",
                    self.binary, encoder
                )));
            }
        }
        Ok(())
    }

    fn spawn_ffmpeg(&self) -> Result<Child, RecordingError> {
        let mut command = Command::new(&self.binary);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Stopping is driven by `request_stop`, not by the terminal's SIGINT
        #[cfg(unix)]
        command.process_group(0);

        command
            .spawn()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to start FFmpeg: {}", e)))
    }

    /// Ask FFmpeg to finish the container and exit
    async fn request_stop(child: &mut Child) -> Result<(), RecordingError> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{self, Signal};
            use nix::unistd::Pid;

            if let Some(id) = child.id() {
                signal::kill(Pid::from_raw(id as i32), Signal::SIGINT).map_err(|e| {
                    RecordingError::RecordingFailed(format!("Signal failed: {}", e))
                })?;
            }
        }

        #[cfg(not(unix))]
        {
            use tokio::io::AsyncWriteExt;

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(b"q")
                    .await
                    .map_err(|e| RecordingError::RecordingFailed(e.to_string()))?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl RecorderHandle for FfmpegRecorderHandle {
    async fn start(&mut self) -> Result<ChunkReceiver, RecordingError> {
        if self.started {
            return Err(RecordingError::StartFailed(
                "Recorder was already started".to_string(),
            ));
        }

        self.probe_encoders().await?;

        tracing::debug!(args = ?self.args, "spawning ffmpeg recorder");
        let mut child = self.spawn_ffmpeg()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RecordingError::StartFailed("Failed to capture FFmpeg stdout".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(log_stderr(stderr));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.reader = Some(tokio::spawn(forward_chunks(stdout, tx, self.audio_bps)));
        self.child = Some(child);
        self.started = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), RecordingError> {
        let mut child = self
            .child
            .take()
            .ok_or_else(|| RecordingError::RecordingFailed("No recording in progress".to_string()))?;

        Self::request_stop(&mut child).await?;

        // FFmpeg exits non-zero after SIGINT even when the file is complete
        let status = child
            .wait()
            .await
            .map_err(|e| RecordingError::RecordingFailed(format!("FFmpeg failed: {}", e)))?;
        tracing::debug!(status = %status, "ffmpeg recorder exited");

        if let Some(reader) = self.reader.take() {
            reader
                .await
                .map_err(|e| RecordingError::RecordingFailed(format!("Output reader failed: {}", e)))?;
        }

        Ok(())
    }
}

/// Forward stdout reads as chunks until FFmpeg closes its output
async fn forward_chunks(
    mut stdout: ChildStdout,
    tx: mpsc::UnboundedSender<EncodedChunk>,
    audio_bps: u64,
) {
    let started = Instant::now();
    let mut total_bytes: u64 = 0;
    let mut buf = vec![0u8; CHUNK_READ_SIZE];

    loop {
        match stdout.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                total_bytes += n as u64;
                let secs = started.elapsed().as_secs_f64().max(0.001);
                let total_bps = (total_bytes as f64 * 8.0 / secs) as u64;
                let bitrates = Bitrates {
                    audio_bps,
                    video_bps: total_bps.saturating_sub(audio_bps),
                };
                if tx.send(EncodedChunk::new(buf[..n].to_vec(), bitrates)).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "reading ffmpeg output failed");
                break;
            }
        }
    }
}

async fn log_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!(target: "clipcast::ffmpeg", "{}", line);
    }
}
