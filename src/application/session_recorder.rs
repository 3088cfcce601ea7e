//! Session recorder
//!
//! Wraps a live stream into a single start/stop recording. Encoded chunks
//! arrive over the engine's channel and are drained by one task, so they are
//! appended strictly in arrival order and the callback never overlaps itself.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::capture::LiveStream;
use crate::domain::recording::{ChunkBuffer, EncodingConfig, MediaData};

use super::ports::{ChunkReceiver, RecorderHandle, RecordingEngine, RecordingError};

/// Called after every kept chunk with a view of all chunks received so far.
///
/// The view is borrowed, so the callback costs nothing per byte; the
/// recording is concatenated once, by `stop`.
pub type AssembledCallback = Arc<dyn Fn(&ChunkBuffer) + Send + Sync>;

/// Recorder states. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecorderState {
    Idle,
    Recording,
    Stopped,
}

impl RecorderState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recording of one live stream
pub struct SessionRecorder {
    handle: Box<dyn RecorderHandle>,
    stream: LiveStream,
    encoding: EncodingConfig,
    chunks: Arc<Mutex<ChunkBuffer>>,
    state: RecorderState,
    drain: Option<JoinHandle<()>>,
    on_assembled: Option<AssembledCallback>,
}

impl SessionRecorder {
    /// Create a recorder for `stream` through `engine`
    pub async fn create<R>(
        engine: &R,
        stream: LiveStream,
        encoding: EncodingConfig,
        on_assembled: Option<AssembledCallback>,
    ) -> Result<Self, RecordingError>
    where
        R: RecordingEngine + ?Sized,
    {
        let handle = engine.create(&stream, &encoding).await?;
        Ok(Self {
            handle,
            stream,
            encoding,
            chunks: Arc::new(Mutex::new(ChunkBuffer::new(encoding.container))),
            state: RecorderState::Idle,
            drain: None,
            on_assembled,
        })
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn stream(&self) -> &LiveStream {
        &self.stream
    }

    pub fn encoding(&self) -> &EncodingConfig {
        &self.encoding
    }

    /// Begin encoding. On failure the recorder stays idle.
    pub async fn start(&mut self) -> Result<(), RecordingError> {
        if self.state != RecorderState::Idle {
            return Err(RecordingError::InvalidTransition {
                state: self.state.as_str(),
                action: "start",
            });
        }

        let receiver = self.handle.start().await?;
        let drain = tokio::spawn(drain_chunks(
            receiver,
            Arc::clone(&self.chunks),
            self.on_assembled.clone(),
        ));

        self.drain = Some(drain);
        self.state = RecorderState::Recording;
        tracing::info!(mime = %self.encoding.mime_string(), "recording started");
        Ok(())
    }

    /// Finalize encoding and return the assembled container.
    ///
    /// Waits until the engine has flushed its last chunk and the callback has
    /// seen it. Calling this again once stopped returns the same buffer
    /// without invoking the callback.
    pub async fn stop(&mut self) -> Result<MediaData, RecordingError> {
        match self.state {
            RecorderState::Idle => {
                return Err(RecordingError::InvalidTransition {
                    state: self.state.as_str(),
                    action: "stop",
                })
            }
            RecorderState::Stopped => return Ok(self.assembled().await),
            RecorderState::Recording => {}
        }

        self.state = RecorderState::Stopped;

        if let Err(e) = self.handle.stop().await {
            if let Some(drain) = self.drain.take() {
                drain.abort();
            }
            return Err(e);
        }

        if let Some(drain) = self.drain.take() {
            drain
                .await
                .map_err(|e| RecordingError::RecordingFailed(format!("Chunk drain failed: {}", e)))?;
        }

        let assembled = self.assembled().await;
        tracing::info!(size = %assembled.human_readable_size(), "recording stopped");
        Ok(assembled)
    }

    /// Current assembled buffer
    pub async fn assembled(&self) -> MediaData {
        self.chunks.lock().await.assemble()
    }

    /// Number of chunks kept so far
    pub async fn chunk_count(&self) -> usize {
        self.chunks.lock().await.chunk_count()
    }

    /// Drop buffered chunks once the assembled buffer has been consumed
    pub async fn release(&self) {
        self.chunks.lock().await.release();
    }
}

async fn drain_chunks(
    mut receiver: ChunkReceiver,
    chunks: Arc<Mutex<ChunkBuffer>>,
    on_assembled: Option<AssembledCallback>,
) {
    while let Some(chunk) = receiver.recv().await {
        if chunk.is_empty() {
            continue;
        }

        tracing::debug!(
            bytes = chunk.len(),
            audio_bps = chunk.bitrates.audio_bps,
            video_bps = chunk.bitrates.video_bps,
            "chunk received"
        );

        let mut buffer = chunks.lock().await;
        buffer.push(chunk.data);
        if let Some(ref cb) = on_assembled {
            cb(&buffer);
        }
    }
}
