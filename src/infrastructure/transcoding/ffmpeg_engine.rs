//! FFmpeg transcoding engine adapter
//!
//! Each loaded instance owns a private temporary directory. Input and output
//! files live there and disappear with the instance.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::application::ports::{EngineInstance, TranscodeError, TranscodingEngine};

/// Splits a byte stream into log lines on `\r` or `\n`.
///
/// FFmpeg rewrites its `frame=` status line with carriage returns, so
/// splitting on newlines alone would hold back every progress update.
#[derive(Debug, Default)]
pub struct LogLineSplitter {
    pending: Vec<u8>,
}

impl LogLineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning every completed non-empty line
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &b in bytes {
            if b == b'\r' || b == b'\n' {
                if let Some(line) = self.take_line() {
                    lines.push(line);
                }
            } else {
                self.pending.push(b);
            }
        }
        lines
    }

    /// Flush the trailing partial line, if any
    pub fn finish(&mut self) -> Option<String> {
        self.take_line()
    }

    fn take_line(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).trim().to_string();
        self.pending.clear();
        (!line.is_empty()).then_some(line)
    }
}

/// Loads FFmpeg-backed engine instances
pub struct FfmpegTranscodingEngine {
    binary: String,
}

impl FfmpegTranscodingEngine {
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check that the binary runs at all
    async fn verify_binary(&self) -> Result<(), TranscodeError> {
        let status = Command::new(&self.binary)
            .args(["-hide_banner", "-version"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::EngineUnavailable(format!("{} not found in PATH", self.binary))
                } else {
                    TranscodeError::EngineUnavailable(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(TranscodeError::EngineUnavailable(format!(
                "{} -version exited with {}",
                self.binary, status
            )));
        }
        Ok(())
    }
}

impl Default for FfmpegTranscodingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscodingEngine for FfmpegTranscodingEngine {
    async fn load(&self) -> Result<Box<dyn EngineInstance>, TranscodeError> {
        self.verify_binary().await?;

        let workdir = tempfile::Builder::new()
            .prefix("clipcast-")
            .tempdir()
            .map_err(|e| TranscodeError::FileError(format!("Failed to create work dir: {}", e)))?;

        tracing::debug!(workdir = %workdir.path().display(), "transcoding engine loaded");
        Ok(Box::new(FfmpegEngineInstance {
            binary: self.binary.clone(),
            workdir,
        }))
    }
}

/// A loaded engine bound to one working directory
pub struct FfmpegEngineInstance {
    binary: String,
    workdir: TempDir,
}

impl FfmpegEngineInstance {
    /// Resolve a bare file name inside the working directory
    fn file_path(&self, name: &str) -> Result<PathBuf, TranscodeError> {
        let is_bare = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\');
        if !is_bare {
            return Err(TranscodeError::FileError(format!(
                "Invalid engine file name: {:?}",
                name
            )));
        }
        Ok(self.workdir.path().join(name))
    }
}

#[async_trait]
impl EngineInstance for FfmpegEngineInstance {
    async fn write_input_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), TranscodeError> {
        let path = self.file_path(name)?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| TranscodeError::FileError(format!("{}: {}", name, e)))
    }

    async fn run(
        &mut self,
        args: &[String],
        on_log: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), TranscodeError> {
        let mut command = Command::new(&self.binary);
        command
            .args(["-hide_banner", "-nostdin", "-y"])
            .args(args)
            .current_dir(self.workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group: a terminal Ctrl+C must not abort the transcode
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| TranscodeError::EngineError(format!("Failed to start FFmpeg: {}", e)))?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TranscodeError::EngineError("Failed to capture FFmpeg stderr".to_string()))?;

        let mut splitter = LogLineSplitter::new();
        let mut last_line = String::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = stderr
                .read(&mut buf)
                .await
                .map_err(|e| TranscodeError::EngineError(e.to_string()))?;
            if n == 0 {
                break;
            }
            for line in splitter.push(&buf[..n]) {
                on_log(&line);
                last_line = line;
            }
        }
        if let Some(line) = splitter.finish() {
            on_log(&line);
            last_line = line;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| TranscodeError::EngineError(format!("FFmpeg failed: {}", e)))?;

        if !status.success() {
            let reason = if last_line.is_empty() {
                "unknown error".to_string()
            } else {
                last_line
            };
            return Err(TranscodeError::EngineError(format!(
                "FFmpeg exited with {}: {}",
                status, reason
            )));
        }

        Ok(())
    }

    async fn read_output_file(&mut self, name: &str) -> Result<Vec<u8>, TranscodeError> {
        let path = self.file_path(name)?;
        fs::read(&path)
            .await
            .map_err(|e| TranscodeError::FileError(format!("{}: {}", name, e)))
    }
}
