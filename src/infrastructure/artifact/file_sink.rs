//! File artifact sink adapter

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::application::ports::{ArtifactError, ArtifactSink};
use crate::domain::transcode::Artifact;

/// Give up after this many name collisions
const MAX_SUFFIX: u32 = 999;

/// Writes artifacts into a directory. Existing files are never overwritten;
/// a clashing name gets a ` (N)` suffix.
pub struct FileArtifactSink {
    dir: PathBuf,
}

impl FileArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Candidate path for attempt `n`; attempt 0 is the plain name
    fn candidate(&self, file_name: &str, n: u32) -> PathBuf {
        if n == 0 {
            return self.dir.join(file_name);
        }
        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());
        let name = match path.extension() {
            Some(ext) => format!("{} ({}).{}", stem, n, ext.to_string_lossy()),
            None => format!("{} ({})", stem, n),
        };
        self.dir.join(name)
    }
}

#[async_trait]
impl ArtifactSink for FileArtifactSink {
    async fn deliver(&self, artifact: &Artifact) -> Result<String, ArtifactError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ArtifactError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;

        for n in 0..=MAX_SUFFIX {
            let path = self.candidate(artifact.file_name(), n);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(ArtifactError::WriteFailed(format!("{}: {}", path.display(), e)))
                }
            };

            write_or_remove(&path, &mut file, artifact.media().data()).await?;
            tracing::debug!(path = %path.display(), bytes = artifact.media().size_bytes(), "artifact written");
            return Ok(path.display().to_string());
        }

        Err(ArtifactError::WriteFailed(format!(
            "too many files named {} in {}",
            artifact.file_name(),
            self.dir.display()
        )))
    }
}

/// Write `data` to the freshly created `path`; a failed write leaves no file behind
async fn write_or_remove<W>(path: &Path, writer: &mut W, data: &[u8]) -> Result<(), ArtifactError>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(data).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(remove) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %remove, "could not remove partial artifact");
        }
        return Err(ArtifactError::WriteFailed(format!("{}: {}", path.display(), e)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::{MediaData, MediaMimeType};
    use chrono::{Local, TimeZone};
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Accepts `room` bytes, then fails like a full disk
    struct FullDisk {
        room: usize,
    }

    impl AsyncWrite for FullDisk {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            if self.room == 0 {
                return Poll::Ready(Err(std::io::Error::new(
                    ErrorKind::Other,
                    "no space left on device",
                )));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn artifact(bytes: &[u8]) -> Artifact {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        Artifact::timestamped(MediaData::new(bytes.to_vec(), MediaMimeType::Mp4), at)
    }

    #[tokio::test]
    async fn writes_artifact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileArtifactSink::new(dir.path());

        let location = sink.deliver(&artifact(b"mp4 data")).await.unwrap();
        assert!(location.ends_with("2024-03-09 14.05.07.mp4"));
        assert_eq!(std::fs::read(&location).unwrap(), b"mp4 data");
    }

    #[tokio::test]
    async fn never_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileArtifactSink::new(dir.path());

        let first = sink.deliver(&artifact(b"first")).await.unwrap();
        let second = sink.deliver(&artifact(b"second")).await.unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("2024-03-09 14.05.07 (1).mp4"));
        assert_eq!(std::fs::read(&first).unwrap(), b"first");
        assert_eq!(std::fs::read(&second).unwrap(), b"second");
    }

    #[tokio::test]
    async fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileArtifactSink::new(dir.path().join("clips").join("today"));

        let location = sink.deliver(&artifact(b"x")).await.unwrap();
        assert!(Path::new(&location).exists());
    }

    #[tokio::test]
    async fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.mp4");
        std::fs::write(&path, b"half").unwrap();

        let mut disk = FullDisk { room: 4 };
        let err = write_or_remove(&path, &mut disk, b"half of the data")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no space left on device"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn successful_write_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whole.mp4");
        std::fs::write(&path, b"").unwrap();

        let mut disk = FullDisk { room: 64 };
        write_or_remove(&path, &mut disk, b"fits").await.unwrap();
        assert!(path.exists());
    }
}
