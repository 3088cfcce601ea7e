//! Delivered output artifact

use chrono::{DateTime, Local};

use crate::domain::recording::{MediaData, MediaMimeType};

/// Timestamp layout of artifact names (filesystem-safe)
pub const ARTIFACT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H.%M.%S";

/// One finished file, named by its completion time
#[derive(Debug, Clone)]
pub struct Artifact {
    file_name: String,
    media: MediaData,
}

impl Artifact {
    /// Name the artifact after `completed_at` with the container's extension
    pub fn timestamped(media: MediaData, completed_at: DateTime<Local>) -> Self {
        let file_name = format!(
            "{}.{}",
            completed_at.format(ARTIFACT_TIMESTAMP_FORMAT),
            media.mime_type().extension()
        );
        Self { file_name, media }
    }

    /// Name the artifact after the current local time
    pub fn completed_now(media: MediaData) -> Self {
        Self::timestamped(media, Local::now())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media(&self) -> &MediaData {
        &self.media
    }

    pub fn mime_type(&self) -> MediaMimeType {
        self.media.mime_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn named_by_completion_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let artifact = Artifact::timestamped(MediaData::new(vec![1], MediaMimeType::Mp4), at);
        assert_eq!(artifact.file_name(), "2024-03-09 14.05.07.mp4");
        assert_eq!(artifact.mime_type().as_str(), "video/mp4");
    }

    #[test]
    fn name_has_no_path_separators() {
        let artifact = Artifact::completed_now(MediaData::new(vec![1], MediaMimeType::Mp4));
        assert!(!artifact.file_name().contains('/'));
        assert!(!artifact.file_name().contains(':'));
        assert!(artifact.file_name().ends_with(".mp4"));
    }
}
