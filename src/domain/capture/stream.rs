//! Capture constraints and the live stream handle

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{CaptureSource, Resolution};

/// Default capture frame rate
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Audio processing switches.
/// The recorder keeps raw fidelity, so `raw()` turns all processing off.
/// FFmpeg's pulse input never applies such processing, so for that device
/// the flags describe the stream rather than configure it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl AudioConstraints {
    pub const fn raw() -> Self {
        Self {
            echo_cancellation: false,
            noise_suppression: false,
            auto_gain_control: false,
        }
    }
}

/// Everything a capture device needs to open a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub source: CaptureSource,
    pub video: Resolution,
    /// `None` when the stream is video-only
    pub audio: Option<AudioConstraints>,
    pub frame_rate: u32,
}

impl CaptureConstraints {
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

/// Media kind of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

/// One live track of a stream.
/// Clones share the same live flag.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    /// Create a live track. `label` identifies the device (display name,
    /// device node, audio source).
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// End the track. Returns true only for the call that actually ended it.
    pub fn stop(&self) -> bool {
        self.live.swap(false, Ordering::SeqCst)
    }
}

/// Handle to a live capture stream.
///
/// The hardware behind it belongs to the capture device; recorders only hold
/// a reference (a clone) and never stop tracks themselves.
#[derive(Debug, Clone)]
pub struct LiveStream {
    constraints: CaptureConstraints,
    tracks: Vec<MediaTrack>,
}

impl LiveStream {
    pub fn new(constraints: CaptureConstraints, tracks: Vec<MediaTrack>) -> Self {
        Self {
            constraints,
            tracks,
        }
    }

    pub fn constraints(&self) -> &CaptureConstraints {
        &self.constraints
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn video_track(&self) -> Option<&MediaTrack> {
        self.track(TrackKind::Video)
    }

    pub fn audio_track(&self) -> Option<&MediaTrack> {
        self.track(TrackKind::Audio)
    }

    fn track(&self, kind: TrackKind) -> Option<&MediaTrack> {
        self.tracks.iter().find(|t| t.kind() == kind)
    }

    /// True while any track is still live
    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(MediaTrack::is_live)
    }

    /// Stop every track. Returns how many tracks this call ended;
    /// a second call returns 0.
    pub fn stop_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.stop()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> LiveStream {
        let constraints = CaptureConstraints {
            source: CaptureSource::Screen,
            video: Resolution::new(1280, 720).unwrap(),
            audio: Some(AudioConstraints::raw()),
            frame_rate: DEFAULT_FRAME_RATE,
        };
        LiveStream::new(
            constraints,
            vec![
                MediaTrack::new(TrackKind::Video, ":0.0"),
                MediaTrack::new(TrackKind::Audio, "default"),
            ],
        )
    }

    #[test]
    fn raw_audio_disables_processing() {
        let audio = AudioConstraints::raw();
        assert!(!audio.echo_cancellation);
        assert!(!audio.noise_suppression);
        assert!(!audio.auto_gain_control);
    }

    #[test]
    fn stop_tracks_happens_once() {
        let stream = stream();
        assert!(stream.is_live());
        assert_eq!(stream.stop_tracks(), 2);
        assert!(!stream.is_live());
        assert_eq!(stream.stop_tracks(), 0);
    }

    #[test]
    fn clones_share_track_state() {
        let stream = stream();
        let reference = stream.clone();
        stream.stop_tracks();
        assert!(!reference.is_live());
    }

    #[test]
    fn track_lookup_by_kind() {
        let stream = stream();
        assert_eq!(stream.video_track().unwrap().label(), ":0.0");
        assert_eq!(stream.audio_track().unwrap().label(), "default");
    }
}
