//! Transcode progress derived from engine log lines

/// Frame rate the progress estimate assumes for the source
pub const ASSUMED_FRAME_RATE: f64 = 30.0;

const FRAME_MARKER: &str = "frame=";

/// Extract the encoded frame number from a log line like
/// `frame=  123 fps= 45 q=28.0 size=...`.
/// Lines that don't start with the frame marker yield `None`.
pub fn parse_frame_line(line: &str) -> Option<u64> {
    let rest = line.trim_start().strip_prefix(FRAME_MARKER)?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Percent complete for one frame count.
/// Clamped to [0, 100]; a zero estimate reports 0 until completion.
pub fn frame_percent(frame: u64, expected_duration_secs: f64, frame_rate: f64) -> f64 {
    let expected_frames = expected_duration_secs * frame_rate;
    if !expected_frames.is_finite() || expected_frames <= 0.0 {
        return 0.0;
    }
    (frame as f64 / expected_frames * 100.0).clamp(0.0, 100.0)
}

/// Tracks progress of one transcode job.
///
/// Reported values never decrease, and `finish` always reports 100.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    expected_duration_secs: f64,
    frame_rate: f64,
    last_frame: Option<u64>,
    percent: f64,
}

impl ProgressTracker {
    pub fn new(expected_duration_secs: f64) -> Self {
        Self::with_frame_rate(expected_duration_secs, ASSUMED_FRAME_RATE)
    }

    pub fn with_frame_rate(expected_duration_secs: f64, frame_rate: f64) -> Self {
        Self {
            expected_duration_secs,
            frame_rate,
            last_frame: None,
            percent: 0.0,
        }
    }

    /// Feed one engine log line.
    /// Returns the current percent when the line carried a frame count.
    pub fn observe_line(&mut self, line: &str) -> Option<f64> {
        let frame = parse_frame_line(line)?;
        self.last_frame = Some(frame);
        let percent = frame_percent(frame, self.expected_duration_secs, self.frame_rate);
        self.percent = self.percent.max(percent);
        Some(self.percent)
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }

    /// Mark the job complete
    pub fn finish(&mut self) -> f64 {
        self.percent = 100.0;
        self.percent
    }
}
