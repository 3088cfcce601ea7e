//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Processing,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Processing => "processing",
        }
    }

    /// Label of the toggle control in this state.
    /// Only a recording session offers "Stop Recording".
    pub const fn toggle_label(&self) -> ToggleLabel {
        match self {
            Self::Recording => ToggleLabel::StopRecording,
            Self::Idle | Self::Processing => ToggleLabel::RecordNow,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visible label of the single record/stop toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleLabel {
    RecordNow,
    StopRecording,
}

impl ToggleLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RecordNow => "Record Now",
            Self::StopRecording => "Stop Recording",
        }
    }
}

impl fmt::Display for ToggleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Session lifecycle entity.
///
/// State machine:
///   IDLE -> RECORDING (start_recording)
///   RECORDING -> PROCESSING (stop_recording)
///   PROCESSING -> IDLE (complete_processing, on success or failure)
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    state: SessionState,
}

impl SessionLifecycle {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn is_processing(&self) -> bool {
        self.state == SessionState::Processing
    }

    /// Fail unless idle, without changing state
    pub fn ensure_idle(&self, action: &str) -> Result<(), InvalidStateTransition> {
        self.ensure(SessionState::Idle, action)
    }

    /// Transition from IDLE to RECORDING
    pub fn start_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Idle, SessionState::Recording, "start recording")
    }

    /// Transition from RECORDING to PROCESSING
    pub fn stop_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Recording, SessionState::Processing, "stop recording")
    }

    /// Transition from PROCESSING to IDLE
    pub fn complete_processing(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Processing, SessionState::Idle, "complete processing")
    }

    fn ensure(&self, expected: SessionState, action: &str) -> Result<(), InvalidStateTransition> {
        if self.state != expected {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        Ok(())
    }

    fn transition(
        &mut self,
        from: SessionState,
        to: SessionState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        self.ensure(from, action)?;
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = SessionLifecycle::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
        assert!(!session.is_processing());
    }

    #[test]
    fn start_recording_from_idle() {
        let mut session = SessionLifecycle::new();
        assert!(session.start_recording().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn start_recording_from_recording_fails() {
        let mut session = SessionLifecycle::new();
        session.start_recording().unwrap();

        let err = session.start_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn start_recording_from_processing_fails() {
        let mut session = SessionLifecycle::new();
        session.start_recording().unwrap();
        session.stop_recording().unwrap();

        let err = session.start_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Processing);
    }

    #[test]
    fn stop_recording_from_idle_fails() {
        let mut session = SessionLifecycle::new();

        let err = session.stop_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn complete_processing_from_recording_fails() {
        let mut session = SessionLifecycle::new();
        session.start_recording().unwrap();

        let err = session.complete_processing().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn ensure_idle_does_not_transition() {
        let mut session = SessionLifecycle::new();
        assert!(session.ensure_idle("start recording").is_ok());
        assert!(session.is_idle());

        session.start_recording().unwrap();
        assert!(session.ensure_idle("start recording").is_err());
    }

    #[test]
    fn full_cycle() {
        let mut session = SessionLifecycle::new();
        session.start_recording().unwrap();
        session.stop_recording().unwrap();
        assert!(session.is_processing());
        session.complete_processing().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.start_recording().unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn toggle_labels() {
        assert_eq!(SessionState::Idle.toggle_label().as_str(), "Record Now");
        assert_eq!(
            SessionState::Recording.toggle_label().as_str(),
            "Stop Recording"
        );
        assert_eq!(SessionState::Processing.toggle_label(), ToggleLabel::RecordNow);
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Processing,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("processing"));
    }
}
