//! Session domain module

mod lifecycle;

pub use lifecycle::{InvalidStateTransition, SessionLifecycle, SessionState, ToggleLabel};
