//! Session state machine - decides whether words are read as commands or parameters
//!
//! ```text
//!   PREPARING --ready--> WAITING --content command--> LISTENING
//!       ^                  ^  ^                          |  ^
//!       |                  |  +--------- reset ----------+  | content command
//!       +-- utterance end -+-----------------------------+--+
//! ```
//!
//! `back` and unresolved words never fire a transition.

use std::fmt;

/// Recognizer interaction states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Ready to recognize a command word
    Waiting,
    /// A content command was recognized, parameters are being collected
    Listening,
    /// Recognizer is between utterances
    #[default]
    Preparing,
}

impl SessionState {
    /// Status text shown to the user
    pub fn text(&self) -> &'static str {
        match self {
            SessionState::Waiting => "Waiting for commands",
            SessionState::Listening => "Listening",
            SessionState::Preparing => "Preparing the recognizer...",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A fired transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
}

impl Transition {
    pub fn is_self(&self) -> bool {
        self.from == self.to
    }
}

/// Holds the single current [`SessionState`] and applies transitions
#[derive(Debug, Default)]
pub struct StateMachine {
    state: SessionState,
}

impl StateMachine {
    /// Starts in `Preparing` until the recognizer reports readiness
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    /// Recognizer is ready for speech: PREPARING -> WAITING
    ///
    /// Returns `None` when not preparing, readiness means nothing then.
    pub fn ready(&mut self) -> Option<Transition> {
        if self.state != SessionState::Preparing {
            tracing::debug!("Ignoring readiness while {:?}", self.state);
            return None;
        }
        Some(self.fire(SessionState::Waiting))
    }

    /// A content command was recognized: any -> LISTENING
    ///
    /// Also fires as a self-transition while already listening.
    pub fn content_command(&mut self) -> Transition {
        self.fire(SessionState::Listening)
    }

    /// `reset` was recognized: any -> WAITING
    pub fn reset(&mut self) -> Transition {
        self.fire(SessionState::Waiting)
    }

    /// Utterance fully processed, or recognition stopped/failed: any -> PREPARING
    pub fn prepare(&mut self) -> Transition {
        self.fire(SessionState::Preparing)
    }

    fn fire(&mut self, to: SessionState) -> Transition {
        let transition = Transition {
            from: self.state,
            to,
        };
        self.state = to;
        tracing::debug!("State: {:?} -> {:?}", transition.from, transition.to);
        transition
    }
}
