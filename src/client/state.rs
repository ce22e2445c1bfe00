//! Module `state`
//!
//! Defines the session state machine and the bookkeeping a session keeps
//! about its login and negotiated settings.

use std::fmt;

use crate::transfer::TransferMode;

/// Authentication progress of a session.
///
/// `Unauthenticated → Authenticating → Ready`; `Closed` once the control
/// connection is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Ready,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unauthenticated => f.write_str("not logged in"),
            SessionState::Authenticating => f.write_str("login in progress"),
            SessionState::Ready => f.write_str("ready"),
            SessionState::Closed => f.write_str("closed"),
        }
    }
}

/// Represents what the client knows about its session with the server.
pub struct ClientState {
    state: SessionState,
    username: Option<String>,
    mode: Option<TransferMode>,
    greeting: String,
}

impl ClientState {
    pub fn new(greeting: String) -> Self {
        Self {
            state: SessionState::Unauthenticated,
            username: None,
            mode: None,
            greeting,
        }
    }

    /// Forgets the login, keeping the greeting.
    pub fn logout(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.username = None;
        self.mode = None;
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the user the session logged in (or is logging in) as.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the transfer mode last accepted by the server, if any.
    pub fn mode(&self) -> Option<TransferMode> {
        self.mode
    }

    /// Returns the message of the server's greeting.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_mode(&mut self, mode: Option<TransferMode>) {
        self.mode = mode;
    }
}
