//! Session state snapshots
//!
//! This module defines the value held by the session store and the named
//! transitions that produce each new snapshot.

use serde::{Deserialize, Serialize};
use taski_auth::SessionPrincipal;

/// Snapshot of the process-wide session.
///
/// `loading` is only true while a sign-in run is in flight, and a loading
/// snapshot never carries an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Authenticated principal, if any
    pub user: Option<SessionPrincipal>,

    /// Whether a sign-in run is in flight
    pub loading: bool,

    /// Message from the most recent failed run
    pub error: Option<String>,
}

impl SessionState {
    /// Check if a principal is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// User ID of the signed-in principal.
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.user_id.as_str())
    }
}

/// Mutation that produced a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionTransition {
    /// A run announced intent to sign in
    BeginLoading,
    /// A run ended without a result (user cancelled)
    Idle,
    /// A run published a principal
    SessionPublished,
    /// A run failed
    ErrorPublished,
    /// The last error was dismissed
    ErrorCleared,
    /// The session was torn down
    Reset,
}

impl SessionTransition {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionTransition::BeginLoading => "begin_loading",
            SessionTransition::Idle => "idle",
            SessionTransition::SessionPublished => "session_published",
            SessionTransition::ErrorPublished => "error_published",
            SessionTransition::ErrorCleared => "error_cleared",
            SessionTransition::Reset => "reset",
        }
    }

    /// Whether the transition ends a sign-in run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionTransition::Idle
                | SessionTransition::SessionPublished
                | SessionTransition::ErrorPublished
        )
    }
}

impl std::fmt::Display for SessionTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
