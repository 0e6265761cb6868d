//! User-visible notifications.
//!
//! Failed sign-in runs raise an alert through a [`Notifier`]. The app wires a
//! native alert dialog in; the default implementation only logs.

use serde::{Deserialize, Serialize};
use taski_auth::IdentityProviderKind;

/// Alert shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Alert title
    pub title: String,

    /// Alert body
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Alert for a failed delegated sign-in.
    pub fn sign_in_failed(provider: IdentityProviderKind) -> Self {
        Self::new(
            "Error",
            format!("Failed to sign in with {}", provider.display_name()),
        )
    }
}

/// Sink for user-visible alerts.
pub trait Notifier: Send + Sync {
    /// Show an alert.
    fn notify(&self, notification: Notification);
}

/// Notifier that writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::warn!(
            title = %notification.title,
            message = %notification.message,
            "User notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_failed_message() {
        let notification = Notification::sign_in_failed(IdentityProviderKind::Google);
        assert_eq!(notification.title, "Error");
        assert_eq!(notification.message, "Failed to sign in with Google");
    }
}
