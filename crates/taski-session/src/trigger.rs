//! Presentation trigger.
//!
//! The welcome screen's "Continue with Google" button. Pressing it starts a
//! sign-in run; the trigger follows the session store and leaves the auth
//! screen once a user is published.

use crate::orchestrator::{RunOutcome, SessionOrchestrator};
use crate::state::SessionState;
use crate::store::SubscriptionHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Navigation hook supplied by the app shell.
pub trait Navigator: Send + Sync {
    /// Leave the auth screen for the signed-in home screen.
    fn navigate_home(&self);
}

/// Sign-in button bound to an orchestrator and a navigator.
///
/// Navigates exactly once each time the session goes from signed out to
/// signed in. Detaches from the store when dropped.
pub struct SignInTrigger {
    orchestrator: SessionOrchestrator,
    _subscription: SubscriptionHandle,
}

impl std::fmt::Debug for SignInTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInTrigger")
            .field("orchestrator", &self.orchestrator)
            .finish()
    }
}

impl SignInTrigger {
    /// Bind the trigger and start following the session store.
    pub fn attach(orchestrator: SessionOrchestrator, navigator: Arc<dyn Navigator>) -> Self {
        let signed_in = AtomicBool::new(orchestrator.store().state().is_authenticated());

        let subscription = orchestrator.store().subscribe(move |state: &SessionState, _| {
            let now = state.is_authenticated();
            let before = signed_in.swap(now, Ordering::AcqRel);
            if now && !before {
                tracing::debug!(user_id = ?state.user_id(), "Leaving auth screen");
                navigator.navigate_home();
            }
        });

        Self {
            orchestrator,
            _subscription: subscription,
        }
    }

    /// Handle a button press.
    pub async fn press(&self) -> RunOutcome {
        self.orchestrator.sign_in_with_delegated_identity().await
    }

    /// Whether the button should show a spinner.
    pub fn is_busy(&self) -> bool {
        self.orchestrator.store().state().loading
    }

    /// Stop following the session store.
    pub fn detach(self) {}
}
