//! Global session store
//!
//! This module provides the process-wide session state and the subscription
//! mechanism observers use to follow it. Only the orchestrator in this crate
//! can mutate the store; everyone else reads snapshots or subscribes.

use crate::state::{SessionState, SessionTransition};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};
use taski_auth::SessionPrincipal;
use tokio::sync::watch;
use uuid::Uuid;

/// Observer callback invoked after every transition.
///
/// Callbacks run on the mutating task and must not block. A callback may
/// trigger further transitions; those are delivered after it returns.
pub type Listener = Arc<dyn Fn(&SessionState, SessionTransition) + Send + Sync>;

type ListenerMap = Mutex<HashMap<Uuid, Listener>>;

static GLOBAL: OnceLock<Arc<SessionStore>> = OnceLock::new();

/// Handle returned by [`SessionStore::subscribe`].
///
/// The callback stays registered until the handle is unsubscribed or dropped.
#[must_use = "dropping the handle unsubscribes the listener"]
pub struct SubscriptionHandle {
    /// Subscription ID
    id: Uuid,
    /// Registry the listener lives in
    listeners: Weak<ListenerMap>,
}

impl SubscriptionHandle {
    /// Subscription ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop receiving notifications.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).remove(&self.id);
        }
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .finish()
    }
}

/// Transitions applied but not yet delivered to listeners.
#[derive(Default)]
struct Outbox {
    queue: VecDeque<(SessionState, SessionTransition)>,
    /// Some caller is currently delivering the queue
    draining: bool,
}

/// Clears the draining flag if a listener panics mid-delivery.
struct DrainGuard<'a> {
    outbox: &'a Mutex<Outbox>,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut outbox = lock(self.outbox);
            outbox.draining = false;
            outbox.queue.clear();
        }
    }
}

/// Process-wide session store.
///
/// Mutations are applied and queued under one lock, then delivered with the
/// lock released. Observers see complete snapshots in the order they were
/// produced, and a listener may mutate the store from inside its callback.
pub struct SessionStore {
    /// Current snapshot
    state: watch::Sender<SessionState>,
    /// Registered callbacks
    listeners: Arc<ListenerMap>,
    /// Serializes mutation and orders delivery
    outbox: Mutex<Outbox>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl SessionStore {
    /// Create a store in the signed-out state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state,
            listeners: Arc::new(Mutex::new(HashMap::new())),
            outbox: Mutex::new(Outbox::default()),
        }
    }

    /// The process-wide store, created on first use.
    pub fn global() -> Arc<SessionStore> {
        GLOBAL.get_or_init(|| Arc::new(SessionStore::new())).clone()
    }

    /// Synchronous snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Register a callback invoked after every transition.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&SessionState, SessionTransition) + Send + Sync + 'static,
    {
        let id = Uuid::now_v7();
        lock(&self.listeners).insert(id, Arc::new(callback));

        tracing::trace!(subscription_id = %id, "Session listener registered");

        SubscriptionHandle {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Receiver that always holds the latest snapshot.
    ///
    /// Intermediate snapshots may be skipped; use [`subscribe`](Self::subscribe)
    /// to see every transition.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Number of registered callbacks.
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    pub(crate) fn begin_loading(&self) {
        self.apply(SessionTransition::BeginLoading, |state| {
            state.loading = true;
            state.error = None;
        });
    }

    pub(crate) fn end_loading(&self) {
        self.apply(SessionTransition::Idle, |state| {
            state.loading = false;
        });
    }

    pub(crate) fn publish_session(&self, principal: SessionPrincipal) {
        self.apply(SessionTransition::SessionPublished, |state| {
            state.user = Some(principal);
            state.loading = false;
            state.error = None;
        });
    }

    pub(crate) fn publish_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.apply(SessionTransition::ErrorPublished, |state| {
            state.error = Some(message);
            state.loading = false;
        });
    }

    pub(crate) fn clear_error(&self) {
        self.apply(SessionTransition::ErrorCleared, |state| {
            state.error = None;
        });
    }

    pub(crate) fn reset(&self) {
        self.apply(SessionTransition::Reset, |state| {
            *state = SessionState::default();
        });
    }

    fn apply<F>(&self, transition: SessionTransition, mutate: F)
    where
        F: FnOnce(&mut SessionState),
    {
        {
            let mut outbox = lock(&self.outbox);

            self.state.send_modify(mutate);
            let snapshot = self.state();

            tracing::debug!(
                transition = %transition,
                authenticated = snapshot.is_authenticated(),
                loading = snapshot.loading,
                has_error = snapshot.error.is_some(),
                "Session state changed"
            );

            outbox.queue.push_back((snapshot, transition));
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }

        self.drain();
    }

    /// Deliver queued transitions until the queue is empty.
    fn drain(&self) {
        let _guard = DrainGuard {
            outbox: &self.outbox,
        };

        loop {
            let (snapshot, transition) = {
                let mut outbox = lock(&self.outbox);
                match outbox.queue.pop_front() {
                    Some(next) => next,
                    None => {
                        outbox.draining = false;
                        return;
                    }
                }
            };

            // Callbacks may drop their own handles, so call them outside the map lock.
            let listeners: Vec<Listener> = lock(&self.listeners).values().cloned().collect();
            for listener in listeners {
                listener(&snapshot, transition);
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
