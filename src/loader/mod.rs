pub mod script;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use log::debug;
use serde::{Deserialize, Serialize};

/// State reported by the web loader.
///
/// Exactly one variant is active at a time. `Failure` carries a display-ready
/// message only; the loader erases the underlying error before publishing it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    /// Completion fraction, nominally in `[0, 1]`.
    Progressing(f64),
    Finished,
    Failure(String),
    NoConnection,
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::Idle
    }
}

type Listener = Arc<dyn Fn(&LoadState) + Send + Sync>;

struct Shared {
    current: RwLock<(LoadState, u64)>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
}

/// Observable handle onto a loader's state.
///
/// The loader side calls [`LoaderHandle::publish`]; views call
/// [`LoaderHandle::subscribe`] and read [`LoaderHandle::state`] when woken.
#[derive(Clone)]
pub struct LoaderHandle {
    shared: Arc<Shared>,
}

impl Default for LoaderHandle {
    fn default() -> Self {
        Self::new(LoadState::Idle)
    }
}

impl LoaderHandle {
    pub fn new(initial: LoadState) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: RwLock::new((initial, 0)),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState {
        let guard = self.shared.current.read().unwrap_or_else(|e| e.into_inner());
        guard.0.clone()
    }

    /// Number of states published so far.
    pub fn revision(&self) -> u64 {
        let guard = self.shared.current.read().unwrap_or_else(|e| e.into_inner());
        guard.1
    }

    /// Replace the current state and notify every subscriber.
    ///
    /// Listeners run on the publishing thread after the state is stored, so a
    /// listener reading [`LoaderHandle::state`] sees the new value.
    pub fn publish(&self, state: LoadState) {
        let revision = {
            let mut guard = self.shared.current.write().unwrap_or_else(|e| e.into_inner());
            guard.0 = state.clone();
            guard.1 += 1;
            guard.1
        };
        debug!("Loader state #{} -> {:?}", revision, state);

        // Listeners are called outside the lock so they may subscribe or drop
        // their own subscription.
        let listeners: Vec<Listener> = {
            let guard = self.shared.listeners.lock().unwrap_or_else(|e| e.into_inner());
            guard.iter().map(|(_, listener)| Arc::clone(listener)).collect()
        };
        for listener in listeners {
            listener(&state);
        }
    }

    /// Register for state-change notifications until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LoadState) + Send + Sync + 'static,
    {
        let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(listener)));
        Subscription {
            shared: Arc::downgrade(&self.shared),
            id,
        }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.shared.listeners.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Keeps a listener registered; dropping it unregisters.
pub struct Subscription {
    shared: Weak<Shared>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            let mut listeners = shared.listeners.lock().unwrap_or_else(|e| e.into_inner());
            listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
