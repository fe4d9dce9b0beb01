//! State store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use searchkit_state::{Action, ActionType, AppState, QueryState, ResultsState, reduce};

type Listener = Box<dyn Fn(&Action, &AppState) + Send + Sync>;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the application state and applies the reducer to dispatched actions.
///
/// Listeners run synchronously after each reduction and receive the action
/// together with the resulting state. A listener must not dispatch or
/// subscribe on the same store.
pub struct Store {
    state: Mutex<AppState>,
    listeners: Mutex<Vec<Listener>>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Mutex::new(state),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the full state.
    pub fn state(&self) -> AppState {
        lock(&self.state).clone()
    }

    /// Snapshot of the query state.
    pub fn query(&self) -> QueryState {
        lock(&self.state).query.clone()
    }

    /// Snapshot of the results state.
    pub fn results(&self) -> ResultsState {
        lock(&self.state).results.clone()
    }

    /// Reduce `action` into the state, then notify listeners.
    pub fn dispatch(&self, action: Action) {
        debug!(action = action.kind().as_str(), "dispatch");
        let mut state = lock(&self.state);
        let current = std::mem::take(&mut *state);
        *state = reduce(current, &action);

        let listeners = lock(&self.listeners);
        for listener in listeners.iter() {
            listener(&action, &*state);
        }
    }

    /// Register a listener called after every dispatch.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Action, &AppState) + Send + Sync + 'static,
    {
        lock(&self.listeners).push(Box::new(listener));
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*lock(&self.state))
            .field("listeners", &lock(&self.listeners).len())
            .finish()
    }
}

/// Records every action dispatched to a store, in order.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl ActionLog {
    /// Create a log and subscribe it to `store`.
    pub fn attach(store: &Store) -> Self {
        let log = Self::default();
        let sink = Arc::clone(&log.actions);
        store.subscribe(move |action, _| lock(&sink).push(action.clone()));
        log
    }

    /// Recorded actions, oldest first.
    pub fn actions(&self) -> Vec<Action> {
        lock(&self.actions).clone()
    }

    /// Types of the recorded actions, oldest first.
    pub fn types(&self) -> Vec<ActionType> {
        lock(&self.actions).iter().map(Action::kind).collect()
    }

    pub fn clear(&self) {
        lock(&self.actions).clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.actions).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.actions).is_empty()
    }
}
