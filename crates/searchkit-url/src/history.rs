//! Location and history abstraction.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// The host's notion of "current location" plus history navigation.
///
/// Locations are URL references: either absolute (`https://host/search?q=x`)
/// or path-relative (`/search?q=x`).
pub trait History: Send + Sync {
    /// Current location.
    fn location(&self) -> String;

    /// Add a new history entry and make it current.
    fn push(&self, location: &str);

    /// Overwrite the current history entry.
    fn replace(&self, location: &str);
}

/// In-memory history stack with back/forward navigation.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Mutex<Entries>,
}

#[derive(Debug)]
struct Entries {
    stack: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![initial.into()],
                index: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn back(&self) -> bool {
        let mut entries = self.lock();
        if entries.index == 0 {
            return false;
        }
        entries.index -= 1;
        true
    }

    /// Step forward one entry. Returns `false` at the end of history.
    pub fn forward(&self) -> bool {
        let mut entries = self.lock();
        if entries.index + 1 >= entries.stack.len() {
            return false;
        }
        entries.index += 1;
        true
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().stack.is_empty()
    }

    /// Snapshot of every entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().stack.clone()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let entries = self.lock();
        entries.stack[entries.index].clone()
    }

    fn push(&self, location: &str) {
        let mut entries = self.lock();
        let keep = entries.index + 1;
        entries.stack.truncate(keep);
        entries.stack.push(location.to_string());
        entries.index = entries.stack.len() - 1;
    }

    fn replace(&self, location: &str) {
        let mut entries = self.lock();
        let index = entries.index;
        entries.stack[index] = location.to_string();
    }
}
