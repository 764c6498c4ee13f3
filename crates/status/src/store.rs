use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};

use crate::{Status, StatusSnapshot, Transition};

/// Buffered transitions per subscriber before it starts lagging.
pub const TRANSITION_CAPACITY: usize = 64;

/// Current status plus the value it replaced, guarded by one lock.
///
/// Writers publish each [`Transition`] while still holding the lock, so
/// subscribers observe transitions in commit order. Working→Standby edges are
/// also counted under the same lock; the count cannot lag or drop.
pub struct StatusStore {
    snapshot: Mutex<StatusSnapshot>,
    transitions: broadcast::Sender<Transition>,
    completions: watch::Sender<u64>,
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusStore {
    /// Creates a store in `Standby` (previous also `Standby`).
    pub fn new() -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        let (completions, _) = watch::channel(0);
        Self {
            snapshot: Mutex::new(StatusSnapshot::default()),
            transitions,
            completions,
        }
    }

    /// Installs `new`, moving the current value into `previous`.
    pub fn set_status(&self, new: Status) -> Transition {
        let mut snap = self.lock();
        let transition = Transition {
            from: snap.status,
            to: new,
        };
        snap.previous = snap.status;
        snap.status = new;

        // No subscribers is fine; the snapshot is still updated.
        let _ = self.transitions.send(transition);
        if transition.is_completion() {
            self.completions.send_modify(|count| *count += 1);
        }
        drop(snap);

        if transition.is_noop() {
            tracing::debug!(status = %new, "status unchanged");
        } else {
            tracing::info!(from = %transition.from, to = %transition.to, "status changed");
        }
        transition
    }

    /// Consistent copy of `(status, previous)`.
    pub fn read(&self) -> StatusSnapshot {
        *self.lock()
    }

    /// Shorthand for `read().status`.
    pub fn status(&self) -> Status {
        self.lock().status
    }

    /// Subscribes to every transition committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Transition> {
        self.transitions.subscribe()
    }

    /// Feed of Working→Standby transitions committed after this call.
    pub fn completions(&self) -> Completions {
        // Taken under the snapshot lock so no completion falls between the
        // subscription and its starting count.
        let _snap = self.lock();
        let rx = self.completions.subscribe();
        let seen = *rx.borrow();
        Completions { rx, seen }
    }

    /// Working→Standby transitions since the store was created.
    pub fn completed_count(&self) -> u64 {
        *self.completions.borrow()
    }

    fn lock(&self) -> MutexGuard<'_, StatusSnapshot> {
        // The critical section cannot leave the pair half-written.
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving end of [`StatusStore::completions`].
///
/// Backed by a running count rather than a queue, so a slow consumer
/// never loses completions; it just receives several at once.
pub struct Completions {
    rx: watch::Receiver<u64>,
    seen: u64,
}

impl Completions {
    /// Waits for new completions and returns how many arrived since the
    /// last call. `None` once the store is dropped.
    pub async fn next(&mut self) -> Option<u64> {
        loop {
            self.rx.changed().await.ok()?;
            let total = *self.rx.borrow_and_update();
            let new = total.saturating_sub(self.seen);
            self.seen = total;
            if new > 0 {
                return Some(new);
            }
        }
    }
}
