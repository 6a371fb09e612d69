//! Registry of in-flight GET requests used for deduplication.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{BoxFuture, Shared};
use serde_json::Value;

use crate::error::Result;

/// A request future that several callers can await.
pub(crate) type SharedCall = Shared<BoxFuture<'static, Result<Value>>>;

struct Entry {
    id: u64,
    call: SharedCall,
    waiters: usize,
}

/// Maps a request fingerprint to the call currently serving it.
///
/// At most one entry exists per fingerprint. Entries are tagged with a
/// unique id so a settling call never removes a newer entry that replaced it.
/// Each entry counts the callers awaiting it; the entry goes away when the
/// call settles or when its last waiter leaves.
#[derive(Default)]
pub(crate) struct PendingRequests {
    calls: Mutex<HashMap<String, Entry>>,
    next_id: AtomicU64,
}

impl PendingRequests {
    /// Returns the in-flight call for `fingerprint`, creating it with `make` if absent.
    ///
    /// `make` receives the id the entry is registered under. The second
    /// element of the result is true when an existing call was joined.
    /// Every successful join must be paired with one [`release`](Self::release).
    pub(crate) fn join_or_insert(
        &self,
        fingerprint: &str,
        make: impl FnOnce(u64) -> SharedCall,
    ) -> (SharedCall, u64, bool) {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = calls.get_mut(fingerprint) {
            entry.waiters += 1;
            return (entry.call.clone(), entry.id, true);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let call = make(id);
        calls.insert(
            fingerprint.to_string(),
            Entry {
                id,
                call: call.clone(),
                waiters: 1,
            },
        );
        (call, id, false)
    }

    /// Removes the entry for `fingerprint` if it is still the one registered as `id`.
    pub(crate) fn remove(&self, fingerprint: &str, id: u64) {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        if calls.get(fingerprint).is_some_and(|entry| entry.id == id) {
            calls.remove(fingerprint);
        }
    }

    /// Records that one waiter on entry `id` has stopped waiting.
    ///
    /// The entry is dropped with its last waiter, so a call nobody polls
    /// any more is never joined later. A no-op once the call has settled.
    pub(crate) fn release(&self, fingerprint: &str, id: u64) {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = calls.get_mut(fingerprint).filter(|entry| entry.id == id) else {
            return;
        };
        entry.waiters = entry.waiters.saturating_sub(1);
        if entry.waiters == 0 {
            calls.remove(fingerprint);
        }
    }

    /// Number of calls currently in flight.
    pub(crate) fn len(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Releases a waiter's hold on an entry when dropped.
///
/// Held across the await in the engine, so a caller that drops its future
/// (for example on `tokio::time::timeout`) counts as leaving.
pub(crate) struct Waiter<'a> {
    pending: &'a PendingRequests,
    fingerprint: String,
    id: u64,
}

impl<'a> Waiter<'a> {
    pub(crate) fn new(pending: &'a PendingRequests, fingerprint: String, id: u64) -> Self {
        Self {
            pending,
            fingerprint,
            id,
        }
    }

    pub(crate) fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        self.pending.release(&self.fingerprint, self.id);
    }
}
