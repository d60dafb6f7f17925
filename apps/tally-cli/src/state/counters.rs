//! # Counter Store
//!
//! Owns the counter collection and keeps storage in step with it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CounterStore Lifecycle                               │
//! │                                                                         │
//! │  new(storage) ──► default collection, ready = false                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load().await (once)                                                   │
//! │       ├── key absent ─────────► keep default                           │
//! │       ├── key present, parses ► replace collection wholesale           │
//! │       └── read/parse error ───► keep default, report Load failure      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ready = true (whatever happened above)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  increment / decrement / rename / add_counter / select_counter         │
//! │       ├── swap in the new snapshot under the lock                      │
//! │       └── if ready: spawn storage.set(key, json) while still locked    │
//! │                      not awaited, not queued, never retried            │
//! │                      error ──► report Save failure, keep snapshot      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  flush().await before shutdown ──► every spawned save has finished     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overlapping Saves
//! Two quick changes spawn two independent saves, in the order the changes
//! were applied. Storage sees them in whatever order they complete, so the
//! last save to finish decides what the next startup reads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tally_core::{codec, Counter, CounterCollection, CounterId, STORAGE_KEY};
use tally_db::KeyValueStore;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::PersistenceFailure;

/// Buffered diagnostics per subscriber before the oldest are dropped.
const FAILURE_CHANNEL_CAPACITY: usize = 32;

/// The counter store handed to the front end.
///
/// ## Thread Safety
/// Cloning gives another handle to the same store. The collection sits
/// behind a `Mutex` because every operation replaces the whole snapshot;
/// the lock is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct CounterStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    counters: Mutex<CounterCollection>,
    saves: Mutex<JoinSet<()>>,
    ready: AtomicBool,
    load_started: AtomicBool,
    storage: Arc<dyn KeyValueStore>,
    failures: broadcast::Sender<PersistenceFailure>,
}

impl CounterStore {
    /// Creates a store holding the default collection, not yet ready.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        CounterStore {
            inner: Arc::new(Inner {
                counters: Mutex::new(CounterCollection::default()),
                saves: Mutex::new(JoinSet::new()),
                ready: AtomicBool::new(false),
                load_started: AtomicBool::new(false),
                storage,
                failures,
            }),
        }
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Reads the saved collection and marks the store ready.
    ///
    /// Only the first call does anything. Failures are reported on the
    /// diagnostic channel and leave the default collection in place.
    pub async fn load(&self) {
        if self.inner.load_started.swap(true, Ordering::SeqCst) {
            warn!("Counter load already ran, ignoring repeat call");
            return;
        }

        match self.read_saved().await {
            Ok(Some(collection)) => {
                info!(
                    counters = collection.len(),
                    active_id = %collection.active_id(),
                    "Loaded saved counters"
                );
                *self.lock() = collection;
            }
            Ok(None) => info!("No saved counters, starting with the default counter"),
            Err(failure) => report(&self.inner.failures, failure),
        }

        self.inner.ready.store(true, Ordering::SeqCst);
        debug!("Counter store ready");
    }

    async fn read_saved(&self) -> Result<Option<CounterCollection>, PersistenceFailure> {
        let raw = self
            .inner
            .storage
            .get(STORAGE_KEY)
            .await
            .map_err(PersistenceFailure::load)?;

        raw.map(|raw| codec::decode_collection(&raw))
            .transpose()
            .map_err(PersistenceFailure::load)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// True once [`Self::load`] has finished, successfully or not.
    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// A copy of the current collection, for rendering.
    pub fn snapshot(&self) -> CounterCollection {
        self.lock().clone()
    }

    /// The counter to display: the active one, else the first, else `None`.
    pub fn resolve_active(&self) -> Option<Counter> {
        self.lock().resolve_active().cloned()
    }

    /// Receives every load/save failure reported after this call.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<PersistenceFailure> {
        self.inner.failures.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one to the active counter.
    pub fn increment(&self) -> CounterCollection {
        self.apply("increment", CounterCollection::increment)
    }

    /// Subtracts one from the active counter.
    pub fn decrement(&self) -> CounterCollection {
        self.apply("decrement", CounterCollection::decrement)
    }

    /// Renames the active counter to `name`, verbatim.
    pub fn rename(&self, name: &str) -> CounterCollection {
        self.apply("rename", |counters| counters.rename(name))
    }

    /// Appends a new counter and makes it active.
    pub fn add_counter(&self) -> CounterCollection {
        self.apply("add_counter", |counters| {
            if counters.next_id().is_none() {
                warn!("Counter ids exhausted, no counter added");
            }
            counters.add_counter()
        })
    }

    /// Makes `id` the active counter without checking that it exists.
    pub fn select_counter(&self, id: CounterId) -> CounterCollection {
        self.apply("select_counter", |counters| counters.select_counter(id))
    }

    fn apply(
        &self,
        operation: &'static str,
        transform: impl FnOnce(&CounterCollection) -> CounterCollection,
    ) -> CounterCollection {
        let mut counters = self.lock();
        let next = transform(&*counters);
        *counters = next.clone();

        debug!(
            operation,
            active_id = %next.active_id(),
            counters = next.len(),
            "Counters updated"
        );

        // Spawned before the lock is released so saves start in mutation order.
        if self.is_ready() {
            self.schedule_save(&next);
        } else {
            debug!(operation, "Store not loaded yet, save suppressed");
        }

        drop(counters);
        next
    }

    /// Waits for every save spawned so far.
    ///
    /// Saves are still not queued: this only stops shutdown from cutting
    /// off the ones already running. Saves spawned while waiting are not
    /// included.
    pub async fn flush(&self) {
        let mut pending = std::mem::take(&mut *self.saves());
        let count = pending.len();

        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                report(&self.inner.failures, PersistenceFailure::save(e));
            }
        }

        debug!(count, "Pending saves finished");
    }

    /// Spawns one independent save of `snapshot`.
    fn schedule_save(&self, snapshot: &CounterCollection) {
        let failures = self.inner.failures.clone();

        let payload = match codec::encode_collection(snapshot) {
            Ok(payload) => payload,
            Err(e) => return report(&failures, PersistenceFailure::save(e)),
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => return report(&failures, PersistenceFailure::save(e)),
        };

        let storage = Arc::clone(&self.inner.storage);
        let mut saves = self.saves();
        // Drop finished handles so a long session does not accumulate them.
        while saves.try_join_next().is_some() {}
        saves.spawn_on(
            async move {
                match storage.set(STORAGE_KEY, &payload).await {
                    Ok(()) => debug!(bytes = payload.len(), "Counters saved"),
                    Err(e) => report(&failures, PersistenceFailure::save(e)),
                }
            },
            &runtime,
        );
    }

    fn saves(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.inner
            .saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, CounterCollection> {
        // Every write swaps in a complete snapshot, so a poisoned value is
        // still a consistent collection.
        self.inner
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Inner {
    // Saves outlive the last handle; only flush() waits for them.
    fn drop(&mut self) {
        self.saves
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .detach_all();
    }
}

/// Sends a failure to the log and to diagnostics subscribers.
fn report(failures: &broadcast::Sender<PersistenceFailure>, failure: PersistenceFailure) {
    match failure {
        PersistenceFailure::Load(_) => {
            error!(error = %failure.detail(), "Failed to load counters")
        }
        PersistenceFailure::Save(_) => {
            error!(error = %failure.detail(), "Failed to save counters")
        }
    }
    // No subscribers is the normal case outside tests.
    let _ = failures.send(failure);
}

// =============================================================================
// Unit Tests
// =============================================================================
