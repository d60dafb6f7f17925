//! # Key-Value Store Capability
//!
//! The storage contract the counter store depends on, plus a process-local
//! implementation.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore                                      │
//! │                                                                         │
//! │  get(key)        → Ok(Some(value)) | Ok(None) (never written) | Err    │
//! │  set(key, value) → Ok(())                                    | Err    │
//! │                                                                         │
//! │  • Both calls are async and may fail                                   │
//! │  • No transactions, no ordering between concurrent set() calls         │
//! │  • Whichever set() finishes last determines the stored value           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::error::{DbError, DbResult};

// =============================================================================
// Capability
// =============================================================================

/// Asynchronous string key-value storage.
///
/// Implementations must be shareable across tasks: the counter store
/// holds one behind an `Arc` and calls `set` from spawned save tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Reads the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// A `KeyValueStore` backed by a map in process memory.
///
/// ## Uses
/// - `--storage memory` sessions that should leave nothing on disk
/// - Tests: reads and writes can be made to fail on demand, and callers
///   can wait for a number of `set` calls to have happened
///
/// ```rust,ignore
/// let store = MemoryStore::new().with_entry("counters_data", "[]");
/// store.fail_writes(true);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    history: RwLock<Vec<(String, String)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    set_calls: watch::Sender<usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (set_calls, _) = watch::channel(0);
        MemoryStore {
            entries: RwLock::new(HashMap::new()),
            history: RwLock::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            set_calls,
        }
    }

    /// Pre-populates a key, as if an earlier session had saved it.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.get_mut().insert(key.into(), value.into());
        self
    }

    /// Makes every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the current contents.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }

    /// Every successful write, oldest first.
    pub async fn history(&self) -> Vec<(String, String)> {
        self.history.read().await.clone()
    }

    /// Number of `set` calls so far, successful or not.
    pub fn set_calls(&self) -> usize {
        *self.set_calls.borrow()
    }

    /// Waits until at least `count` `set` calls have completed.
    pub async fn wait_for_set_calls(&self, count: usize) {
        let mut rx = self.set_calls.subscribe();
        // The sender lives in self, so the channel cannot close while we wait.
        let _ = rx.wait_for(|calls| *calls >= count).await;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("Load failed".to_string()));
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let result = if self.fail_writes.load(Ordering::SeqCst) {
            Err(DbError::Unavailable("Save failed".to_string()))
        } else {
            self.entries
                .write()
                .await
                .insert(key.to_string(), value.to_string());
            self.history
                .write()
                .await
                .push((key.to_string(), value.to_string()));
            debug!(key = %key, bytes = value.len(), "Stored value in memory");
            Ok(())
        };

        self.set_calls.send_modify(|calls| *calls += 1);
        result
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
