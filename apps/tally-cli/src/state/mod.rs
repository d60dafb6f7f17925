//! # State Module
//!
//! Application state owned by the running process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐    ┌──────────────────────────────┐  │
//! │  │        CounterStore          │    │         AppConfig            │  │
//! │  │                              │    │                              │  │
//! │  │  Arc<Mutex<Collection>>      │    │  storage backend / path      │  │
//! │  │  ready flag                  │    │  log filter                  │  │
//! │  │  Arc<dyn KeyValueStore>      │    │                              │  │
//! │  └──────────────────────────────┘    └──────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CounterStore: Mutex around the snapshot, saves run on spawned tasks │
//! │  • AppConfig: Read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod counters;

pub use config::{AppConfig, LogSettings, StorageBackend, StorageSettings};
pub use counters::CounterStore;
