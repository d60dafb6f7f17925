//! # Commands Module
//!
//! Every operation the front end can ask of the counter store.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! └── counter.rs  ◄─── Counter reads and mutations
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Terminal front end                                                    │
//! │  ──────────────────                                                    │
//! │  "select 2"  ──► Input::Select("2")                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::select_counter(&store, "2")                                 │
//! │         │                                                               │
//! │         ├── parse error ──► ApiError { VALIDATION_ERROR, .. }          │
//! │         ▼                                                               │
//! │  CounterStore::select_counter(CounterId(2))                            │
//! │         │   (save spawned in the background)                           │
//! │         ▼                                                               │
//! │  CountersView ──► rendered by the front end                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never wait for storage. Persistence failures surface only in
//! the log and on [`CounterStore::subscribe_failures`](crate::state::CounterStore::subscribe_failures).

pub mod counter;

pub use counter::*;
