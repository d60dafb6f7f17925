//! # Repository Module
//!
//! SQLite-backed implementations of the storage capability.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CounterStore                                                          │
//! │       │                                                                 │
//! │       │  kv.set("counters_data", json)                                 │
//! │       ▼                                                                 │
//! │  SqliteKeyValueStore                                                   │
//! │  ├── get(&self, key)          SELECT value FROM kv_store               │
//! │  ├── set(&self, key, value)   INSERT ... ON CONFLICT DO UPDATE         │
//! │  └── delete(&self, key)       DELETE FROM kv_store                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::SqliteKeyValueStore`] - String key-value rows

pub mod kv;
