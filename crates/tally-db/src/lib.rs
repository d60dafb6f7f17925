//! # tally-db: Persistence Adapter for Tally
//!
//! This crate provides the key-value storage the counter store persists to.
//! It defines the capability ([`KeyValueStore`]) and ships two backends:
//! SQLite through sqlx, and a process-local map.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                                  │
//! │                                                                         │
//! │  CounterStore (load once / save after every change)                    │
//! │       │                                                                 │
//! │       ▼  Arc<dyn KeyValueStore>                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────────┐  ┌─────────────┐  │   │
//! │  │   │   Database    │    │ SqliteKeyValue    │  │ MemoryStore │  │   │
//! │  │   │   (pool.rs)   │◄───│ Store (repository)│  │  (kv.rs)    │  │   │
//! │  │   │ SqlitePool    │    │ get / set (upsert)│  │ tests, temp │  │   │
//! │  │   └───────────────┘    └───────────────────┘  └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/tally/tally.db  (kv_store table)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - The `KeyValueStore` capability and the in-memory backend
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - SQLite-backed implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig, KeyValueStore};
//!
//! let db = Database::new(DbConfig::new("path/to/tally.db")).await?;
//! let kv = db.kv();
//!
//! kv.set("counters_data", r#"[{"id":1,"name":"Default","count":0}]"#).await?;
//! let raw = kv.get("counters_data").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use pool::{Database, DbConfig};

pub use repository::kv::SqliteKeyValueStore;
