//! # tally-core: Pure Counter Logic for Tally
//!
//! This crate is the **heart** of Tally. It holds the counter collection
//! and every legal way of changing it, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front End (terminal)                         │   │
//! │  │      Active counter ──► + / - ──► Rename ──► Tab strip          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    CounterStore (app)                           │   │
//! │  │    load, increment, decrement, rename, add, select              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌──────────────────┐  ┌───────────┐           │   │
//! │  │   │   types   │  │   collection     │  │   codec   │           │   │
//! │  │   │  Counter  │  │ CounterCollection│  │ JSON text │           │   │
//! │  │   │ CounterId │  │  pure transforms │  │           │           │   │
//! │  │   └───────────┘  └──────────────────┘  └───────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TASKS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-db (Persistence Adapter)                  │   │
//! │  │              key-value get/set, SQLite or memory                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Counter` and `CounterId`
//! - [`collection`] - `CounterCollection` and its transformations
//! - [`codec`] - The persisted text format
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::CounterCollection;
//!
//! let counters = CounterCollection::default().increment().add_counter();
//!
//! assert_eq!(counters.len(), 2);
//! assert_eq!(counters.resolve_active().unwrap().name, "Counter 2");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod collection;
pub mod error;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use collection::CounterCollection;
pub use error::{CoreError, CoreResult};
pub use types::{Counter, CounterId};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The single key the counter collection is stored under.
///
/// Changing it orphans every collection saved by earlier builds.
pub const STORAGE_KEY: &str = "counters_data";

/// Id of the counter every fresh collection starts with.
pub const DEFAULT_COUNTER_ID: CounterId = CounterId::new(1);

/// Name of the counter every fresh collection starts with.
pub const DEFAULT_COUNTER_NAME: &str = "Default";
