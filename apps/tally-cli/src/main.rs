//! # Tally Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Tally                                         │
//! │                                                                         │
//! │  stdin ──► front_end ──► commands ──► CounterStore ──► KeyValueStore    │
//! │  stdout ◄── render ◄──── CountersView      │               │            │
//! │                                            │        SQLite kv_store     │
//! │  stderr ◄── tracing ◄──────────────────────┘        or MemoryStore      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs for testability.

#[tokio::main]
async fn main() {
    if let Err(e) = tally_cli::run().await {
        eprintln!("tally: {}", e);
        std::process::exit(1);
    }
}
