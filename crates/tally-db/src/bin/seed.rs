//! # Seed Data Generator
//!
//! Writes a sample counter collection into a database for development.
//!
//! ## Usage
//! ```bash
//! # Seed 5 counters (default)
//! cargo run -p tally-db --bin seed
//!
//! # Seed a custom amount
//! cargo run -p tally-db --bin seed -- --count 12
//!
//! # Specify database path, replacing whatever is stored there
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db --force
//! ```
//!
//! Each counter gets a name from a fixed list of everyday tallies and a
//! count derived from its position, with every third count negative so
//! the front end's sign handling is exercised.

use std::env;
use tally_core::{codec, Counter, CounterCollection, CounterId, STORAGE_KEY};
use tally_db::{Database, DbConfig, KeyValueStore};

/// Names for seeded counters, cycled when more are requested.
const NAMES: &[&str] = &[
    "Push-ups",
    "Glasses of water",
    "Laps",
    "Pages read",
    "Coffee",
    "Birds spotted",
    "Stitches",
    "Visitors",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 5;
    let mut db_path = String::from("./tally.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(5);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of counters to generate (default: 5)");
                println!("  -d, --db <PATH>    Database file path (default: ./tally.db)");
                println!("  -f, --force        Overwrite an existing saved collection");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tally Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!("Counters: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let kv = db.kv();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !force {
        if let Some(existing) = kv.get(STORAGE_KEY).await? {
            println!("⚠ Database already has a saved collection ({} bytes)", existing.len());
            println!("  Skipping seed. Pass --force to overwrite.");
            return Ok(());
        }
    }

    let collection = generate_collection(count);
    let payload = codec::encode_collection(&collection)?;
    kv.set(STORAGE_KEY, &payload).await?;

    println!();
    println!("✓ Wrote {} counters under '{}'", collection.len(), STORAGE_KEY);
    for counter in collection.counters() {
        println!("  #{:<3} {:<20} {:>5}", counter.id, counter.name, counter.count);
    }

    db.close().await;
    Ok(())
}

/// Builds `count` counters with ids `1..=count`.
fn generate_collection(count: usize) -> CounterCollection {
    let counters = (0..count)
        .map(|idx| {
            let id = CounterId::new(idx as u32 + 1);
            let mut counter = Counter::new(id, NAMES[idx % NAMES.len()]);
            let magnitude = ((idx * 7) % 40) as i64;
            counter.count = if idx % 3 == 2 { -magnitude } else { magnitude };
            counter
        })
        .collect();

    CounterCollection::from_persisted(counters)
}
