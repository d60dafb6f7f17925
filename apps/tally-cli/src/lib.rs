//! # Tally Library
//!
//! Wires configuration, storage, the counter store and the terminal front
//! end together.
//!
//! ## Module Organization
//! ```text
//! tally_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── counters.rs ◄─── CounterStore (collection + persistence glue)
//! │   └── config.rs   ◄─── AppConfig (TOML + env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   └── counter.rs  ◄─── Counter commands and view types
//! ├── front_end.rs    ◄─── Line-based terminal screen
//! └── error.rs        ◄─── AppError, PersistenceFailure, ApiError
//! ```

pub mod commands;
pub mod error;
pub mod front_end;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tally_db::{Database, DbConfig, KeyValueStore, MemoryStore};
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use error::{AppError, AppResult};
use state::{AppConfig, CounterStore, StorageBackend};

/// Filter used when neither `RUST_LOG` nor the config sets one.
const DEFAULT_LOG_FILTER: &str = "info,tally=debug,tally_cli=debug,tally_db=debug,sqlx=warn";

/// Filter while the config itself is being read.
const BOOTSTRAP_LOG_FILTER: &str = "warn";

// =============================================================================
// Command Line
// =============================================================================

/// Options given on the command line. They override config and env.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub storage: Option<StorageBackend>,
    pub db: Option<PathBuf>,
    pub help: bool,
}

impl CliArgs {
    /// Parses arguments, skipping the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> AppResult<Self> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => parsed.config = Some(PathBuf::from(value(&arg, args.next())?)),
                "--storage" | "-s" => parsed.storage = Some(value(&arg, args.next())?.parse()?),
                "--db" | "-d" => parsed.db = Some(PathBuf::from(value(&arg, args.next())?)),
                "--help" | "-h" => parsed.help = true,
                other => {
                    return Err(AppError::InvalidConfig(format!(
                        "Unknown argument '{}'",
                        other
                    )))
                }
            }
        }

        Ok(parsed)
    }

    /// Folds command line overrides into the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(db) = &self.db {
            config.storage.database_path = Some(db.clone());
        }
    }
}

fn value(flag: &str, next: Option<String>) -> AppResult<String> {
    next.ok_or_else(|| AppError::InvalidConfig(format!("{} needs a value", flag)))
}

fn print_help() {
    println!("Tally Counter");
    println!();
    println!("Usage: tally [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>     Config file (default: platform config dir/tally.toml)");
    println!("  -s, --storage <KIND>    sqlite | memory");
    println!("  -d, --db <PATH>         SQLite file for the sqlite backend");
    println!("  -h, --help              Show this help message");
}

// =============================================================================
// Startup
// =============================================================================

/// Runs the application against stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse command line                                                 │
/// │  2. Load AppConfig (file ► env ► command line), warnings to stderr     │
/// │  3. Initialize logging (stderr, RUST_LOG ► config ► default)           │
/// │  4. Open storage (SQLite with migrations, or memory)                   │
/// │  5. CounterStore::new + load().await  ──► ready                        │
/// │  6. Terminal session until quit / EOF                                  │
/// │  7. Wait for pending saves, then close the database pool               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> AppResult<()> {
    let args = CliArgs::parse(std::env::args())?;
    if args.help {
        print_help();
        return Ok(());
    }

    let mut config =
        with_bootstrap_logging(std::io::stderr, || AppConfig::load(args.config.clone()))?;
    args.apply(&mut config);
    config.validate()?;

    init_tracing(config.log.filter.as_deref());
    info!(backend = %config.storage.backend, "Starting Tally");

    let (storage, db) = open_storage(&config).await?;

    let store = CounterStore::new(storage);
    store.load().await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    front_end::run(&store, stdin, tokio::io::stdout()).await?;

    shutdown(&store, db).await;
    Ok(())
}

/// Lets the saves for the last changes land before the pool closes.
pub async fn shutdown(store: &CounterStore, db: Option<Database>) {
    store.flush().await;
    if let Some(db) = db {
        db.close().await;
    }
}

/// Opens the configured backend. The `Database` is returned alongside so
/// the pool can be closed on exit.
pub async fn open_storage(
    config: &AppConfig,
) -> AppResult<(Arc<dyn KeyValueStore>, Option<Database>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage, counters will not survive exit");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        StorageBackend::Sqlite => {
            let path = config.database_path()?;
            info!(?path, "Database path determined");

            let db = Database::new(
                DbConfig::new(path).max_connections(config.storage.max_connections),
            )
            .await?;
            info!("Database connected and migrations applied");

            Ok((Arc::new(db.kv()), Some(db)))
        }
    }
}

/// Runs `f` with a temporary subscriber that prints warnings.
///
/// The real subscriber depends on `log.filter`, so anything logged while
/// the config loads would otherwise be dropped.
fn with_bootstrap_logging<W, T>(make_writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(BOOTSTRAP_LOG_FILTER))
        .with_writer(make_writer)
        .finish();

    tracing::subscriber::with_default(subscriber, f)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `log.filter` / `TALLY_LOG` - Used when `RUST_LOG` is unset
/// - Default: INFO, DEBUG for the tally crates
///
/// Logs go to stderr so they never interleave with the screen on stdout.
fn init_tracing(configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A subscriber may already be installed (tests); keep the first one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tally_core::STORAGE_KEY;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tally")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = CliArgs::parse(args(&["--storage", "memory", "-d", "/tmp/t.db"])).unwrap();
        assert_eq!(parsed.storage, Some(StorageBackend::Memory));
        assert_eq!(parsed.db, Some(PathBuf::from("/tmp/t.db")));
        assert!(!parsed.help);

        assert!(CliArgs::parse(args(&["-h"])).unwrap().help);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(CliArgs::parse(args(&["--db"])).is_err());
        assert!(CliArgs::parse(args(&["--storage", "tape"])).is_err());
        assert!(CliArgs::parse(args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_args_override_config() {
        let mut config = AppConfig::default();
        let parsed = CliArgs::parse(args(&["--storage", "memory", "--db", "x.db"])).unwrap();
        parsed.apply(&mut config);

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.database_path, Some(PathBuf::from("x.db")));
    }

    #[tokio::test]
    async fn test_counters_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.database_path = Some(dir.path().join("tally.db"));

        let (storage, db) = open_storage(&config).await.unwrap();
        let store = CounterStore::new(Arc::clone(&storage));
        store.load().await;
        store.add_counter();
        store.rename("Laps");

        // Saves are fire-and-forget; poll until the last one lands.
        let expected = r#"[{"id":1,"name":"Default","count":0},{"id":2,"name":"Laps","count":0}]"#;
        tokio::time::timeout(std::time::Duration::from_secs(2), async {
            while storage.get(STORAGE_KEY).await.unwrap().as_deref() != Some(expected) {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        if let Some(db) = db {
            db.close().await;
        }

        let (storage, _db) = open_storage(&config).await.unwrap();
        let store = CounterStore::new(storage);
        store.load().await;

        let counters = store.snapshot();
        assert_eq!(counters.len(), 2);
        assert_eq!(counters.counters()[1].name, "Laps");
        assert_eq!(counters.active_id().get(), 1);
    }

    #[test]
    fn test_config_warnings_are_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();

        let config = with_bootstrap_logging(
            move || writer.clone(),
            || {
                let mut config = AppConfig::default();
                config.apply_overrides(|name| {
                    (name == "TALLY_STORAGE").then(|| "floppy".to_string())
                });
                config
            },
        );

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(logs.text().contains("Ignoring TALLY_STORAGE"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_last_change_before_quit_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.database_path = Some(dir.path().join("tally.db"));

        for session in 1..=10 {
            let (storage, db) = open_storage(&config).await.unwrap();
            let store = CounterStore::new(storage);
            store.load().await;

            let script: &[u8] = b"+\nquit\n";
            front_end::run(&store, script, tokio::io::sink()).await.unwrap();
            shutdown(&store, db).await;

            let reopened = Database::new(DbConfig::new(dir.path().join("tally.db")))
                .await
                .unwrap();
            let saved = reopened.kv().get(STORAGE_KEY).await.unwrap();
            assert_eq!(
                saved,
                Some(format!(r#"[{{"id":1,"name":"Default","count":{}}}]"#, session))
            );
            reopened.close().await;
        }
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;

        let (storage, db) = open_storage(&config).await.unwrap();
        assert!(db.is_none());
        assert_eq!(storage.get(STORAGE_KEY).await.unwrap(), None);
    }
}
