//! # Counter Commands
//!
//! Thin wrappers over [`CounterStore`] that return a render-ready view.
//!
//! ## Screen Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tally Counter 🔢                                                       │
//! │                                                                         │
//! │   [ Default ]  [*Counter 2*]  [ Counter 3 ]      ◄── tabs              │
//! │                                                                         │
//! │   Counter 2                                      ◄── active name       │
//! │   7                                              ◄── active count      │
//! │                                                                         │
//! │   invoke get_counters() → CountersView                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tally_core::{codec, Counter, CounterCollection, CounterId};
use tracing::debug;

use crate::error::ApiError;
use crate::state::CounterStore;

// =============================================================================
// View Types
// =============================================================================

/// Everything the front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountersView {
    /// False until the saved collection has been loaded (or failed to).
    pub ready: bool,

    /// The resolved active counter. `None` only for an empty collection.
    pub active: Option<ActiveCounterView>,

    /// One tab per counter, in display order.
    pub tabs: Vec<TabView>,
}

/// The counter shown in the main panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCounterView {
    pub id: CounterId,
    pub name: String,
    pub count: i64,
}

impl From<&Counter> for ActiveCounterView {
    fn from(counter: &Counter) -> Self {
        ActiveCounterView {
            id: counter.id,
            name: counter.name.clone(),
            count: counter.count,
        }
    }
}

/// A selectable tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub id: CounterId,
    pub name: String,

    /// Highlighted tab. Compares against the stored active id, so a
    /// dangling selection highlights nothing even though the first
    /// counter is displayed.
    pub is_active: bool,

    /// Screen reader text, e.g. "Switch to Default".
    pub accessibility_label: String,
}

impl CountersView {
    /// Builds the view for a collection snapshot.
    pub fn new(ready: bool, counters: &CounterCollection) -> Self {
        let active_id = counters.active_id();

        CountersView {
            ready,
            active: counters.resolve_active().map(ActiveCounterView::from),
            tabs: counters
                .counters()
                .iter()
                .map(|counter| TabView {
                    id: counter.id,
                    name: counter.name.clone(),
                    is_active: counter.id == active_id,
                    accessibility_label: format!("Switch to {}", counter.name),
                })
                .collect(),
        }
    }
}

fn view(store: &CounterStore, counters: &CounterCollection) -> CountersView {
    CountersView::new(store.is_ready(), counters)
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current counters.
pub fn get_counters(store: &CounterStore) -> CountersView {
    debug!("get_counters command");
    view(store, &store.snapshot())
}

/// Adds one to the active counter.
pub fn increment(store: &CounterStore) -> CountersView {
    debug!("increment command");
    view(store, &store.increment())
}

/// Subtracts one from the active counter.
pub fn decrement(store: &CounterStore) -> CountersView {
    debug!("decrement command");
    view(store, &store.decrement())
}

/// Renames the active counter. The name is stored exactly as given,
/// including surrounding whitespace or an empty string.
pub fn rename_counter(store: &CounterStore, name: &str) -> CountersView {
    debug!(name = %name, "rename_counter command");
    view(store, &store.rename(name))
}

/// Appends a counter named "Counter {id}" and switches to it.
pub fn add_counter(store: &CounterStore) -> CountersView {
    debug!("add_counter command");
    view(store, &store.add_counter())
}

/// Switches the active counter.
///
/// ## Errors
/// `VALIDATION_ERROR` if `id` is not a whole number. An id that parses but
/// matches no counter is accepted; the first counter is displayed instead.
pub fn select_counter(store: &CounterStore, id: &str) -> Result<CountersView, ApiError> {
    debug!(id = %id, "select_counter command");

    let id: CounterId = id.parse().map_err(|_| {
        ApiError::validation(format!(
            "Counter id must be a whole number, got '{}'",
            id.trim()
        ))
    })?;

    Ok(view(store, &store.select_counter(id)))
}

/// Renders the collection in its stored JSON form.
pub fn export_counters(store: &CounterStore) -> Result<String, ApiError> {
    debug!("export_counters command");
    Ok(codec::encode_collection(&store.snapshot())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::sync::Arc;
    use tally_db::MemoryStore;

    async fn loaded_store() -> CounterStore {
        let store = CounterStore::new(Arc::new(MemoryStore::new()));
        store.load().await;
        store
    }

    #[tokio::test]
    async fn test_get_counters_default() {
        let store = loaded_store().await;
        let view = get_counters(&store);

        assert!(view.ready);
        assert_eq!(
            view.active,
            Some(ActiveCounterView {
                id: CounterId::new(1),
                name: "Default".into(),
                count: 0,
            })
        );
        assert_eq!(view.tabs.len(), 1);
        assert!(view.tabs[0].is_active);
        assert_eq!(view.tabs[0].accessibility_label, "Switch to Default");
    }

    #[test]
    fn test_view_before_load_is_not_ready() {
        let store = CounterStore::new(Arc::new(MemoryStore::new()));
        assert!(!get_counters(&store).ready);
    }

    #[tokio::test]
    async fn test_add_then_select_back() {
        let store = loaded_store().await;

        let view = add_counter(&store);
        assert_eq!(view.tabs.len(), 2);
        assert_eq!(view.active.as_ref().map(|a| a.name.as_str()), Some("Counter 2"));
        assert!(!view.tabs[0].is_active);
        assert!(view.tabs[1].is_active);

        increment(&store);
        let view = select_counter(&store, "1").unwrap();
        assert_eq!(view.active.as_ref().map(|a| a.count), Some(0));
        assert!(view.tabs[0].is_active);
        assert_eq!(view.tabs[1].name, "Counter 2");
    }

    #[tokio::test]
    async fn test_increment_decrement() {
        let store = loaded_store().await;

        increment(&store);
        increment(&store);
        let view = decrement(&store);

        assert_eq!(view.active.map(|a| a.count), Some(1));
    }

    #[tokio::test]
    async fn test_rename_counter_verbatim() {
        let store = loaded_store().await;

        let view = rename_counter(&store, "  Laps ");
        assert_eq!(view.active.as_ref().map(|a| a.name.as_str()), Some("  Laps "));
        assert_eq!(view.tabs[0].accessibility_label, "Switch to   Laps ");
    }

    #[tokio::test]
    async fn test_select_counter_rejects_garbage() {
        let store = loaded_store().await;

        let err = select_counter(&store, "two").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("'two'"));
    }

    #[tokio::test]
    async fn test_select_unknown_id_falls_back() {
        let store = loaded_store().await;

        let view = select_counter(&store, "42").unwrap();
        assert_eq!(view.active.map(|a| a.id), Some(CounterId::new(1)));
        assert!(view.tabs.iter().all(|tab| !tab.is_active));
    }

    #[tokio::test]
    async fn test_export_counters() {
        let store = loaded_store().await;
        increment(&store);

        assert_eq!(
            export_counters(&store).unwrap(),
            r#"[{"id":1,"name":"Default","count":1}]"#
        );
    }

    #[test]
    fn test_view_serialization() {
        let view = CountersView::new(true, &CounterCollection::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["ready"], true);
        assert_eq!(json["active"]["name"], "Default");
        assert_eq!(json["tabs"][0]["isActive"], true);
        assert_eq!(json["tabs"][0]["accessibilityLabel"], "Switch to Default");
    }
}
