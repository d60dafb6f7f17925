//! # Counter Collection
//!
//! The ordered set of counters plus the pointer to the active one.
//!
//! ## Snapshot Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Collection Transformations                           │
//! │                                                                         │
//! │  Front End Action         Transformation          Resulting Snapshot    │
//! │  ────────────────         ──────────────          ──────────────────    │
//! │                                                                         │
//! │  Press +  ───────────────► increment() ─────────► active.count + 1     │
//! │                                                                         │
//! │  Press -  ───────────────► decrement() ─────────► active.count - 1     │
//! │                                                                         │
//! │  Edit name ──────────────► rename(text) ────────► active.name = text   │
//! │                                                                         │
//! │  Press add ──────────────► add_counter() ───────► push + activate      │
//! │                                                                         │
//! │  Tap a tab ──────────────► select_counter(id) ──► active_id = id       │
//! │                                                                         │
//! │  Render ─────────────────► resolve_active() ────► (read only)          │
//! │                                                                         │
//! │  NOTE: every transformation borrows the current snapshot and returns   │
//! │        a new one. The caller decides what to do with the old one.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `add_counter` always allocates an id above every existing id, or
//!   changes nothing once `u32::MAX` is taken
//! - `active_id` is never corrected automatically; reads fall back to the
//!   first counter when it does not resolve
//! - Insertion order is display order

use crate::types::{Counter, CounterId};
use crate::{DEFAULT_COUNTER_ID, DEFAULT_COUNTER_NAME};

/// The full ordered set of counters and which one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterCollection {
    counters: Vec<Counter>,
    active_id: CounterId,
}

impl Default for CounterCollection {
    /// The collection every fresh install starts with:
    /// one `"Default"` counter at zero, active.
    fn default() -> Self {
        CounterCollection {
            counters: vec![Counter::new(DEFAULT_COUNTER_ID, DEFAULT_COUNTER_NAME)],
            active_id: DEFAULT_COUNTER_ID,
        }
    }
}

impl CounterCollection {
    /// Builds a collection from raw parts.
    ///
    /// Nothing is validated: duplicate ids and a dangling `active_id` are
    /// accepted as-is, exactly like a hand-edited saved payload.
    pub fn from_parts(counters: Vec<Counter>, active_id: CounterId) -> Self {
        CounterCollection {
            counters,
            active_id,
        }
    }

    /// Builds a collection from counters read back from storage.
    ///
    /// The stored form carries no active pointer, so the first counter
    /// becomes active (or the default id when the array is empty).
    pub fn from_persisted(counters: Vec<Counter>) -> Self {
        let active_id = counters
            .first()
            .map(|c| c.id)
            .unwrap_or(DEFAULT_COUNTER_ID);
        CounterCollection::from_parts(counters, active_id)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All counters in display order.
    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    /// The raw active pointer (may not resolve, see [`Self::resolve_active`]).
    pub fn active_id(&self) -> CounterId {
        self.active_id
    }

    /// Number of counters.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// True only for a collection decoded from an empty saved array.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Looks up a counter by id.
    pub fn get(&self, id: CounterId) -> Option<&Counter> {
        self.counters.iter().find(|c| c.id == id)
    }

    /// Returns the counter the front end should display.
    ///
    /// ## Resolution Order
    /// 1. The counter whose id equals `active_id`
    /// 2. The first counter in the collection
    /// 3. `None`, only for an empty collection
    pub fn resolve_active(&self) -> Option<&Counter> {
        self.get(self.active_id).or_else(|| self.counters.first())
    }

    /// The id `add_counter` would allocate next: `max(ids) + 1`, or `1`.
    ///
    /// `None` once some counter already holds `u32::MAX`; no id above it
    /// exists.
    pub fn next_id(&self) -> Option<CounterId> {
        match self.counters.iter().map(|c| c.id).max() {
            Some(max) => max.next(),
            None => Some(DEFAULT_COUNTER_ID),
        }
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    /// Adds one to the active counter.
    pub fn increment(&self) -> Self {
        self.adjust(1)
    }

    /// Subtracts one from the active counter. Counts may go negative.
    pub fn decrement(&self) -> Self {
        self.adjust(-1)
    }

    /// Adds `delta` to the counter whose id equals `active_id`.
    ///
    /// Unlike [`Self::resolve_active`] there is no fallback here: if the
    /// active id does not resolve, nothing changes.
    pub fn adjust(&self, delta: i64) -> Self {
        self.map_active(|counter| counter.count = counter.count.wrapping_add(delta))
    }

    /// Replaces the active counter's name verbatim (no trimming, empty allowed).
    pub fn rename(&self, name: &str) -> Self {
        self.map_active(|counter| counter.name = name.to_string())
    }

    /// Appends a `"Counter {id}"` counter at zero and makes it active.
    ///
    /// Returns an unchanged copy when [`Self::next_id`] is exhausted.
    pub fn add_counter(&self) -> Self {
        let Some(id) = self.next_id() else {
            return self.clone();
        };
        let mut counters = self.counters.clone();
        counters.push(Counter::numbered(id));
        CounterCollection {
            counters,
            active_id: id,
        }
    }

    /// Points `active_id` at `id` without checking that it exists.
    pub fn select_counter(&self, id: CounterId) -> Self {
        CounterCollection {
            counters: self.counters.clone(),
            active_id: id,
        }
    }

    fn map_active(&self, f: impl Fn(&mut Counter)) -> Self {
        let counters = self
            .counters
            .iter()
            .cloned()
            .map(|mut counter| {
                if counter.id == self.active_id {
                    f(&mut counter);
                }
                counter
            })
            .collect();
        CounterCollection {
            counters,
            active_id: self.active_id,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> CounterId {
        CounterId::new(raw)
    }

    #[test]
    fn test_default_collection() {
        let counters = CounterCollection::default();

        assert_eq!(counters.counters(), &[Counter::new(id(1), "Default")]);
        assert_eq!(counters.active_id(), id(1));
    }

    #[test]
    fn test_count_is_sum_of_deltas() {
        let deltas = [1, 1, -1, -1, -1, -1, 1, -1];
        let mut counters = CounterCollection::default();
        for delta in deltas {
            counters = if delta > 0 {
                counters.increment()
            } else {
                counters.decrement()
            };
        }

        let expected: i64 = deltas.iter().sum();
        assert_eq!(counters.resolve_active().unwrap().count, expected);
        assert_eq!(expected, -2); // no floor at zero
    }

    #[test]
    fn test_increment_only_touches_active() {
        let counters = CounterCollection::default()
            .add_counter()
            .increment()
            .increment();

        assert_eq!(counters.get(id(1)).unwrap().count, 0);
        assert_eq!(counters.get(id(2)).unwrap().count, 2);
    }

    #[test]
    fn test_transformations_leave_original_untouched() {
        let before = CounterCollection::default();
        let after = before.increment();

        assert_eq!(before.resolve_active().unwrap().count, 0);
        assert_eq!(after.resolve_active().unwrap().count, 1);
    }

    #[test]
    fn test_add_counter() {
        let counters = CounterCollection::default().add_counter();

        assert_eq!(counters.len(), 2);
        assert_eq!(counters.active_id(), id(2));
        assert_eq!(counters.counters()[1], Counter::new(id(2), "Counter 2"));
    }

    #[test]
    fn test_add_counter_uses_max_id_not_length() {
        let counters = CounterCollection::from_parts(
            vec![Counter::new(id(5), "A"), Counter::new(id(2), "B")],
            id(5),
        )
        .add_counter();

        assert_eq!(counters.active_id(), id(6));
        assert!(counters.counters()[..2].iter().all(|c| c.id < id(6)));
        assert_eq!(counters.resolve_active().unwrap().count, 0);
    }

    #[test]
    fn test_add_counter_with_max_id_is_unchanged() {
        let before = CounterCollection::from_parts(
            vec![Counter::new(id(3), "A"), Counter::new(id(u32::MAX), "B")],
            id(3),
        );

        assert_eq!(before.next_id(), None);
        assert_eq!(before.add_counter(), before);
    }

    #[test]
    fn test_add_counter_to_empty_collection() {
        let counters = CounterCollection::from_persisted(Vec::new()).add_counter();

        assert_eq!(counters.counters(), &[Counter::new(id(1), "Counter 1")]);
        assert_eq!(counters.active_id(), id(1));
    }

    #[test]
    fn test_rename_only_changes_active_name() {
        let before = CounterCollection::default()
            .increment()
            .add_counter()
            .decrement();
        let after = before.rename("  spaced out  ");

        assert_eq!(after.get(id(2)).unwrap().name, "  spaced out  ");
        assert_eq!(after.get(id(1)), before.get(id(1)));
        for (old, new) in before.counters().iter().zip(after.counters()) {
            assert_eq!(old.count, new.count);
            assert_eq!(old.id, new.id);
        }
    }

    #[test]
    fn test_rename_to_empty_string() {
        let counters = CounterCollection::default().rename("");
        assert_eq!(counters.resolve_active().unwrap().name, "");
    }

    #[test]
    fn test_select_unknown_falls_back_to_first() {
        let counters = CounterCollection::default().add_counter().select_counter(id(42));

        assert_eq!(counters.active_id(), id(42)); // not auto-corrected
        assert_eq!(counters.resolve_active().unwrap().id, id(1));
    }

    #[test]
    fn test_increment_with_dangling_active_is_noop() {
        let before = CounterCollection::default().select_counter(id(9));
        let after = before.increment();

        assert_eq!(before, after);
    }

    #[test]
    fn test_select_switches_active() {
        let counters = CounterCollection::default().add_counter().select_counter(id(1));

        assert_eq!(counters.resolve_active().unwrap().name, "Default");
    }

    #[test]
    fn test_resolve_active_on_empty() {
        let counters = CounterCollection::from_persisted(Vec::new());
        assert!(counters.resolve_active().is_none());
        assert!(counters.is_empty());
    }

    #[test]
    fn test_from_persisted_activates_first() {
        let counters = CounterCollection::from_persisted(vec![
            Counter::new(id(3), "Laps"),
            Counter::new(id(1), "Push-ups"),
        ]);

        assert_eq!(counters.active_id(), id(3));
    }
}
