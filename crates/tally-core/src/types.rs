//! # Domain Types
//!
//! The two value types the rest of Tally is built from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐          ┌─────────────────┐                      │
//! │  │    CounterId    │          │     Counter     │                      │
//! │  │  ─────────────  │          │  ─────────────  │                      │
//! │  │  u32, positive  │◄─────────│  id             │ immutable            │
//! │  │  max + 1        │          │  name           │ free-form, mutable   │
//! │  └─────────────────┘          │  count (i64)    │ may go negative      │
//! │                               └─────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Counter Id
// =============================================================================

/// Identifier of a counter within its collection.
///
/// A newtype struct, so serde writes it as a bare integer and the
/// persisted form stays `{"id":1,...}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct CounterId(u32);

impl CounterId {
    /// Wraps a raw id.
    #[inline]
    pub const fn new(id: u32) -> Self {
        CounterId(id)
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id that follows this one, or `None` at `u32::MAX`.
    #[inline]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(CounterId(next)),
            None => None,
        }
    }
}

impl From<u32> for CounterId {
    fn from(id: u32) -> Self {
        CounterId(id)
    }
}

impl std::fmt::Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad() so width and alignment flags apply
        f.pad(&self.0.to_string())
    }
}

impl std::str::FromStr for CounterId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(CounterId)
    }
}

// =============================================================================
// Counter
// =============================================================================

/// One named tally.
///
/// ## Field Order
/// Field declaration order is the order fields appear in the persisted
/// JSON (`id`, `name`, `count`). Do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Counter {
    /// Unique within the collection, never changes after creation.
    pub id: CounterId,

    /// Label shown on the tab and above the count. Any text, including empty.
    pub name: String,

    /// Current tally. No floor, no ceiling.
    pub count: i64,
}

impl Counter {
    /// Creates a counter with an explicit name and a zero count.
    pub fn new(id: CounterId, name: impl Into<String>) -> Self {
        Counter {
            id,
            name: name.into(),
            count: 0,
        }
    }

    /// Creates a counter with the generated `"Counter {id}"` name.
    pub fn numbered(id: CounterId) -> Self {
        Counter::new(id, format!("Counter {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_id_parsing() {
        assert_eq!("7".parse::<CounterId>().unwrap(), CounterId::new(7));
        assert_eq!(" 12 ".parse::<CounterId>().unwrap(), CounterId::new(12));
        assert!("-1".parse::<CounterId>().is_err());
        assert!("two".parse::<CounterId>().is_err());
    }

    #[test]
    fn test_next_stops_at_max() {
        assert_eq!(CounterId::new(1).next(), Some(CounterId::new(2)));
        assert_eq!(CounterId::new(u32::MAX).next(), None);
    }

    #[test]
    fn test_display_honors_width() {
        assert_eq!(format!("#{:<3}|", CounterId::new(7)), "#7  |");
        assert_eq!(format!("{:>4}", CounterId::new(42)), "  42");
    }

    #[test]
    fn test_numbered_counter_name() {
        let counter = Counter::numbered(CounterId::new(3));
        assert_eq!(counter.name, "Counter 3");
        assert_eq!(counter.count, 0);
    }

    #[test]
    fn test_counter_id_serializes_as_integer() {
        let json = serde_json::to_string(&CounterId::new(4)).unwrap();
        assert_eq!(json, "4");
    }
}
