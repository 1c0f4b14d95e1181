//! Day-granular time helpers.
//!
//! Due-date comparisons throughout the engine are day-granular: a flow is
//! due when its due date is on or before "today". Services resolve "today"
//! once at the boundary and pass it down, so the pure computations stay
//! deterministic under test.

use chrono::{NaiveDate, Utc};

/// The current calendar date used for due-date comparisons.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
