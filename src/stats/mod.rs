//! Derived statistics over profiler tables: totals, counter correlation and
//! ranking. Each step works on one in-memory [`Table`](crate::table::Table).

pub mod correlate;
pub mod rank;
pub mod totals;

pub use correlate::{correlated_counters, pearson};
pub use rank::sort_descending;
