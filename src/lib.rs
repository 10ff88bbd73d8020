//! Thread-count sweep analysis for VTune hotspots and hardware-counter
//! reports.
//!
//! Raw report tables go through [`run::RunResult::augment`] (totals,
//! cycle correlation, ordering) and are folded by [`sweep::aggregate`] into
//! one comparison table per sweep.

pub mod collect;
pub mod config;
pub mod driver;
pub mod error;
pub mod run;
pub mod stats;
pub mod sweep;
pub mod table;

pub type Result<T> = anyhow::Result<T>;
