//! Error types for table augmentation and sweep aggregation.

use crate::run::AnalysisKind;
use thiserror::Error;

/// Failures raised while augmenting or ranking a single table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("column '{column}' is not numeric")]
    NotNumeric { column: String },

    #[error("column '{column}' has no value at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("main table has {rows} rows, need {needed} (aggregate + ranked bottlenecks)")]
    InsufficientRows { rows: usize, needed: usize },

    #[error("aggregate value of column '{column}' is zero")]
    ZeroAggregate { column: String },

    #[error("run produced no report tables")]
    NoReports,

    #[error("run has no '{report}' report")]
    MissingReport { report: String },

    #[error("expected a {expected} run, got {found}")]
    KindMismatch {
        expected: AnalysisKind,
        found: AnalysisKind,
    },
}

/// An [`AnalysisError`] tagged with the run it came from.
#[derive(Debug, Error)]
#[error("{kind} analysis failed for {threads} threads")]
pub struct SweepError {
    pub kind: AnalysisKind,
    pub threads: u32,
    #[source]
    pub source: AnalysisError,
}

impl SweepError {
    pub fn new(kind: AnalysisKind, threads: u32, source: AnalysisError) -> Self {
        Self {
            kind,
            threads,
            source,
        }
    }
}
