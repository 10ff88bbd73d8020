//! Per-run results: one thread count, one analysis kind, its report tables.
//!
//! A [`RunResult`] starts [`Raw`] and becomes [`Augmented`] after
//! [`RunResult::augment`]. Only augmented runs can be folded into a sweep.

mod counters;
mod hotspots;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::table::Table;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Hotspots,
    Counters,
}

/// One exported report: report type plus grouping dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSpec {
    pub report: &'static str,
    pub group_by: &'static str,
}

const HOTSPOTS_REPORTS: &[ReportSpec] = &[
    ReportSpec {
        report: "hotspots",
        group_by: "function",
    },
    ReportSpec {
        report: "hotspots",
        group_by: "source-line",
    },
    ReportSpec {
        report: "top-down",
        group_by: "function",
    },
    CALLSTACK_REPORT,
];

/// Call-stack report; the main hotspots table when bottlenecks are labelled
/// by function stack.
pub const CALLSTACK_REPORT: ReportSpec = ReportSpec {
    report: "callstacks",
    group_by: "callstack",
};

impl fmt::Display for ReportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.report, self.group_by)
    }
}

const COUNTERS_REPORTS: &[ReportSpec] = &[
    ReportSpec {
        report: "hw-events",
        group_by: "function",
    },
    ReportSpec {
        report: "hw-events",
        group_by: "source-line",
    },
];

impl AnalysisKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Hotspots => "hotspots",
            AnalysisKind::Counters => "counters",
        }
    }

    /// Reports exported per run, in collection order.
    pub fn reports(self) -> &'static [ReportSpec] {
        match self {
            AnalysisKind::Hotspots => HOTSPOTS_REPORTS,
            AnalysisKind::Counters => COUNTERS_REPORTS,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one profiling run within a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTag {
    pub threads: u32,
    pub program: String,
    pub tag: String,
    pub timestamp: String,
}

impl RunTag {
    /// `{program}-{tag}-t-{threads}-{timestamp}`
    pub fn suffix(&self) -> String {
        format!(
            "{}-{}-t-{}-{}",
            self.program, self.tag, self.threads, self.timestamp
        )
    }

    /// Suffix shared by the whole sweep: `{program}-{tag}-{timestamp}`.
    pub fn sweep_suffix(&self) -> String {
        format!("{}-{}-{}", self.program, self.tag, self.timestamp)
    }

    pub fn with_threads(&self, threads: u32) -> Self {
        Self {
            threads,
            ..self.clone()
        }
    }
}

/// A materialized report table.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub spec: ReportSpec,
    pub table: Table,
}

/// Stage marker: tables exactly as collected.
#[derive(Debug, Clone, Copy)]
pub struct Raw;

/// Stage marker: totals, correlation and ordering applied.
#[derive(Debug, Clone, Copy)]
pub struct Augmented;

#[derive(Debug, Clone)]
pub struct RunResult<S = Raw> {
    kind: AnalysisKind,
    tag: RunTag,
    reports: Vec<Report>,
    /// Index of the report ranked across the sweep.
    main: usize,
    correlated: Vec<String>,
    _stage: PhantomData<S>,
}

impl RunResult<Raw> {
    pub fn new(
        kind: AnalysisKind,
        tag: RunTag,
        reports: Vec<Report>,
    ) -> Result<Self, AnalysisError> {
        if reports.is_empty() {
            return Err(AnalysisError::NoReports);
        }
        Ok(Self {
            kind,
            tag,
            reports,
            main: 0,
            correlated: Vec::new(),
            _stage: PhantomData,
        })
    }
}

impl<S> RunResult<S> {
    /// Run the augmentation recipe for this run's kind.
    ///
    /// Also accepted on an already augmented run, where it leaves the tables
    /// unchanged.
    pub fn augment(
        mut self,
        config: &AnalysisConfig,
    ) -> Result<RunResult<Augmented>, AnalysisError> {
        let wanted = config.schema.main_report(self.kind);
        let main = self
            .reports
            .iter()
            .position(|r| r.spec == wanted)
            .ok_or_else(|| AnalysisError::MissingReport {
                report: wanted.to_string(),
            })?;

        let correlated = match self.kind {
            AnalysisKind::Counters => counters::augment(&mut self.reports, main, config)?,
            AnalysisKind::Hotspots => {
                hotspots::augment(&mut self.reports, main, config)?;
                Vec::new()
            }
        };
        Ok(RunResult {
            kind: self.kind,
            tag: self.tag,
            reports: self.reports,
            main,
            correlated,
            _stage: PhantomData,
        })
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn tag(&self) -> &RunTag {
        &self.tag
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Table used for cross-run comparison. Before augmentation this is the
    /// first collected report.
    pub fn main(&self) -> &Table {
        &self.reports[self.main].table
    }
}

impl RunResult<Augmented> {
    /// Counters correlated with the clock-cycle column, in column order.
    /// Always empty for hotspots runs.
    pub fn correlated_counters(&self) -> &[String] {
        &self.correlated
    }
}
