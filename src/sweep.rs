//! Fold augmented per-thread-count runs into one comparison table.

use crate::config::{AnalysisConfig, BottleneckLocation};
use crate::error::{AnalysisError, SweepError};
use crate::run::{AnalysisKind, Augmented, RunResult};
use crate::table::{Column, Table};
use serde::Serialize;

/// One ranked contributor of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub function: String,
    /// Source file, or the full function stack for that hotspots variant.
    pub location: String,
    pub value: f64,
    /// Percentage of the aggregate for hotspots, ratio for counters.
    pub share: f64,
    /// Aggregate minus this and every higher-ranked contributor.
    pub remainder: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub threads: u32,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_instructions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlated_events: Option<Vec<String>>,
    pub bottlenecks: Vec<Bottleneck>,
}

/// Cross-run comparison for one analysis kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub kind: AnalysisKind,
    #[serde(skip)]
    location: BottleneckLocation,
    #[serde(skip)]
    ranks: usize,
    pub rows: Vec<ComparisonRow>,
}

/// Build the comparison for `runs`, in the order given.
///
/// Rank `i` is row `i` of each run's sorted main table; row 0 is the
/// aggregate.
pub fn aggregate(
    kind: AnalysisKind,
    runs: &[RunResult<Augmented>],
    config: &AnalysisConfig,
) -> Result<Comparison, SweepError> {
    let mut rows = Vec::with_capacity(runs.len());
    for run in runs {
        let row = compare_run(kind, run, config)
            .map_err(|e| SweepError::new(kind, run.tag().threads, e))?;
        rows.push(row);
    }

    let location = match kind {
        AnalysisKind::Hotspots => config.schema.hotspots.location,
        AnalysisKind::Counters => BottleneckLocation::SourceFile,
    };

    Ok(Comparison {
        kind,
        location,
        ranks: config.num_bottlenecks,
        rows,
    })
}

fn compare_run(
    kind: AnalysisKind,
    run: &RunResult<Augmented>,
    config: &AnalysisConfig,
) -> Result<ComparisonRow, AnalysisError> {
    if run.kind() != kind {
        return Err(AnalysisError::KindMismatch {
            expected: kind,
            found: run.kind(),
        });
    }

    let schema = &config.schema;
    let table = run.main();
    let needed = 1 + config.num_bottlenecks;
    if table.num_rows() < needed {
        return Err(AnalysisError::InsufficientRows {
            rows: table.num_rows(),
            needed,
        });
    }

    let metric = schema.ranking_column(kind);
    let total = table.number_at(metric, 0)?;
    if total == 0.0 {
        return Err(AnalysisError::ZeroAggregate {
            column: metric.to_string(),
        });
    }
    let scale = match kind {
        AnalysisKind::Hotspots => 100.0,
        AnalysisKind::Counters => 1.0,
    };

    let mut remainder = total;
    let mut bottlenecks = Vec::with_capacity(config.num_bottlenecks);
    for i in 1..needed {
        let value = table.number_at(metric, i)?;
        remainder -= value;
        bottlenecks.push(Bottleneck {
            function: table.cell(schema.function_column(kind), i)?,
            location: table.cell(schema.location_column(kind), i)?,
            value,
            share: scale * value / total,
            remainder,
        });
    }

    let (total_instructions, correlated_events) = match kind {
        AnalysisKind::Counters => (
            Some(table.number_at(&schema.counters.inst_event, 0)?),
            Some(run.correlated_counters().to_vec()),
        ),
        AnalysisKind::Hotspots => (None, None),
    };

    Ok(ComparisonRow {
        threads: run.tag().threads,
        total,
        total_instructions,
        correlated_events,
        bottlenecks,
    })
}

fn numbers(rows: &[ComparisonRow], f: impl Fn(&ComparisonRow) -> Option<f64>) -> Vec<Option<f64>> {
    rows.iter().map(f).collect()
}

impl Comparison {
    /// Flat table with one row per thread count.
    pub fn to_table(&self) -> Result<Table, AnalysisError> {
        let (total_name, value_name, share_name, rem_name) = match self.kind {
            AnalysisKind::Hotspots => ("Total_CPU_Time", "CPU_seconds", "Percent_Time", "Time"),
            AnalysisKind::Counters => ("Total_Cycles", "Cycles", "Cycles_Fraction", "Cycles"),
        };
        let location_name = match self.location {
            BottleneckLocation::SourceFile => "Source_File",
            BottleneckLocation::FunctionStack => "Function_Stack",
        };

        let mut columns = vec![
            Column::numeric("Threads", numbers(&self.rows, |r| Some(f64::from(r.threads)))),
            Column::numeric(total_name, numbers(&self.rows, |r| Some(r.total))),
        ];
        if self.kind == AnalysisKind::Counters {
            columns.push(Column::numeric(
                "Total_Instructions",
                numbers(&self.rows, |r| r.total_instructions),
            ));
            columns.push(Column::text(
                "Cycle_Correlated_Events",
                self.rows
                    .iter()
                    .map(|r| r.correlated_events.as_deref().unwrap_or_default().join(","))
                    .collect(),
            ));
        }

        for i in 0..self.ranks {
            let prefix = format!("Bottleneck_{}", i + 1);
            let rank = |r: &ComparisonRow| r.bottlenecks.get(i).cloned();
            columns.push(Column::text(
                format!("{}_Function", prefix),
                self.rows
                    .iter()
                    .map(|r| rank(r).map(|b| b.function).unwrap_or_default())
                    .collect(),
            ));
            columns.push(Column::text(
                format!("{}_{}", prefix, location_name),
                self.rows
                    .iter()
                    .map(|r| rank(r).map(|b| b.location).unwrap_or_default())
                    .collect(),
            ));
            columns.push(Column::numeric(
                format!("{}_{}", prefix, value_name),
                numbers(&self.rows, |r| rank(r).map(|b| b.value)),
            ));
            columns.push(Column::numeric(
                format!("{}_{}", prefix, share_name),
                numbers(&self.rows, |r| rank(r).map(|b| b.share)),
            ));
            columns.push(Column::numeric(
                format!("Rem_{}_without_{}", rem_name, prefix),
                numbers(&self.rows, |r| rank(r).map(|b| b.remainder)),
            ));
        }

        Table::from_columns(columns)
    }
}
