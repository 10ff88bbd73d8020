use crate::config::{AnalysisConfig, TotalPolicy};
use crate::error::AnalysisError;
use crate::run::{AnalysisKind, Report};
use crate::stats::{correlated_counters, sort_descending, totals};
use crate::table::Table;

/// Whether row 0 of `table` already holds the aggregate.
fn aggregate_pinned(table: &Table, policy: TotalPolicy, label: &str) -> bool {
    match policy {
        TotalPolicy::Append => totals::has_synthesized_total(table, label),
        TotalPolicy::ReplaceIfZero => true,
    }
}

/// Counters recipe. Correlation is computed first, on `reports[main]`, so the
/// total row never enters the coefficient; totals and clock-cycle ordering are
/// then applied to every report.
pub(super) fn augment(
    reports: &mut [Report],
    main: usize,
    config: &AnalysisConfig,
) -> Result<Vec<String>, AnalysisError> {
    let policy = config.schema.total_policy(AnalysisKind::Counters);
    let metric = config.schema.ranking_column(AnalysisKind::Counters);
    let label = config.total_label.as_str();

    let main = &reports[main].table;
    let correlated = correlated_counters(
        main,
        &config.schema.counters,
        config.correlation_cutoff,
        aggregate_pinned(main, policy, label),
    )?;

    for report in reports.iter_mut() {
        totals::apply(&mut report.table, policy, label)?;
        sort_descending(&mut report.table, metric, true)?;
    }

    Ok(correlated)
}
