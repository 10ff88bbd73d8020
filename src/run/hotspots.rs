use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::run::{AnalysisKind, Report};
use crate::stats::{sort_descending, totals};

/// Hotspots recipe: totals, then CPU-time ordering, on `reports[main]` only.
/// Supplementary reports are kept as collected.
pub(super) fn augment(
    reports: &mut [Report],
    main: usize,
    config: &AnalysisConfig,
) -> Result<(), AnalysisError> {
    let kind = AnalysisKind::Hotspots;
    let main = &mut reports[main].table;
    totals::apply(main, config.schema.total_policy(kind), &config.total_label)?;
    sort_descending(main, config.schema.ranking_column(kind), true)
}
