//! Sweep driver: run every thread count in turn, then compare.

use crate::collect::{Collector, comparison_file_name, run_file_name};
use crate::config::AnalysisConfig;
use crate::error::SweepError;
use crate::Result;
use crate::run::{AnalysisKind, Augmented, RunResult, RunTag};
use crate::sweep::{self, Comparison};
use anyhow::{Context, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Files written by a successful sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    pub run_files: Vec<PathBuf>,
    pub comparison_file: PathBuf,
    pub comparison: Comparison,
}

/// Collect, augment and write each run for `threads` (in order), then write
/// the comparison table.
///
/// Runs are processed one at a time. The first failure aborts the sweep and
/// no comparison file is written.
pub fn run_sweep(
    collector: &mut dyn Collector,
    kind: AnalysisKind,
    base: &RunTag,
    threads: &[u32],
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<SweepOutcome> {
    if threads.is_empty() {
        bail!("no thread counts given");
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;

    let mut runs: Vec<RunResult<Augmented>> = Vec::with_capacity(threads.len());
    let mut run_files = Vec::new();

    for &t in threads {
        let tag = base.with_threads(t);
        info!("{} run with {} threads", kind, t);

        let reports = collector
            .collect(kind, &tag)
            .with_context(|| format!("collect {} reports for {} threads", kind, t))?;

        let run = RunResult::new(kind, tag.clone(), reports)
            .and_then(|raw| raw.augment(config))
            .map_err(|e| SweepError::new(kind, t, e))?;

        for report in run.reports() {
            let path = out_dir.join(run_file_name(kind, &report.spec, &tag));
            report.table.write_delimited(&path, config.delimiter)?;
            info!("wrote {}", path.display());
            run_files.push(path);
        }
        if kind == AnalysisKind::Counters {
            info!(
                "{} threads: cycle-correlated events [{}]",
                t,
                run.correlated_counters().join(",")
            );
        }
        runs.push(run);
    }

    let comparison = sweep::aggregate(kind, &runs, config)?;
    let table = comparison
        .to_table()
        .context("build comparison table")?;

    let comparison_file = out_dir.join(comparison_file_name(kind, base));
    table.write_delimited(&comparison_file, config.delimiter)?;
    info!("wrote {}", comparison_file.display());

    Ok(SweepOutcome {
        run_files,
        comparison_file,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::Report;
    use crate::table::{Column, Table};
    use std::collections::BTreeMap;

    /// In-memory collector keyed by thread count.
    struct Canned(BTreeMap<u32, Vec<f64>>);

    impl Collector for Canned {
        fn collect(&mut self, kind: AnalysisKind, tag: &RunTag) -> Result<Vec<Report>> {
            let Some(cpu) = self.0.get(&tag.threads) else {
                bail!("profiler exited with status 1");
            };
            let names: Vec<String> = (0..cpu.len()).map(|i| format!("f{}", i)).collect();
            let table = Table::from_columns(vec![
                Column::text("Function", names.clone()),
                Column::text("Source File", names),
                Column::numeric("CPU Time", cpu.iter().copied().map(Some).collect()),
            ])?;
            Ok(vec![Report {
                spec: kind.reports()[0],
                table,
            }])
        }
    }

    fn base() -> RunTag {
        RunTag {
            threads: 0,
            program: "app".into(),
            tag: "x".into(),
            timestamp: "ts".into(),
        }
    }

    #[test]
    fn failed_collection_aborts_without_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = Canned(BTreeMap::from([(1, vec![10.0, 5.0, 3.0, 2.0])]));
        let err = run_sweep(
            &mut c,
            AnalysisKind::Hotspots,
            &base(),
            &[1, 2],
            &AnalysisConfig::default(),
            dir.path(),
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("for 2 threads"), "{:#}", err);
        assert!(!dir.path().join(comparison_file_name(AnalysisKind::Hotspots, &base())).exists());
    }

    #[test]
    fn insufficient_rows_names_the_thread_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = Canned(BTreeMap::from([
            (1, vec![10.0, 5.0, 3.0, 2.0]),
            (2, vec![10.0, 5.0]),
        ]));
        let err = run_sweep(
            &mut c,
            AnalysisKind::Hotspots,
            &base(),
            &[1, 2],
            &AnalysisConfig::default(),
            dir.path(),
        )
        .unwrap_err();
        let sweep_err = err.downcast_ref::<SweepError>().unwrap();
        assert_eq!(sweep_err.threads, 2);
        assert!(!dir.path().join(comparison_file_name(AnalysisKind::Hotspots, &base())).exists());
    }
}
