//! Collection boundary: where per-run report tables come from, and how
//! report files are named.

use crate::run::{AnalysisKind, Report, ReportSpec, RunTag};
use crate::Result;
use crate::table::read_delimited;
use anyhow::{Context, bail};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Produces the report tables of one profiling run, in
/// [`AnalysisKind::reports`] order.
pub trait Collector {
    fn collect(&mut self, kind: AnalysisKind, tag: &RunTag) -> Result<Vec<Report>>;
}

/// `vtune-{report}-{group_by}-{run suffix}.csv`, as exported by the profiler.
pub fn raw_report_file_name(spec: &ReportSpec, tag: &RunTag) -> String {
    format!("vtune-{}-{}-{}.csv", spec.report, spec.group_by, tag.suffix())
}

/// `vtune-{kind}-{report}-{group_by}-{run suffix}.csv`, augmented output.
pub fn run_file_name(kind: AnalysisKind, spec: &ReportSpec, tag: &RunTag) -> String {
    format!(
        "vtune-{}-{}-{}-{}.csv",
        kind,
        spec.report,
        spec.group_by,
        tag.suffix()
    )
}

/// `vtune-threads-vs-{kind}-{program}-{tag}-{timestamp}.csv`
pub fn comparison_file_name(kind: AnalysisKind, tag: &RunTag) -> String {
    format!("vtune-threads-vs-{}-{}.csv", kind, tag.sweep_suffix())
}

/// Reads reports that were already exported into a directory.
#[derive(Debug, Clone)]
pub struct ExportedReports {
    dir: PathBuf,
    delimiter: char,
}

impl ExportedReports {
    pub fn new(dir: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            dir: dir.into(),
            delimiter,
        }
    }

    /// Path of `name` in the directory. On clusters the profiler may append
    /// the host name (`<name>.<host>`); a single such file is accepted.
    fn locate(&self, name: &str) -> Result<PathBuf> {
        let exact = self.dir.join(name);
        if exact.is_file() {
            return Ok(exact);
        }

        let re = Regex::new(&format!(r"^{}\.(.+)$", regex::escape(name)))?;
        let mut found = Vec::new();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("list report directory {}", self.dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(caps) = re.captures(file_name) {
                found.push((entry.path(), caps[1].to_string()));
            }
        }

        match found.len() {
            0 => bail!("report {} not found in {}", name, self.dir.display()),
            1 => {
                let (path, host) = found.remove(0);
                warn!("using host-suffixed report {} (host {})", path.display(), host);
                Ok(path)
            }
            n => bail!(
                "report {} is ambiguous: {} host-suffixed copies in {}",
                name,
                n,
                self.dir.display()
            ),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Collector for ExportedReports {
    fn collect(&mut self, kind: AnalysisKind, tag: &RunTag) -> Result<Vec<Report>> {
        let mut out = Vec::new();
        for spec in kind.reports() {
            let path = self.locate(&raw_report_file_name(spec, tag))?;
            debug!("reading {}", path.display());
            let table = read_delimited(&path, self.delimiter)?;
            out.push(Report { spec: *spec, table });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tag() -> RunTag {
        RunTag {
            threads: 2,
            program: "lulesh".into(),
            tag: "o3".into(),
            timestamp: "2026-10-14_10.00.00".into(),
        }
    }

    #[test]
    fn file_names() {
        let spec = AnalysisKind::Counters.reports()[1];
        assert_eq!(
            raw_report_file_name(&spec, &tag()),
            "vtune-hw-events-source-line-lulesh-o3-t-2-2026-10-14_10.00.00.csv"
        );
        assert_eq!(
            run_file_name(AnalysisKind::Counters, &spec, &tag()),
            "vtune-counters-hw-events-source-line-lulesh-o3-t-2-2026-10-14_10.00.00.csv"
        );
        assert_eq!(
            comparison_file_name(AnalysisKind::Hotspots, &tag()),
            "vtune-threads-vs-hotspots-lulesh-o3-2026-10-14_10.00.00.csv"
        );
    }

    #[test]
    fn host_suffixed_report_is_found() {
        let dir = tempfile::tempdir().unwrap();
        for spec in AnalysisKind::Counters.reports() {
            let name = format!("{}.node07", raw_report_file_name(spec, &tag()));
            let body = "Function^Hardware Event Count:CPU_CLK_UNHALTED.THREAD\nmain^10\n";
            fs::write(dir.path().join(name), body).unwrap();
        }
        let mut collector = ExportedReports::new(dir.path(), '^');
        let reports = collector.collect(AnalysisKind::Counters, &tag()).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].spec.group_by, "function");
        assert_eq!(reports[1].table.num_rows(), 1);
    }

    #[test]
    fn missing_report_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut collector = ExportedReports::new(dir.path(), '^');
        let err = collector.collect(AnalysisKind::Hotspots, &tag()).unwrap_err();
        assert!(err.to_string().contains("not found"), "{}", err);
    }
}
