//! Analysis configuration: profiler column schema plus pipeline tunables.
//!
//! JSON shape (every field optional):
//! {
//!   "delimiter": "^",
//!   "correlation_cutoff": 0.8,
//!   "num_bottlenecks": 3,
//!   "total_label": "Total",
//!   "schema": {
//!     "hotspots": { "cpu_time": "CPU Time", "location": "function_stack" },
//!     "counters": { "clk_event": "Hardware Event Count:CPU_CLK_UNHALTED.THREAD" }
//!   }
//! }

use crate::run::{AnalysisKind, CALLSTACK_REPORT, ReportSpec};
use crate::Result;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the aggregate row at index 0 is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalPolicy {
    /// Synthesize a total row and pin it at index 0.
    Append,
    /// Row 0 is the collector's aggregate; fill only its zero cells.
    ReplaceIfZero,
}

/// Which location label a hotspots bottleneck reports next to its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckLocation {
    SourceFile,
    FunctionStack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotspotsSchema {
    pub function: String,
    pub source_file: String,
    pub source_line: String,
    pub function_stack: String,
    pub cpu_time: String,
    pub cpu_time_self: String,
    pub cpu_time_total: String,
    pub location: BottleneckLocation,
    pub total_policy: TotalPolicy,
}

impl Default for HotspotsSchema {
    fn default() -> Self {
        Self {
            function: "Function".to_string(),
            source_file: "Source File".to_string(),
            source_line: "Source Line".to_string(),
            function_stack: "Function Stack".to_string(),
            cpu_time: "CPU Time".to_string(),
            cpu_time_self: "CPU Time:Self".to_string(),
            cpu_time_total: "CPU Time:Total".to_string(),
            location: BottleneckLocation::SourceFile,
            total_policy: TotalPolicy::ReplaceIfZero,
        }
    }
}

impl HotspotsSchema {
    /// Column holding the per-bottleneck location label.
    pub fn location_column(&self) -> &str {
        match self.location {
            BottleneckLocation::SourceFile => &self.source_file,
            BottleneckLocation::FunctionStack => &self.function_stack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountersSchema {
    pub function: String,
    pub source_file: String,
    pub source_line: String,
    /// Prefix shared by every hardware-event column; stripped for display.
    pub event_prefix: String,
    pub inst_event: String,
    /// Reference clock-cycle column.
    pub clk_event: String,
    pub total_policy: TotalPolicy,
}

impl Default for CountersSchema {
    fn default() -> Self {
        Self {
            function: "Function".to_string(),
            source_file: "Source File".to_string(),
            source_line: "Source Line".to_string(),
            event_prefix: "Hardware Event Count:".to_string(),
            inst_event: "Hardware Event Count:INST_RETIRED.ANY".to_string(),
            clk_event: "Hardware Event Count:CPU_CLK_UNHALTED.THREAD".to_string(),
            total_policy: TotalPolicy::Append,
        }
    }
}

impl CountersSchema {
    /// Event name with the shared prefix removed.
    pub fn display_name<'a>(&self, column: &'a str) -> &'a str {
        column.strip_prefix(self.event_prefix.as_str()).unwrap_or(column)
    }

    /// Hardware-event family of the reference column, e.g. `CPU_CLK_UNHALTED`.
    pub fn clk_family(&self) -> &str {
        let name = self.display_name(&self.clk_event);
        name.split('.').next().unwrap_or(name)
    }
}

/// Column names for every analysis kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub hotspots: HotspotsSchema,
    pub counters: CountersSchema,
}

impl Schema {
    /// Report whose rows are ranked across the sweep. Hotspots labelled by
    /// function stack rank the call-stack report; otherwise the first report.
    pub fn main_report(&self, kind: AnalysisKind) -> ReportSpec {
        match (kind, self.hotspots.location) {
            (AnalysisKind::Hotspots, BottleneckLocation::FunctionStack) => CALLSTACK_REPORT,
            _ => kind.reports()[0],
        }
    }

    /// Primary metric the main table is sorted and ranked by.
    pub fn ranking_column(&self, kind: AnalysisKind) -> &str {
        match kind {
            AnalysisKind::Hotspots => &self.hotspots.cpu_time,
            AnalysisKind::Counters => &self.counters.clk_event,
        }
    }

    pub fn total_policy(&self, kind: AnalysisKind) -> TotalPolicy {
        match kind {
            AnalysisKind::Hotspots => self.hotspots.total_policy,
            AnalysisKind::Counters => self.counters.total_policy,
        }
    }

    pub fn function_column(&self, kind: AnalysisKind) -> &str {
        match kind {
            AnalysisKind::Hotspots => &self.hotspots.function,
            AnalysisKind::Counters => &self.counters.function,
        }
    }

    pub fn location_column(&self, kind: AnalysisKind) -> &str {
        match kind {
            AnalysisKind::Hotspots => self.hotspots.location_column(),
            AnalysisKind::Counters => &self.counters.source_file,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub delimiter: char,
    pub correlation_cutoff: f64,
    pub num_bottlenecks: usize,
    /// Label written into text cells of a synthesized total row.
    pub total_label: String,
    pub schema: Schema,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delimiter: '^',
            correlation_cutoff: 0.80,
            num_bottlenecks: 3,
            total_label: "Total".to_string(),
            schema: Schema::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let cfg: AnalysisConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let d = self.delimiter;
        let reserved = ['"', '\n', '\r', '.', '-'];
        if !d.is_ascii() || d.is_ascii_alphanumeric() || reserved.contains(&d) {
            bail!("unusable field delimiter {:?}", d);
        }
        if !(-1.0..=1.0).contains(&self.correlation_cutoff) {
            bail!(
                "correlation cutoff must lie in [-1, 1], got {}",
                self.correlation_cutoff
            );
        }
        if self.num_bottlenecks == 0 {
            bail!("number of bottlenecks must be at least 1");
        }
        if self.total_label.is_empty() {
            bail!("total label cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str(
            r#"{"delimiter": ",", "schema": {"hotspots": {"location": "function_stack"}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.delimiter, ',');
        assert_eq!(cfg.num_bottlenecks, 3);
        assert_eq!(cfg.schema.hotspots.cpu_time, "CPU Time");
        assert_eq!(
            cfg.schema.location_column(AnalysisKind::Hotspots),
            "Function Stack"
        );
        assert_eq!(
            cfg.schema.main_report(AnalysisKind::Hotspots).report,
            "callstacks"
        );
        assert_eq!(
            cfg.schema.main_report(AnalysisKind::Counters).report,
            "hw-events"
        );
        cfg.validate().unwrap();
    }

    #[test]
    fn clk_family_strips_prefix_and_event_suffix() {
        let s = CountersSchema::default();
        assert_eq!(s.clk_family(), "CPU_CLK_UNHALTED");
        assert_eq!(s.display_name(&s.inst_event), "INST_RETIRED.ANY");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = AnalysisConfig::default();
        cfg.correlation_cutoff = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.num_bottlenecks = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.delimiter = 'x';
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.delimiter = '§';
        assert!(cfg.validate().is_err());
    }
}
