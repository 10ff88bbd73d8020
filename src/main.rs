use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vtune_sweep::Result;
use vtune_sweep::collect::ExportedReports;
use vtune_sweep::config::AnalysisConfig;
use vtune_sweep::driver;
use vtune_sweep::run::{AnalysisKind, RunTag};

#[derive(Parser)]
#[command(name = "vtune-sweep")]
#[command(about = "Compare VTune profiles across a thread-count sweep", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Augment exported reports for each thread count and write the comparison table.
    Analyze {
        #[arg(short = 'a', long, value_enum, default_value = "hotspots")]
        kind: AnalysisKind,

        /// Thread counts, comma separated.
        #[arg(short = 't', long, value_delimiter = ',', default_value = "1")]
        threads: Vec<u32>,

        /// Program name used in report file names.
        #[arg(long)]
        program: String,

        /// Tag identifying this sweep.
        #[arg(long, default_value = "")]
        tag: String,

        /// Timestamp used in report file names. Defaults to now.
        #[arg(long)]
        timestamp: Option<String>,

        /// Directory holding the exported reports.
        #[arg(short = 'i', long, default_value = ".")]
        input: PathBuf,

        #[arg(short = 'o', long, default_value = ".")]
        out: PathBuf,

        /// JSON file with schema and tunables.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        delimiter: Option<char>,

        /// Correlation cutoff against the clock-cycle event.
        #[arg(long)]
        cutoff: Option<f64>,

        /// Number of ranked bottlenecks per run.
        #[arg(long)]
        bottlenecks: Option<usize>,

        /// Also write the comparison rows as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Analyze {
            kind,
            threads,
            program,
            tag,
            timestamp,
            input,
            out,
            config,
            delimiter,
            cutoff,
            bottlenecks,
            json,
        } => {
            // 1) Config file, then flag overrides.
            let mut cfg = match &config {
                Some(path) => AnalysisConfig::from_json_file(path)?,
                None => AnalysisConfig::default(),
            };
            if let Some(d) = delimiter {
                cfg.delimiter = d;
            }
            if let Some(c) = cutoff {
                cfg.correlation_cutoff = c;
            }
            if let Some(n) = bottlenecks {
                cfg.num_bottlenecks = n;
            }
            cfg.validate()?;

            let timestamp = timestamp
                .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d_%H.%M.%S").to_string());
            let base = RunTag {
                threads: 0,
                program,
                tag,
                timestamp,
            };

            // 2) Sweep.
            let mut collector = ExportedReports::new(&input, cfg.delimiter);
            info!("reading exported reports from {}", collector.dir().display());
            let outcome = driver::run_sweep(&mut collector, kind, &base, &threads, &cfg, &out)?;

            // 3) Optional JSON dump next to the comparison table.
            if json {
                let path = outcome.comparison_file.with_extension("json");
                std::fs::write(&path, serde_json::to_string_pretty(&outcome.comparison)?)
                    .with_context(|| format!("write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
            println!("Wrote {}", outcome.comparison_file.display());
        }
    }

    Ok(())
}
