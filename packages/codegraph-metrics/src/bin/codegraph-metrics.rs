//! Aggregate analysis metrics scattered across log files
//!
//! # Usage
//!
//! ```bash
//! # Points-to statistics over every report under ./logs
//! cargo run --bin codegraph-metrics --release -- --dir logs --pta
//!
//! # Call graph statistics with a custom worker count
//! cargo run --bin codegraph-metrics --release -- --dir logs --cg --max-concurrency 4
//!
//! # Both, with settings from a file
//! cargo run --bin codegraph-metrics --release -- --pta --cg --config metrics.yaml
//! ```
//!
//! Reports go to stdout. Logging goes to stderr and is controlled by `RUST_LOG`.

use anyhow::Context;
use clap::Parser;
use codegraph_metrics::{
    AggregatorConfig, CallGraphMetrics, MetricsAggregator, PtaMetrics, Series, SeriesReport,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "codegraph-metrics")]
#[command(about = "Percentile reports over PTA and call graph metrics found in log files", long_about = None)]
struct Cli {
    /// Directory to scan recursively
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Print points-to analysis aggregates
    #[arg(long)]
    pta: bool,

    /// Print call graph aggregates
    #[arg(long)]
    cg: bool,

    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of files processed at once (overrides --config)
    #[arg(long)]
    max_concurrency: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => AggregatorConfig::from_yaml(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => AggregatorConfig::default(),
    };
    if let Some(n) = cli.max_concurrency {
        config = config.with_max_concurrency(n);
    }

    let aggregator = MetricsAggregator::new(config);

    if cli.pta {
        let records = aggregator
            .aggregate::<PtaMetrics>(&cli.dir)
            .with_context(|| format!("Failed to scan {:?}", cli.dir))?
            .into_records();
        print_pta(&records)?;
    }

    if cli.cg {
        let records = aggregator
            .aggregate::<CallGraphMetrics>(&cli.dir)
            .with_context(|| format!("Failed to scan {:?}", cli.dir))?
            .into_records();
        print_call_graph(&records)?;
    }

    Ok(())
}

fn print_pta(records: &[PtaMetrics]) -> anyhow::Result<()> {
    SeriesReport::new("Duration", &Series::from_records(records, PtaMetrics::duration)).print()?;

    let sizes: [(&str, fn(&PtaMetrics) -> usize); 4] = [
        ("P50 points-to set size", |m| m.points_to_set_size.p50),
        ("P90 points-to set size", |m| m.points_to_set_size.p90),
        ("P99 points-to set size", |m| m.points_to_set_size.p99),
        ("Max points-to set size", |m| m.points_to_set_size.max),
    ];
    for (name, field) in sizes {
        SeriesReport::new(name, &Series::from_records(records, field)).print()?;
    }
    Ok(())
}

fn print_call_graph(records: &[CallGraphMetrics]) -> anyhow::Result<()> {
    SeriesReport::new("Number of functions", &Series::from_records(records, |m| m.functions))
        .print()?;

    let degrees: [(&str, fn(&CallGraphMetrics) -> usize); 8] = [
        ("P50 in-degree", |m| m.in_degree.p50),
        ("P90 in-degree", |m| m.in_degree.p90),
        ("P99 in-degree", |m| m.in_degree.p99),
        ("Max in-degree", |m| m.in_degree.max),
        ("P50 out-degree", |m| m.out_degree.p50),
        ("P90 out-degree", |m| m.out_degree.p90),
        ("P99 out-degree", |m| m.out_degree.p99),
        ("Max out-degree", |m| m.out_degree.max),
    ];
    for (name, field) in degrees {
        SeriesReport::new(name, &Series::from_records(records, field)).print()?;
    }
    Ok(())
}
