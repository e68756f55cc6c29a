//! voxlight - per-chunk voxel light generation
//!
//! Builds a named scenario chunk, lights it and prints a column profile.

mod config;
mod scenario;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use voxlight_assets::BlockRegistry;
use voxlight_testkit::{
    LightingMetrics, MetricsReportBuilder, MetricsSink, TestExecutionMetrics, TestResult,
};
use voxlight_world::{generate_internal_lighting, Chunk, LightingReport};

use config::{load_block_registry, LightingConfig, DEFAULT_BLOCKS_PATH, DEFAULT_LIGHTING_PATH};
use scenario::Scenario;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate initial lighting for a voxel chunk", long_about = None)]
struct Args {
    /// Chunk extent and light caps (TOML)
    #[arg(long, default_value = DEFAULT_LIGHTING_PATH)]
    config: PathBuf,

    /// Block pack (JSON)
    #[arg(long, default_value = DEFAULT_BLOCKS_PATH)]
    blocks: PathBuf,

    /// Block layout to light
    #[arg(short, long, value_enum, default_value_t = Scenario::Open)]
    scenario: Scenario,

    /// Column to profile as `x,z` (defaults to the chunk centre)
    #[arg(long, value_parser = parse_probe)]
    probe: Option<(usize, usize)>,

    /// Write a JSON metrics report to this path
    #[arg(long)]
    metrics: Option<PathBuf>,
}

fn parse_probe(raw: &str) -> Result<(usize, usize), String> {
    let (x, z) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{raw}`"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid coordinate `{s}`: {err}"))
    };
    Ok((parse(x)?, parse(z)?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting voxlight v{}", env!("CARGO_PKG_VERSION"));

    let config = LightingConfig::load_from_path(&args.config);
    let registry = load_block_registry(&args.blocks)?;
    let dims = config.chunk;
    let (px, pz) = args.probe.unwrap_or_else(|| Scenario::default_probe(dims));
    if px >= dims.x || pz >= dims.z {
        bail!("probe column ({px}, {pz}) is outside the {dims} chunk");
    }

    let run_start = Instant::now();
    let mut chunk = args
        .scenario
        .build(dims, config.settings(), &registry)
        .with_context(|| format!("failed to build scenario `{}`", args.scenario.label()))?;

    let gen_start = Instant::now();
    let report = generate_internal_lighting(&mut chunk, &registry);
    let generation_seconds = gen_start.elapsed().as_secs_f64();

    info!(
        scenario = args.scenario.label(),
        chunk = %dims,
        regen_saturated = report.regen_saturated,
        sunlight_seeds = report.sunlight.seeds,
        light_seeds = report.light.seeds,
        nodes_processed = report.nodes_processed(),
        elapsed_us = (generation_seconds * 1e6) as u64,
        "lighting generated"
    );

    print_column(&chunk, &registry, px, pz);

    if let Some(path) = args.metrics {
        let metrics = lighting_metrics(&chunk, &report).with_timing(generation_seconds);
        let report = MetricsReportBuilder::new(format!("voxlight_{}", args.scenario.label()))
            .result(TestResult::Pass)
            .lighting(metrics)
            .execution(TestExecutionMetrics {
                duration_seconds: run_start.elapsed().as_secs_f64(),
                ..TestExecutionMetrics::default()
            })
            .build();
        MetricsSink::create(&path)
            .and_then(|sink| sink.write(&report))
            .with_context(|| format!("failed to write metrics to {}", path.display()))?;
        info!(path = %path.display(), "metrics written");
    }

    Ok(())
}

fn lighting_metrics(chunk: &Chunk, report: &LightingReport) -> LightingMetrics {
    LightingMetrics {
        chunks_generated: 1,
        regen_saturated: report.regen_saturated,
        sunlight_seeds: report.sunlight.seeds,
        light_seeds: report.light.seeds,
        nodes_processed: report.nodes_processed(),
        light_digest: Some(chunk.light_digest().to_hex().to_string()),
        ..LightingMetrics::default()
    }
}

/// Top-down table of every channel in one column.
fn print_column(chunk: &Chunk, registry: &BlockRegistry, x: usize, z: usize) {
    println!("column ({x}, {z})");
    println!("{:>4} {:<16} {:>5} {:>8} {:>5}", "y", "block", "regen", "sunlight", "light");
    for y in (0..chunk.dims().y).rev() {
        let block = chunk.block(x, y, z);
        let name = registry
            .descriptor(block)
            .map(|d| d.name.as_str())
            .unwrap_or("?");
        println!(
            "{:>4} {:<16} {:>5} {:>8} {:>5}",
            y,
            name,
            chunk.sunlight_regen(x, y, z),
            chunk.sunlight(x, y, z),
            chunk.light(x, y, z)
        );
    }
}
