//! vorograph CLI - Voronoi neighbour lists from particle snapshots.
//!
//! Usage: vorograph [OPTIONS] <INPUT>
//!
//! Run `vorograph --help` for available options.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vorograph::io::{write_neighbor_list, write_regions, InputRecord};
use vorograph::{TessellationBuilder, TessellationConfig};

#[derive(Parser)]
#[command(name = "vorograph")]
#[command(author, version, about = "Voronoi neighbour lists for domain-decomposed particles", long_about = None)]
struct Cli {
    /// Particle snapshot (JSON with box_size, coordinates and tasks)
    input: PathBuf,

    /// Neighbour list output, defaults to the input with extension `dat`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the regions, with vertices at infinity snapped into the domain
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Tessellation configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid bins per axis
    #[arg(long)]
    grid_resolution: Option<usize>,

    /// Initial clip box margin in multiples of the domain extent
    #[arg(long)]
    padding: Option<f64>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => TessellationConfig::read(path).with_context(|| format!("While reading config file at {:?}", path))?,
        None => TessellationConfig::default(),
    };
    if let Some(n) = cli.grid_resolution {
        config.grid_resolution = Some(n);
    }
    if let Some(padding) = cli.padding {
        config.padding = padding;
    }

    let record = InputRecord::read(&cli.input).with_context(|| format!("While reading input at {:?}", cli.input))?;
    let domain = record.domain();
    info!(particles = record.coordinates.len(), box_size = record.box_size, "read snapshot");

    let start = Instant::now();
    let builder = TessellationBuilder::new(config);
    let (graph, tessellation) = builder
        .build_with_tessellation(&record.coordinates, &record.tasks, &domain)
        .map_err(|e| anyhow::anyhow!("{} failed: {}", e.stage(), e))?;
    info!(elapsed = ?start.elapsed(), "tessellation done");

    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    let file = File::create(&output).with_context(|| format!("While creating {:?}", output))?;
    write_neighbor_list(&graph, BufWriter::new(file)).with_context(|| format!("While writing {:?}", output))?;
    info!(path = ?output, cells = graph.len(), "wrote neighbour list");

    if let Some(path) = &cli.regions {
        let file = File::create(path).with_context(|| format!("While creating {:?}", path))?;
        write_regions(&tessellation, &domain, builder.config().reference_point, BufWriter::new(file))
            .with_context(|| format!("While writing {:?}", path))?;
        info!(path = ?path, "wrote regions");
    }
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("dat")
}
