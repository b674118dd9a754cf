//! gpx-thin - drop GPX track points that sit closer than a minimum distance.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gpx_thin::converter::to_feature_collection;
use gpx_thin::options::SimplifyOptions;
use gpx_thin::report::FileSizes;
use gpx_thin::simplify_gpx;

#[derive(Parser)]
#[command(name = "gpx-thin")]
#[command(about = "Reduce GPX track points by enforcing a minimum spacing between them")]
struct Cli {
    /// GPX file to read
    input: PathBuf,

    /// Where to write the simplified GPX
    output: PathBuf,

    /// Minimum distance in meters between kept points [default: 10]
    #[arg(short = 'd', long)]
    min_distance: Option<f64>,

    /// Path to an options JSON file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the simplified track as GeoJSON
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Do not print statistics
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gpx_thin=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let opts = resolve_options(cli)?;

    if !cli.quiet {
        println!("Keeping points at least {} meters apart\n", opts.min_distance);
    }

    let xml = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read GPX: {}", cli.input.display()))?;
    tracing::info!(input = %cli.input.display(), bytes = xml.len(), "read input");

    let out = simplify_gpx(&xml, &opts)
        .with_context(|| format!("Failed to simplify: {}", cli.input.display()))?;

    // serialize everything before touching the file system
    let geojson = match &cli.geojson {
        Some(_) => Some(
            serde_json::to_string(&to_feature_collection(&out.document, &opts))
                .context("Failed to serialize GeoJSON")?,
        ),
        None => None,
    };

    fs::write(&cli.output, &out.gpx)
        .with_context(|| format!("Failed to write GPX: {}", cli.output.display()))?;
    tracing::info!(output = %cli.output.display(), bytes = out.gpx.len(), "wrote output");

    if let (Some(path), Some(json)) = (&cli.geojson, geojson) {
        fs::write(path, json)
            .with_context(|| format!("Failed to write GeoJSON: {}", path.display()))?;
        tracing::info!(output = %path.display(), "wrote GeoJSON");
    }

    if !cli.quiet {
        let sizes = FileSizes {
            before: file_size(&cli.input)?,
            after: file_size(&cli.output)?,
        };
        println!("{}\n", out.report);
        println!("{sizes}");
        println!("\nCreated {}", cli.output.display());
    }

    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn resolve_options(cli: &Cli) -> Result<SimplifyOptions> {
    let mut opts = match &cli.config {
        Some(path) => load_options(path)?,
        None => SimplifyOptions::default(),
    };
    if let Some(min_distance) = cli.min_distance {
        opts.min_distance = min_distance;
    }
    opts.validate()?;
    Ok(opts)
}

/// Load an options JSON file.
fn load_options(path: &Path) -> Result<SimplifyOptions> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)
        .with_context(|| format!("Failed to stat: {}", path.display()))?
        .len())
}
