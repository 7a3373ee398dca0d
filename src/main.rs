use anyhow::Context;
use clap::Parser;
use ocr_normalize::{Color, ColorMetric, NormalizeConfig, NormalizeError, Pipeline};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ocr-normalize")]
#[command(about = "Normalize a screenshot for OCR: crop, strip background, pad")]
#[command(version)]
pub struct Args {
    /// Input image
    pub input: PathBuf,

    /// Where to write the normalized PNG
    #[arg(short, long, env = "OCR_NORMALIZE_OUTPUT", default_value = "output.png")]
    pub output: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long, env = "OCR_NORMALIZE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Marker color that starts the region of interest (#rrggbb)
    #[arg(long)]
    pub marker_color: Option<Color>,

    #[arg(long)]
    pub marker_tolerance: Option<f64>,

    /// chebyshev or euclidean
    #[arg(long, value_parser = parse_metric)]
    pub marker_metric: Option<ColorMetric>,

    /// Background color to make transparent (#rrggbb)
    #[arg(long)]
    pub background_color: Option<Color>,

    #[arg(long)]
    pub background_tolerance: Option<f64>,

    /// chebyshev or euclidean
    #[arg(long, value_parser = parse_metric)]
    pub background_metric: Option<ColorMetric>,

    #[arg(long)]
    pub left_padding: Option<u32>,

    #[arg(long)]
    pub box_padding_h: Option<u32>,

    #[arg(long)]
    pub box_padding_v: Option<u32>,

    /// Trim background columns and re-center the content
    #[arg(long)]
    pub recenter: bool,

    /// Paint all visible pixels with the ink color
    #[arg(long)]
    pub flatten: bool,

    #[arg(long)]
    pub ink_color: Option<Color>,

    /// Directory to write each intermediate stage into
    #[arg(long, env = "OCR_NORMALIZE_INTERMEDIATES")]
    pub save_intermediates: Option<PathBuf>,

    /// Print a JSON report of the run to stdout
    #[arg(long)]
    pub report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

fn parse_metric(s: &str) -> Result<ColorMetric, String> {
    ColorMetric::from_str(s).ok_or_else(|| format!("unknown metric {:?} (chebyshev, euclidean)", s))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(&args) {
        match err.downcast_ref::<NormalizeError>() {
            Some(e) => tracing::error!(code = e.code(), "{:#}", err),
            None => tracing::error!("{:#}", err),
        }
        return Err(err);
    }
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = build_config(args)?;
    let pipeline = Pipeline::new(config)?.capture_intermediates(args.save_intermediates.is_some());

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    tracing::info!("Normalizing {} ({} bytes)", args.input.display(), bytes.len());

    let output = pipeline
        .process(&bytes)
        .with_context(|| format!("Failed to normalize {}", args.input.display()))?;

    if let Some(dir) = &args.save_intermediates {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        for (index, (stage, grid)) in output.intermediates.iter().enumerate() {
            let path = dir.join(format!("{:02}-{}.png", index, stage.as_str()));
            let encoded = ocr_normalize::preprocessing::steps::codec::encode(grid)?;
            write_atomic(&path, &encoded)?;
            tracing::debug!("Saved {}", path.display());
        }
    }

    write_atomic(&args.output, &output.bytes)?;
    tracing::info!(
        "Wrote {}x{} image to {} in {}ms",
        output.width,
        output.height,
        args.output.display(),
        output.total_time_ms
    );

    if args.report {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Layer command-line overrides on top of the optional config file
fn build_config(args: &Args) -> anyhow::Result<NormalizeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            NormalizeConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => NormalizeConfig::default(),
    };

    if let Some(color) = args.marker_color {
        config.marker_color = color;
    }
    if let Some(tolerance) = args.marker_tolerance {
        config.marker_tolerance = tolerance;
    }
    if let Some(metric) = args.marker_metric {
        config.marker_metric = metric;
    }
    if let Some(color) = args.background_color {
        config.background_color = color;
    }
    if let Some(tolerance) = args.background_tolerance {
        config.background_tolerance = tolerance;
    }
    if let Some(metric) = args.background_metric {
        config.background_metric = metric;
    }
    if let Some(padding) = args.left_padding {
        config.left_padding = padding;
    }
    if let Some(padding) = args.box_padding_h {
        config.box_padding_h = padding;
    }
    if let Some(padding) = args.box_padding_v {
        config.box_padding_v = padding;
    }
    if let Some(color) = args.ink_color {
        config.ink_color = color;
    }
    config.recenter |= args.recenter;
    config.flatten_foreground |= args.flatten;

    Ok(config)
}

/// Write through a temp file in the destination directory so readers never see a partial image
fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(bytes)?;
    temp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
