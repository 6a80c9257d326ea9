//! irisdet CLI: pupil and iris detection for eye photographs.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use irisdet::{DetectConfig, DetectionResult, Detector, OverlayPosition};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "irisdet")]
#[command(about = "Locate pupil and iris in close-up eye photographs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect pupil and iris in an image.
    Detect(CliDetectArgs),

    /// Print the default detector configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliDetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write detection results (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Detector configuration (JSON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the stage-by-stage detection trace (JSON).
    #[arg(long)]
    debug_json: Option<PathBuf>,

    /// Long-side working resolutions, comma separated (e.g. 100,200,400).
    #[arg(long, value_delimiter = ',')]
    resolutions: Option<Vec<u32>>,

    /// Hill-climb rounds per refinement stage.
    #[arg(long)]
    max_refinement_steps: Option<usize>,

    /// Report the coarse iris instead of running the boundary walk.
    #[arg(long)]
    no_iris_walk: bool,
}

/// JSON written by `detect`.
#[derive(serde::Serialize)]
struct DetectOutput {
    image_size: [u32; 2],
    confident: bool,
    result: DetectionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<OverlayPosition>,
}

fn build_config(args: &CliDetectArgs) -> CliResult<DetectConfig> {
    let mut config = match &args.config {
        Some(path) => DetectConfig::from_json_file(path)?,
        None => DetectConfig::default(),
    };
    if let Some(resolutions) = &args.resolutions {
        config.resolutions = resolutions.clone();
    }
    if let Some(steps) = args.max_refinement_steps {
        config.max_refinement_steps = steps;
    }
    if args.no_iris_walk {
        config.iris_boundary.enable = false;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&DetectConfig::default())?);
    Ok(())
}

fn run_detect(args: &CliDetectArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let img = image::open(&args.image)?.to_rgb8();
    let (w, h) = img.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let detector = Detector::with_config(build_config(args)?);
    let (result, trace) = detector.detect_with_trace(&img)?;

    if result.is_confident() {
        tracing::info!(
            "Pupil r={:.4} at ({:.4}, {:.4}); iris r={:.4} at ({:.4}, {:.4})",
            result.pupil.radius,
            result.pupil.center.x,
            result.pupil.center.y,
            result.iris.radius,
            result.iris.center.x,
            result.iris.center.y
        );
    } else {
        tracing::warn!("No pupil found; writing default result");
    }

    let output = DetectOutput {
        image_size: [w, h],
        confident: result.is_confident(),
        result,
        overlay: result.overlay_position(),
    };
    let json = serde_json::to_string_pretty(&output)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());

    if let Some(debug_path) = &args.debug_json {
        let debug_json = serde_json::to_string_pretty(&trace)?;
        std::fs::write(debug_path, &debug_json)?;
        tracing::info!("Detection trace written to {}", debug_path.display());
    }

    Ok(())
}
