//! lgbox: label-graph to object-detection annotation converter.
//!
//! lgbox reads the per-sample label-graph (`.lg`) files of a CROHME-style
//! handwritten-math dataset and turns their symbol bounding boxes into
//! training annotations: a class mapping (label to dense index) and one
//! consolidated annotations file.
//!
//! # Modules
//!
//! - [`lg`]: Label-graph parsing and object extraction
//! - [`dataset`]: Directory aggregation and the annotation types
//! - [`emit`]: JSON artifact writing
//! - [`config`]: Run configuration
//! - [`check`]: Quality checks of an annotations file against its images
//! - [`visualize`]: Box overlays for visual spot checks
//! - [`error`]: Error types for lgbox operations

pub mod check;
pub mod config;
pub mod dataset;
pub mod emit;
pub mod error;
pub mod lg;
pub mod visualize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::LgboxError;

use config::{Config, DEFAULT_CONFIG_PATH};

/// The lgbox CLI application.
#[derive(Parser)]
#[command(name = "lgbox")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of .lg files into a class mapping and annotations.
    Convert(ConvertArgs),

    /// Check an annotations file against the image directory.
    Check(CheckArgs),

    /// Draw bounding-box overlays for a few samples.
    Visualize(VisualizeArgs),
}

/// Configuration file and per-run path overrides, shared by all subcommands.
#[derive(clap::Args)]
struct ConfigArgs {
    /// Configuration file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "LGBOX_CONFIG")]
    config: PathBuf,

    /// Override `paths.train_lg_dir`.
    #[arg(long)]
    lg_dir: Option<PathBuf>,

    /// Override `paths.train_img_dir`.
    #[arg(long)]
    img_dir: Option<PathBuf>,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Class mapping output file (overrides `output.class_mapping`).
    #[arg(long)]
    mapping_out: Option<PathBuf>,

    /// Annotations output file (overrides `output.annotations`).
    #[arg(long)]
    annotations_out: Option<PathBuf>,

    /// Source tag written into the annotations (overrides `output.source`).
    #[arg(long)]
    source: Option<String>,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Annotations file to check (defaults to `output.annotations`).
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Class mapping to check labels against.
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,
}

/// Arguments for the visualize subcommand.
#[derive(clap::Args)]
struct VisualizeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Sample to render (file id, with or without .lg). Random if omitted.
    #[arg(long)]
    file: Option<String>,

    /// Number of random samples to render.
    #[arg(long, default_value_t = 2)]
    count: usize,

    /// Seed for sample selection and box colours.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the overlay images.
    #[arg(long, default_value = "overlays")]
    out_dir: PathBuf,
}

/// Run the lgbox CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LgboxError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Check(args)) => run_check(args),
        Some(Commands::Visualize(args)) => run_visualize(args),
        None => {
            println!("lgbox {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Label-graph to object-detection annotation converter.");
            println!();
            println!("Run 'lgbox --help' for usage information.");
            Ok(())
        }
    }
}

/// Loads the configuration and applies command-line path overrides.
fn resolve_config(args: &ConfigArgs) -> Result<Config, LgboxError> {
    let mut config = config::load_config(&args.config)?;
    if let Some(dir) = &args.lg_dir {
        config.paths.train_lg_dir = dir.clone();
    }
    if let Some(dir) = &args.img_dir {
        config.paths.train_img_dir = dir.clone();
    }
    Ok(config)
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), LgboxError> {
    let mut config = resolve_config(&args.config)?;
    if let Some(path) = args.mapping_out {
        config.output.class_mapping = path;
    }
    if let Some(path) = args.annotations_out {
        config.output.annotations = path;
    }
    if let Some(source) = args.source {
        config.output.source = source;
    }

    let aggregation = dataset::aggregate_dir(&config.paths.train_lg_dir, &config.output.source);
    print!("{}", aggregation.report);

    emit::emit(
        &aggregation.class_mapping,
        &aggregation.annotations,
        &config.output.class_mapping,
        &config.output.annotations,
    )?;

    println!(
        "Wrote {} class(es) to {} and {} annotated file(s) to {}",
        aggregation.class_mapping.len(),
        config.output.class_mapping.display(),
        aggregation.annotations.annotations.len(),
        config.output.annotations.display()
    );
    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), LgboxError> {
    let config = resolve_config(&args.config)?;
    let annotations_path = args.annotations.unwrap_or(config.output.annotations);

    let annotations = emit::read_annotations(&annotations_path)?;
    let class_mapping = args
        .mapping
        .as_deref()
        .map(emit::read_class_mapping)
        .transpose()?;

    let report = check::check_annotations(
        &annotations,
        &config.paths.train_img_dir,
        class_mapping.as_ref(),
    );
    print!("{}", report);

    let opts = check::CheckOptions {
        strict: args.strict,
    };
    check::into_result(report, &opts).map(|_| ())
}

/// Execute the visualize subcommand.
fn run_visualize(args: VisualizeArgs) -> Result<(), LgboxError> {
    let config = resolve_config(&args.config)?;
    let opts = visualize::VisualizeOptions {
        count: args.count,
        seed: args.seed,
        out_dir: args.out_dir,
    };

    let written = visualize::visualize(
        &config.paths.train_lg_dir,
        &config.paths.train_img_dir,
        args.file.as_deref(),
        &opts,
    )?;

    for path in &written {
        println!("Wrote {}", path.display());
    }
    if written.is_empty() {
        println!("No overlays written");
    }
    Ok(())
}
