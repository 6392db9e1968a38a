//! Crop command - produce face-centered square crops.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use facecrop_adapters::{CropWriter, FsImageSource, SidecarFaces};
use facecrop_core::pipeline::{
    DEFAULT_ACCURATE_MIN_CONFIDENCE, DEFAULT_FACE_FILL_RATIO, DEFAULT_FAST_MIN_CONFIDENCE,
    DEFAULT_MAX_DETECTION_DIMENSION, DEFAULT_MAX_UPSCALE, DEFAULT_MIN_FACE_SIZE,
    DEFAULT_OUTPUT_SIZE,
};
use facecrop_core::{
    CropReport, FacePipeline, FailureKind, ImageSource, PipelineConfig, ProgressEvent,
    ProgressSink, ResultOutput, SourceItem,
};
use tracing::{debug, info, info_span, warn};

use super::ExitCode;
use crate::config::{AppConfig, DEFAULT_OUTPUT_DIR};
use crate::output::{JsonOutput, ProgressBar};

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Parse and validate a confidence floor (0.0-1.0).
fn parse_confidence(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Parse and validate a fill ratio (strictly between 0 and 1).
fn parse_fill_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not strictly between 0.0 and 1.0"))
    }
}

/// Parse a strictly positive pixel size.
fn parse_face_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{value} must be > 0"))
    }
}

/// Parse an upscale limit (at least 1.0).
fn parse_upscale(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value >= 1.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{value} must be >= 1.0"))
    }
}

/// Shared arguments for cropping.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CropArgs {
    /// Files or directories to crop
    pub paths: Vec<PathBuf>,

    /// Directory crops are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Output edge length in pixels
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub output_size: Option<u32>,

    /// Fraction of the output occupied by the face (0.0-1.0, exclusive)
    #[arg(long, value_name = "R", value_parser = parse_fill_ratio)]
    pub fill_ratio: Option<f64>,

    /// Fast-tier confidence floor (0.0-1.0)
    #[arg(long, value_name = "C", value_parser = parse_confidence)]
    pub fast_confidence: Option<f64>,

    /// Accurate-tier confidence floor (0.0-1.0)
    #[arg(long, value_name = "C", value_parser = parse_confidence)]
    pub accurate_confidence: Option<f64>,

    /// Faces smaller than this (pixels) are upscaled
    #[arg(long, value_name = "PX", value_parser = parse_face_size)]
    pub min_face_size: Option<f64>,

    /// Maximum upscale factor for small faces
    #[arg(long, value_name = "F", value_parser = parse_upscale)]
    pub max_upscale: Option<f64>,

    /// Compute and report crops without writing any files
    #[arg(long)]
    pub dry_run: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CropArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Pipeline settings: CLI > config (accessor provides hardcoded fallback)
        args.output_size = args.output_size.or(config.pipeline.output_size);
        args.fill_ratio = args.fill_ratio.or(config.pipeline.face_fill_ratio);
        args.min_face_size = args.min_face_size.or(config.pipeline.min_face_size);
        args.max_upscale = args.max_upscale.or(config.pipeline.max_upscale);
        args.fast_confidence = args
            .fast_confidence
            .or(config.detector.fast_min_confidence);
        args.accurate_confidence = args
            .accurate_confidence
            .or(config.detector.accurate_min_confidence);

        if args.output_dir.is_none() {
            args.output_dir.clone_from(&config.output.dir);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        // Settings without a CLI flag are read from here
        args.config = Some(config.clone());

        args
    }

    /// Pipeline settings with fallback to hardcoded defaults.
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            output_size: self.output_size.unwrap_or(DEFAULT_OUTPUT_SIZE),
            face_fill_ratio: self.fill_ratio.unwrap_or(DEFAULT_FACE_FILL_RATIO),
            fast_min_confidence: self.fast_confidence.unwrap_or(DEFAULT_FAST_MIN_CONFIDENCE),
            accurate_min_confidence: self
                .accurate_confidence
                .unwrap_or(DEFAULT_ACCURATE_MIN_CONFIDENCE),
            min_face_size: self.min_face_size.unwrap_or(DEFAULT_MIN_FACE_SIZE),
            max_upscale: self.max_upscale.unwrap_or(DEFAULT_MAX_UPSCALE),
            max_detection_dimension: self
                .config
                .as_ref()
                .and_then(|c| c.pipeline.max_detection_dimension)
                .unwrap_or(DEFAULT_MAX_DETECTION_DIMENSION),
        }
    }

    /// Get output directory with fallback to the default.
    fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }
}

/// Result of running the crop command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct CropResult {
    /// Number of images cropped.
    pub cropped: usize,
    /// Number of images that failed.
    pub failed: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the crop command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CropArgs) -> Result<CropResult> {
    info!("Running crop command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let pipeline =
        FacePipeline::new(args.pipeline_config()).context("Invalid pipeline configuration")?;

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout();

    let writer = if args.dry_run {
        debug!("Dry run, no crops will be written");
        None
    } else {
        Some(CropWriter::new(args.output_dir()))
    };

    process_images(
        &source,
        &pipeline,
        writer.as_ref(),
        &output,
        &progress_bar,
        args,
    )
}

/// Crop every image of `source`, reporting as we go.
fn process_images(
    source: &dyn ImageSource,
    pipeline: &FacePipeline,
    writer: Option<&CropWriter>,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    args: &CropArgs,
) -> Result<CropResult> {
    let total = source.count_hint();
    let mut cropped = 0usize;
    let mut failed = 0usize;
    let mut all_reports: Vec<CropReport> = Vec::new();

    for (index, item) in source.images().enumerate() {
        let span = info_span!("image", path = %item.path);
        let _enter = span.enter();

        progress.on_event(ProgressEvent::Started {
            path: item.path.clone(),
            index,
            total,
        });

        let report = crop_one(item, pipeline, writer)?;

        match &report.failure {
            None => {
                cropped += 1;
                progress.on_event(ProgressEvent::Cropped {
                    report: report.clone(),
                });
            }
            Some(failure) => {
                failed += 1;
                progress.on_event(ProgressEvent::Failed {
                    path: report.path.clone(),
                    kind: failure.kind,
                    reason: failure.message.clone(),
                });
            }
        }

        match args.format() {
            OutputFormat::Jsonl => output.write(&report)?,
            OutputFormat::Json => all_reports.push(report),
        }
    }

    if matches!(args.format(), OutputFormat::Json) {
        output.write_batch(&all_reports, args.pretty)?;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished { cropped, failed });

    let exit_code = if failed > 0 {
        ExitCode::SomeFailed
    } else {
        ExitCode::Success
    };

    Ok(CropResult {
        cropped,
        failed,
        exit_code,
    })
}

/// Crop a single image.
///
/// Per-image problems become failed reports; only output write errors abort
/// the batch.
fn crop_one(
    item: SourceItem,
    pipeline: &FacePipeline,
    writer: Option<&CropWriter>,
) -> Result<CropReport> {
    let SourceItem { path, image } = item;

    let info = match image {
        Ok(info) => info,
        Err(e) => {
            warn!("Failed to decode {path}: {e:#}");
            return Ok(CropReport::failed(
                path,
                iso_timestamp(),
                None,
                FailureKind::DecodeFailure,
                format!("{e:#}"),
            ));
        }
    };
    let dimensions = info.dimensions();
    let source_path = Path::new(&path);

    let (mut detector, mut landmarks) = match SidecarFaces::load(source_path) {
        Ok(faces) => faces.into_adapters(),
        Err(e) => {
            warn!("{e:#}");
            return Ok(CropReport::failed(
                path,
                iso_timestamp(),
                Some(dimensions),
                FailureKind::AdapterFailure,
                format!("{e:#}"),
            ));
        }
    };

    match pipeline.run(&info.image, &mut detector, &mut landmarks) {
        Ok(crop) => {
            let written = match writer {
                Some(writer) => Some(
                    writer
                        .write(source_path, &crop.image)?
                        .to_string_lossy()
                        .into_owned(),
                ),
                None => None,
            };
            info!(
                angle = crop.summary.angle_degrees,
                scale = crop.summary.scale,
                padded = crop.summary.padded,
                "cropped"
            );
            Ok(CropReport::cropped(
                path,
                iso_timestamp(),
                dimensions,
                &crop.summary,
                written,
            ))
        }
        Err(e) => {
            let kind = e.kind();
            let message = format!("{:#}", anyhow::Error::new(e));
            info!(?kind, "{message}");
            Ok(CropReport::failed(
                path,
                iso_timestamp(),
                Some(dimensions),
                kind,
                message,
            ))
        }
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
