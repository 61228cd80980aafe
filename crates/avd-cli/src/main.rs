use anyhow::{bail, Context, Result};
use avd_core::{Animator, Color};
use avd_data::{Document, SceneNode};
use avd_skia::RasterConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a frame (or every frame) to PNG
    Render(RenderArgs),
    /// Print a summary of a drawable
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Path to the drawable XML
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output PNG path, or a directory when rendering a sequence
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Time to render, in milliseconds
    #[arg(long, default_value_t = 0.0, conflicts_with = "fps")]
    time: f64,

    /// Render the whole timeline at this frame rate
    #[arg(long)]
    fps: Option<f64>,

    /// Output size as a multiple of the viewport
    #[arg(long, conflicts_with_all = ["width", "height"])]
    scale: Option<f32>,

    #[arg(long, requires = "height")]
    width: Option<u32>,

    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Background color, `#RRGGBB` or `#AARRGGBB`
    #[arg(long)]
    background: Option<String>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also print the animated overrides at this time
    #[arg(long)]
    time: Option<f64>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(cli.log_level).into())
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }

    let result = match cli.command {
        Command::Render(args) => render(args),
        Command::Inspect(args) => inspect(args),
    };
    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn load(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document =
        avd_data::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(document)
}

fn render(args: RenderArgs) -> Result<()> {
    let document = load(&args.file)?;

    let mut config = match (args.width, args.height) {
        (Some(width), Some(height)) => RasterConfig::new(width, height),
        _ => RasterConfig::for_document(&document, args.scale.unwrap_or(1.0)),
    };
    if let Some(hex) = &args.background {
        let color = Color::from_hex(hex).with_context(|| format!("Bad --background {hex}"))?;
        config = config.with_background(color);
    }

    let Some(fps) = args.fps else {
        let output = args
            .output
            .unwrap_or_else(|| args.file.with_extension("png"));
        write_frame(&document, args.time, &config, &output)?;
        info!("Wrote {}", output.display());
        return Ok(());
    };

    if !(fps > 0.0) {
        bail!("--fps must be positive, got {fps}");
    }
    let dir = args.output.unwrap_or_else(|| args.file.with_extension(""));
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    // A static drawable still yields its single frame.
    let count = document.frame_count(fps).max(1);
    info!(count, fps, "Rendering sequence to {}", dir.display());
    for index in 0..count {
        let path = dir.join(format!("frame_{index:04}.png"));
        write_frame(&document, document.frame_time(index, fps), &config, &path)?;
    }
    info!("Wrote {count} frames");
    Ok(())
}

fn write_frame(
    document: &Document,
    time_ms: f64,
    config: &RasterConfig,
    path: &Path,
) -> Result<()> {
    let png = avd_skia::render_png(document, time_ms, config)
        .with_context(|| format!("Failed to render frame at {time_ms} ms"))?;
    fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let document = load(&args.file)?;
    let overrides = args
        .time
        .map(|time| Animator::evaluate_all(&document.animators, time));

    if args.json {
        let value = serde_json::json!({
            "document": &document,
            "overrides": &overrides,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let (mut groups, mut paths, mut clips) = (0, 0, 0);
    for node in document.root.descendants() {
        match node {
            SceneNode::Group(_) => groups += 1,
            SceneNode::Path(_) => paths += 1,
            SceneNode::ClipPath(_) => clips += 1,
        }
    }

    println!(
        "size:     {}x{} (viewport {}x{})",
        document.width, document.height, document.viewport_width, document.viewport_height
    );
    if document.is_animated() {
        println!("duration: {} ms", document.total_duration_ms);
    } else {
        println!("duration: static");
    }
    println!("nodes:    {groups} groups, {paths} paths, {clips} clip-paths");

    for (target, descriptors) in &document.animators {
        println!("target {target}:");
        for d in descriptors {
            println!(
                "  {:<16} {:>7} -> {:<7} ms  {:?}  {}",
                d.property.name(),
                d.start_time_ms,
                d.end_time_ms(),
                d.value_kind,
                d.interpolator
            );
        }
    }

    if let (Some(time), Some(overrides)) = (args.time, overrides) {
        println!("overrides at {time} ms:");
        for (target, values) in overrides.iter().filter(|(_, v)| !v.is_empty()) {
            println!("  {target}:");
            for (property, value) in values.iter() {
                println!("    {} = {:?}", property.name(), value);
            }
        }
    }
    Ok(())
}
