//! ball-detect CLI: run the detector on one color + depth frame pair.

use std::path::PathBuf;

use ball_detect::{load_color, load_range, BallDetector, DetectionReport, DetectorParams};
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(not(feature = "tracing"))]
use log::LevelFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ball-detect")]
#[command(about = "Detect red, blue and green balls in a color + depth frame pair")]
#[command(version)]
struct Cli {
    /// Log verbosity.
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect balls in one frame pair and write a JSON report.
    Detect(DetectArgs),

    /// Print the default detector parameters as JSON.
    Params,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the color image (8-bit RGB, any common format).
    #[arg(long)]
    color: PathBuf,

    /// Path to the depth image (16-bit single channel, millimeters).
    #[arg(long)]
    depth: PathBuf,

    /// Detector parameters (JSON). Defaults are used when omitted.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Where to write the report.
    #[arg(long, default_value = "ball_detect_report.json")]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[cfg(not(feature = "tracing"))]
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Params => {
            println!("{}", serde_json::to_string_pretty(&DetectorParams::default())?);
            Ok(())
        }
    }
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives: a non-empty `RUST_LOG` wins over `--log-level`.
fn filter_spec(level: LogLevel, rust_log: Option<String>) -> String {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| level.as_str().to_owned())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) -> CliResult<()> {
    let spec = filter_spec(level, std::env::var("RUST_LOG").ok());
    env_logger::Builder::new()
        .filter_level(level.into())
        .parse_filters(&spec)
        .try_init()?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(level: LogLevel) -> CliResult<()> {
    use tracing_subscriber::EnvFilter;

    let spec = filter_spec(level, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    // `log` records are bridged by the subscriber's own LogTracer.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e as CliError)?;
    Ok(())
}

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let params = match &args.params {
        Some(path) => DetectorParams::load_json(path)?,
        None => DetectorParams::default(),
    };
    let detector = BallDetector::new(params)?;

    let color = load_color(&args.color)?;
    let range = load_range(&args.depth)?;
    log::info!(
        "loaded color {}x{}, depth {}x{}",
        color.width(),
        color.height(),
        range.width(),
        range.height()
    );

    let mut report = DetectionReport::new(&args.color, &args.depth);
    match detector.detect(&color, &range) {
        Ok(detections) => {
            for (class, dets) in detections.iter() {
                log::info!("{class}: {} ball(s)", dets.len());
            }
            report.set_detections(&detections, &detector.params());
        }
        Err(err) => {
            log::error!("detection failed: {err}");
            report.set_error(&err);
        }
    }

    report.write_json(&args.out)?;
    println!("wrote report JSON to {}", args.out.display());
    Ok(())
}
