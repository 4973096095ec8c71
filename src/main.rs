use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lottie_merge::{load_composition, load_config, run, save_composition, Pass, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Composition to optimize (JSON)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the optimized composition. Defaults to stdout.
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Passes to run
    #[arg(long, value_enum, default_value_t = Pass::All)]
    pass: Pass,

    /// Optimizer schedule (JSON). Missing fields use the defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Split vector animations with per-channel easing into per-axis ones first
    #[arg(long)]
    split_vector_channels: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_string().parse().context("Invalid log level")?)
        .from_env_lossy();

    // logs go to stderr so the composition can be piped from stdout
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format)?;

    let composition = load_composition(&cli.input)?;
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Default::default(),
    };
    let options = RunOptions {
        pass: cli.pass,
        config,
        split_vector_channels: cli.split_vector_channels,
    };

    let (optimized, reports) = run(&composition, &options)?;
    for report in &reports {
        eprintln!("{report}");
    }

    match &cli.output {
        Some(path) => save_composition(&optimized, path)?,
        None => println!(
            "{}",
            serde_json::to_string_pretty(&optimized).context("Failed to serialize composition")?
        ),
    }
    Ok(())
}
