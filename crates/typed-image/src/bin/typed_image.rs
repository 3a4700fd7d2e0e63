use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use serde_json::json;
use typed_image::io::SynthConfig;
use typed_image::{AnyImage, CodecError, DepthTag};

#[derive(Parser, Debug)]
#[command(name = "typed-image")]
#[command(about = "Create, inspect and convert typed images")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic image from a JSON config.
    Synth(SynthArgs),
    /// Print layout, size and per-channel statistics of an image file.
    Info(InfoArgs),
    /// Re-encode an image; formats follow the file extensions.
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct SynthArgs {
    #[arg(long)]
    config: PathBuf,
    /// Overrides `output_path` from the config.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    path: PathBuf,
    /// Emit a JSON object instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    input: PathBuf,
    output: PathBuf,
    /// Saturating conversion to another element type.
    #[arg(long, value_parser = parse_depth)]
    depth: Option<DepthTag>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to install logger: {0}")]
    Logging(String),
}

fn parse_depth(s: &str) -> Result<DepthTag, String> {
    DepthTag::ALL
        .into_iter()
        .find(|tag| tag.name() == s)
        .ok_or_else(|| format!("unknown depth `{s}`"))
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8) -> Result<(), CliError> {
    typed_image::core::init_with_level(level_for(verbose))
        .map_err(|e| CliError::Logging(e.to_string()))
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8) -> Result<(), CliError> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = level_for(verbose);
    tracing_log::LogTracer::builder()
        .with_max_level(level)
        .init()
        .map_err(|e| CliError::Logging(e.to_string()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::Logging(e.to_string()))
}

fn run_synth(args: SynthArgs) -> Result<(), CliError> {
    let cfg = SynthConfig::load_json(&args.config)?;
    let out = args.out.unwrap_or_else(|| cfg.output_path());
    let img = cfg.generate()?;
    img.save(&out)?;
    println!("wrote {img} to {}", out.display());
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<(), CliError> {
    let img = AnyImage::open(&args.path)?;
    let channels = img.color().channels();
    let sum = &img.sum().0[..channels];
    let (lo, hi) = img.min_max();
    let (lo, hi) = (&lo.0[..channels], &hi.0[..channels]);

    if args.json {
        let report = json!({
            "path": args.path.display().to_string(),
            "color": img.color(),
            "depth": img.depth(),
            "width": img.size().width,
            "height": img.size().height,
            "sum": sum,
            "min": lo,
            "max": hi,
        });
        println!("{report}");
    } else {
        println!("{}: {img}", args.path.display());
        println!("  sum: {sum:?}");
        println!("  min: {lo:?}");
        println!("  max: {hi:?}");
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<(), CliError> {
    let mut img = AnyImage::open(&args.input)?;
    if let Some(depth) = args.depth {
        img = img.convert_depth(depth)?;
    }
    img.save(&args.output)?;
    log::info!(
        "converted {} -> {} as {img}",
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("warning: {e}");
    }

    let result = match cli.cmd {
        Command::Synth(args) => run_synth(args),
        Command::Info(args) => run_info(args),
        Command::Convert(args) => run_convert(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
