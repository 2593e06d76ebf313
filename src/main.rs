use clap::{Parser, Subcommand};
use imgsqueeze::blob::BlobStore;
use imgsqueeze::compress::{CompressionResult, ProgressEvent, compress};
use imgsqueeze::config::{self, CompressionConfig};
use imgsqueeze::encoding::{OutputFormat, RustEncoder, SourceImage};
use imgsqueeze::{formatters, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "imgsqueeze")]
#[command(about = "Compress images toward a target output size")]
#[command(long_about = "\
Compress images toward a target output size

Re-encodes a raster image (jpeg, png, webp in or out) at a chosen quality
and dimension cap. With --target-size, searches quality levels by bisection
until the output lands within 10% of the byte budget, using at most 15
encodes.

Examples:

  imgsqueeze compress photo.jpg
  imgsqueeze compress photo.jpg --quality 0.6 --max-width 1280
  imgsqueeze compress photo.png --format webp --target-size 200KB
  imgsqueeze compress photo.jpg --target-size 1.5MB --json

Target sizes accept b/kb/mb/gb suffixes (1024-based); bare numbers are
kilobytes. Run 'imgsqueeze gen-config' for a documented config file.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a single image, optionally toward a target output size
    Compress(CompressArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct CompressArgs {
    /// Input image file
    input: PathBuf,

    /// Output file (defaults to <input>-compressed.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Encoder quality in (0, 1]
    #[arg(short, long)]
    quality: Option<f32>,

    /// Output format: jpeg, png, or webp
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Target output size, e.g. "200KB" or "1.5MB" (bare numbers are KB)
    #[arg(short, long)]
    target_size: Option<String>,

    /// Width cap in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Height cap in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// Read defaults from a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result summary as JSON
    #[arg(long)]
    json: bool,

    /// Suppress the progress display
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compress(args) => run_compress(args),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    }
}

fn run_compress(args: CompressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;

    let image = SourceImage::from_path(&args.input)?;
    let encoder = RustEncoder::new();

    let show_progress = !(args.quiet || args.json);
    let mut on_progress = |event: ProgressEvent| {
        if show_progress {
            output::print_progress(&event);
        }
    };
    let encoded = compress(&encoder, &image, &config, Some(&mut on_progress))?;

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, config.output_format));
    std::fs::write(&out_path, encoded.bytes())?;

    let store = BlobStore::new();
    let result = CompressionResult::register(&store, &image, &encoded);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_result(&result);
        println!("Wrote {}", out_path.display());
    }
    result.release(&store)?;

    Ok(())
}

/// Layer CLI flags over the config file (or defaults), then validate.
fn resolve_config(args: &CompressArgs) -> Result<CompressionConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => CompressionConfig::load(path)?,
        None => CompressionConfig::default(),
    };
    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if let Some(format) = args.format {
        config.output_format = format;
    }
    if let Some(raw) = &args.target_size {
        let kb = formatters::parse_target_size(raw)
            .ok_or_else(|| format!("invalid target size: {raw:?}"))?;
        config.target_size_kb = Some(kb);
    }
    if args.max_width.is_some() {
        config.max_width = args.max_width;
    }
    if args.max_height.is_some() {
        config.max_height = args.max_height;
    }
    config.validate()?;
    Ok(config)
}

fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("compressed");
    input.with_file_name(format!("{stem}-compressed.{}", format.extension()))
}
