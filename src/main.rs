//! tiv CLI - Convert images to ASCII or Unicode block art

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tiv::{ColorMode, GlyphSet, RenderConfig, TivError};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tiv", version, about = "Convert images to ASCII art. Reads from stdin if no file is given.")]
struct Args {
    /// Input image file
    input: Option<PathBuf>,
    /// Output width in characters [default: 80]
    #[arg(short, long)]
    width: Option<u32>,
    /// Output height in characters, 0 derives it from the aspect ratio [default: 0]
    #[arg(short = 'H', long)]
    height: Option<u32>,
    /// Invert brightness levels
    #[arg(short, long)]
    invert: bool,
    /// Contrast adjustment (0.1-5.0) [default: 1.0]
    #[arg(short, long)]
    contrast: Option<f64>,
    /// Use Unicode block characters
    #[arg(short, long)]
    blocks: bool,
    /// Enable Floyd-Steinberg dithering
    #[arg(short, long)]
    dither: bool,
    /// Color output
    #[arg(long, value_enum)]
    color: Option<ColorArg>,
    /// JSON file with default render settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    None,
    #[value(name = "256")]
    Ansi256,
    #[value(name = "24bit")]
    TrueColor,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::None => ColorMode::None,
            ColorArg::Ansi256 => ColorMode::Ansi256,
            ColorArg::TrueColor => ColorMode::TrueColor,
        }
    }
}

impl Args {
    fn render_config(&self) -> Result<RenderConfig, TivError> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)?,
            None => RenderConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(contrast) = self.contrast {
            config.contrast = contrast;
        }
        if let Some(color) = self.color {
            config.color = color.into();
        }
        config.invert |= self.invert;
        config.dither |= self.dither;
        if self.blocks {
            config.glyphs = GlyphSet::Blocks;
        }
        Ok(config)
    }
}

fn run(args: &Args) -> Result<String, TivError> {
    let config = args.render_config()?;
    config.validate()?;
    debug!(?config, "render settings");

    let image = match &args.input {
        Some(path) => tiv::input::load_path(path)?,
        None => tiv::input::load_reader(std::io::stdin().lock())?,
    };
    tiv::convert(&image, &config)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiv=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "conversion failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
