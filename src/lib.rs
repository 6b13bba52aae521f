//! Convert raster images to ASCII and Unicode block art for the terminal.

pub mod chunk;
pub mod color;
pub mod config;
pub mod dither;
pub mod glyph;
pub mod input;
pub mod raster;
pub mod render;
pub mod tone;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use chunk::{ChunkedProcessor, MemoryLimits};
pub use color::ColorMode;
pub use config::{ConfigError, RenderConfig};
pub use glyph::GlyphSet;
pub use raster::{CroppedView, Raster, Rgb16Image};
pub use render::RenderMode;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TivError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid config file: {0}")]
    ConfigFile(#[from] serde_json::Error),
    #[error("file not found: {} (check the path and try again)", .0.display())]
    FileNotFound(PathBuf),
    #[error("unsupported image format: {} (supported formats: {supported})", .path.display())]
    UnsupportedFormat { path: PathBuf, supported: String },
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("image too large: {width}x{height}, {reason}")]
    ImageTooLarge { width: u32, height: u32, reason: String },
    #[error("nothing to sample in a {width}x{height} region")]
    EmptyRegion { width: u32, height: u32 },
    #[error("chunk processing error at ({x},{y}): {source}")]
    Chunk { x: u32, y: u32, source: Box<TivError> },
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, TivError>;

/// Validate `config` and render `raster` with it.
///
/// Large sources are tiled and rendered concurrently, see [`ChunkedProcessor`].
pub fn convert<R: Raster + Sync + ?Sized>(raster: &R, config: &RenderConfig) -> Result<String> {
    config.validate()?;
    ChunkedProcessor::new(*config).process(raster)
}
