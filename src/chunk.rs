//! Large-image strategy: tile the output grid and render tiles concurrently.

use crate::config::RenderConfig;
use crate::raster::{CroppedView, Raster};
use crate::render::render;
use crate::{Result, TivError};
use tracing::debug;

/// Resource bounds for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLimits {
    /// Source pixel count above which the image is tiled.
    pub max_pixels: u64,
    /// Tile edge in output cells.
    pub chunk_size: u32,
    /// Tiles rendered at the same time.
    pub max_workers: usize,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            max_pixels: 10_000_000,
            chunk_size: 1000,
            max_workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

/// Output-space tile: cells `[x0, x1) × [y0, y1)` at grid position `(col, row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub col: u32,
    pub row: u32,
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Tile {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Source rectangle `(x0, y0, x1, y1)` under the same proportional
    /// mapping the renderers use per cell.
    pub fn source_rect(&self, out: (u32, u32), src: (u32, u32)) -> (u32, u32, u32, u32) {
        let map = |o: u32, out: u32, src: u32| (f64::from(o) * f64::from(src) / f64::from(out)) as u32;
        (
            map(self.x0, out.0, src.0),
            map(self.y0, out.1, src.1),
            map(self.x1, out.0, src.0),
            map(self.y1, out.1, src.1),
        )
    }
}

/// Split an `out_w × out_h` grid into `size × size` tiles, row-major.
///
/// Returns the number of tile columns with the tiles.
pub fn tile_grid(out_w: u32, out_h: u32, size: u32) -> (usize, Vec<Tile>) {
    let size = size.max(1);
    let cols = out_w.div_ceil(size);
    let rows = out_h.div_ceil(size);

    let mut tiles = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let (x0, y0) = (col * size, row * size);
            tiles.push(Tile {
                col,
                row,
                x0,
                y0,
                x1: (x0 + size).min(out_w),
                y1: (y0 + size).min(out_h),
            });
        }
    }
    (cols as usize, tiles)
}

pub struct ChunkedProcessor {
    limits: MemoryLimits,
    config: RenderConfig,
}

impl ChunkedProcessor {
    pub fn new(config: RenderConfig) -> Self {
        Self { limits: MemoryLimits::default(), config }
    }

    pub fn with_limits(mut self, limits: MemoryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &MemoryLimits {
        &self.limits
    }

    /// Render `raster`, tiling it when it exceeds `max_pixels`.
    pub fn process<R: Raster + Sync + ?Sized>(&self, raster: &R) -> Result<String> {
        let (w, h) = raster.dimensions();
        if w == 0 || h == 0 {
            return Err(TivError::EmptyRegion { width: w, height: h });
        }

        let total = u64::from(w) * u64::from(h);
        if total <= self.limits.max_pixels {
            debug!(width = w, height = h, "rendering directly");
            return render(raster, &self.config);
        }
        self.process_in_chunks(raster)
    }

    fn process_in_chunks<R: Raster + Sync + ?Sized>(&self, raster: &R) -> Result<String> {
        let src = raster.dimensions();
        let out = self.config.output_size(src.0, src.1);
        let (cols, tiles) = tile_grid(out.0, out.1, self.limits.chunk_size);
        debug!(
            tiles = tiles.len(),
            cols,
            out_width = out.0,
            out_height = out.1,
            workers = self.limits.max_workers,
            "rendering in chunks"
        );

        let results = self.run_tiles(raster, &tiles, out)?;

        let mut texts = Vec::with_capacity(results.len());
        for (tile, result) in tiles.iter().zip(results) {
            match result {
                Ok(text) => texts.push(text),
                Err(err) => {
                    debug!(col = tile.col, row = tile.row, error = %err, "chunk failed");
                    return Err(TivError::Chunk { x: tile.col, y: tile.row, source: Box::new(err) });
                }
            }
        }
        Ok(combine_chunks(&texts, cols))
    }

    /// Every tile runs to completion; results keep tile order.
    #[cfg(not(target_arch = "wasm32"))]
    fn run_tiles<R: Raster + Sync + ?Sized>(
        &self,
        raster: &R,
        tiles: &[Tile],
        out: (u32, u32),
    ) -> Result<Vec<Result<String>>> {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.limits.max_workers.max(1))
            .build()?;
        Ok(pool.install(|| {
            tiles.par_iter().map(|tile| self.render_tile(raster, tile, out)).collect()
        }))
    }

    #[cfg(target_arch = "wasm32")]
    fn run_tiles<R: Raster + Sync + ?Sized>(
        &self,
        raster: &R,
        tiles: &[Tile],
        out: (u32, u32),
    ) -> Result<Vec<Result<String>>> {
        Ok(tiles.iter().map(|tile| self.render_tile(raster, tile, out)).collect())
    }

    fn render_tile<R: Raster + ?Sized>(&self, raster: &R, tile: &Tile, out: (u32, u32)) -> Result<String> {
        let (x0, y0, x1, y1) = tile.source_rect(out, raster.dimensions());
        let view = CroppedView::new(raster, x0, y0, x1, y1);
        let config = self.config.with_width(tile.width()).with_height(tile.height());
        render(&view, &config)
    }
}

/// Join row-major tile texts: same-index lines of a tile row side by side,
/// tile rows top to bottom.
pub fn combine_chunks(texts: &[String], cols: usize) -> String {
    let mut result = String::with_capacity(texts.iter().map(String::len).sum());
    for row in texts.chunks(cols.max(1)) {
        let lines: Vec<Vec<&str>> = row.iter().map(|t| t.lines().collect()).collect();
        let height = lines.iter().map(Vec::len).max().unwrap_or(0);
        for i in 0..height {
            for tile in &lines {
                if let Some(line) = tile.get(i) {
                    result.push_str(line);
                }
            }
            result.push('\n');
        }
    }
    result
}
