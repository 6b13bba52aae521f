//! Grid walk shared by the renderers.

use crate::color::push_colored;
use crate::config::RenderConfig;
use crate::dither;
use crate::glyph::{gray_to_glyph, GlyphSet};
use crate::raster::{sample, Raster, Region, Sample};
use crate::tone::apply_contrast;
use crate::{Result, TivError};

/// Rendering strategy, picked once per config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Ascii,
    Blocks,
    /// Floyd–Steinberg over the given ramp.
    Dithered(GlyphSet),
}

impl RenderMode {
    pub fn select(config: &RenderConfig) -> Self {
        match (config.dither, config.glyphs) {
            (true, glyphs) => RenderMode::Dithered(glyphs),
            (false, GlyphSet::Blocks) => RenderMode::Blocks,
            (false, GlyphSet::Ascii) => RenderMode::Ascii,
        }
    }

    pub fn ramp(self) -> &'static [char] {
        match self {
            RenderMode::Ascii => GlyphSet::Ascii.ramp(),
            RenderMode::Blocks => GlyphSet::Blocks.ramp(),
            RenderMode::Dithered(glyphs) => glyphs.ramp(),
        }
    }
}

/// Render the whole raster in one pass on the calling thread.
pub fn render<R: Raster + ?Sized>(raster: &R, config: &RenderConfig) -> Result<String> {
    let (src_w, src_h) = raster.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(TivError::EmptyRegion { width: src_w, height: src_h });
    }
    let out = config.output_size(src_w, src_h);

    let mode = RenderMode::select(config);
    let text = match mode {
        RenderMode::Dithered(_) => dither::render_dithered(raster, config, out, mode.ramp()),
        RenderMode::Ascii | RenderMode::Blocks => render_direct(raster, config, out, mode.ramp()),
    };
    Ok(text)
}

fn render_direct<R: Raster + ?Sized>(
    raster: &R,
    config: &RenderConfig,
    out: (u32, u32),
    ramp: &[char],
) -> String {
    let mut text = String::with_capacity(text_capacity(out, config));
    for y in 0..out.1 {
        for x in 0..out.0 {
            let cell = sample_cell(raster, x, y, out, config.contrast);
            let glyph = gray_to_glyph(ramp, cell.gray, config.invert);
            push_colored(&mut text, glyph, cell.rgb, config.color);
        }
        text.push('\n');
    }
    text
}

/// Sample output cell `(x, y)` with contrast applied to its tone.
pub(crate) fn sample_cell<R: Raster + ?Sized>(
    raster: &R,
    x: u32,
    y: u32,
    out: (u32, u32),
    contrast: f64,
) -> Sample {
    let region = Region::for_cell(x, y, out, raster.dimensions());
    let s = sample(raster, region);
    Sample { gray: apply_contrast(s.gray, contrast), rgb: s.rgb }
}

pub(crate) fn text_capacity(out: (u32, u32), config: &RenderConfig) -> usize {
    // widest cell: "\x1b[38;2;255;255;255m" + 3-byte glyph + "\x1b[0m"
    let cell = if config.color.is_enabled() { 26 } else { 3 };
    (out.0 as usize * cell + 1) * out.1 as usize
}
