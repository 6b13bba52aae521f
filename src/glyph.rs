//! Glyph ramps and tone quantization.

use serde::{Deserialize, Serialize};

/// ASCII glyphs ordered from darkest to lightest.
pub static ASCII_RAMP: &[char] = &[' ', '.', '\'', ':', ';', '!', '>', '*', '+', '%', 'S', '#', '@'];

/// Lower-eighth block glyphs, blank first.
pub static BLOCK_RAMP: &[char] = &[' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphSet {
    #[default]
    Ascii,
    Blocks,
}

impl GlyphSet {
    pub fn ramp(self) -> &'static [char] {
        match self {
            GlyphSet::Ascii => ASCII_RAMP,
            GlyphSet::Blocks => BLOCK_RAMP,
        }
    }

    /// Vertical scale applied to the source aspect ratio when the output
    /// height is derived.
    ///
    /// Terminal cells are taller than wide. These are rule-of-thumb values
    /// for common monospace fonts, not measured metrics.
    pub fn cell_aspect(self) -> f64 {
        match self {
            GlyphSet::Ascii => 0.43,
            GlyphSet::Blocks => 0.5,
        }
    }
}

/// Glyph for an 8-bit tone.
pub fn gray_to_glyph(ramp: &[char], gray: u8, invert: bool) -> char {
    let gray = if invert { 255 - gray } else { gray };
    let last = ramp.len() - 1;
    let index = (usize::from(gray) * last / 255).min(last);
    ramp[index]
}

/// Glyph for a continuous tone, together with the tone that glyph stands for.
///
/// The returned tone is in the caller's (pre-invert) space, so
/// `tone - effective` is the quantization error to diffuse.
pub fn closest_glyph(ramp: &[char], tone: f64, invert: bool) -> (char, f64) {
    let tone = if invert { 255.0 - tone } else { tone };
    let tone = tone.clamp(0.0, 255.0);
    let last = ramp.len() - 1;
    let index = ((tone * last as f64 / 255.0) as usize).min(last);

    let effective = index as f64 * 255.0 / last as f64;
    let effective = if invert { 255.0 - effective } else { effective };
    (ramp[index], effective)
}
