//! Floyd–Steinberg dithering onto a glyph ramp.

use crate::color::push_colored;
use crate::config::RenderConfig;
use crate::glyph::closest_glyph;
use crate::raster::Raster;
use crate::render::{sample_cell, text_capacity};

/// Error diffusion kernel as `(dx, dy, weight)`.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: [(i64, i64, f64); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Two passes: sample every cell into a tone buffer, then quantize it
/// row-major while pushing the error forward. Color is never dithered.
pub fn render_dithered<R: Raster + ?Sized>(
    raster: &R,
    config: &RenderConfig,
    out: (u32, u32),
    ramp: &[char],
) -> String {
    let (w, h) = (out.0 as usize, out.1 as usize);
    let colored = config.color.is_enabled();

    let mut tones = vec![0.0f64; w * h];
    let mut colors: Vec<[u8; 3]> = if colored { vec![[0; 3]; w * h] } else { Vec::new() };

    for y in 0..out.1 {
        for x in 0..out.0 {
            let idx = y as usize * w + x as usize;
            let cell = sample_cell(raster, x, y, out, config.contrast);
            tones[idx] = f64::from(cell.gray);
            if colored {
                colors[idx] = cell.rgb;
            }
        }
    }

    let mut text = String::with_capacity(text_capacity(out, config));
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let old = tones[idx];
            let (glyph, effective) = closest_glyph(ramp, old, config.invert);
            let rgb = if colored { colors[idx] } else { [0; 3] };
            push_colored(&mut text, glyph, rgb, config.color);

            diffuse(&mut tones, w, h, x, y, old - effective);
        }
        text.push('\n');
    }
    text
}

fn diffuse(tones: &mut [f64], w: usize, h: usize, x: usize, y: usize, error: f64) {
    for (dx, dy, weight) in FLOYD_STEINBERG {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx < 0 || nx >= w as i64 || ny >= h as i64 {
            continue;
        }
        tones[ny as usize * w + nx as usize] += error * weight;
    }
}
