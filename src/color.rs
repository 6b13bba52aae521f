//! ANSI foreground colors.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    #[default]
    #[serde(rename = "none")]
    None,
    /// xterm 256-color palette.
    #[serde(rename = "256")]
    Ansi256,
    /// 24-bit truecolor.
    #[serde(rename = "24bit")]
    TrueColor,
}

impl ColorMode {
    pub fn is_enabled(self) -> bool {
        self != ColorMode::None
    }
}

/// Nearest xterm 256-color palette index, always in `16..=255`.
pub fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        // 232..=255 is the 24-step gray ramp; the ends reuse cube black/white
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r - 8) / 10).min(23);
    }

    let level = |c: u8| (u16::from(c) * 5 / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

/// Append `glyph` to `out`, wrapped in the escape codes for `mode`.
pub fn push_colored(out: &mut String, glyph: char, [r, g, b]: [u8; 3], mode: ColorMode) {
    // writing into a String cannot fail
    match mode {
        ColorMode::None => out.push(glyph),
        ColorMode::Ansi256 => {
            let _ = write!(out, "\x1b[38;5;{}m{glyph}{RESET}", rgb_to_256(r, g, b));
        }
        ColorMode::TrueColor => {
            let _ = write!(out, "\x1b[38;2;{r};{g};{b}m{glyph}{RESET}");
        }
    }
}

pub fn colorize(glyph: char, rgb: [u8; 3], mode: ColorMode) -> String {
    let mut out = String::new();
    push_colored(&mut out, glyph, rgb, mode);
    out
}
