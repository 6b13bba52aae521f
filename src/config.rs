//! Rendering parameters.

use crate::color::ColorMode;
use crate::glyph::GlyphSet;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const MAX_WIDTH: u32 = 1000;
pub const MAX_HEIGHT: u32 = 1000;
pub const MIN_CONTRAST: f64 = 0.1;
pub const MAX_CONTRAST: f64 = 5.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("validation error for {field}: {message} (got: {value})")]
    Invalid { field: &'static str, value: String, message: &'static str },
}

impl ConfigError {
    fn invalid(field: &'static str, value: impl ToString, message: &'static str) -> Self {
        ConfigError::Invalid { field, value: value.to_string(), message }
    }
}

/// Parameters for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in cells.
    pub width: u32,
    /// Output height in cells, `0` derives it from the aspect ratio.
    pub height: u32,
    pub invert: bool,
    pub contrast: f64,
    pub glyphs: GlyphSet,
    pub dither: bool,
    pub color: ColorMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 0,
            invert: false,
            contrast: 1.0,
            glyphs: GlyphSet::Ascii,
            dither: false,
            color: ColorMode::None,
        }
    }
}

impl RenderConfig {
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_invert(mut self, enabled: bool) -> Self {
        self.invert = enabled;
        self
    }

    pub fn with_contrast(mut self, contrast: f64) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_glyphs(mut self, glyphs: GlyphSet) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn with_dither(mut self, enabled: bool) -> Self {
        self.dither = enabled;
        self
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// Load a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.width < 1 {
            return Err(ConfigError::invalid("width", self.width, "must be at least 1"));
        }
        if self.width > MAX_WIDTH {
            return Err(ConfigError::invalid(
                "width",
                self.width,
                "must be 1000 or less to prevent performance issues",
            ));
        }
        if self.height > MAX_HEIGHT {
            return Err(ConfigError::invalid(
                "height",
                self.height,
                "must be 1000 or less to prevent performance issues",
            ));
        }
        if self.contrast.is_nan() || self.contrast < MIN_CONTRAST {
            return Err(ConfigError::invalid("contrast", self.contrast, "must be at least 0.1"));
        }
        if self.contrast > MAX_CONTRAST {
            return Err(ConfigError::invalid("contrast", self.contrast, "must be 5.0 or less"));
        }
        Ok(())
    }

    /// Output grid size for a `src_w × src_h` source.
    ///
    /// A zero height is derived from the source aspect ratio and the cell
    /// aspect of the glyph set, and is never less than one row.
    pub fn output_size(&self, src_w: u32, src_h: u32) -> (u32, u32) {
        if self.height != 0 {
            return (self.width, self.height);
        }
        let aspect = f64::from(src_h) / f64::from(src_w);
        let height = (f64::from(self.width) * aspect * self.glyphs.cell_aspect()) as u32;
        (self.width, height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_width_bounds() {
        let err = RenderConfig::default().with_width(0).validate().unwrap_err();
        assert_eq!(err.to_string(), "validation error for width: must be at least 1 (got: 0)");
        assert!(RenderConfig::default().with_width(1001).validate().is_err());
        assert!(RenderConfig::default().with_width(1000).validate().is_ok());
    }

    #[test]
    fn test_height_bounds() {
        assert!(RenderConfig::default().with_height(0).validate().is_ok());
        assert!(RenderConfig::default().with_height(1000).validate().is_ok());
        assert!(RenderConfig::default().with_height(1001).validate().is_err());
    }

    #[test]
    fn test_contrast_bounds() {
        for c in [0.1, 1.0, 5.0] {
            assert!(RenderConfig::default().with_contrast(c).validate().is_ok(), "{c}");
        }
        for c in [0.0, 0.09, 5.01, f64::NAN] {
            let err = RenderConfig::default().with_contrast(c).validate().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "contrast", .. }), "{c}");
        }
    }

    #[test]
    fn test_output_size_explicit() {
        let cfg = RenderConfig::default().with_width(40).with_height(7);
        assert_eq!(cfg.output_size(1000, 10), (40, 7));
    }

    #[test]
    fn test_output_size_auto() {
        let cfg = RenderConfig::default().with_width(100);
        // 100 * 0.5 * 0.43
        assert_eq!(cfg.output_size(200, 100), (100, 21));
        let cfg = cfg.with_glyphs(GlyphSet::Blocks);
        assert_eq!(cfg.output_size(200, 100), (100, 25));
    }

    #[test]
    fn test_output_size_auto_never_zero() {
        let cfg = RenderConfig::default().with_width(10);
        assert_eq!(cfg.output_size(10_000, 1), (10, 1));
    }

    #[test]
    fn test_json_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"width": 120, "color": "256", "glyphs": "blocks"}}"#).unwrap();

        let cfg = RenderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.width, 120);
        assert_eq!(cfg.color, ColorMode::Ansi256);
        assert_eq!(cfg.glyphs, GlyphSet::Blocks);
        assert_eq!(cfg.contrast, 1.0);
        assert_eq!(cfg.height, 0);
    }

    #[test]
    fn test_json_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{width:").unwrap();
        let err = RenderConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::TivError::ConfigFile(_)));
    }
}
