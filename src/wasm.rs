//! WebAssembly bindings for tiv

use crate::{ColorMode, GlyphSet, RenderConfig};
use image::RgbaImage;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmRenderer {
    config: RenderConfig,
}

impl Default for WasmRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmRenderer {
        WasmRenderer { config: RenderConfig::default() }
    }

    #[wasm_bindgen]
    pub fn set_width(&mut self, width: u32) {
        self.config.width = width;
    }

    /// `0` derives the height from the aspect ratio.
    #[wasm_bindgen]
    pub fn set_height(&mut self, height: u32) {
        self.config.height = height;
    }

    #[wasm_bindgen]
    pub fn set_invert(&mut self, enabled: bool) {
        self.config.invert = enabled;
    }

    #[wasm_bindgen]
    pub fn set_contrast(&mut self, contrast: f64) {
        self.config.contrast = contrast;
    }

    #[wasm_bindgen]
    pub fn set_blocks(&mut self, enabled: bool) {
        self.config.glyphs = if enabled { GlyphSet::Blocks } else { GlyphSet::Ascii };
    }

    #[wasm_bindgen]
    pub fn set_dither(&mut self, enabled: bool) {
        self.config.dither = enabled;
    }

    /// One of `"none"`, `"256"` or `"24bit"`.
    #[wasm_bindgen]
    pub fn set_color(&mut self, mode: &str) -> Result<(), JsValue> {
        self.config.color = match mode {
            "none" => ColorMode::None,
            "256" => ColorMode::Ansi256,
            "24bit" => ColorMode::TrueColor,
            other => return Err(JsValue::from_str(&format!("unknown color mode: {other}"))),
        };
        Ok(())
    }

    /// Render raw RGBA bytes.
    /// Returns an object `{ text, width, height }`, the last two in cells.
    #[wasm_bindgen]
    pub fn render(&self, image_data: &[u8], width: u32, height: u32) -> Result<js_sys::Object, JsValue> {
        let img = RgbaImage::from_raw(width, height, image_data.to_vec())
            .ok_or_else(|| JsValue::from_str("Invalid image dimensions"))?;
        let img = image::DynamicImage::ImageRgba8(img);

        let text = crate::convert(&img, &self.config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let (out_w, out_h) = self.config.output_size(width, height);

        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"text".into(), &text.into())?;
        js_sys::Reflect::set(&result, &"width".into(), &out_w.into())?;
        js_sys::Reflect::set(&result, &"height".into(), &out_h.into())?;
        Ok(result)
    }
}
