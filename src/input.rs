//! Loading and checking source images.

use crate::config::ConfigError;
use crate::raster::Rgb16Image;
use crate::{Result, TivError};
use image::{DynamicImage, Rgb};
use std::io::Read;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"];

/// Longest accepted side, in pixels.
pub const MAX_DIMENSION: u32 = 8000;
/// Largest accepted image, in pixels.
pub const MAX_TOTAL_PIXELS: u64 = 20_000_000;

pub fn supported_formats() -> &'static [&'static str] {
    &[
        "PNG (.png)",
        "JPEG (.jpg, .jpeg)",
        "GIF (.gif)",
        "WebP (.webp)",
        "TIFF (.tiff, .tif)",
        "BMP (.bmp)",
    ]
}

/// Check that `path` names an existing file with a supported extension.
pub fn validate_image_file(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid {
            field: "filename",
            value: String::new(),
            message: "filename cannot be empty",
        }
        .into());
    }
    if !path.exists() {
        return Err(TivError::FileNotFound(path.to_path_buf()));
    }

    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(TivError::UnsupportedFormat {
            path: path.to_path_buf(),
            supported: supported_formats().join(", "),
        });
    }
    Ok(())
}

pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width < 1 || height < 1 {
        return Err(TivError::InvalidDimensions { width, height });
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(TivError::ImageTooLarge {
            width,
            height,
            reason: format!("exceeds maximum {MAX_DIMENSION} on any side"),
        });
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_TOTAL_PIXELS {
        return Err(TivError::ImageTooLarge {
            width,
            height,
            reason: format!("{pixels} pixels, maximum supported is {MAX_TOTAL_PIXELS}"),
        });
    }
    Ok(())
}

/// Validate, read and decode an image file.
pub fn load_path(path: impl AsRef<Path>) -> Result<Rgb16Image> {
    let path = path.as_ref();
    validate_image_file(path)?;
    decode(&std::fs::read(path)?)
}

/// Decode an image from a stream, e.g. stdin.
pub fn load_reader(mut reader: impl Read) -> Result<Rgb16Image> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

/// Decode with the format guessed from content. Alpha is composited over black.
pub fn decode(bytes: &[u8]) -> Result<Rgb16Image> {
    let image = image::load_from_memory(bytes).map_err(TivError::Decode)?;
    validate_dimensions(image.width(), image.height())?;
    Ok(flatten(&image))
}

fn flatten(image: &DynamicImage) -> Rgb16Image {
    let rgba = image.to_rgba16();
    Rgb16Image::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let premul = |c: u16| (u32::from(c) * u32::from(a) / 0xFFFF) as u16;
        Rgb([premul(r), premul(g), premul(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_missing_file() {
        let err = validate_image_file(Path::new("/nonexistent/cat.png")).unwrap_err();
        assert!(matches!(err, TivError::FileNotFound(_)));
    }

    #[test]
    fn test_empty_filename() {
        let err = validate_image_file(Path::new("")).unwrap_err();
        assert!(matches!(err, TivError::Config(ConfigError::Invalid { field: "filename", .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = validate_image_file(file.path()).unwrap_err();
        match err {
            TivError::UnsupportedFormat { supported, .. } => assert!(supported.contains("PNG")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extension_case_insensitive() {
        let file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        assert!(validate_image_file(file.path()).is_ok());
    }

    #[test]
    fn test_dimension_limits() {
        assert!(validate_dimensions(8000, 2500).is_ok());
        assert!(matches!(validate_dimensions(0, 5), Err(TivError::InvalidDimensions { .. })));
        assert!(matches!(validate_dimensions(8001, 1), Err(TivError::ImageTooLarge { .. })));
        assert!(matches!(validate_dimensions(5000, 5000), Err(TivError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_decode_png_round_trip() {
        let img = RgbaImage::from_fn(3, 2, |x, _| Rgba([x as u8 * 100, 0, 0, 255]));
        let decoded = decode(&png_bytes(&img)).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [200 * 257, 0, 0]);
    }

    #[test]
    fn test_transparent_reads_black() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0]));
        let decoded = decode(&png_bytes(&img)).unwrap();
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = load_reader(&b"definitely not an image"[..]).unwrap_err();
        assert!(matches!(err, TivError::Decode(_)));
        assert!(err.to_string().starts_with("failed to decode image"));
    }

    #[test]
    fn test_load_path() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        std::io::Write::write_all(&mut file, &png_bytes(&RgbaImage::new(4, 4))).unwrap();
        let decoded = load_path(file.path()).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
    }
}
