//! Pixel sources and region sampling.

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb, RgbImage};

/// Decoded image with 16-bit RGB channels.
pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Read-only grid of 16-bit RGB pixels.
///
/// Renderers are written against this trait so that a decoded image and a
/// cropped view of one can be rendered the same way.
pub trait Raster {
    fn dimensions(&self) -> (u32, u32);

    /// Pixel at `(x, y)`; callers keep coordinates inside `dimensions()`.
    fn rgb16(&self, x: u32, y: u32) -> [u16; 3];
}

impl<R: Raster + ?Sized> Raster for &R {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn rgb16(&self, x: u32, y: u32) -> [u16; 3] {
        (**self).rgb16(x, y)
    }
}

impl Raster for Rgb16Image {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn rgb16(&self, x: u32, y: u32) -> [u16; 3] {
        self.get_pixel(x, y).0
    }
}

impl Raster for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn rgb16(&self, x: u32, y: u32) -> [u16; 3] {
        let [r, g, b] = self.get_pixel(x, y).0;
        [widen(r), widen(g), widen(b)]
    }
}

impl Raster for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    /// Alpha is premultiplied, so transparent pixels read as black.
    fn rgb16(&self, x: u32, y: u32) -> [u16; 3] {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        let a = u32::from(widen(a));
        let premul = |c: u8| (u32::from(widen(c)) * a / 0xFFFF) as u16;
        [premul(r), premul(g), premul(b)]
    }
}

/// 8-bit to 16-bit channel, `0xAB -> 0xABAB`.
fn widen(c: u8) -> u16 {
    u16::from(c) * 257
}

/// View of a sub-rectangle of another raster, with its origin moved to (0, 0).
pub struct CroppedView<'a, R: ?Sized> {
    inner: &'a R,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl<'a, R: Raster + ?Sized> CroppedView<'a, R> {
    /// Crop `[x0, x1) × [y0, y1)` of `inner`, clipped to its bounds.
    pub fn new(inner: &'a R, x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let (w, h) = inner.dimensions();
        let (x1, y1) = (x1.min(w), y1.min(h));
        let (x0, y0) = (x0.min(x1), y0.min(y1));
        Self { inner, x: x0, y: y0, width: x1 - x0, height: y1 - y0 }
    }
}

impl<R: Raster + ?Sized> Raster for CroppedView<'_, R> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgb16(&self, x: u32, y: u32) -> [u16; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        self.inner.rgb16(self.x + x, self.y + y)
    }
}

/// Half-open source rectangle `[min_x, max_x) × [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Region {
    /// Source pixels covered by output cell `(x, y)` of an `out_w × out_h` grid.
    ///
    /// Never empty as long as the source has at least one pixel per axis.
    pub fn for_cell(x: u32, y: u32, out: (u32, u32), src: (u32, u32)) -> Self {
        let (min_x, max_x) = span(x, out.0, src.0);
        let (min_y, max_y) = span(y, out.1, src.1);
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }
}

fn span(i: u32, out: u32, src: u32) -> (u32, u32) {
    let start = f64::from(i) * f64::from(src) / f64::from(out);
    let end = f64::from(i + 1) * f64::from(src) / f64::from(out);
    let mut lo = start as u32;
    let mut hi = end as u32;
    if hi <= lo {
        hi = lo + 1;
    }
    // keep at least the last pixel when the cell maps past the edge
    lo = lo.min(src.saturating_sub(1));
    hi = hi.min(src).max(lo + 1);
    (lo, hi)
}

/// Averaged tone and color of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub gray: u8,
    pub rgb: [u8; 3],
}

impl Sample {
    const BLACK: Sample = Sample { gray: 0, rgb: [0, 0, 0] };
}

/// Average a region, clamped to the raster bounds.
pub fn sample<R: Raster + ?Sized>(raster: &R, region: Region) -> Sample {
    let (w, h) = raster.dimensions();
    let (x1, y1) = (region.max_x.min(w), region.max_y.min(h));

    let mut total = [0u64; 3];
    let mut samples = 0u64;
    for y in region.min_y..y1 {
        for x in region.min_x..x1 {
            let px = raster.rgb16(x, y);
            for (t, c) in total.iter_mut().zip(px) {
                *t += u64::from(c);
            }
            samples += 1;
        }
    }

    if samples == 0 {
        return Sample::BLACK;
    }

    let [r, g, b] = total.map(|t| t / samples);
    let gray = (299 * r + 587 * g + 114 * b) / 1000;
    Sample { gray: (gray >> 8) as u8, rgb: [(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8] }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_region_covers_proportional_span() {
        let r = Region::for_cell(1, 0, (4, 2), (8, 4));
        assert_eq!(r, Region { min_x: 2, min_y: 0, max_x: 4, max_y: 2 });
    }

    #[test]
    fn test_region_widened_when_upscaling() {
        // 10 output cells over 3 source columns
        for x in 0..10 {
            let r = Region::for_cell(x, 0, (10, 1), (3, 1));
            assert_eq!(r.width(), 1, "cell {x}");
            assert!(r.max_x <= 3);
        }
    }

    #[test]
    fn test_region_never_empty_on_single_pixel() {
        let r = Region::for_cell(0, 0, (1, 1), (1, 1));
        assert_eq!((r.width(), r.height()), (1, 1));
    }

    #[test]
    fn test_sample_white_and_black() {
        let white = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        let s = sample(&white, Region::for_cell(0, 0, (1, 1), (2, 2)));
        assert_eq!(s, Sample { gray: 255, rgb: [255, 255, 255] });

        let black = RgbImage::new(2, 2);
        let s = sample(&black, Region::for_cell(0, 0, (1, 1), (2, 2)));
        assert_eq!(s, Sample::BLACK);
    }

    #[test]
    fn test_sample_averages_checkerboard() {
        let img = checker(2, 2);
        let s = sample(&img, Region::for_cell(0, 0, (1, 1), (2, 2)));
        // mean channel 0x7FFF -> 127
        assert_eq!(s.gray, 127);
        assert_eq!(s.rgb, [127, 127, 127]);
    }

    #[test]
    fn test_luminance_weights() {
        let red = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        let s = sample(&red, Region::for_cell(0, 0, (1, 1), (1, 1)));
        // 0.299 * 65535 >> 8
        assert_eq!(s.gray, 76);
        assert_eq!(s.rgb, [255, 0, 0]);
    }

    #[test]
    fn test_empty_region_is_black() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        let region = Region { min_x: 5, min_y: 5, max_x: 6, max_y: 6 };
        assert_eq!(sample(&img, region), Sample::BLACK);
    }

    #[test]
    fn test_cropped_view_remaps_origin() {
        let img = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, 0]));
        let view = CroppedView::new(&img, 1, 2, 3, 4);
        assert_eq!(Raster::dimensions(&view), (2, 2));
        assert_eq!(view.rgb16(0, 0), [257, 2 * 257, 0]);
        assert_eq!(view.rgb16(1, 1), [2 * 257, 3 * 257, 0]);
        assert_eq!(view.rgb16(2, 0), [0, 0, 0]);
    }

    #[test]
    fn test_cropped_view_clips_to_source() {
        let img = RgbImage::new(4, 4);
        let view = CroppedView::new(&img, 3, 3, 10, 10);
        assert_eq!(Raster::dimensions(&view), (1, 1));
    }

    #[test]
    fn test_dynamic_image_premultiplies_alpha() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            1,
            1,
            image::Rgba([255, 255, 255, 0]),
        ));
        assert_eq!(img.rgb16(0, 0), [0, 0, 0]);
    }
}
