use image::{DynamicImage, GenericImageView};
use log::debug;
use palette::Srgb;

use crate::error::Result;

/// One pixel drawn from the source image at reduced resolution.
pub type SampledPixel = Srgb<u8>;

/// Upper bound on the number of pixels handed to clustering.
pub const DEFAULT_SAMPLE_BUDGET: u32 = 4096;

/// Decode `input` and sample at most `budget` opaque pixels from it.
pub fn sample_pixels(input: &[u8], budget: u32) -> Result<Vec<SampledPixel>> {
    let img = image::load_from_memory(input)?;
    Ok(sample_image(&img, budget))
}

/// Sample an already decoded image on a regular grid.
///
/// The grid stride is the smallest integer that keeps the number of grid
/// points within `budget`. Fully transparent pixels are skipped, so the
/// result may be shorter than the grid (or empty).
pub fn sample_image(img: &DynamicImage, budget: u32) -> Vec<SampledPixel> {
    let (width, height) = img.dimensions();
    let stride = stride_for(width, height, budget.max(1));
    debug!("sampling {width}x{height} image with stride {stride}");

    let rgba = img.to_rgba8();
    let mut pixels = Vec::with_capacity(grid_len(width, height, stride) as usize);
    for y in (0..height).step_by(stride as usize) {
        for x in (0..width).step_by(stride as usize) {
            let p = rgba.get_pixel(x, y);
            if p[3] == 0 {
                continue;
            }
            pixels.push(Srgb::new(p[0], p[1], p[2]));
        }
    }
    pixels
}

fn grid_len(width: u32, height: u32, stride: u32) -> u64 {
    width.div_ceil(stride) as u64 * height.div_ceil(stride) as u64
}

fn stride_for(width: u32, height: u32, budget: u32) -> u32 {
    let total = width as u64 * height as u64;
    if total <= budget as u64 {
        return 1;
    }
    let mut stride = ((total as f64 / budget as f64).sqrt().ceil() as u32).max(1);
    while grid_len(width, height, stride) > budget as u64 {
        stride += 1;
    }
    stride
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png(img: RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buf);
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn small_image_is_sampled_fully() {
        let img = RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255]));
        let pixels = sample_pixels(&png(img), DEFAULT_SAMPLE_BUDGET).unwrap();
        assert_eq!(pixels.len(), 32);
        assert!(pixels.iter().all(|&p| p == Srgb::new(10, 20, 30)));
    }

    #[test]
    fn large_image_respects_budget() {
        let img = RgbaImage::from_fn(317, 211, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        for budget in [1, 7, 100, 1000, 4096] {
            let pixels = sample_pixels(&png(img.clone()), budget).unwrap();
            assert!(!pixels.is_empty());
            assert!(pixels.len() <= budget as usize, "{} > {budget}", pixels.len());
        }
    }

    #[test]
    fn zero_budget_still_samples_one_pixel() {
        let img = RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 255]));
        let pixels = sample_image(&DynamicImage::ImageRgba8(img), 0);
        assert_eq!(pixels.len(), 1);
    }

    #[test]
    fn transparent_pixels_are_skipped() {
        let img = RgbaImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([200, 0, 0, 255])
            }
        });
        let pixels = sample_image(&DynamicImage::ImageRgba8(img), DEFAULT_SAMPLE_BUDGET);
        assert_eq!(pixels.len(), 50);
        assert!(pixels.iter().all(|&p| p == Srgb::new(200, 0, 0)));
    }

    #[test]
    fn sampling_is_deterministic() {
        let img = RgbaImage::from_fn(300, 300, |x, y| Rgba([(x ^ y) as u8, x as u8, y as u8, 255]));
        let bytes = png(img);
        assert_eq!(
            sample_pixels(&bytes, 500).unwrap(),
            sample_pixels(&bytes, 500).unwrap()
        );
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = sample_pixels(b"definitely not a png", 100).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[test]
    fn stride_grows_until_grid_fits() {
        assert_eq!(stride_for(10, 10, 100), 1);
        assert_eq!(stride_for(100, 100, 4096), 2);
        assert!(grid_len(1000, 3, stride_for(1000, 3, 10)) <= 10);
    }
}
