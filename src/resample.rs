//! Nearest-neighbor resizing for pixel-art tiles
//!
//! Smoothing filters blur the hard edges pixel art depends on, so every resize
//! here uses `FilterType::Nearest`.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::asset::PixelSize;

/// Edge length of the on-screen preview copy
pub const DISPLAY_SIZE: u32 = 256;

/// Shrink (or grow) an image to the requested tile size.
pub fn resize_nearest(img: &DynamicImage, size: PixelSize) -> RgbaImage {
    let n = size.pixels();
    imageops::resize(&img.to_rgba8(), n, n, FilterType::Nearest)
}

/// Enlarged copy for display only; the tile itself is left untouched.
pub fn display_copy(tile: &RgbaImage) -> RgbaImage {
    imageops::resize(tile, DISPLAY_SIZE, DISPLAY_SIZE, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 1024x1024 with four solid quadrants
    fn quadrants() -> DynamicImage {
        let img = RgbaImage::from_fn(1024, 1024, |x, y| match (x < 512, y < 512) {
            (true, true) => Rgba([255, 0, 0, 255]),
            (false, true) => Rgba([0, 255, 0, 255]),
            (true, false) => Rgba([0, 0, 255, 255]),
            (false, false) => Rgba([255, 255, 255, 255]),
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_resize_hits_exact_dimensions() {
        let src = quadrants();
        for &size in PixelSize::all() {
            let out = resize_nearest(&src, size);
            assert_eq!(out.dimensions(), (size.pixels(), size.pixels()));
        }
    }

    #[test]
    fn test_resize_is_deterministic() {
        let src = quadrants();
        let a = resize_nearest(&src, PixelSize::Px32);
        let b = resize_nearest(&src, PixelSize::Px32);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_no_blended_colors() {
        let allowed = [
            Rgba([255, 0, 0, 255]),
            Rgba([0, 255, 0, 255]),
            Rgba([0, 0, 255, 255]),
            Rgba([255, 255, 255, 255]),
        ];
        let out = resize_nearest(&quadrants(), PixelSize::Px16);
        for p in out.pixels() {
            assert!(allowed.contains(p), "blended pixel {:?}", p);
        }
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(15, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_display_copy_leaves_tile_alone() {
        let tile = resize_nearest(&quadrants(), PixelSize::Px16);
        let before = tile.clone();
        let preview = display_copy(&tile);
        assert_eq!(preview.dimensions(), (DISPLAY_SIZE, DISPLAY_SIZE));
        assert_eq!(tile, before);
        // each tile pixel becomes a 16x16 block
        assert_eq!(preview.get_pixel(0, 0), tile.get_pixel(0, 0));
        assert_eq!(preview.get_pixel(255, 255), tile.get_pixel(15, 15));
    }
}
