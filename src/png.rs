//! PNG encoding and download naming

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::asset::{AssetCategory, PixelSize};
use crate::error::{AssetError, Result};

/// MIME type of saved assets
pub const PNG_MIME: &str = "image/png";

/// Encode a tile as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AssetError::EncodeFailure(e.to_string()))?;
    Ok(out.into_inner())
}

/// `rpg_asset_{category}_{n}x{n}.png`
pub fn download_filename(category: AssetCategory, size: PixelSize) -> String {
    format!("rpg_asset_{}_{}.png", category.slug(), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_round_trip_is_lossless() {
        let img = RgbaImage::from_fn(32, 32, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 77, 255]));
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), img.dimensions());
        assert_eq!(decoded.as_raw(), img.as_raw());
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(
            download_filename(AssetCategory::Castle, PixelSize::Px32),
            "rpg_asset_castle_32x32.png"
        );
        assert_eq!(
            download_filename(AssetCategory::TallMountain, PixelSize::Px64),
            "rpg_asset_tall-mountain_64x64.png"
        );
    }
}
