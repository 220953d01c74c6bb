//! Pixel-exact preview window
//!
//! The terminal preview is limited to half-block cells; this opens a real
//! window showing the 256x256 display copy. Esc or closing the window returns.

use std::error::Error;

use image::RgbaImage;
use minifb::{Key, Window, WindowOptions};

/// Background shown through transparent pixels
const BG_COLOR: u32 = (5 << 16) | (5 << 8) | 15;

/// Block until the user closes the preview window.
pub fn run_preview_window(title: &str, preview: &RgbaImage) -> Result<(), Box<dyn Error>> {
    let width = preview.width() as usize;
    let height = preview.height() as usize;

    let mut window = Window::new(
        &format!("{} - Esc: Close", title),
        width,
        height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X2,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(30);

    let buffer = to_framebuffer(preview);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&buffer, width, height)?;
    }

    Ok(())
}

/// Convert RGBA pixels to minifb's 0RGB words, blending alpha onto the background.
fn to_framebuffer(img: &RgbaImage) -> Vec<u32> {
    let bg = [(BG_COLOR >> 16) & 0xff, (BG_COLOR >> 8) & 0xff, BG_COLOR & 0xff];

    img.pixels()
        .map(|p| {
            let a = p[3] as u32;
            let blend = |c: u8, b: u32| (c as u32 * a + b * (255 - a)) / 255;
            let r = blend(p[0], bg[0]);
            let g = blend(p[1], bg[1]);
            let b = blend(p[2], bg[2]);
            (r << 16) | (g << 8) | b
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_framebuffer_packs_rgb() {
        let img = RgbaImage::from_pixel(2, 1, Rgba([0x12, 0x34, 0x56, 255]));
        assert_eq!(to_framebuffer(&img), vec![0x123456, 0x123456]);
    }

    #[test]
    fn test_transparent_pixels_show_background() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0]));
        assert_eq!(to_framebuffer(&img), vec![BG_COLOR]);
    }
}
