use crate::core::color::Color;
use crate::error::Result;
use image::{ImageBuffer, Rgb};
use log::info;
use std::path::Path;

/// Saves an ARGB pixel buffer to an image file; the format follows the
/// extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let idx = (y as usize) * width + (x as usize);
        let color = buffer.get(idx).copied().map(Color::from_argb).unwrap_or(Color::BLACK);
        Rgb([color.r, color.g, color.b])
    });

    img_buf.save(path)?;
    info!("Saved {}x{} image to '{}'", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_with_matching_pixels() {
        let path = std::env::temp_dir().join(format!("save_{}.png", std::process::id()));
        let pixels = vec![
            Color::new(255, 0, 0).to_argb(),
            Color::new(0, 255, 0).to_argb(),
            Color::new(0, 0, 255).to_argb(),
            Color::WHITE.to_argb(),
        ];

        save_buffer_to_image(&pixels, 2, 2, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.get_pixel(1, 0), &Rgb([0, 255, 0]));
        assert_eq!(loaded.get_pixel(0, 1), &Rgb([0, 0, 255]));
    }
}
