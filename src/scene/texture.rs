use crate::core::color::Color;
use crate::error::{RenderError, Result};
use image::imageops::FilterType;
use log::info;
use std::path::Path;

pub const PALETTE_SIZE: usize = 256;

/// Square, palette-indexed texture.
///
/// `indices` holds `width * width` palette offsets in row-major order.
#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    indices: Vec<u8>,
    palette: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, indices: Vec<u8>, palette: Vec<Color>) -> Result<Self> {
        if width == 0 {
            return Err(RenderError::InvalidTexture("width is zero".into()));
        }
        if indices.len() != width * width {
            return Err(RenderError::InvalidTexture(format!(
                "expected {} indices for width {}, got {}",
                width * width,
                width,
                indices.len()
            )));
        }
        if palette.len() != PALETTE_SIZE {
            return Err(RenderError::InvalidTexture(format!(
                "palette must have {} entries, got {}",
                PALETTE_SIZE,
                palette.len()
            )));
        }

        Ok(Self {
            width,
            indices,
            palette,
        })
    }

    /// Loads an image and quantises it to a 3-3-2 palette.
    /// Non-square images are resampled to a square of the larger side.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)?;

        let side = img.width().max(img.height());
        let rgb = if img.width() == img.height() {
            img.to_rgb8()
        } else {
            img.resize_exact(side, side, FilterType::Triangle).to_rgb8()
        };

        let indices = rgb.pixels().map(|p| quantize_332(p[0], p[1], p[2])).collect();

        info!(
            "Loaded texture: {:?} ({}x{}, palettised {}x{})",
            path_ref,
            img.width(),
            img.height(),
            side,
            side
        );

        Self::new(side as usize, indices, palette_332())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Texel index for a texel-unit coordinate. Anything that lands outside
    /// the texture maps to the last texel.
    #[inline(always)]
    pub fn texel_index(&self, u: f32, v: f32) -> usize {
        let w = self.width as i64;
        let index = (v as i64).saturating_mul(w).saturating_add(u as i64);
        if index < 0 || index >= w * w {
            self.indices.len() - 1
        } else {
            index as usize
        }
    }

    #[inline(always)]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        self.color_at(self.texel_index(u, v))
    }

    /// Samples with `u, v` in [0, 1], scaled by this texture's own width.
    #[inline(always)]
    pub fn sample_normalized(&self, u: f32, v: f32) -> Color {
        let w = self.width as f32;
        self.sample(u * w, v * w)
    }

    #[inline(always)]
    pub fn last_texel(&self) -> Color {
        self.color_at(self.indices.len() - 1)
    }

    #[inline(always)]
    fn color_at(&self, texel: usize) -> Color {
        self.palette[self.indices[texel] as usize]
    }
}

/// Packs an RGB color into a 3-3-2 palette offset.
pub fn quantize_332(r: u8, g: u8, b: u8) -> u8 {
    (r & 0xE0) | ((g & 0xE0) >> 3) | (b >> 6)
}

/// The 256-entry palette matching [`quantize_332`], each entry at the middle
/// of its bucket.
pub fn palette_332() -> Vec<Color> {
    (0..PALETTE_SIZE)
        .map(|i| {
            let i = i as u8;
            let r = (i & 0xE0) | 0x10;
            let g = ((i & 0x1C) << 3) | 0x10;
            let b = ((i & 0x03) << 6) | 0x20;
            Color::new(r, g, b)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey_ramp(width: usize) -> Texture {
        let mut palette = vec![Color::BLACK; PALETTE_SIZE];
        for (i, c) in palette.iter_mut().enumerate() {
            *c = Color::gray(i as u8);
        }
        let indices = (0..width * width).map(|i| i as u8).collect();
        Texture::new(width, indices, palette).unwrap()
    }

    #[test]
    fn rejects_mismatched_size() {
        assert!(matches!(
            Texture::new(4, vec![0; 15], palette_332()),
            Err(RenderError::InvalidTexture(_))
        ));
        assert!(Texture::new(0, vec![], palette_332()).is_err());
        assert!(Texture::new(2, vec![0; 4], vec![Color::BLACK; 3]).is_err());
    }

    #[test]
    fn samples_in_texel_units() {
        let t = grey_ramp(4);
        assert_eq!(t.sample(0.0, 0.0), Color::gray(0));
        assert_eq!(t.sample(3.9, 0.0), Color::gray(3));
        assert_eq!(t.sample(1.2, 2.7), Color::gray(9));
    }

    #[test]
    fn normalized_lookup_scales_by_own_width() {
        let wide = grey_ramp(4);
        let narrow = grey_ramp(2);
        // Same coordinate lands on (3, 1) in the wide texture and (1, 0) in the narrow one.
        assert_eq!(wide.sample_normalized(0.75, 0.25), Color::gray(7));
        assert_eq!(narrow.sample_normalized(0.75, 0.25), Color::gray(1));
        assert_eq!(narrow.sample_normalized(0.0, 0.99), Color::gray(2));
    }

    #[test]
    fn out_of_range_clamps_to_last_texel() {
        let t = grey_ramp(4);
        assert_eq!(t.sample(0.0, 4.0), Color::gray(15));
        assert_eq!(t.sample(0.0, 1_000.0), Color::gray(15));
        assert_eq!(t.sample(-1.0, -1.0), Color::gray(15));
        assert_eq!(t.texel_index(f32::INFINITY, 0.0), 15);
    }

    #[test]
    fn quantized_palette_is_close() {
        let palette = palette_332();
        assert_eq!(palette.len(), PALETTE_SIZE);
        let c = palette[quantize_332(200, 100, 50) as usize];
        assert!((c.r as i32 - 200).abs() <= 32);
        assert!((c.g as i32 - 100).abs() <= 32);
        assert!((c.b as i32 - 50).abs() <= 64);
    }
}
