use nalgebra::Vector3;

/// 8-bit per channel RGB color, as stored in vertices, palettes and polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    /// Default clear color.
    pub const STEEL_BLUE: Color = Color::new(70, 130, 180);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Packs into the 0xAARRGGBB layout of the pixel buffer (alpha opaque).
    #[inline(always)]
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline(always)]
    pub fn from_argb(pixel: u32) -> Self {
        Self::new((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
    }

    #[inline(always)]
    pub fn to_vector(self) -> Vector3<f32> {
        Vector3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    /// Clamps each channel to [0, 255] and truncates towards zero.
    /// NaN channels become 0.
    #[inline(always)]
    pub fn from_vector_clamped(v: Vector3<f32>) -> Self {
        // `as u8` saturates and maps NaN to zero.
        Self::new(
            v.x.clamp(0.0, 255.0) as u8,
            v.y.clamp(0.0, 255.0) as u8,
            v.z.clamp(0.0, 255.0) as u8,
        )
    }

    pub fn saturating_add(self, other: Color) -> Self {
        Self::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }

    /// Scales a texel by a per-channel light factor and clamps to [0, 255].
    #[inline(always)]
    pub fn modulate(self, light: Vector3<f32>) -> Self {
        Self::from_vector_clamped(self.to_vector().component_mul(&light))
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}
