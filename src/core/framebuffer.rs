use crate::core::color::Color;

/// Fixed-size 0xAARRGGBB pixel buffer.
///
/// Direct pixel writes go through a [`PixelLock`] obtained from
/// [`FrameBuffer::lock`]. Whole-buffer primitives (`clear`, `draw_line`)
/// require the buffer to be unlocked. Both rules are enforced with
/// assertions: breaking them is a programming error.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    locked: bool,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.to_argb(); width * height],
            locked: false,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Begins a scoped pixel-write session. The lock is released when the
    /// returned guard drops.
    ///
    /// # Panics
    /// If the buffer is already locked.
    pub fn lock(&mut self) -> PixelLock<'_> {
        assert!(!self.locked, "pixel buffer locked twice");
        self.locked = true;
        PixelLock { buffer: self }
    }

    /// Fills the whole buffer with `color`.
    pub fn clear(&mut self, color: Color) {
        assert!(!self.locked, "clear called while pixel buffer is locked");
        self.pixels.fill(color.to_argb());
    }

    /// Read-only view for presentation. Row-major, `width * height` entries.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from_argb(self.pixels[y * self.width + x]))
    }

    /// Draws a line using Bresenham's algorithm, clipped to the buffer with
    /// Cohen-Sutherland first so off-screen endpoints cost nothing.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        assert!(!self.locked, "draw_line called while pixel buffer is locked");

        let Some((cx0, cy0, cx1, cy1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };

        let argb = color.to_argb();
        let dx = (cx1 - cx0).abs();
        let dy = -((cy1 - cy0).abs());
        let sx = if cx0 < cx1 { 1 } else { -1 };
        let sy = if cy0 < cy1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (cx0, cy0);

        loop {
            self.put(x, y, argb);
            if x == cx1 && y == cy1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    #[inline(always)]
    fn put(&mut self, x: i32, y: i32, argb: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = argb;
        }
    }

    /// Cohen-Sutherland clipping in float space.
    /// Returns the clipped, rounded endpoints or `None` if nothing is visible.
    fn clip_line(
        &self,
        mut x0: f32,
        mut y0: f32,
        mut x1: f32,
        mut y1: f32,
    ) -> Option<(i32, i32, i32, i32)> {
        const INSIDE: u8 = 0;
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const BOTTOM: u8 = 4;
        const TOP: u8 = 8;
        // Converges in at most 4 rounds for finite input.
        const MAX_ITERATIONS: u32 = 8;

        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return None;
        }
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;

        let outcode = |x: f32, y: f32| -> u8 {
            let mut code = INSIDE;
            if x < 0.0 {
                code |= LEFT;
            } else if x > max_x {
                code |= RIGHT;
            }
            if y < 0.0 {
                code |= TOP;
            } else if y > max_y {
                code |= BOTTOM;
            }
            code
        };

        let mut code0 = outcode(x0, y0);
        let mut code1 = outcode(x1, y1);

        for _ in 0..MAX_ITERATIONS {
            if (code0 | code1) == 0 {
                return Some((
                    x0.round() as i32,
                    y0.round() as i32,
                    x1.round() as i32,
                    y1.round() as i32,
                ));
            }
            if (code0 & code1) != 0 {
                return None;
            }

            let code_out = if code0 != 0 { code0 } else { code1 };
            let dx = x1 - x0;
            let dy = y1 - y0;

            let (x, y) = if (code_out & BOTTOM) != 0 {
                (x0 + dx * (max_y - y0) / dy, max_y)
            } else if (code_out & TOP) != 0 {
                (x0 + dx * (0.0 - y0) / dy, 0.0)
            } else if (code_out & RIGHT) != 0 {
                (max_x, y0 + dy * (max_x - x0) / dx)
            } else {
                (0.0, y0 + dy * (0.0 - x0) / dx)
            };

            if code_out == code0 {
                x0 = x;
                y0 = y;
                code0 = outcode(x0, y0);
            } else {
                x1 = x;
                y1 = y;
                code1 = outcode(x1, y1);
            }
        }

        None
    }
}

/// Scoped write access to a [`FrameBuffer`]. Unlocks on drop.
pub struct PixelLock<'a> {
    buffer: &'a mut FrameBuffer,
}

impl PixelLock<'_> {
    #[inline(always)]
    pub fn width(&self) -> usize {
        self.buffer.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.buffer.height
    }

    /// Writes one pixel; coordinates outside the buffer are ignored.
    #[inline(always)]
    pub fn write_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.buffer.put(x, y, color.to_argb());
    }
}

impl Drop for PixelLock<'_> {
    fn drop(&mut self) {
        self.buffer.locked = false;
    }
}
