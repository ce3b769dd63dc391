use crate::core::color::Color;
use crate::core::framebuffer::{FrameBuffer, PixelLock};
use crate::core::geometry::{Polygon, UvCoordinate, Vertex};
use crate::core::math::interpolation::{perspective_terms, perspective_uv};
use crate::core::pipeline::Interpolatable;
use crate::error::RenderError;
use crate::scene::light::{Light, LightCategory};
use crate::scene::model::Model;
use crate::scene::texture::Texture;
use log::warn;
use nalgebra::Vector3;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// Interpolated lighting of this value leaves a texel unchanged.
const TEXTURE_LIGHT_SCALE: f32 = 180.0;

/// How a model's polygons are turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Wireframe,
    Flat,
    Gouraud,
    Textured,
    TexturedNormalMapped,
}

impl DrawMode {
    pub fn name(self) -> &'static str {
        match self {
            DrawMode::Wireframe => "wireframe",
            DrawMode::Flat => "flat",
            DrawMode::Gouraud => "gouraud",
            DrawMode::Textured => "textured",
            DrawMode::TexturedNormalMapped => "textured_normal_mapped",
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DrawMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wireframe" => Ok(DrawMode::Wireframe),
            "flat" => Ok(DrawMode::Flat),
            "gouraud" | "shaded" => Ok(DrawMode::Gouraud),
            "textured" => Ok(DrawMode::Textured),
            "textured_normal_mapped" | "normal_mapped" => Ok(DrawMode::TexturedNormalMapped),
            other => Err(RenderError::UnknownDrawMode(other.to_string())),
        }
    }
}

/// Attribute bundle carried along polygon edges and across scanlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanlineSample {
    pub x: f32,
    /// Lit vertex color, 0..255 per channel.
    pub color: Vector3<f32>,
    /// `(u/z, v/z, 1/z)` with z the cached pre-divide depth.
    pub uvz: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// World-space position.
    pub position: Vector3<f32>,
}

impl ScanlineSample {
    pub fn from_vertex(vertex: &Vertex, uv: UvCoordinate) -> Self {
        Self {
            x: vertex.point.x(),
            color: vertex.color.to_vector(),
            uvz: perspective_terms(uv, vertex.point.pre_transform_z),
            normal: vertex.normal,
            position: vertex.world_position,
        }
    }
}

impl Add for ScanlineSample {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            color: self.color + rhs.color,
            uvz: self.uvz + rhs.uvz,
            normal: self.normal + rhs.normal,
            position: self.position + rhs.position,
        }
    }
}

impl Mul<f32> for ScanlineSample {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            color: self.color * rhs,
            uvz: self.uvz * rhs,
            normal: self.normal * rhs,
            position: self.position * rhs,
        }
    }
}

impl Interpolatable for ScanlineSample {}

/// Leftmost and rightmost samples recorded on one pixel row.
#[derive(Debug, Clone, Copy)]
pub struct ScanLine {
    pub start: ScanlineSample,
    pub end: ScanlineSample,
}

impl ScanLine {
    fn empty() -> Self {
        let mut start = ScanlineSample::from_vertex(&Vertex::new(0.0, 0.0, 1.0), UvCoordinate::zeros());
        let mut end = start;
        start.x = f32::INFINITY;
        end.x = f32::NEG_INFINITY;
        Self { start, end }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        !(self.start.x <= self.end.x)
    }
}

/// Per-row span table for one polygon. Only rows touched since the last
/// reset are cleared again.
pub struct ScanlineTable {
    rows: Vec<ScanLine>,
    dirty: Option<(usize, usize)>,
}

impl ScanlineTable {
    pub fn new(height: usize) -> Self {
        Self {
            rows: vec![ScanLine::empty(); height],
            dirty: None,
        }
    }

    pub fn reset(&mut self) {
        if let Some((first, last)) = self.dirty.take() {
            let empty = ScanLine::empty();
            self.rows[first..=last].fill(empty);
        }
    }

    pub fn row(&self, y: usize) -> Option<&ScanLine> {
        self.rows.get(y)
    }

    /// Touched rows, in ascending order.
    pub fn spans(&self) -> impl Iterator<Item = (usize, &ScanLine)> {
        let range = match self.dirty {
            Some((first, last)) => first..last + 1,
            None => 0..0,
        };
        range.map(move |y| (y, &self.rows[y])).filter(|(_, line)| !line.is_empty())
    }

    fn record(&mut self, row: usize, sample: ScanlineSample) {
        let line = &mut self.rows[row];
        if sample.x < line.start.x {
            line.start = sample;
        }
        if sample.x > line.end.x {
            line.end = sample;
        }
        self.dirty = Some(match self.dirty {
            Some((first, last)) => (first.min(row), last.max(row)),
            None => (row, row),
        });
    }

    /// Walks the edge between two screen-space points one row at a time and
    /// widens each touched row's span to include the interpolated sample.
    ///
    /// Rows run from the top vertex (inclusive) towards the bottom vertex
    /// (exclusive); the row index is the truncated y.
    pub fn interpolate_scanline(&mut self, a: (f32, ScanlineSample), b: (f32, ScanlineSample)) {
        let ((top_y, top), (bottom_y, bottom)) = if b.0 < a.0 { (b, a) } else { (a, b) };

        // Row stepping runs in f64 so far off-screen tops keep unit steps.
        let top_y = top_y as f64;
        let span = bottom_y as f64 - top_y;
        if !(span > 0.0) || !span.is_finite() {
            return;
        }

        let height = self.rows.len() as f64;
        // Skip straight to the first visible row.
        let first_step = if top_y < 0.0 { (-top_y).floor() } else { 0.0 };

        // Bounded by the row count so huge spans cannot stall.
        for step in 0..=self.rows.len() + 1 {
            let i = first_step + step as f64;
            if i >= span {
                break;
            }
            let y = top_y + i;
            if y >= height {
                break;
            }
            let row = y as i64;
            if row < 0 {
                continue;
            }

            let sample = top.lerp(bottom, (i / span) as f32);
            self.record(row as usize, sample);
        }
    }
}

/// Hands the interpolated sample of every covered, in-bounds pixel in the
/// table to `shade` and writes the returned color.
fn fill_spans<F>(lock: &mut PixelLock<'_>, table: &ScanlineTable, mut shade: F)
where
    F: FnMut(&ScanlineSample) -> Color,
{
    let width = lock.width() as i32;

    for (y, line) in table.spans() {
        let start = line.start;
        let end = line.end;
        let diff = end.x - start.x + 1.0;

        let x_begin = (start.x as i32).max(0);
        let x_end = (end.x as i32).min(width - 1);

        for x in x_begin..=x_end {
            let offset = (x as f32 - start.x).trunc();
            let sample = start.lerp(end, offset / diff);
            let color = shade(&sample);
            lock.write_pixel(x, y as i32, color);
        }
    }
}

/// Decodes a normal-map texel into a vector with components in [-1, 1].
#[inline(always)]
pub fn decode_normal_texel(texel: Color) -> Vector3<f32> {
    (texel.to_vector() / 255.0 - Vector3::repeat(0.5)) * 2.0
}

/// Averaged dot product between a perturbed normal and the directions to
/// every enabled point and directional light. Zero when no light qualifies.
pub fn normal_map_light_dot(normal: &Vector3<f32>, position: &Vector3<f32>, lights: &[Light]) -> f32 {
    let mut sum = 0.0;
    let mut count = 0;

    for light in lights.iter().filter(|l| l.enabled) {
        if !matches!(light.category(), LightCategory::Point | LightCategory::Directional) {
            continue;
        }
        let to_light = (light.position.coords - position).normalize();
        sum += normal.dot(&to_light);
        count += 1;
    }

    if count == 0 { 0.0 } else { sum / count as f32 }
}

/// Scanline rasterizer owning the output buffer.
pub struct Rasterizer {
    framebuffer: FrameBuffer,
    scanlines: ScanlineTable,
    polygons_rendered: usize,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
            scanlines: ScanlineTable::new(height),
            polygons_rendered: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width()
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height()
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn clear(&mut self, color: Color) {
        self.framebuffer.clear(color);
    }

    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        self.framebuffer.draw_line(x0, y0, x1, y1, color);
    }

    pub fn polygons_rendered(&self) -> usize {
        self.polygons_rendered
    }

    pub fn reset_polygons_rendered(&mut self) {
        self.polygons_rendered = 0;
    }

    /// Draws a fully processed model (screen-space working vertices).
    ///
    /// Textured modes fall back to Gouraud when the model has no diffuse
    /// texture. The normal-mapped mode falls back to plain texturing when the
    /// model's normal map is missing or disabled.
    pub fn draw_model(&mut self, model: &Model, mode: DrawMode, lights: &[Light]) {
        match mode {
            DrawMode::Wireframe => self.draw_wireframe(model),
            DrawMode::Flat => self.fill_polygon_flat(model),
            DrawMode::Gouraud => self.fill_polygon_shaded(model),
            DrawMode::Textured => self.fill_polygon_textured(model),
            DrawMode::TexturedNormalMapped => self.fill_polygon_textured_normal_mapped(model, lights),
        }
    }

    /// Outlines every front-facing polygon in white.
    pub fn draw_wireframe(&mut self, model: &Model) {
        let vertices = model.transformed_vertices();

        for polygon in model.polygons().iter().filter(|p| !p.backfacing) {
            let [a, b, c] = polygon.vertex_indices.map(|i| vertices[i].point);
            self.framebuffer.draw_line(a.x(), a.y(), b.x(), b.y(), Color::WHITE);
            self.framebuffer.draw_line(b.x(), b.y(), c.x(), c.y(), Color::WHITE);
            self.framebuffer.draw_line(a.x(), a.y(), c.x(), c.y(), Color::WHITE);
            self.polygons_rendered += 1;
        }
    }

    /// Fills each polygon with its single resolved flat color.
    pub fn fill_polygon_flat(&mut self, model: &Model) {
        self.fill_each(model, |polygon| {
            let color = polygon.color;
            move |_: &ScanlineSample| color
        });
    }

    /// Gouraud fill: per-vertex colors interpolated across the polygon.
    pub fn fill_polygon_shaded(&mut self, model: &Model) {
        self.fill_each(model, |_| |s: &ScanlineSample| Color::from_vector_clamped(s.color));
    }

    /// Perspective-correct textured fill modulated by the interpolated lighting.
    pub fn fill_polygon_textured(&mut self, model: &Model) {
        let Some(texture) = model.texture() else {
            warn!("Textured draw requested for a model without texture, using Gouraud");
            self.fill_polygon_shaded(model);
            return;
        };

        self.fill_each(model, |_| {
            move |s: &ScanlineSample| {
                let texel = sample_texture(texture, s);
                texel.modulate(s.color / TEXTURE_LIGHT_SCALE)
            }
        });
    }

    /// Textured fill whose texels are further darkened by a per-pixel light
    /// term computed from the normal map.
    pub fn fill_polygon_textured_normal_mapped(&mut self, model: &Model, lights: &[Light]) {
        let Some(texture) = model.texture() else {
            warn!("Normal-mapped draw requested for a model without texture, using Gouraud");
            self.fill_polygon_shaded(model);
            return;
        };
        let Some(normal_map) = model.active_normal_map() else {
            self.fill_polygon_textured(model);
            return;
        };

        self.fill_each(model, |_| {
            move |s: &ScanlineSample| {
                let texel = sample_texture(texture, s);
                let bump = decode_normal_texel(sample_texture(normal_map, s));
                let normal = s.normal.component_mul(&bump);
                let light_dot = normal_map_light_dot(&normal, &s.position, lights);

                let lit = texel.to_vector().component_mul(&(s.color / TEXTURE_LIGHT_SCALE));
                Color::from_vector_clamped(lit - lit * light_dot)
            }
        });
    }

    /// Shared driver for the filled modes: visits front-facing polygons in
    /// their sorted order, builds the span table and fills it.
    fn fill_each<S, F>(&mut self, model: &Model, mut make_shader: S)
    where
        S: FnMut(&Polygon) -> F,
        F: FnMut(&ScanlineSample) -> Color,
    {
        let vertices = model.transformed_vertices();
        let uvs = model.uvs();
        let mut lock = self.framebuffer.lock();

        for polygon in model.polygons() {
            if polygon.backfacing {
                continue;
            }

            let corners: [(f32, ScanlineSample); 3] = std::array::from_fn(|k| {
                let vertex = &vertices[polygon.vertex_indices[k]];
                let uv = uvs.get(polygon.uv_indices[k]).copied().unwrap_or(vertex.uv);
                (vertex.point.y(), ScanlineSample::from_vertex(vertex, uv))
            });

            self.scanlines.reset();
            self.scanlines.interpolate_scanline(corners[0], corners[1]);
            self.scanlines.interpolate_scanline(corners[1], corners[2]);
            self.scanlines.interpolate_scanline(corners[2], corners[0]);

            fill_spans(&mut lock, &self.scanlines, make_shader(polygon));
            self.polygons_rendered += 1;
        }
    }
}

/// Recovers the perspective-correct uv of a sample and looks up the texel
/// in `texture`'s own resolution.
#[inline(always)]
fn sample_texture(texture: &Texture, sample: &ScanlineSample) -> Color {
    match perspective_uv(sample.uvz) {
        Some(uv) => texture.sample_normalized(uv.x, uv.y),
        None => texture.last_texel(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point;
    use nalgebra::Vector4;

    fn screen_vertex(x: f32, y: f32, color: Color) -> Vertex {
        let mut v = Vertex::new(0.0, 0.0, 0.0);
        v.point = Point::from_homogeneous(Vector4::new(x, y, 0.5, 1.0));
        v.point.pre_transform_z = 1.0;
        v.color = color;
        v
    }

    fn corner(x: f32, y: f32, color: Color) -> (f32, ScanlineSample) {
        (y, ScanlineSample::from_vertex(&screen_vertex(x, y, color), UvCoordinate::zeros()))
    }

    #[test]
    fn draw_mode_parses_names() {
        assert_eq!("Gouraud".parse::<DrawMode>().unwrap(), DrawMode::Gouraud);
        assert_eq!(
            DrawMode::TexturedNormalMapped.name().parse::<DrawMode>().unwrap(),
            DrawMode::TexturedNormalMapped
        );
        assert!(matches!("phong".parse::<DrawMode>(), Err(RenderError::UnknownDrawMode(_))));
    }

    #[test]
    fn edge_records_start_and_end_per_row() {
        let mut table = ScanlineTable::new(10);
        let a = corner(2.0, 0.0, Color::BLACK);
        let b = corner(2.0, 4.0, Color::BLACK);
        let c = corner(6.0, 4.0, Color::BLACK);

        table.interpolate_scanline(a, b);
        table.interpolate_scanline(b, c);
        table.interpolate_scanline(c, a);

        let row = table.row(2).unwrap();
        assert_eq!(row.start.x, 2.0);
        assert_eq!(row.end.x, 4.0);
        // Bottom vertex row is exclusive.
        assert!(table.row(4).unwrap().is_empty());
        assert_eq!(table.spans().count(), 4);
    }

    #[test]
    fn edge_order_does_not_matter() {
        let mut forward = ScanlineTable::new(10);
        let mut backward = ScanlineTable::new(10);
        let a = corner(1.0, 1.0, Color::new(0, 0, 0));
        let b = corner(7.0, 9.0, Color::new(200, 100, 0));

        forward.interpolate_scanline(a, b);
        backward.interpolate_scanline(b, a);

        for y in 0..10 {
            let f = forward.row(y).unwrap();
            let r = backward.row(y).unwrap();
            assert_eq!(f.is_empty(), r.is_empty());
            if !f.is_empty() {
                assert_eq!(f.start, r.start);
            }
        }
    }

    #[test]
    fn edge_interpolates_color() {
        let mut table = ScanlineTable::new(10);
        table.interpolate_scanline(
            corner(0.0, 0.0, Color::new(0, 0, 0)),
            corner(0.0, 4.0, Color::new(200, 100, 40)),
        );
        let row = table.row(2).unwrap();
        assert!((row.start.color - Vector3::new(100.0, 50.0, 20.0)).norm() < 1e-4);
    }

    #[test]
    fn offscreen_and_degenerate_edges_are_bounded() {
        let mut table = ScanlineTable::new(8);
        table.interpolate_scanline(corner(0.0, -1.0e9, Color::BLACK), corner(4.0, 1.0e9, Color::BLACK));
        table.interpolate_scanline(corner(0.0, f32::NAN, Color::BLACK), corner(4.0, 3.0, Color::BLACK));
        table.interpolate_scanline(corner(0.0, 3.0, Color::BLACK), corner(4.0, 3.0, Color::BLACK));
        assert!(table.spans().count() <= 8);

        table.reset();
        assert_eq!(table.spans().count(), 0);
    }

    #[test]
    fn far_offscreen_top_still_steps_one_row_at_a_time() {
        let mut table = ScanlineTable::new(20);
        table.interpolate_scanline(corner(0.0, -1.0e9, Color::BLACK), corner(0.0, 10.0, Color::BLACK));

        for y in 0..10 {
            assert!(!table.row(y).unwrap().is_empty(), "row {} missing", y);
        }
        assert!(table.row(10).unwrap().is_empty());
        assert_eq!(table.spans().count(), 10);
    }

    #[test]
    fn fill_spans_writes_inclusive_row() {
        let mut table = ScanlineTable::new(4);
        table.interpolate_scanline(corner(1.0, 0.0, Color::WHITE), corner(1.0, 3.0, Color::WHITE));
        table.interpolate_scanline(corner(3.0, 0.0, Color::WHITE), corner(3.0, 3.0, Color::WHITE));

        let mut fb = FrameBuffer::new(4, 4);
        {
            let mut lock = fb.lock();
            fill_spans(&mut lock, &table, |_| Color::WHITE);
        }
        for x in 1..=3 {
            assert_eq!(fb.get_pixel(x, 1), Some(Color::WHITE));
        }
        assert_eq!(fb.get_pixel(0, 1), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(1, 3), Some(Color::BLACK));
    }

    #[test]
    fn normal_texel_decodes_to_signed_range() {
        let n = decode_normal_texel(Color::new(255, 0, 128));
        assert!((n.x - 1.0).abs() < 1e-6);
        assert!((n.y + 1.0).abs() < 1e-6);
        assert!(n.z.abs() < 0.01);
    }

    #[test]
    fn light_dot_is_zero_without_lights() {
        let n = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(normal_map_light_dot(&n, &Vector3::zeros(), &[]), 0.0);
    }
}
