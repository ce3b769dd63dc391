use crate::core::color::Color;
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

/// Texture coordinate in texel units.
pub type UvCoordinate = Vector2<f32>;

/// Homogeneous point with the depth cached at the last perspective divide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub coords: Vector4<f32>,
    /// The `w` held immediately before the last `dehomogenize`.
    pub pre_transform_z: f32,
    dehomogenized: bool,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self::from_homogeneous(Vector4::new(x, y, z, 1.0))
    }

    pub fn from_homogeneous(coords: Vector4<f32>) -> Self {
        Self {
            coords,
            pre_transform_z: coords.z,
            dehomogenized: false,
        }
    }

    #[inline(always)]
    pub fn x(&self) -> f32 {
        self.coords.x
    }

    #[inline(always)]
    pub fn y(&self) -> f32 {
        self.coords.y
    }

    #[inline(always)]
    pub fn z(&self) -> f32 {
        self.coords.z
    }

    #[inline(always)]
    pub fn w(&self) -> f32 {
        self.coords.w
    }

    /// The xyz part, ignoring w.
    #[inline(always)]
    pub fn xyz(&self) -> Vector3<f32> {
        self.coords.xyz()
    }

    pub fn is_dehomogenized(&self) -> bool {
        self.dehomogenized
    }

    /// Applies a 4x4 transform. The cached pre-divide depth is kept.
    pub fn transform(&self, m: &Matrix4<f32>) -> Self {
        Self {
            coords: m * self.coords,
            pre_transform_z: self.pre_transform_z,
            dehomogenized: false,
        }
    }

    /// Divides x, y, z and w by w, caching w first.
    ///
    /// A second call without an intervening transform leaves the point
    /// (and its cached depth) untouched.
    pub fn dehomogenize(&mut self) {
        if self.dehomogenized {
            return;
        }
        let w = self.coords.w;
        self.pre_transform_z = w;
        self.coords /= w;
        self.dehomogenized = true;
    }
}

impl From<Point3<f32>> for Point {
    fn from(p: Point3<f32>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

/// Vector from `a` to `b`, ignoring w.
#[inline(always)]
pub fn vector_between(a: &Point, b: &Point) -> Vector3<f32> {
    b.xyz() - a.xyz()
}

/// Unnormalised face normal `(b - a) x (c - a)`.
#[inline(always)]
pub fn face_normal(a: &Point, b: &Point, c: &Point) -> Vector3<f32> {
    vector_between(a, b).cross(&vector_between(a, c))
}

/// A point carrying the attributes the pipeline accumulates per vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub point: Point,
    /// Accumulated shading color.
    pub color: Color,
    /// Accumulated normal; unit length once normals are resolved.
    pub normal: Vector3<f32>,
    /// Number of triangles that contributed to `normal`.
    pub normal_count: u32,
    pub uv: UvCoordinate,
    /// Position after the model transform, before view/projection.
    pub world_position: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            point: Point::new(x, y, z),
            color: Color::BLACK,
            normal: Vector3::zeros(),
            normal_count: 0,
            uv: UvCoordinate::zeros(),
            world_position: Vector3::new(x, y, z),
        }
    }

    /// Transforms the position; color, normal, count and uv travel unchanged.
    pub fn transform(&self, m: &Matrix4<f32>) -> Self {
        Self {
            point: self.point.transform(m),
            ..*self
        }
    }
}

/// A triangle referencing the vertex and uv arrays by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    pub vertex_indices: [usize; 3],
    pub uv_indices: [usize; 3],
    pub backfacing: bool,
    /// Average view-space z, refreshed by the depth sort.
    pub avg_depth: f32,
    /// Resolved color for flat fills.
    pub color: Color,
}

impl Polygon {
    pub fn new(vertex_indices: [usize; 3], uv_indices: [usize; 3]) -> Self {
        Self {
            vertex_indices,
            uv_indices,
            backfacing: false,
            avg_depth: 0.0,
            color: Color::BLACK,
        }
    }

    /// Same triangle with the opposite winding.
    pub fn reversed(&self) -> Self {
        let [a, b, c] = self.vertex_indices;
        let [ua, ub, uc] = self.uv_indices;
        Self::new([a, c, b], [ua, uc, ub])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::TransformFactory;

    #[test]
    fn transform_keeps_vertex_payload() {
        let mut v = Vertex::new(1.0, 2.0, 3.0);
        v.color = Color::new(9, 8, 7);
        v.normal = Vector3::new(0.0, 1.0, 0.0);
        v.normal_count = 4;
        v.uv = UvCoordinate::new(5.0, 6.0);

        let moved = v.transform(&TransformFactory::translation(&Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(moved.point.x(), 2.0);
        assert_eq!(moved.color, v.color);
        assert_eq!(moved.normal, v.normal);
        assert_eq!(moved.normal_count, 4);
        assert_eq!(moved.uv, v.uv);
    }

    #[test]
    fn dehomogenize_divides_and_caches_w() {
        let mut p = Point::from_homogeneous(Vector4::new(4.0, 8.0, 2.0, 2.0));
        p.dehomogenize();
        assert_eq!(p.coords, Vector4::new(2.0, 4.0, 1.0, 1.0));
        assert_eq!(p.pre_transform_z, 2.0);
    }

    #[test]
    fn dehomogenize_is_idempotent() {
        let mut p = Point::from_homogeneous(Vector4::new(4.0, 8.0, 2.0, 2.0));
        p.dehomogenize();
        let once = p;
        p.dehomogenize();
        assert_eq!(p, once);
        assert_eq!(p.pre_transform_z, 2.0);
    }

    #[test]
    fn transform_after_dehomogenize_keeps_cached_depth() {
        let mut p = Point::from_homogeneous(Vector4::new(3.0, 3.0, 6.0, 6.0));
        p.dehomogenize();
        let screen = p.transform(&TransformFactory::screen(100, 100));
        assert_eq!(screen.pre_transform_z, 6.0);
        assert!(!screen.is_dehomogenized());
    }

    #[test]
    fn face_normal_follows_right_hand_rule() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);
        assert_eq!(face_normal(&a, &b, &c), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(face_normal(&a, &c, &b), Vector3::new(0.0, 0.0, -1.0));
    }
}
