use nalgebra::{Vector2, Vector3};

const EPSILON: f32 = 1e-5;

/// Linear interpolation between `a` and `b` by `t` in [0, 1].
#[inline(always)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Packs a texture coordinate into its perspective-correct form.
///
/// Returns `(u/z, v/z, 1/z)` where `z` is the eye-space depth cached before
/// the perspective divide. These three terms are linear in screen space and
/// can be interpolated across a scanline directly.
pub fn perspective_terms(uv: Vector2<f32>, pre_transform_z: f32) -> Vector3<f32> {
    if pre_transform_z.abs() < EPSILON {
        // Degenerate depth, keep the raw coordinate with unit weight.
        return Vector3::new(uv.x, uv.y, 1.0);
    }

    let inv_z = 1.0 / pre_transform_z;
    Vector3::new(uv.x * inv_z, uv.y * inv_z, inv_z)
}

/// Recovers `(u, v)` from interpolated `(u/z, v/z, 1/z)` terms.
///
/// Returns `None` when the `1/z` term is too small to divide by.
pub fn perspective_uv(terms: Vector3<f32>) -> Option<Vector2<f32>> {
    if terms.z.abs() < EPSILON {
        return None;
    }
    Some(Vector2::new(terms.x / terms.z, terms.y / terms.z))
}

/// Hermite smooth step between `edge0` and `edge1`.
///
/// Used for soft spotlight cone falloff.
pub fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
