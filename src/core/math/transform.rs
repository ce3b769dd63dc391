use nalgebra::{Matrix4, Point3, Vector3};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the 4x4 homogeneous matrices used by the pipeline.
///
/// Matrices follow nalgebra's column-vector convention: `b * a` applies `a`
/// first, then `b`. A sequence "translate, then rotate Z, Y, X" is therefore
/// written right-to-left.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    pub fn zero() -> Matrix4<f32> {
        Matrix4::zeros()
    }

    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Compound rotation: X first, then Y, then Z.
    pub fn rotation(x_rad: f32, y_rad: f32, z_rad: f32) -> Matrix4<f32> {
        Self::rotation_z(z_rad) * Self::rotation_y(y_rad) * Self::rotation_x(x_rad)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Creates the world -> eye matrix for a camera described by Euler angles.
    ///
    /// The world is moved so the camera sits at the origin, then rotated by
    /// the inverse of the camera's Z, Y and X rotations in that order. The eye
    /// looks down +Z with +Y up.
    pub fn view(rotation: &Vector3<f32>, position: &Point3<f32>) -> Matrix4<f32> {
        let translation = Self::translation(&-position.coords);

        Self::rotation_x(-rotation.x)
            * Self::rotation_y(-rotation.y)
            * Self::rotation_z(-rotation.z)
            * translation
    }

    /// The perspective set-up matrix.
    ///
    /// Leaves x, y and z untouched and copies z into w, so the following
    /// dehomogenize divides everything by eye-space depth.
    pub fn perspective() -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        )
    }

    /// Maps projected [-1, 1] coordinates to pixels.
    /// Note: Y-axis is flipped (projected +Y is up, Screen +Y is down).
    pub fn screen(width: usize, height: usize) -> Matrix4<f32> {
        let half_w = (width / 2) as f32;
        let half_h = (height / 2) as f32;

        Matrix4::new(
            half_w, 0.0,     0.0, half_w,
            0.0,    -half_h, 0.0, half_h,
            0.0,    0.0,     1.0, 0.0,
            0.0,    0.0,     0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn approx_eq(a: &Vector4<f32>, b: &Vector4<f32>) -> bool {
        (a - b).amax() < EPS
    }

    #[test]
    fn translate_then_inverse_is_identity() {
        let offset = Vector3::new(3.5, -2.0, 10.25);
        let forward = TransformFactory::translation(&offset);
        let back = TransformFactory::translation(&-offset);
        let p = Vector4::new(1.0, 2.0, 3.0, 1.0);

        assert!(approx_eq(&(back * forward * p), &p));
    }

    #[test]
    fn compound_rotation_applies_x_before_z() {
        // X by 90deg takes +Y to +Z; Z by 90deg leaves +Z alone.
        let m = TransformFactory::rotation(FRAC_PI_2, 0.0, FRAC_PI_2);
        let p = m * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert!(approx_eq(&p, &Vector4::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn rotation_preserves_w() {
        let m = TransformFactory::rotation(0.3, 1.2, -0.7);
        let p = m * Vector4::new(4.0, -1.0, 2.0, 1.0);
        assert!((p.w - 1.0).abs() < EPS);
        assert!((p.xyz().norm() - Vector3::<f32>::new(4.0, -1.0, 2.0).norm()).abs() < 1e-4);
    }

    #[test]
    fn zero_matrix_collapses_points() {
        let p = TransformFactory::zero() * Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(p, Vector4::zeros());
    }

    #[test]
    fn view_moves_camera_to_origin() {
        let position = Point3::new(0.0, 50.0, -100.0);
        let view = TransformFactory::view(&Vector3::new(0.2, -0.4, 0.1), &position);
        let eye = view * position.to_homogeneous();
        assert!(approx_eq(&eye, &Vector4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn view_rotation_is_inverse_of_camera_rotation() {
        // A camera yawed by +90deg about Y sees the world's +X axis straight ahead.
        let view = TransformFactory::view(&Vector3::new(0.0, FRAC_PI_2, 0.0), &Point3::origin());
        let p = view * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx_eq(&p, &Vector4::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn perspective_copies_z_into_w() {
        let p = TransformFactory::perspective() * Vector4::new(2.0, 4.0, 8.0, 1.0);
        assert_eq!(p, Vector4::new(2.0, 4.0, 8.0, 8.0));
    }

    #[test]
    fn screen_maps_unit_square_to_viewport() {
        let m = TransformFactory::screen(640, 480);
        let centre = m * Vector4::new(0.0, 0.0, 0.5, 1.0);
        let top_right = m * Vector4::new(1.0, 1.0, 0.5, 1.0);

        assert!(approx_eq(&centre, &Vector4::new(320.0, 240.0, 0.5, 1.0)));
        assert!(approx_eq(&top_right, &Vector4::new(640.0, 0.0, 0.5, 1.0)));
    }
}
