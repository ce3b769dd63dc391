use std::ops::{Add, Mul};

/// Trait for per-pixel attribute bundles that can be linearly interpolated
/// along polygon edges and across scanlines.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-row storage.
/// - Add + Mul<f32>: support linear combination (a * (1 - t) + b * t).
/// - Send + Sync: bundles may be produced on worker threads.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
    /// Blends `self` towards `other` by `t` in [0, 1].
    #[inline(always)]
    fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Weight(Vector3<f32>);

    impl Add for Weight {
        type Output = Self;
        fn add(self, rhs: Self) -> Self {
            Weight(self.0 + rhs.0)
        }
    }

    impl Mul<f32> for Weight {
        type Output = Self;
        fn mul(self, rhs: f32) -> Self {
            Weight(self.0 * rhs)
        }
    }

    impl Interpolatable for Weight {}

    #[test]
    fn default_lerp_blends_linearly() {
        let a = Weight(Vector3::new(0.0, 10.0, 4.0));
        let b = Weight(Vector3::new(10.0, 0.0, 4.0));
        assert_eq!(a.lerp(b, 0.25), Weight(Vector3::new(2.5, 7.5, 4.0)));
    }
}
