use nalgebra::Vector3;

/// Per-channel reflection coefficients applied to every light category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub reflection: Vector3<f32>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            reflection: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Material {
    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Self {
            reflection: Vector3::new(red, green, blue),
        }
    }
}
