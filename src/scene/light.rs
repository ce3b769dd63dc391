use crate::core::color::Color;
use crate::core::math::interpolation::smooth_step;
use nalgebra::{Point3, Vector3};

/// Distance falloff coefficients: `100 / (a + b*d + c*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl Attenuation {
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// All three coefficients zero would divide by zero at every distance.
    pub fn is_degenerate(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0
    }

    /// Returns `None` when the denominator is not positive, in which case the
    /// light contributes nothing.
    pub fn factor(&self, distance: f32) -> Option<f32> {
        let denom = self.a + self.b * distance + self.c * distance * distance;
        if denom > 0.0 && denom.is_finite() {
            Some(100.0 / denom)
        } else {
            None
        }
    }
}

/// Inner and outer cone half-angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotCone {
    pub inner: f32,
    pub outer: f32,
}

impl SpotCone {
    /// Soft cone falloff for an angle off the spot axis.
    ///
    /// Not applied during accumulation; spot lights currently shine at full
    /// strength in every direction.
    pub fn falloff(&self, angle: f32) -> f32 {
        1.0 - smooth_step(self.inner, self.outer, angle)
    }
}

/// Category-specific light payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point { attenuation: Attenuation },
    Spot { attenuation: Attenuation, cone: SpotCone },
}

/// Discriminant of [`LightKind`], used to select lights per lighting stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightCategory {
    Ambient,
    Directional,
    Point,
    Spot,
}

/// A light source: shared record plus category payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub intensity: Color,
    pub enabled: bool,
    pub kind: LightKind,
}

impl Light {
    pub fn ambient(intensity: Color) -> Self {
        Self {
            position: Point3::origin(),
            intensity,
            enabled: true,
            kind: LightKind::Ambient,
        }
    }

    pub fn directional(position: Point3<f32>, intensity: Color) -> Self {
        Self {
            position,
            intensity,
            enabled: true,
            kind: LightKind::Directional,
        }
    }

    pub fn point(position: Point3<f32>, intensity: Color, attenuation: Attenuation) -> Self {
        Self {
            position,
            intensity,
            enabled: true,
            kind: LightKind::Point { attenuation },
        }
    }

    pub fn spot(
        position: Point3<f32>,
        intensity: Color,
        attenuation: Attenuation,
        cone: SpotCone,
    ) -> Self {
        Self {
            position,
            intensity,
            enabled: true,
            kind: LightKind::Spot { attenuation, cone },
        }
    }

    pub fn category(&self) -> LightCategory {
        match self.kind {
            LightKind::Ambient => LightCategory::Ambient,
            LightKind::Directional => LightCategory::Directional,
            LightKind::Point { .. } => LightCategory::Point,
            LightKind::Spot { .. } => LightCategory::Spot,
        }
    }

    /// Unsigned per-channel contribution of this light to a vertex.
    ///
    /// Ambient light is uniform. The other categories use the normalised
    /// vector from the vertex to the light and only illuminate when its dot
    /// product with the vertex normal is negative; the magnitude is scaled by
    /// that dot product and, for point and spot lights, by distance
    /// attenuation. Spot lights ignore their cone.
    pub fn contribution(
        &self,
        reflection: &Vector3<f32>,
        position: &Vector3<f32>,
        normal: &Vector3<f32>,
    ) -> Vector3<f32> {
        let base = self.intensity.to_vector().component_mul(reflection);

        let attenuation = match self.kind {
            LightKind::Ambient => return base,
            LightKind::Directional => None,
            LightKind::Point { attenuation } | LightKind::Spot { attenuation, .. } => {
                Some(attenuation)
            }
        };

        let to_light = self.position.coords - position;
        let distance = to_light.norm();
        let dot = to_light.normalize().dot(normal);
        // NaN (zero normal or light on the vertex) fails this test too.
        if !(dot < 0.0) {
            return Vector3::zeros();
        }

        let mut value = base * dot;
        if let Some(attenuation) = attenuation {
            let Some(factor) = attenuation.factor(distance) else {
                return Vector3::zeros();
            };
            value *= factor;
        }
        value.abs()
    }
}

/// Ordered set of scene lights.
///
/// Index 0 is always the white "unlit" ambient light, enabled only by the
/// display modes that show raw texture or geometry color.
#[derive(Debug, Clone)]
pub struct LightSet {
    lights: Vec<Light>,
}

impl Default for LightSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl LightSet {
    pub const UNLIT_INDEX: usize = 0;

    pub fn new(scene_lights: Vec<Light>) -> Self {
        let mut unlit = Light::ambient(Color::WHITE);
        unlit.enabled = false;

        let mut lights = Vec::with_capacity(scene_lights.len() + 1);
        lights.push(unlit);
        lights.extend(scene_lights);
        Self { lights }
    }

    pub fn all(&self) -> &[Light] {
        &self.lights
    }

    pub fn all_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    pub fn unlit(&self) -> &Light {
        &self.lights[Self::UNLIT_INDEX]
    }

    /// Lights loaded from configuration, without the unlit light.
    pub fn scene_lights(&self) -> &[Light] {
        &self.lights[Self::UNLIT_INDEX + 1..]
    }

    /// Enables the unlit light and the scene lights whose category is listed;
    /// disables everything else.
    pub fn enable_only(&mut self, unlit: bool, categories: &[LightCategory]) {
        for (index, light) in self.lights.iter_mut().enumerate() {
            light.enabled = if index == Self::UNLIT_INDEX {
                unlit
            } else {
                categories.contains(&light.category())
            };
        }
    }

    pub fn enabled_count(&self) -> usize {
        self.lights.iter().filter(|l| l.enabled).count()
    }
}
