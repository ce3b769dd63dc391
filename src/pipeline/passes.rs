use crate::core::rasterizer::DrawMode;
use crate::scene::light::{LightCategory, LightSet};
use crate::scene::scene_object::SceneObject;

const ANGLE_STEP: f32 = 0.05;
const SCALE_STEP: f32 = 0.02;
const SCALE_MIN: f32 = 0.75;
const SCALE_MAX: f32 = 1.5;

/// Animation state threaded from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Accumulated rotation in radians.
    pub angle: f32,
    /// Ping-pong scale factor.
    pub scale: f32,
    growing: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            scale: 1.0,
            growing: false,
        }
    }
}

impl FrameState {
    /// Steps the animation by one frame.
    pub fn advance(&mut self) {
        self.angle += ANGLE_STEP;
        if self.growing {
            self.scale += SCALE_STEP;
            if self.scale > SCALE_MAX {
                self.growing = false;
            }
        } else {
            self.scale -= SCALE_STEP;
            if self.scale < SCALE_MIN {
                self.growing = true;
            }
        }
    }

    pub fn advanced_by(frames: u32) -> Self {
        let mut state = Self::default();
        for _ in 0..frames {
            state.advance();
        }
        state
    }
}

/// Which scene lights a display mode switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lighting {
    Unlit,
    Ambient,
    DirectionalAmbient,
    DirectionalPointAmbient,
}

impl Lighting {
    fn categories(self) -> &'static [LightCategory] {
        match self {
            Lighting::Unlit => &[],
            Lighting::Ambient => &[LightCategory::Ambient],
            Lighting::DirectionalAmbient => &[LightCategory::Ambient, LightCategory::Directional],
            Lighting::DirectionalPointAmbient => &[
                LightCategory::Ambient,
                LightCategory::Directional,
                LightCategory::Point,
                LightCategory::Spot,
            ],
        }
    }
}

/// The demo's display modes, each pairing a draw mode with a lighting setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Wireframe,
    FlatUnlit,
    FlatAmbient,
    FlatDirectionalAmbient,
    FlatDirectionalPointAmbient,
    GouraudUnlit,
    GouraudAmbient,
    GouraudDirectionalAmbient,
    GouraudDirectionalPointAmbient,
    TexturedUnlit,
    TexturedAmbient,
    TexturedDirectionalAmbient,
    TexturedNormalMappedDirectionalAmbient,
    TexturedDirectionalPointAmbient,
    TexturedNormalMappedDirectionalPointAmbient,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 15] = [
        DisplayMode::Wireframe,
        DisplayMode::FlatUnlit,
        DisplayMode::FlatAmbient,
        DisplayMode::FlatDirectionalAmbient,
        DisplayMode::FlatDirectionalPointAmbient,
        DisplayMode::GouraudUnlit,
        DisplayMode::GouraudAmbient,
        DisplayMode::GouraudDirectionalAmbient,
        DisplayMode::GouraudDirectionalPointAmbient,
        DisplayMode::TexturedUnlit,
        DisplayMode::TexturedAmbient,
        DisplayMode::TexturedDirectionalAmbient,
        DisplayMode::TexturedNormalMappedDirectionalAmbient,
        DisplayMode::TexturedDirectionalPointAmbient,
        DisplayMode::TexturedNormalMappedDirectionalPointAmbient,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The mode after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Wireframe => "Wireframe",
            DisplayMode::FlatUnlit => "Flat Shaded - Unlit",
            DisplayMode::FlatAmbient => "Flat Shaded - Ambient",
            DisplayMode::FlatDirectionalAmbient => "Flat Shaded - Directional + Ambient",
            DisplayMode::FlatDirectionalPointAmbient => "Flat Shaded - Directional + Point + Ambient",
            DisplayMode::GouraudUnlit => "Gouraud Shaded - Unlit",
            DisplayMode::GouraudAmbient => "Gouraud Shaded - Ambient",
            DisplayMode::GouraudDirectionalAmbient => "Gouraud Shaded - Directional + Ambient",
            DisplayMode::GouraudDirectionalPointAmbient => {
                "Gouraud Shaded - Directional + Point + Ambient"
            }
            DisplayMode::TexturedUnlit => "Textured - Unlit",
            DisplayMode::TexturedAmbient => "Textured - Ambient",
            DisplayMode::TexturedDirectionalAmbient => "Textured - Directional + Ambient",
            DisplayMode::TexturedNormalMappedDirectionalAmbient => {
                "Textured + Normal Mapped - Directional + Ambient"
            }
            DisplayMode::TexturedDirectionalPointAmbient => "Textured - Directional + Point + Ambient",
            DisplayMode::TexturedNormalMappedDirectionalPointAmbient => {
                "Textured + Normal Mapped - Directional + Point + Ambient"
            }
        }
    }

    /// Textured modes all use the normal-mapped path; it falls back to plain
    /// texturing for models whose normal map is switched off.
    pub fn draw_mode(self) -> DrawMode {
        match self {
            DisplayMode::Wireframe => DrawMode::Wireframe,
            DisplayMode::FlatUnlit
            | DisplayMode::FlatAmbient
            | DisplayMode::FlatDirectionalAmbient
            | DisplayMode::FlatDirectionalPointAmbient => DrawMode::Flat,
            DisplayMode::GouraudUnlit
            | DisplayMode::GouraudAmbient
            | DisplayMode::GouraudDirectionalAmbient
            | DisplayMode::GouraudDirectionalPointAmbient => DrawMode::Gouraud,
            _ => DrawMode::TexturedNormalMapped,
        }
    }

    fn lighting(self) -> Lighting {
        match self {
            DisplayMode::Wireframe
            | DisplayMode::FlatUnlit
            | DisplayMode::GouraudUnlit
            | DisplayMode::TexturedUnlit => Lighting::Unlit,
            DisplayMode::FlatAmbient | DisplayMode::GouraudAmbient | DisplayMode::TexturedAmbient => {
                Lighting::Ambient
            }
            DisplayMode::FlatDirectionalAmbient
            | DisplayMode::GouraudDirectionalAmbient
            | DisplayMode::TexturedDirectionalAmbient
            | DisplayMode::TexturedNormalMappedDirectionalAmbient => Lighting::DirectionalAmbient,
            DisplayMode::FlatDirectionalPointAmbient
            | DisplayMode::GouraudDirectionalPointAmbient
            | DisplayMode::TexturedDirectionalPointAmbient
            | DisplayMode::TexturedNormalMappedDirectionalPointAmbient => {
                Lighting::DirectionalPointAmbient
            }
        }
    }

    pub fn normal_mapped(self) -> bool {
        matches!(
            self,
            DisplayMode::TexturedNormalMappedDirectionalAmbient
                | DisplayMode::TexturedNormalMappedDirectionalPointAmbient
        )
    }

    /// Switches lights and normal maps to match this mode.
    pub fn apply(self, lights: &mut LightSet, objects: &mut [SceneObject]) {
        let lighting = self.lighting();
        lights.enable_only(lighting == Lighting::Unlit, lighting.categories());
        for object in objects {
            object.model.normal_map_enabled = self.normal_mapped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::scene::light::{Attenuation, Light};
    use crate::scene::mesh::Mesh;
    use crate::scene::model::Model;
    use nalgebra::Point3;

    fn scene_lights() -> LightSet {
        LightSet::new(vec![
            Light::directional(Point3::new(5.0, 1.5, 0.5), Color::new(255, 0, 0)),
            Light::ambient(Color::gray(100)),
            Light::point(Point3::new(-5.0, 1.5, 0.1), Color::new(0, 0, 255), Attenuation::new(0.0, 0.1, 0.0)),
        ])
    }

    #[test]
    fn frame_state_ping_pongs_scale() {
        let mut frame = FrameState::default();
        let mut min: f32 = 1.0;
        let mut max: f32 = 1.0;
        for _ in 0..200 {
            frame.advance();
            min = min.min(frame.scale);
            max = max.max(frame.scale);
        }
        assert!(min < SCALE_MIN && min > SCALE_MIN - 2.0 * SCALE_STEP);
        assert!(max > SCALE_MAX && max < SCALE_MAX + 2.0 * SCALE_STEP);
        assert!((frame.angle - 200.0 * ANGLE_STEP).abs() < 1e-3);
    }

    #[test]
    fn first_frame_shrinks() {
        let frame = FrameState::advanced_by(1);
        assert!((frame.scale - 0.98).abs() < 1e-6);
        assert!((frame.angle - 0.05).abs() < 1e-6);
    }

    #[test]
    fn modes_cycle_through_all() {
        let mut mode = DisplayMode::Wireframe;
        for expected in DisplayMode::ALL.iter().skip(1) {
            mode = mode.next();
            assert_eq!(mode, *expected);
        }
        assert_eq!(mode.next(), DisplayMode::Wireframe);
        assert_eq!(DisplayMode::from_index(9), Some(DisplayMode::TexturedUnlit));
        assert_eq!(DisplayMode::from_index(15), None);
    }

    #[test]
    fn unlit_mode_enables_only_unlit_light() {
        let mut lights = scene_lights();
        DisplayMode::GouraudUnlit.apply(&mut lights, &mut []);
        assert!(lights.unlit().enabled);
        assert_eq!(lights.enabled_count(), 1);
    }

    #[test]
    fn directional_ambient_mode_leaves_point_off() {
        let mut lights = scene_lights();
        DisplayMode::FlatDirectionalAmbient.apply(&mut lights, &mut []);
        let enabled: Vec<LightCategory> = lights
            .scene_lights()
            .iter()
            .filter(|l| l.enabled)
            .map(|l| l.category())
            .collect();
        assert_eq!(enabled, vec![LightCategory::Directional, LightCategory::Ambient]);
        assert!(!lights.unlit().enabled);
    }

    #[test]
    fn normal_mapped_modes_toggle_models() {
        let mut lights = scene_lights();
        let mut objects = vec![SceneObject::new(Model::new(Mesh::cube()))];

        DisplayMode::TexturedNormalMappedDirectionalAmbient.apply(&mut lights, &mut objects);
        assert!(objects[0].model.normal_map_enabled);
        assert_eq!(
            DisplayMode::TexturedNormalMappedDirectionalAmbient.draw_mode(),
            DrawMode::TexturedNormalMapped
        );

        DisplayMode::TexturedDirectionalAmbient.apply(&mut lights, &mut objects);
        assert!(!objects[0].model.normal_map_enabled);
    }
}
