use crate::core::color::Color;
use crate::scene::camera::Camera;
use crate::scene::light::LightSet;
use crate::scene::scene_object::SceneObject;

/// Holds all scene resources required for rendering.
pub struct RenderContext {
    pub camera: Camera,
    pub lights: LightSet,
    pub objects: Vec<SceneObject>,
    pub background: Color,
}
