use crate::core::math::transform::TransformFactory;
use crate::pipeline::passes::FrameState;
use crate::scene::model::Model;
use nalgebra::{Matrix4, Vector3};

/// Represents an instance of a model in the scene with its own placement
/// and optional per-frame animation.
pub struct SceneObject {
    pub model: Model,
    pub position: Vector3<f32>,
    /// Euler angles in radians.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// Multiplier on the frame's animation angle, applied about Y.
    pub spin: f32,
    /// Multiply the scale by the frame's ping-pong pulse.
    pub pulse: bool,
}

impl SceneObject {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            spin: 0.0,
            pulse: false,
        }
    }

    /// Model matrix for `frame`: scale, then rotate, then translate.
    pub fn transform(&self, frame: &FrameState) -> Matrix4<f32> {
        let spin = self.spin * frame.angle;
        let scale = if self.pulse {
            self.scale * frame.scale
        } else {
            self.scale
        };

        TransformFactory::translation(&self.position)
            * TransformFactory::rotation(self.rotation.x, self.rotation.y + spin, self.rotation.z)
            * TransformFactory::scaling_nonuniform(&scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::Mesh;
    use nalgebra::Vector4;

    #[test]
    fn default_object_is_identity() {
        let object = SceneObject::new(Model::new(Mesh::cube()));
        assert_eq!(object.transform(&FrameState::default()), Matrix4::identity());
    }

    #[test]
    fn scale_applies_before_translation() {
        let mut object = SceneObject::new(Model::new(Mesh::cube()));
        object.position = Vector3::new(0.0, 0.0, 10.0);
        object.scale = Vector3::new(2.0, 2.0, 2.0);

        let p = object.transform(&FrameState::default()) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vector4::new(2.0, 0.0, 10.0, 1.0));
    }

    #[test]
    fn pulse_follows_frame_scale() {
        let mut object = SceneObject::new(Model::new(Mesh::cube()));
        object.pulse = true;
        let mut frame = FrameState::default();
        frame.advance();

        let p = object.transform(&frame) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - frame.scale).abs() < 1e-6);
    }
}
