use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

/// Euler-angle camera with cached view, projection and screen matrices.
///
/// The matrices are rebuilt only when a setter changes an input.
#[derive(Debug, Clone)]
pub struct Camera {
    rotation: Vector3<f32>,
    position: Point3<f32>,
    viewport_width: usize,
    viewport_height: usize,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
    screen_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(
        rotation: Vector3<f32>,
        position: Point3<f32>,
        viewport_width: usize,
        viewport_height: usize,
    ) -> Self {
        let mut cam = Self {
            rotation,
            position,
            viewport_width,
            viewport_height,
            view_matrix: Matrix4::identity(),
            projection_matrix: TransformFactory::perspective(),
            screen_matrix: Matrix4::identity(),
        };
        cam.update_view();
        cam.update_screen();
        cam
    }

    fn update_view(&mut self) {
        self.view_matrix = TransformFactory::view(&self.rotation, &self.position);
    }

    fn update_screen(&mut self) {
        self.screen_matrix = TransformFactory::screen(self.viewport_width, self.viewport_height);
    }

    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        if rotation != self.rotation {
            self.rotation = rotation;
            self.update_view();
        }
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        if position != self.position {
            self.position = position;
            self.update_view();
        }
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        if (width, height) != (self.viewport_width, self.viewport_height) {
            self.viewport_width = width;
            self.viewport_height = height;
            self.update_screen();
        }
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn viewport(&self) -> (usize, usize) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    pub fn screen_matrix(&self) -> Matrix4<f32> {
        self.screen_matrix
    }
}
