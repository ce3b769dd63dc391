use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{DrawMode, Rasterizer};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::model::Model;
use log::debug;
use nalgebra::Matrix4;

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(width, height),
        }
    }

    /// Clears the buffer and resets the polygon counter.
    pub fn begin_frame(&mut self, background: Color) {
        self.rasterizer.reset_polygons_rendered();
        self.rasterizer.clear(background);
    }

    /// Runs every pipeline stage on `model` in order, then draws it.
    pub fn render_model(
        &mut self,
        model: &mut Model,
        transform: &Matrix4<f32>,
        camera: &Camera,
        lights: &[Light],
        mode: DrawMode,
    ) {
        model.apply_transform_to_local_vertices(transform);
        model.calculate_backfaces(&camera.position());
        model.calculate_vertex_normals();
        model.reset_lighting();

        model.calculate_lighting_ambient(lights);
        model.calculate_lighting_directional(lights);
        model.calculate_lighting_point(lights);
        model.calculate_lighting_spot(lights);
        model.resolve_flat_colors();

        model.apply_transform_to_transformed_vertices(&camera.view_matrix());
        model.depth_sort();

        model.apply_transform_to_transformed_vertices(&camera.projection_matrix());
        model.dehomogenize_transformed_vertices();

        model.apply_transform_to_transformed_vertices(&camera.screen_matrix());

        let before = self.rasterizer.polygons_rendered();
        self.rasterizer.draw_model(model, mode, lights);
        debug!(
            "Drew {} of {} polygons ({})",
            self.rasterizer.polygons_rendered() - before,
            model.polygons().len(),
            mode
        );
    }

    pub fn polygons_rendered(&self) -> usize {
        self.rasterizer.polygons_rendered()
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        self.rasterizer.framebuffer()
    }
}
