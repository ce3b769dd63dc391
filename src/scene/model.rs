use crate::core::color::Color;
use crate::core::geometry::{Polygon, UvCoordinate, Vertex, face_normal};
use crate::scene::light::{Light, LightCategory};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::{Matrix4, Point3, Vector3};
use rayon::prelude::*;
use std::sync::Arc;

/// A renderable mesh instance.
///
/// Holds the shared immutable source mesh plus a per-frame working copy of
/// its vertices that the pipeline stages rewrite in place. Stages must run in
/// this order every frame:
///
/// 1. [`apply_transform_to_local_vertices`](Self::apply_transform_to_local_vertices) (model matrix)
/// 2. [`calculate_backfaces`](Self::calculate_backfaces)
/// 3. [`calculate_vertex_normals`](Self::calculate_vertex_normals)
/// 4. [`reset_lighting`](Self::reset_lighting), then the lighting stages
/// 5. [`apply_transform_to_transformed_vertices`](Self::apply_transform_to_transformed_vertices) (view), [`depth_sort`](Self::depth_sort)
/// 6. projection, [`dehomogenize_transformed_vertices`](Self::dehomogenize_transformed_vertices)
/// 7. screen
pub struct Model {
    mesh: Arc<Mesh>,
    polygons: Vec<Polygon>,
    transformed: Vec<Vertex>,
    pub material: Material,
    texture: Option<Arc<Texture>>,
    normal_map: Option<Arc<Texture>>,
    pub normal_map_enabled: bool,
}

impl Model {
    pub fn new(mesh: Mesh) -> Self {
        Self::from_shared(Arc::new(mesh))
    }

    pub fn from_shared(mesh: Arc<Mesh>) -> Self {
        Self {
            polygons: mesh.polygons().to_vec(),
            transformed: mesh.vertices().to_vec(),
            mesh,
            material: Material::default(),
            texture: None,
            normal_map: None,
            normal_map_enabled: false,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_normal_map(mut self, normal_map: Arc<Texture>) -> Self {
        self.normal_map = Some(normal_map);
        self.normal_map_enabled = true;
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Polygons in their current (depth-sorted) order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn transformed_vertices(&self) -> &[Vertex] {
        &self.transformed
    }

    pub fn uvs(&self) -> &[UvCoordinate] {
        self.mesh.uvs()
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_deref()
    }

    pub fn normal_map(&self) -> Option<&Texture> {
        self.normal_map.as_deref()
    }

    /// The normal map, if present and enabled.
    pub fn active_normal_map(&self) -> Option<&Texture> {
        if self.normal_map_enabled { self.normal_map() } else { None }
    }

    /// Rebuilds the working vertices as `m * v` for every source vertex and
    /// records the resulting world-space positions.
    pub fn apply_transform_to_local_vertices(&mut self, m: &Matrix4<f32>) {
        self.transformed.clear();
        self.mesh
            .vertices()
            .par_iter()
            .map(|v| {
                let mut t = v.transform(m);
                t.world_position = t.point.xyz();
                t
            })
            .collect_into_vec(&mut self.transformed);
    }

    /// Flags polygons whose face normal points away from the camera.
    /// Working vertices must be in the space `camera_position` is given in.
    pub fn calculate_backfaces(&mut self, camera_position: &Point3<f32>) {
        let vertices = &self.transformed;
        for polygon in &mut self.polygons {
            let [a, b, c] = polygon.vertex_indices.map(|i| &vertices[i].point);
            let normal = face_normal(a, b, c);
            let eye = camera_position.coords - a.xyz();
            polygon.backfacing = eye.dot(&normal) < 0.0;
        }
    }

    /// Averages face normals into every vertex, then normalises and negates.
    /// Vertices referenced by no polygon get a zero normal.
    pub fn calculate_vertex_normals(&mut self) {
        for v in &mut self.transformed {
            v.normal = Vector3::zeros();
            v.normal_count = 0;
        }

        for polygon in &self.polygons {
            let [a, b, c] = polygon.vertex_indices.map(|i| self.transformed[i].point);
            let normal = face_normal(&a, &b, &c);
            for &i in &polygon.vertex_indices {
                let v = &mut self.transformed[i];
                v.normal += normal;
                v.normal_count += 1;
            }
        }

        self.transformed.par_iter_mut().for_each(|v| {
            v.normal = if v.normal_count == 0 {
                Vector3::zeros()
            } else {
                -(v.normal / v.normal_count as f32).normalize()
            };
        });
    }

    /// Seeds every polygon's flat color with black.
    pub fn reset_lighting(&mut self) {
        for polygon in &mut self.polygons {
            polygon.color = Color::BLACK;
        }
    }

    /// Adds the contribution of every enabled light of `category` onto each
    /// vertex's existing color, clamping to [0, 255] once per vertex.
    pub fn calculate_lighting(&mut self, category: LightCategory, lights: &[Light]) {
        let active: Vec<&Light> = lights
            .iter()
            .filter(|l| l.enabled && l.category() == category)
            .collect();
        if active.is_empty() {
            return;
        }

        let reflection = self.material.reflection;
        self.transformed.par_iter_mut().for_each(|v| {
            let mut total = v.color.to_vector();
            for light in &active {
                total += light.contribution(&reflection, &v.point.xyz(), &v.normal);
            }
            v.color = Color::from_vector_clamped(total);
        });
    }

    pub fn calculate_lighting_ambient(&mut self, lights: &[Light]) {
        self.calculate_lighting(LightCategory::Ambient, lights);
    }

    pub fn calculate_lighting_directional(&mut self, lights: &[Light]) {
        self.calculate_lighting(LightCategory::Directional, lights);
    }

    pub fn calculate_lighting_point(&mut self, lights: &[Light]) {
        self.calculate_lighting(LightCategory::Point, lights);
    }

    pub fn calculate_lighting_spot(&mut self, lights: &[Light]) {
        self.calculate_lighting(LightCategory::Spot, lights);
    }

    /// Adds each polygon's first lit vertex color onto its flat color seed.
    pub fn resolve_flat_colors(&mut self) {
        for polygon in &mut self.polygons {
            let first = self.transformed[polygon.vertex_indices[0]].color;
            polygon.color = polygon.color.saturating_add(first);
        }
    }

    pub fn apply_transform_to_transformed_vertices(&mut self, m: &Matrix4<f32>) {
        self.transformed.par_iter_mut().for_each(|v| {
            v.point = v.point.transform(m);
        });
    }

    /// Sorts polygons far-to-near by the average z of their working vertices.
    /// The sort is stable, so equal depths keep their previous order.
    pub fn depth_sort(&mut self) {
        let vertices = &self.transformed;
        for polygon in &mut self.polygons {
            let sum: f32 = polygon.vertex_indices.iter().map(|&i| vertices[i].point.z()).sum();
            polygon.avg_depth = sum / 3.0;
        }
        self.polygons.sort_by(|a, b| b.avg_depth.total_cmp(&a.avg_depth));
    }

    pub fn dehomogenize_transformed_vertices(&mut self) {
        self.transformed.par_iter_mut().for_each(|v| v.point.dehomogenize());
    }
}
