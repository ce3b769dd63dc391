use crate::core::geometry::Point;
use crate::scene::mesh::Mesh;
use nalgebra::Point3;

/// Analyzes the mesh's bounding box and transforms all vertices
/// so that the mesh is centered at (0,0,0) and fits within [-0.9, 0.9].
///
/// Returns the original center and the scaling factor used.
pub fn normalize_and_center_mesh(mesh: &mut Mesh) -> (Point3<f32>, f32) {
    // 1. Calculate Bounding Box
    let mut min_bound = Point3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut max_bound = Point3::new(f32::MIN, f32::MIN, f32::MIN);

    for vertex in mesh.vertices() {
        let p = vertex.point.xyz();
        min_bound.x = min_bound.x.min(p.x);
        min_bound.y = min_bound.y.min(p.y);
        min_bound.z = min_bound.z.min(p.z);

        max_bound.x = max_bound.x.max(p.x);
        max_bound.y = max_bound.y.max(p.y);
        max_bound.z = max_bound.z.max(p.z);
    }

    if mesh.vertices().is_empty() {
        return (Point3::origin(), 1.0);
    }

    // 2. Calculate Center and Size
    let center = nalgebra::center(&min_bound, &max_bound);
    let extent = max_bound - min_bound;
    let max_dimension = extent.x.max(extent.y).max(extent.z);

    // Scale to fit in [-1, 1] (size 2.0), with a little padding (1.8)
    let scale_factor = if max_dimension > 1e-6 {
        1.8 / max_dimension
    } else {
        1.0
    };

    // 3. Apply Transform to all vertices
    mesh.map_positions(|vertex| {
        let centered = (vertex.point.xyz() - center.coords) * scale_factor;
        vertex.point = Point::new(centered.x, centered.y, centered.z);
        vertex.world_position = centered;
    });

    (center, scale_factor)
}
