use crate::core::geometry::{Polygon, UvCoordinate, Vertex};
use crate::error::{RenderError, Result};

/// Immutable source geometry: positions, triangles and texture coordinates.
///
/// Triangles index `vertices` and `uvs` independently, so one position can
/// carry different texture coordinates on different faces.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    polygons: Vec<Polygon>,
    uvs: Vec<UvCoordinate>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, polygons: Vec<Polygon>, uvs: Vec<UvCoordinate>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(RenderError::InvalidMesh("mesh has no vertices".into()));
        }

        for (i, polygon) in polygons.iter().enumerate() {
            if let Some(&bad) = polygon.vertex_indices.iter().find(|&&v| v >= vertices.len()) {
                return Err(RenderError::InvalidMesh(format!(
                    "polygon {} references vertex {} of {}",
                    i,
                    bad,
                    vertices.len()
                )));
            }
            if let Some(&bad) = polygon.uv_indices.iter().find(|&&t| t >= uvs.len()) {
                return Err(RenderError::InvalidMesh(format!(
                    "polygon {} references uv {} of {}",
                    i,
                    bad,
                    uvs.len()
                )));
            }
        }

        Ok(Self {
            vertices,
            polygons,
            uvs,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn uvs(&self) -> &[UvCoordinate] {
        &self.uvs
    }

    /// Applies `f` to every vertex position. Used for normalisation at load time.
    pub fn map_positions<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Vertex),
    {
        self.vertices.iter_mut().for_each(|v| f(v));
    }

    /// Cube spanning [-1, 1] on every axis, two triangles per face, wound so
    /// the `(b - a) x (c - a)` normal points outwards. UVs are normalised.
    pub fn cube() -> Self {
        let corners = [
            (-1.0, -1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, 1.0, 1.0),
            (-1.0, 1.0, 1.0),
        ];
        let vertices = corners.iter().map(|&(x, y, z)| Vertex::new(x, y, z)).collect();

        let uvs = vec![
            UvCoordinate::new(0.0, 0.0),
            UvCoordinate::new(1.0, 0.0),
            UvCoordinate::new(1.0, 1.0),
            UvCoordinate::new(0.0, 1.0),
        ];

        #[rustfmt::skip]
        let triangles: [[usize; 3]; 12] = [
            [0, 2, 1], [0, 3, 2], // -z
            [4, 5, 6], [4, 6, 7], // +z
            [0, 4, 7], [0, 7, 3], // -x
            [1, 2, 6], [1, 6, 5], // +x
            [0, 1, 5], [0, 5, 4], // -y
            [3, 7, 6], [3, 6, 2], // +y
        ];

        let polygons = triangles
            .iter()
            .enumerate()
            .map(|(i, &tri)| {
                let uv = if i % 2 == 0 { [0, 1, 2] } else { [0, 2, 3] };
                Polygon::new(tri, uv)
            })
            .collect();

        Self {
            vertices,
            polygons,
            uvs,
        }
    }

    /// Flat `divisions x divisions` grid on the XZ plane spanning [-1, 1],
    /// facing +Y.
    pub fn plane(divisions: usize) -> Self {
        let n = divisions.max(1);
        let step = 2.0 / n as f32;
        let stride = n + 1;

        let mut vertices = Vec::with_capacity(stride * stride);
        let mut uvs = Vec::with_capacity(stride * stride);
        for j in 0..stride {
            for i in 0..stride {
                vertices.push(Vertex::new(-1.0 + i as f32 * step, 0.0, -1.0 + j as f32 * step));
                uvs.push(UvCoordinate::new(i as f32 / n as f32, j as f32 / n as f32));
            }
        }

        let mut polygons = Vec::with_capacity(n * n * 2);
        for j in 0..n {
            for i in 0..n {
                let a = j * stride + i;
                let b = a + 1;
                let d = a + stride;
                let c = d + 1;
                polygons.push(Polygon::new([a, d, c], [a, d, c]));
                polygons.push(Polygon::new([a, c, b], [a, c, b]));
            }
        }

        Self {
            vertices,
            polygons,
            uvs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::face_normal;

    #[test]
    fn rejects_out_of_range_indices() {
        let vertices = vec![Vertex::new(0.0, 0.0, 0.0); 3];
        let uvs = vec![UvCoordinate::zeros()];

        let bad_vertex = Mesh::new(vertices.clone(), vec![Polygon::new([0, 1, 3], [0, 0, 0])], uvs.clone());
        assert!(matches!(bad_vertex, Err(RenderError::InvalidMesh(_))));

        let bad_uv = Mesh::new(vertices.clone(), vec![Polygon::new([0, 1, 2], [0, 1, 0])], uvs.clone());
        assert!(bad_uv.is_err());

        assert!(Mesh::new(Vec::new(), Vec::new(), uvs.clone()).is_err());
        assert!(Mesh::new(vertices, vec![Polygon::new([0, 1, 2], [0, 0, 0])], uvs).is_ok());
    }

    #[test]
    fn cube_faces_point_outwards() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.polygons().len(), 12);

        for polygon in cube.polygons() {
            let [a, b, c] = polygon.vertex_indices.map(|i| cube.vertices()[i].point);
            let centroid = (a.xyz() + b.xyz() + c.xyz()) / 3.0;
            assert!(face_normal(&a, &b, &c).dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn plane_faces_up() {
        let plane = Mesh::plane(3);
        assert_eq!(plane.vertices().len(), 16);
        assert_eq!(plane.polygons().len(), 18);
        for polygon in plane.polygons() {
            let [a, b, c] = polygon.vertex_indices.map(|i| plane.vertices()[i].point);
            let n = face_normal(&a, &b, &c).normalize();
            assert!((n.y - 1.0).abs() < 1e-6);
        }
    }
}
