use crate::core::geometry::{Polygon, UvCoordinate, Vertex};
use crate::error::{RenderError, Result};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use std::path::Path;

/// Loads an OBJ file and returns a unified Mesh.
///
/// Positions are mirrored into the renderer's left-handed space by negating
/// z, so every triangle's winding is swapped to keep faces pointing outwards.
/// Texture coordinates stay normalised with V flipped to grow downwards;
/// each texture scales them to its own width at lookup.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RenderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        )));
    }

    info!("Loading OBJ file: {}", path.display());

    // Positions and texture coordinates keep separate index streams.
    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &load_options)?;

    let mut vertices = Vec::new();
    let mut uvs = Vec::new();
    let mut polygons = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let vertex_offset = vertices.len();
        let uv_offset = uvs.len();

        for p in mesh.positions.chunks_exact(3) {
            vertices.push(Vertex::new(p[0], p[1], -p[2]));
        }
        for t in mesh.texcoords.chunks_exact(2) {
            uvs.push(UvCoordinate::new(t[0], 1.0 - t[1]));
        }

        let has_texcoords = mesh.texcoord_indices.len() == mesh.indices.len();
        if !has_texcoords {
            warn!(
                "Mesh '{}' has no texture coordinates. Using (0, 0).",
                model.name
            );
        }

        for (i, tri) in mesh.indices.chunks_exact(3).enumerate() {
            let v = [
                vertex_offset + tri[0] as usize,
                vertex_offset + tri[1] as usize,
                vertex_offset + tri[2] as usize,
            ];
            let t = if has_texcoords {
                let ti = &mesh.texcoord_indices[i * 3..i * 3 + 3];
                [
                    uv_offset + ti[0] as usize,
                    uv_offset + ti[1] as usize,
                    uv_offset + ti[2] as usize,
                ]
            } else {
                [usize::MAX; 3]
            };
            polygons.push(Polygon::new(v, t).reversed());
        }
    }

    // Faces without texture coordinates share one fallback entry.
    if polygons.iter().any(|p| p.uv_indices[0] == usize::MAX) {
        let fallback = uvs.len();
        uvs.push(UvCoordinate::zeros());
        for polygon in polygons.iter_mut().filter(|p| p.uv_indices[0] == usize::MAX) {
            polygon.uv_indices = [fallback; 3];
        }
    }

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total triangles: {}",
        vertices.len(),
        polygons.len()
    );

    Mesh::new(vertices, polygons, uvs)
}
