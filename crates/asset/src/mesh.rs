//! CPU-side mesh representation produced by the loader.
//!
//! Faces are always triangles; indices refer to the object-wide vertex
//! list, regardless of which group a face came from. Materials live on
//! the object and groups reference them by index. Absent materials,
//! textures and texture coordinates are `None`, never sentinel values.

use std::path::PathBuf;

/// A diffuse material, optionally carrying a texture image path.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// Diffuse color channels in the 0..=1 range.
    pub diffuse: [f32; 3],
    /// Texture image path, already resolved relative to the OBJ directory.
    pub texture: Option<PathBuf>,
}

/// One group of triangles sharing a material binding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGroup {
    pub name: String,
    /// Triangles as index triples into [`MeshObject::vertices`].
    pub faces: Vec<[u32; 3]>,
    /// Per-face-vertex texture coordinates, parallel to `faces`.
    /// `None` when the group carries no `vt` data.
    pub uvs: Option<Vec<[[f32; 2]; 3]>>,
    /// Index into [`MeshObject::materials`].
    pub material: Option<usize>,
}

impl MeshGroup {
    /// Returns `true` when `uvs`, if present, covers every face.
    pub fn uvs_aligned(&self) -> bool {
        self.uvs.as_ref().is_none_or(|uvs| uvs.len() == self.faces.len())
    }
}

/// A whole OBJ file: one shared vertex list, the material library, and
/// the mesh groups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshObject {
    /// Identifier-safe name derived from the input file stem.
    pub name: String,
    pub vertices: Vec<[f32; 3]>,
    pub materials: Vec<Material>,
    pub groups: Vec<MeshGroup>,
}

impl MeshObject {
    /// Total number of triangles across all groups.
    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }

    /// Returns `true` if every face and material index is in range and
    /// every UV list is parallel to its face list.
    pub fn is_valid(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.groups.iter().all(|g| {
            g.uvs_aligned()
                && g.material.is_none_or(|m| m < self.materials.len())
                && g.faces.iter().flatten().all(|&i| i < n)
        })
    }
}
