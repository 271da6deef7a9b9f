//! OBJ/MTL loading, delegated to `tobj` and normalized for the emitters.
//!
//! `tobj` hands back one position array per model with model-local
//! indices. The converter emits a single vertex table per file, so every
//! group's indices are rebased onto one concatenated vertex list here.
//! Faces are loaded untriangulated and anything that is not a triangle
//! is rejected rather than silently split.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

use crate::mesh::{Material, MeshGroup, MeshObject};

/// Load a mesh object from an OBJ file path. Material libraries and
/// texture paths are resolved relative to the file's directory.
pub fn load_object(path: impl AsRef<Path>) -> Result<MeshObject> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(path, &load_options())
        .with_context(|| format!("Failed to load OBJ file: {}", path.display()))?;
    let materials = materials
        .with_context(|| format!("Failed to load material library for {}", path.display()))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize_identifier)
        .unwrap_or_else(|| "object".to_owned());
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let object = build_object(name, &base_dir, models, &materials)?;
    log::info!(
        "Loaded '{}': {} vertices, {} groups, {} faces",
        object.name,
        object.vertices.len(),
        object.groups.len(),
        object.face_count()
    );
    Ok(object)
}

/// Parse an OBJ (and optionally its MTL) from string literals.
/// Texture paths are kept as written. Mostly useful in tests.
pub fn load_object_from_str(
    name: &str,
    obj_src: &str,
    mtl_src: Option<&str>,
) -> Result<MeshObject> {
    let (models, materials) =
        tobj::load_obj_buf(&mut Cursor::new(obj_src), &load_options(), |_| match mtl_src {
            Some(src) => tobj::load_mtl_buf(&mut Cursor::new(src)),
            None => Ok((Vec::new(), Default::default())),
        })
        .context("Failed to parse OBJ source")?;
    let materials = materials.context("Failed to parse MTL source")?;
    build_object(sanitize_identifier(name), Path::new(""), models, &materials)
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

fn build_object(
    name: String,
    base_dir: &Path,
    models: Vec<tobj::Model>,
    materials: &[tobj::Material],
) -> Result<MeshObject> {
    let materials: Vec<Material> = materials
        .iter()
        .map(|m| convert_material(base_dir, m))
        .collect();

    let mut vertices: Vec<[f32; 3]> = Vec::new();
    let mut groups = Vec::with_capacity(models.len());

    for model in models {
        let mesh = model.mesh;
        let base = u32::try_from(vertices.len())
            .map_err(|_| anyhow!("Too many vertices (>{})", u32::MAX))?;
        if mesh.positions.len() % 3 != 0 {
            bail!("Group '{}' has a truncated position array", model.name);
        }
        for p in mesh.positions.chunks_exact(3) {
            vertices.push([p[0], p[1], p[2]]);
        }

        let faces = collect_faces(&model.name, &mesh, base)?;
        let uvs = collect_uvs(&model.name, &mesh, faces.len())?;
        if let Some(id) = mesh.material_id {
            if id >= materials.len() {
                bail!("Group '{}' references unknown material #{}", model.name, id);
            }
        }

        groups.push(MeshGroup {
            name: model.name,
            faces,
            uvs,
            material: mesh.material_id,
        });
    }

    if vertices.is_empty() {
        bail!("OBJ contained no geometry");
    }
    Ok(MeshObject {
        name,
        vertices,
        materials,
        groups,
    })
}

/// Split the flat index buffer into triangles, rebased onto the global
/// vertex list. `face_arities` is populated because triangulation is
/// disabled; any arity other than 3 is a hard error.
fn collect_faces(group: &str, mesh: &tobj::Mesh, base: u32) -> Result<Vec<[u32; 3]>> {
    if !mesh.face_arities.is_empty() {
        for (face, &arity) in mesh.face_arities.iter().enumerate() {
            if arity != 3 {
                bail!(
                    "Face {} in group '{}' has {} vertices; only triangles are supported",
                    face,
                    group,
                    arity
                );
            }
        }
    } else if mesh.indices.len() % 3 != 0 {
        bail!("Group '{}' has a non-triangle face", group);
    }

    Ok(mesh
        .indices
        .chunks_exact(3)
        .map(|f| [base + f[0], base + f[1], base + f[2]])
        .collect())
}

/// Resolve per-face-vertex UVs through `texcoord_indices`. Returns
/// `None` when the group carries no texture coordinates at all.
fn collect_uvs(
    group: &str,
    mesh: &tobj::Mesh,
    face_count: usize,
) -> Result<Option<Vec<[[f32; 2]; 3]>>> {
    if mesh.texcoord_indices.is_empty() {
        return Ok(None);
    }
    if mesh.texcoord_indices.len() != face_count * 3 {
        bail!(
            "Group '{}' has texture coordinates for {} face vertices, expected {}",
            group,
            mesh.texcoord_indices.len(),
            face_count * 3
        );
    }

    let lookup = |ti: u32| -> Result<[f32; 2]> {
        let at = 2 * ti as usize;
        match (mesh.texcoords.get(at), mesh.texcoords.get(at + 1)) {
            (Some(&u), Some(&v)) => Ok([u, v]),
            _ => bail!("Group '{}' references texture coordinate #{} out of bounds", group, ti),
        }
    };

    let mut uvs = Vec::with_capacity(face_count);
    for f in mesh.texcoord_indices.chunks_exact(3) {
        uvs.push([lookup(f[0])?, lookup(f[1])?, lookup(f[2])?]);
    }
    Ok(Some(uvs))
}

fn convert_material(base_dir: &Path, material: &tobj::Material) -> Material {
    let texture: Option<PathBuf> = (!material.diffuse_texture.is_empty())
        .then(|| base_dir.join(&material.diffuse_texture));
    Material {
        name: sanitize_identifier(&material.name),
        diffuse: material.diffuse,
        texture,
    }
}

/// Map a name onto a valid C identifier: every character outside
/// `[A-Za-z0-9_]` becomes `_`, and a leading digit gets a `_` prefix.
/// The emitted file must stay compilable no matter how the asset or its
/// materials are named.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
