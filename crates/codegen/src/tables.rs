//! Pure build phase: mesh object in, complete output tables out.
//!
//! Nothing is written here; polygons reference textures by table index
//! and the serializer resolves those to identifiers later.

use anyhow::{Context, Result, anyhow};
use asset::mesh::MeshObject;
use asset::texture::{self, LumaTexture};

use crate::error::CodegenError;
use crate::fixed::{self, Variant};

/// One emitted vertex: scaled x/y/z plus the constant zero pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexRecord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
}

/// One emitted polygon record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyRecord {
    /// 4 slots of (vertex index, u, v); slot 3 repeats slot 0. The
    /// consumer's fixed-size array wants the first vertex duplicated.
    pub verts: [i32; 12],
    /// Index into [`ObjectTables::textures`], `None` for `NULL`.
    pub tex: Option<usize>,
    /// Color byte in 0..=255.
    pub color: i32,
}

/// A resampled texture plus its identifier base
/// (`objectName + materialName`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureTable {
    pub name: String,
    pub texture: LumaTexture,
}

/// Everything one input file produces, ready for serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectTables {
    pub name: String,
    pub variant: Variant,
    pub vertices: Vec<VertexRecord>,
    pub textures: Vec<TextureTable>,
    pub polys: Vec<PolyRecord>,
}

/// Convert a loaded mesh into output tables. In the textured variant,
/// every material with a bound image gets its texture loaded,
/// resampled and tabled here, whether or not a group references it.
pub fn build_tables(object: &MeshObject, variant: Variant) -> Result<ObjectTables> {
    if object.vertices.len() > i32::MAX as usize {
        return Err(CodegenError::TooManyVertices {
            count: object.vertices.len(),
        }
        .into());
    }

    let vertices = object
        .vertices
        .iter()
        .map(|&[x, y, z]| VertexRecord {
            x: fixed::fixed_coord(variant, x),
            y: fixed::fixed_coord(variant, y),
            z: fixed::fixed_coord(variant, z),
            w: 0,
        })
        .collect();

    let (textures, texture_of_material) = match variant {
        Variant::Textured => build_textures(object)?,
        Variant::Plain => (Vec::new(), Vec::new()),
    };

    let mut polys = Vec::with_capacity(object.face_count());
    for group in &object.groups {
        if let Some(uvs) = &group.uvs {
            if uvs.len() != group.faces.len() {
                return Err(CodegenError::UvMismatch {
                    group: group.name.clone(),
                    got: uvs.len(),
                    expected: group.faces.len(),
                }
                .into());
            }
        }

        let material = match group.material {
            Some(slot) => Some(object.materials.get(slot).ok_or_else(|| {
                anyhow!("Group '{}' references unknown material #{}", group.name, slot)
            })?),
            None => None,
        };

        let tex = match (variant, group.material) {
            (Variant::Textured, Some(slot)) => {
                texture_of_material.get(slot).copied().flatten()
            }
            _ => None,
        };
        if let (Some(idx), None) = (tex, &group.uvs) {
            return Err(CodegenError::MissingUvs {
                group: group.name.clone(),
                texture: textures[idx].name.clone(),
            }
            .into());
        }

        let color = match (variant, material) {
            (Variant::Plain, Some(material)) => fixed::diffuse_byte(material.diffuse),
            _ => fixed::DEFAULT_COLOR,
        };

        for (face_idx, face) in group.faces.iter().enumerate() {
            let uv = |slot: usize| -> [i32; 2] {
                match (variant, &group.uvs) {
                    (Variant::Textured, Some(uvs)) => {
                        let [u, v] = uvs[face_idx][slot];
                        [fixed::quantize_uv(u), fixed::quantize_uv(v)]
                    }
                    _ => [0, 0],
                }
            };

            let mut verts = [0i32; 12];
            for slot in 0..4 {
                let src = if slot == 3 { 0 } else { slot };
                let [u, v] = uv(src);
                verts[slot * 3] = face[src] as i32;
                verts[slot * 3 + 1] = u;
                verts[slot * 3 + 2] = v;
            }
            polys.push(PolyRecord { verts, tex, color });
        }
    }

    Ok(ObjectTables {
        name: object.name.clone(),
        variant,
        vertices,
        textures,
        polys,
    })
}

/// Load and resample one texture per material with a bound image, in
/// material order. The second value maps material slots to texture
/// table indices.
fn build_textures(object: &MeshObject) -> Result<(Vec<TextureTable>, Vec<Option<usize>>)> {
    let mut tables = Vec::new();
    let mut texture_of_material = Vec::with_capacity(object.materials.len());
    for material in &object.materials {
        let entry = match &material.texture {
            Some(path) => {
                let texture = texture::load_luma(path)
                    .with_context(|| format!("Texture of material '{}'", material.name))?;
                tables.push(TextureTable {
                    name: format!("{}{}", object.name, material.name),
                    texture,
                });
                Some(tables.len() - 1)
            }
            None => None,
        };
        texture_of_material.push(entry);
    }
    Ok((tables, texture_of_material))
}
