//! Serialization of [`ObjectTables`] into the consumer's C layout.
//!
//! The emitted struct and field names are an ABI shared with the
//! renderer's static initializers and must not change: `PL_POLY` /
//! `PL_OBJ` for the plain tables, `PL_POLY_CONST` / `PL_TEX_CONST` /
//! `PL_OBJ_CONST` for the textured ones. Declarations appear in
//! dependency order (vertices, textures, polygons, object descriptor)
//! so the fragment never forward-references an identifier.

use std::fmt::{self, Write};

use asset::texture::{TEX_SIZE, TEXEL_COUNT};

use crate::fixed::Variant;
use crate::tables::ObjectTables;

fn poly_struct(variant: Variant) -> &'static str {
    match variant {
        Variant::Plain => "PL_POLY",
        Variant::Textured => "PL_POLY_CONST",
    }
}

fn obj_struct(variant: Variant) -> &'static str {
    match variant {
        Variant::Plain => "PL_OBJ",
        Variant::Textured => "PL_OBJ_CONST",
    }
}

/// Render the complete output file as one string.
pub fn render(tables: &ObjectTables) -> String {
    let mut out = String::new();
    render_into(&mut out, tables).expect("formatting into a String cannot fail");
    out
}

fn render_into(out: &mut impl Write, t: &ObjectTables) -> fmt::Result {
    writeln!(out, "#pragma once")?;

    writeln!(out, "static const int {}_vertices[] = {{", t.name)?;
    for v in &t.vertices {
        writeln!(out, "{},{},{},{},", v.x, v.y, v.z, v.w)?;
    }
    writeln!(out, "}};")?;

    for tex in &t.textures {
        writeln!(out, "static const int {}texturedata[{}] = {{", tex.name, TEXEL_COUNT)?;
        for row in tex.texture.texels().chunks(TEX_SIZE as usize) {
            for texel in row {
                write!(out, "{},", texel)?;
            }
            writeln!(out)?;
        }
        writeln!(out, "}};")?;
        writeln!(out, "static const struct PL_TEX_CONST {}texture = {{", tex.name)?;
        writeln!(out, ".data = {}texturedata,", tex.name)?;
        writeln!(out, "}};")?;
    }

    writeln!(
        out,
        "static const struct {} {}_polys[] = {{",
        poly_struct(t.variant),
        t.name
    )?;
    for poly in &t.polys {
        let tex_ref = match poly.tex {
            Some(idx) => format!("&{}texture", t.textures[idx].name),
            None => "NULL".to_owned(),
        };
        let verts = poly
            .verts
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{{ .tex = {}, .n_verts = 3, .verts = {{ {} }}, .color = {} }},",
            tex_ref, verts, poly.color
        )?;
    }
    writeln!(out, "}};")?;

    writeln!(out, "static const struct {} {} = {{", obj_struct(t.variant), t.name)?;
    writeln!(out, ".verts = {}_vertices,", t.name)?;
    writeln!(out, ".n_polys = {},", t.polys.len())?;
    writeln!(out, ".n_verts = {},", t.vertices.len())?;
    writeln!(out, ".polys = {}_polys,", t.name)?;
    writeln!(out, "}};")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{PolyRecord, TextureTable, VertexRecord};
    use asset::texture::LumaTexture;

    fn triangle_tables(variant: Variant) -> ObjectTables {
        ObjectTables {
            name: "tri".into(),
            variant,
            vertices: vec![
                VertexRecord { x: 100, y: 200, z: 300, w: 0 },
                VertexRecord { x: 400, y: 500, z: 600, w: 0 },
                VertexRecord { x: 700, y: 800, z: 900, w: 0 },
            ],
            textures: Vec::new(),
            polys: vec![PolyRecord {
                verts: [0, 0, 0, 1, 0, 0, 2, 0, 0, 0, 0, 0],
                tex: None,
                color: 255,
            }],
        }
    }

    #[test]
    fn plain_triangle_renders_exactly() {
        let expected = "\
#pragma once
static const int tri_vertices[] = {
100,200,300,0,
400,500,600,0,
700,800,900,0,
};
static const struct PL_POLY tri_polys[] = {
{ .tex = NULL, .n_verts = 3, .verts = { 0, 0, 0, 1, 0, 0, 2, 0, 0, 0, 0, 0 }, .color = 255 },
};
static const struct PL_OBJ tri = {
.verts = tri_vertices,
.n_polys = 1,
.n_verts = 3,
.polys = tri_polys,
};
";
        assert_eq!(render(&triangle_tables(Variant::Plain)), expected);
    }

    #[test]
    fn textured_tables_use_const_structs_and_reference_textures() {
        let mut tables = triangle_tables(Variant::Textured);
        tables.textures.push(TextureTable {
            name: "triSkin".into(),
            texture: LumaTexture::new(vec![9; 1024]),
        });
        tables.polys[0].tex = Some(0);

        let text = render(&tables);
        assert!(text.contains("static const int triSkintexturedata[1024] = {"));
        assert!(text.contains("static const struct PL_TEX_CONST triSkintexture = {"));
        assert!(text.contains(".data = triSkintexturedata,"));
        assert!(text.contains("static const struct PL_POLY_CONST tri_polys[] = {"));
        assert!(text.contains(".tex = &triSkintexture,"));
        assert!(text.contains("static const struct PL_OBJ_CONST tri = {"));
    }

    #[test]
    fn declarations_appear_in_dependency_order() {
        let mut tables = triangle_tables(Variant::Textured);
        tables.textures.push(TextureTable {
            name: "triSkin".into(),
            texture: LumaTexture::new(vec![0; 1024]),
        });
        let text = render(&tables);
        let verts = text.find("tri_vertices").expect("vertex table");
        let tex = text.find("triSkintexturedata").expect("texture table");
        let polys = text.find("tri_polys").expect("polygon table");
        let object = text.find("struct PL_OBJ_CONST tri =").expect("descriptor");
        assert!(verts < tex && tex < polys && polys < object);
    }
}
