//! End-to-end conversion: load, build tables, render, write.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::emit;
use crate::fixed::Variant;
use crate::tables;

/// Convert one OBJ file into one C table file.
pub fn convert(input: &Path, output: &Path, variant: Variant) -> Result<()> {
    let object = asset::obj::load_object(input)?;
    let tables = tables::build_tables(&object, variant)?;
    let text = emit::render(&tables);
    write_exclusive(output, &text)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!(
        "Wrote {} ({} vertices, {} polygons, {} textures)",
        output.display(),
        tables.vertices.len(),
        tables.polys.len(),
        tables.textures.len()
    );
    Ok(())
}

/// Create `path` exclusively and write `text` to it. An existing file
/// is an error and stays untouched. The text is rendered up front, so
/// the only partial-output window is a failed write, and then the
/// just-created file is removed again.
pub fn write_exclusive(path: &Path, text: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let written = file.write_all(text.as_bytes()).and_then(|()| file.flush());
    if let Err(err) = written {
        drop(file);
        let _ = std::fs::remove_file(path);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TRIANGLE_OBJ: &str = "\
v 1.0 2.0 3.0
v 4.0 5.0 6.0
v 7.0 8.0 9.0
f 1 2 3
";

    #[test]
    fn plain_conversion_writes_the_expected_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("tri.obj");
        let output = dir.path().join("tri.h");
        fs::write(&input, TRIANGLE_OBJ).expect("write obj");

        convert(&input, &output, Variant::Plain).expect("convert");
        let text = fs::read_to_string(&output).expect("read output");
        assert!(text.starts_with("#pragma once\n"));
        assert!(text.contains("100,200,300,0,"));
        assert!(text.contains(
            "{ .tex = NULL, .n_verts = 3, .verts = { 0, 0, 0, 1, 0, 0, 2, 0, 0, 0, 0, 0 }, .color = 255 },"
        ));
        assert!(text.contains(".n_polys = 1,"));
        assert!(text.contains(".n_verts = 3,"));
    }

    #[test]
    fn existing_output_fails_and_stays_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("tri.obj");
        let output = dir.path().join("tri.h");
        fs::write(&input, TRIANGLE_OBJ).expect("write obj");

        convert(&input, &output, Variant::Plain).expect("first run");
        let first = fs::read_to_string(&output).expect("read output");

        convert(&input, &output, Variant::Plain).expect_err("second run must fail");
        assert_eq!(fs::read_to_string(&output).expect("still there"), first);
    }

    #[test]
    fn write_exclusive_rejects_existing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.h");
        fs::write(&path, "keep me").expect("seed file");

        let err = write_exclusive(&path, "new content").expect_err("must fail");
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).expect("unchanged"), "keep me");
    }

    #[test]
    fn missing_input_leaves_no_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("out.h");
        convert(&dir.path().join("missing.obj"), &output, Variant::Plain)
            .expect_err("missing input");
        assert!(!output.exists());
    }

    #[test]
    fn textured_conversion_emits_texture_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("quaddy.obj");
        let output = dir.path().join("quaddy.h");

        image::GrayImage::from_pixel(8, 8, image::Luma([200u8]))
            .save(dir.path().join("skin.png"))
            .expect("write texture");
        fs::write(
            dir.path().join("quaddy.mtl"),
            "newmtl Skin\nKd 1.0 1.0 1.0\nmap_Kd skin.png\n",
        )
        .expect("write mtl");
        fs::write(
            &input,
            "\
mtllib quaddy.mtl
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
usemtl Skin
f 1/1 2/2 3/3
",
        )
        .expect("write obj");

        convert(&input, &output, Variant::Textured).expect("convert");
        let text = fs::read_to_string(&output).expect("read output");
        // Negated fixed-point coordinates.
        assert!(text.contains("-100,0,0,0,"));
        assert!(text.contains("static const int quaddySkintexturedata[1024] = {"));
        assert!(text.contains("static const struct PL_TEX_CONST quaddySkintexture = {"));
        assert!(text.contains(".tex = &quaddySkintexture,"));
        // Quantized UVs: slot 1 maps u=1.0 onto texel 32.
        assert!(text.contains(".verts = { 0, 0, 0, 1, 32, 0, 2, 0, 32, 0, 0, 0 }"));
        assert!(text.contains("static const struct PL_OBJ_CONST quaddy = {"));
    }
}
