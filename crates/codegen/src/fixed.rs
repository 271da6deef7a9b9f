//! Fixed-point quantization rules shared by both emitters.

use asset::texture::TEX_SIZE;

/// World units to renderer integer units.
pub const COORD_SCALE: f32 = 100.0;

/// Polygon color byte used when no diffuse color applies.
pub const DEFAULT_COLOR: i32 = 0xFF;

/// The two output table families. They differ in whether texture data
/// is emitted, in the struct names of the consumer ABI, and in the sign
/// of the vertex coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Plain,
    Textured,
}

/// `coordinate * 100`, truncated toward zero (never rounded).
///
/// The textured tables negate every axis; the consumer's two object
/// families use opposite coordinate conventions, so the asymmetry is
/// deliberate and kept variant-gated here.
pub fn fixed_coord(variant: Variant, coord: f32) -> i32 {
    let scaled = (coord * COORD_SCALE) as i32;
    match variant {
        Variant::Plain => scaled,
        Variant::Textured => -scaled,
    }
}

/// Map a raw UV component in [0, 1] onto the texel grid, truncating.
pub fn quantize_uv(t: f32) -> i32 {
    (t * TEX_SIZE as f32) as i32
}

/// Collapse a diffuse color to the renderer's single color byte:
/// `round(mean * 256)`, clamped so a pure white diffuse does not
/// overflow the byte.
pub fn diffuse_byte(diffuse: [f32; 3]) -> i32 {
    let mean = (diffuse[0] + diffuse[1] + diffuse[2]) / 3.0;
    ((mean * 256.0).round() as i32).clamp(0, 255)
}
