//! Texture resampling for the fixed-function renderer.
//!
//! The consumer only accepts square luminance textures of one fixed
//! size, so every source image is resampled to that grid and collapsed
//! to a single channel here, whatever its original dimensions or color
//! format.

use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, imageops::FilterType};

/// Edge length of the texel grid the renderer consumes.
pub const TEX_SIZE: u32 = 32;
/// Texel count of one texture: 32 * 32.
pub const TEXEL_COUNT: usize = (TEX_SIZE * TEX_SIZE) as usize;

/// A resampled texture: exactly [`TEXEL_COUNT`] luminance bytes,
/// row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaTexture {
    texels: Vec<u8>,
}

impl LumaTexture {
    /// Wrap an already-resampled texel grid.
    pub fn new(texels: Vec<u8>) -> Self {
        assert_eq!(
            texels.len(),
            TEXEL_COUNT,
            "Texture must be exactly {}x{} texels",
            TEX_SIZE,
            TEX_SIZE
        );
        Self { texels }
    }

    pub fn texels(&self) -> &[u8] {
        &self.texels
    }
}

/// Decode an image file and resample it to the renderer's texel grid.
pub fn load_luma(path: impl AsRef<Path>) -> Result<LumaTexture> {
    let path = path.as_ref();
    log::info!("Loading texture from {}", path.display());
    let img = image::open(path)
        .with_context(|| format!("Failed to open texture image: {}", path.display()))?;
    Ok(resample_luma(&img))
}

/// Resample an already-decoded image to [`TEX_SIZE`]² luminance texels.
pub fn resample_luma(img: &DynamicImage) -> LumaTexture {
    LumaTexture::new(
        img.resize_exact(TEX_SIZE, TEX_SIZE, FilterType::Triangle)
            .to_luma8()
            .into_raw(),
    )
}
