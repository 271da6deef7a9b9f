//! Domain errors of the table-building phase.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("group '{group}' binds texture '{texture}' but carries no texture coordinates")]
    MissingUvs { group: String, texture: String },

    #[error("group '{group}' carries UVs for {got} faces, expected {expected}")]
    UvMismatch {
        group: String,
        got: usize,
        expected: usize,
    },

    #[error("vertex table cannot address {count} vertices")]
    TooManyVertices { count: usize },
}
