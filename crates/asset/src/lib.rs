//! Input side of the converter: OBJ/MTL loading normalized into an
//! immutable CPU-side mesh model, plus texture image resampling.

pub mod mesh;
pub mod obj;
pub mod texture;
