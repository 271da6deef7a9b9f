//! Output side of the converter: fixed-point quantization, in-memory
//! table building and C source emission.
//!
//! Tables are built completely before anything is serialized, so every
//! identifier the emitted text references is known up front and the
//! declaration order (vertices, textures, polygons, object descriptor)
//! never produces a forward reference.

pub mod emit;
pub mod error;
pub mod fixed;
pub mod pipeline;
pub mod tables;

pub use fixed::Variant;
