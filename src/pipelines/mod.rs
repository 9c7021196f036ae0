//! Render pipeline definitions.
//!
//! The demo draws exactly one thing, so there is exactly one pipeline: the
//! textured quad. Shader stages are compiled and linked here, with the
//! compiler/linker diagnostics surfaced as error values instead of panics.

pub mod quad;

pub use quad::QuadPipeline;
