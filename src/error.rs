//! Error taxonomy for the demo's one-shot startup failures.
//!
//! Lower layers (shader compilation, texture loading, context acquisition)
//! report failures as values and never abort the process themselves; the
//! binary decides that any of them is fatal, logs the diagnostic and exits
//! before the render loop starts. None of these conditions is retried.

use thiserror::Error;

/// Shader stage a compilation diagnostic belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure to bring up the window surface or the GPU context behind it.
///
/// Both variants abort the application before the render loop is entered.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to create a rendering surface: {0}")]
    SurfaceCreation(String),

    #[error("failed to acquire a GPU device: {0}")]
    ContextCreation(String),
}

/// Failure while turning shader source text into an executable pipeline.
///
/// `Compile` carries the stage it occurred in plus the compiler diagnostic;
/// a compile failure means linking was never attempted. `Link` carries the
/// diagnostic from pipeline creation. Partially created GPU objects are
/// dropped on the failure path.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {log}")]
    Link { log: String },
}

/// Failure to load an image file into a GPU texture.
///
/// Always recoverable by the caller: a missing or corrupt asset is an
/// expected operational failure, not a programming error. No GPU texture
/// is allocated on either failure path.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not read image file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode image file {path}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Failure during scene initialization.
///
/// The scene has exactly one renderable object, so every variant is treated
/// as fatal by the caller.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read shader source {path}")]
    ShaderSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}
