//! Graphics abstraction consumed by the renderer
//!
//! This module defines the capability traits a graphics backend must provide
//! (shader, program, texture and vertex buffer objects, feature toggles, the
//! owning window) along with the plain data types that cross that boundary.
//! The renderer never talks to a native API directly; OpenGL, DirectX or a
//! headless recorder all plug in through these traits.

pub mod context;
pub mod resources;
pub mod types;

pub use context::{Camera, GraphicsBackend, GraphicsContext, Window};
pub use resources::{GpuResource, Shader, ShaderProgram, Texture, VertexBuffer};
pub use types::{BackendFeatures, BufferUsageHint, Color, PrimitiveType, ShaderStage, TextureData, Vertex};

/// Errors reported by a graphics backend
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not allocate a GPU object
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    /// A shader stage failed to compile
    #[error("Shader compilation failed: {0}")]
    CompileFailed(String),

    /// A shader program failed to link
    #[error("Program link failed: {0}")]
    LinkFailed(String),

    /// Data could not be uploaded to a GPU object
    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;
