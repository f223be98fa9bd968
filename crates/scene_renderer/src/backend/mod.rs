//! Backend implementations bundled with the renderer
//!
//! Native backends (OpenGL, DirectX) live with the application that owns the
//! window. Only the headless recorder ships here.

pub mod headless;

pub use headless::{
    Command, FaultPoint, HeadlessBackend, HeadlessContext, HeadlessShader, HeadlessShaderProgram, HeadlessTexture,
    HeadlessVertexBuffer, HeadlessWindow, ResourceId, ResourceKind,
};
