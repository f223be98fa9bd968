//! Backend, window, context and camera collaborators

use super::resources::{Shader, ShaderProgram, Texture, VertexBuffer};
use super::types::BackendFeatures;
use super::BackendResult;
use crate::foundation::math::{Mat4, Vec2};

/// Factory and fixed-function state of a native graphics API
pub trait GraphicsBackend {
    /// Short identifier of the native API (e.g. `"opengl"`, `"dx9"`)
    fn identifier(&self) -> &str;

    /// Allocate an empty shader object
    fn create_shader(&self) -> BackendResult<Box<dyn Shader>>;

    /// Allocate an empty shader program
    fn create_shader_program(&self) -> BackendResult<Box<dyn ShaderProgram>>;

    /// Allocate an empty texture
    fn create_texture(&self) -> BackendResult<Box<dyn Texture>>;

    /// Allocate an empty vertex buffer
    fn create_vertex_buffer(&self) -> BackendResult<Box<dyn VertexBuffer>>;

    /// Turn on the given features
    fn enable_features(&self, features: BackendFeatures);

    /// Turn off the given features
    fn disable_features(&self, features: BackendFeatures);

    /// Set the scissor rectangle, in window pixels from the top-left
    fn set_scissor(&self, origin: Vec2, size: Vec2);
}

/// The window a graphics context presents into
pub trait Window {
    /// Current drawable size in pixels
    fn size(&self) -> Vec2;
}

/// A graphics context: one backend bound to one window
pub trait GraphicsContext {
    /// Make this context current on the calling thread
    fn bind(&self);

    /// The backend serving this context
    fn backend(&self) -> &dyn GraphicsBackend;

    /// The window this context renders into
    fn owner_window(&self) -> &dyn Window;
}

/// A source of view and projection matrices
pub trait Camera {
    /// Recompute the projection for a viewport of the given pixel size
    fn update(&mut self, viewport: Vec2);

    /// Current projection matrix
    fn projection_matrix(&self) -> Mat4;

    /// Current view matrix
    fn view_matrix(&self) -> Mat4;
}
