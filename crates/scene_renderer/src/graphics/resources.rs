//! GPU resource objects handed out by a backend
//!
//! Binding and drawing take `&self`: they only mutate state on the GPU side,
//! which lets externally owned buffers and textures be shared into the
//! renderer's per-frame queues by plain reference. Operations that reshape
//! the object itself (setting source, linking, uploading) take `&mut self`.

use super::types::{BufferUsageHint, PrimitiveType, ShaderStage, TextureData, Vertex};
use super::BackendResult;
use crate::foundation::math::Mat4;

/// Common lifecycle of every backend object
pub trait GpuResource {
    /// Release the native object
    ///
    /// Implementations must tolerate repeated calls.
    fn destroy(&mut self);
}

/// A single shader stage
pub trait Shader: GpuResource {
    /// Replace the stage's source code
    fn set_source(&mut self, source: &str, stage: ShaderStage);

    /// Compile the current source
    fn compile(&mut self) -> BackendResult<()>;
}

/// A linked vertex + fragment program
pub trait ShaderProgram: GpuResource {
    /// Attach a compiled stage; the program takes ownership of it
    fn add_shader(&mut self, shader: Box<dyn Shader>);

    /// Link all attached stages
    fn link(&mut self) -> BackendResult<()>;

    /// Make this the active program
    fn bind(&self);

    /// Deactivate this program
    fn unbind(&self);

    /// Set an integer uniform (sampler units, flags)
    fn set_uniform_i32(&self, name: &str, value: i32);

    /// Set a 4x4 matrix uniform
    fn set_uniform_mat4(&self, name: &str, value: &Mat4);
}

/// A sampled 2D texture
pub trait Texture: GpuResource {
    /// Allocate storage and upload the given pixels
    fn create(&mut self, data: &TextureData) -> BackendResult<()>;

    /// Bind to the given texture unit
    fn bind(&self, unit: u32);

    /// Unbind from whichever unit it was bound to
    fn unbind(&self);
}

/// A drawable vertex buffer
pub trait VertexBuffer: GpuResource {
    /// Replace the buffer contents
    fn upload(&mut self, vertices: &[Vertex], primitive: PrimitiveType, usage: BufferUsageHint) -> BackendResult<()>;

    /// Bind for drawing
    fn bind(&self);

    /// Draw the uploaded vertices with the uploaded topology
    fn draw(&self);

    /// Unbind after drawing
    fn unbind(&self);
}
