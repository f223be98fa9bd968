//! Headless recording backend
//!
//! Implements every graphics capability without a GPU. Each call is appended
//! to a command log, live objects are tracked in a slot map, and any fallible
//! operation can be made to fail on its n-th call. Used by the test suite and
//! by tools that want to inspect what a frame would submit.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Mat4, Vec2};
use crate::graphics::{
    BackendError, BackendFeatures, BackendResult, BufferUsageHint, GpuResource, GraphicsBackend, GraphicsContext,
    PrimitiveType, Shader, ShaderProgram, ShaderStage, Texture, TextureData, Vertex, VertexBuffer, Window,
};

new_key_type! {
    /// Identifies one object created by a [`HeadlessBackend`]
    pub struct ResourceId;
}

/// Kind of object behind a [`ResourceId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Shader stage
    Shader,
    /// Shader program
    ShaderProgram,
    /// Texture
    Texture,
    /// Vertex buffer
    VertexBuffer,
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// `create_shader`
    ShaderCreation,
    /// `Shader::compile`
    ShaderCompile,
    /// `create_shader_program`
    ProgramCreation,
    /// `ShaderProgram::link`
    ProgramLink,
    /// `create_texture`
    TextureCreation,
    /// `Texture::create`
    TextureUpload,
    /// `create_vertex_buffer`
    BufferCreation,
    /// `VertexBuffer::upload`
    BufferUpload,
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The context was made current
    BindContext,
    /// An object was allocated
    Create {
        /// New object
        id: ResourceId,
        /// Its kind
        kind: ResourceKind,
    },
    /// An object was released
    Destroy {
        /// Released object
        id: ResourceId,
        /// Its kind
        kind: ResourceKind,
    },
    /// Source was assigned to a shader
    SetShaderSource {
        /// Shader
        shader: ResourceId,
        /// Stage it will compile for
        stage: ShaderStage,
    },
    /// A shader was compiled
    CompileShader(ResourceId),
    /// A shader was attached to a program
    AttachShader {
        /// Program
        program: ResourceId,
        /// Number of stages attached after this call
        attached: usize,
    },
    /// A program was linked
    LinkProgram(ResourceId),
    /// A program was bound
    BindProgram(ResourceId),
    /// A program was unbound
    UnbindProgram(ResourceId),
    /// An integer uniform was set
    SetUniformI32 {
        /// Program
        program: ResourceId,
        /// Uniform name
        name: String,
        /// Value
        value: i32,
    },
    /// A matrix uniform was set
    SetUniformMat4 {
        /// Program
        program: ResourceId,
        /// Uniform name
        name: String,
        /// Value
        value: Mat4,
    },
    /// Pixels were uploaded to a texture
    CreateTexture {
        /// Texture
        texture: ResourceId,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// A texture was bound
    BindTexture {
        /// Texture
        texture: ResourceId,
        /// Texture unit
        unit: u32,
    },
    /// A texture was unbound
    UnbindTexture(ResourceId),
    /// Vertices were uploaded to a buffer
    UploadVertices {
        /// Buffer
        buffer: ResourceId,
        /// Number of vertices
        vertex_count: usize,
        /// Size of the upload in bytes
        bytes: usize,
        /// Topology
        primitive: PrimitiveType,
        /// Usage hint
        usage: BufferUsageHint,
    },
    /// A buffer was bound
    BindBuffer(ResourceId),
    /// A buffer was drawn
    Draw {
        /// Buffer
        buffer: ResourceId,
        /// Number of vertices drawn
        vertex_count: usize,
    },
    /// A buffer was unbound
    UnbindBuffer(ResourceId),
    /// Features were turned on
    EnableFeatures(BackendFeatures),
    /// Features were turned off
    DisableFeatures(BackendFeatures),
    /// The scissor rectangle was set
    SetScissor {
        /// Top-left corner
        origin: Vec2,
        /// Size
        size: Vec2,
    },
}

#[derive(Default)]
struct HeadlessState {
    resources: SlotMap<ResourceId, ResourceKind>,
    commands: Vec<Command>,
    faults: HashMap<FaultPoint, usize>,
    calls: HashMap<FaultPoint, usize>,
}

impl HeadlessState {
    fn allocate(&mut self, kind: ResourceKind) -> ResourceId {
        let id = self.resources.insert(kind);
        self.commands.push(Command::Create { id, kind });
        id
    }

    fn release(&mut self, id: ResourceId) {
        if let Some(kind) = self.resources.remove(id) {
            self.commands.push(Command::Destroy { id, kind });
        }
    }

    /// Count a call to `point` and report whether it was scheduled to fail
    fn should_fail(&mut self, point: FaultPoint) -> bool {
        let call = self.calls.entry(point).or_insert(0);
        let index = *call;
        *call += 1;
        self.faults.get(&point) == Some(&index)
    }
}

type SharedState = Rc<RefCell<HeadlessState>>;

fn record(state: &SharedState, command: Command) {
    state.borrow_mut().commands.push(command);
}

/// A graphics backend that records instead of rendering
///
/// Clones share the same log and resource table.
#[derive(Clone)]
pub struct HeadlessBackend {
    identifier: String,
    state: SharedState,
}

impl HeadlessBackend {
    /// Create a backend reporting `identifier` (e.g. `"opengl"`)
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            state: SharedState::default(),
        }
    }

    /// Make the `nth` call (0-based) to `point` fail
    #[must_use]
    pub fn with_fault(self, point: FaultPoint, nth: usize) -> Self {
        self.inject_fault(point, nth);
        self
    }

    /// Make the `nth` call (0-based, counted from the start) to `point` fail
    pub fn inject_fault(&self, point: FaultPoint, nth: usize) {
        self.state.borrow_mut().faults.insert(point, nth);
    }

    /// Allocate a vertex buffer with its concrete type, for callers that
    /// need its [`ResourceId`]
    pub fn create_headless_buffer(&self) -> BackendResult<HeadlessVertexBuffer> {
        let mut state = self.state.borrow_mut();
        if state.should_fail(FaultPoint::BufferCreation) {
            return Err(BackendError::AllocationFailed("vertex buffer".to_string()));
        }
        let id = state.allocate(ResourceKind::VertexBuffer);
        drop(state);

        Ok(HeadlessVertexBuffer {
            id,
            state: self.state.clone(),
            vertex_count: 0,
        })
    }

    /// Allocate a texture with its concrete type, for callers that need its
    /// [`ResourceId`]
    pub fn create_headless_texture(&self) -> BackendResult<HeadlessTexture> {
        let mut state = self.state.borrow_mut();
        if state.should_fail(FaultPoint::TextureCreation) {
            return Err(BackendError::AllocationFailed("texture".to_string()));
        }
        let id = state.allocate(ResourceKind::Texture);
        drop(state);

        Ok(HeadlessTexture {
            id,
            state: self.state.clone(),
        })
    }

    /// Every call recorded so far
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    /// Drain the command log
    pub fn take_commands(&self) -> Vec<Command> {
        std::mem::take(&mut self.state.borrow_mut().commands)
    }

    /// Number of objects created and not yet destroyed
    #[must_use]
    pub fn live_resources(&self) -> usize {
        self.state.borrow().resources.len()
    }

    /// Number of live objects of one kind
    #[must_use]
    pub fn live_resources_of(&self, kind: ResourceKind) -> usize {
        self.state.borrow().resources.values().filter(|k| **k == kind).count()
    }

    /// Whether `id` is still alive
    #[must_use]
    pub fn is_live(&self, id: ResourceId) -> bool {
        self.state.borrow().resources.contains_key(id)
    }

    /// Number of objects ever created
    #[must_use]
    pub fn created_resources(&self) -> usize {
        self.state
            .borrow()
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Create { .. }))
            .count()
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn create_shader(&self) -> BackendResult<Box<dyn Shader>> {
        let mut state = self.state.borrow_mut();
        if state.should_fail(FaultPoint::ShaderCreation) {
            return Err(BackendError::AllocationFailed("shader".to_string()));
        }
        let id = state.allocate(ResourceKind::Shader);
        drop(state);

        Ok(Box::new(HeadlessShader {
            id,
            state: self.state.clone(),
            stage: None,
            source: String::new(),
        }))
    }

    fn create_shader_program(&self) -> BackendResult<Box<dyn ShaderProgram>> {
        let mut state = self.state.borrow_mut();
        if state.should_fail(FaultPoint::ProgramCreation) {
            return Err(BackendError::AllocationFailed("shader program".to_string()));
        }
        let id = state.allocate(ResourceKind::ShaderProgram);
        drop(state);

        Ok(Box::new(HeadlessShaderProgram {
            id,
            state: self.state.clone(),
            shaders: Vec::new(),
        }))
    }

    fn create_texture(&self) -> BackendResult<Box<dyn Texture>> {
        Ok(Box::new(self.create_headless_texture()?))
    }

    fn create_vertex_buffer(&self) -> BackendResult<Box<dyn VertexBuffer>> {
        Ok(Box::new(self.create_headless_buffer()?))
    }

    fn enable_features(&self, features: BackendFeatures) {
        record(&self.state, Command::EnableFeatures(features));
    }

    fn disable_features(&self, features: BackendFeatures) {
        record(&self.state, Command::DisableFeatures(features));
    }

    fn set_scissor(&self, origin: Vec2, size: Vec2) {
        record(&self.state, Command::SetScissor { origin, size });
    }
}

/// Shader stage created by a [`HeadlessBackend`]
pub struct HeadlessShader {
    id: ResourceId,
    state: SharedState,
    stage: Option<ShaderStage>,
    source: String,
}

impl HeadlessShader {
    /// Identifier in the backend's resource table
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }
}

impl GpuResource for HeadlessShader {
    fn destroy(&mut self) {
        self.state.borrow_mut().release(self.id);
    }
}

impl Shader for HeadlessShader {
    fn set_source(&mut self, source: &str, stage: ShaderStage) {
        self.source = source.to_string();
        self.stage = Some(stage);
        record(&self.state, Command::SetShaderSource { shader: self.id, stage });
    }

    fn compile(&mut self) -> BackendResult<()> {
        let mut state = self.state.borrow_mut();
        state.commands.push(Command::CompileShader(self.id));

        if state.should_fail(FaultPoint::ShaderCompile) {
            return Err(BackendError::CompileFailed("injected compile failure".to_string()));
        }
        if self.stage.is_none() || self.source.trim().is_empty() {
            return Err(BackendError::CompileFailed("shader has no source".to_string()));
        }
        Ok(())
    }
}

/// Shader program created by a [`HeadlessBackend`]
pub struct HeadlessShaderProgram {
    id: ResourceId,
    state: SharedState,
    shaders: Vec<Box<dyn Shader>>,
}

impl HeadlessShaderProgram {
    /// Identifier in the backend's resource table
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }
}

impl GpuResource for HeadlessShaderProgram {
    fn destroy(&mut self) {
        for mut shader in self.shaders.drain(..) {
            shader.destroy();
        }
        self.state.borrow_mut().release(self.id);
    }
}

impl ShaderProgram for HeadlessShaderProgram {
    fn add_shader(&mut self, shader: Box<dyn Shader>) {
        self.shaders.push(shader);
        record(
            &self.state,
            Command::AttachShader {
                program: self.id,
                attached: self.shaders.len(),
            },
        );
    }

    fn link(&mut self) -> BackendResult<()> {
        let mut state = self.state.borrow_mut();
        state.commands.push(Command::LinkProgram(self.id));

        if state.should_fail(FaultPoint::ProgramLink) {
            return Err(BackendError::LinkFailed("injected link failure".to_string()));
        }
        if self.shaders.len() < 2 {
            return Err(BackendError::LinkFailed(format!(
                "program needs a vertex and a fragment stage, has {}",
                self.shaders.len()
            )));
        }
        Ok(())
    }

    fn bind(&self) {
        record(&self.state, Command::BindProgram(self.id));
    }

    fn unbind(&self) {
        record(&self.state, Command::UnbindProgram(self.id));
    }

    fn set_uniform_i32(&self, name: &str, value: i32) {
        record(
            &self.state,
            Command::SetUniformI32 {
                program: self.id,
                name: name.to_string(),
                value,
            },
        );
    }

    fn set_uniform_mat4(&self, name: &str, value: &Mat4) {
        record(
            &self.state,
            Command::SetUniformMat4 {
                program: self.id,
                name: name.to_string(),
                value: *value,
            },
        );
    }
}

/// Texture created by a [`HeadlessBackend`]
pub struct HeadlessTexture {
    id: ResourceId,
    state: SharedState,
}

impl HeadlessTexture {
    /// Identifier in the backend's resource table
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }
}

impl GpuResource for HeadlessTexture {
    fn destroy(&mut self) {
        self.state.borrow_mut().release(self.id);
    }
}

impl Texture for HeadlessTexture {
    fn create(&mut self, data: &TextureData) -> BackendResult<()> {
        let mut state = self.state.borrow_mut();
        if state.should_fail(FaultPoint::TextureUpload) {
            return Err(BackendError::UploadFailed("injected texture upload failure".to_string()));
        }
        if !data.is_consistent() {
            return Err(BackendError::UploadFailed(format!(
                "{} pixels do not fill {}x{}",
                data.pixels.len(),
                data.width,
                data.height
            )));
        }

        state.commands.push(Command::CreateTexture {
            texture: self.id,
            width: data.width,
            height: data.height,
        });
        Ok(())
    }

    fn bind(&self, unit: u32) {
        record(&self.state, Command::BindTexture { texture: self.id, unit });
    }

    fn unbind(&self) {
        record(&self.state, Command::UnbindTexture(self.id));
    }
}

/// Vertex buffer created by a [`HeadlessBackend`]
pub struct HeadlessVertexBuffer {
    id: ResourceId,
    state: SharedState,
    vertex_count: usize,
}

impl HeadlessVertexBuffer {
    /// Identifier in the backend's resource table
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }
}

impl GpuResource for HeadlessVertexBuffer {
    fn destroy(&mut self) {
        self.state.borrow_mut().release(self.id);
    }
}

impl VertexBuffer for HeadlessVertexBuffer {
    fn upload(&mut self, vertices: &[Vertex], primitive: PrimitiveType, usage: BufferUsageHint) -> BackendResult<()> {
        let mut state = self.state.borrow_mut();
        if state.should_fail(FaultPoint::BufferUpload) {
            return Err(BackendError::UploadFailed("injected vertex upload failure".to_string()));
        }

        self.vertex_count = vertices.len();
        state.commands.push(Command::UploadVertices {
            buffer: self.id,
            vertex_count: vertices.len(),
            bytes: bytemuck::cast_slice::<Vertex, u8>(vertices).len(),
            primitive,
            usage,
        });
        Ok(())
    }

    fn bind(&self) {
        record(&self.state, Command::BindBuffer(self.id));
    }

    fn draw(&self) {
        record(
            &self.state,
            Command::Draw {
                buffer: self.id,
                vertex_count: self.vertex_count,
            },
        );
    }

    fn unbind(&self) {
        record(&self.state, Command::UnbindBuffer(self.id));
    }
}

/// Window with a settable size
#[derive(Debug)]
pub struct HeadlessWindow {
    size: Cell<Vec2>,
}

impl HeadlessWindow {
    /// Create a window of the given pixel size
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Cell::new(Vec2::new(width, height)),
        }
    }

    /// Simulate a resize
    pub fn resize(&self, width: f32, height: f32) {
        self.size.set(Vec2::new(width, height));
    }
}

impl Window for HeadlessWindow {
    fn size(&self) -> Vec2 {
        self.size.get()
    }
}

/// A [`HeadlessBackend`] bound to a [`HeadlessWindow`]
pub struct HeadlessContext {
    backend: HeadlessBackend,
    window: HeadlessWindow,
}

impl HeadlessContext {
    /// Pair a backend with a window of the given pixel size
    #[must_use]
    pub fn new(backend: HeadlessBackend, width: f32, height: f32) -> Self {
        Self {
            backend,
            window: HeadlessWindow::new(width, height),
        }
    }

    /// The recording backend, for inspection
    #[must_use]
    pub const fn headless_backend(&self) -> &HeadlessBackend {
        &self.backend
    }

    /// The window, for resizing
    #[must_use]
    pub const fn window(&self) -> &HeadlessWindow {
        &self.window
    }
}

impl GraphicsContext for HeadlessContext {
    fn bind(&self) {
        record(&self.backend.state, Command::BindContext);
    }

    fn backend(&self) -> &dyn GraphicsBackend {
        &self.backend
    }

    fn owner_window(&self) -> &dyn Window {
        &self.window
    }
}
