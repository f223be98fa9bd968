//! # Simple Renderer
//!
//! A frame-scoped, immediate-mode render orchestrator. Each frame collects
//! mesh and UI submissions, then [`SimpleRenderer::end_frame`] draws them in
//! two fixed passes through whatever backend the graphics context provides.
//!
//! ## Frame Lifecycle
//!
//! ```text
//! initialize ─► ( begin_frame ─► use_camera ─► submit_mesh* / submit_ui* ─► end_frame )* ─► destroy
//! ```
//!
//! Calls made in the wrong state (a second `begin_frame`, submitting outside
//! a frame, ...) are logged and ignored. They never change the frame state.
//!
//! ## Passes
//!
//! 1. **3D**: runs when a camera was bound this frame. Every mesh is drawn
//!    with the white fallback texture and its own model matrix.
//! 2. **UI**: runs when UI items were submitted. Geometry is in window pixels
//!    with a top-left origin, alpha blended and scissored per item. Items are
//!    streamed through a single vertex buffer, one draw per item.

mod guard;
mod items;
mod profile;


pub use items::{MeshRenderItem, UiRenderItem};
pub use profile::BackendProfile;

use guard::Owned;

use crate::config::{RendererConfig, ShaderPathSet};
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::graphics::{
    BackendError, BackendFeatures, BufferUsageHint, Camera, GraphicsBackend, GraphicsContext, Shader, ShaderProgram,
    ShaderStage, Texture, TextureData, VertexBuffer,
};
use crate::shader_source::{FileShaderSource, ShaderSource};

/// Sampler uniform shared by both programs
pub const SAMPLER_UNIFORM: &str = "sTexture";
/// Projection matrix uniform shared by both programs
pub const PROJECTION_UNIFORM: &str = "ufProjMatrix";
/// View matrix uniform of the 3D program
pub const VIEW_UNIFORM: &str = "ufViewMatrix";
/// Model matrix uniform of the 3D program
pub const MODEL_UNIFORM: &str = "ufModelMatrix";

/// Errors that abort [`SimpleRenderer::initialize`]
///
/// Whatever was created before the failure has already been destroyed when
/// one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// The backend identifier has no shader set
    #[error("Unknown '{0}' backend, no shaders are available for it")]
    UnsupportedBackend(String),

    /// A shader source file could not be read
    #[error("Could not read {stage} shader source '{path}': {source}")]
    ShaderSource {
        /// Which of the four stages
        stage: &'static str,
        /// Path relative to the shader root
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The backend could not allocate a shader object
    #[error("Could not create {stage} shader: {source}")]
    ShaderCreation {
        /// Which of the four stages
        stage: &'static str,
        /// Backend error
        source: BackendError,
    },

    /// A shader stage failed to compile
    #[error("Failed to compile {stage} shader: {source}")]
    ShaderCompile {
        /// Which of the four stages
        stage: &'static str,
        /// Backend error, usually carrying the compiler log
        source: BackendError,
    },

    /// The backend could not allocate a shader program
    #[error("Could not create {program} shader program: {source}")]
    ProgramCreation {
        /// `"3D"` or `"UI"`
        program: &'static str,
        /// Backend error
        source: BackendError,
    },

    /// A shader program failed to link
    #[error("Failed to link {program} shader program: {source}")]
    Link {
        /// `"3D"` or `"UI"`
        program: &'static str,
        /// Backend error, usually carrying the linker log
        source: BackendError,
    },

    /// The UI vertex buffer or the fallback texture could not be allocated
    #[error("Could not create {resource}: {source}")]
    ResourceCreation {
        /// Which resource
        resource: &'static str,
        /// Backend error
        source: BackendError,
    },

    /// Initial data could not be uploaded to a resource
    #[error("Could not upload {resource}: {source}")]
    Upload {
        /// Which resource
        resource: &'static str,
        /// Backend error
        source: BackendError,
    },
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Where the renderer is in its frame cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// Between frames; only `begin_frame` is meaningful
    #[default]
    Idle,
    /// Between `begin_frame` and `end_frame`; submissions are accepted
    InFrame,
}

/// Camera matrices captured when a camera is bound for the frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraMatrices {
    projection: Mat4,
    view: Mat4,
}

/// GPU objects owned by an initialized renderer
///
/// Held as a unit: either all of them exist or none do.
struct RendererResources {
    scene_program: Owned<dyn ShaderProgram>,
    ui_program: Owned<dyn ShaderProgram>,
    ui_vertex_buffer: Owned<dyn VertexBuffer>,
    white_pixel: Owned<dyn Texture>,
}

/// Frame-scoped immediate-mode renderer
///
/// Borrows the graphics context and every submitted buffer or texture for
/// `'a`; owns only the two shader programs, the UI vertex buffer and the
/// white fallback texture it creates in [`initialize`](Self::initialize).
///
/// Not thread-safe: drive it from the thread that owns the graphics context.
pub struct SimpleRenderer<'a> {
    config: RendererConfig,
    shader_source: Box<dyn ShaderSource>,

    context: Option<&'a dyn GraphicsContext>,
    profile: Option<BackendProfile>,
    resources: Option<RendererResources>,

    state: FrameState,
    current_camera: Option<CameraMatrices>,
    mesh_queue: Vec<MeshRenderItem<'a>>,
    ui_queue: Vec<UiRenderItem<'a>>,
}

impl<'a> SimpleRenderer<'a> {
    /// Create an uninitialized renderer that reads shaders from
    /// `config.shader_root` on disk
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let source = FileShaderSource::new(config.shader_root.clone());
        Self::with_shader_source(config, source)
    }

    /// Create an uninitialized renderer with a custom shader source
    pub fn with_shader_source(config: RendererConfig, shader_source: impl ShaderSource + 'static) -> Self {
        Self {
            config,
            shader_source: Box::new(shader_source),
            context: None,
            profile: None,
            resources: None,
            state: FrameState::Idle,
            current_camera: None,
            mesh_queue: Vec::new(),
            ui_queue: Vec::new(),
        }
    }

    /// Create every GPU object the renderer needs
    ///
    /// Binds the context, picks the shader set matching the backend
    /// identifier, compiles and links the 3D and UI programs, then creates the
    /// UI vertex buffer and the 1x1 white fallback texture.
    ///
    /// # Errors
    /// Returns the first failure encountered. Nothing created by this call
    /// survives a failure, and the renderer is left uninitialized so the call
    /// can be retried.
    pub fn initialize(&mut self, context: &'a dyn GraphicsContext) -> RendererResult<()> {
        if self.resources.is_some() {
            log::info!("Re-initializing renderer, releasing previous resources");
            self.destroy();
        }

        context.bind();
        let backend = context.backend();

        let identifier = backend.identifier();
        let Some(profile) = BackendProfile::from_identifier(identifier) else {
            log::error!("Unknown '{}' backend! Support must be added!", identifier);
            return Err(RendererError::UnsupportedBackend(identifier.to_string()));
        };
        log::info!("Identified {} backend", profile);

        let paths = profile.shader_paths(&self.config);
        let resources = build_resources(backend, self.shader_source.as_ref(), paths).map_err(|e| {
            log::error!("Renderer initialization failed: {}", e);
            e
        })?;

        self.resources = Some(resources);
        self.profile = Some(profile);
        self.context = Some(context);

        log::info!("Renderer initialized for {} backend", profile);
        Ok(())
    }

    /// Release the shader programs, UI vertex buffer and fallback texture
    ///
    /// Safe to call any number of times. The renderer can be initialized
    /// again afterwards.
    pub fn destroy(&mut self) {
        if self.resources.take().is_some() {
            log::debug!("Renderer resources released");
        }
        self.profile = None;
        self.context = None;
    }

    /// Start collecting submissions for a new frame
    pub fn begin_frame(&mut self) {
        if self.state == FrameState::InFrame {
            log::warn!("Cannot call begin_frame when you are already in a frame!");
            return;
        }

        log::trace!("Begin frame");
        self.state = FrameState::InFrame;
    }

    /// Use `camera` for this frame's 3D pass
    ///
    /// The camera is updated with the window's current size right away and
    /// its matrices are captured; binding another camera later in the same
    /// frame replaces them.
    ///
    /// The projection and view matrices are captured at call time: moving the
    /// camera afterwards does not affect this frame.
    pub fn use_camera(&mut self, camera: &mut dyn Camera) {
        if self.state != FrameState::InFrame {
            log::warn!("Cannot call use_camera when you didn't even begin a frame!");
            return;
        }

        match self.context {
            Some(context) => camera.update(context.owner_window().size()),
            None => log::warn!("Renderer not initialized; camera used without a viewport update"),
        }

        self.current_camera = Some(CameraMatrices {
            projection: camera.projection_matrix(),
            view: camera.view_matrix(),
        });
    }

    /// Queue a mesh for this frame's 3D pass
    pub fn submit_mesh(&mut self, item: MeshRenderItem<'a>) {
        if self.state != FrameState::InFrame {
            log::warn!("Cannot submit mesh when the frame did not begin!");
            return;
        }

        self.mesh_queue.push(item);
    }

    /// Queue UI geometry for this frame's UI pass
    pub fn submit_ui(&mut self, item: UiRenderItem<'a>) {
        if self.state != FrameState::InFrame {
            log::warn!("Cannot submit UI item when the frame did not begin!");
            return;
        }

        self.ui_queue.push(item);
    }

    /// Draw everything submitted this frame and return to idle
    ///
    /// The queues and the bound camera are cleared even when a pass is
    /// skipped. On an uninitialized renderer this logs an error and does
    /// nothing: the frame stays open and its submissions stay queued.
    pub fn end_frame(&mut self) {
        if self.state != FrameState::InFrame {
            log::warn!("Cannot call end_frame when you didn't even begin a frame!");
            return;
        }

        let (Some(context), Some(profile), Some(resources)) = (self.context, self.profile, self.resources.as_mut())
        else {
            log::error!("Renderer not initialized!");
            return;
        };

        match &self.current_camera {
            Some(camera) => resources.render_scene(profile, camera, &self.mesh_queue),
            None => log::debug!("No camera assigned to this frame; 3D rendering is skipped"),
        }

        if !self.ui_queue.is_empty() {
            resources.render_ui(context, profile, &self.ui_queue, self.config.warn_on_missing_ui_texture);
        }

        self.mesh_queue.clear();
        self.ui_queue.clear();
        self.state = FrameState::Idle;
        self.current_camera = None;
        log::trace!("End frame");
    }

    /// Whether [`initialize`](Self::initialize) has succeeded and
    /// [`destroy`](Self::destroy) has not been called since
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }

    /// Current frame state
    #[must_use]
    pub const fn frame_state(&self) -> FrameState {
        self.state
    }

    /// Backend profile selected by the last successful initialization
    #[must_use]
    pub const fn backend_profile(&self) -> Option<BackendProfile> {
        self.profile
    }

    /// Whether a camera has been bound in the current frame
    #[must_use]
    pub const fn has_camera(&self) -> bool {
        self.current_camera.is_some()
    }

    /// Meshes queued in the current frame
    #[must_use]
    pub fn queued_meshes(&self) -> &[MeshRenderItem<'a>] {
        &self.mesh_queue
    }

    /// UI items queued in the current frame
    #[must_use]
    pub fn queued_ui_items(&self) -> &[UiRenderItem<'a>] {
        &self.ui_queue
    }

    /// Renderer configuration
    #[must_use]
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }
}

impl Default for SimpleRenderer<'_> {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

impl Drop for SimpleRenderer<'_> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl RendererResources {
    fn render_scene(&self, profile: BackendProfile, camera: &CameraMatrices, meshes: &[MeshRenderItem<'_>]) {
        let program = &*self.scene_program;
        program.bind();

        if profile.requires_sampler_uniform() {
            program.set_uniform_i32(SAMPLER_UNIFORM, 0);
        }

        program.set_uniform_mat4(PROJECTION_UNIFORM, &camera.projection);
        program.set_uniform_mat4(VIEW_UNIFORM, &camera.view);

        for mesh in meshes {
            self.white_pixel.bind(0);

            program.set_uniform_mat4(MODEL_UNIFORM, &mesh.model_matrix());

            mesh.buffer.bind();
            mesh.buffer.draw();
            mesh.buffer.unbind();

            self.white_pixel.unbind();
        }

        program.unbind();
        log::trace!("3D pass drew {} meshes", meshes.len());
    }

    fn render_ui(
        &mut self,
        context: &dyn GraphicsContext,
        profile: BackendProfile,
        items: &[UiRenderItem<'_>],
        warn_on_missing_texture: bool,
    ) {
        let backend = context.backend();
        let size = context.owner_window().size();

        // Pixel space, origin at the top-left corner, y pointing down
        let ortho = Mat4::orthographic_zo(0.0, size.x, size.y, 0.0, -1.0, 1.0);
        self.ui_program.set_uniform_mat4(PROJECTION_UNIFORM, &ortho);

        if profile.requires_sampler_uniform() {
            self.ui_program.set_uniform_i32(SAMPLER_UNIFORM, 0);
        }

        self.ui_program.bind();

        backend.enable_features(BackendFeatures::ALPHA_BLENDING | BackendFeatures::SCISSOR_TEST);

        for item in items {
            backend.set_scissor(item.scissor, item.size);

            if let Err(e) = self
                .ui_vertex_buffer
                .upload(&item.vertices, item.primitive, BufferUsageHint::Stream)
            {
                log::error!("Could not upload UI vertices, skipping item: {}", e);
                continue;
            }

            self.ui_vertex_buffer.bind();

            let texture: &dyn Texture = match item.texture {
                Some(texture) => texture,
                None => {
                    if warn_on_missing_texture {
                        log::warn!("UI element has no texture! Defaulting to white pixel");
                    }
                    &*self.white_pixel
                }
            };

            texture.bind(0);
            self.ui_vertex_buffer.draw();
            texture.unbind();
        }

        self.ui_vertex_buffer.unbind();
        self.ui_program.unbind();

        backend.disable_features(BackendFeatures::ALPHA_BLENDING | BackendFeatures::SCISSOR_TEST);
        log::trace!("UI pass drew {} items", items.len());
    }
}

/// Labels used in logs and errors for the four shader stages
const SCENE_VERTEX: &str = "3D vertex";
const SCENE_FRAGMENT: &str = "3D fragment";
const UI_VERTEX: &str = "UI vertex";
const UI_FRAGMENT: &str = "UI fragment";

/// Build the complete resource set, or nothing
///
/// Every object lives in an [`Owned`] guard until it is moved into the
/// returned [`RendererResources`], so returning early through `?` destroys
/// all objects created up to that point.
fn build_resources(
    backend: &dyn GraphicsBackend,
    source: &dyn ShaderSource,
    paths: &ShaderPathSet,
) -> RendererResult<RendererResources> {
    let create_shader = |stage: &'static str| {
        backend
            .create_shader()
            .map(Owned::new)
            .map_err(|source| RendererError::ShaderCreation { stage, source })
    };

    let mut scene_vertex = create_shader(SCENE_VERTEX)?;
    let mut scene_fragment = create_shader(SCENE_FRAGMENT)?;
    let mut ui_vertex = create_shader(UI_VERTEX)?;
    let mut ui_fragment = create_shader(UI_FRAGMENT)?;

    load_stage(source, &mut scene_vertex, SCENE_VERTEX, &paths.vertex_3d, ShaderStage::Vertex)?;
    load_stage(source, &mut scene_fragment, SCENE_FRAGMENT, &paths.fragment_3d, ShaderStage::Fragment)?;
    load_stage(source, &mut ui_vertex, UI_VERTEX, &paths.vertex_2d, ShaderStage::Vertex)?;
    load_stage(source, &mut ui_fragment, UI_FRAGMENT, &paths.fragment_2d, ShaderStage::Fragment)?;

    for (stage, shader) in [
        (SCENE_VERTEX, &mut scene_vertex),
        (SCENE_FRAGMENT, &mut scene_fragment),
        (UI_VERTEX, &mut ui_vertex),
        (UI_FRAGMENT, &mut ui_fragment),
    ] {
        shader
            .compile()
            .map_err(|source| RendererError::ShaderCompile { stage, source })?;
    }

    let create_program = |program: &'static str| {
        backend
            .create_shader_program()
            .map(Owned::new)
            .map_err(|source| RendererError::ProgramCreation { program, source })
    };

    let mut scene_program = create_program("3D")?;
    let mut ui_program = create_program("UI")?;

    // From here on the programs own the stages and destroy them with themselves
    scene_program.add_shader(scene_vertex.release());
    scene_program.add_shader(scene_fragment.release());
    ui_program.add_shader(ui_vertex.release());
    ui_program.add_shader(ui_fragment.release());

    scene_program
        .link()
        .map_err(|source| RendererError::Link { program: "3D", source })?;
    ui_program
        .link()
        .map_err(|source| RendererError::Link { program: "UI", source })?;

    let ui_vertex_buffer = backend
        .create_vertex_buffer()
        .map(Owned::new)
        .map_err(|source| RendererError::ResourceCreation {
            resource: "UI vertex buffer",
            source,
        })?;

    let mut white_pixel = backend
        .create_texture()
        .map(Owned::new)
        .map_err(|source| RendererError::ResourceCreation {
            resource: "white pixel texture",
            source,
        })?;

    white_pixel
        .create(&TextureData::white_pixel())
        .map_err(|source| RendererError::Upload {
            resource: "white pixel texture",
            source,
        })?;

    Ok(RendererResources {
        scene_program,
        ui_program,
        ui_vertex_buffer,
        white_pixel,
    })
}

fn load_stage(
    source: &dyn ShaderSource,
    shader: &mut Owned<dyn Shader>,
    stage_label: &'static str,
    path: &str,
    stage: ShaderStage,
) -> RendererResult<()> {
    let code = source
        .read_to_string(path)
        .map_err(|e| RendererError::ShaderSource {
            stage: stage_label,
            path: path.to_string(),
            source: e,
        })?;

    shader.set_source(&code, stage);
    Ok(())
}
