//! # Scene Renderer
//!
//! A minimal immediate-mode scene renderer over an abstract graphics backend.
//!
//! ## Features
//!
//! - **Backend Agnostic**: OpenGL and DirectX 9 shader sets, selected from the backend identifier
//! - **Immediate Mode**: Submit meshes and UI geometry every frame, nothing is retained
//! - **Two Passes**: A camera-driven 3D pass followed by a pixel-space UI pass
//! - **All-or-Nothing Setup**: A failed initialization never leaves GPU objects behind
//! - **Headless Backend**: Record and inspect every backend call without a GPU
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_renderer::prelude::*;
//! use scene_renderer::backend::{HeadlessBackend, HeadlessContext};
//! use scene_renderer::shader_source::MemoryShaderSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = ShaderPathSet::opengl();
//! let shaders = MemoryShaderSource::new()
//!     .with_file(paths.vertex_3d.clone(), "void main() {}")
//!     .with_file(paths.fragment_3d.clone(), "void main() {}")
//!     .with_file(paths.vertex_2d.clone(), "void main() {}");
//!
//! let context = HeadlessContext::new(HeadlessBackend::new("opengl"), 800.0, 600.0);
//! let mut camera = PerspectiveCamera::default();
//!
//! let mut renderer = SimpleRenderer::with_shader_source(RendererConfig::default(), shaders);
//! renderer.initialize(&context)?;
//!
//! renderer.begin_frame();
//! renderer.use_camera(&mut camera);
//! renderer.submit_ui(UiRenderItem::rect(Vec2::new(10.0, 10.0), Vec2::new(200.0, 40.0), Color::WHITE));
//! renderer.end_frame();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backend;
pub mod camera;
pub mod config;
pub mod foundation;
pub mod graphics;
pub mod renderer;
pub mod shader_source;

pub use renderer::{RendererError, RendererResult, SimpleRenderer};

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        camera::PerspectiveCamera,
        config::{Config, RendererConfig, ShaderPathSet},
        foundation::math::{Mat4, Vec2, Vec3},
        graphics::{
            Camera, Color, GraphicsBackend, GraphicsContext, PrimitiveType, Texture, Vertex, VertexBuffer, Window,
        },
        renderer::{BackendProfile, FrameState, MeshRenderItem, UiRenderItem},
        RendererError, RendererResult, SimpleRenderer,
    };
}
