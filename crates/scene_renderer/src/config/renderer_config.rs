//! Renderer configuration
//!
//! Lets applications relocate or replace the shader sources for each
//! supported backend without touching the renderer itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Config;

/// Shader source files for one backend, relative to [`RendererConfig::shader_root`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderPathSet {
    /// Vertex stage of the 3D program
    pub vertex_3d: String,
    /// Fragment stage of the 3D program
    pub fragment_3d: String,
    /// Vertex stage of the UI program
    pub vertex_2d: String,
    /// Fragment stage of the UI program
    pub fragment_2d: String,
}

impl ShaderPathSet {
    /// Default OpenGL sources (GLSL)
    #[must_use]
    pub fn opengl() -> Self {
        Self {
            vertex_3d: "Engine/Shaders/OpenGL/Vertex3D.glsl".to_string(),
            fragment_3d: "Engine/Shaders/OpenGL/Fragment3D.glsl".to_string(),
            vertex_2d: "Engine/Shaders/OpenGL/Vertex2D.glsl".to_string(),
            // Both programs share one textured, vertex-colored fragment stage
            fragment_2d: "Engine/Shaders/OpenGL/Fragment3D.glsl".to_string(),
        }
    }

    /// Default DirectX 9 sources (HLSL)
    #[must_use]
    pub fn directx9() -> Self {
        Self {
            vertex_3d: "Engine/Shaders/DirectX/Vertex3D.hlsl".to_string(),
            fragment_3d: "Engine/Shaders/DirectX/Pixel3D.hlsl".to_string(),
            vertex_2d: "Engine/Shaders/DirectX/Vertex2D.hlsl".to_string(),
            fragment_2d: "Engine/Shaders/DirectX/Pixel3D.hlsl".to_string(),
        }
    }
}

/// Configuration for the simple renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Directory the shader paths are resolved against
    pub shader_root: PathBuf,
    /// Log a warning for every UI item drawn with the fallback texture
    pub warn_on_missing_ui_texture: bool,
    /// Shader sources used with the `"opengl"` backend
    pub opengl: ShaderPathSet,
    /// Shader sources used with the `"dx9"` backend
    pub directx9: ShaderPathSet,
}

impl RendererConfig {
    /// Create a configuration resolving shaders against `shader_root`
    pub fn new(shader_root: impl Into<PathBuf>) -> Self {
        Self {
            shader_root: shader_root.into(),
            ..Self::default()
        }
    }

    /// Set the shader root directory
    #[must_use]
    pub fn with_shader_root(mut self, shader_root: impl Into<PathBuf>) -> Self {
        self.shader_root = shader_root.into();
        self
    }

    /// Override the OpenGL shader sources
    #[must_use]
    pub fn with_opengl_shaders(mut self, paths: ShaderPathSet) -> Self {
        self.opengl = paths;
        self
    }

    /// Override the DirectX 9 shader sources
    #[must_use]
    pub fn with_directx9_shaders(mut self, paths: ShaderPathSet) -> Self {
        self.directx9 = paths;
        self
    }

    /// Enable or disable the missing-texture warning
    #[must_use]
    pub fn with_missing_texture_warning(mut self, enabled: bool) -> Self {
        self.warn_on_missing_ui_texture = enabled;
        self
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shader_root: PathBuf::from("."),
            warn_on_missing_ui_texture: true,
            opengl: ShaderPathSet::opengl(),
            directx9: ShaderPathSet::directx9(),
        }
    }
}

impl Config for RendererConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scene_renderer_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_ui_fragment_defaults_to_3d_fragment() {
        let gl = ShaderPathSet::opengl();
        assert_eq!(gl.fragment_2d, gl.fragment_3d);
        let dx = ShaderPathSet::directx9();
        assert_eq!(dx.fragment_2d, dx.fragment_3d);
        assert_ne!(dx.vertex_2d, dx.vertex_3d);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = scratch_path("renderer.toml");
        let config = RendererConfig::new("assets").with_missing_texture_warning(false);

        config.save_to_file(&path).expect("save toml");
        let loaded = RendererConfig::load_from_file(&path).expect("load toml");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = scratch_path("renderer.ron");
        let mut paths = ShaderPathSet::opengl();
        paths.fragment_2d = "Engine/Shaders/OpenGL/Fragment2D.glsl".to_string();
        let config = RendererConfig::default().with_opengl_shaders(paths);

        config.save_to_file(&path).expect("save ron");
        let loaded = RendererConfig::load_from_file(&path).expect("load ron");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let path = scratch_path("partial.toml");
        std::fs::write(&path, "shader_root = \"shaders\"\n").expect("write toml");
        let loaded = RendererConfig::load_from_file(&path).expect("load toml");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.shader_root, PathBuf::from("shaders"));
        assert_eq!(loaded.directx9, ShaderPathSet::directx9());
        assert!(loaded.warn_on_missing_ui_texture);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = RendererConfig::default().save_to_file(scratch_path("renderer.json"));
        assert!(matches!(result, Err(crate::config::ConfigError::UnsupportedFormat(_))));
    }
}
