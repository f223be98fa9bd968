//! Backend-specific settings, resolved once at initialization

use std::fmt;

use crate::config::{RendererConfig, ShaderPathSet};

/// A graphics backend the renderer ships shaders for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendProfile {
    /// OpenGL, identified as `"opengl"`
    OpenGl,
    /// DirectX 9, identified as `"dx9"`
    DirectX9,
}

impl BackendProfile {
    /// Map a backend identifier to a profile, `None` if unsupported
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "opengl" => Some(Self::OpenGl),
            "dx9" => Some(Self::DirectX9),
            _ => None,
        }
    }

    /// The identifier a backend reports for this profile
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::OpenGl => "opengl",
            Self::DirectX9 => "dx9",
        }
    }

    /// Shader sources to load for this profile
    #[must_use]
    pub fn shader_paths(self, config: &RendererConfig) -> &ShaderPathSet {
        match self {
            Self::OpenGl => &config.opengl,
            Self::DirectX9 => &config.directx9,
        }
    }

    /// Whether the sampler uniform has to be pointed at texture unit 0 by hand
    ///
    /// GLSL samplers default to unit 0 only by convention, so OpenGL gets an
    /// explicit assignment; HLSL samplers are bound by register.
    #[must_use]
    pub const fn requires_sampler_uniform(self) -> bool {
        matches!(self, Self::OpenGl)
    }
}

impl fmt::Display for BackendProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenGl => write!(f, "OpenGL"),
            Self::DirectX9 => write!(f, "DirectX 9"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_identifiers() {
        assert_eq!(BackendProfile::from_identifier("opengl"), Some(BackendProfile::OpenGl));
        assert_eq!(BackendProfile::from_identifier("dx9"), Some(BackendProfile::DirectX9));
        for profile in [BackendProfile::OpenGl, BackendProfile::DirectX9] {
            assert_eq!(BackendProfile::from_identifier(profile.identifier()), Some(profile));
        }
    }

    #[test]
    fn test_unknown_identifiers() {
        for id in ["", "vulkan", "OpenGL", "dx11", "metal"] {
            assert_eq!(BackendProfile::from_identifier(id), None, "{id}");
        }
    }

    #[test]
    fn test_sampler_uniform_only_for_opengl() {
        assert!(BackendProfile::OpenGl.requires_sampler_uniform());
        assert!(!BackendProfile::DirectX9.requires_sampler_uniform());
    }

    #[test]
    fn test_paths_follow_profile() {
        let config = RendererConfig::default();
        assert!(BackendProfile::OpenGl.shader_paths(&config).vertex_3d.ends_with(".glsl"));
        assert!(BackendProfile::DirectX9.shader_paths(&config).vertex_3d.ends_with(".hlsl"));
    }
}
