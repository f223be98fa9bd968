//! Shader source loading
//!
//! The renderer reads shader code through [`ShaderSource`] so that sources
//! can come from disk in applications and from memory in tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-file-as-string access to shader sources
pub trait ShaderSource {
    /// Load the source stored under a relative path such as
    /// `Engine/Shaders/OpenGL/Vertex3D.glsl`
    fn read_to_string(&self, relative_path: &str) -> io::Result<String>;
}

/// Loads shader sources from a directory on disk
#[derive(Debug, Clone)]
pub struct FileShaderSource {
    root: PathBuf,
}

impl FileShaderSource {
    /// Resolve paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory paths are resolved against
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ShaderSource for FileShaderSource {
    fn read_to_string(&self, relative_path: &str) -> io::Result<String> {
        let path = self.root.join(relative_path);
        log::debug!("Loading shader source {}", path.display());
        std::fs::read_to_string(path)
    }
}

/// Serves shader sources from memory
#[derive(Debug, Clone, Default)]
pub struct MemoryShaderSource {
    files: HashMap<String, String>,
}

impl MemoryShaderSource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file
    #[must_use]
    pub fn with_file(mut self, relative_path: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(relative_path, source);
        self
    }

    /// Add (or replace) a file in place
    pub fn insert(&mut self, relative_path: impl Into<String>, source: impl Into<String>) {
        self.files.insert(relative_path.into(), source.into());
    }
}

impl ShaderSource for MemoryShaderSource {
    fn read_to_string(&self, relative_path: &str) -> io::Result<String> {
        self.files
            .get(relative_path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no shader source at {relative_path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lookup() {
        let source = MemoryShaderSource::new().with_file("a.glsl", "void main() {}");
        assert_eq!(source.read_to_string("a.glsl").unwrap(), "void main() {}");
        assert_eq!(source.read_to_string("b.glsl").unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_source_resolves_against_root() {
        let root = std::env::temp_dir().join(format!("scene_renderer_shaders_{}", std::process::id()));
        std::fs::create_dir_all(root.join("nested")).unwrap();
        std::fs::write(root.join("nested/test.glsl"), "// test").unwrap();

        let source = FileShaderSource::new(&root);
        let contents = source.read_to_string("nested/test.glsl");
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(contents.unwrap(), "// test");
    }
}
