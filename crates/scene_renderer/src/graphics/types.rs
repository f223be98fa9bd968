//! Plain data types shared between the renderer and graphics backends

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

/// RGBA color with floating point channels in the 0.0-1.0 range
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Opaque black
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from its four channels
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as an array, in RGBA order
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Vertex layout shared by mesh buffers and the UI vertex stream
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position (pixels for UI geometry, model units for meshes)
    pub position: [f32; 3],
    /// Vertex color, multiplied with the sampled texel
    pub color: [f32; 4],
    /// Texture coordinates
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    #[must_use]
    pub const fn new(position: [f32; 3], color: Color, uv: [f32; 2]) -> Self {
        Self {
            position,
            color: color.to_array(),
            uv,
        }
    }
}

/// Primitive topology used when drawing a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    /// Independent triangles, three vertices each
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Triangle fan
    TriangleFan,
    /// Independent line segments
    Lines,
    /// Connected line strip
    LineStrip,
    /// Points
    Points,
}

/// Expected update frequency of a vertex buffer's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsageHint {
    /// Uploaded once, drawn many times
    #[default]
    Static,
    /// Updated occasionally
    Dynamic,
    /// Re-uploaded every time it is drawn
    Stream,
}

/// Pipeline stage a shader object is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment (pixel) stage
    Fragment,
}

bitflags! {
    /// Fixed-function features a backend can toggle
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BackendFeatures: u32 {
        /// Source-over alpha blending
        const ALPHA_BLENDING = 1 << 0;
        /// Clip rasterization to the current scissor rectangle
        const SCISSOR_TEST = 1 << 1;
    }
}

/// Pixel grid used to create a texture, stored row-major from the top-left
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    /// Pixels, `width * height` entries
    pub pixels: Vec<Color>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl TextureData {
    /// A single opaque white pixel
    #[must_use]
    pub fn white_pixel() -> Self {
        Self {
            pixels: vec![Color::WHITE],
            width: 1,
            height: 1,
        }
    }

    /// Whether the pixel count matches the stated dimensions
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == (self.width as usize) * (self.height as usize)
    }

    /// Raw RGBA channel data
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_pixel_is_opaque_white() {
        let data = TextureData::white_pixel();
        assert!(data.is_consistent());
        assert_eq!(data.pixels, vec![Color::WHITE]);
        assert_eq!(Color::WHITE.to_array(), [1.0; 4]);
    }

    #[test]
    fn test_texture_bytes_cover_all_channels() {
        let data = TextureData {
            pixels: vec![Color::BLACK; 4],
            width: 2,
            height: 2,
        };
        assert_eq!(data.as_bytes().len(), 4 * 4 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_inconsistent_texture_detected() {
        let data = TextureData {
            pixels: vec![Color::WHITE; 3],
            width: 2,
            height: 2,
        };
        assert!(!data.is_consistent());
    }

    #[test]
    fn test_feature_flags_combine() {
        let both = BackendFeatures::ALPHA_BLENDING | BackendFeatures::SCISSOR_TEST;
        assert!(both.contains(BackendFeatures::SCISSOR_TEST));
        assert!(!BackendFeatures::ALPHA_BLENDING.contains(BackendFeatures::SCISSOR_TEST));
    }
}
