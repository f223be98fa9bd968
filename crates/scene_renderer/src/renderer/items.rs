//! Per-frame draw submissions

use std::fmt;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec2, Vec3};
use crate::graphics::{Color, PrimitiveType, Texture, Vertex, VertexBuffer};

/// A 3D mesh to draw this frame
///
/// The buffer is owned by the caller and borrowed until the frame ends.
#[derive(Clone, Copy)]
pub struct MeshRenderItem<'a> {
    /// World position
    pub position: Vec3,
    /// Euler rotation in degrees, applied X then Y then Z
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Geometry to draw
    pub buffer: &'a dyn VertexBuffer,
}

impl<'a> MeshRenderItem<'a> {
    /// Draw `buffer` at the origin with no rotation and unit scale
    pub fn new(buffer: &'a dyn VertexBuffer) -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            buffer,
        }
    }

    /// Set the world position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the Euler rotation in degrees
    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the per-axis scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Model matrix: `translate * rotate_x * rotate_y * rotate_z * scale`
    ///
    /// The rotation order is fixed; changing it changes the result.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * Mat4::rotation_x(utils::deg_to_rad(self.rotation.x))
            * Mat4::rotation_y(utils::deg_to_rad(self.rotation.y))
            * Mat4::rotation_z(utils::deg_to_rad(self.rotation.z))
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

impl fmt::Debug for MeshRenderItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshRenderItem")
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

/// A piece of UI geometry to draw this frame, in window pixels
#[derive(Clone)]
pub struct UiRenderItem<'a> {
    /// Vertex stream, positions in pixels from the top-left corner
    pub vertices: Vec<Vertex>,
    /// Topology of `vertices`
    pub primitive: PrimitiveType,
    /// Top-left corner of the scissor rectangle
    pub scissor: Vec2,
    /// Size of the scissor rectangle
    pub size: Vec2,
    /// Texture to sample; the renderer's white pixel is used when absent
    pub texture: Option<&'a dyn Texture>,
}

impl<'a> UiRenderItem<'a> {
    /// Untextured geometry clipped to the given scissor rectangle
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, primitive: PrimitiveType, scissor: Vec2, size: Vec2) -> Self {
        Self {
            vertices,
            primitive,
            scissor,
            size,
            texture: None,
        }
    }

    /// A solid axis-aligned rectangle, clipped to itself
    #[must_use]
    pub fn rect(origin: Vec2, size: Vec2, color: Color) -> Self {
        let (x0, y0) = (origin.x, origin.y);
        let (x1, y1) = (origin.x + size.x, origin.y + size.y);

        let vertices = vec![
            Vertex::new([x0, y0, 0.0], color, [0.0, 0.0]),
            Vertex::new([x1, y0, 0.0], color, [1.0, 0.0]),
            Vertex::new([x1, y1, 0.0], color, [1.0, 1.0]),
            Vertex::new([x0, y0, 0.0], color, [0.0, 0.0]),
            Vertex::new([x1, y1, 0.0], color, [1.0, 1.0]),
            Vertex::new([x0, y1, 0.0], color, [0.0, 1.0]),
        ];

        Self::new(vertices, PrimitiveType::Triangles, origin, size)
    }

    /// Sample `texture` instead of the white pixel
    #[must_use]
    pub fn with_texture(mut self, texture: &'a dyn Texture) -> Self {
        self.texture = Some(texture);
        self
    }
}

impl fmt::Debug for UiRenderItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiRenderItem")
            .field("vertices", &self.vertices.len())
            .field("primitive", &self.primitive)
            .field("scissor", &self.scissor)
            .field("size", &self.size)
            .field("textured", &self.texture.is_some())
            .finish()
    }
}
