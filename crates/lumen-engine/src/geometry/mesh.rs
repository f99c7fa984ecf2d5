use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::{GeometryError, VertexLayout};

/// How the mesh is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawMode {
    /// Vertices are consumed in order, three per triangle.
    NonIndexed,
    /// Triangles are assembled from this index list.
    Indexed(Vec<u32>),
}

/// Fixed vertex data plus its layout and draw mode.
///
/// Immutable once built; construct with [`Mesh::non_indexed`] or [`Mesh::indexed`].
#[derive(Debug, Clone)]
pub struct Mesh {
    layout: VertexLayout,
    vertices: Vec<u8>,
    draw: DrawMode,
}

impl Mesh {
    pub fn non_indexed<V: Pod>(layout: VertexLayout, vertices: &[V]) -> Result<Self, GeometryError> {
        Self::build(layout, vertices, DrawMode::NonIndexed)
    }

    pub fn indexed<V: Pod>(
        layout: VertexLayout,
        vertices: &[V],
        indices: &[u32],
    ) -> Result<Self, GeometryError> {
        if indices.is_empty() {
            return Err(GeometryError::NoIndices);
        }
        let vertex_count = vertices.len() as u32;
        if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange { index, vertex_count });
        }
        Self::build(layout, vertices, DrawMode::Indexed(indices.to_vec()))
    }

    fn build<V: Pod>(
        layout: VertexLayout,
        vertices: &[V],
        draw: DrawMode,
    ) -> Result<Self, GeometryError> {
        let vertex_size = std::mem::size_of::<V>() as u64;
        if vertex_size != layout.stride() {
            return Err(GeometryError::StrideMismatch { vertex_size, stride: layout.stride() });
        }
        if vertices.is_empty() {
            return Err(GeometryError::Empty);
        }

        Ok(Self {
            layout,
            vertices: bytemuck::cast_slice(vertices).to_vec(),
            draw,
        })
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn draw_mode(&self) -> &DrawMode {
        &self.draw
    }

    /// Raw interleaved vertex bytes, exactly as uploaded.
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() as u64 / self.layout.stride()) as u32
    }

    pub fn indices(&self) -> Option<&[u32]> {
        match &self.draw {
            DrawMode::Indexed(indices) => Some(indices),
            DrawMode::NonIndexed => None,
        }
    }

    /// Elements consumed by one draw call: indices when indexed, vertices otherwise.
    pub fn draw_count(&self) -> u32 {
        self.indices().map_or(self.vertex_count(), |i| i.len() as u32)
    }

    /// Uploads the vertex (and index) data into fresh GPU buffers.
    pub fn upload(&self, device: &wgpu::Device) -> GpuMesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen mesh vbo"),
            contents: &self.vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = self.indices().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumen mesh ibo"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::debug!(
            "uploaded mesh: {} vertices ({} bytes), draw count {}",
            self.vertex_count(),
            self.vertices.len(),
            self.draw_count()
        );

        GpuMesh {
            vertex_buffer,
            index_buffer,
            draw_count: self.draw_count(),
        }
    }
}

/// Device-side copy of a [`Mesh`]. Write-once.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    draw_count: u32,
}

impl GpuMesh {
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    /// Binds the buffers and issues the single draw call.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(ibo) => {
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..self.draw_count, 0, 0..1);
            }
            None => rpass.draw(0..self.draw_count, 0..1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AttributeKind, VertexAttribute};
    use bytemuck::{Pod, Zeroable};

    #[repr(C)]
    #[derive(Debug, Copy, Clone, Pod, Zeroable)]
    struct ColorVertex {
        pos: [f32; 3],
        color: [f32; 3],
    }

    const QUAD: [ColorVertex; 4] = [
        ColorVertex { pos: [0.5, 0.5, 0.0], color: [1.0, 0.0, 0.0] },
        ColorVertex { pos: [0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0] },
        ColorVertex { pos: [-0.5, -0.5, 0.0], color: [0.0, 0.0, 1.0] },
        ColorVertex { pos: [-0.5, 0.5, 0.0], color: [1.0, 1.0, 0.0] },
    ];

    fn layout() -> VertexLayout {
        VertexLayout::new(&[
            VertexAttribute::new(0, AttributeKind::Position3),
            VertexAttribute::new(1, AttributeKind::Color3),
        ])
        .unwrap()
    }

    #[test]
    fn indexed_mesh_counts() {
        let mesh = Mesh::indexed(layout(), &QUAD, &[0, 1, 3, 1, 2, 3]).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.vertex_bytes().len(), 4 * 24);
        assert_eq!(mesh.draw_count(), 6);
    }

    #[test]
    fn non_indexed_draws_every_vertex() {
        let mesh = Mesh::non_indexed(layout(), &QUAD[..3]).unwrap();
        assert_eq!(mesh.indices(), None);
        assert_eq!(mesh.draw_count(), 3);
    }

    #[test]
    fn bad_meshes_rejected() {
        assert_eq!(
            Mesh::indexed(layout(), &QUAD, &[0, 1, 4]).unwrap_err(),
            GeometryError::IndexOutOfRange { index: 4, vertex_count: 4 }
        );
        assert_eq!(
            Mesh::indexed(layout(), &QUAD, &[]).unwrap_err(),
            GeometryError::NoIndices
        );
        assert_eq!(
            Mesh::non_indexed::<ColorVertex>(layout(), &[]).unwrap_err(),
            GeometryError::Empty
        );
        assert!(matches!(
            Mesh::non_indexed(layout(), &[[0.0f32; 3]]).unwrap_err(),
            GeometryError::StrideMismatch { vertex_size: 12, stride: 24 }
        ));
    }
}
