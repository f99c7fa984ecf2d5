//! An indexed quad drifting around the origin while its colors invert.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use lumen_engine::demo::{anim, DemoConfig};
use lumen_engine::geometry::{AttributeKind, Mesh, VertexAttribute, VertexLayout};
use lumen_engine::time::FrameTime;

pub use crate::pulse::Vertex;

pub const VERTICES: [Vertex; 4] = [
    Vertex { pos: [0.5, 0.5, 0.0], color: [1.0, 0.0, 0.0] },
    Vertex { pos: [0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0] },
    Vertex { pos: [-0.5, -0.5, 0.0], color: [0.0, 0.0, 1.0] },
    Vertex { pos: [-0.5, 0.5, 0.0], color: [1.0, 1.0, 0.0] },
];

pub const INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

pub const ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute::new(0, AttributeKind::Position3),
    VertexAttribute::new(1, AttributeKind::Color3),
];

/// std140 `Uniforms { float changingNum; float xOffset; float yOffset; }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub changing_num: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    _pad: f32,
}

pub fn update(time: &FrameTime, _size: (u32, u32)) -> Uniforms {
    let offset = anim::offsets(time.elapsed);
    Uniforms {
        changing_num: anim::wave(time.elapsed),
        x_offset: offset.x,
        y_offset: offset.y,
        _pad: 0.0,
    }
}

pub fn mesh() -> Result<Mesh> {
    Ok(Mesh::indexed(VertexLayout::new(&ATTRIBUTES)?, &VERTICES, &INDICES)?)
}

pub fn config() -> Result<DemoConfig<Uniforms>> {
    let (vert, frag) = crate::shader_paths("offset_quad");
    Ok(DemoConfig::new("lumen: offset quad", vert, frag, mesh()?, update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_engine::demo::Demo;
    use wgpu::ShaderStages;

    #[test]
    fn mesh_matches_vertex_data() {
        let mesh = mesh().unwrap();
        assert_eq!(mesh.vertex_bytes().len(), 4 * 24);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.draw_count(), INDICES.len() as u32);
    }

    #[test]
    fn shaders_accept_layout_and_uniforms() {
        let demo = Demo::new(config().unwrap()).unwrap();
        let block = demo.program().interface().uniform_block().unwrap();
        assert_eq!(block.visibility, ShaderStages::VERTEX | ShaderStages::FRAGMENT);
        assert_eq!(size_of::<Uniforms>(), 16);
    }
}
