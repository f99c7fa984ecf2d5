//! A single triangle whose vertex colors pulse from black to full and back.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use lumen_engine::demo::{anim, DemoConfig};
use lumen_engine::geometry::{AttributeKind, Mesh, VertexAttribute, VertexLayout};
use lumen_engine::time::FrameTime;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
}

pub const VERTICES: [Vertex; 3] = [
    Vertex { pos: [-0.5, -0.5, 0.0], color: [1.0, 0.0, 0.0] },
    Vertex { pos: [0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0] },
    Vertex { pos: [0.0, 0.5, 0.0], color: [0.0, 0.0, 1.0] },
];

pub const ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute::new(0, AttributeKind::Position3),
    VertexAttribute::new(1, AttributeKind::Color3),
];

/// std140 `Uniforms { float changingNum; }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub changing_num: f32,
    _pad: [f32; 3],
}

pub fn update(time: &FrameTime, _size: (u32, u32)) -> Uniforms {
    Uniforms {
        changing_num: anim::pulse(time.elapsed),
        ..Uniforms::default()
    }
}

pub fn mesh() -> Result<Mesh> {
    Ok(Mesh::non_indexed(VertexLayout::new(&ATTRIBUTES)?, &VERTICES)?)
}

pub fn config() -> Result<DemoConfig<Uniforms>> {
    let (vert, frag) = crate::shader_paths("pulse");
    Ok(DemoConfig::new("lumen: pulse", vert, frag, mesh()?, update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_engine::demo::Demo;
    use lumen_engine::time::FrameClock;

    #[test]
    fn mesh_matches_vertex_data() {
        let mesh = mesh().unwrap();
        assert_eq!(mesh.vertex_bytes().len(), 3 * 24);
        assert_eq!(mesh.layout().stride(), 24);
        assert_eq!(mesh.indices(), None);
        assert_eq!(mesh.draw_count(), 3);
    }

    #[test]
    fn shaders_accept_layout_and_uniforms() {
        let demo = Demo::new(config().unwrap()).unwrap();
        let block = demo.program().interface().uniform_block().unwrap();
        assert_eq!(block.visibility, wgpu::ShaderStages::FRAGMENT);
        assert_eq!(size_of::<Uniforms>(), 16);
    }

    #[test]
    fn uniform_pulse_is_bounded() {
        let mut clock = FrameClock::default();
        let u = update(&clock.tick(), (500, 500));
        assert!((0.0..=1.0).contains(&u.changing_num));
    }
}
