//! A textured cube seen from a camera circling it once every 2π seconds.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use lumen_engine::demo::{anim, DemoConfig};
use lumen_engine::geometry::{AttributeKind, Mesh, VertexAttribute, VertexLayout};
use lumen_engine::texture::TextureImage;
use lumen_engine::time::FrameTime;

pub const TEXTURE_FILE: &str = "texture.png";

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

const fn v(pos: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex { pos, color, uv }
}

const C0: [f32; 3] = [1.0, 0.8, 0.4];
const C1: [f32; 3] = [1.0, 0.7, 0.5];
const C2: [f32; 3] = [1.0, 0.6, 0.6];

/// Four corners per face, so every face carries its own texture coordinates.
pub const VERTICES: [Vertex; 24] = [
    // +z
    v([0.5, 0.5, 0.5], C0, [1.0, 1.0]),
    v([0.5, -0.5, 0.5], C1, [1.0, 0.0]),
    v([-0.5, -0.5, 0.5], C2, [0.0, 0.0]),
    v([-0.5, 0.5, 0.5], C1, [0.0, 1.0]),
    // -z
    v([0.5, 0.5, -0.5], C0, [1.0, 1.0]),
    v([0.5, -0.5, -0.5], C1, [1.0, 0.0]),
    v([-0.5, -0.5, -0.5], C2, [0.0, 0.0]),
    v([-0.5, 0.5, -0.5], C1, [0.0, 1.0]),
    // +x
    v([0.5, 0.5, 0.5], C0, [1.0, 1.0]),
    v([0.5, -0.5, 0.5], C1, [1.0, 0.0]),
    v([0.5, -0.5, -0.5], C2, [0.0, 0.0]),
    v([0.5, 0.5, -0.5], C1, [0.0, 1.0]),
    // -x
    v([-0.5, 0.5, 0.5], C0, [1.0, 1.0]),
    v([-0.5, -0.5, 0.5], C1, [1.0, 0.0]),
    v([-0.5, -0.5, -0.5], C2, [0.0, 0.0]),
    v([-0.5, 0.5, -0.5], C1, [0.0, 1.0]),
    // +y
    v([0.5, 0.5, 0.5], C0, [1.0, 1.0]),
    v([-0.5, 0.5, 0.5], C1, [1.0, 0.0]),
    v([-0.5, 0.5, -0.5], C2, [0.0, 0.0]),
    v([0.5, 0.5, -0.5], C1, [0.0, 1.0]),
    // -y
    v([0.5, -0.5, 0.5], C0, [1.0, 1.0]),
    v([-0.5, -0.5, 0.5], C1, [1.0, 0.0]),
    v([-0.5, -0.5, -0.5], C2, [0.0, 0.0]),
    v([0.5, -0.5, -0.5], C1, [0.0, 1.0]),
];

#[rustfmt::skip]
pub const INDICES: [u32; 36] = [
     0,  1,  3,   1,  2,  3,
     4,  5,  7,   5,  6,  7,
     8,  9, 11,   9, 10, 11,
    12, 13, 15,  13, 14, 15,
    16, 17, 19,  17, 18, 19,
    20, 21, 23,  21, 22, 23,
];

pub const ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute::new(0, AttributeKind::Position3),
    VertexAttribute::new(1, AttributeKind::Color3),
    VertexAttribute::new(2, AttributeKind::TexCoord2),
];

/// std140 `Uniforms { mat4 model; mat4 camera; mat4 projection; float changingNum; }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub model: Mat4,
    pub camera: Mat4,
    pub projection: Mat4,
    pub changing_num: f32,
    _pad: [f32; 3],
}

pub fn update(time: &FrameTime, size: (u32, u32)) -> Uniforms {
    Uniforms {
        model: anim::model(),
        camera: anim::orbit_camera(time.elapsed),
        projection: anim::projection(anim::aspect(size)),
        changing_num: anim::pulse(time.elapsed),
        _pad: [0.0; 3],
    }
}

pub fn mesh() -> Result<Mesh> {
    Ok(Mesh::indexed(VertexLayout::new(&ATTRIBUTES)?, &VERTICES, &INDICES)?)
}

/// Loads the bundled texture, falling back to a checkerboard if it cannot be
/// read.
pub fn texture() -> TextureImage {
    let path = crate::asset_path(TEXTURE_FILE);
    TextureImage::load(&path).unwrap_or_else(|e| {
        log::warn!("{e}; using a checkerboard instead");
        TextureImage::checkerboard(256, 8, [255, 255, 255, 255], [40, 40, 40, 255])
    })
}

pub fn config() -> Result<DemoConfig<Uniforms>> {
    let (vert, frag) = crate::shader_paths("orbit_cube");
    Ok(DemoConfig::new("lumen: orbit cube", vert, frag, mesh()?, update).with_texture(texture()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_engine::demo::Demo;
    use lumen_engine::time::FrameClock;

    #[test]
    fn mesh_matches_vertex_data() {
        let mesh = mesh().unwrap();
        assert_eq!(mesh.layout().stride(), 32);
        assert_eq!(mesh.vertex_bytes().len(), 24 * 32);
        assert_eq!(mesh.draw_count(), 36);
    }

    #[test]
    fn every_face_is_a_unit_square() {
        for face in VERTICES.chunks(4) {
            let axis = (0..3)
                .find(|&a| face.iter().all(|v| v.pos[a] == face[0].pos[a]))
                .expect("face is axis aligned");
            assert_eq!(face[0].pos[axis].abs(), 0.5);
        }
    }

    #[test]
    fn shaders_accept_layout_uniforms_and_texture() {
        let demo = Demo::new(config().unwrap()).unwrap();
        let iface = demo.program().interface();
        assert!(iface.resource(0, 1).is_some());
        assert!(iface.resource(0, 2).is_some());
        assert_eq!(size_of::<Uniforms>(), 208);
    }

    #[test]
    fn bundled_texture_decodes() {
        let tex = TextureImage::load(crate::asset_path(TEXTURE_FILE)).unwrap();
        assert!(tex.width() > 0 && tex.height() > 0);
        assert!(tex.mip_level_count() > 1);
    }

    #[test]
    fn update_fills_every_matrix() {
        let mut clock = FrameClock::default();
        let u = update(&clock.tick(), (500, 500));
        assert_eq!(u.model, Mat4::IDENTITY);
        assert_ne!(u.camera, Mat4::IDENTITY);
        assert!(u.projection.is_finite());
    }
}
