use std::fmt;
use std::path::PathBuf;

use crate::device::GpuInit;
use crate::geometry::Mesh;
use crate::render::Color;
use crate::texture::TextureImage;
use crate::time::FrameTime;
use crate::window::RuntimeConfig;

/// Per-frame uniform callback: frame timing and drawable size in, uniform
/// block out.
pub type UpdateFn<U> = Box<dyn FnMut(&FrameTime, (u32, u32)) -> U>;

/// Everything that distinguishes one demo from another.
pub struct DemoConfig<U> {
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub mesh: Mesh,
    pub texture: Option<TextureImage>,
    pub clear_color: Color,
    pub update: UpdateFn<U>,

    pub runtime: RuntimeConfig,
    pub gpu: GpuInit,
}

impl<U> DemoConfig<U> {
    /// White clear color, no texture, default window and GPU settings.
    pub fn new(
        title: impl Into<String>,
        vertex_shader: impl Into<PathBuf>,
        fragment_shader: impl Into<PathBuf>,
        mesh: Mesh,
        update: impl FnMut(&FrameTime, (u32, u32)) -> U + 'static,
    ) -> Self {
        Self {
            vertex_shader: vertex_shader.into(),
            fragment_shader: fragment_shader.into(),
            mesh,
            texture: None,
            clear_color: Color::WHITE,
            update: Box::new(update),
            runtime: RuntimeConfig {
                title: title.into(),
                ..RuntimeConfig::default()
            },
            gpu: GpuInit::default(),
        }
    }

    pub fn with_texture(mut self, texture: TextureImage) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}

impl<U> fmt::Debug for DemoConfig<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoConfig")
            .field("title", &self.runtime.title)
            .field("vertex_shader", &self.vertex_shader)
            .field("fragment_shader", &self.fragment_shader)
            .field("draw_count", &self.mesh.draw_count())
            .field("textured", &self.texture.is_some())
            .field("clear_color", &self.clear_color)
            .finish_non_exhaustive()
    }
}
