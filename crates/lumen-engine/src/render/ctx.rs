/// Renderer-facing context (device/queue + attachment formats + drawable size).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    /// Drawable size in physical pixels.
    pub size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format,
            size,
        }
    }

    /// Width over height; 1.0 for a degenerate size.
    pub fn aspect(&self) -> f32 {
        let (w, h) = self.size;
        if w == 0 || h == 0 { 1.0 } else { w as f32 / h as f32 }
    }
}

/// Target for drawing (encoder + color view + optional depth view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: Option<&'a wgpu::TextureView>,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
        }
    }
}
