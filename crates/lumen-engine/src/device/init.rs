/// GPU context settings, fixed for the lifetime of the window.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// `Fifo` (vsync) paces the render loop; nothing else does.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when `None` or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Depth attachment format; `None` renders without depth testing.
    pub depth_format: Option<wgpu::TextureFormat>,

    pub power_preference: wgpu::PowerPreference,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; backends may ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            // Small meshes and one texture; run on GL/WebGL-class adapters too.
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
