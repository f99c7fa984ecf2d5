use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use super::TextureError;

/// Decoded RGBA8 image with its mip chain.
#[derive(Debug, Clone)]
pub struct TextureImage {
    width: u32,
    height: u32,
    /// Channels in the source file (3 for a typical JPEG). Pixels are always
    /// stored as RGBA8 regardless.
    source_channels: u8,
    /// Level 0 first; each level halves both dimensions down to 1x1.
    levels: Vec<RgbaImage>,
}

impl TextureImage {
    /// Reads and decodes an image file (PNG or JPEG).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| TextureError::Decode {
            path: Some(path.to_path_buf()),
            source,
        })?;
        let texture = Self::from_image(decoded)?;
        log::info!(
            "loaded texture '{}' ({}x{}, {} channels, {} mip levels)",
            path.display(),
            texture.width,
            texture.height,
            texture.source_channels,
            texture.mip_level_count()
        );
        Ok(texture)
    }

    pub fn from_memory(bytes: &[u8]) -> Result<Self, TextureError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|source| TextureError::Decode { path: None, source })?;
        Self::from_image(decoded)
    }

    pub fn from_image(image: DynamicImage) -> Result<Self, TextureError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }

        let source_channels = image.color().channel_count();
        Ok(Self {
            width,
            height,
            source_channels,
            levels: mip_chain(image.to_rgba8()),
        })
    }

    /// Two-color checkerboard with `cells` squares per side.
    pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let base = RgbaImage::from_fn(size, size, |x, y| {
            image::Rgba(if (x / cell + y / cell) % 2 == 0 { a } else { b })
        });
        Self {
            width: size,
            height: size,
            source_channels: 4,
            levels: mip_chain(base),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn source_channels(&self) -> u8 {
        self.source_channels
    }

    pub fn mip_level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// RGBA8 pixels of mip `level`.
    pub fn level(&self, level: u32) -> Option<&RgbaImage> {
        self.levels.get(level as usize)
    }

    /// Creates the texture, uploads every mip level, and builds the view and
    /// sampler (mirrored repeat, trilinear).
    pub fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> GpuTexture {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen texture"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: self.mip_level_count(),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip, level) in self.levels.iter().enumerate() {
            let (w, h) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen texture sampler"),
            address_mode_u: wgpu::AddressMode::MirrorRepeat,
            address_mode_v: wgpu::AddressMode::MirrorRepeat,
            address_mode_w: wgpu::AddressMode::MirrorRepeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        GpuTexture {
            _texture: texture,
            view,
            sampler,
        }
    }
}

/// Device-side texture, view and sampler.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![base];
    loop {
        let (w, h) = levels[levels.len() - 1].dimensions();
        if w == 1 && h == 1 {
            return levels;
        }
        let next = image::imageops::resize(
            &levels[levels.len() - 1],
            (w / 2).max(1),
            (h / 2).max(1),
            FilterType::Triangle,
        );
        levels.push(next);
    }
}
