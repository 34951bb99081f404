use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use risk_core::{loge, ResourceLoader};

use crate::error::{TextureError, TextureResult};
use crate::texture::{load_image, IdAllocator, Texture, TextureId, TextureStore};

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Texture store backed by wgpu. Every upload runs inside a validation error
/// scope; errors are logged and returned instead of being left for the
/// device's uncaptured-error handler.
pub struct GpuTextureStore<R> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    resources: R,
    ids: IdAllocator,
    textures: HashMap<TextureId, GpuTexture>,
}

impl<R: ResourceLoader> GpuTextureStore<R> {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, resources: R) -> Self {
        Self {
            device,
            queue,
            resources,
            ids: IdAllocator::new(),
            textures: HashMap::new(),
        }
    }

    pub fn get(&self, id: TextureId) -> Option<&GpuTexture> {
        self.textures.get(&id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn upload(&self, label: &str, image: &RgbaImage) -> TextureResult<GpuTexture> {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            loge!("after {} wgpu validation error: {}", label, err);
            texture.destroy();
            return Err(TextureError::Gpu(err.to_string()));
        }

        Ok(GpuTexture {
            texture,
            view,
            sampler,
        })
    }
}

impl<R: ResourceLoader> TextureStore for GpuTextureStore<R> {
    fn load_texture(&mut self, path: &Path) -> TextureResult<Texture> {
        let _profile = risk_core::Profile::new("Loading texture");
        let image = load_image(&self.resources, path)?;
        let id = self.ids.allocate()?;
        let label = path.display().to_string();
        let gpu = self.upload(&label, &image)?;

        let texture = Texture {
            id,
            width: image.width(),
            height: image.height(),
        };
        self.textures.insert(texture.id, gpu);
        Ok(texture)
    }

    fn unload_texture(&mut self, texture: Texture) {
        let _profile = risk_core::Profile::new("Unloading texture");
        match self.textures.remove(&texture.id) {
            Some(gpu) => gpu.texture.destroy(),
            None => log::warn!("Unload of unknown texture {}", texture.id),
        }
    }

    fn reload_texture(&mut self, path: &Path, texture: Texture) -> TextureResult<Texture> {
        let _profile = risk_core::Profile::new("Reloading texture");
        if !self.textures.contains_key(&texture.id) {
            return Err(TextureError::UnknownTexture(texture.id));
        }
        let image = load_image(&self.resources, path)?;
        let label = path.display().to_string();

        // wgpu textures are fixed-size, so a reload swaps in new storage
        // under the existing id.
        let gpu = self.upload(&label, &image)?;
        if let Some(old) = self.textures.insert(texture.id, gpu) {
            old.texture.destroy();
        }

        Ok(Texture {
            id: texture.id,
            width: image.width(),
            height: image.height(),
        })
    }
}
