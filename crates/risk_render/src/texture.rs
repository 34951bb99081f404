//! Texture handles and the stores that own them.
//!
//! A [`Texture`] is a plain copyable handle: an id plus the pixel size of the
//! image it was decoded from. The pixels (or GPU storage) live in whichever
//! [`TextureStore`] issued the handle, and only that store can release them.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use risk_core::{logi, ResourceLoader};

use crate::error::{TextureError, TextureResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    /// Wrap an id issued elsewhere, e.g. one recorded by a host renderer.
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

pub trait TextureStore {
    /// Decode the PNG at `path` and upload it under a fresh id.
    fn load_texture(&mut self, path: &Path) -> TextureResult<Texture>;

    /// Release the storage behind `texture`. Unknown handles are ignored.
    fn unload_texture(&mut self, texture: Texture);

    /// Re-decode `path` into the storage of an existing handle. The id is
    /// kept; the returned handle carries the new dimensions.
    fn reload_texture(&mut self, path: &Path, texture: Texture) -> TextureResult<Texture>;
}

/// Decode PNG bytes into 32-bit RGBA.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgba8())
}

pub fn load_image(resources: &dyn ResourceLoader, path: &Path) -> TextureResult<RgbaImage> {
    let bytes = resources.load_resource(path)?;
    logi!("Loading png {}", path.display());
    let image = decode_rgba(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    logi!(
        "Loaded png {} ({}x{}, {} bytes)",
        path.display(),
        image.width(),
        image.height(),
        bytes.len()
    );
    Ok(image)
}

/// Issues ids from 1 up to `u32::MAX - 1`. Ids are never reused within one
/// store.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn allocate(&mut self) -> TextureResult<TextureId> {
        let id = TextureId(self.next);
        self.next = self.next.checked_add(1).ok_or(TextureError::IdsExhausted)?;
        Ok(id)
    }
}

/// Keeps decoded pixels in memory. Used by headless hosts and tools that
/// need texture dimensions without a GPU.
pub struct CpuTextureStore<R> {
    resources: R,
    ids: IdAllocator,
    images: HashMap<TextureId, RgbaImage>,
}

impl<R: ResourceLoader> CpuTextureStore<R> {
    pub fn new(resources: R) -> Self {
        Self {
            resources,
            ids: IdAllocator::new(),
            images: HashMap::new(),
        }
    }

    pub fn pixels(&self, id: TextureId) -> Option<&RgbaImage> {
        self.images.get(&id)
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut R {
        &mut self.resources
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl<R: ResourceLoader> TextureStore for CpuTextureStore<R> {
    fn load_texture(&mut self, path: &Path) -> TextureResult<Texture> {
        let _profile = risk_core::Profile::new("Loading texture");
        let image = load_image(&self.resources, path)?;
        let texture = Texture {
            id: self.ids.allocate()?,
            width: image.width(),
            height: image.height(),
        };
        self.images.insert(texture.id, image);
        Ok(texture)
    }

    fn unload_texture(&mut self, texture: Texture) {
        let _profile = risk_core::Profile::new("Unloading texture");
        if self.images.remove(&texture.id).is_none() {
            log::warn!("Unload of unknown texture {}", texture.id);
        }
    }

    fn reload_texture(&mut self, path: &Path, texture: Texture) -> TextureResult<Texture> {
        let _profile = risk_core::Profile::new("Reloading texture");
        if !self.images.contains_key(&texture.id) {
            return Err(TextureError::UnknownTexture(texture.id));
        }
        let image = load_image(&self.resources, path)?;
        let reloaded = Texture {
            id: texture.id,
            width: image.width(),
            height: image.height(),
        };
        self.images.insert(texture.id, image);
        Ok(reloaded)
    }
}
