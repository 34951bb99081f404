pub mod error;
pub mod gpu_texture;
pub mod texture;

pub use error::{TextureError, TextureResult};
pub use gpu_texture::{GpuTexture, GpuTextureStore};
pub use texture::{decode_rgba, load_image, CpuTextureStore, Texture, TextureId, TextureStore};
