//! Font lifecycle: load, unload and reload an atlas together with its page.
//!
//! The page lives next to the font asset with a `.png` extension and is owned
//! by the atlas: unloading the atlas releases the page through the same
//! store that loaded it.

use std::path::Path;

use risk_core::{change_extension, loge, logi, Profile, ResourceLoader};
use risk_render::{Texture, TextureStore};

use crate::atlas::{load_font_atlas, FontAtlas};
use crate::error::FontResult;

fn page_path(path: &Path) -> std::path::PathBuf {
    change_extension(path, ".png")
}

fn read_atlas(
    resources: &dyn ResourceLoader,
    path: &Path,
    texture: Texture,
) -> FontResult<FontAtlas> {
    let asset = resources.load_resource(path)?;
    load_font_atlas(&asset, texture)
}

/// Load the page and the font asset at `path` into a new atlas.
///
/// On failure nothing stays loaded: a page that was already uploaded is
/// released again before the error is returned.
pub fn load_font(
    resources: &dyn ResourceLoader,
    textures: &mut dyn TextureStore,
    path: &Path,
) -> FontResult<FontAtlas> {
    let _profile = Profile::new("Loading font atlas");

    let texture = textures.load_texture(&page_path(path))?;
    match read_atlas(resources, path, texture) {
        Ok(atlas) => {
            logi!(
                "Loaded font atlas {} ({} fonts, {} glyph bytes, page {}x{})",
                path.display(),
                atlas.fonts_len(),
                atlas.glyph_data().len(),
                texture.width,
                texture.height
            );
            Ok(atlas)
        }
        Err(err) => {
            loge!("Failed to load font atlas {}: {}", path.display(), err);
            textures.unload_texture(texture);
            Err(err)
        }
    }
}

/// Release the atlas and its page.
pub fn unload_font(textures: &mut dyn TextureStore, atlas: FontAtlas) {
    let _profile = Profile::new("Unloading font atlas");
    textures.unload_texture(atlas.page());
}

/// Replace `atlas` with a fresh load of `path`, reusing its page handle.
///
/// The font asset is parsed before the page is touched. If either step
/// fails, `atlas` is left as it was.
pub fn reload_font(
    resources: &dyn ResourceLoader,
    textures: &mut dyn TextureStore,
    path: &Path,
    atlas: &mut FontAtlas,
) -> FontResult<()> {
    let _profile = Profile::new("Reloading font atlas");

    let mut reloaded = read_atlas(resources, path, atlas.page())?;
    let texture = textures.reload_texture(&page_path(path), atlas.page())?;
    reloaded.set_page(texture);

    logi!(
        "Reloaded font atlas {} ({} fonts, page {}x{})",
        path.display(),
        reloaded.fonts_len(),
        texture.width,
        texture.height
    );
    *atlas = reloaded;
    Ok(())
}
