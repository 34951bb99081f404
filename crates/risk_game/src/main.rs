//! Risk native layer -- headless host.
//!
//! Loads the game config (first argument, defaults otherwise), brings up a
//! `Game` context and loads every configured font atlas through a CPU texture
//! store. It then goes through the same motions as the device build: the game
//! is stopped while fonts are reloaded, resumed, stepped for a short burst of
//! frames until it finishes, and torn down. This is the path asset builds are
//! smoke-tested through before they ship.

mod config;
mod game;

use std::path::{Path, PathBuf};

use risk_core::{loge, logi, FsResources};
use risk_font::{load_font, reload_font, unload_font, FontAtlas};
use risk_render::CpuTextureStore;

use config::{load_config_from_path, GameConfig};
use game::Game;

const SCREEN_WIDTH: u32 = 1280;
const SCREEN_HEIGHT: u32 = 720;
const SMOKE_FRAMES: u32 = 120;

fn log_atlas(path: &Path, atlas: &FontAtlas) {
    logi!("{}: {} fonts", path.display(), atlas.fonts_len());
    for font in atlas.fonts() {
        logi!(
            "  font {:#010x}: size {} line height {} layer {} glyphs {}",
            font.hash_id,
            font.size,
            font.line_height,
            font.layer,
            font.chars_len()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    risk_core::logging::init();
    logi!("Risk native layer starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => load_config_from_path(Path::new(&path))?,
        None => GameConfig::default(),
    };

    let mut game = Game::initialize(&config, SCREEN_WIDTH, SCREEN_HEIGHT)?;
    let resources = FsResources::new(&config.asset_root);
    let mut textures = CpuTextureStore::new(resources.clone());

    let mut atlases: Vec<(PathBuf, FontAtlas)> = Vec::new();
    let mut failures = 0usize;
    for path in &config.fonts {
        match load_font(&resources, &mut textures, path) {
            Ok(atlas) => {
                log_atlas(path, &atlas);
                atlases.push((path.clone(), atlas));
            }
            Err(err) => {
                loge!("Font {} failed: {}", path.display(), err);
                failures += 1;
            }
        }
    }

    // Fonts are only swapped while the game is not stepping.
    game.stop();
    for (path, atlas) in &mut atlases {
        if let Err(err) = reload_font(&resources, &mut textures, path, atlas) {
            loge!("Font {} failed to reload: {}", path.display(), err);
            failures += 1;
        }
    }
    game.resume();

    let mut frames = 0;
    while game.is_initialized() && !game.is_finished() {
        game.step(config.fixed_dt(), |_| {});
        frames += 1;
        if frames >= SMOKE_FRAMES {
            game.finish();
        }
    }
    logi!(
        "Ran {} frames on a {}x{} {:?} screen, {} fps, acceleration {:?}",
        frames,
        game.screen.width,
        game.screen.height,
        game.screen.orientation(),
        game.fps,
        game.sensor.acceleration
    );

    for (_, atlas) in atlases {
        unload_font(&mut textures, atlas);
    }
    game.terminate();

    if failures > 0 {
        return Err(format!("{failures} font operations failed").into());
    }
    Ok(())
}
