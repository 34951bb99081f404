//! Bitmap font atlases.
//!
//! A font asset is a small binary file next to a PNG page with the same base
//! name. The file holds a count, one header per font variant, and then the
//! glyph metric tables of all variants back to back:
//!
//! ```text
//! [u16 count][count x RawFontHeader][CharInfo ... CharInfo]
//! ```
//!
//! Loading turns that into a [`FontAtlas`]: the page texture, a table of
//! [`Font`]s, and one glyph table that every font indexes into.

pub mod atlas;
pub mod error;
pub mod format;
pub mod loader;

pub use atlas::{build_atlas, layer_remap, load_font_atlas, CharInfo, Font, FontAtlas, DEFAULT_CHAR};
pub use error::{FontError, FontResult};
pub use format::{encode_font_asset, parse_header_table, RawFontHeader};
pub use loader::{load_font, reload_font, unload_font};
