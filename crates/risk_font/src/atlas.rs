//! In-memory font atlas.
//!
//! The atlas keeps the glyph region exactly as it was in the asset, and every
//! font owns its own decoded `CharInfo` table. A font also remembers the byte
//! range it was decoded from, so callers can still see where it sat in the
//! region. Ranges are checked against the region before decoding.

use std::mem::size_of;
use std::ops::Range;

use risk_core::logw;
use risk_render::Texture;

use crate::error::{FontError, FontResult};
use crate::format::{parse_header_table, RawFontHeader};

/// Character drawn when a glyph is missing from a font.
pub const DEFAULT_CHAR: char = '_';

/// Glyph metrics for one character: its rect on the page in UV space, the
/// pen offset to its top-left corner, and the horizontal advance.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CharInfo {
    pub uv: [f32; 4],
    pub offset: [f32; 2],
    pub advance: f32,
}

/// Stored layers 0 and 2 are swapped at runtime; every other layer passes
/// through. Applying it twice is the identity.
pub fn layer_remap(layer: u32) -> u32 {
    match layer {
        0 => 2,
        2 => 0,
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f32,
    pub line_height: f32,
    pub page: Texture,
    pub layer: u32,
    pub hash_id: u32,
    pub default_char: char,
    chars: Vec<CharInfo>,
    data_range: Range<usize>,
}

impl Font {
    pub fn chars(&self) -> &[CharInfo] {
        &self.chars
    }

    pub fn chars_len(&self) -> usize {
        self.chars.len()
    }

    pub fn char_info(&self, index: usize) -> Option<&CharInfo> {
        self.chars.get(index)
    }

    /// Byte range of this font's records within the glyph region.
    pub fn chars_byte_range(&self) -> Range<usize> {
        self.data_range.clone()
    }

    pub fn chars_byte_offset(&self) -> usize {
        self.data_range.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontAtlas {
    page: Texture,
    fonts: Vec<Font>,
    glyph_data: Vec<u8>,
}

impl FontAtlas {
    pub fn page(&self) -> Texture {
        self.page
    }

    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    pub fn fonts_len(&self) -> usize {
        self.fonts.len()
    }

    pub fn font(&self, index: usize) -> Option<&Font> {
        self.fonts.get(index)
    }

    pub fn font_by_hash(&self, hash_id: u32) -> Option<&Font> {
        self.fonts.iter().find(|font| font.hash_id == hash_id)
    }

    /// The glyph region as stored in the asset.
    pub fn glyph_data(&self) -> &[u8] {
        &self.glyph_data
    }

    /// Raw bytes `font` was decoded from. Empty for a font from another
    /// atlas whose range does not fit this region.
    pub fn char_bytes(&self, font: &Font) -> &[u8] {
        self.glyph_data
            .get(font.chars_byte_range())
            .unwrap_or_default()
    }

    /// Size of the atlas laid out as one block: atlas header, font table,
    /// glyph region.
    pub fn logical_size(&self) -> usize {
        size_of::<FontAtlas>() + self.fonts.len() * size_of::<Font>() + self.glyph_data.len()
    }

    /// Point the atlas and every font at a new page.
    pub(crate) fn set_page(&mut self, page: Texture) {
        self.page = page;
        for font in &mut self.fonts {
            font.page = page;
        }
    }
}

fn decode_chars(bytes: &[u8]) -> FontResult<Vec<CharInfo>> {
    let mut chars = Vec::new();
    chars.try_reserve_exact(bytes.len() / size_of::<CharInfo>())?;
    chars.extend(
        bytes
            .chunks_exact(size_of::<CharInfo>())
            .map(bytemuck::pod_read_unaligned::<CharInfo>),
    );
    Ok(chars)
}

/// Build an atlas from parsed headers and the glyph region that followed
/// them in the asset.
///
/// The glyph region must be exactly the sum of every font's table, and each
/// font's table must lie inside it. `data_offset` is a byte offset and need
/// not fall on a record boundary.
pub fn build_atlas(
    headers: &[RawFontHeader],
    glyph_data: &[u8],
    texture: Texture,
) -> FontResult<FontAtlas> {
    let record_size = size_of::<CharInfo>();

    let mut expected_bytes = 0usize;
    for (index, header) in headers.iter().enumerate() {
        expected_bytes = (header.data_length as usize)
            .checked_mul(record_size)
            .and_then(|bytes| expected_bytes.checked_add(bytes))
            .ok_or_else(|| {
                FontError::malformed(format!("font {index}: glyph table size overflows"))
            })?;
    }
    if glyph_data.len() != expected_bytes {
        return Err(FontError::malformed(format!(
            "glyph region is {} bytes, headers describe {} bytes",
            glyph_data.len(),
            expected_bytes
        )));
    }

    let mut region = Vec::new();
    region.try_reserve_exact(glyph_data.len())?;
    region.extend_from_slice(glyph_data);

    let mut fonts = Vec::new();
    fonts.try_reserve_exact(headers.len())?;

    for (index, header) in headers.iter().enumerate() {
        let start = header.data_offset as usize;
        let end = (header.data_length as usize)
            .checked_mul(record_size)
            .and_then(|bytes| start.checked_add(bytes))
            .filter(|&end| end <= region.len())
            .ok_or_else(|| {
                FontError::malformed(format!(
                    "font {index}: {} glyphs at offset {start} run past the {}-byte glyph region",
                    header.data_length,
                    region.len()
                ))
            })?;

        let layer = layer_remap(header.layer);
        logw!(
            "font {}: size {} line height {} layer {} -> {} hash {:#x} bytes {}..{}",
            index,
            header.size,
            header.line_height,
            header.layer,
            layer,
            header.hash_id,
            start,
            end
        );

        fonts.push(Font {
            size: header.size,
            line_height: header.line_height,
            page: texture,
            layer,
            hash_id: header.hash_id,
            default_char: DEFAULT_CHAR,
            chars: decode_chars(&region[start..end])?,
            data_range: start..end,
        });
    }

    Ok(FontAtlas {
        page: texture,
        fonts,
        glyph_data: region,
    })
}

/// Parse a whole font asset against an already loaded page.
pub fn load_font_atlas(asset: &[u8], texture: Texture) -> FontResult<FontAtlas> {
    let (headers, consumed) = parse_header_table(asset)?;
    build_atlas(&headers, &asset[consumed..], texture)
}
