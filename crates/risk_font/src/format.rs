//! On-disk layout of a font asset.
//!
//! All integers and floats in the count and header table are little-endian.
//! The glyph region after the table is opaque here; it is copied into the
//! atlas verbatim.

use crate::atlas::CharInfo;
use crate::error::{FontError, FontResult};

/// Bytes taken by the leading font count.
pub const COUNT_SIZE: usize = std::mem::size_of::<u16>();

/// One font variant as stored in the asset.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawFontHeader {
    pub size: f32,
    pub line_height: f32,
    /// Byte offset of this font's glyph table within the glyph region.
    pub data_offset: u32,
    /// Number of `CharInfo` records in this font's glyph table.
    pub data_length: u32,
    pub layer: u32,
    pub hash_id: u32,
}

impl RawFontHeader {
    /// Serialized size. Six 4-byte fields, no padding.
    pub const SIZE: usize = 24;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            size: f32::from_bits(read_u32_le(bytes, 0)),
            line_height: f32::from_bits(read_u32_le(bytes, 4)),
            data_offset: read_u32_le(bytes, 8),
            data_length: read_u32_le(bytes, 12),
            layer: read_u32_le(bytes, 16),
            hash_id: read_u32_le(bytes, 20),
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.line_height.to_le_bytes());
        out.extend_from_slice(&self.data_offset.to_le_bytes());
        out.extend_from_slice(&self.data_length.to_le_bytes());
        out.extend_from_slice(&self.layer.to_le_bytes());
        out.extend_from_slice(&self.hash_id.to_le_bytes());
    }
}

const _: () = assert!(std::mem::size_of::<RawFontHeader>() == RawFontHeader::SIZE);

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

/// Read the count and header table from the front of `buffer`.
///
/// The headers are copied out; `buffer` is left untouched. Returns the
/// headers and the number of bytes they occupied, which is where the glyph
/// region starts.
pub fn parse_header_table(buffer: &[u8]) -> FontResult<(Vec<RawFontHeader>, usize)> {
    let Some(&[lo, hi]) = buffer.get(..COUNT_SIZE) else {
        return Err(FontError::malformed(format!(
            "asset is {} bytes, too short for the font count",
            buffer.len()
        )));
    };
    let count = usize::from(u16::from_le_bytes([lo, hi]));
    let table_end = COUNT_SIZE + count * RawFontHeader::SIZE;

    let table = buffer.get(COUNT_SIZE..table_end).ok_or_else(|| {
        FontError::malformed(format!(
            "header table declares {count} fonts ({} bytes) but only {} bytes follow the count",
            count * RawFontHeader::SIZE,
            buffer.len() - COUNT_SIZE
        ))
    })?;

    let headers = table
        .chunks_exact(RawFontHeader::SIZE)
        .map(RawFontHeader::decode)
        .collect();

    Ok((headers, table_end))
}

/// Serialize fonts and their glyph region into the asset layout.
///
/// `glyphs` is the full glyph region; each header's `data_offset` and
/// `data_length` must already describe where its table sits inside it.
pub fn encode_font_asset(headers: &[RawFontHeader], glyphs: &[CharInfo]) -> FontResult<Vec<u8>> {
    let count = u16::try_from(headers.len()).map_err(|_| FontError::TooManyFonts(headers.len()))?;
    let glyph_bytes: &[u8] = bytemuck::cast_slice(glyphs);

    let mut out = Vec::new();
    out.try_reserve_exact(COUNT_SIZE + headers.len() * RawFontHeader::SIZE + glyph_bytes.len())?;
    out.extend_from_slice(&count.to_le_bytes());
    for header in headers {
        header.write_to(&mut out);
    }
    out.extend_from_slice(glyph_bytes);
    Ok(out)
}
