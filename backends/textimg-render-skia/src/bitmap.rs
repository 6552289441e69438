//! Embedded bitmap glyphs (sbix, CBDT/CBLC, EBDT/EBLC)
//!
//! Color emoji fonts ship their glyphs as images at a handful of strike sizes.
//! This module works out where such an image lands relative to the pen origin
//! and decodes it into a [`Surface`] that can be composited at that spot.

use skrifa::bitmap::{BitmapData, BitmapFormat, BitmapGlyph, BitmapStrikes, MaskData, Origin};
use skrifa::instance::Size;
use skrifa::raw::TableProvider;
use skrifa::{FontRef, GlyphId};

use textimg_core::{
    error::{RenderError, Result},
    Color, Surface,
};

/// Where a strike image lands, relative to the pen origin on the baseline (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub left: f32,
    pub top: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Image height once scaled to the requested pixel size
    pub height: f32,
}

/// Whether glyphs of this font should come from its bitmap strikes
///
/// Color strikes always win. Monochrome EBDT strikes are only used when the
/// font has no outlines to fall back on.
pub(crate) fn prefers_strikes(font: &FontRef<'_>, has_outlines: bool) -> bool {
    let strikes = BitmapStrikes::new(font);
    if strikes.is_empty() {
        return false;
    }
    match strikes.format() {
        Some(BitmapFormat::Sbix) | Some(BitmapFormat::Cbdt) => true,
        _ => !has_outlines,
    }
}

/// Strike sizes (ppem) available in the font
pub fn strike_sizes(font: &FontRef<'_>) -> Vec<f32> {
    BitmapStrikes::new(font).iter().map(|s| s.ppem()).collect()
}

pub(crate) fn lookup<'a>(font: &FontRef<'a>, glyph_id: GlyphId, px: f32) -> Option<BitmapGlyph<'a>> {
    BitmapStrikes::new(font).glyph_for_size(Size::new(px), glyph_id)
}

/// Position a strike glyph drawn at `px` pixels per em
pub(crate) fn placement(font: &FontRef<'_>, glyph: &BitmapGlyph<'_>, px: f32) -> Placement {
    let units_per_em = font
        .head()
        .map(|head| head.units_per_em() as f32)
        .unwrap_or(1000.0);
    let font_units = px / units_per_em;
    let scale_x = px / glyph.ppem_x.max(1.0);
    let scale_y = px / glyph.ppem_y.max(1.0);

    // sbix strikes without a vertical bearing sit 100 units lower, as CoreText draws them
    let mut bearing_y = glyph.bearing_y;
    if bearing_y == 0.0 && BitmapStrikes::new(font).format() == Some(BitmapFormat::Sbix) {
        bearing_y = 100.0;
    }

    let origin_shift = match glyph.placement_origin {
        Origin::TopLeft => 0.0,
        Origin::BottomLeft => -(glyph.height as f32),
    };

    Placement {
        left: -glyph.bearing_x * font_units - glyph.inner_bearing_x * scale_x,
        top: bearing_y * font_units + (origin_shift - glyph.inner_bearing_y) * scale_y,
        scale_x,
        scale_y,
        height: glyph.height as f32 * scale_y,
    }
}

/// Decode the strike image; monochrome masks take the fill color
pub(crate) fn decode(glyph: &BitmapGlyph<'_>, fill: Color) -> Result<Surface> {
    match &glyph.data {
        BitmapData::Png(data) => decode_png(data),
        BitmapData::Bgra(data) => decode_bgra(data, glyph.width, glyph.height),
        BitmapData::Mask(mask) => decode_mask(mask, glyph.width, glyph.height, fill),
    }
}

fn decode_mask(mask: &MaskData<'_>, width: u32, height: u32, fill: Color) -> Result<Surface> {
    mask_to_surface(mask.data, mask.bpp, mask.is_packed, width, height, fill)
}

fn decode_png(data: &[u8]) -> Result<Surface> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| RenderError::BitmapDecodeFailed(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| RenderError::BitmapDecodeFailed(e.to_string()))?;
    let buf = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => buf.to_vec(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(
                RenderError::BitmapDecodeFailed("palette was not expanded".to_string()).into(),
            )
        },
    };
    Surface::from_rgba(info.width, info.height, rgba)
}

/// BGRA strike data is already premultiplied
fn decode_bgra(data: &[u8], width: u32, height: u32) -> Result<Surface> {
    let rgba = data
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0], px[3]])
        .collect();
    Surface::from_premultiplied(width, height, rgba)
}

fn mask_to_surface(
    data: &[u8],
    bpp: u8,
    is_packed: bool,
    width: u32,
    height: u32,
    fill: Color,
) -> Result<Surface> {
    let coverage = unpack_mask(data, bpp, is_packed, width, height)
        .ok_or_else(|| RenderError::BitmapDecodeFailed(format!("{bpp}-bit mask")))?;
    let rgba = coverage
        .into_iter()
        .flat_map(|a| {
            let alpha = (a as u32 * fill.a as u32 / 255) as u8;
            [fill.r, fill.g, fill.b, alpha]
        })
        .collect();
    Surface::from_rgba(width, height, rgba)
}

/// Expand a 1, 2, 4 or 8 bit coverage mask to one byte per pixel
///
/// Packed masks are one continuous bit stream; unpacked rows start on a byte boundary.
fn unpack_mask(data: &[u8], bpp: u8, is_packed: bool, width: u32, height: u32) -> Option<Vec<u8>> {
    if !matches!(bpp, 1 | 2 | 4 | 8) {
        return None;
    }
    let bpp = bpp as usize;
    let (width, height) = (width as usize, height as usize);
    let max = (1u32 << bpp) - 1;
    let row_bits = if is_packed {
        width * bpp
    } else {
        (width * bpp).div_ceil(8) * 8
    };

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let bit = y * row_bits + x * bpp;
            let byte = *data.get(bit / 8)?;
            let shift = 8 - bpp - bit % 8;
            let value = (byte as u32 >> shift) & max;
            out.push((value * 255 / max) as u8);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_one_bit_rows_are_byte_aligned() {
        // 3x2, unpacked: each row padded to a byte
        let data = [0b1010_0000, 0b0110_0000];
        let out = unpack_mask(&data, 1, false, 3, 2).unwrap();
        assert_eq!(out, vec![255, 0, 255, 0, 255, 255]);
    }

    #[test]
    fn test_unpack_one_bit_packed_stream() {
        // 3x2, packed: six bits back to back
        let data = [0b1010_1100];
        let out = unpack_mask(&data, 1, true, 3, 2).unwrap();
        assert_eq!(out, vec![255, 0, 255, 0, 255, 255]);
    }

    #[test]
    fn test_unpack_eight_bit_is_identity() {
        let data = [0, 128, 255, 7];
        assert_eq!(unpack_mask(&data, 8, false, 2, 2).unwrap(), data.to_vec());
    }

    #[test]
    fn test_unpack_rejects_short_data_and_odd_depths() {
        assert!(unpack_mask(&[0xff], 8, false, 2, 2).is_none());
        assert!(unpack_mask(&[0xff; 4], 3, false, 2, 2).is_none());
    }

    #[test]
    fn test_mask_takes_fill_color() {
        let surface = mask_to_surface(&[255, 0], 8, false, 2, 1, Color::rgb(255, 0, 0)).unwrap();
        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(1, 0).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_bgra_swaps_channels() {
        let surface = decode_bgra(&[10, 20, 30, 255], 1, 1).unwrap();
        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(30, 20, 10)));
    }
}
