//! Block (tile-compressed) decoders.
//!
//! BC1/BC2/BC3/BC6H/BC7, ETC1/ETC2, EAC R11/RG11, ASTC, and PVRTC are all decoded through
//! `texture2ddecoder`, a narrow adapter: this module only reshapes its `u32` BGRA output into
//! this crate's `Rgba8`/`Rgbaf` buffers and crops the block-aligned scratch tile down to the
//! real image size. BC4/BC5 are decoded directly in [`bc45`] since the signed variants need
//! endpoint arithmetic the crate doesn't expose.

mod bc45;
pub mod scratch;

use crate::error::DecodeError;
use crate::pixel_format::{num_blocks, PixelFormat};
use crate::types::{DecodedBuffer, Rgba8, Rgbaf};
use scratch::{crop_rgba8, scratch_dims};

fn u32_bgra_to_rgba8(pixels: &[u32]) -> Vec<Rgba8> {
    pixels
        .iter()
        .map(|&p| {
            let b = (p & 0xFF) as u8;
            let g = ((p >> 8) & 0xFF) as u8;
            let r = ((p >> 16) & 0xFF) as u8;
            let a = ((p >> 24) & 0xFF) as u8;
            [r, g, b, a]
        })
        .collect()
}

/// Scans a decoded BC1 tile for DXT1's "implicit alpha" encoding: a block whose stored
/// `colour0 <= colour1` (as raw u16) uses index `0b11` to mean fully transparent rather than
/// the two-thirds-blend colour. A DXT1 surface that contains at least one block with
/// `colour0 <= colour1` *and* at least one `0b11` index should be promoted to
/// [`PixelFormat::Bc1Dxt1A`] by the caller (the container parser), per the "first mip only"
/// scan described for DDS DXT1 loading.
pub fn bc1_block_has_alpha_index(data: &[u8], width: u32, height: u32) -> bool {
    let blocks_w = num_blocks(4, width) as usize;
    let blocks_h = num_blocks(4, height) as usize;
    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let off = (by * blocks_w + bx) * 8;
            if off + 8 > data.len() {
                return false;
            }
            let block = &data[off..off + 8];
            let c0 = u16::from_le_bytes([block[0], block[1]]);
            let c1 = u16::from_le_bytes([block[2], block[3]]);
            if c0 > c1 {
                continue;
            }
            let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
            let has_transparent_index = (0..16).any(|i| (indices >> (2 * i)) & 0b11 == 0b11);
            if has_transparent_index {
                return true;
            }
        }
    }
    false
}

fn decode_via_texture2ddecoder(
    fmt: PixelFormat,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u32>, DecodeError> {
    use texture2ddecoder::{
        decode_astc, decode_bc1, decode_bc2, decode_bc3, decode_bc6, decode_bc7, decode_eacr11,
        decode_eacr11_signed, decode_eacrg11, decode_eacrg11_signed, decode_etc1, decode_etc2_rgb,
        decode_etc2_rgba8, decode_etc2_rgba1, decode_pvrtc,
    };

    let (bw, bh) = (fmt.block_w(), fmt.block_h());
    let (sw, sh) = scratch_dims(bw, bh, width, height);
    let mut out = vec![0u32; (sw * sh) as usize];
    let w = sw as usize;
    let h = sh as usize;

    let result = match fmt {
        PixelFormat::Bc1Dxt1 | PixelFormat::Bc1Dxt1A => decode_bc1(data, w, h, &mut out),
        PixelFormat::Bc2Dxt2Dxt3 => decode_bc2(data, w, h, &mut out),
        PixelFormat::Bc3Dxt4Dxt5 => decode_bc3(data, w, h, &mut out),
        PixelFormat::Bc6U => decode_bc6(data, w, h, &mut out, false),
        PixelFormat::Bc6S => decode_bc6(data, w, h, &mut out, true),
        PixelFormat::Bc7 => decode_bc7(data, w, h, &mut out),
        PixelFormat::Etc1 => decode_etc1(data, w, h, &mut out),
        PixelFormat::Etc2Rgb => decode_etc2_rgb(data, w, h, &mut out),
        PixelFormat::Etc2Rgba => decode_etc2_rgba8(data, w, h, &mut out),
        PixelFormat::Etc2Rgba1 => decode_etc2_rgba1(data, w, h, &mut out),
        PixelFormat::EacR11U => decode_eacr11(data, w, h, &mut out),
        PixelFormat::EacR11S => decode_eacr11_signed(data, w, h, &mut out),
        PixelFormat::EacRg11U => decode_eacrg11(data, w, h, &mut out),
        PixelFormat::EacRg11S => decode_eacrg11_signed(data, w, h, &mut out),
        PixelFormat::PvrBpp4 | PixelFormat::Pvr2Bpp4 => decode_pvrtc(data, w, h, &mut out, true),
        PixelFormat::PvrBpp2 | PixelFormat::Pvr2Bpp2 => decode_pvrtc(data, w, h, &mut out, false),
        _ if fmt.is_astc() => {
            let (bw, bh) = (fmt.block_w(), fmt.block_h());
            decode_astc(data, w, h, bw as usize, bh as usize, &mut out)
        }
        other => return Err(DecodeError::UnsupportedFormat(format!("{other:?}"))),
    };
    result.map_err(|e| DecodeError::BlockDecode(e.to_string()))?;
    Ok(out)
}

/// Decodes any block-compressed format into a [`DecodedBuffer`]. BC6H (both sign variants) and
/// ASTC produce HDR output (ASTC always carries alpha, even when the source block had none);
/// every other family produces LDR RGBA8.
pub fn decode_block(fmt: PixelFormat, data: &[u8], width: u32, height: u32) -> Result<DecodedBuffer, DecodeError> {
    match fmt {
        PixelFormat::Bc4Ati1U | PixelFormat::Bc4Ati1S => {
            Ok(DecodedBuffer::Ldr(bc45::decode_bc4(fmt, data, width, height)?))
        }
        PixelFormat::Bc5Ati2U | PixelFormat::Bc5Ati2S => {
            Ok(DecodedBuffer::Ldr(bc45::decode_bc5(fmt, data, width, height)?))
        }
        PixelFormat::PvrHdrBpp8 | PixelFormat::PvrHdrBpp6 | PixelFormat::Pvr2HdrBpp8 | PixelFormat::Pvr2HdrBpp6 => {
            Err(DecodeError::UnsupportedFormat(format!(
                "{fmt:?}: PVRTC-II / PVR HDR variants have no decoder in this crate"
            )))
        }
        PixelFormat::Bc6U | PixelFormat::Bc6S => {
            let (bw, bh) = (fmt.block_w(), fmt.block_h());
            let (sw, sh) = scratch_dims(bw, bh, width, height);
            let words = decode_via_texture2ddecoder(fmt, data, width, height)?;
            // One packed BGRA8888 word per pixel, same as every other texture2ddecoder format;
            // alpha is forced to 1.0, matching the "BC6H has no alpha channel" constraint.
            let tile: Vec<Rgbaf> = words
                .iter()
                .map(|&p| {
                    let b = (p & 0xFF) as f32 / 255.0;
                    let g = ((p >> 8) & 0xFF) as f32 / 255.0;
                    let r = ((p >> 16) & 0xFF) as f32 / 255.0;
                    [r, g, b, 1.0]
                })
                .collect();
            let cropped = crop_rgbaf(&tile, sw, width, height);
            Ok(DecodedBuffer::Hdr(cropped))
        }
        fmt if fmt.is_astc() => {
            let (bw, bh) = (fmt.block_w(), fmt.block_h());
            let (sw, sh) = scratch_dims(bw, bh, width, height);
            let words = decode_via_texture2ddecoder(fmt, data, width, height)?;
            let tile: Vec<Rgbaf> = words
                .iter()
                .map(|&p| {
                    let b = (p & 0xFF) as f32 / 255.0;
                    let g = ((p >> 8) & 0xFF) as f32 / 255.0;
                    let r = ((p >> 16) & 0xFF) as f32 / 255.0;
                    let a = ((p >> 24) & 0xFF) as f32 / 255.0;
                    [r, g, b, a]
                })
                .collect();
            Ok(DecodedBuffer::Hdr(crop_rgbaf(&tile, sw, width, height)))
        }
        _ => {
            let (bw, bh) = (fmt.block_w(), fmt.block_h());
            let (sw, sh) = scratch_dims(bw, bh, width, height);
            let words = decode_via_texture2ddecoder(fmt, data, width, height)?;
            let tile = u32_bgra_to_rgba8(&words);
            Ok(DecodedBuffer::Ldr(crop_rgba8(&tile, sw, width, height)))
        }
    }
}

fn crop_rgbaf(tile: &[Rgbaf], scratch_w: u32, width: u32, height: u32) -> Vec<Rgbaf> {
    if scratch_w == width {
        return tile[..(width * height) as usize].to_vec();
    }
    let mut out = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        let row_start = (y * scratch_w) as usize;
        out.extend_from_slice(&tile[row_start..row_start + width as usize]);
    }
    out
}
