//! BC4 (single-channel) and BC5 (two-channel) decode.
//!
//! `texture2ddecoder` only exposes the unsigned interpretation; the signed variants need
//! different endpoint arithmetic (endpoints are signed bytes, and the low-anchor case clamps to
//! -127/127 rather than 0/255), so both paths are implemented directly here against the
//! documented 8-byte block layout (2 endpoint bytes + 16 packed 3-bit indices) — the same
//! layout as the alpha channel of a BC2/BC3 block.
use crate::block::scratch::{crop_rgba8, scratch_dims};
use crate::error::DecodeError;
use crate::pixel_format::{num_blocks, PixelFormat};
use crate::types::Rgba8;

fn alpha_indices(block: &[u8]) -> [u8; 16] {
    let mut bits: u64 = 0;
    for (i, b) in block[2..8].iter().enumerate() {
        bits |= (*b as u64) << (8 * i);
    }
    let mut idx = [0u8; 16];
    for (i, slot) in idx.iter_mut().enumerate() {
        *slot = ((bits >> (3 * i)) & 0x7) as u8;
    }
    idx
}

fn interpolate_unsigned(c0: u8, c1: u8) -> [u8; 8] {
    let (a, b) = (c0 as i32, c1 as i32);
    let mut v = [0u8; 8];
    v[0] = c0;
    v[1] = c1;
    if c0 > c1 {
        for i in 2..8 {
            v[i] = (((8 - i) as i32 * a + (i - 1) as i32 * b) / 7) as u8;
        }
    } else {
        for i in 2..6 {
            v[i] = (((4 - (i - 2)) as i32 * a + (i - 1) as i32 * b) / 5) as u8;
        }
        v[6] = 0;
        v[7] = 255;
    }
    v
}

fn interpolate_signed(c0: i8, c1: i8) -> [i8; 8] {
    let (a, b) = (c0 as i32, c1 as i32);
    let mut v = [0i8; 8];
    v[0] = c0;
    v[1] = c1;
    if c0 > c1 {
        for i in 2..8 {
            v[i] = (((8 - i) as i32 * a + (i - 1) as i32 * b) / 7) as i8;
        }
    } else {
        for i in 2..6 {
            v[i] = (((4 - (i - 2)) as i32 * a + (i - 1) as i32 * b) / 5) as i8;
        }
        v[6] = -127;
        v[7] = 127;
    }
    v
}

/// Rebases a signed `[-127, 127]` sample into `[0, 255]` for RGBA8 output, per the spec's
/// "signed BC4/BC5 blocks are rebased by +128" rule.
fn rebase_signed(v: i8) -> u8 {
    (v as i32 + 128).clamp(0, 255) as u8
}

fn decode_channel_block(block: &[u8], signed: bool) -> [u8; 16] {
    let idx = alpha_indices(block);
    if signed {
        let table = interpolate_signed(block[0] as i8, block[1] as i8);
        let mut out = [0u8; 16];
        for i in 0..16 {
            out[i] = rebase_signed(table[idx[i] as usize]);
        }
        out
    } else {
        let table = interpolate_unsigned(block[0], block[1]);
        let mut out = [0u8; 16];
        for i in 0..16 {
            out[i] = table[idx[i] as usize];
        }
        out
    }
}

/// Decodes a BC4 (single red channel) buffer to RGBA8: red in R, 0 in G/B, 255 in A (matching
/// the packed-decoder convention for other single-channel formats).
pub fn decode_bc4(fmt: PixelFormat, data: &[u8], width: u32, height: u32) -> Result<Vec<Rgba8>, DecodeError> {
    let signed = matches!(fmt, PixelFormat::Bc4Ati1S);
    let (sw, sh) = scratch_dims(4, 4, width, height);
    let blocks_w = num_blocks(4, width) as usize;
    let blocks_h = num_blocks(4, height) as usize;
    if data.len() != blocks_w * blocks_h * 8 {
        return Err(DecodeError::BlockDecode(format!(
            "BC4 buffer is {} bytes, expected {}",
            data.len(),
            blocks_w * blocks_h * 8
        )));
    }
    let mut tile = vec![[0u8, 0, 0, 255]; (sw * sh) as usize];
    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let block = &data[(by * blocks_w + bx) * 8..][..8];
            let r = decode_channel_block(block, signed);
            for py in 0..4 {
                for px in 0..4 {
                    let x = bx * 4 + px;
                    let y = by * 4 + py;
                    tile[y * sw as usize + x] = [r[py * 4 + px], 0, 0, 255];
                }
            }
        }
    }
    Ok(crop_rgba8(&tile, sw, width, height))
}

/// Decodes a BC5 (two-channel, typically tangent-space normal XY) buffer to RGBA8: R, G
/// populated, B=0, A=255.
pub fn decode_bc5(fmt: PixelFormat, data: &[u8], width: u32, height: u32) -> Result<Vec<Rgba8>, DecodeError> {
    let signed = matches!(fmt, PixelFormat::Bc5Ati2S);
    let (sw, sh) = scratch_dims(4, 4, width, height);
    let blocks_w = num_blocks(4, width) as usize;
    let blocks_h = num_blocks(4, height) as usize;
    if data.len() != blocks_w * blocks_h * 16 {
        return Err(DecodeError::BlockDecode(format!(
            "BC5 buffer is {} bytes, expected {}",
            data.len(),
            blocks_w * blocks_h * 16
        )));
    }
    let mut tile = vec![[0u8, 0, 0, 255]; (sw * sh) as usize];
    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let base = (by * blocks_w + bx) * 16;
            let r_block = &data[base..base + 8];
            let g_block = &data[base + 8..base + 16];
            let r = decode_channel_block(r_block, signed);
            let g = decode_channel_block(g_block, signed);
            for py in 0..4 {
                for px in 0..4 {
                    let x = bx * 4 + px;
                    let y = by * 4 + py;
                    tile[y * sw as usize + x] = [r[py * 4 + px], g[py * 4 + px], 0, 255];
                }
            }
        }
    }
    Ok(crop_rgba8(&tile, sw, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bc4_unsigned_solid_block_is_flat() {
        // c0=200 > c1=100 interpolation anchors; all indices 0 -> value c0=200 everywhere.
        let mut block = [0u8; 8];
        block[0] = 200;
        block[1] = 100;
        // indices all zero already.
        let out = decode_bc4(PixelFormat::Bc4Ati1U, &block, 4, 4).unwrap();
        for px in out {
            assert_eq!(px, [200, 0, 0, 255]);
        }
    }

    #[test]
    fn bc4_signed_rebases_by_128() {
        let mut block = [0u8; 8];
        block[0] = 127i8 as u8; // c0 = 127
        block[1] = (-127i8) as u8; // c1 = -127
        let out = decode_bc4(PixelFormat::Bc4Ati1S, &block, 4, 4).unwrap();
        // index 0 selects c0=127 -> rebased to 255.
        assert_eq!(out[0], [255, 0, 0, 255]);
    }
}
