//! Pre-decode row reversal (flip) for packed formats and for BC1/BC2/BC3 via
//! index-table swizzle.
//!
//! Every other block/packed format either cannot be reversed before decode (non-byte-aligned
//! packed formats) or simply isn't worth the bookkeeping (ETC/EAC/ASTC/PVR): those are flipped
//! post-decode on the resulting RGBA8 buffer instead, which is always possible.

use crate::pixel_format::{num_blocks, PixelFormat};

/// Returns true when `fmt`'s raw bytes for an image of the given `height` can be reversed
/// in place (or via block swap) without first decoding to RGBA8.
pub fn can_reverse(fmt: PixelFormat, height: u32) -> bool {
    if fmt.is_packed() {
        return fmt.bits_per_pixel() % 8 == 0;
    }
    matches!(
        fmt,
        PixelFormat::Bc1Dxt1 | PixelFormat::Bc1Dxt1A | PixelFormat::Bc2Dxt2Dxt3 | PixelFormat::Bc3Dxt4Dxt5
    ) && height % 4 == 0
}

/// Reverses the row order of a packed-format buffer in place.
///
/// `bytes_per_pixel` must equal `fmt.bits_per_pixel() / 8`; panics if that quotient has a
/// remainder (callers should have checked [`can_reverse`] first).
pub fn reverse_packed_rows(data: &mut [u8], width: u32, height: u32, bytes_per_pixel: u32) {
    let stride = (width * bytes_per_pixel) as usize;
    assert_eq!(data.len(), stride * height as usize);
    let mut top = 0usize;
    let mut bottom = (height as usize).saturating_sub(1) * stride;
    while top < bottom {
        let (head, tail) = data.split_at_mut(bottom);
        head[top..top + stride].swap_with_slice(&mut tail[..stride]);
        top += stride;
        bottom -= stride;
    }
}

/// Reverses the row order of a BC1/BC2/BC3 buffer, swapping block rows top-to-bottom and,
/// within each block, swapping the 4-row colour index table (rows 0<->3, 1<->2). BC2 also
/// swaps its 4x16-bit explicit alpha rows; BC3 also swaps its 4x12-bit packed alpha-index rows.
///
/// `height` must be a multiple of 4 (checked by [`can_reverse`]).
pub fn reverse_bc_rows(fmt: PixelFormat, data: &mut [u8], width: u32, height: u32) {
    debug_assert!(height % 4 == 0);
    let block_size = fmt.bytes_per_block() as usize;
    let blocks_w = num_blocks(4, width) as usize;
    let blocks_h = num_blocks(4, height) as usize;
    let row_bytes = blocks_w * block_size;
    assert_eq!(data.len(), row_bytes * blocks_h);

    let mut top = 0usize;
    let mut bottom = blocks_h.saturating_sub(1) * row_bytes;
    while top <= bottom {
        for col in 0..blocks_w {
            let top_off = top + col * block_size;
            let bot_off = bottom + col * block_size;
            if top_off == bot_off {
                swizzle_block(fmt, &mut data[top_off..top_off + block_size]);
            } else {
                let (lo, hi) = if top_off < bot_off {
                    (top_off, bot_off)
                } else {
                    (bot_off, top_off)
                };
                let (left, right) = data.split_at_mut(hi);
                left[lo..lo + block_size].swap_with_slice(&mut right[..block_size]);
                swizzle_block(fmt, &mut data[lo..lo + block_size]);
                swizzle_block(fmt, &mut data[hi..hi + block_size]);
            }
        }
        if top == bottom {
            break;
        }
        top += row_bytes;
        if bottom < row_bytes {
            break;
        }
        bottom -= row_bytes;
    }
}

fn swizzle_block(fmt: PixelFormat, block: &mut [u8]) {
    match fmt {
        PixelFormat::Bc1Dxt1 | PixelFormat::Bc1Dxt1A => swizzle_bc1_indices(block),
        PixelFormat::Bc2Dxt2Dxt3 => {
            swizzle_explicit_alpha_rows(&mut block[0..8]);
            swizzle_bc1_indices(&mut block[8..16]);
        }
        PixelFormat::Bc3Dxt4Dxt5 => {
            swizzle_bc3_alpha_index_rows(&mut block[0..8]);
            swizzle_bc1_indices(&mut block[8..16]);
        }
        _ => unreachable!("swizzle_block called on non-BC1/2/3 format"),
    }
}

/// The last 4 bytes of a BC1 block (or the trailing 8 bytes of BC2/BC3) hold the colour index
/// table: one byte per pixel-row, four 2-bit indices each. Swapping rows 0<->3, 1<->2 is just a
/// byte swap since each row is already byte-aligned.
fn swizzle_bc1_indices(bc1_tail: &mut [u8]) {
    debug_assert_eq!(bc1_tail.len(), 8);
    bc1_tail.swap(4, 7);
    bc1_tail.swap(5, 6);
}

/// BC2's explicit alpha block: 4 rows of one u16 each (4 bits per pixel). Swap rows 0<->3, 1<->2.
fn swizzle_explicit_alpha_rows(alpha: &mut [u8]) {
    debug_assert_eq!(alpha.len(), 8);
    alpha.swap(0, 6);
    alpha.swap(1, 7);
    alpha.swap(2, 4);
    alpha.swap(3, 5);
}

/// BC3's alpha-index block: 2 endpoint bytes followed by 16 3-bit indices packed as a 48-bit
/// little-endian value across 6 bytes, 4 rows of 12 bits each. Swaps rows 0<->3, 1<->2.
fn swizzle_bc3_alpha_index_rows(alpha: &mut [u8]) {
    debug_assert_eq!(alpha.len(), 8);
    let mut packed = [0u8; 6];
    packed.copy_from_slice(&alpha[2..8]);
    let bits = read_bits48(&packed);

    let row = |r: u32| -> u64 { (bits >> (12 * r)) & 0xFFF };
    let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
    let swapped = r3 | (r2 << 12) | (r1 << 24) | (r0 << 36);

    write_bits48(&mut packed, swapped);
    alpha[2..8].copy_from_slice(&packed);
}

fn read_bits48(bytes: &[u8; 6]) -> u64 {
    let mut v = 0u64;
    for (i, b) in bytes.iter().enumerate() {
        v |= (*b as u64) << (8 * i);
    }
    v
}

fn write_bits48(bytes: &mut [u8; 6], v: u64) {
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = ((v >> (8 * i)) & 0xFF) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_reversal_is_an_involution() {
        let width = 3u32;
        let height = 5u32;
        let bpp = 4u32;
        let mut data: Vec<u8> = (0..(width * height * bpp) as usize).map(|i| i as u8).collect();
        let original = data.clone();
        reverse_packed_rows(&mut data, width, height, bpp);
        assert_ne!(data, original);
        reverse_packed_rows(&mut data, width, height, bpp);
        assert_eq!(data, original);
    }

    #[test]
    fn can_reverse_rules() {
        assert!(can_reverse(PixelFormat::R8G8B8A8, 7));
        assert!(!can_reverse(PixelFormat::Pal4Bit, 8));
        assert!(can_reverse(PixelFormat::Bc1Dxt1, 8));
        assert!(!can_reverse(PixelFormat::Bc1Dxt1, 6));
        assert!(!can_reverse(PixelFormat::Etc2Rgb, 8));
    }

    #[test]
    fn bc3_alpha_index_swizzle_is_an_involution() {
        let mut alpha = [10u8, 20u8, 0b001_010_01, 0b1_100_101_0u8, 0xAB, 0xCD, 0xEF, 0x12];
        let original = alpha;
        swizzle_bc3_alpha_index_rows(&mut alpha);
        assert_ne!(alpha, original);
        swizzle_bc3_alpha_index_rows(&mut alpha);
        assert_eq!(alpha, original);
    }

    #[test]
    fn bc1_block_buffer_reversal_is_an_involution() {
        // Two 4x4 blocks stacked vertically (4x8 image): 16 bytes total.
        let mut data: Vec<u8> = (0..16u8).collect();
        let original = data.clone();
        reverse_bc_rows(PixelFormat::Bc1Dxt1, &mut data, 4, 8);
        assert_ne!(data, original);
        reverse_bc_rows(PixelFormat::Bc1Dxt1, &mut data, 4, 8);
        assert_eq!(data, original);
    }
}
