//! Shared helpers for decoding a 4x4-tiled (or ASTC/PVR variable-tile) block format into a
//! scratch buffer sized to the block grid, then cropping to the image's real dimensions.

use crate::pixel_format::num_blocks;
use crate::types::Rgba8;

/// Returns `(scratch_w, scratch_h)`: the image dimensions rounded up to a whole number of
/// blocks in each axis.
pub fn scratch_dims(block_w: u32, block_h: u32, width: u32, height: u32) -> (u32, u32) {
    (
        num_blocks(block_w, width) * block_w,
        num_blocks(block_h, height) * block_h,
    )
}

/// Crops a `scratch_w x scratch_h` RGBA8 tile (row-major, top-to-bottom) down to
/// `width x height`, dropping the padding blocks contribute past the image's real edge.
pub fn crop_rgba8(tile: &[Rgba8], scratch_w: u32, width: u32, height: u32) -> Vec<Rgba8> {
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
