//! Row-reversal and resampler scenarios.

use imageforge_core::pixel_format::PixelFormat;
use imageforge_core::resample::{resample, EdgeMode, Filter};
use imageforge_core::row_reverse::reverse_bc_rows;

/// Scenario 5: a BC3 4x8 image (two 4x4 blocks stacked vertically) has its block order
/// swapped top-to-bottom, and within each block the 4-row alpha index table is swapped
/// 0<->3, 1<->2 (the colour index table swaps the same way).
#[test]
fn bc3_row_reversal_swaps_block_order_and_index_rows() {
    // Block 0 (top): alpha0=255, alpha1=0, alpha index rows tagged 0,1,2,3 (4 bits each,
    // padded into the 3-bit-per-pixel packing via a distinct low-order pattern per row) and a
    // recognisable colour index byte per row.
    let mut block0 = [0u8; 16];
    block0[0] = 255; // alpha0
    block0[1] = 0; // alpha1
                    // alpha index bits left at 0 for all 16 pixels; rows are distinguished below via colour indices.
    block0[8] = 0xAA; // colour0 lo
    block0[9] = 0x00;
    block0[10] = 0x00;
    block0[11] = 0x00;
    block0[12] = 0x10; // colour index row 0
    block0[13] = 0x20; // colour index row 1
    block0[14] = 0x30; // colour index row 2
    block0[15] = 0x40; // colour index row 3

    let mut block1 = [0u8; 16];
    block1[0] = 128;
    block1[1] = 128;
    block1[8] = 0x55;
    block1[12] = 0x50;
    block1[13] = 0x60;
    block1[14] = 0x70;
    block1[15] = 0x80;

    let mut data = Vec::with_capacity(32);
    data.extend_from_slice(&block0);
    data.extend_from_slice(&block1);
    let original = data.clone();

    reverse_bc_rows(PixelFormat::Bc3Dxt4Dxt5, &mut data, 4, 8);

    // Block order is swapped: what was block1 is now first, block0 is now second.
    let new_block0 = &data[0..16];
    let new_block1 = &data[16..32];

    // Colour-index rows within each block are swapped 0<->3, 1<->2 (swizzle_bc1_indices).
    assert_eq!(new_block0[12], block1[15]);
    assert_eq!(new_block0[13], block1[14]);
    assert_eq!(new_block0[14], block1[13]);
    assert_eq!(new_block0[15], block1[12]);

    assert_eq!(new_block1[12], block0[15]);
    assert_eq!(new_block1[13], block0[14]);
    assert_eq!(new_block1[14], block0[13]);
    assert_eq!(new_block1[15], block0[12]);

    // Alpha endpoints travel with their block (only the index rows inside are swizzled).
    assert_eq!(new_block0[0], block1[0]);
    assert_eq!(new_block0[1], block1[1]);
    assert_eq!(new_block1[0], block0[0]);
    assert_eq!(new_block1[1], block0[1]);

    // The transform is an involution: reversing twice restores the original buffer.
    reverse_bc_rows(PixelFormat::Bc3Dxt4Dxt5, &mut data, 4, 8);
    assert_eq!(data, original);
}

/// Scenario 6: resampling a 4x4 checkerboard up to 8x8 and back down to 4x4 with
/// `LanczosNormal` roughly recovers the original, within a generous per-channel MSE bound.
#[test]
fn lanczos_round_trip_resample_recovers_checkerboard() {
    let src: Vec<[u8; 4]> = (0..16)
        .map(|i| {
            let (x, y) = (i % 4, i / 4);
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            [v, v, v, 255]
        })
        .collect();

    let upscaled = resample(&src, 4, 4, 8, 8, Filter::LanczosNormal, EdgeMode::Clamp);
    assert_eq!(upscaled.len(), 64);
    let round_tripped = resample(&upscaled, 8, 8, 4, 4, Filter::LanczosNormal, EdgeMode::Clamp);
    assert_eq!(round_tripped.len(), 16);

    let mut sum_sq = 0f64;
    let mut count = 0usize;
    for (a, b) in src.iter().zip(round_tripped.iter()) {
        for c in 0..3 {
            let diff = a[c] as f64 - b[c] as f64;
            sum_sq += diff * diff;
            count += 1;
        }
    }
    let mse = sum_sq / count as f64;
    assert!(mse < 2500.0, "round-trip MSE too high: {mse}");
}
