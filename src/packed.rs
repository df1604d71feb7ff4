//! Decodes every packed pixel format to either an RGBA8 or an RGBAf buffer.

use half::f16;

use crate::error::DecodeError;
use crate::pixel_format::PixelFormat;
use crate::types::{DecodedBuffer, Rgba8, Rgbaf};

/// Default `max_range` for RGBM/RGBD decode when the caller doesn't override it.
pub const DEFAULT_MAX_RANGE: f32 = 8.0;

/// Decodes `data` (one of the packed [`PixelFormat`] variants) into a [`DecodedBuffer`].
///
/// `max_range` is only consulted for [`PixelFormat::R8G8B8M8`] and [`PixelFormat::R8G8B8D8`].
pub fn decode_packed(
    fmt: PixelFormat,
    data: &[u8],
    width: u32,
    height: u32,
    max_range: f32,
) -> Result<DecodedBuffer, DecodeError> {
    let pixel_count = (width as usize) * (height as usize);
    let bpp = fmt.bits_per_pixel();
    if bpp > 0 {
        let expected = pixel_count * (bpp as usize) / 8;
        if data.len() != expected {
            return Err(DecodeError::InvalidInput(format!(
                "expected {expected} bytes for {:?} at {width}x{height}, got {}",
                fmt,
                data.len()
            )));
        }
    }

    match fmt {
        PixelFormat::R8 | PixelFormat::L8 => Ok(DecodedBuffer::Ldr(map1(data, |r| [r, 0, 0, 255]))),
        PixelFormat::A8 => Ok(DecodedBuffer::Ldr(map1(data, |a| [0, 0, 0, a]))),
        PixelFormat::R8G8 => Ok(DecodedBuffer::Ldr(map2(data, |r, g| [r, g, 0, 255]))),
        PixelFormat::L8A8 => Ok(DecodedBuffer::Ldr(map2(data, |l, a| [l, 0, 0, a]))),
        PixelFormat::R8G8B8 => Ok(DecodedBuffer::Ldr(map3(data, |r, g, b| [r, g, b, 255]))),
        PixelFormat::B8G8R8 => Ok(DecodedBuffer::Ldr(map3(data, |b, g, r| [r, g, b, 255]))),
        PixelFormat::R8G8B8A8 => Ok(DecodedBuffer::Ldr(map4(data, |r, g, b, a| [r, g, b, a]))),
        PixelFormat::B8G8R8A8 => Ok(DecodedBuffer::Ldr(map4(data, |b, g, r, a| [r, g, b, a]))),

        PixelFormat::G3B5R5G3 => Ok(DecodedBuffer::Ldr(map_u16(data, decode_565))),
        PixelFormat::G4B4A4R4 => Ok(DecodedBuffer::Ldr(map_u16(data, decode_4444))),
        PixelFormat::B4A4R4G4 => Ok(DecodedBuffer::Ldr(map_u16(data, decode_4444_rev))),
        PixelFormat::G3B5A1R5G2 => Ok(DecodedBuffer::Ldr(map_u16(data, decode_5551))),
        PixelFormat::G2B5A1R5G3 => Ok(DecodedBuffer::Ldr(map_u16(data, decode_1555))),

        PixelFormat::R16 => Ok(DecodedBuffer::Ldr(map_msb8_1(data))),
        PixelFormat::R16G16 => Ok(DecodedBuffer::Ldr(map_msb8_2(data))),
        PixelFormat::R16G16B16 => Ok(DecodedBuffer::Ldr(map_msb8_3(data))),
        PixelFormat::R16G16B16A16 => Ok(DecodedBuffer::Ldr(map_msb8_4(data))),
        PixelFormat::R32 => Ok(DecodedBuffer::Ldr(map_msb32_1(data))),
        PixelFormat::R32G32 => Ok(DecodedBuffer::Ldr(map_msb32_2(data))),
        PixelFormat::R32G32B32 => Ok(DecodedBuffer::Ldr(map_msb32_3(data))),
        PixelFormat::R32G32B32A32 => Ok(DecodedBuffer::Ldr(map_msb32_4(data))),

        PixelFormat::R16f => Ok(DecodedBuffer::Hdr(map_f16_1(data))),
        PixelFormat::R16G16f => Ok(DecodedBuffer::Hdr(map_f16_2(data))),
        PixelFormat::R16G16B16f => Ok(DecodedBuffer::Hdr(map_f16_3(data))),
        PixelFormat::R16G16B16A16f => Ok(DecodedBuffer::Hdr(map_f16_4(data))),
        PixelFormat::R32f => Ok(DecodedBuffer::Hdr(map_f32_1(data))),
        PixelFormat::R32G32f => Ok(DecodedBuffer::Hdr(map_f32_2(data))),
        PixelFormat::R32G32B32f => Ok(DecodedBuffer::Hdr(map_f32_3(data))),
        PixelFormat::R32G32B32A32f => Ok(DecodedBuffer::Hdr(map_f32_4(data))),

        PixelFormat::R11G11B10uf => Ok(DecodedBuffer::Hdr(map_u32(data, decode_r11g11b10))),
        PixelFormat::B10G11R11uf => Ok(DecodedBuffer::Hdr(map_u32(data, decode_b10g11r11))),
        PixelFormat::R9G9B9E5uf => Ok(DecodedBuffer::Hdr(map_u32(data, decode_r9g9b9e5))),
        PixelFormat::E5B9G9R9uf => Ok(DecodedBuffer::Hdr(map_u32(data, decode_e5b9g9r9))),

        PixelFormat::R8G8B8M8 => Ok(DecodedBuffer::Hdr(map4f(data, |r, g, b, m| {
            decode_rgbm(r, g, b, m, max_range)
        }))),
        PixelFormat::R8G8B8D8 => Ok(DecodedBuffer::Hdr(map4f(data, |r, g, b, d| {
            decode_rgbd(r, g, b, d, max_range)
        }))),

        other => Err(DecodeError::UnsupportedFormat(format!(
            "{other:?} is not a packed format"
        ))),
    }
}

fn map1(data: &[u8], f: impl Fn(u8) -> Rgba8) -> Vec<Rgba8> {
    data.iter().map(|&r| f(r)).collect()
}

fn map2(data: &[u8], f: impl Fn(u8, u8) -> Rgba8) -> Vec<Rgba8> {
    data.chunks_exact(2).map(|c| f(c[0], c[1])).collect()
}

fn map3(data: &[u8], f: impl Fn(u8, u8, u8) -> Rgba8) -> Vec<Rgba8> {
    data.chunks_exact(3).map(|c| f(c[0], c[1], c[2])).collect()
}

fn map4(data: &[u8], f: impl Fn(u8, u8, u8, u8) -> Rgba8) -> Vec<Rgba8> {
    data.chunks_exact(4).map(|c| f(c[0], c[1], c[2], c[3])).collect()
}

fn map4f(data: &[u8], f: impl Fn(u8, u8, u8, u8) -> Rgbaf) -> Vec<Rgbaf> {
    data.chunks_exact(4).map(|c| f(c[0], c[1], c[2], c[3])).collect()
}

fn map_u16(data: &[u8], f: impl Fn(u16) -> Rgba8) -> Vec<Rgba8> {
    data.chunks_exact(2)
        .map(|c| f(u16::from_le_bytes([c[0], c[1]])))
        .collect()
}

fn map_u32(data: &[u8], f: impl Fn(u32) -> Rgbaf) -> Vec<Rgbaf> {
    data.chunks_exact(4)
        .map(|c| f(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
        .collect()
}

/// Normalizes an `n`-bit field to `[0, 255]` by dividing by its maximum value, not by
/// bit-shifting — shifting a 4-bit all-ones field left by 4 yields 240, not 255.
fn normalize(value: u32, bits: u32) -> u8 {
    let max = (1u32 << bits) - 1;
    ((value * 255 + max / 2) / max) as u8
}

fn decode_565(v: u16) -> Rgba8 {
    let v = v as u32;
    let g_lo = v & 0x7;
    let b = (v >> 3) & 0x1F;
    let r = (v >> 8) & 0x1F;
    let g_hi = (v >> 13) & 0x7;
    let g = g_lo | (g_hi << 3);
    [normalize(r, 5), normalize(g, 6), normalize(b, 5), 255]
}

fn decode_4444(v: u16) -> Rgba8 {
    let v = v as u32;
    let g = v & 0xF;
    let b = (v >> 4) & 0xF;
    let a = (v >> 8) & 0xF;
    let r = (v >> 12) & 0xF;
    [normalize(r, 4), normalize(g, 4), normalize(b, 4), normalize(a, 4)]
}

fn decode_4444_rev(v: u16) -> Rgba8 {
    let v = v as u32;
    let b = v & 0xF;
    let a = (v >> 4) & 0xF;
    let r = (v >> 8) & 0xF;
    let g = (v >> 12) & 0xF;
    [normalize(r, 4), normalize(g, 4), normalize(b, 4), normalize(a, 4)]
}

fn decode_5551(v: u16) -> Rgba8 {
    let v = v as u32;
    let g_lo = v & 0x7;
    let b = (v >> 3) & 0x1F;
    let a = (v >> 8) & 0x1;
    let r = (v >> 9) & 0x1F;
    let g_hi = (v >> 14) & 0x3;
    let g = g_lo | (g_hi << 3);
    [normalize(r, 5), normalize(g, 5), normalize(b, 5), normalize(a, 1)]
}

fn decode_1555(v: u16) -> Rgba8 {
    let v = v as u32;
    let g_lo = v & 0x3;
    let b = (v >> 2) & 0x1F;
    let a = (v >> 7) & 0x1;
    let r = (v >> 8) & 0x1F;
    let g_hi = (v >> 13) & 0x7;
    let g = g_lo | (g_hi << 2);
    [normalize(r, 5), normalize(g, 5), normalize(b, 5), normalize(a, 1)]
}

fn msb8(v: u16) -> u8 {
    (v >> 8) as u8
}

fn read_u16(c: &[u8]) -> u16 {
    u16::from_le_bytes([c[0], c[1]])
}

fn read_u32(c: &[u8]) -> u32 {
    u32::from_le_bytes([c[0], c[1], c[2], c[3]])
}

fn map_msb8_1(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(2).map(|c| [msb8(read_u16(c)), 0, 0, 255]).collect()
}

fn map_msb8_2(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(4)
        .map(|c| [msb8(read_u16(&c[0..2])), msb8(read_u16(&c[2..4])), 0, 255])
        .collect()
}

fn map_msb8_3(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(6)
        .map(|c| {
            [
                msb8(read_u16(&c[0..2])),
                msb8(read_u16(&c[2..4])),
                msb8(read_u16(&c[4..6])),
                255,
            ]
        })
        .collect()
}

fn map_msb8_4(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(8)
        .map(|c| {
            [
                msb8(read_u16(&c[0..2])),
                msb8(read_u16(&c[2..4])),
                msb8(read_u16(&c[4..6])),
                msb8(read_u16(&c[6..8])),
            ]
        })
        .collect()
}

fn msb32(v: u32) -> u8 {
    (v >> 24) as u8
}

fn map_msb32_1(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(4).map(|c| [msb32(read_u32(c)), 0, 0, 255]).collect()
}

fn map_msb32_2(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(8)
        .map(|c| [msb32(read_u32(&c[0..4])), msb32(read_u32(&c[4..8])), 0, 255])
        .collect()
}

fn map_msb32_3(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(12)
        .map(|c| {
            [
                msb32(read_u32(&c[0..4])),
                msb32(read_u32(&c[4..8])),
                msb32(read_u32(&c[8..12])),
                255,
            ]
        })
        .collect()
}

fn map_msb32_4(data: &[u8]) -> Vec<Rgba8> {
    data.chunks_exact(16)
        .map(|c| {
            [
                msb32(read_u32(&c[0..4])),
                msb32(read_u32(&c[4..8])),
                msb32(read_u32(&c[8..12])),
                msb32(read_u32(&c[12..16])),
            ]
        })
        .collect()
}

fn f16_at(c: &[u8]) -> f32 {
    f16::from_bits(read_u16(c)).to_f32()
}

fn map_f16_1(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(2).map(|c| [f16_at(c), 0.0, 0.0, 1.0]).collect()
}

fn map_f16_2(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(4)
        .map(|c| [f16_at(&c[0..2]), f16_at(&c[2..4]), 0.0, 1.0])
        .collect()
}

fn map_f16_3(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(6)
        .map(|c| [f16_at(&c[0..2]), f16_at(&c[2..4]), f16_at(&c[4..6]), 1.0])
        .collect()
}

fn map_f16_4(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(8)
        .map(|c| {
            [
                f16_at(&c[0..2]),
                f16_at(&c[2..4]),
                f16_at(&c[4..6]),
                f16_at(&c[6..8]),
            ]
        })
        .collect()
}

fn f32_at(c: &[u8]) -> f32 {
    f32::from_le_bytes([c[0], c[1], c[2], c[3]])
}

fn map_f32_1(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(4).map(|c| [f32_at(c), 0.0, 0.0, 1.0]).collect()
}

fn map_f32_2(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(8)
        .map(|c| [f32_at(&c[0..4]), f32_at(&c[4..8]), 0.0, 1.0])
        .collect()
}

fn map_f32_3(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(12)
        .map(|c| [f32_at(&c[0..4]), f32_at(&c[4..8]), f32_at(&c[8..12]), 1.0])
        .collect()
}

fn map_f32_4(data: &[u8]) -> Vec<Rgbaf> {
    data.chunks_exact(16)
        .map(|c| {
            [
                f32_at(&c[0..4]),
                f32_at(&c[4..8]),
                f32_at(&c[8..12]),
                f32_at(&c[12..16]),
            ]
        })
        .collect()
}

/// Decodes an unsigned mini-float with `exp_bits` exponent bits and `mant_bits` mantissa bits,
/// no sign bit (used by the 11/10-bit fields of `R11G11B10uf`).
fn decode_unsigned_minifloat(bits: u32, exp_bits: u32, mant_bits: u32) -> f32 {
    let bias = (1u32 << (exp_bits - 1)) - 1;
    let exp_max = (1u32 << exp_bits) - 1;
    let mant_max = (1u32 << mant_bits) as f32;
    let exponent = bits >> mant_bits;
    let mantissa = bits & ((1 << mant_bits) - 1);
    if exponent == 0 {
        (mantissa as f32 / mant_max) * 2f32.powi(1 - bias as i32)
    } else if exponent == exp_max {
        if mantissa == 0 {
            f32::INFINITY
        } else {
            f32::NAN
        }
    } else {
        (1.0 + mantissa as f32 / mant_max) * 2f32.powi(exponent as i32 - bias as i32)
    }
}

fn decode_uf11(bits: u32) -> f32 {
    decode_unsigned_minifloat(bits, 5, 6)
}

fn decode_uf10(bits: u32) -> f32 {
    decode_unsigned_minifloat(bits, 5, 5)
}

fn decode_r11g11b10(v: u32) -> Rgbaf {
    let r = decode_uf11(v & 0x7FF);
    let g = decode_uf11((v >> 11) & 0x7FF);
    let b = decode_uf10((v >> 22) & 0x3FF);
    [r, g, b, 1.0]
}

fn decode_b10g11r11(v: u32) -> Rgbaf {
    let b = decode_uf10(v & 0x3FF);
    let g = decode_uf11((v >> 10) & 0x7FF);
    let r = decode_uf11((v >> 21) & 0x7FF);
    [r, g, b, 1.0]
}

/// RGB9E5: three 9-bit mantissas sharing a 5-bit biased exponent, always interpreted without an
/// implicit leading one (there is no "normal" form for this format).
fn decode_shared_exp9(m: u32, exp: u32) -> f32 {
    const BIAS: i32 = 15;
    const MANT_BITS: i32 = 9;
    m as f32 * 2f32.powi(exp as i32 - BIAS - MANT_BITS)
}

fn decode_r9g9b9e5(v: u32) -> Rgbaf {
    let r_m = v & 0x1FF;
    let g_m = (v >> 9) & 0x1FF;
    let b_m = (v >> 18) & 0x1FF;
    let e = (v >> 27) & 0x1F;
    [
        decode_shared_exp9(r_m, e),
        decode_shared_exp9(g_m, e),
        decode_shared_exp9(b_m, e),
        1.0,
    ]
}

fn decode_e5b9g9r9(v: u32) -> Rgbaf {
    let b_m = v & 0x1FF;
    let g_m = (v >> 9) & 0x1FF;
    let r_m = (v >> 18) & 0x1FF;
    let e = (v >> 27) & 0x1F;
    [
        decode_shared_exp9(r_m, e),
        decode_shared_exp9(g_m, e),
        decode_shared_exp9(b_m, e),
        1.0,
    ]
}

fn decode_rgbm(r: u8, g: u8, b: u8, m: u8, max_range: f32) -> Rgbaf {
    let scale = (m as f32 / 255.0) * max_range;
    [
        (r as f32 / 255.0) * scale,
        (g as f32 / 255.0) * scale,
        (b as f32 / 255.0) * scale,
        1.0,
    ]
}

fn decode_rgbd(r: u8, g: u8, b: u8, d: u8, max_range: f32) -> Rgbaf {
    if d == 0 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    let scale = (max_range / 255.0) / (d as f32 / 255.0);
    [
        (r as f32 / 255.0) * scale,
        (g as f32 / 255.0) * scale,
        (b as f32 / 255.0) * scale,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r8_spreads_into_red_only() {
        let out = decode_packed(PixelFormat::R8, &[0x80], 1, 1, DEFAULT_MAX_RANGE).unwrap();
        assert_eq!(out.as_ldr().unwrap(), &[[0x80, 0, 0, 255]]);
    }

    #[test]
    fn field_4bit_all_ones_normalizes_to_255_not_240() {
        // G4B4A4R4, all fields 0xF: expect full 255 everywhere, not 240 from a naive shift.
        let v: u16 = 0xFFFF;
        let rgba = decode_4444(v);
        assert_eq!(rgba, [255, 255, 255, 255]);
    }

    #[test]
    fn rgbm_decode_matches_spec_example() {
        // R=128 G=0 B=0 M=64, max_range=8: R ~= (128/255)*(64/255)*8 ~= 1.2627
        let rgba = decode_rgbm(128, 0, 0, 64, 8.0);
        assert!((rgba[0] - 1.2627).abs() < 0.001);
        assert_eq!(rgba[1], 0.0);
        assert_eq!(rgba[2], 0.0);
        assert_eq!(rgba[3], 1.0);
    }

    #[test]
    fn rgbd_zero_divisor_is_opaque_black() {
        let rgba = decode_rgbd(200, 200, 200, 0, 8.0);
        assert_eq!(rgba, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn bgra_reorders_channels() {
        let out = decode_packed(PixelFormat::B8G8R8A8, &[10, 20, 30, 40], 1, 1, DEFAULT_MAX_RANGE).unwrap();
        assert_eq!(out.as_ldr().unwrap(), &[[30, 20, 10, 40]]);
    }

    #[test]
    fn r9g9b9e5_zero_is_black() {
        let out = decode_packed(PixelFormat::R9G9B9E5uf, &0u32.to_le_bytes(), 1, 1, DEFAULT_MAX_RANGE).unwrap();
        assert_eq!(out.as_hdr().unwrap()[0], [0.0, 0.0, 0.0, 1.0]);
    }
}
