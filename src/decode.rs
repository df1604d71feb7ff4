//! The decode engine: dispatches a pixel format to the packed or block decoder, then applies
//! the post-decode filter pipeline (tone-map exposure, sRGB/gamma compression, auto-gamma,
//! row-reversal, luminance spread).

use crate::block::decode_block;
use crate::colour::{is_linear_in_rgb, ColourProfile};
use crate::error::DecodeError;
use crate::packed::{decode_packed, DEFAULT_MAX_RANGE};
use crate::pixel_format::PixelFormat;
use crate::row_reverse::{can_reverse, reverse_bc_rows, reverse_packed_rows};
use crate::types::{DecodedBuffer, Rgba8};

/// Formats whose data is a mask, normal map, or other non-colour signal: the auto-gamma filter
/// must never apply an sRGB/gamma curve to these even when the source profile is linear.
fn is_gamma_exempt(fmt: PixelFormat) -> bool {
    matches!(
        fmt,
        PixelFormat::A8 | PixelFormat::L8A8 | PixelFormat::Bc4Ati1U | PixelFormat::Bc4Ati1S | PixelFormat::Bc5Ati2U | PixelFormat::Bc5Ati2S
    )
}

/// Options controlling the decode engine's post-decode filter pipeline. All filters default to
/// off/identity; callers opt in per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Source colour profile, or [`ColourProfile::Auto`] to let auto-gamma decide.
    pub profile_hint: ColourProfile,
    /// `max_range` for RGBM/RGBD packed formats; ignored otherwise.
    pub max_range: f32,
    /// HDR-only: tone-map exposure applied before sRGB/gamma compression. `0.0` disables it.
    pub exposure: f32,
    /// Apply linear-to-sRGB compression after tone-mapping.
    pub srgb_compress: bool,
    /// Apply a generic gamma compression with this value (`> 0.0` enables it; output = `c^(1/gamma)`).
    pub gamma: f32,
    /// Reverse row order (top/bottom flip) as part of decode.
    pub reverse_rows: bool,
    /// For single-channel sources, copy R into G and B after decode.
    pub spread_luminance: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self {
            profile_hint: ColourProfile::Unspecified,
            max_range: DEFAULT_MAX_RANGE,
            exposure: 0.0,
            srgb_compress: false,
            gamma: 0.0,
            reverse_rows: false,
            spread_luminance: false,
        }
    }
}

fn tone_map_exposure(c: f32, exposure: f32) -> f32 {
    1.0 - (-c * exposure).exp()
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn apply_hdr_filters(pixels: &mut [[f32; 4]], opts: &DecodeOptions, srgb_by_auto_gamma: bool) {
    for px in pixels.iter_mut() {
        if opts.exposure > 0.0 {
            for c in &mut px[0..3] {
                *c = tone_map_exposure(*c, opts.exposure);
            }
        }
        if opts.srgb_compress || srgb_by_auto_gamma {
            for c in &mut px[0..3] {
                *c = linear_to_srgb(*c);
            }
        }
        if opts.gamma > 0.0 {
            for c in &mut px[0..3] {
                *c = c.powf(1.0 / opts.gamma);
            }
        }
    }
}

fn spread_luminance_ldr(pixels: &mut [Rgba8]) {
    for px in pixels.iter_mut() {
        px[1] = px[0];
        px[2] = px[0];
    }
}

fn spread_luminance_hdr(pixels: &mut [[f32; 4]]) {
    for px in pixels.iter_mut() {
        px[1] = px[0];
        px[2] = px[0];
    }
}

fn is_single_channel_source(fmt: PixelFormat) -> bool {
    matches!(
        fmt,
        PixelFormat::R8 | PixelFormat::L8 | PixelFormat::R16 | PixelFormat::R32 | PixelFormat::R16f | PixelFormat::R32f
    )
}

/// Decodes `data` (one layer's raw bytes for pixel format `fmt`, image `width x height`) into a
/// [`DecodedBuffer`], applying row-reversal before decode when possible and the full post-decode
/// filter pipeline afterward.
///
/// Exactly one of [`DecodedBuffer::Ldr`] / [`DecodedBuffer::Hdr`] is populated, enforced by the
/// return type itself rather than by a pair of `Option` output parameters.
pub fn decode(fmt: PixelFormat, data: &[u8], width: u32, height: u32, opts: &DecodeOptions) -> Result<DecodedBuffer, DecodeError> {
    let mut owned;
    let data = if opts.reverse_rows && can_reverse(fmt, height) {
        owned = data.to_vec();
        if fmt.is_packed() {
            let bpp = fmt.bits_per_pixel();
            reverse_packed_rows(&mut owned, width, height, bpp / 8);
        } else {
            reverse_bc_rows(fmt, &mut owned, width, height);
        }
        &owned[..]
    } else {
        data
    };

    let mut buffer = if fmt.is_packed() {
        decode_packed(fmt, data, width, height, opts.max_range)?
    } else if fmt.is_block() {
        decode_block(fmt, data, width, height)?
    } else {
        return Err(DecodeError::UnsupportedFormat(format!("{fmt:?}")));
    };

    let wants_auto_srgb = matches!(opts.profile_hint, ColourProfile::Auto) || is_linear_in_rgb(opts.profile_hint);
    let auto_srgb = wants_auto_srgb && !is_gamma_exempt(fmt) && matches!(buffer, DecodedBuffer::Hdr(_));

    match &mut buffer {
        DecodedBuffer::Hdr(pixels) => {
            apply_hdr_filters(pixels, opts, auto_srgb);
            if opts.spread_luminance && is_single_channel_source(fmt) {
                spread_luminance_hdr(pixels);
            }
        }
        DecodedBuffer::Ldr(pixels) => {
            if opts.reverse_rows && !can_reverse(fmt, height) {
                reverse_pixel_rows(pixels, width as usize);
            }
            if opts.spread_luminance && is_single_channel_source(fmt) {
                spread_luminance_ldr(pixels);
            }
        }
    }

    Ok(buffer)
}

/// Post-decode row flip for formats [`can_reverse`] ruled out pre-decode (ETC/EAC/ASTC/PVR):
/// always possible once the buffer is plain RGBA8.
fn reverse_pixel_rows(pixels: &mut [Rgba8], width: usize) {
    if width == 0 {
        return;
    }
    let rows = pixels.len() / width;
    let mut top = 0usize;
    let mut bottom = rows.saturating_sub(1);
    while top < bottom {
        let (a, b) = pixels.split_at_mut(bottom * width);
        a[top * width..top * width + width].swap_with_slice(&mut b[..width]);
        top += 1;
        bottom -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_r8g8b8a8_identity() {
        let data = vec![10u8, 20, 30, 40, 50, 60, 70, 80];
        let opts = DecodeOptions::new();
        let result = decode(PixelFormat::R8G8B8A8, &data, 2, 1, &opts).unwrap();
        let px = result.as_ldr().unwrap();
        assert_eq!(px[0], [10, 20, 30, 40]);
        assert_eq!(px[1], [50, 60, 70, 80]);
    }

    #[test]
    fn reverse_rows_flips_packed_ldr_buffer() {
        let data = vec![1u8, 0, 0, 255, 2, 0, 0, 255];
        let mut opts = DecodeOptions::new();
        opts.reverse_rows = true;
        let result = decode(PixelFormat::R8G8B8A8, &data, 1, 2, &opts).unwrap();
        let px = result.as_ldr().unwrap();
        assert_eq!(px[0], [2, 0, 0, 255]);
        assert_eq!(px[1], [1, 0, 0, 255]);
    }

    #[test]
    fn spread_luminance_copies_red_to_green_blue() {
        let data = vec![42u8];
        let mut opts = DecodeOptions::new();
        opts.spread_luminance = true;
        let result = decode(PixelFormat::R8, &data, 1, 1, &opts).unwrap();
        let px = result.as_ldr().unwrap();
        assert_eq!(px[0], [42, 42, 42, 255]);
    }

    #[test]
    fn gamma_exempt_format_is_never_srgb_compressed() {
        // BC4/BC5 are LDR output from this crate's block decoder, so auto-srgb (HDR-only) is
        // moot for them regardless; this asserts the exemption predicate itself.
        assert!(is_gamma_exempt(PixelFormat::Bc4Ati1U));
        assert!(is_gamma_exempt(PixelFormat::A8));
        assert!(!is_gamma_exempt(PixelFormat::R8G8B8A8));
    }
}
