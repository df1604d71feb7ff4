//! PVR container parser: V1/V2 (52-byte legacy header) and V3 (`'PVR3'` magic) dialects.

use log::warn;

use crate::colour::{ChannelType, ColourProfile};
use crate::pixel_format::PixelFormat;
use crate::state::States;

const V3_MAGIC: u32 = 0x0352_5650;
const V2_FOURCC: u32 = u32::from_le_bytes(*b"PVR!");

#[derive(Debug, Clone)]
pub struct PvrLayer {
    pub surface: u32,
    pub face: u32,
    pub mip: u32,
    pub slice: u32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PvrImage {
    pub states: States,
    pub pixel_format: PixelFormat,
    pub pixel_format_src: PixelFormat,
    pub colour_profile: ColourProfile,
    pub colour_profile_src: ColourProfile,
    pub channel_type: ChannelType,
    pub is_cubemap: bool,
    pub orientation: [u8; 3],
    pub layers: Vec<PvrLayer>,
}

fn empty_result(states: States) -> PvrImage {
    PvrImage {
        states,
        pixel_format: PixelFormat::Invalid,
        pixel_format_src: PixelFormat::Invalid,
        colour_profile: ColourProfile::Unspecified,
        colour_profile_src: ColourProfile::Unspecified,
        channel_type: ChannelType::Unspecified,
        is_cubemap: false,
        orientation: [0, 0, 0],
        layers: Vec::new(),
    }
}

fn read_u32_le(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

fn read_u64_le(data: &[u8], off: usize) -> u64 {
    u64::from_le_bytes(data[off..off + 8].try_into().unwrap())
}

fn is_power_of_two(v: u32) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

/// Parses a PVR file's bytes, dispatching to the V1/V2 or V3 reader based on the first 4 bytes.
pub fn parse(data: &[u8], strict: bool) -> PvrImage {
    if data.len() < 4 {
        return empty_result(States::FATAL_FILE_TOO_SMALL);
    }
    let first = read_u32_le(data, 0);
    match first {
        44 | 52 => parse_v1_v2(data, first as usize, strict),
        V3_MAGIC => parse_v3(data, strict),
        _ => empty_result(States::FATAL_BAD_MAGIC),
    }
}

const PVR_V1V2_PF_PVRTC2_RGB: u32 = 0x00;
const PVR_V1V2_PF_PVRTC2_RGBA: u32 = 0x01;
const PVR_V1V2_PF_PVRTC4_RGB: u32 = 0x02;
const PVR_V1V2_PF_PVRTC4_RGBA: u32 = 0x03;
const PVR_V1V2_FLAG_MIPMAP: u32 = 0x0000_0100;
const PVR_V1V2_FLAG_TWIDDLED: u32 = 0x02;
const PVR_V1V2_FLAG_CUBEMAP: u32 = 0x04;
const PVR_V1V2_FLAG_VOLUME: u32 = 0x08;

fn parse_v1_v2(data: &[u8], header_size: usize, strict: bool) -> PvrImage {
    if data.len() < header_size {
        return empty_result(States::FATAL_FILE_TOO_SMALL);
    }
    let mut states = States::empty();
    let height = read_u32_le(data, 4);
    let width = read_u32_le(data, 8);
    let mip_count = read_u32_le(data, 12);
    let flags = read_u32_le(data, 16);
    let pixel_format_byte = flags & 0xFF;
    let surface_count = read_u32_le(data, 28).max(1);
    let num_faces = if header_size == 52 && read_u32_le(data, 20) != 0 { read_u32_le(data, 20) } else { 1 };

    if header_size == 52 {
        let fourcc = read_u32_le(data, 44);
        if fourcc != 0 && fourcc != V2_FOURCC {
            states |= States::CONDITIONAL_V2_FOURCC_INCORRECT;
            warn!("PVR V2 FourCC field does not match 'PVR!'");
        }
    }

    if width == 0 || height == 0 || width > 32768 || height > 32768 {
        return empty_result(States::FATAL_INVALID_DIMENSIONS);
    }
    if (flags & PVR_V1V2_FLAG_TWIDDLED) != 0 {
        return empty_result(States::FATAL_TWIDDLED_DATA_NOT_SUPPORTED);
    }

    let is_cubemap = (flags & PVR_V1V2_FLAG_CUBEMAP) != 0;
    let num_faces = if is_cubemap { num_faces.max(6).min(6) } else { num_faces.max(1) };
    let is_volume = (flags & PVR_V1V2_FLAG_VOLUME) != 0;
    let has_mipmap_flag = (flags & PVR_V1V2_FLAG_MIPMAP) != 0;
    if has_mipmap_flag != (mip_count > 0) {
        states |= States::CONDITIONAL_MIPMAP_FLAG_INCONSISTENT;
        warn!("PVR V1/V2 mipmap flag and mipmap count disagree");
    }
    let num_mips = mip_count.max(1).min(16);

    let pixel_format = match pixel_format_byte {
        PVR_V1V2_PF_PVRTC2_RGB | PVR_V1V2_PF_PVRTC2_RGBA => PixelFormat::PvrBpp2,
        PVR_V1V2_PF_PVRTC4_RGB | PVR_V1V2_PF_PVRTC4_RGBA => PixelFormat::PvrBpp4,
        _ => PixelFormat::Invalid,
    };
    if pixel_format == PixelFormat::Invalid {
        return empty_result(States::FATAL_UNKNOWN_PIXEL_FORMAT);
    }
    if (!is_power_of_two(width) || !is_power_of_two(height) || width < 4 || height < 4)
        && matches!(pixel_format, PixelFormat::PvrBpp2 | PixelFormat::PvrBpp4)
    {
        states |= States::FATAL_PVRTC_DIMENSION_CONSTRAINT_VIOLATED;
        return empty_result(states);
    }

    if strict {
        states = states.promote_conditionals_to_fatal();
        if states.is_fatal() {
            return empty_result(states);
        }
    }

    let slices = if is_volume { surface_count.max(1) } else { 1 };
    let surfaces = if is_volume { 1 } else { surface_count.max(1) };

    let mut layers = Vec::new();
    let mut offset = header_size;
    for surf in 0..surfaces {
        for face in 0..num_faces {
            let mut mip_w = width;
            let mut mip_h = height;
            for mip in 0..num_mips {
                for slice in 0..slices {
                    let blocks_w = crate::pixel_format::num_blocks(pixel_format.block_w(), mip_w);
                    let blocks_h = crate::pixel_format::num_blocks(pixel_format.block_h(), mip_h);
                    let size = (blocks_w * blocks_h * pixel_format.bytes_per_block()) as usize;
                    if offset + size > data.len() {
                        continue;
                    }
                    layers.push(PvrLayer {
                        surface: surf,
                        face,
                        mip,
                        slice,
                        width: mip_w,
                        height: mip_h,
                        data: data[offset..offset + size].to_vec(),
                    });
                    offset += size;
                }
                mip_w = (mip_w / 2).max(1);
                mip_h = (mip_h / 2).max(1);
            }
        }
    }

    states |= States::VALID;
    PvrImage {
        states,
        pixel_format,
        pixel_format_src: pixel_format,
        colour_profile: ColourProfile::Srgb,
        colour_profile_src: ColourProfile::Srgb,
        channel_type: ChannelType::Unspecified,
        is_cubemap,
        orientation: [0, 0, 0],
        layers,
    }
}

fn parse_v3(data: &[u8], strict: bool) -> PvrImage {
    const HEADER_SIZE: usize = 52;
    if data.len() < HEADER_SIZE {
        return empty_result(States::FATAL_FILE_TOO_SMALL);
    }
    let mut states = States::empty();

    let flags = read_u32_le(data, 4);
    let pixel_format_u64 = read_u64_le(data, 8);
    let colour_space = read_u32_le(data, 16);
    let channel_type_raw = read_u32_le(data, 20);
    let height = read_u32_le(data, 24);
    let width = read_u32_le(data, 28);
    let depth = read_u32_le(data, 32).max(1);
    let num_surfaces = read_u32_le(data, 36).max(1);
    let num_faces = read_u32_le(data, 40).max(1);
    let num_mips = read_u32_le(data, 44).max(1);
    let meta_data_size = read_u32_le(data, 48) as usize;

    if width == 0 || height == 0 || width > 32768 || height > 32768 {
        return empty_result(States::FATAL_INVALID_DIMENSIONS);
    }
    if depth > 1 {
        return empty_result(States::FATAL_VOLUME_TEXTURES_NOT_SUPPORTED);
    }
    if num_mips > 16 {
        return empty_result(States::FATAL_TOO_MANY_MIP_LEVELS);
    }
    let _ = flags;

    let (pixel_format, profile_from_fmt) = pvr3_format_to_pixel_format(pixel_format_u64);
    if pixel_format == PixelFormat::Invalid {
        return empty_result(States::FATAL_UNKNOWN_PIXEL_FORMAT);
    }

    let channel_type = pvr3_channel_type(channel_type_raw);
    let colour_profile_src = if colour_space == 1 {
        ColourProfile::Srgb
    } else {
        profile_from_fmt.unwrap_or(ColourProfile::Lrgb)
    };
    let mut colour_profile = colour_profile_src;
    if matches!(channel_type, ChannelType::Sfloat | ChannelType::Ufloat) && matches!(colour_profile, ColourProfile::Lrgb) {
        colour_profile = ColourProfile::Hdra;
    }

    let meta_start = HEADER_SIZE;
    let mut orientation = [0u8; 3];
    if meta_data_size > 0 && meta_start + meta_data_size <= data.len() {
        let mut cursor = meta_start;
        let meta_end = meta_start + meta_data_size;
        while cursor + 12 <= meta_end {
            let fourcc = read_u32_le(data, cursor);
            let key = read_u32_le(data, cursor + 4);
            let size = read_u32_le(data, cursor + 8) as usize;
            let value_off = cursor + 12;
            if fourcc == V3_MAGIC && key == 0 && size == 3 && value_off + 3 <= meta_end {
                orientation.copy_from_slice(&data[value_off..value_off + 3]);
            }
            cursor = value_off + size;
        }
    }

    if (!is_power_of_two(width) || !is_power_of_two(height) || width < 4 || height < 4)
        && matches!(pixel_format, PixelFormat::PvrBpp2 | PixelFormat::PvrBpp4 | PixelFormat::Pvr2Bpp2 | PixelFormat::Pvr2Bpp4)
    {
        states |= States::FATAL_PVRTC_DIMENSION_CONSTRAINT_VIOLATED;
    }
    if strict {
        states = states.promote_conditionals_to_fatal();
    }
    if states.is_fatal() {
        return empty_result(states);
    }

    let is_cubemap = num_faces == 6;
    let mut layers = Vec::new();
    let mut offset = meta_start + meta_data_size;
    // V3 iterates mip -> surface -> face -> slice.
    let mut mip_w = width;
    let mut mip_h = height;
    for mip in 0..num_mips {
        for surf in 0..num_surfaces {
            for face in 0..num_faces {
                let blocks_w = crate::pixel_format::num_blocks(pixel_format.block_w(), mip_w);
                let blocks_h = crate::pixel_format::num_blocks(pixel_format.block_h(), mip_h);
                let size = (blocks_w * blocks_h * pixel_format.bytes_per_block()) as usize;
                if offset + size > data.len() {
                    continue;
                }
                layers.push(PvrLayer {
                    surface: surf,
                    face,
                    mip,
                    slice: 0,
                    width: mip_w,
                    height: mip_h,
                    data: data[offset..offset + size].to_vec(),
                });
                offset += size;
            }
        }
        mip_w = (mip_w / 2).max(1);
        mip_h = (mip_h / 2).max(1);
    }

    states |= States::VALID;
    PvrImage {
        states,
        pixel_format,
        pixel_format_src: pixel_format,
        colour_profile,
        colour_profile_src,
        channel_type,
        is_cubemap,
        orientation,
        layers,
    }
}

fn pvr3_channel_type(raw: u32) -> ChannelType {
    match raw {
        0 => ChannelType::Unorm,
        1 => ChannelType::Snorm,
        2 | 3 => ChannelType::Uint,
        4 | 5 => ChannelType::Sint,
        6 => ChannelType::Ufloat,
        7 => ChannelType::Sfloat,
        _ => ChannelType::Unspecified,
    }
}

/// The lower 32 bits of a canonical (non-channel-order) PVR3 format code.
fn pvr3_format_to_pixel_format(code: u64) -> (PixelFormat, Option<ColourProfile>) {
    if (code >> 32) != 0 {
        return pvr3_channel_order_format(code);
    }
    let lo = code as u32;
    match lo {
        0 => (PixelFormat::PvrBpp2, None),
        1 => (PixelFormat::Pvr2Bpp2, None),
        2 => (PixelFormat::PvrBpp4, None),
        3 => (PixelFormat::Pvr2Bpp4, None),
        6 => (PixelFormat::Etc1, None),
        7 => (PixelFormat::Bc1Dxt1, None),
        9 => (PixelFormat::Bc2Dxt2Dxt3, None),
        11 => (PixelFormat::Bc3Dxt4Dxt5, None),
        12 => (PixelFormat::Bc4Ati1U, None),
        13 => (PixelFormat::Bc5Ati2U, None),
        14 => (PixelFormat::Bc6U, Some(ColourProfile::Hdra)),
        15 => (PixelFormat::Bc7, None),
        22 => (PixelFormat::EacR11U, None),
        23 => (PixelFormat::EacRg11U, None),
        24 => (PixelFormat::Etc2Rgb, None),
        25 => (PixelFormat::Etc2Rgba, None),
        26 => (PixelFormat::Etc2Rgba1, None),
        53 => (PixelFormat::R8G8B8M8, Some(ColourProfile::Hdra)),
        54 => (PixelFormat::R8G8B8D8, Some(ColourProfile::Hdra)),
        _ => (PixelFormat::Invalid, None),
    }
}

/// Per-channel-bit-count + 4-character channel-order FourCC encoding, e.g. `'rgba'`/`'bgra'`.
fn pvr3_channel_order_format(code: u64) -> (PixelFormat, Option<ColourProfile>) {
    let order = (code & 0xFFFF_FFFF) as u32;
    const RGBA: u32 = u32::from_le_bytes(*b"rgba");
    const RGB0: u32 = u32::from_le_bytes(*b"rgb\0");
    const R000: u32 = u32::from_le_bytes(*b"r\0\0\0");
    const RG00: u32 = u32::from_le_bytes(*b"rg\0\0");
    const BGRA: u32 = u32::from_le_bytes(*b"bgra");

    match order {
        RGBA => (PixelFormat::R8G8B8A8, None),
        RGB0 => (PixelFormat::R8G8B8, None),
        R000 => (PixelFormat::R8, None),
        RG00 => (PixelFormat::R8G8, None),
        BGRA => (PixelFormat::B8G8R8A8, None),
        _ => (PixelFormat::Invalid, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        let img = parse(&[0u8; 2], false);
        assert!(img.states.contains(States::FATAL_FILE_TOO_SMALL));
    }

    #[test]
    fn rejects_bad_magic() {
        let img = parse(&[0xFF, 0xFF, 0xFF, 0xFF], false);
        assert!(img.states.contains(States::FATAL_BAD_MAGIC));
    }

    #[test]
    fn v3_rgba_channel_order_round_trips() {
        // Upper 32 bits (per-channel bit counts) are irrelevant to format resolution, only
        // the lower 32 bits' channel-order FourCC is consulted once the upper bits are nonzero.
        let code = (8u64 << 32) | (u32::from_le_bytes(*b"rgba") as u64);
        let (fmt, _) = pvr3_format_to_pixel_format(code);
        assert_eq!(fmt, PixelFormat::R8G8B8A8);
    }

    #[test]
    fn v3_canonical_bc7_format_resolves() {
        let (fmt, _) = pvr3_format_to_pixel_format(15);
        assert_eq!(fmt, PixelFormat::Bc7);
    }
}
