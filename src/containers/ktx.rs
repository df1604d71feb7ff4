//! KTX container parser: KTX1 (GL triple) and KTX2 (Vulkan format) dialects.

use log::warn;

use crate::colour::{ChannelType, ColourProfile};
use crate::pixel_format::PixelFormat;
use crate::state::States;

const KTX1_MAGIC: [u8; 12] = [0xAB, b'K', b'T', b'X', b' ', b'1', b'1', 0xBB, b'\r', b'\n', 0x1A, b'\n'];
const KTX2_MAGIC: [u8; 12] = [0xAB, b'K', b'T', b'X', b' ', b'2', b'0', 0xBB, b'\r', b'\n', 0x1A, b'\n'];

#[derive(Debug, Clone)]
pub struct KtxLayer {
    pub mip: u32,
    pub layer: u32,
    pub face: u32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct KtxImage {
    pub states: States,
    pub pixel_format: PixelFormat,
    pub pixel_format_src: PixelFormat,
    pub colour_profile: ColourProfile,
    pub colour_profile_src: ColourProfile,
    pub channel_type: ChannelType,
    pub is_cubemap: bool,
    pub num_mipmap_layers: u32,
    pub layers: Vec<KtxLayer>,
}

fn empty_result(states: States) -> KtxImage {
    KtxImage {
        states,
        pixel_format: PixelFormat::Invalid,
        pixel_format_src: PixelFormat::Invalid,
        colour_profile: ColourProfile::Unspecified,
        colour_profile_src: ColourProfile::Unspecified,
        channel_type: ChannelType::Unspecified,
        is_cubemap: false,
        num_mipmap_layers: 0,
        layers: Vec::new(),
    }
}

fn read_u32_le(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

fn read_u32_be(data: &[u8], off: usize) -> u32 {
    u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

/// Parses a KTX1 or KTX2 file's bytes. `filename_hints_v2` models the "filename extension
/// expectation" check from the on-disk-vs-extension conditional.
pub fn parse(data: &[u8], filename_hints_v2: Option<bool>) -> KtxImage {
    if data.len() < 12 {
        return empty_result(States::FATAL_FILE_TOO_SMALL);
    }

    if data[0..12] == KTX1_MAGIC {
        let mut states = parse_ktx1(data);
        if let Some(true) = filename_hints_v2 {
            states.states |= States::CONDITIONAL_EXT_VERSION_MISMATCH;
            warn!("KTX1 container has a .ktx2-suggesting filename");
        }
        states
    } else if data[0..12] == KTX2_MAGIC {
        let mut states = parse_ktx2(data);
        if let Some(false) = filename_hints_v2 {
            states.states |= States::CONDITIONAL_EXT_VERSION_MISMATCH;
            warn!("KTX2 container has a .ktx-suggesting filename");
        }
        states
    } else {
        empty_result(States::FATAL_BAD_MAGIC)
    }
}

fn parse_ktx1(data: &[u8]) -> KtxImage {
    const HEADER_END: usize = 12 + 13 * 4;
    if data.len() < HEADER_END {
        return empty_result(States::FATAL_FILE_TOO_SMALL);
    }
    let endianness = read_u32_le(data, 12);
    let little_endian = endianness == 0x0403_0201;
    let rd = if little_endian { read_u32_le } else { read_u32_be };

    let gl_type = rd(data, 16);
    let gl_format = rd(data, 24);
    let gl_internal_format = rd(data, 28);
    let width = rd(data, 36);
    let height = rd(data, 40).max(1);
    let num_faces = rd(data, 52).max(1);
    let num_mips = rd(data, 56).max(1);
    let num_layers = rd(data, 48).max(1);
    let kvd_len = rd(data, 60) as usize;

    if width == 0 || width > 32768 || height > 32768 {
        return empty_result(States::FATAL_INVALID_DIMENSIONS);
    }
    if num_mips > 16 {
        return empty_result(States::FATAL_TOO_MANY_MIP_LEVELS);
    }

    let (pixel_format, colour_profile, channel_type) = if gl_internal_format != 0 && gl_format == 0 {
        gl_internal_format_to_pixel_format(gl_internal_format)
    } else {
        gl_unpacked_to_pixel_format(gl_format, gl_type)
    };
    if pixel_format == PixelFormat::Invalid {
        return empty_result(States::FATAL_UNKNOWN_PIXEL_FORMAT);
    }

    let mut offset = HEADER_END + kvd_len;
    let mut layers = Vec::new();
    for mip in 0..num_mips {
        if offset + 4 > data.len() {
            break;
        }
        let image_size = read_u32_le(data, offset) as usize;
        offset += 4;
        let mip_w = (width >> mip).max(1);
        let mip_h = (height >> mip).max(1);
        for face in 0..num_faces {
            if offset + image_size > data.len() {
                break;
            }
            layers.push(KtxLayer {
                mip,
                layer: 0,
                face,
                width: mip_w,
                height: mip_h,
                data: data[offset..offset + image_size].to_vec(),
            });
            offset += image_size;
            offset = (offset + 3) & !3; // 4-byte mip padding
        }
    }

    let _ = num_layers;
    KtxImage {
        states: States::VALID,
        pixel_format,
        pixel_format_src: pixel_format,
        colour_profile,
        colour_profile_src: colour_profile,
        channel_type,
        is_cubemap: num_faces == 6,
        num_mipmap_layers: num_mips,
        layers,
    }
}

fn parse_ktx2(data: &[u8]) -> KtxImage {
    const HEADER_END: usize = 12 + 4 + 4 * 2 + 4 * 2 + 4 + 4 * 2;
    if data.len() < HEADER_END {
        return empty_result(States::FATAL_FILE_TOO_SMALL);
    }
    let vk_format = read_u32_le(data, 12);
    let width = read_u32_le(data, 20);
    let height = read_u32_le(data, 24).max(1);
    let layer_count = read_u32_le(data, 32).max(1);
    let face_count = read_u32_le(data, 36).max(1);
    let level_count = read_u32_le(data, 40).max(1);

    if width == 0 || width > 32768 || height > 32768 {
        return empty_result(States::FATAL_INVALID_DIMENSIONS);
    }
    if level_count > 16 {
        return empty_result(States::FATAL_TOO_MANY_MIP_LEVELS);
    }

    let (pixel_format, colour_profile, channel_type) = vk_format_to_pixel_format(vk_format);
    if pixel_format == PixelFormat::Invalid {
        return empty_result(States::FATAL_UNKNOWN_PIXEL_FORMAT);
    }

    // Level index entries start right after the fixed header; each is 3 u64s
    // (byteOffset, byteLength, uncompressedByteLength). We only need byteOffset/byteLength.
    let level_index_off = HEADER_END;
    let mut layers = Vec::new();
    for level in 0..level_count {
        let entry_off = level_index_off + (level as usize) * 24;
        if entry_off + 16 > data.len() {
            break;
        }
        let byte_offset = u64::from_le_bytes(data[entry_off..entry_off + 8].try_into().unwrap()) as usize;
        let byte_length = u64::from_le_bytes(data[entry_off + 8..entry_off + 16].try_into().unwrap()) as usize;
        if byte_offset + byte_length > data.len() {
            continue;
        }
        let mip_w = (width >> level).max(1);
        let mip_h = (height >> level).max(1);
        let per_face = byte_length / (layer_count as usize * face_count as usize).max(1);
        let mut off = byte_offset;
        for layer in 0..layer_count {
            for face in 0..face_count {
                if off + per_face > data.len() {
                    break;
                }
                layers.push(KtxLayer {
                    mip: level,
                    layer,
                    face,
                    width: mip_w,
                    height: mip_h,
                    data: data[off..off + per_face].to_vec(),
                });
                off += per_face;
            }
        }
    }

    KtxImage {
        states: States::VALID,
        pixel_format,
        pixel_format_src: pixel_format,
        colour_profile,
        colour_profile_src: colour_profile,
        channel_type,
        is_cubemap: face_count == 6,
        num_mipmap_layers: level_count,
        layers,
    }
}

/// A representative subset of `COMPRESSED_*` GL internal-format tokens.
fn gl_internal_format_to_pixel_format(token: u32) -> (PixelFormat, ColourProfile, ChannelType) {
    match token {
        0x83F1 => (PixelFormat::Bc1Dxt1, ColourProfile::Srgb, ChannelType::Unorm), // COMPRESSED_RGB_S3TC_DXT1_EXT
        0x83F3 => (PixelFormat::Bc3Dxt4Dxt5, ColourProfile::Srgb, ChannelType::Unorm), // COMPRESSED_RGBA_S3TC_DXT5_EXT
        0x9278 => (PixelFormat::Etc2Rgba, ColourProfile::Srgb, ChannelType::Unorm), // COMPRESSED_RGBA8_ETC2_EAC
        0x93B0 => (PixelFormat::Astc4X4, ColourProfile::Hdra, ChannelType::Unorm), // COMPRESSED_RGBA_ASTC_4x4_KHR
        0x93D0 => (PixelFormat::Astc4X4, ColourProfile::Srgb, ChannelType::Unorm), // COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR
        0x93D5 => (PixelFormat::Astc6X5, ColourProfile::Srgb, ChannelType::Unorm), // COMPRESSED_SRGB8_ALPHA8_ASTC_6x5_KHR
        0x8C3A => (PixelFormat::R11G11B10uf, ColourProfile::Hdra, ChannelType::Ufloat), // R11F_G11F_B10F
        0x8C3D => (PixelFormat::R9G9B9E5uf, ColourProfile::Hdra, ChannelType::Ufloat), // RGB9_E5
        _ => (PixelFormat::Invalid, ColourProfile::Unspecified, ChannelType::Unspecified),
    }
}

fn gl_unpacked_to_pixel_format(gl_format: u32, gl_type: u32) -> (PixelFormat, ColourProfile, ChannelType) {
    const GL_RED: u32 = 0x1903;
    const GL_RGB: u32 = 0x1907;
    const GL_RGBA: u32 = 0x1908;
    const GL_UNSIGNED_BYTE: u32 = 0x1401;
    const GL_FLOAT: u32 = 0x1406;
    const GL_HALF_FLOAT: u32 = 0x140B;

    match (gl_format, gl_type) {
        (GL_RED, GL_UNSIGNED_BYTE) => (PixelFormat::R8, ColourProfile::Lrgb, ChannelType::Unorm),
        (GL_RGB, GL_UNSIGNED_BYTE) => (PixelFormat::R8G8B8, ColourProfile::Srgb, ChannelType::Unorm),
        (GL_RGBA, GL_UNSIGNED_BYTE) => (PixelFormat::R8G8B8A8, ColourProfile::Srgb, ChannelType::Unorm),
        (GL_RGBA, GL_FLOAT) => (PixelFormat::R32G32B32A32f, ColourProfile::HdrLinearRgba, ChannelType::Sfloat),
        (GL_RGBA, GL_HALF_FLOAT) => (PixelFormat::R16G16B16A16f, ColourProfile::HdrLinearRgba, ChannelType::Sfloat),
        _ => (PixelFormat::Invalid, ColourProfile::Unspecified, ChannelType::Unspecified),
    }
}

const ASTC_ORDER: [PixelFormat; 14] = [
    PixelFormat::Astc4X4,
    PixelFormat::Astc5X4,
    PixelFormat::Astc5X5,
    PixelFormat::Astc6X5,
    PixelFormat::Astc6X6,
    PixelFormat::Astc8X5,
    PixelFormat::Astc8X6,
    PixelFormat::Astc8X8,
    PixelFormat::Astc10X5,
    PixelFormat::Astc10X6,
    PixelFormat::Astc10X8,
    PixelFormat::Astc10X10,
    PixelFormat::Astc12X10,
    PixelFormat::Astc12X12,
];

fn astc_sfloat_block(index: u32) -> (PixelFormat, ColourProfile, ChannelType) {
    match ASTC_ORDER.get(index as usize) {
        Some(fmt) => (*fmt, ColourProfile::Hdra, ChannelType::Sfloat),
        None => (PixelFormat::Invalid, ColourProfile::Unspecified, ChannelType::Unspecified),
    }
}

/// A representative subset of VK format codes.
fn vk_format_to_pixel_format(vk: u32) -> (PixelFormat, ColourProfile, ChannelType) {
    match vk {
        145 => (PixelFormat::Bc1Dxt1, ColourProfile::Srgb, ChannelType::Unorm), // BC1_RGB_SRGB_BLOCK
        144 => (PixelFormat::Bc1Dxt1, ColourProfile::Lrgb, ChannelType::Unorm), // BC1_RGB_UNORM_BLOCK
        147 => (PixelFormat::Bc2Dxt2Dxt3, ColourProfile::Srgb, ChannelType::Unorm),
        149 => (PixelFormat::Bc3Dxt4Dxt5, ColourProfile::Srgb, ChannelType::Unorm),
        148 => (PixelFormat::Bc3Dxt4Dxt5, ColourProfile::Lrgb, ChannelType::Unorm),
        151 => (PixelFormat::Bc4Ati1U, ColourProfile::Lrgb, ChannelType::Unorm),
        152 => (PixelFormat::Bc4Ati1S, ColourProfile::Lrgb, ChannelType::Snorm),
        153 => (PixelFormat::Bc5Ati2U, ColourProfile::Lrgb, ChannelType::Unorm),
        154 => (PixelFormat::Bc5Ati2S, ColourProfile::Lrgb, ChannelType::Snorm),
        155 => (PixelFormat::Bc6U, ColourProfile::Hdra, ChannelType::Ufloat),
        156 => (PixelFormat::Bc6S, ColourProfile::Hdra, ChannelType::Sfloat),
        157 => (PixelFormat::Bc7, ColourProfile::Lrgb, ChannelType::Unorm),
        158 => (PixelFormat::Bc7, ColourProfile::Srgb, ChannelType::Unorm),
        123 => (PixelFormat::R9G9B9E5uf, ColourProfile::Hdra, ChannelType::Ufloat), // E5B9G9R9_UFLOAT_PACK32
        122 => (PixelFormat::R11G11B10uf, ColourProfile::Hdra, ChannelType::Ufloat), // B10G11R11_UFLOAT_PACK32
        // ASTC block-size range, UNORM/SRGB pairs, VK_FORMAT_ASTC_4x4_UNORM_BLOCK (157) upward;
        // the _KHR extension range used by ASTC_*_SFLOAT_BLOCK_EXT starts at 1000066000.
        1_000_066_000..=1_000_066_013 => astc_sfloat_block(vk - 1_000_066_000),
        _ => (PixelFormat::Invalid, ColourProfile::Unspecified, ChannelType::Unspecified),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        let img = parse(&[0u8; 4], None);
        assert!(img.states.contains(States::FATAL_FILE_TOO_SMALL));
    }

    #[test]
    fn rejects_bad_magic() {
        let img = parse(&[0u8; 16], None);
        assert!(img.states.contains(States::FATAL_BAD_MAGIC));
    }

    #[test]
    fn ktx1_magic_is_recognised() {
        let mut data = KTX1_MAGIC.to_vec();
        data.extend(std::iter::repeat(0u8).take(13 * 4));
        let img = parse(&data, None);
        // Header fields are all zero here, so format resolution fails, but magic+size parsing
        // must not hit the FATAL_BAD_MAGIC/FATAL_FILE_TOO_SMALL paths.
        assert!(!img.states.contains(States::FATAL_BAD_MAGIC));
        assert!(!img.states.contains(States::FATAL_FILE_TOO_SMALL));
    }
}
