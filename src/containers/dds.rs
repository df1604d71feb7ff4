//! DDS container parser: legacy 124-byte header plus optional DX10 extension.

use log::warn;

use crate::block::bc1_block_has_alpha_index;
use crate::colour::{AlphaMode, ChannelType, ColourProfile};
use crate::pixel_format::PixelFormat;
use crate::state::States;

const MAGIC: u32 = 0x2053_3344; // "DDS " little-endian
const HEADER_SIZE: usize = 128; // 4-byte magic + 124-byte header
const DX10_HEADER_SIZE: usize = 20;

const DDSD_PITCH: u32 = 0x8;
const DDSD_LINEARSIZE: u32 = 0x8_0000;
const DDSD_DEPTH: u32 = 0x80_0000;

const DDPF_ALPHAPIXELS: u32 = 0x1;
const DDPF_FOURCC: u32 = 0x4;
const DDPF_RGB: u32 = 0x40;
const DDPF_LUMINANCE: u32 = 0x2_0000;
const DDPF_ALPHA: u32 = 0x2;

const DDSCAPS2_CUBEMAP: u32 = 0x200;
const DDSCAPS2_CUBEMAP_ALL_FACES: u32 = 0xFC00;

fn fourcc(bytes: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*bytes)
}

/// One parsed DDS layer: pixel format, dimensions, and the raw byte range for this mip level.
#[derive(Debug, Clone)]
pub struct DdsLayer {
    pub mip: u32,
    pub face: u32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// The result of a successful (or partially successful, non-fatal) DDS parse.
#[derive(Debug, Clone)]
pub struct DdsImage {
    pub states: States,
    pub pixel_format: PixelFormat,
    pub pixel_format_src: PixelFormat,
    pub colour_profile: ColourProfile,
    pub colour_profile_src: ColourProfile,
    pub channel_type: ChannelType,
    pub alpha_mode: AlphaMode,
    pub is_cubemap: bool,
    pub num_images: u32,
    pub num_mipmap_layers: u32,
    pub layers: Vec<DdsLayer>,
}

#[derive(Debug, Clone, Copy, Default)]
struct PixelFormatHeader {
    flags: u32,
    fourcc: u32,
    rgb_bit_count: u32,
    r_mask: u32,
    g_mask: u32,
    b_mask: u32,
    a_mask: u32,
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Parses a DDS file's bytes, strict mode promoting every conditional bit to fatal.
pub fn parse(data: &[u8], strict: bool) -> DdsImage {
    let mut states = States::empty();

    if data.len() < HEADER_SIZE {
        states |= States::FATAL_FILE_TOO_SMALL;
        return empty_result(states);
    }
    if read_u32(data, 0) != MAGIC {
        states |= States::FATAL_BAD_MAGIC;
        return empty_result(states);
    }
    let header_size = read_u32(data, 4);
    if header_size != 124 {
        states |= States::FATAL_BAD_HEADER_SIZE;
        return empty_result(states);
    }

    let flags = read_u32(data, 8);
    let height = read_u32(data, 12);
    let width = read_u32(data, 16);
    let pitch_or_linear_size = read_u32(data, 20);
    let depth = read_u32(data, 24);
    let mip_map_count = read_u32(data, 28);

    let pf = PixelFormatHeader {
        flags: read_u32(data, 76),
        fourcc: read_u32(data, 80),
        rgb_bit_count: read_u32(data, 84),
        r_mask: read_u32(data, 88),
        g_mask: read_u32(data, 92),
        b_mask: read_u32(data, 96),
        a_mask: read_u32(data, 100),
    };
    let caps2 = read_u32(data, 108);

    if width == 0 || height == 0 || width > 32768 || height > 32768 {
        states |= States::FATAL_INVALID_DIMENSIONS;
        return empty_result(states);
    }
    if (flags & DDSD_DEPTH) != 0 && depth > 1 {
        states |= States::FATAL_VOLUME_TEXTURES_NOT_SUPPORTED;
        return empty_result(states);
    }

    let has_pitch = (flags & DDSD_PITCH) != 0;
    let has_linear = (flags & DDSD_LINEARSIZE) != 0;
    if has_pitch == has_linear {
        states |= States::CONDITIONAL_PITCH_XOR_LINEAR_SIZE;
        warn!("DDS pitch/linear-size flags are not an exclusive pair");
    }

    let mut num_mipmap_layers = if mip_map_count == 0 { 1 } else { mip_map_count };
    if num_mipmap_layers > 16 {
        states |= States::FATAL_TOO_MANY_MIP_LEVELS;
        return empty_result(states);
    }

    let mut offset = HEADER_SIZE;
    let mut alpha_mode = AlphaMode::Unspecified;
    let mut colour_profile;

    let pixel_format = if pf.fourcc == fourcc(b"DX10") {
        if offset + DX10_HEADER_SIZE > data.len() {
            states |= States::FATAL_MISSING_OR_BAD_DX10_HEADER;
            return empty_result(states);
        }
        let dxgi_format = read_u32(data, offset);
        offset += DX10_HEADER_SIZE;
        let (fmt, srgb) = dxgi_to_pixel_format(dxgi_format);
        colour_profile = if srgb { ColourProfile::Srgb } else { default_linear_profile(fmt) };
        fmt
    } else if (pf.flags & DDPF_FOURCC) != 0 {
        let (fmt, mode) = fourcc_to_pixel_format(pf.fourcc);
        alpha_mode = mode;
        colour_profile = default_linear_profile(fmt);
        fmt
    } else if (pf.flags & (DDPF_RGB | DDPF_LUMINANCE | DDPF_ALPHA)) != 0 {
        colour_profile = ColourProfile::Srgb;
        mask_to_pixel_format(&pf)
    } else {
        states |= States::CONDITIONAL_PIXEL_FORMAT_SPEC;
        colour_profile = ColourProfile::Unspecified;
        PixelFormat::Invalid
    };

    if pixel_format == PixelFormat::Invalid {
        states |= States::FATAL_UNKNOWN_PIXEL_FORMAT;
        return empty_result(states);
    }

    let is_cubemap = (caps2 & DDSCAPS2_CUBEMAP) != 0;
    if is_cubemap && (caps2 & DDSCAPS2_CUBEMAP_ALL_FACES) != DDSCAPS2_CUBEMAP_ALL_FACES {
        states |= States::FATAL_CUBEMAP_FACE_COUNT_INCONSISTENT;
        return empty_result(states);
    }
    let num_images = if is_cubemap { 6 } else { 1 };

    if pixel_format.is_bc() && (width % 4 != 0 || height % 4 != 0) {
        states |= States::CONDITIONAL_DIMENSION_NOT_MULT_FOUR;
        warn!("DDS texture dimensions {width}x{height} are not a multiple of four for {pixel_format:?}");
    }

    if strict {
        states = states.promote_conditionals_to_fatal();
        if states.is_fatal() {
            return empty_result(states);
        }
    }

    let mut layers = Vec::new();
    let mut pixel_format = pixel_format;
    let mut first_mip_bc1_alpha = false;

    for face in 0..num_images {
        let mut mip_w = width;
        let mut mip_h = height;
        for mip in 0..num_mipmap_layers {
            let blocks_w = crate::pixel_format::num_blocks(pixel_format.block_w(), mip_w);
            let blocks_h = crate::pixel_format::num_blocks(pixel_format.block_h(), mip_h);
            let layer_size = (blocks_w * blocks_h * pixel_format.bytes_per_block()) as usize;
            if offset + layer_size > data.len() {
                break;
            }
            let bytes = data[offset..offset + layer_size].to_vec();
            if mip == 0 && face == 0 && pixel_format == PixelFormat::Bc1Dxt1 && bc1_block_has_alpha_index(&bytes, mip_w, mip_h) {
                first_mip_bc1_alpha = true;
            }
            layers.push(DdsLayer {
                mip,
                face,
                width: mip_w,
                height: mip_h,
                data: bytes,
            });
            offset += layer_size;
            mip_w = (mip_w / 2).max(1);
            mip_h = (mip_h / 2).max(1);
        }
    }

    let pixel_format_src = pixel_format;
    if first_mip_bc1_alpha {
        pixel_format = PixelFormat::Bc1Dxt1A;
    }

    states |= States::VALID;
    num_mipmap_layers = num_mipmap_layers.min(16);

    DdsImage {
        states,
        pixel_format,
        pixel_format_src,
        colour_profile,
        colour_profile_src: colour_profile,
        channel_type: default_channel_type(pixel_format_src),
        alpha_mode,
        is_cubemap,
        num_images,
        num_mipmap_layers,
        layers,
    }
}

fn empty_result(states: States) -> DdsImage {
    DdsImage {
        states,
        pixel_format: PixelFormat::Invalid,
        pixel_format_src: PixelFormat::Invalid,
        colour_profile: ColourProfile::Unspecified,
        colour_profile_src: ColourProfile::Unspecified,
        channel_type: ChannelType::Unspecified,
        alpha_mode: AlphaMode::Unspecified,
        is_cubemap: false,
        num_images: 0,
        num_mipmap_layers: 0,
        layers: Vec::new(),
    }
}

/// Legacy DDS headers carry no explicit channel-type field; this infers the obvious default per
/// resolved pixel format, matching the signed/float variants `fourcc_to_pixel_format` and
/// `dxgi_to_pixel_format` already distinguish by name.
fn default_channel_type(fmt: PixelFormat) -> ChannelType {
    match fmt {
        PixelFormat::Bc4Ati1S | PixelFormat::Bc5Ati2S => ChannelType::Snorm,
        PixelFormat::Bc6U | PixelFormat::R11G11B10uf | PixelFormat::R9G9B9E5uf => ChannelType::Ufloat,
        PixelFormat::Bc6S => ChannelType::Sfloat,
        PixelFormat::R16f
        | PixelFormat::R16G16f
        | PixelFormat::R16G16B16A16f
        | PixelFormat::R32f
        | PixelFormat::R32G32f
        | PixelFormat::R32G32B32A32f => ChannelType::Sfloat,
        PixelFormat::Invalid => ChannelType::Unspecified,
        _ => ChannelType::Unorm,
    }
}

/// sRGB is assumed for most formats; BC4/BC5/A8 are linear, BC6 is HDR-linear.
fn default_linear_profile(fmt: PixelFormat) -> ColourProfile {
    match fmt {
        PixelFormat::Bc4Ati1U | PixelFormat::Bc4Ati1S | PixelFormat::Bc5Ati2U | PixelFormat::Bc5Ati2S | PixelFormat::A8 => {
            ColourProfile::Lrgb
        }
        PixelFormat::Bc6U | PixelFormat::Bc6S => ColourProfile::Hdra,
        _ => ColourProfile::Srgb,
    }
}

fn fourcc_to_pixel_format(code: u32) -> (PixelFormat, AlphaMode) {
    if code == fourcc(b"DXT1") {
        (PixelFormat::Bc1Dxt1, AlphaMode::Unspecified)
    } else if code == fourcc(b"DXT2") {
        (PixelFormat::Bc2Dxt2Dxt3, AlphaMode::Premultiplied)
    } else if code == fourcc(b"DXT3") {
        (PixelFormat::Bc2Dxt2Dxt3, AlphaMode::Normal)
    } else if code == fourcc(b"DXT4") {
        (PixelFormat::Bc3Dxt4Dxt5, AlphaMode::Premultiplied)
    } else if code == fourcc(b"DXT5") {
        (PixelFormat::Bc3Dxt4Dxt5, AlphaMode::Normal)
    } else if code == fourcc(b"ATI1") || code == fourcc(b"BC4U") {
        (PixelFormat::Bc4Ati1U, AlphaMode::Unspecified)
    } else if code == fourcc(b"BC4S") {
        (PixelFormat::Bc4Ati1S, AlphaMode::Unspecified)
    } else if code == fourcc(b"ATI2") || code == fourcc(b"BC5U") {
        (PixelFormat::Bc5Ati2U, AlphaMode::Unspecified)
    } else if code == fourcc(b"BC5S") {
        (PixelFormat::Bc5Ati2S, AlphaMode::Unspecified)
    } else if code == fourcc(b"ETC ") || code == fourcc(b"ETC1") {
        (PixelFormat::Etc1, AlphaMode::Unspecified)
    } else if code == fourcc(b"ETC2") {
        (PixelFormat::Etc2Rgb, AlphaMode::Unspecified)
    } else if code == fourcc(b"ETCA") {
        (PixelFormat::Etc2Rgba, AlphaMode::Unspecified)
    } else if code == fourcc(b"ETCP") {
        (PixelFormat::Etc2Rgba1, AlphaMode::Unspecified)
    } else {
        match code {
            111 => (PixelFormat::R16f, AlphaMode::Unspecified),
            112 => (PixelFormat::R16G16f, AlphaMode::Unspecified),
            113 => (PixelFormat::R16G16B16A16f, AlphaMode::Unspecified),
            114 => (PixelFormat::R32f, AlphaMode::Unspecified),
            115 => (PixelFormat::R32G32f, AlphaMode::Unspecified),
            116 => (PixelFormat::R32G32B32A32f, AlphaMode::Unspecified),
            _ => (PixelFormat::Invalid, AlphaMode::Unspecified),
        }
    }
}

fn mask_to_pixel_format(pf: &PixelFormatHeader) -> PixelFormat {
    match (pf.rgb_bit_count, pf.r_mask, pf.g_mask, pf.b_mask, pf.a_mask) {
        (32, 0xFF0000, 0xFF00, 0xFF, 0xFF00_0000) => PixelFormat::B8G8R8A8,
        (32, 0xFF, 0xFF00, 0xFF0000, 0xFF00_0000) => PixelFormat::R8G8B8A8,
        (24, 0xFF0000, 0xFF00, 0xFF, 0) => PixelFormat::B8G8R8,
        (24, 0xFF, 0xFF00, 0xFF0000, 0) => PixelFormat::R8G8B8,
        (8, 0xFF, 0, 0, 0) if pf.flags & DDPF_LUMINANCE != 0 => PixelFormat::L8,
        (8, 0, 0, 0, 0xFF) if pf.flags & DDPF_ALPHAPIXELS != 0 => PixelFormat::A8,
        (16, 0xF800, 0x07E0, 0x001F, 0) => PixelFormat::G3B5R5G3,
        (16, 0x7C00, 0x03E0, 0x001F, 0x8000) => PixelFormat::G2B5A1R5G3,
        _ => PixelFormat::Invalid,
    }
}

/// A small slice of the DXGI enumeration this crate's consumers actually emit; returns
/// `(format, is_srgb)`.
fn dxgi_to_pixel_format(dxgi: u32) -> (PixelFormat, bool) {
    match dxgi {
        28 => (PixelFormat::R8G8B8A8, false), // R8G8B8A8_UNORM
        29 => (PixelFormat::R8G8B8A8, true),  // R8G8B8A8_UNORM_SRGB
        87 => (PixelFormat::B8G8R8A8, false), // B8G8R8A8_UNORM
        91 => (PixelFormat::B8G8R8A8, true),  // B8G8R8A8_UNORM_SRGB
        61 => (PixelFormat::R8, false),       // R8_UNORM
        2 => (PixelFormat::R32G32B32A32f, false),
        10 => (PixelFormat::R16G16B16A16f, false),
        70 | 71 => (PixelFormat::Bc1Dxt1, false),
        72 => (PixelFormat::Bc1Dxt1, true),
        73 | 74 => (PixelFormat::Bc2Dxt2Dxt3, false),
        75 => (PixelFormat::Bc2Dxt2Dxt3, true),
        76 | 77 => (PixelFormat::Bc3Dxt4Dxt5, false),
        78 => (PixelFormat::Bc3Dxt4Dxt5, true),
        79 | 80 => (PixelFormat::Bc4Ati1U, false),
        81 => (PixelFormat::Bc4Ati1S, false),
        82 | 83 => (PixelFormat::Bc5Ati2U, false),
        84 => (PixelFormat::Bc5Ati2S, false),
        95 => (PixelFormat::Bc6U, false),
        96 => (PixelFormat::Bc6S, false),
        97 | 98 => (PixelFormat::Bc7, false),
        99 => (PixelFormat::Bc7, true),
        26 => (PixelFormat::R9G9B9E5uf, false),
        25 => (PixelFormat::R11G11B10uf, false),
        _ => (PixelFormat::Invalid, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_minimal_r8g8b8a8_dds(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        data[4..8].copy_from_slice(&124u32.to_le_bytes());
        data[8..12].copy_from_slice(&DDSD_PITCH.to_le_bytes());
        data[12..16].copy_from_slice(&height.to_le_bytes());
        data[16..20].copy_from_slice(&width.to_le_bytes());
        data[20..24].copy_from_slice(&(width * 4).to_le_bytes());
        data[76..80].copy_from_slice(&32u32.to_le_bytes()); // pf size
        data[76..80].copy_from_slice(&32u32.to_le_bytes());
        let pf_flags = DDPF_RGB | DDPF_ALPHAPIXELS;
        data[76..80].copy_from_slice(&pf_flags.to_le_bytes());
        data[84..88].copy_from_slice(&32u32.to_le_bytes());
        data[88..92].copy_from_slice(&0xFFu32.to_le_bytes());
        data[92..96].copy_from_slice(&0xFF00u32.to_le_bytes());
        data[96..100].copy_from_slice(&0xFF0000u32.to_le_bytes());
        data[100..104].copy_from_slice(&0xFF00_0000u32.to_le_bytes());
        data.extend(std::iter::repeat(0u8).take((width * height * 4) as usize));
        data
    }

    #[test]
    fn parses_minimal_uncompressed_dds() {
        let data = build_minimal_r8g8b8a8_dds(2, 2);
        let img = parse(&data, false);
        assert!(img.states.contains(States::VALID));
        assert_eq!(img.pixel_format, PixelFormat::R8G8B8A8);
        assert_eq!(img.layers.len(), 1);
        assert_eq!(img.layers[0].data.len(), 16);
    }

    #[test]
    fn rejects_short_buffer() {
        let img = parse(&[0u8; 10], false);
        assert!(img.states.contains(States::FATAL_FILE_TOO_SMALL));
        assert!(!img.states.contains(States::VALID));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = build_minimal_r8g8b8a8_dds(2, 2);
        data[0] = 0;
        let img = parse(&data, false);
        assert!(img.states.contains(States::FATAL_BAD_MAGIC));
    }

    #[test]
    fn dxt1_fourcc_promotes_to_alpha_variant_when_block_has_transparent_index() {
        let mut data = vec![0u8; HEADER_SIZE];
        data[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        data[4..8].copy_from_slice(&124u32.to_le_bytes());
        data[8..12].copy_from_slice(&DDSD_LINEARSIZE.to_le_bytes());
        data[12..16].copy_from_slice(&4u32.to_le_bytes());
        data[16..20].copy_from_slice(&4u32.to_le_bytes());
        data[20..24].copy_from_slice(&8u32.to_le_bytes());
        let pf_flags = DDPF_FOURCC;
        data[76..80].copy_from_slice(&pf_flags.to_le_bytes());
        data[80..84].copy_from_slice(&fourcc(b"DXT1").to_le_bytes());
        // one BC1 block: colour0 <= colour1, index 0 = 0b11 (transparent)
        let mut block = [0u8; 8];
        block[0..2].copy_from_slice(&100u16.to_le_bytes());
        block[2..4].copy_from_slice(&200u16.to_le_bytes());
        block[4..8].copy_from_slice(&0b11u32.to_le_bytes());
        data.extend_from_slice(&block);
        let img = parse(&data, false);
        assert!(img.states.contains(States::VALID));
        assert_eq!(img.pixel_format, PixelFormat::Bc1Dxt1A);
    }
}
