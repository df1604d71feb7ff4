//! DDS container scenarios: legacy FourCC alpha promotion and DX10 sRGB format resolution.

use imageforge_core::colour::ColourProfile;
use imageforge_core::containers::dds;
use imageforge_core::pixel_format::PixelFormat;
use imageforge_core::state::States;

const MAGIC: u32 = 0x2053_3344;
const HEADER_SIZE: usize = 128;
const DX10_HEADER_SIZE: usize = 20;
const DDPF_FOURCC: u32 = 0x4;
const DDSD_LINEARSIZE: u32 = 0x8_0000;

fn fourcc(bytes: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*bytes)
}

fn base_header(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_SIZE];
    data[0..4].copy_from_slice(&MAGIC.to_le_bytes());
    data[4..8].copy_from_slice(&124u32.to_le_bytes());
    data[8..12].copy_from_slice(&DDSD_LINEARSIZE.to_le_bytes());
    data[12..16].copy_from_slice(&height.to_le_bytes());
    data[16..20].copy_from_slice(&width.to_le_bytes());
    data
}

/// Scenario 1: a DXT1 block whose colour0 <= colour1 and at least one 2-bit index is `0b11`
/// (transparent) promotes the detected format from BC1DXT1 to BC1DXT1A.
#[test]
fn dds_legacy_dxt1_detects_implicit_alpha() {
    let mut data = base_header(4, 4);
    data[20..24].copy_from_slice(&8u32.to_le_bytes());
    data[76..80].copy_from_slice(&DDPF_FOURCC.to_le_bytes());
    data[80..84].copy_from_slice(&fourcc(b"DXT1").to_le_bytes());

    let mut block = [0u8; 8];
    block[0..2].copy_from_slice(&0x0000u16.to_le_bytes()); // colour0
    block[2..4].copy_from_slice(&0xFFFFu16.to_le_bytes()); // colour1 (colour0 <= colour1)
    block[4..8].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes()); // every index = 0b11
    data.extend_from_slice(&block);

    let img = dds::parse(&data, false);
    assert!(img.states.contains(States::VALID));
    assert_eq!(img.pixel_format, PixelFormat::Bc1Dxt1A);
    assert_eq!(img.pixel_format_src, PixelFormat::Bc1Dxt1);
    assert_eq!(img.num_mipmap_layers, 1);
}

/// Scenario 2: a DX10 extension declaring `BC7_UNORM_SRGB` (dxgi 99) resolves to BC7 with an
/// sRGB colour profile.
#[test]
fn dds_dx10_bc7_srgb_resolves_format_and_profile() {
    let mut data = base_header(4, 4);
    data[8..12].copy_from_slice(&0x8u32.to_le_bytes()); // DDSD_PITCH
    data[20..24].copy_from_slice(&16u32.to_le_bytes()); // pitch
    data[76..80].copy_from_slice(&DDPF_FOURCC.to_le_bytes());
    data[80..84].copy_from_slice(&fourcc(b"DX10").to_le_bytes());

    let mut dx10 = vec![0u8; DX10_HEADER_SIZE];
    dx10[0..4].copy_from_slice(&99u32.to_le_bytes()); // DXGI_FORMAT_BC7_UNORM_SRGB
    data.extend_from_slice(&dx10);
    data.extend(std::iter::repeat(0u8).take(16)); // one 4x4 BC7 block (16 bytes)

    let img = dds::parse(&data, false);
    assert!(img.states.contains(States::VALID));
    assert_eq!(img.pixel_format, PixelFormat::Bc7);
    assert_eq!(img.colour_profile, ColourProfile::Srgb);
}
