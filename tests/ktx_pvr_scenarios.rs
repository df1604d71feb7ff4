//! KTX and PVR container scenarios.

use imageforge_core::colour::{ChannelType, ColourProfile};
use imageforge_core::containers::{ktx, pvr};
use imageforge_core::pixel_format::PixelFormat;
use imageforge_core::state::States;

const KTX1_MAGIC: [u8; 12] = [0xAB, b'K', b'T', b'X', b' ', b'1', b'1', 0xBB, b'\r', b'\n', 0x1A, b'\n'];

fn write_u32(data: &mut [u8], offset: usize, v: u32) {
    data[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
}

/// Scenario 4: a KTX1 container declaring `COMPRESSED_SRGB8_ALPHA8_ASTC_6x5_KHR` at 6x5
/// resolves to `Astc6X5` with an sRGB colour profile, one 16-byte block.
#[test]
fn ktx1_astc_6x5_srgb_resolves_format_and_profile() {
    const HEADER_END: usize = 12 + 13 * 4;
    let mut data = vec![0u8; HEADER_END];
    data[0..12].copy_from_slice(&KTX1_MAGIC);
    write_u32(&mut data, 12, 0x0403_0201); // native endianness marker
    write_u32(&mut data, 28, 0x93D5); // glInternalFormat = COMPRESSED_SRGB8_ALPHA8_ASTC_6x5_KHR
    write_u32(&mut data, 36, 6); // width
    write_u32(&mut data, 40, 5); // height
    write_u32(&mut data, 48, 1); // number of array elements
    write_u32(&mut data, 52, 1); // number of faces
    write_u32(&mut data, 56, 1); // number of mipmap levels
    write_u32(&mut data, 60, 0); // key-value data length

    write_u32(&mut data, HEADER_END, 16); // image size for the single mip
    data.extend(std::iter::repeat(0u8).take(16)); // one ASTC 6x5 block

    let img = ktx::parse(&data, None);
    assert!(img.states.contains(States::VALID));
    assert_eq!(img.pixel_format, PixelFormat::Astc6X5);
    assert_eq!(img.colour_profile, ColourProfile::Srgb);
    assert_eq!(img.layers.len(), 1);
    assert_eq!(img.layers[0].data.len(), 16);

    let opts = imageforge_core::DecodeOptions::new();
    let decoded = imageforge_core::decode(img.pixel_format, &img.layers[0].data, 6, 5, &opts).unwrap();
    assert!(decoded.as_hdr().is_some(), "ASTC must decode to RGBAf, alpha always present");
}

/// Scenario 3: a PVR V3 container with format `RGBM` (LS32 = 0x35), channel type
/// UnsignedByteNormalised, linear colour-space, decodes `{128, 0, 0, 64}` at `max_range = 8`
/// to `R ~= 1.2627, G = B = 0, A = 1`, with the colour profile promoted to HDRa.
#[test]
fn pvr_v3_rgbm_resolves_and_promotes_profile() {
    const HEADER_SIZE: usize = 52;
    let mut data = vec![0u8; HEADER_SIZE];
    write_u32(&mut data, 0, 0x0352_5650); // 'PVR3' magic
    write_u32(&mut data, 4, 0); // flags
    write_u32(&mut data, 8, 0x35); // pixel format lo32 = RGBM
    write_u32(&mut data, 12, 0); // pixel format hi32
    write_u32(&mut data, 16, 0); // colour space: 0 = linear
    write_u32(&mut data, 20, 0); // channel type: 0 = UnsignedByteNorm
    write_u32(&mut data, 24, 1); // height
    write_u32(&mut data, 28, 1); // width
    write_u32(&mut data, 32, 1); // depth
    write_u32(&mut data, 36, 1); // num surfaces
    write_u32(&mut data, 40, 1); // num faces
    write_u32(&mut data, 44, 1); // num mips
    write_u32(&mut data, 48, 0); // meta data size
    data.extend_from_slice(&[128, 0, 0, 64]);

    let img = pvr::parse(&data, false);
    assert!(img.states.contains(States::VALID));
    assert_eq!(img.pixel_format, PixelFormat::R8G8B8M8);
    assert_eq!(img.colour_profile, ColourProfile::Hdra);
    assert_eq!(img.channel_type, ChannelType::Unorm);
    assert_eq!(img.layers.len(), 1);
    assert_eq!(img.layers[0].data, vec![128, 0, 0, 64]);

    let opts = imageforge_core::DecodeOptions {
        max_range: 8.0,
        ..imageforge_core::DecodeOptions::new()
    };
    let decoded = imageforge_core::decode(PixelFormat::R8G8B8M8, &img.layers[0].data, 1, 1, &opts).unwrap();
    let px = decoded.as_hdr().unwrap()[0];
    assert!((px[0] - 1.2627).abs() < 0.001);
    assert_eq!(px[1], 0.0);
    assert_eq!(px[2], 0.0);
    assert_eq!(px[3], 1.0);
}
