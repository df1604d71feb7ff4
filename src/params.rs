//! Load parameter flags consumed by the container parsers and decode engine, and the save
//! parameter shapes for the external format loaders this crate's consumers wrap around.

use bitflags::bitflags;

bitflags! {
    /// Bitmask controlling what a parser/decoder does with a container's layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LoadParams: u32 {
        /// Decode layers to RGBA8/RGBAf rather than leaving them as raw block/packed bytes.
        const DECODE = 1 << 0;
        /// Reverse row order (the container's default texel origin is flipped vs this crate's).
        const REVERSE_ROW_ORDER = 1 << 1;
        /// Apply gamma compression during decode.
        const GAMMA_COMPRESSION = 1 << 2;
        /// Apply sRGB compression during decode.
        const SRGB_COMPRESSION = 1 << 3;
        /// Resolve gamma/sRGB compression automatically from the source colour profile.
        const AUTO_GAMMA = 1 << 4;
        /// Apply tone-map exposure to HDR buffers during decode.
        const TONE_MAP_EXPOSURE = 1 << 5;
        /// Copy a single-channel source's red channel into green and blue.
        const SPREAD_LUMINANCE = 1 << 6;
        /// Raise a conditional (rather than ignoring it) when a BC dimension isn't a multiple of four.
        const COND_MULT_FOUR_DIM = 1 << 7;
        /// Raise a conditional when a BC dimension isn't a power of two.
        const COND_POWER_TWO_DIM = 1 << 8;
        /// Promote every conditional to its fatal counterpart.
        const STRICT_LOADING = 1 << 9;
        /// Swizzle BGR channel order to RGB after decode.
        const SWIZZLE_BGR_TO_RGB = 1 << 10;
        /// Honour container metadata that specifies a non-default orientation.
        const META_DATA_ORIENT = 1 << 11;
    }
}

impl LoadParams {
    /// `Decode | ReverseRowOrder | AutoGamma | SpreadLuminance`, the default mask for DDS/KTX.
    pub fn default_dds_ktx() -> Self {
        Self::DECODE | Self::REVERSE_ROW_ORDER | Self::AUTO_GAMMA | Self::SPREAD_LUMINANCE
    }

    /// The DDS/KTX default plus `StrictLoading | MetaDataOrient`, the default mask for PVR.
    pub fn default_pvr() -> Self {
        Self::default_dds_ktx() | Self::STRICT_LOADING | Self::META_DATA_ORIENT
    }
}

impl Default for LoadParams {
    fn default() -> Self {
        Self::default_dds_ktx()
    }
}

/// Scalar knobs that accompany [`LoadParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadScalars {
    /// Gamma value for `GAMMA_COMPRESSION`. Default `2.2`.
    pub gamma: f32,
    /// Exposure value for `TONE_MAP_EXPOSURE`. Default `1.0`.
    pub exposure: f32,
    /// `max_range` for RGBM/RGBD packed formats. Default `8.0`.
    pub max_range: f32,
}

impl Default for LoadScalars {
    fn default() -> Self {
        Self {
            gamma: 2.2,
            exposure: 1.0,
            max_range: 8.0,
        }
    }
}

/// The pixel layout an external encoder is asked to save in. Only named here; encoding itself
/// is the responsibility of the third-party-wrapped loaders this crate's consumers own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaveFormat {
    #[default]
    Invalid,
    Bpp24,
    Bpp32,
    Bpp24Bpc16,
    Bpp48Bpc16,
    /// Let the external encoder pick based on the source picture's alpha/bit-depth.
    Auto,
}

/// Lossless compression scheme for formats that support one (BMP RLE, TGA RLE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaveCompression {
    #[default]
    None,
    Rle,
}

/// The parameter shape passed to an external encoder (BMP, TGA, JPEG, PNG, TIFF, QOI, WebP).
/// This crate defines the shape only; no encoder is invoked here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaveParams {
    pub format: SaveFormat,
    /// JPEG/WebP-style quality, `1..=100`.
    pub quality: u8,
    pub compression: SaveCompression,
    /// WebP lossy vs lossless.
    pub lossy: bool,
    /// WebP's combined quality/compression-effort knob, `0..=100`.
    pub quality_compstr: u8,
    /// Overrides a frame's stored duration when saving an animated format.
    pub override_frame_duration_ms: Option<u32>,
}

impl Default for SaveParams {
    fn default() -> Self {
        Self {
            format: SaveFormat::Auto,
            quality: 90,
            compression: SaveCompression::None,
            lossy: true,
            quality_compstr: 75,
            override_frame_duration_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dds_ktx_mask_matches_spec() {
        let p = LoadParams::default_dds_ktx();
        assert!(p.contains(LoadParams::DECODE));
        assert!(p.contains(LoadParams::REVERSE_ROW_ORDER));
        assert!(p.contains(LoadParams::AUTO_GAMMA));
        assert!(p.contains(LoadParams::SPREAD_LUMINANCE));
        assert!(!p.contains(LoadParams::STRICT_LOADING));
    }

    #[test]
    fn default_pvr_mask_adds_strict_and_orient() {
        let p = LoadParams::default_pvr();
        assert!(p.contains(LoadParams::STRICT_LOADING));
        assert!(p.contains(LoadParams::META_DATA_ORIENT));
        assert!(p.contains(LoadParams::DECODE));
    }

    #[test]
    fn scalar_defaults_match_spec() {
        let s = LoadScalars::default();
        assert_eq!(s.gamma, 2.2);
        assert_eq!(s.exposure, 1.0);
        assert_eq!(s.max_range, 8.0);
    }
}
