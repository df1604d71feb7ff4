//! Shared pixel-buffer types used across the packed decoder, block decoders, and decode engine.

/// One decoded 8-bit-per-channel pixel, channel order R,G,B,A.
pub type Rgba8 = [u8; 4];

/// One decoded 32-bit-float-per-channel pixel, channel order R,G,B,A.
pub type Rgbaf = [f32; 4];

/// The decode engine's output: exactly one variant is ever populated, enforced by the type
/// itself rather than by convention (see the distilled spec's Design Notes on "variant decode
/// output").
#[derive(Debug, Clone)]
pub enum DecodedBuffer {
    /// 8-bit-per-channel output, produced for every LDR format.
    Ldr(Vec<Rgba8>),
    /// 32-bit-float-per-channel output, produced for HDR formats (half/float packed channels,
    /// shared-exponent/packed-float formats, BC6H, and the vendor formats).
    Hdr(Vec<Rgbaf>),
}

impl DecodedBuffer {
    /// Borrows the LDR buffer, or `None` if this is an HDR result.
    pub fn as_ldr(&self) -> Option<&[Rgba8]> {
        match self {
            Self::Ldr(v) => Some(v),
            Self::Hdr(_) => None,
        }
    }

    /// Borrows the HDR buffer, or `None` if this is an LDR result.
    pub fn as_hdr(&self) -> Option<&[Rgbaf]> {
        match self {
            Self::Hdr(v) => Some(v),
            Self::Ldr(_) => None,
        }
    }
}
