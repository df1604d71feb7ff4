//! Error types for parsing and decoding.

use std::fmt;

/// Errors that can occur while decoding a layer's pixel data.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The caller passed a non-empty output buffer where an empty one was required.
    BuffersNotClear,
    /// The pixel format has no decode path in this crate.
    UnsupportedFormat(String),
    /// The input byte slice or dimensions are inconsistent with the format.
    InvalidInput(String),
    /// A packed-format decode failed.
    PackedDecode(String),
    /// A block-format (BC/ETC/EAC) decode failed.
    BlockDecode(String),
    /// The ASTC adapter failed.
    Astc(String),
    /// The PVRTC adapter failed.
    Pvr(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuffersNotClear => write!(f, "output buffers were not empty before decode"),
            Self::UnsupportedFormat(msg) => write!(f, "unsupported format: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::PackedDecode(msg) => write!(f, "packed decode error: {msg}"),
            Self::BlockDecode(msg) => write!(f, "block decode error: {msg}"),
            Self::Astc(msg) => write!(f, "ASTC decode error: {msg}"),
            Self::Pvr(msg) => write!(f, "PVR decode error: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors that can occur while parsing a container (DDS/KTX/PVR) header.
///
/// These correspond to the "Fatal" states in [`crate::state::States`]; a parser that
/// encounters one of these abandons the load and leaves the container empty.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The buffer is smaller than the format's minimum header size.
    FileTooSmall { needed: usize, got: usize },
    /// The magic number / signature did not match.
    BadMagic,
    /// A header-size field did not match any known on-disk version.
    BadHeaderSize(u32),
    /// Width, height, depth, or array-size is zero or exceeds the resource limit.
    InvalidDimensions { width: u32, height: u32 },
    /// A dimension exceeds the 32768 texel limit.
    DimensionTooLarge { dim: u32 },
    /// More than 16 mipmap levels were declared.
    TooManyMipLevels { count: u32 },
    /// No format-detection path (FourCC, DXGI, GL, VK, or PVR) matched.
    UnknownPixelFormat,
    /// A DX10 extension header was required but absent or malformed.
    MissingOrBadDx10Header,
    /// Volume (3D) textures are out of scope.
    VolumeTexturesNotSupported,
    /// The cubemap face bits were inconsistent with the declared face count.
    CubemapFaceCountInconsistent,
    /// PVR "twiddled" (Morton-order) data is out of scope.
    TwiddledDataNotSupported,
    /// A PVRTC1 (V1/V2) surface did not meet the power-of-two / minimum-size constraint.
    PvrtcDimensionConstraintViolated,
    /// The on-disk container version is not one this parser understands.
    UnsupportedFileVersion(u32),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooSmall { needed, got } => {
                write!(f, "file too small: need at least {needed} bytes, got {got}")
            }
            Self::BadMagic => write!(f, "bad magic number"),
            Self::BadHeaderSize(size) => write!(f, "unrecognized header size: {size}"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions: {width}x{height}")
            }
            Self::DimensionTooLarge { dim } => write!(f, "dimension {dim} exceeds 32768 limit"),
            Self::TooManyMipLevels { count } => {
                write!(f, "{count} mipmap levels exceeds the 16-level limit")
            }
            Self::UnknownPixelFormat => write!(f, "no pixel format detection path matched"),
            Self::MissingOrBadDx10Header => write!(f, "DX10 extension header missing or malformed"),
            Self::VolumeTexturesNotSupported => write!(f, "volume (3D) textures are not supported"),
            Self::CubemapFaceCountInconsistent => {
                write!(f, "cubemap face bits inconsistent with face count")
            }
            Self::TwiddledDataNotSupported => write!(f, "twiddled (Morton-order) data is not supported"),
            Self::PvrtcDimensionConstraintViolated => {
                write!(f, "PVRTC1 surface must be power-of-two and at least 4x4")
            }
            Self::UnsupportedFileVersion(v) => write!(f, "unsupported container version: {v}"),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = DecodeError::BuffersNotClear;
        assert_eq!(err.to_string(), "output buffers were not empty before decode");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::TooManyMipLevels { count: 17 };
        assert_eq!(err.to_string(), "17 mipmap levels exceeds the 16-level limit");
    }
}
