//! Container-parse result bitfield: one bit per structural/semantic/conditional condition a
//! DDS/KTX/PVR parser can raise, plus stable human-readable descriptions for each bit.

use bitflags::bitflags;

bitflags! {
    /// The result of parsing a container header. `VALID` is set only when no `FATAL_*` bit is
    /// set; `CONDITIONAL_*` bits may coexist with `VALID` (the container loaded, but something
    /// about it was non-canonical).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct States: u32 {
        /// The container parsed successfully; no fatal bit is set.
        const VALID = 1 << 0;

        // --- Conditional: loading continues, but something was irregular. ---
        /// Row-reversal was requested but could not be performed for this format/height.
        const CONDITIONAL_ROW_REVERSAL_FAILED = 1 << 1;
        /// The `pitch`/`linear size` fields were not an exclusive pair as the format expects.
        const CONDITIONAL_PITCH_XOR_LINEAR_SIZE = 1 << 2;
        /// The pixel-format flag bits didn't match any recognised pattern cleanly.
        const CONDITIONAL_PIXEL_FORMAT_SPEC = 1 << 3;
        /// A BC-format dimension was not a multiple of four.
        const CONDITIONAL_DIMENSION_NOT_MULT_FOUR = 1 << 4;
        /// A BC-format dimension was not a power of two.
        const CONDITIONAL_DIMENSION_NOT_POWER_TWO = 1 << 5;
        /// The on-disk version didn't match the filename extension's expected dialect.
        const CONDITIONAL_EXT_VERSION_MISMATCH = 1 << 6;
        /// A PVR V2 FourCC field was present but didn't match the expected value.
        const CONDITIONAL_V2_FOURCC_INCORRECT = 1 << 7;
        /// PVR V1/V2 mipmap-count and mipmap-flag fields disagreed.
        const CONDITIONAL_MIPMAP_FLAG_INCONSISTENT = 1 << 8;

        // --- Fatal: loading is abandoned and the container is left empty. ---
        /// The buffer is smaller than the format's minimum header size.
        const FATAL_FILE_TOO_SMALL = 1 << 16;
        /// The magic number / signature did not match.
        const FATAL_BAD_MAGIC = 1 << 17;
        /// A header-size field did not match any known on-disk version.
        const FATAL_BAD_HEADER_SIZE = 1 << 18;
        /// Width, height, depth, or array-size is zero or exceeds the resource limit.
        const FATAL_INVALID_DIMENSIONS = 1 << 19;
        /// A dimension exceeds the 32768 texel limit.
        const FATAL_DIMENSION_TOO_LARGE = 1 << 20;
        /// More than 16 mipmap levels were declared.
        const FATAL_TOO_MANY_MIP_LEVELS = 1 << 21;
        /// No format-detection path matched.
        const FATAL_UNKNOWN_PIXEL_FORMAT = 1 << 22;
        /// A DX10 extension header was required but absent or malformed.
        const FATAL_MISSING_OR_BAD_DX10_HEADER = 1 << 23;
        /// Volume (3D) textures are out of scope.
        const FATAL_VOLUME_TEXTURES_NOT_SUPPORTED = 1 << 24;
        /// The cubemap face bits were inconsistent with the declared face count.
        const FATAL_CUBEMAP_FACE_COUNT_INCONSISTENT = 1 << 25;
        /// PVR "twiddled" (Morton-order) data is out of scope.
        const FATAL_TWIDDLED_DATA_NOT_SUPPORTED = 1 << 26;
        /// A PVRTC1 (V1/V2) surface did not meet the power-of-two / minimum-size constraint.
        const FATAL_PVRTC_DIMENSION_CONSTRAINT_VIOLATED = 1 << 27;
        /// The on-disk container version is not one this parser understands.
        const FATAL_UNSUPPORTED_FILE_VERSION = 1 << 28;
        /// Row-reversal was required (strict mode) but could not be performed.
        const FATAL_ROW_REVERSAL_FAILED = 1 << 29;
        /// The on-disk version did not match the filename extension's expected dialect.
        const FATAL_EXT_VERSION_MISMATCH = 1 << 30;
        /// A PVR V1/V2 header field (FourCC or mipmap flag/count) was internally inconsistent.
        const FATAL_V2_HEADER_INCONSISTENT = 1 << 31;
    }
}

impl States {
    /// Mask of every `FATAL_*` bit.
    pub const FATAL_MASK: States = States::from_bits_truncate(0xFFFF_0000);
    /// Mask of every `CONDITIONAL_*` bit.
    pub const CONDITIONAL_MASK: States = States::from_bits_truncate(0x0000_FFFE);

    /// True iff any `FATAL_*` bit is set (equivalently, `VALID` must not be set).
    pub fn is_fatal(self) -> bool {
        self.intersects(States::FATAL_MASK)
    }

    /// Promotes every set `CONDITIONAL_*` bit to its matching `FATAL_*` counterpart, per
    /// strict-loading mode. Every `CONDITIONAL_*` bit has a fatal counterpart.
    pub fn promote_conditionals_to_fatal(self) -> States {
        let mut out = self;
        if self.contains(States::CONDITIONAL_ROW_REVERSAL_FAILED) {
            out |= States::FATAL_ROW_REVERSAL_FAILED;
        }
        if self.contains(States::CONDITIONAL_PITCH_XOR_LINEAR_SIZE) {
            out |= States::FATAL_BAD_HEADER_SIZE;
        }
        if self.contains(States::CONDITIONAL_PIXEL_FORMAT_SPEC) {
            out |= States::FATAL_UNKNOWN_PIXEL_FORMAT;
        }
        if self.contains(States::CONDITIONAL_DIMENSION_NOT_MULT_FOUR)
            || self.contains(States::CONDITIONAL_DIMENSION_NOT_POWER_TWO)
        {
            out |= States::FATAL_INVALID_DIMENSIONS;
        }
        if self.contains(States::CONDITIONAL_EXT_VERSION_MISMATCH) {
            out |= States::FATAL_EXT_VERSION_MISMATCH;
        }
        if self.contains(States::CONDITIONAL_V2_FOURCC_INCORRECT)
            || self.contains(States::CONDITIONAL_MIPMAP_FLAG_INCONSISTENT)
        {
            out |= States::FATAL_V2_HEADER_INCONSISTENT;
        }
        out &= !States::VALID;
        out
    }
}

/// A stable, human-readable description for a single state bit. Returns `None` for a value
/// that isn't exactly one known bit.
pub fn state_desc(bit: States) -> Option<&'static str> {
    Some(match bit {
        States::VALID => "container parsed successfully",
        States::CONDITIONAL_ROW_REVERSAL_FAILED => "row reversal could not be performed",
        States::CONDITIONAL_PITCH_XOR_LINEAR_SIZE => "pitch/linear-size fields are not an exclusive pair",
        States::CONDITIONAL_PIXEL_FORMAT_SPEC => "pixel-format flag bits did not match a known pattern",
        States::CONDITIONAL_DIMENSION_NOT_MULT_FOUR => "dimension is not a multiple of four",
        States::CONDITIONAL_DIMENSION_NOT_POWER_TWO => "dimension is not a power of two",
        States::CONDITIONAL_EXT_VERSION_MISMATCH => "on-disk version does not match the file extension",
        States::CONDITIONAL_V2_FOURCC_INCORRECT => "V2 FourCC field is incorrect",
        States::CONDITIONAL_MIPMAP_FLAG_INCONSISTENT => "mipmap count and mipmap flag are inconsistent",
        States::FATAL_FILE_TOO_SMALL => "file is smaller than the minimum header size",
        States::FATAL_BAD_MAGIC => "magic number does not match",
        States::FATAL_BAD_HEADER_SIZE => "header size field is not a recognised value",
        States::FATAL_INVALID_DIMENSIONS => "width/height/depth/array-size is zero or exceeds the limit",
        States::FATAL_DIMENSION_TOO_LARGE => "dimension exceeds the 32768 texel limit",
        States::FATAL_TOO_MANY_MIP_LEVELS => "more than 16 mipmap levels declared",
        States::FATAL_UNKNOWN_PIXEL_FORMAT => "no format-detection path matched",
        States::FATAL_MISSING_OR_BAD_DX10_HEADER => "DX10 extension header missing or malformed",
        States::FATAL_VOLUME_TEXTURES_NOT_SUPPORTED => "volume (3D) textures are not supported",
        States::FATAL_CUBEMAP_FACE_COUNT_INCONSISTENT => "cubemap face bits inconsistent with face count",
        States::FATAL_TWIDDLED_DATA_NOT_SUPPORTED => "twiddled (Morton-order) data is not supported",
        States::FATAL_PVRTC_DIMENSION_CONSTRAINT_VIOLATED => "PVRTC1 surface must be power-of-two and at least 4x4",
        States::FATAL_UNSUPPORTED_FILE_VERSION => "container version is not supported",
        States::FATAL_ROW_REVERSAL_FAILED => "row reversal could not be performed",
        States::FATAL_EXT_VERSION_MISMATCH => "on-disk version does not match the file extension",
        States::FATAL_V2_HEADER_INCONSISTENT => "PVR V1/V2 header field is internally inconsistent",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_mask_detects_any_fatal_bit() {
        let s = States::VALID | States::FATAL_BAD_MAGIC;
        assert!(s.is_fatal());
        assert!(!States::VALID.is_fatal());
    }

    #[test]
    fn strict_promotion_clears_valid() {
        let s = States::VALID | States::CONDITIONAL_PIXEL_FORMAT_SPEC;
        let promoted = s.promote_conditionals_to_fatal();
        assert!(!promoted.contains(States::VALID));
        assert!(promoted.contains(States::FATAL_UNKNOWN_PIXEL_FORMAT));
    }

    #[test]
    fn every_named_bit_has_a_description() {
        for bit in [
            States::VALID,
            States::CONDITIONAL_ROW_REVERSAL_FAILED,
            States::FATAL_BAD_MAGIC,
            States::FATAL_UNSUPPORTED_FILE_VERSION,
        ] {
            assert!(state_desc(bit).is_some());
        }
    }
}
