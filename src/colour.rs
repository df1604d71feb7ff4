//! Colour profile, alpha mode, and channel type taxonomy.

/// Author-intended interpretation of decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColourProfile {
    /// Not recorded by the source container.
    #[default]
    Unspecified,
    /// Non-linear sRGB.
    Srgb,
    /// Non-linear gamma-encoded RGB (generic gamma, not necessarily 2.2).
    Grgb,
    /// Linear RGB, values expected to stay within `[0, 1]`.
    Lrgb,
    /// Linear HDR RGB; values may exceed 1.0.
    Hdra,
    /// LDR sRGB colour with LDR linear alpha.
    LdrSrgbLdrLinearAlpha,
    /// LDR gamma RGB with LDR linear alpha.
    LdrGrgbLdrLinearAlpha,
    /// LDR linear RGB with LDR linear alpha.
    LdrLinearRgba,
    /// HDR linear RGB with LDR linear alpha.
    HdrLinearRgbLdrLinearAlpha,
    /// HDR linear RGBA (alpha also unbounded).
    HdrLinearRgba,
    /// Caller asks the decode engine to infer the profile (see [`is_linear_in_rgb`]).
    Auto,
}

/// Returns true when `profile`'s RGB channels are stored linearly (no sRGB/gamma curve
/// applied), which is the condition the decode engine's auto-gamma filter uses to decide
/// whether to apply an sRGB compression pass.
pub fn is_linear_in_rgb(profile: ColourProfile) -> bool {
    matches!(
        profile,
        ColourProfile::Lrgb
            | ColourProfile::Hdra
            | ColourProfile::LdrLinearRgba
            | ColourProfile::HdrLinearRgbLdrLinearAlpha
            | ColourProfile::HdrLinearRgba
    )
}

/// How the alpha channel should be interpreted / combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    /// Not recorded by the source container.
    #[default]
    Unspecified,
    /// The format carries no meaningful alpha (fully opaque).
    None,
    /// Straight (non-premultiplied) alpha.
    Normal,
    /// Colour channels already multiplied by alpha.
    Premultiplied,
}

/// Numeric interpretation of a decoded channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelType {
    /// The format has no meaningful channel type (e.g. palette formats).
    None,
    /// Unsigned normalized integer (`[0, 1]`).
    #[default]
    Unorm,
    /// Signed normalized integer (`[-1, 1]`).
    Snorm,
    /// Unsigned integer, stored as-is.
    Uint,
    /// Signed integer, stored as-is.
    Sint,
    /// Unsigned floating point (no sign bit; used by `R11G11B10uf` and `R9G9B9E5uf`).
    Ufloat,
    /// Signed IEEE-754-style floating point.
    Sfloat,
    /// Not recorded by the source container.
    Unspecified,
}
