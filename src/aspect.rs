//! The aspect-ratio catalogue: a fixed enumeration of screen ratios and print sizes, plus the
//! `reduce`/`as_fraction`/`from_fraction` utilities used by crop/resample callers that want to
//! snap a picture to a named ratio.

/// One entry in the aspect-ratio catalogue, or one of the three sentinels (`Free`/`User`/`Invalid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum AspectRatio {
    #[default]
    Invalid,
    /// No constraint; any ratio is acceptable.
    Free,
    /// A ratio not present in the catalogue, produced by [`from_fraction`].
    User,

    Screen1X1,
    Screen3X2,
    Screen2X3,
    Screen4X3,
    Screen3X4,
    Screen5X4,
    Screen4X5,
    Screen16X9,
    Screen9X16,
    Screen16X10,
    Screen10X16,
    Screen21X9,
    Screen9X21,
    Screen32X9,
    Screen9X32,
    Screen5X3,
    Screen3X5,
    Screen8X5,
    Screen5X8,
    Screen7X5,
    Screen5X7,
    Screen11X8,
    Screen8X11,
    Screen2X1,
    Screen1X2,
    Screen3X1,
    Screen1X3,

    Print2X3,
    Print3X2,
    Print4X6,
    Print6X4,
    Print5X7,
    Print7X5,
    Print8X10,
    Print10X8,
    Print11X14,
    Print14X11,
    Print16X20,
    Print20X16,
    Print16X24,
    Print24X16,
    Print18X24,
    Print24X18,
    Print20X24,
    Print24X20,
    Print20X30,
    Print30X20,
    Print24X36,
    Print36X24,
}

const CATALOGUE: &[(AspectRatio, u32, u32)] = {
    use AspectRatio::*;
    &[
        (Screen1X1, 1, 1),
        (Screen3X2, 3, 2),
        (Screen2X3, 2, 3),
        (Screen4X3, 4, 3),
        (Screen3X4, 3, 4),
        (Screen5X4, 5, 4),
        (Screen4X5, 4, 5),
        (Screen16X9, 16, 9),
        (Screen9X16, 9, 16),
        (Screen16X10, 16, 10),
        (Screen10X16, 10, 16),
        (Screen21X9, 21, 9),
        (Screen9X21, 9, 21),
        (Screen32X9, 32, 9),
        (Screen9X32, 9, 32),
        (Screen5X3, 5, 3),
        (Screen3X5, 3, 5),
        (Screen8X5, 8, 5),
        (Screen5X8, 5, 8),
        (Screen7X5, 7, 5),
        (Screen5X7, 5, 7),
        (Screen11X8, 11, 8),
        (Screen8X11, 8, 11),
        (Screen2X1, 2, 1),
        (Screen1X2, 1, 2),
        (Screen3X1, 3, 1),
        (Screen1X3, 1, 3),
        (Print2X3, 2, 3),
        (Print3X2, 3, 2),
        (Print4X6, 4, 6),
        (Print6X4, 6, 4),
        (Print5X7, 5, 7),
        (Print7X5, 7, 5),
        (Print8X10, 8, 10),
        (Print10X8, 10, 8),
        (Print11X14, 11, 14),
        (Print14X11, 14, 11),
        (Print16X20, 16, 20),
        (Print20X16, 20, 16),
        (Print16X24, 16, 24),
        (Print24X16, 24, 16),
        (Print18X24, 18, 24),
        (Print24X18, 24, 18),
        (Print20X24, 20, 24),
        (Print24X20, 24, 20),
        (Print20X30, 20, 30),
        (Print30X20, 30, 20),
        (Print24X36, 24, 36),
        (Print36X24, 36, 24),
    ]
};

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Reduces `ratio`'s numerator/denominator by their GCD. Catalogue entries (screen/print sizes)
/// are already in lowest terms, so this is idempotent for them; `Free`/`User`/`Invalid` have no
/// fraction and are returned unchanged.
pub fn reduce(ratio: AspectRatio) -> AspectRatio {
    match as_fraction(ratio) {
        Some((n, d)) => from_fraction(n, d),
        None => ratio,
    }
}

/// Looks up `ratio`'s catalogue fraction, or `None` for `Free`/`User`/`Invalid`.
pub fn as_fraction(ratio: AspectRatio) -> Option<(u32, u32)> {
    CATALOGUE.iter().find(|(r, _, _)| *r == ratio).map(|(_, n, d)| (*n, *d))
}

/// Converts `ratio` to a floating-point width/height ratio, or `None` for `Free`/`User`/`Invalid`.
pub fn as_float(ratio: AspectRatio) -> Option<f64> {
    as_fraction(ratio).map(|(n, d)| n as f64 / d as f64)
}

/// Reduces `(num, den)` by their GCD and looks it up in the catalogue; returns `User` if the
/// reduced fraction isn't a catalogue entry, or `Invalid` if `den == 0`.
pub fn from_fraction(num: u32, den: u32) -> AspectRatio {
    if den == 0 {
        return AspectRatio::Invalid;
    }
    let g = gcd(num, den).max(1);
    let (n, d) = (num / g, den / g);
    CATALOGUE
        .iter()
        .find(|(_, cn, cd)| *cn == n && *cd == d)
        .map(|(r, _, _)| *r)
        .unwrap_or(AspectRatio::User)
}
