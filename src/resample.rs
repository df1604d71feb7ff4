//! Two-pass (horizontal then vertical) pixel resampler with a family of interpolation kernels.

use crate::types::Rgba8;

/// Interpolation kernel used by [`resample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Box,
    Bilinear,
    BicubicStandard,
    BicubicCatmullRom,
    BicubicMitchell,
    BicubicCardinal,
    BicubicBSpline,
    LanczosNarrow,
    LanczosNormal,
    LanczosWide,
}

/// How source indices are resolved when a kernel tap falls outside `[0, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    Clamp,
    Wrap,
}

fn resolve_index(idx: i64, count: usize, edge: EdgeMode) -> usize {
    let count = count as i64;
    match edge {
        EdgeMode::Clamp => idx.clamp(0, count - 1) as usize,
        EdgeMode::Wrap => idx.rem_euclid(count) as usize,
    }
}

fn axis_ratio(src: usize, dst: usize) -> f64 {
    if dst > 1 {
        (src - 1) as f64 / (dst - 1) as f64
    } else {
        1.0
    }
}

fn mitchell_netravali(b: f64, c: f64, x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * x.powi(3)
            + (-18.0 + 12.0 * b + 6.0 * c) * x.powi(2)
            + (6.0 - 2.0 * b))
            / 6.0
    } else if x < 2.0 {
        ((-b - 6.0 * c) * x.powi(3)
            + (6.0 * b + 30.0 * c) * x.powi(2)
            + (-12.0 * b - 60.0 * c) * x
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

fn lanczos(a: f64, x: f64) -> f64 {
    if x.abs() >= a {
        0.0
    } else {
        sinc(x) * sinc(x / a)
    }
}

/// Kernel support radius, in source-pixel units. Fixed regardless of scale ratio: only `Box`
/// widens its support on minification (handled separately in [`box_sample`]), every other
/// kernel samples the same fixed neighbourhood whether upscaling or downscaling.
fn base_support(filter: Filter) -> f64 {
    match filter {
        Filter::Nearest => 0.5,
        Filter::Box => 1.0,
        Filter::Bilinear => 1.0,
        Filter::BicubicStandard
        | Filter::BicubicCatmullRom
        | Filter::BicubicMitchell
        | Filter::BicubicCardinal
        | Filter::BicubicBSpline => 2.0,
        Filter::LanczosNarrow => 2.0,
        Filter::LanczosNormal => 3.0,
        Filter::LanczosWide => 4.0,
    }
}

/// Kernel weight at a tap offset `x` (source pixels from the destination-sample centre,
/// unscaled). Bicubic and Lanczos legitimately return negative weights (ringing); only
/// Bilinear is clamped to `[0, 1]` here (`Box`/`Nearest` are handled outside this function).
fn weight(filter: Filter, x: f64) -> f64 {
    match filter {
        Filter::Nearest | Filter::Box => unreachable!("Nearest/Box are handled outside the weighted kernel path"),
        Filter::Bilinear => (1.0 - x.abs()).max(0.0),
        Filter::BicubicStandard => mitchell_netravali(0.0, 3.0 / 4.0, x),
        Filter::BicubicCatmullRom => mitchell_netravali(0.0, 0.5, x),
        Filter::BicubicMitchell => mitchell_netravali(1.0 / 3.0, 1.0 / 3.0, x),
        Filter::BicubicCardinal => mitchell_netravali(0.0, 1.0, x),
        Filter::BicubicBSpline => mitchell_netravali(1.0, 0.0, x),
        Filter::LanczosNarrow => lanczos(2.0, x),
        Filter::LanczosNormal => lanczos(3.0, x),
        Filter::LanczosWide => lanczos(4.0, x),
    }
}

/// Box filter sample at `center` (source-pixel units). On minification (`ratio >= 1.0`) this
/// widens to a `2*ratio`-wide triangle, matching every other kernel's "wider support when
/// downscaling" behaviour. On magnification (`ratio < 1.0`) a tap that lands within the source
/// pixel's footprint (`dist < 0.5 - ratio`) is returned directly with no blending at all, since
/// the destination sample falls entirely inside that one source texel.
fn box_sample(center: f64, ratio: f64, src_len: usize, edge: EdgeMode, fetch: &dyn Fn(usize) -> [f64; 4]) -> [f64; 4] {
    let pixel_dist = (ratio + 1.0) as i64;
    let ix0 = center.trunc() as i64;
    let mut sum = [0.0f64; 4];
    let mut wsum = 0.0f64;
    for ks in (1 - pixel_dist)..=pixel_dist {
        let ix = ix0 + ks;
        let dist = (center - ix as f64).abs();
        let idx = resolve_index(ix, src_len, edge);
        let px = fetch(idx);
        let w = if ratio >= 1.0 {
            1.0 - dist.min(ratio) / ratio
        } else if dist < 0.5 - ratio {
            return px;
        } else {
            1.0 - dist
        };
        for c in 0..4 {
            sum[c] += px[c] * w;
        }
        wsum += w;
    }
    if wsum > 0.0 {
        let mut r = [0.0f64; 4];
        for c in 0..4 {
            r[c] = sum[c] / wsum;
        }
        r
    } else {
        [0.0; 4]
    }
}

/// One 1D pass along either axis, operating on `f64` channel accumulators to avoid compounding
/// rounding error across the horizontal and vertical passes.
fn resample_axis(src: &[[f64; 4]], src_len: usize, cross_len: usize, dst_len: usize, filter: Filter, edge: EdgeMode, axis_major: bool) -> Vec<[f64; 4]> {
    let ratio = axis_ratio(src_len, dst_len);
    let support = base_support(filter);
    let mut out = vec![[0.0f64; 4]; dst_len * cross_len];

    for cross in 0..cross_len {
        let fetch = |idx: usize| -> [f64; 4] {
            if axis_major {
                src[idx * cross_len + cross]
            } else {
                src[cross * src_len + idx]
            }
        };
        for d in 0..dst_len {
            let center = d as f64 * ratio;
            let px = match filter {
                Filter::Nearest => {
                    let idx = resolve_index(center.round() as i64, src_len, edge);
                    fetch(idx)
                }
                Filter::Box => box_sample(center, ratio, src_len, edge, &fetch),
                _ => {
                    let lo = (center - support).floor() as i64;
                    let hi = (center + support).ceil() as i64;
                    let mut sum = [0.0f64; 4];
                    let mut wsum = 0.0f64;
                    for raw in lo..=hi {
                        let w = weight(filter, raw as f64 - center);
                        if w == 0.0 {
                            continue;
                        }
                        let idx = resolve_index(raw, src_len, edge);
                        let p = fetch(idx);
                        for c in 0..4 {
                            sum[c] += p[c] * w;
                        }
                        wsum += w;
                    }
                    if wsum > 0.0 {
                        let mut r = [0.0f64; 4];
                        for c in 0..4 {
                            r[c] = sum[c] / wsum;
                        }
                        r
                    } else {
                        [0.0; 4]
                    }
                }
            };
            if axis_major {
                out[d * cross_len + cross] = px;
            } else {
                out[cross * dst_len + d] = px;
            }
        }
    }
    out
}

/// Resamples `src` (row-major, `src_w * src_h` pixels) to `dst_w * dst_h`. A no-op (exact copy)
/// when the dimensions already match.
pub fn resample(src: &[Rgba8], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize, filter: Filter, edge: EdgeMode) -> Vec<Rgba8> {
    if src_w == dst_w && src_h == dst_h {
        return src.to_vec();
    }
    let as_f64: Vec<[f64; 4]> = src.iter().map(|p| [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]).collect();

    // Horizontal pass: src_h rows of src_w -> src_h rows of dst_w. Row-major, so "major" axis is
    // rows (cross_len = src_h) and we index by row*src_w + col, i.e. axis_major = false.
    let h_pass = resample_axis(&as_f64, src_w, src_h, dst_w, filter, edge, false);

    // Vertical pass: src_h rows of dst_w -> dst_h rows of dst_w. Now the varying axis is rows
    // (axis_major = true, cross_len = dst_w).
    let v_pass = resample_axis(&h_pass, src_h, dst_w, dst_h, filter, edge, true);

    v_pass
        .into_iter()
        .map(|p| {
            [
                p[0].round().clamp(0.0, 255.0) as u8,
                p[1].round().clamp(0.0, 255.0) as u8,
                p[2].round().clamp(0.0, 255.0) as u8,
                p[3].round().clamp(0.0, 255.0) as u8,
            ]
        })
        .collect()
}

/// Exact box-average half-size downscale. Succeeds iff each dimension is 1 (passes through
/// unchanged along that axis) or even.
pub fn scale_half(src: &[Rgba8], width: usize, height: usize) -> Option<(Vec<Rgba8>, usize, usize)> {
    if (width != 1 && width % 2 != 0) || (height != 1 && height % 2 != 0) {
        return None;
    }
    let dst_w = if width == 1 { 1 } else { width / 2 };
    let dst_h = if height == 1 { 1 } else { height / 2 };
    let mut out = vec![[0u8; 4]; dst_w * dst_h];

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let x0 = if width == 1 { 0 } else { dx * 2 };
            let x1 = if width == 1 { 0 } else { dx * 2 + 1 };
            let y0 = if height == 1 { 0 } else { dy * 2 };
            let y1 = if height == 1 { 0 } else { dy * 2 + 1 };
            let samples = [src[y0 * width + x0], src[y0 * width + x1], src[y1 * width + x0], src[y1 * width + x1]];
            let mut acc = [0u32; 4];
            for s in &samples {
                for c in 0..4 {
                    acc[c] += s[c] as u32;
                }
            }
            out[dy * dst_w + dx] = [
                (acc[0] / 4) as u8,
                (acc[1] / 4) as u8,
                (acc[2] / 4) as u8,
                (acc[3] / 4) as u8,
            ];
        }
    }
    Some((out, dst_w, dst_h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_to_same_size_is_identity() {
        let src = vec![[10, 20, 30, 255], [40, 50, 60, 255], [70, 80, 90, 255], [100, 110, 120, 255]];
        let out = resample(&src, 2, 2, 2, 2, Filter::LanczosNormal, EdgeMode::Clamp);
        assert_eq!(out, src);
    }

    #[test]
    fn nearest_upsamples_without_blending() {
        let src = vec![[255, 0, 0, 255], [0, 255, 0, 255]];
        let out = resample(&src, 2, 1, 4, 1, Filter::Nearest, EdgeMode::Clamp);
        assert_eq!(out.len(), 4);
        // every output pixel must be exactly one of the two source colours, never a blend.
        for p in &out {
            assert!(*p == [255, 0, 0, 255] || *p == [0, 255, 0, 255]);
        }
    }

    #[test]
    fn scale_half_averages_two_by_two_blocks() {
        let src = vec![[0, 0, 0, 0], [100, 100, 100, 100], [200, 200, 200, 200], [50, 50, 50, 50]];
        let (out, w, h) = scale_half(&src, 2, 2).unwrap();
        assert_eq!((w, h), (1, 1));
        assert_eq!(out[0], [87, 87, 87, 87]);
    }

    #[test]
    fn scale_half_rejects_odd_dimension() {
        let src = vec![[0u8; 4]; 9];
        assert!(scale_half(&src, 3, 3).is_none());
    }

    #[test]
    fn scale_half_one_dimensional_row_passes_through() {
        let src = vec![[10, 10, 10, 10], [20, 20, 20, 20]];
        let (out, w, h) = scale_half(&src, 2, 1).unwrap();
        assert_eq!((w, h), (1, 1));
        assert_eq!(out[0], [15, 15, 15, 15]);
    }

    #[test]
    fn wrap_edge_mode_samples_around() {
        assert_eq!(resolve_index(-1, 4, EdgeMode::Wrap), 3);
        assert_eq!(resolve_index(4, 4, EdgeMode::Wrap), 0);
        assert_eq!(resolve_index(-1, 4, EdgeMode::Clamp), 0);
        assert_eq!(resolve_index(4, 4, EdgeMode::Clamp), 3);
    }
}
