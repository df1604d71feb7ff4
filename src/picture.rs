//! `Picture`: a manipulable RGBA8 image — crop, flip, rotate, resample, and tonal adjustment.
//!
//! Pixels are stored row-major with row 0 as the bottom row (origin lower-left), matching the
//! decode engine's output convention.

use crate::frame::Frame;
use crate::pixel_format::PixelFormat;
use crate::resample::{self, EdgeMode, Filter};
use crate::types::Rgba8;

/// One of the 9 grid positions used by [`Picture::crop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Where a crop's new canvas is placed relative to the source image.
#[derive(Debug, Clone, Copy)]
pub enum CropPlacement {
    Anchor(Anchor),
    /// Lower-left corner of the new canvas, in source pixel coordinates (may be negative).
    Origin(i32, i32),
}

/// Parameters for [`Adjustment::adjust_levels`].
#[derive(Debug, Clone, Copy)]
pub struct LevelsParams {
    pub black_pt: f32,
    pub mid_pt: f32,
    pub white_pt: f32,
    pub black_out: f32,
    pub white_out: f32,
    pub power_mid_gamma: f32,
}

impl LevelsParams {
    /// Clamps `black_pt ≤ mid_pt ≤ white_pt`, `black_out ≤ white_out`, and the gamma to
    /// `[0.1, 10.0]`.
    fn normalized(self) -> Self {
        let black_pt = self.black_pt.clamp(0.0, 255.0);
        let white_pt = self.white_pt.clamp(black_pt, 255.0);
        let mid_pt = self.mid_pt.clamp(black_pt, white_pt);
        let black_out = self.black_out.clamp(0.0, 255.0);
        let white_out = self.white_out.clamp(black_out, 255.0);
        let power_mid_gamma = self.power_mid_gamma.clamp(0.1, 10.0);
        Self {
            black_pt,
            mid_pt,
            white_pt,
            black_out,
            white_out,
            power_mid_gamma,
        }
    }
}

/// A manipulable RGBA8 image.
#[derive(Debug, Clone, Default)]
pub struct Picture {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    src_format: PixelFormat,
    filename: String,
    duration_sec: f32,
}

impl PartialEq for Picture {
    /// Invalid pictures are never equal to anything, including another invalid picture. Valid
    /// pictures compare dimensions and every pixel; filename, duration, and source format are
    /// metadata and don't participate.
    fn eq(&self, other: &Self) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn src_format(&self) -> PixelFormat {
        self.src_format
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn duration_sec(&self) -> f32 {
        self.duration_sec
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Fills a new canvas with a solid colour.
    pub fn set_colour(&mut self, width: u32, height: u32, colour: Rgba8) {
        self.width = width;
        self.height = height;
        self.pixels = vec![colour; (width * height) as usize];
        self.src_format = PixelFormat::R8G8B8A8;
        self.filename.clear();
        self.duration_sec = 0.0;
    }

    /// Copies a caller-owned pixel buffer. `pixels.len()` must equal `width * height`.
    pub fn set_copying(&mut self, width: u32, height: u32, pixels: &[Rgba8], src_format: PixelFormat) {
        self.set_stealing(width, height, pixels.to_vec(), src_format);
    }

    /// Moves a caller-owned pixel buffer in without copying.
    pub fn set_stealing(&mut self, width: u32, height: u32, pixels: Vec<Rgba8>, src_format: PixelFormat) {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        self.width = width;
        self.height = height;
        self.pixels = pixels;
        self.src_format = src_format;
        self.filename.clear();
        self.duration_sec = 0.0;
    }

    /// Copies from an existing picture.
    pub fn set_from_picture(&mut self, other: &Picture) {
        self.width = other.width;
        self.height = other.height;
        self.pixels = other.pixels.clone();
        self.src_format = other.src_format;
        self.filename = other.filename.clone();
        self.duration_sec = other.duration_sec;
    }

    /// Copies the pixels of `frame` into this picture, leaving `frame` untouched.
    pub fn set_from_frame_copying(&mut self, frame: &Frame) {
        self.width = frame.width();
        self.height = frame.height();
        self.pixels = frame.pixels().to_vec();
        self.src_format = frame.src_format();
        self.filename.clear();
        self.duration_sec = frame.duration_sec();
    }

    /// Takes `frame`'s pixels without copying, leaving `frame` invalid afterwards.
    pub fn set_from_frame_stealing(&mut self, frame: &mut Frame) {
        let mut taken = Frame::new();
        std::mem::swap(frame, &mut taken);
        self.width = taken.width();
        self.height = taken.height();
        self.src_format = taken.src_format();
        self.duration_sec = taken.duration_sec();
        self.pixels = taken.pixels().to_vec();
    }

    /// Transfers this picture's pixels out, leaving `self` an empty `0x0` picture.
    pub fn steal(&mut self) -> (u32, u32, Vec<Rgba8>) {
        let width = std::mem::take(&mut self.width);
        let height = std::mem::take(&mut self.height);
        let pixels = std::mem::take(&mut self.pixels);
        self.src_format = PixelFormat::Invalid;
        (width, height, pixels)
    }

    /// Crops/pads to `(new_w, new_h)`. Pixels outside the source are filled with `fill`.
    pub fn crop(&mut self, new_w: u32, new_h: u32, placement: CropPlacement, fill: Rgba8) {
        if new_w == 0 || new_h == 0 {
            self.width = 0;
            self.height = 0;
            self.pixels.clear();
            return;
        }
        let (ox, oy) = match placement {
            CropPlacement::Origin(x, y) => (x, y),
            CropPlacement::Anchor(anchor) => self.anchor_origin(anchor, new_w, new_h),
        };

        let mut out = vec![fill; (new_w * new_h) as usize];
        for dy in 0..new_h {
            for dx in 0..new_w {
                let sx = ox + dx as i32;
                let sy = oy + dy as i32;
                if sx >= 0 && sy >= 0 && (sx as u32) < self.width && (sy as u32) < self.height {
                    out[(dy * new_w + dx) as usize] = self.pixels[self.idx(sx as u32, sy as u32)];
                }
            }
        }
        self.width = new_w;
        self.height = new_h;
        self.pixels = out;
    }

    fn anchor_origin(&self, anchor: Anchor, new_w: u32, new_h: u32) -> (i32, i32) {
        let dw = self.width as i32 - new_w as i32;
        let dh = self.height as i32 - new_h as i32;
        let (left, bottom) = (0, 0);
        let (center_x, center_y) = (dw / 2, dh / 2);
        let (right, top) = (dw, dh);
        match anchor {
            Anchor::BottomLeft => (left, bottom),
            Anchor::BottomCenter => (center_x, bottom),
            Anchor::BottomRight => (right, bottom),
            Anchor::MiddleLeft => (left, center_y),
            Anchor::MiddleCenter => (center_x, center_y),
            Anchor::MiddleRight => (right, center_y),
            Anchor::TopLeft => (left, top),
            Anchor::TopCenter => (center_x, top),
            Anchor::TopRight => (right, top),
        }
    }

    /// Auto-trims edges whose every pixel matches `colour` on the channels selected by
    /// `channel_mask` (R, G, B, A). Returns `false` (leaving the image unchanged) if trimming
    /// would consume the entire image.
    pub fn crop_auto_trim(&mut self, colour: Rgba8, channel_mask: [bool; 4]) -> bool {
        let matches_colour = |p: Rgba8| (0..4).all(|c| !channel_mask[c] || p[c] == colour[c]);

        let row_matches = |y: u32, w: &Picture| (0..w.width).all(|x| matches_colour(w.pixels[w.idx(x, y)]));
        let col_matches = |x: u32, w: &Picture| (0..w.height).all(|y| matches_colour(w.pixels[w.idx(x, y)]));

        let mut top = 0u32;
        while top < self.height && row_matches(self.height - 1 - top, self) {
            top += 1;
        }
        let mut bottom = 0u32;
        while bottom < self.height - top && row_matches(bottom, self) {
            bottom += 1;
        }
        let mut left = 0u32;
        while left < self.width && col_matches(left, self) {
            left += 1;
        }
        let mut right = 0u32;
        while right < self.width - left && col_matches(self.width - 1 - right, self) {
            right += 1;
        }

        if left + right >= self.width || top + bottom >= self.height {
            return false;
        }

        let new_w = self.width - left - right;
        let new_h = self.height - top - bottom;
        self.crop(new_w, new_h, CropPlacement::Origin(left as i32, bottom as i32), [0; 4]);
        true
    }

    /// Exact 90-degree rotation.
    pub fn rotate_90(&mut self, anticlockwise: bool) {
        let (w, h) = (self.width, self.height);
        let mut out = vec![[0u8; 4]; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                let src = self.pixels[self.idx(x, y)];
                // new_width after the swap below is `h`; (dx, dy) are coordinates in that
                // rotated frame, so the output index strides by `h`, not by the old width.
                let (dx, dy) = if anticlockwise {
                    (y, w - 1 - x)
                } else {
                    (h - 1 - y, x)
                };
                out[(dy * h + dx) as usize] = src;
            }
        }
        self.width = h;
        self.height = w;
        self.pixels = out;
    }

    /// Exact horizontal/vertical flip.
    pub fn flip(&mut self, horizontal: bool) {
        let (w, h) = (self.width, self.height);
        if horizontal {
            for y in 0..h {
                let row = (y * w) as usize..((y + 1) * w) as usize;
                self.pixels[row].reverse();
            }
        } else {
            let mut top = 0u32;
            let mut bottom = h.saturating_sub(1);
            while top < bottom {
                let (a, b) = self.pixels.split_at_mut((bottom * w) as usize);
                let ta = (top * w) as usize;
                a[ta..ta + w as usize].swap_with_slice(&mut b[..w as usize]);
                top += 1;
                bottom -= 1;
            }
        }
    }

    /// Box-average half-size downscale. Succeeds iff each dimension is 1 or even.
    pub fn scale_half(&mut self) -> bool {
        match resample::scale_half(&self.pixels, self.width as usize, self.height as usize) {
            Some((pixels, w, h)) => {
                self.width = w as u32;
                self.height = h as u32;
                self.pixels = pixels;
                true
            }
            None => false,
        }
    }

    /// Resamples in place. A no-op when `(w, h)` already match.
    pub fn resample(&mut self, w: u32, h: u32, filter: Filter, edge: EdgeMode) {
        if w == self.width && h == self.height {
            return;
        }
        self.pixels = resample::resample(&self.pixels, self.width as usize, self.height as usize, w as usize, h as usize, filter, edge);
        self.width = w;
        self.height = h;
    }

    /// Rotates about the image centre by `angle_rad`. When both filters are `None`, uses
    /// nearest-neighbour sampling. When both are supplied, upscales 4x with `up_filter`, rotates
    /// the upscaled image with nearest-neighbour, then applies `scale_half` (`down_filter`)
    /// twice. The bounding box of the rotated corners is rounded with epsilon `2e-4`.
    pub fn rotate_center(&mut self, angle_rad: f32, fill: Rgba8, up_filter: Option<Filter>, down_filter: Option<Filter>) {
        const EPS: f32 = 2e-4;
        // Three supported combinations: no filters (nearest at native size), both filters
        // (single 4x upscale with up_filter), or only down_filter (two successive 2x
        // nearest-neighbour upscales — "upscale by 2x twice" with no up_filter to delegate to).
        let (src_w, src_h, src_pixels) = match (up_filter, down_filter) {
            (Some(up), Some(_)) => {
                let w4 = self.width * 4;
                let h4 = self.height * 4;
                let up_pixels = resample::resample(&self.pixels, self.width as usize, self.height as usize, w4 as usize, h4 as usize, up, EdgeMode::Clamp);
                (w4, h4, up_pixels)
            }
            (None, Some(_)) => {
                let w2 = self.width * 2;
                let h2 = self.height * 2;
                let step1 = resample::resample(&self.pixels, self.width as usize, self.height as usize, w2 as usize, h2 as usize, Filter::Nearest, EdgeMode::Clamp);
                let w4 = w2 * 2;
                let h4 = h2 * 2;
                let step2 = resample::resample(&step1, w2 as usize, h2 as usize, w4 as usize, h4 as usize, Filter::Nearest, EdgeMode::Clamp);
                (w4, h4, step2)
            }
            _ => (self.width, self.height, self.pixels.clone()),
        };

        let (cos_a, sin_a) = (angle_rad.cos(), angle_rad.sin());
        let (cx, cy) = (src_w as f32 / 2.0, src_h as f32 / 2.0);
        let corners = [(0.0, 0.0), (src_w as f32, 0.0), (0.0, src_h as f32), (src_w as f32, src_h as f32)];
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for (x, y) in corners {
            let (rx, ry) = (x - cx, y - cy);
            let nx = rx * cos_a - ry * sin_a + cx;
            let ny = rx * sin_a + ry * cos_a + cy;
            min_x = min_x.min(nx);
            max_x = max_x.max(nx);
            min_y = min_y.min(ny);
            max_y = max_y.max(ny);
        }
        let out_w = ((max_x - min_x + EPS).round() as u32).max(1);
        let out_h = ((max_y - min_y + EPS).round() as u32).max(1);

        let mut rotated = vec![fill; (out_w * out_h) as usize];
        for dy in 0..out_h {
            for dx in 0..out_w {
                let (px, py) = (dx as f32 + min_x, dy as f32 + min_y);
                let (rx, ry) = (px - cx, py - cy);
                // Inverse rotation to find the source sample location.
                let sx = rx * cos_a + ry * sin_a + cx;
                let sy = -rx * sin_a + ry * cos_a + cy;
                let (six, siy) = (sx.round() as i64, sy.round() as i64);
                if six >= 0 && siy >= 0 && (six as u32) < src_w && (siy as u32) < src_h {
                    rotated[(dy * out_w + dx) as usize] = src_pixels[(siy as u32 * src_w + six as u32) as usize];
                }
            }
        }

        self.width = out_w;
        self.height = out_h;
        self.pixels = rotated;

        if down_filter.is_some() {
            self.scale_half();
            self.scale_half();
        }
    }

    /// Builds the mipmap chain below this picture, down to `1x1`. Dimensions that aren't a power
    /// of two halve with truncation, clamped to a minimum of 1. `chain = true` builds each level
    /// from the previous level; `chain = false` always resamples from `self`.
    pub fn generate_layers(&self, filter: Filter, edge: EdgeMode, chain: bool) -> Vec<Picture> {
        let mut levels = Vec::new();
        let mut prev = self.clone();
        let (mut w, mut h) = (self.width, self.height);
        while w > 1 || h > 1 {
            w = (w / 2).max(1);
            h = (h / 2).max(1);
            let mut level = if chain { prev.clone() } else { self.clone() };
            level.resample(w, h, filter, edge);
            levels.push(level.clone());
            prev = level;
        }
        levels
    }

    /// `c' = c*a + colour*(1-a)`. When `reset_alpha`, the output alpha is forced to 255.
    pub fn alpha_blend_colour(&mut self, colour: Rgba8, reset_alpha: bool) {
        for p in self.pixels.iter_mut() {
            let a = p[3] as f32 / 255.0;
            for c in 0..3 {
                p[c] = (p[c] as f32 * a + colour[c] as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
            }
            if reset_alpha {
                p[3] = 255;
            }
        }
    }

    /// Begins a tonal-adjustment session. Every `adjust_*` call on the returned [`Adjustment`]
    /// recomputes from the original pixels captured here, never from a prior adjustment.
    pub fn begin(&mut self) -> Adjustment<'_> {
        let histograms = compute_histograms(&self.pixels);
        let original = self.pixels.clone();
        Adjustment {
            picture: self,
            original,
            buffer: None,
            histograms,
        }
    }
}

fn compute_histograms(pixels: &[Rgba8]) -> [[u32; 256]; 4] {
    let mut histograms = [[0u32; 256]; 4];
    for p in pixels {
        for c in 0..4 {
            histograms[c][p[c] as usize] += 1;
        }
    }
    histograms
}

/// An in-progress tonal adjustment, started by [`Picture::begin`].
pub struct Adjustment<'a> {
    picture: &'a mut Picture,
    original: Vec<Rgba8>,
    buffer: Option<Vec<Rgba8>>,
    histograms: [[u32; 256]; 4],
}

impl<'a> Adjustment<'a> {
    /// Per-channel 256-bin histograms of the original (pre-adjustment) pixels.
    pub fn histograms(&self) -> &[[u32; 256]; 4] {
        &self.histograms
    }

    /// Brightness in `[-255, 255]`, added to each RGB channel.
    pub fn adjust_brightness(&mut self, brightness: f32) {
        let buf = self.buffer.get_or_insert_with(Vec::new);
        buf.clear();
        buf.extend(self.original.iter().map(|p| {
            let mut out = *p;
            for c in 0..3 {
                out[c] = (p[c] as f32 + brightness).round().clamp(0.0, 255.0) as u8;
            }
            out
        }));
    }

    /// Contrast in `[-1, 1]`, pivoted at mid-grey (128).
    pub fn adjust_contrast(&mut self, contrast: f32) {
        let factor = (1.0 + contrast.clamp(-1.0, 1.0)).max(0.0);
        let buf = self.buffer.get_or_insert_with(Vec::new);
        buf.clear();
        buf.extend(self.original.iter().map(|p| {
            let mut out = *p;
            for c in 0..3 {
                out[c] = ((p[c] as f32 - 128.0) * factor + 128.0).round().clamp(0.0, 255.0) as u8;
            }
            out
        }));
    }

    /// Photoshop-style levels: clamps input to `[black_pt, white_pt]`, applies a power curve of
    /// exponent `1 / power_mid_gamma`, and remaps into `[black_out, white_out]`.
    pub fn adjust_levels(&mut self, params: LevelsParams) {
        let params = params.normalized();
        let buf = self.buffer.get_or_insert_with(Vec::new);
        buf.clear();
        let span_in = (params.white_pt - params.black_pt).max(1.0);
        let span_out = params.white_out - params.black_out;
        buf.extend(self.original.iter().map(|p| {
            let mut out = *p;
            for c in 0..3 {
                let normalized = ((p[c] as f32 - params.black_pt) / span_in).clamp(0.0, 1.0);
                let curved = normalized.powf(1.0 / params.power_mid_gamma);
                out[c] = (params.black_out + curved * span_out).round().clamp(0.0, 255.0) as u8;
            }
            out
        }));
    }

    /// Commits the adjustment buffer (`commit = true`) or discards it, leaving the picture as it
    /// was when [`Picture::begin`] was called.
    pub fn end(self, commit: bool) {
        if commit {
            if let Some(buf) = self.buffer {
                self.picture.pixels = buf;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(w: u32, h: u32) -> Picture {
        let mut p = Picture::new();
        let mut pixels = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                pixels.push([v, v, v, 255]);
            }
        }
        p.set_stealing(w, h, pixels, PixelFormat::R8G8B8A8);
        p
    }

    #[test]
    fn set_and_steal_round_trip_is_byte_identical() {
        let mut p = Picture::new();
        let src = vec![[1, 2, 3, 4], [5, 6, 7, 8]];
        p.set_copying(2, 1, &src, PixelFormat::R8G8B8A8);
        let (w, h, pixels) = p.steal();
        assert_eq!((w, h), (2, 1));
        assert_eq!(pixels, src);
        assert!(!p.is_valid());
    }

    #[test]
    fn set_from_frame_stealing_invalidates_frame() {
        let mut frame = Frame::new();
        frame.set_copying(1, 1, &[[9, 9, 9, 255]], 0.0, PixelFormat::R8G8B8A8);
        let mut p = Picture::new();
        p.set_from_frame_stealing(&mut frame);
        assert_eq!(p.pixels(), &[[9, 9, 9, 255]]);
        assert_eq!(frame.width(), 0);
    }

    #[test]
    fn crop_to_zero_makes_picture_invalid() {
        let mut p = checkerboard(4, 4);
        p.crop(0, 0, CropPlacement::Origin(0, 0), [0; 4]);
        assert!(!p.is_valid());
    }

    #[test]
    fn crop_auto_trim_removes_matching_border() {
        let mut p = Picture::new();
        let fill = [255, 255, 255, 255];
        let inner = [1, 2, 3, 255];
        let mut pixels = vec![fill; 16];
        pixels[1 * 4 + 1] = inner;
        pixels[1 * 4 + 2] = inner;
        pixels[2 * 4 + 1] = inner;
        pixels[2 * 4 + 2] = inner;
        p.set_stealing(4, 4, pixels, PixelFormat::R8G8B8A8);
        assert!(p.crop_auto_trim(fill, [true, true, true, false]));
        assert_eq!((p.width(), p.height()), (2, 2));
        assert!(p.pixels().iter().all(|&px| px == inner));
    }

    #[test]
    fn crop_auto_trim_refuses_to_consume_whole_image() {
        let mut p = checkerboard(2, 2);
        let solid_colour = p.pixels()[0];
        let mut solid = Picture::new();
        solid.set_colour(2, 2, solid_colour);
        assert!(!solid.crop_auto_trim(solid_colour, [true, true, true, true]));
        assert_eq!((solid.width(), solid.height()), (2, 2));
    }

    #[test]
    fn rotate_90_swaps_dimensions() {
        let mut p = checkerboard(4, 2);
        p.rotate_90(false);
        assert_eq!((p.width(), p.height()), (2, 4));
    }

    #[test]
    fn flip_horizontal_reverses_each_row() {
        let mut p = Picture::new();
        p.set_stealing(2, 1, vec![[1, 0, 0, 255], [2, 0, 0, 255]], PixelFormat::R8G8B8A8);
        p.flip(true);
        assert_eq!(p.pixels(), &[[2, 0, 0, 255], [1, 0, 0, 255]]);
    }

    #[test]
    fn scale_half_one_by_one_passes_through() {
        let mut p = checkerboard(1, 1);
        let before = p.pixels().to_vec();
        assert!(p.scale_half());
        assert_eq!((p.width(), p.height()), (1, 1));
        assert_eq!(p.pixels(), before.as_slice());
    }

    #[test]
    fn scale_half_eleven_wide_fails_ten_wide_succeeds() {
        let mut eleven = checkerboard(11, 1);
        assert!(!eleven.scale_half());
        let mut ten = checkerboard(10, 1);
        assert!(ten.scale_half());
        assert_eq!((ten.width(), ten.height()), (5, 1));
    }

    #[test]
    fn resample_to_same_dimensions_is_a_no_op() {
        let mut p = checkerboard(4, 4);
        let before = p.pixels().to_vec();
        p.resample(4, 4, Filter::LanczosNormal, EdgeMode::Clamp);
        assert_eq!(p.pixels(), before.as_slice());
    }

    #[test]
    fn generate_layers_ends_at_one_by_one() {
        let p = checkerboard(4, 4);
        let layers = p.generate_layers(Filter::Box, EdgeMode::Clamp, true);
        assert_eq!(layers.len(), 2);
        assert_eq!((layers[0].width(), layers[0].height()), (2, 2));
        assert_eq!((layers[1].width(), layers[1].height()), (1, 1));
    }

    #[test]
    fn alpha_blend_colour_with_full_alpha_is_unchanged() {
        let mut p = Picture::new();
        p.set_stealing(1, 1, vec![[10, 20, 30, 255]], PixelFormat::R8G8B8A8);
        p.alpha_blend_colour([0, 0, 0, 255], false);
        assert_eq!(p.pixels()[0], [10, 20, 30, 255]);
    }

    #[test]
    fn alpha_blend_colour_with_zero_alpha_takes_blend_colour() {
        let mut p = Picture::new();
        p.set_stealing(1, 1, vec![[10, 20, 30, 0]], PixelFormat::R8G8B8A8);
        p.alpha_blend_colour([200, 100, 50, 255], true);
        assert_eq!(p.pixels()[0], [200, 100, 50, 255]);
    }

    #[test]
    fn adjustment_end_discard_leaves_picture_unchanged() {
        let mut p = Picture::new();
        p.set_stealing(1, 1, vec![[100, 100, 100, 255]], PixelFormat::R8G8B8A8);
        let mut adj = p.begin();
        adj.adjust_brightness(50.0);
        adj.end(false);
        assert_eq!(p.pixels()[0], [100, 100, 100, 255]);
    }

    #[test]
    fn adjustment_end_commit_applies_change() {
        let mut p = Picture::new();
        p.set_stealing(1, 1, vec![[100, 100, 100, 255]], PixelFormat::R8G8B8A8);
        let mut adj = p.begin();
        adj.adjust_brightness(50.0);
        adj.end(true);
        assert_eq!(p.pixels()[0], [150, 150, 150, 255]);
    }

    #[test]
    fn successive_adjusts_always_start_from_original() {
        let mut p = Picture::new();
        p.set_stealing(1, 1, vec![[100, 100, 100, 255]], PixelFormat::R8G8B8A8);
        let mut adj = p.begin();
        adj.adjust_brightness(50.0);
        adj.adjust_brightness(-50.0);
        adj.end(true);
        // the second call overwrites from `original`, not from the first call's result.
        assert_eq!(p.pixels()[0], [50, 50, 50, 255]);
    }
}
