//! Synthetic frames for unit tests.

use std::ops::Range;

use crate::stitching::raster::{RasterImage, CHANNELS};

/// SplitMix64 finalizer; good enough to decorrelate neighbouring pixels.
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

pub(crate) fn noise_pixel(seed: u64, row: usize, col: usize) -> [u8; CHANNELS] {
    let h = mix(seed.wrapping_mul(0x1000_0001) ^ ((row as u64) << 32) ^ col as u64);
    [h as u8, (h >> 8) as u8, (h >> 16) as u8]
}

pub(crate) fn noise_frame(width: usize, height: usize, seed: u64) -> RasterImage {
    RasterImage::from_fn(width, height, |r, c| noise_pixel(seed, r, c)).unwrap()
}

/// Low-frequency pattern whose correlation decays slowly with small shifts.
pub(crate) fn smooth_frame(width: usize, height: usize, row_offset: usize) -> RasterImage {
    RasterImage::from_fn(width, height, |r, c| {
        let y = (r + row_offset) as f64;
        let x = c as f64;
        let base = 128.0 + 60.0 * (y * 0.11).sin() + 40.0 * (x * 0.07 + y * 0.03).sin();
        let v = base.clamp(0.0, 255.0) as u8;
        [v, v.wrapping_add(17), 255 - v]
    })
    .unwrap()
}

pub(crate) fn with_uniform_rows(
    frame: &RasterImage,
    rows: Range<usize>,
    pixel: [u8; CHANNELS],
) -> RasterImage {
    RasterImage::from_fn(frame.width(), frame.height(), |r, c| {
        if rows.contains(&r) { pixel } else { frame.pixel(r, c) }
    })
    .unwrap()
}

/// Frame `b` whose first `overlap` rows repeat the last `overlap` rows of `a`.
pub(crate) fn vertical_successor(a: &RasterImage, height: usize, overlap: usize, seed: u64) -> RasterImage {
    let start = a.height() - overlap;
    RasterImage::from_fn(a.width(), height, |r, c| {
        if r < overlap { a.pixel(start + r, c) } else { noise_pixel(seed, r, c) }
    })
    .unwrap()
}

/// Frame `b` whose first `overlap` columns repeat the last `overlap` columns of `a`.
pub(crate) fn horizontal_successor(a: &RasterImage, width: usize, overlap: usize, seed: u64) -> RasterImage {
    let start = a.width() - overlap;
    RasterImage::from_fn(width, a.height(), |r, c| {
        if c < overlap { a.pixel(r, start + c) } else { noise_pixel(seed, r, c) }
    })
    .unwrap()
}
