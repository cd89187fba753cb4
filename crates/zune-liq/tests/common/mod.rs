/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Shared gradient images and assertions
#![allow(dead_code)]

use nanorand::{Rng, WyRand};
use zune_liq::bridge::RGBA;
use zune_liq::errors::{LiqErrors, UnsupportedFormats};
use zune_liq::quantize::QuantizationResult;

/// Width and height of the gradient
pub const SIZE: usize = 512;

/// Allowed difference between a reconstructed and an original component
pub const TOLERANCE: u8 = 30;

pub const CORNERS: [(usize, usize); 4] =
    [(0, 0), (SIZE - 1, 0), (0, SIZE - 1), (SIZE - 1, SIZE - 1)];

/// Reference corner colors of the opaque gradient
pub const OPAQUE_CORNERS: [((usize, usize), [u8; 4]); 4] = [
    ((0, 0), [0, 0, 128, 255]),
    ((511, 0), [255, 0, 139, 255]),
    ((0, 511), [0, 255, 117, 255]),
    ((511, 511), [255, 255, 126, 255])
];

/// Reference corner colors of the gradient with alpha
pub const TRANSPARENT_CORNERS: [((usize, usize), [u8; 4]); 4] = [
    ((0, 0), [0, 0, 128, 254]),
    ((511, 0), [255, 0, 139, 127]),
    ((0, 511), [0, 255, 117, 127]),
    ((511, 511), [255, 255, 126, 0])
];

const BLUE: [f32; 4] = [128.0, 139.0, 117.0, 126.0];
const ALPHA: [f32; 4] = [254.0, 127.0, 127.0, 0.0];

fn bilinear(corners: [f32; 4], x: usize, y: usize) -> u8 {
    let fx = x as f32 / (SIZE - 1) as f32;
    let fy = y as f32 / (SIZE - 1) as f32;

    let top = corners[0] * (1.0 - fx) + corners[1] * fx;
    let bottom = corners[2] * (1.0 - fx) + corners[3] * fx;

    (top * (1.0 - fy) + bottom * fy).round() as u8
}

/// Color of the gradient at `(x,y)`
///
/// Red grows along x, green along y, blue and alpha
/// are interpolated between the corners.
pub fn gradient_pixel(x: usize, y: usize, alpha: bool) -> [u8; 4] {
    let r = ((x * 255) as f32 / (SIZE - 1) as f32).round() as u8;
    let g = ((y * 255) as f32 / (SIZE - 1) as f32).round() as u8;
    let b = bilinear(BLUE, x, y);
    let a = if alpha { bilinear(ALPHA, x, y) } else { 255 };

    [r, g, b, a]
}

/// A 512x512 gradient as `R`,`G`,`B`,`A` rows
pub fn gradient_rgba(alpha: bool) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(SIZE * SIZE * 4);

    for y in 0..SIZE {
        for x in 0..SIZE {
            pixels.extend_from_slice(&gradient_pixel(x, y, alpha));
        }
    }
    pixels
}

/// The gradient without alpha, as `R`,`G`,`B` rows
pub fn gradient_rgb() -> Vec<u8> {
    gradient_rgba(false)
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

/// Check host pixels before conversion against the reference corners
pub fn assert_input_corners(lookup: impl Fn(usize, usize) -> [u8; 4], alpha: bool) {
    let corners = if alpha { TRANSPARENT_CORNERS } else { OPAQUE_CORNERS };

    for ((x, y), expected) in corners {
        assert_eq!(lookup(x, y), expected, "input corner ({x},{y})");
    }
}

/// Result for a 2x2 image whose index plane misses a pixel
pub fn short_index_plane() -> QuantizationResult {
    let palette = vec![RGBA::new(0, 0, 0, 255), RGBA::new(255, 255, 255, 255)];

    QuantizationResult::new(2, 2, palette, vec![0, 1, 0]).unwrap()
}

pub fn is_short_plane_error(err: &LiqErrors) -> bool {
    matches!(
        err,
        LiqErrors::UnsupportedFormat(UnsupportedFormats::IndexPlaneLength {
            expected: 4,
            found:    3
        })
    )
}

pub fn near(a: u8, b: u8) -> bool {
    a.abs_diff(b) <= TOLERANCE
}

/// Check reconstructed corners against the gradient
///
/// Opaque gradients must come back with alpha of exactly 255.
/// For the alpha gradient color is only compared where the corner is at least half
/// opaque, the quantizer is free to pick any color for transparent pixels.
pub fn assert_corners(lookup: impl Fn(usize, usize) -> [u8; 4], alpha: bool) {
    for (x, y) in CORNERS {
        let expected = gradient_pixel(x, y, alpha);
        let found = lookup(x, y);

        if alpha {
            assert!(
                near(found[3], expected[3]),
                "alpha at ({x},{y}), expected {expected:?} found {found:?}"
            );
        } else {
            assert_eq!(found[3], 255, "alpha at ({x},{y}) is not opaque");
        }
        if expected[3] >= 127 {
            for c in 0..3 {
                assert!(
                    near(found[c], expected[c]),
                    "component {c} at ({x},{y}), expected {expected:?} found {found:?}"
                );
            }
        }
    }
}

/// Check colors only, ignoring alpha
pub fn assert_corner_colors(lookup: impl Fn(usize, usize) -> [u8; 3], alpha: bool) {
    assert_corners(
        |x, y| {
            let [r, g, b] = lookup(x, y);
            let a = gradient_pixel(x, y, alpha)[3];
            [r, g, b, if alpha { a } else { 255 }]
        },
        alpha
    );
}

/// Random small geometries, `(width,height)`
pub fn random_geometries(seed: u64, count: usize) -> Vec<(usize, usize)> {
    let mut rand = WyRand::new_seed(seed);

    (0..count)
        .map(|_| {
            (
                rand.generate_range(1_usize..=67),
                rand.generate_range(1_usize..=67)
            )
        })
        .collect()
}

/// Random bytes
pub fn random_bytes(seed: u64, length: usize) -> Vec<u8> {
    let mut pixels = vec![0; length];
    WyRand::new_seed(seed).fill(&mut pixels);
    pixels
}
