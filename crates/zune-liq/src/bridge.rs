/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Canonical buffer bridge
//!
//! The quantizer only understands one pixel layout, a flat array of
//! `R`,`G`,`B`,`A` bytes, row-major, without any padding between rows.
//!
//! Hosts store pixels in many ways, `BGRA` 32 bit words padded to a 4 byte boundary,
//! `RGB` triplets, grayscale etc. This module is the single place which knows
//! how to go from a host buffer to that layout, and how to read a quantized
//! result back.
//!
//! Adapters describe their buffer with a [`PixelBuffer`], call [`encode`], and
//! on the way back use [`decode_indices`] and [`decode_palette`].
use log::trace;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

use crate::errors::{LiqErrors, ShapeErrors, UnsupportedFormats};
use crate::quantize::QuantizationResult;

/// A single palette entry, in `R`,`G`,`B`,`A` order
pub use imagequant::RGBA;

/// Number of bytes a pixel occupies in a canonical image
pub const CANONICAL_COMPONENTS: usize = 4;

/// Colorspaces that can be mapped to a [`PixelLayout`]
pub static SUPPORTED_COLORSPACES: [ColorSpace; 7] = [
    ColorSpace::RGB,
    ColorSpace::RGBA,
    ColorSpace::BGR,
    ColorSpace::BGRA,
    ColorSpace::ARGB,
    ColorSpace::Luma,
    ColorSpace::LumaA
];

/// Describes where each color component lives inside a pixel
///
/// A layout carries the number of bytes per pixel, the position
/// of red, green and blue and, if present, the position of alpha.
///
/// Grayscale layouts point red, green and blue to the same byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PixelLayout {
    components: usize,
    rgb:        [usize; 3],
    alpha:      Option<usize>
}

impl PixelLayout {
    pub const RGB: PixelLayout = PixelLayout::new_unchecked(3, [0, 1, 2], None);
    pub const RGBA: PixelLayout = PixelLayout::new_unchecked(4, [0, 1, 2], Some(3));
    pub const BGR: PixelLayout = PixelLayout::new_unchecked(3, [2, 1, 0], None);
    pub const BGRA: PixelLayout = PixelLayout::new_unchecked(4, [2, 1, 0], Some(3));
    pub const ARGB: PixelLayout = PixelLayout::new_unchecked(4, [1, 2, 3], Some(0));
    pub const LUMA: PixelLayout = PixelLayout::new_unchecked(1, [0, 0, 0], None);
    pub const LUMA_A: PixelLayout = PixelLayout::new_unchecked(2, [0, 0, 0], Some(1));
    /// `B`,`G`,`R` followed by an unused byte
    pub const BGRX: PixelLayout = PixelLayout::new_unchecked(4, [2, 1, 0], None);
    /// An unused byte followed by `R`,`G`,`B`
    pub const XRGB: PixelLayout = PixelLayout::new_unchecked(4, [1, 2, 3], None);

    const fn new_unchecked(components: usize, rgb: [usize; 3], alpha: Option<usize>) -> Self {
        PixelLayout {
            components,
            rgb,
            alpha
        }
    }

    /// Create a custom layout
    ///
    /// # Arguments
    /// - components: Number of bytes in a pixel, 1..=4
    /// - rgb: Position of red, green and blue bytes within a pixel
    /// - alpha: Position of the alpha byte, or `None` if pixels are opaque
    ///
    /// # Returns
    /// An error if a position falls outside the pixel
    pub fn new(
        components: usize, rgb: [usize; 3], alpha: Option<usize>
    ) -> Result<PixelLayout, LiqErrors> {
        if components == 0 || components > 4 {
            return Err(UnsupportedFormats::ChannelCount(components).into());
        }
        if rgb.iter().chain(alpha.iter()).any(|x| *x >= components) {
            return Err(UnsupportedFormats::ChannelCount(components).into());
        }
        Ok(PixelLayout::new_unchecked(components, rgb, alpha))
    }

    /// Map a zune colorspace to a layout
    ///
    /// Only RGB and grayscale models are accepted, the rest
    /// e.g CMYK, YCbCr, HSL return an error
    pub fn from_colorspace(colorspace: ColorSpace) -> Result<PixelLayout, LiqErrors> {
        let layout = match colorspace {
            ColorSpace::RGB => PixelLayout::RGB,
            ColorSpace::RGBA => PixelLayout::RGBA,
            ColorSpace::BGR => PixelLayout::BGR,
            ColorSpace::BGRA => PixelLayout::BGRA,
            ColorSpace::ARGB => PixelLayout::ARGB,
            ColorSpace::Luma => PixelLayout::LUMA,
            ColorSpace::LumaA => PixelLayout::LUMA_A,
            _ => {
                return Err(
                    UnsupportedFormats::Colorspace(colorspace, &SUPPORTED_COLORSPACES).into()
                )
            }
        };
        Ok(layout)
    }

    /// Number of bytes in a single pixel
    pub const fn components(&self) -> usize {
        self.components
    }

    pub const fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Position of alpha within a pixel, if any
    pub const fn alpha_position(&self) -> Option<usize> {
        self.alpha
    }
}

/// A borrowed host pixel buffer
///
/// This does not own the pixels, the host keeps them, and nothing in
/// this crate writes to them.
#[derive(Copy, Clone, Debug)]
pub struct PixelBuffer<'a> {
    data:   &'a [u8],
    width:  usize,
    height: usize,
    stride: usize,
    layout: PixelLayout,
    depth:  BitDepth
}

impl<'a> PixelBuffer<'a> {
    /// Create a tightly packed 8 bit buffer
    ///
    /// Use [`with_stride`](Self::with_stride) for buffers with row padding
    pub fn new(data: &'a [u8], width: usize, height: usize, layout: PixelLayout) -> Self {
        PixelBuffer {
            data,
            width,
            height,
            stride: width.saturating_mul(layout.components()),
            layout,
            depth: BitDepth::Eight
        }
    }

    /// Set number of bytes between the start of two rows
    #[must_use]
    pub const fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Set the depth of a channel,
    ///
    /// Anything other than 8 bits is refused by [`encode`]
    #[must_use]
    pub const fn with_depth(mut self, depth: BitDepth) -> Self {
        self.depth = depth;
        self
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn stride(&self) -> usize {
        self.stride
    }

    pub const fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub const fn depth(&self) -> BitDepth {
        self.depth
    }

    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// The only image representation the quantizer accepts
///
/// Pixels are `R`,`G`,`B`,`A` bytes, row-major with no padding,
/// and the buffer is always exactly `width*height*4` bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CanonicalImage {
    width:  usize,
    height: usize,
    pixels: Vec<u8>
}

impl CanonicalImage {
    /// Wrap already canonical pixels
    ///
    /// # Returns
    /// A shape error if a dimension is zero or the length isn't `width*height*4`
    pub fn new(pixels: Vec<u8>, width: usize, height: usize) -> Result<CanonicalImage, LiqErrors> {
        let expected = canonical_length(width, height)?;

        if pixels.len() != expected {
            return Err(ShapeErrors::LengthMismatch {
                expected,
                found: pixels.len()
            }
            .into());
        }
        Ok(CanonicalImage {
            width,
            height,
            pixels
        })
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels in the image
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Return the `[R,G,B,A]` value at `(x,y)` or `None` if out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * CANONICAL_COMPONENTS;
        let px = &self.pixels[start..start + CANONICAL_COMPONENTS];

        Some([px[0], px[1], px[2], px[3]])
    }

    /// Pixels as engine colors
    pub(crate) fn to_rgba(&self) -> Vec<RGBA> {
        self.pixels
            .chunks_exact(CANONICAL_COMPONENTS)
            .map(|px| RGBA::new(px[0], px[1], px[2], px[3]))
            .collect()
    }
}

fn canonical_length(width: usize, height: usize) -> Result<usize, LiqErrors> {
    if width == 0 || height == 0 {
        return Err(ShapeErrors::ZeroDimensions(width, height).into());
    }
    width
        .checked_mul(height)
        .and_then(|x| x.checked_mul(CANONICAL_COMPONENTS))
        .ok_or_else(|| ShapeErrors::TooLargeDimensions(width, height).into())
}

/// Convert a host buffer into a canonical image
///
/// Components are reordered according to the buffer layout, layouts
/// without alpha get an alpha of 255 for every pixel.
/// Row padding (stride larger than a row) is skipped.
///
/// # Returns
/// - A shape error if a dimension is zero, the stride can't hold a row,
///   or the buffer isn't `stride*height` bytes long
/// - An unsupported format error if channels aren't 8 bits wide
pub fn encode(buffer: &PixelBuffer) -> Result<CanonicalImage, LiqErrors> {
    let (width, height) = buffer.dimensions();
    let layout = buffer.layout();

    let out_len = canonical_length(width, height)?;

    if buffer.depth() != BitDepth::Eight {
        return Err(UnsupportedFormats::BitDepth(buffer.depth()).into());
    }
    let row_bytes = width
        .checked_mul(layout.components())
        .ok_or(ShapeErrors::TooLargeDimensions(width, height))?;

    let stride = buffer.stride();

    if stride < row_bytes {
        return Err(ShapeErrors::StrideTooSmall {
            minimum: row_bytes,
            found:   stride
        }
        .into());
    }
    let expected = stride
        .checked_mul(height)
        .ok_or(ShapeErrors::TooLargeDimensions(width, height))?;

    if buffer.data().len() != expected {
        return Err(ShapeErrors::LengthMismatch {
            expected,
            found: buffer.data().len()
        }
        .into());
    }
    trace!("Canonical encode: dimensions ({width},{height}), stride {stride}, layout {layout:?}");

    let mut pixels = vec![0_u8; out_len];

    let [r, g, b] = layout.rgb;
    let components = layout.components();

    for (src_row, dst_row) in buffer
        .data()
        .chunks_exact(stride)
        .zip(pixels.chunks_exact_mut(width * CANONICAL_COMPONENTS))
    {
        let src_row = &src_row[..row_bytes];
        let pixels = src_row
            .chunks_exact(components)
            .zip(dst_row.chunks_exact_mut(CANONICAL_COMPONENTS));

        match layout.alpha_position() {
            Some(a) => {
                for (src, dst) in pixels {
                    dst[0] = src[r];
                    dst[1] = src[g];
                    dst[2] = src[b];
                    dst[3] = src[a];
                }
            }
            None => {
                for (src, dst) in pixels {
                    dst[0] = src[r];
                    dst[1] = src[g];
                    dst[2] = src[b];
                    dst[3] = 255;
                }
            }
        }
    }
    CanonicalImage::new(pixels, width, height)
}

/// Check that the index plane holds exactly one index per pixel
///
/// # Returns
/// An unsupported format error if the plane is shorter or longer than `pixels`
pub fn check_index_plane(result: &QuantizationResult, pixels: usize) -> Result<(), LiqErrors> {
    let found = result.indices().len();

    if found != pixels {
        return Err(UnsupportedFormats::IndexPlaneLength {
            expected: pixels,
            found
        }
        .into());
    }
    Ok(())
}

/// Return the index plane of a quantized image
///
/// The plane is copied as is, one index per pixel, row-major.
///
/// # Returns
/// - A shape error if the result was computed for different dimensions
/// - An unsupported format error if the plane doesn't contain `width*height`
///   indices or an index points outside the palette
pub fn decode_indices(
    result: &QuantizationResult, width: usize, height: usize
) -> Result<Vec<u8>, LiqErrors> {
    if result.dimensions() != (width, height) {
        return Err(ShapeErrors::DimensionMismatch {
            expected: (width, height),
            found:    result.dimensions()
        }
        .into());
    }
    let expected = width
        .checked_mul(height)
        .ok_or(ShapeErrors::TooLargeDimensions(width, height))?;

    check_index_plane(result, expected)?;

    let indices = result.indices();
    let palette_len = result.palette().len();

    if let Some(index) = indices.iter().find(|x| usize::from(**x) >= palette_len) {
        return Err(UnsupportedFormats::IndexOutOfRange {
            index: *index,
            palette_len
        }
        .into());
    }
    Ok(indices.to_vec())
}

/// Return the palette of a quantized image
///
/// Order is kept exactly as the engine produced it, index values
/// are only meaningful relative to this order.
pub fn decode_palette(result: &QuantizationResult) -> Vec<RGBA> {
    result.palette().to_vec()
}
