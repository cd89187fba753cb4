/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "zune-image")]

//! zune-image host
//!
//! Images are read from their first frame in whatever RGB or grayscale
//! colorspace they are stored in, including `BGR`, `BGRA` and `ARGB`.
//!
//! zune-image has no paletted image type, so the output is an
//! [`IndexedImage`], a luma image of indices and an RGBA palette,
//! which can be expanded back with [`IndexedImage::to_rgba`].
use log::warn;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_image::image::Image;

use crate::bridge::{decode_indices, decode_palette, encode, PixelBuffer, PixelLayout, RGBA};
use crate::errors::{LiqErrors, UnsupportedFormats};
use crate::quantize::{Attr, LiqImage, QuantizationResult};
use crate::traits::HostAdapter;

/// Adapter for [`zune_image::image::Image`]
pub struct ZuneAdapter;

/// A quantized zune image
///
/// Contains one palette index per pixel and the palette,
/// palette alpha is preserved.
#[derive(Clone, Debug)]
pub struct IndexedImage {
    width:   usize,
    height:  usize,
    indices: Vec<u8>,
    palette: Vec<RGBA>
}

impl IndexedImage {
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Index plane, one entry per pixel, row-major
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn palette(&self) -> &[RGBA] {
        &self.palette
    }

    /// Palette color at `(x,y)`, or `None` if out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<RGBA> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = self.indices[y * self.width + x];

        self.palette.get(usize::from(index)).copied()
    }

    /// Return indices as a single channel luma image
    pub fn to_index_image(&self) -> Image {
        Image::from_u8(&self.indices, self.width, self.height, ColorSpace::Luma)
    }

    /// Expand the palette into an RGBA image
    pub fn to_rgba(&self) -> Image {
        let pixels: Vec<u8> = self
            .indices
            .iter()
            .flat_map(|index| {
                let color = self.palette[usize::from(*index)];
                [color.r, color.g, color.b, color.a]
            })
            .collect();

        Image::from_u8(&pixels, self.width, self.height, ColorSpace::RGBA)
    }
}

impl HostAdapter for ZuneAdapter {
    type Host = Image;
    type Output = IndexedImage;

    const NAME: &'static str = "zune-image";
    const SUPPORTS_INDEXED_ALPHA: bool = true;

    fn to_canonical(host: &Image) -> Result<crate::bridge::CanonicalImage, LiqErrors> {
        let depth = host.depth();

        if depth != BitDepth::Eight {
            return Err(UnsupportedFormats::BitDepth(depth).into());
        }
        let layout = PixelLayout::from_colorspace(host.colorspace())?;
        let (width, height) = host.dimensions();

        if host.is_animated() {
            warn!(
                "{}: image has {} frames, only the first frame is quantized",
                Self::NAME,
                host.frames_ref().len()
            );
        }
        let frames = host.flatten_to_u8();
        let first = frames
            .first()
            .ok_or(LiqErrors::GenericStatic("Image does not contain any frames"))?;

        encode(&PixelBuffer::new(first, width, height, layout))
    }

    fn from_canonical(
        result: &QuantizationResult, image: &LiqImage<'_, Self>
    ) -> Result<IndexedImage, LiqErrors> {
        let (width, height) = image.dimensions();

        let indices = decode_indices(result, width, height)?;
        let palette = decode_palette(result);

        Ok(IndexedImage {
            width,
            height,
            indices,
            palette
        })
    }
}

/// Create a quantizable image from a zune image
pub fn to_liq<'a>(image: &'a Image, attr: &Attr) -> Result<LiqImage<'a, ZuneAdapter>, LiqErrors> {
    crate::to_liq::<ZuneAdapter>(image, attr)
}

/// Build an indexed image from a quantization result
pub fn from_liq(
    result: &QuantizationResult, image: &LiqImage<'_, ZuneAdapter>
) -> Result<IndexedImage, LiqErrors> {
    crate::from_liq(result, image)
}
