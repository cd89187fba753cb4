/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "image")]

//! `image` crate host
//!
//! Reads 8 bit luma, luma+alpha, RGB and RGBA [`DynamicImage`]s.
//!
//! # Limitations
//! The output is a [`PalettedImage`] made of a `GrayImage` of indices and an RGB palette.
//! Like most paletted formats of general imaging libraries it has no
//! transparency per palette entry, so alpha chosen by the quantizer is dropped
//! and the expanded image is fully opaque. See
//! [`SUPPORTS_INDEXED_ALPHA`](crate::traits::HostAdapter::SUPPORTS_INDEXED_ALPHA).
use ::image::{DynamicImage, GenericImageView, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
use log::debug;
use zune_core::bit_depth::BitDepth;

use crate::bridge::{
    decode_indices, decode_palette, encode, CanonicalImage, PixelBuffer, PixelLayout
};
use crate::errors::{LiqErrors, ShapeErrors, UnsupportedFormats};
use crate::quantize::{Attr, LiqImage, QuantizationResult};
use crate::traits::HostAdapter;

/// Adapter for [`DynamicImage`]
pub struct ImageAdapter;

/// A paletted image, indices and an RGB palette
#[derive(Clone, Debug)]
pub struct PalettedImage {
    indices: GrayImage,
    palette: Vec<Rgb<u8>>
}

impl PalettedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.indices.dimensions()
    }

    /// Indices stored as a grayscale image
    pub fn indices(&self) -> &GrayImage {
        &self.indices
    }

    pub fn palette(&self) -> &[Rgb<u8>] {
        &self.palette
    }

    /// Palette color at `(x,y)`
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        let (width, height) = self.dimensions();

        if x >= width || y >= height {
            return None;
        }
        let index = self.indices.get_pixel(x, y).0[0];

        self.palette.get(usize::from(index)).copied()
    }

    /// Expand to an RGB image
    pub fn to_rgb(&self) -> RgbImage {
        let (width, height) = self.dimensions();

        RgbImage::from_fn(width, height, |x, y| {
            self.palette[usize::from(self.indices.get_pixel(x, y).0[0])]
        })
    }

    /// Expand to an RGBA image, every pixel is opaque
    pub fn to_rgba(&self) -> RgbaImage {
        let (width, height) = self.dimensions();

        RgbaImage::from_fn(width, height, |x, y| {
            let [r, g, b] = self.palette[usize::from(self.indices.get_pixel(x, y).0[0])].0;
            Rgba([r, g, b, 255])
        })
    }
}

impl HostAdapter for ImageAdapter {
    type Host = DynamicImage;
    type Output = PalettedImage;

    const NAME: &'static str = "image";
    const SUPPORTS_INDEXED_ALPHA: bool = false;

    fn to_canonical(host: &DynamicImage) -> Result<CanonicalImage, LiqErrors> {
        let layout = match host {
            DynamicImage::ImageLuma8(_) => PixelLayout::LUMA,
            DynamicImage::ImageLumaA8(_) => PixelLayout::LUMA_A,
            DynamicImage::ImageRgb8(_) => PixelLayout::RGB,
            DynamicImage::ImageRgba8(_) => PixelLayout::RGBA,
            DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_) => {
                return Err(UnsupportedFormats::BitDepth(BitDepth::Sixteen).into());
            }
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                return Err(UnsupportedFormats::SampleType("f32").into());
            }
            _ => {
                return Err(UnsupportedFormats::PixelFormat(format!("{:?}", host.color())).into());
            }
        };
        let (width, height) = GenericImageView::dimensions(host);

        encode(&PixelBuffer::new(
            host.as_bytes(),
            width as usize,
            height as usize,
            layout
        ))
    }

    fn from_canonical(
        result: &QuantizationResult, image: &LiqImage<'_, Self>
    ) -> Result<PalettedImage, LiqErrors> {
        let (width, height) = image.dimensions();

        let indices = decode_indices(result, width, height)?;
        let palette = decode_palette(result);

        if palette.iter().any(|color| color.a != 255) {
            debug!(
                "{}: paletted images carry no alpha, dropping palette transparency",
                Self::NAME
            );
        }
        let palette = palette
            .iter()
            .map(|color| Rgb([color.r, color.g, color.b]))
            .collect();

        let too_large = || ShapeErrors::TooLargeDimensions(width, height);

        let img_width = u32::try_from(width).map_err(|_| too_large())?;
        let img_height = u32::try_from(height).map_err(|_| too_large())?;

        let indices = GrayImage::from_raw(img_width, img_height, indices).ok_or(
            LiqErrors::GenericStatic("Index plane does not fit the image dimensions")
        )?;

        Ok(PalettedImage { indices, palette })
    }
}

/// Create a quantizable image from a `DynamicImage`
pub fn to_liq<'a>(
    image: &'a DynamicImage, attr: &Attr
) -> Result<LiqImage<'a, ImageAdapter>, LiqErrors> {
    crate::to_liq::<ImageAdapter>(image, attr)
}

/// Build a paletted image from a quantization result
pub fn from_liq(
    result: &QuantizationResult, image: &LiqImage<'_, ImageAdapter>
) -> Result<PalettedImage, LiqErrors> {
    crate::from_liq(result, image)
}
