/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "png")]

//! Streaming PNG codec host
//!
//! The `png` crate has no image type, it hands out rows of a frame
//! together with an [`OutputInfo`](::png::OutputInfo) describing them.
//! [`PngFrame`] keeps both so that an adapter can read them.
//!
//! The output is a [`PngIndexed`], ready to be written as an indexed PNG
//! with a `PLTE` chunk and, when the palette has transparent entries, a `tRNS` chunk.
use std::io::{Read, Write};

use ::png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use log::trace;

use crate::bridge::{
    decode_indices, decode_palette, encode, CanonicalImage, PixelBuffer, PixelLayout
};
use crate::errors::{LiqErrors, ShapeErrors, UnsupportedFormats};
use crate::quantize::{Attr, LiqImage, QuantizationResult};
use crate::traits::HostAdapter;

/// Adapter for decoded PNG frames
pub struct PngAdapter;

/// A decoded PNG frame
#[derive(Clone, Debug)]
pub struct PngFrame {
    width:      u32,
    height:     u32,
    color_type: ColorType,
    bit_depth:  BitDepth,
    line_size:  usize,
    pixels:     Vec<u8>
}

impl PngFrame {
    /// Decode the first frame from a decoder
    ///
    /// Palettes and low bit depth grayscale are expanded by the decoder,
    /// 16 bit images are kept as is and refused on conversion.
    pub fn read<R: Read>(mut decoder: Decoder<R>) -> Result<PngFrame, LiqErrors> {
        decoder.set_transformations(Transformations::EXPAND);

        let mut reader = decoder
            .read_info()
            .map_err(|e| LiqErrors::DecodeErrors(format!("png: {e}")))?;

        let mut pixels = vec![0; reader.output_buffer_size()];

        let info = reader
            .next_frame(&mut pixels)
            .map_err(|e| LiqErrors::DecodeErrors(format!("png: {e}")))?;

        pixels.truncate(info.buffer_size());

        trace!(
            "png: decoded frame ({},{}) {:?} {:?}",
            info.width,
            info.height,
            info.color_type,
            info.bit_depth
        );

        Ok(PngFrame {
            width: info.width,
            height: info.height,
            color_type: info.color_type,
            bit_depth: info.bit_depth,
            line_size: info.line_size,
            pixels
        })
    }

    /// Wrap rows that were decoded elsewhere
    ///
    /// Rows are expected to be packed, i.e. one row is
    /// `ceil(width*samples*bit_depth/8)` bytes long.
    pub fn from_raw(
        pixels: Vec<u8>, width: u32, height: u32, color_type: ColorType, bit_depth: BitDepth
    ) -> PngFrame {
        let bits = (width as usize)
            .saturating_mul(color_type.samples())
            .saturating_mul(bit_depth as usize);

        PngFrame {
            width,
            height,
            color_type,
            bit_depth,
            line_size: bits.div_ceil(8),
            pixels
        }
    }

    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub const fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub const fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Number of bytes in a row
    pub const fn line_size(&self) -> usize {
        self.line_size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// An indexed PNG image ready for encoding
#[derive(Clone, Debug)]
pub struct PngIndexed {
    width:   u32,
    height:  u32,
    palette: Vec<u8>,
    trns:    Vec<u8>,
    indices: Vec<u8>
}

impl PngIndexed {
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Contents of the `PLTE` chunk, `R`,`G`,`B` triplets
    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    /// Contents of the `tRNS` chunk, one alpha per palette entry.
    ///
    /// Trailing opaque entries are left out, and the slice is empty if the whole
    /// palette is opaque.
    pub fn trns(&self) -> &[u8] {
        &self.trns
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Index rows, one byte per pixel
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.indices.chunks_exact(self.width as usize)
    }

    /// Encode to an 8 bit indexed PNG
    pub fn write<W: Write>(&self, writer: W) -> Result<(), LiqErrors> {
        let mut encoder = Encoder::new(writer, self.width, self.height);

        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_palette(self.palette.clone());

        if !self.trns.is_empty() {
            encoder.set_trns(self.trns.clone());
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| LiqErrors::EncodeErrors(format!("png: {e}")))?;

        writer
            .write_image_data(&self.indices)
            .map_err(|e| LiqErrors::EncodeErrors(format!("png: {e}")))?;

        writer
            .finish()
            .map_err(|e| LiqErrors::EncodeErrors(format!("png: {e}")))
    }
}

impl HostAdapter for PngAdapter {
    type Host = PngFrame;
    type Output = PngIndexed;

    const NAME: &'static str = "png";
    const SUPPORTS_INDEXED_ALPHA: bool = true;

    fn to_canonical(host: &PngFrame) -> Result<CanonicalImage, LiqErrors> {
        match host.bit_depth {
            BitDepth::Eight => (),
            BitDepth::Sixteen => {
                let depth = zune_core::bit_depth::BitDepth::Sixteen;
                return Err(UnsupportedFormats::BitDepth(depth).into());
            }
            depth => {
                return Err(UnsupportedFormats::PixelFormat(format!(
                    "{:?} at {:?}, expand the frame before conversion",
                    host.color_type, depth
                ))
                .into())
            }
        }
        let layout = match host.color_type {
            ColorType::Grayscale => PixelLayout::LUMA,
            ColorType::GrayscaleAlpha => PixelLayout::LUMA_A,
            ColorType::Rgb => PixelLayout::RGB,
            ColorType::Rgba => PixelLayout::RGBA,
            ColorType::Indexed => {
                return Err(UnsupportedFormats::PixelFormat(
                    "Indexed, expand the frame before conversion".to_string()
                )
                .into())
            }
        };

        encode(
            &PixelBuffer::new(
                &host.pixels,
                host.width as usize,
                host.height as usize,
                layout
            )
            .with_stride(host.line_size)
        )
    }

    fn from_canonical(
        result: &QuantizationResult, image: &LiqImage<'_, Self>
    ) -> Result<PngIndexed, LiqErrors> {
        let (width, height) = image.dimensions();

        let indices = decode_indices(result, width, height)?;
        let colors = decode_palette(result);

        let palette = colors
            .iter()
            .flat_map(|color| [color.r, color.g, color.b])
            .collect();

        let mut trns: Vec<u8> = colors.iter().map(|color| color.a).collect();

        while trns.last() == Some(&255) {
            trns.pop();
        }
        let too_large = || ShapeErrors::TooLargeDimensions(width, height);

        Ok(PngIndexed {
            width: u32::try_from(width).map_err(|_| too_large())?,
            height: u32::try_from(height).map_err(|_| too_large())?,
            palette,
            trns,
            indices
        })
    }
}

/// Create a quantizable image from a decoded frame
pub fn to_liq<'a>(frame: &'a PngFrame, attr: &Attr) -> Result<LiqImage<'a, PngAdapter>, LiqErrors> {
    crate::to_liq::<PngAdapter>(frame, attr)
}

/// Build an indexed PNG from a quantization result
pub fn from_liq(
    result: &QuantizationResult, image: &LiqImage<'_, PngAdapter>
) -> Result<PngIndexed, LiqErrors> {
    crate::from_liq(result, image)
}
