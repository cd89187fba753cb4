/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Glue between canonical images and the quantization engine
//!
//! The flow mirrors libimagequant
//!
//! ```no_run
//! # #[cfg(feature = "ndarray")]
//! # fn main() -> Result<(), zune_liq::errors::LiqErrors> {
//! use ndarray::Array3;
//! use zune_liq::hosts::ndarray as liq_ndarray;
//! use zune_liq::quantize::Attr;
//!
//! let input = Array3::<u8>::zeros((32, 32, 4));
//! let mut attr = Attr::new();
//!
//! let image = liq_ndarray::to_liq(&input, &attr)?;
//! let result = image.quantize(&mut attr)?;
//! let (indices, palette) = liq_ndarray::from_liq(&result, &image)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "ndarray"))]
//! # fn main() {}
//! ```
use std::fmt::{Debug, Formatter};

use log::{debug, trace};

use crate::bridge::{check_index_plane, CanonicalImage, RGBA};
use crate::errors::{LiqErrors, UnsupportedFormats};
use crate::options::QuantizeOptions;
use crate::traits::HostAdapter;

/// Maximum number of colors a palette can hold
pub const MAX_PALETTE_SIZE: usize = 256;

/// Quantization attributes
///
/// This is the mutable handle passed to every quantization,
/// the same attributes can be reused for multiple images.
#[derive(Clone)]
pub struct Attr {
    inner:   imagequant::Attributes,
    options: QuantizeOptions
}

impl Default for Attr {
    fn default() -> Self {
        Attr::new()
    }
}

impl Attr {
    /// Create attributes with default options
    pub fn new() -> Attr {
        Attr {
            inner:   imagequant::new(),
            options: QuantizeOptions::default()
        }
    }

    /// Create attributes with custom options
    ///
    /// # Returns
    /// A quantization error if the engine refuses one of the values
    pub fn new_with_options(options: QuantizeOptions) -> Result<Attr, LiqErrors> {
        let mut attr = Attr::new();
        attr.set_options(options)?;
        Ok(attr)
    }

    pub const fn options(&self) -> QuantizeOptions {
        self.options
    }

    /// Apply new options
    ///
    /// On error attributes keep their previous options
    pub fn set_options(&mut self, options: QuantizeOptions) -> Result<(), LiqErrors> {
        let mut inner = self.inner.clone();
        let (minimum, target) = options.quality();

        inner.set_max_colors(options.max_colors())?;
        inner.set_quality(minimum, target)?;
        inner.set_speed(options.speed())?;
        inner.set_min_posterization(options.min_posterization())?;

        if !(0.0..=1.0).contains(&options.dithering_level()) {
            return Err(LiqErrors::QuantizationError(
                imagequant::Error::ValueOutOfRange
            ));
        }
        self.inner = inner;
        self.options = options;

        Ok(())
    }
}

/// A canonical image ready to be quantized
///
/// This keeps a reference to the host image it was created from,
/// the host is borrowed and stays usable by the caller.
pub struct LiqImage<'host, A: HostAdapter> {
    canonical: CanonicalImage,
    host:      &'host A::Host
}

impl<A: HostAdapter> Debug for LiqImage<'_, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiqImage")
            .field("host", &A::NAME)
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

impl<'host, A: HostAdapter> LiqImage<'host, A> {
    pub const fn canonical(&self) -> &CanonicalImage {
        &self.canonical
    }

    /// The host image this was created from
    pub const fn host(&self) -> &'host A::Host {
        self.host
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        self.canonical.dimensions()
    }

    /// Quantize this image
    ///
    /// Options, gamma included, are read from `attr` at this point.
    /// Engine errors are returned unchanged
    /// as [`LiqErrors::QuantizationError`]
    pub fn quantize(&self, attr: &mut Attr) -> Result<QuantizationResult, LiqErrors> {
        let (width, height) = self.canonical.dimensions();
        let gamma = attr.options.gamma();

        let mut image = attr
            .inner
            .new_image(self.canonical.to_rgba(), width, height, gamma)?;

        let mut result = attr.inner.quantize(&mut image)?;
        result.set_dithering_level(attr.options.dithering_level())?;

        let (palette, indices) = result.remapped(&mut image)?;

        let quality = result.quantization_quality();
        let error = result.quantization_error();

        debug!(
            "{}: quantized ({width},{height}) to {} colors, quality {:?}, mse {:?}",
            A::NAME,
            palette.len(),
            quality,
            error
        );

        Ok(QuantizationResult {
            width,
            height,
            palette,
            indices,
            quality,
            error,
            gamma: Some(gamma)
        })
    }
}

/// Palette and index plane of a quantized image
#[derive(Clone, Debug)]
pub struct QuantizationResult {
    width:   usize,
    height:  usize,
    palette: Vec<RGBA>,
    indices: Vec<u8>,
    quality: Option<u8>,
    error:   Option<f64>,
    gamma:   Option<f64>
}

impl QuantizationResult {
    /// Create a result from raw parts
    ///
    /// This allows feeding adapters with results from another engine.
    /// Only the palette size is checked here, indices are checked by adapters
    ///
    /// # Returns
    /// An error if the palette is empty or has more than 256 entries
    pub fn new(
        width: usize, height: usize, palette: Vec<RGBA>, indices: Vec<u8>
    ) -> Result<QuantizationResult, LiqErrors> {
        if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
            return Err(UnsupportedFormats::PaletteSize(palette.len()).into());
        }
        Ok(QuantizationResult {
            width,
            height,
            palette,
            indices,
            quality: None,
            error: None,
            gamma: None
        })
    }

    /// Dimensions of the image that was quantized
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Palette in the order chosen by the engine
    pub fn palette(&self) -> &[RGBA] {
        &self.palette
    }

    /// One palette index per pixel, row-major
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Quality reported by the engine, 0-100
    pub const fn quantization_quality(&self) -> Option<u8> {
        self.quality
    }

    /// Mean square error reported by the engine
    pub fn quantization_error(&self) -> Option<f64> {
        self.error
    }

    /// Gamma the input pixels were read with, `0.0` is sRGB
    ///
    /// `None` for results built with [`new`](Self::new)
    pub fn gamma(&self) -> Option<f64> {
        self.gamma
    }
}

/// Convert a host image into an image that can be quantized
///
/// The host image is borrowed, not copied into or modified.
pub fn to_liq<'host, A: HostAdapter>(
    host: &'host A::Host, attr: &Attr
) -> Result<LiqImage<'host, A>, LiqErrors> {
    let canonical = A::to_canonical(host)?;

    trace!(
        "{}: canonical image of dimensions {:?}, up to {} colors",
        A::NAME,
        canonical.dimensions(),
        attr.options().max_colors()
    );

    Ok(LiqImage { canonical, host })
}

/// Build an indexed host image from a quantization result
///
/// # Returns
/// An unsupported format error if the index plane doesn't
/// contain exactly one entry per pixel of `image`
pub fn from_liq<A: HostAdapter>(
    result: &QuantizationResult, image: &LiqImage<'_, A>
) -> Result<A::Output, LiqErrors> {
    check_index_plane(result, image.canonical().pixel_count())?;

    A::from_canonical(result, image)
}
