/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when moving pixels between hosts and the quantizer
use std::fmt::{Debug, Display, Formatter};

use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

/// All errors that may occur during conversion
/// and quantization
pub enum LiqErrors {
    /// Declared geometry disagrees with the data backing it
    ShapeError(ShapeErrors),
    /// The host pixel format can't be handled by an adapter
    UnsupportedFormat(UnsupportedFormats),
    /// The quantization engine refused the image.
    ///
    /// The engine error is passed as is, e.g. `QualityTooLow`
    /// when the quality floor set in the options can't be met.
    QuantizationError(imagequant::Error),
    /// A host library failed to encode the output
    EncodeErrors(String),
    /// A host library failed to decode its input
    DecodeErrors(String),
    Generic(String),
    GenericStatic(&'static str)
}

/// Dimension and buffer length errors
pub enum ShapeErrors {
    /// Width or height is zero
    ZeroDimensions(usize, usize),
    /// `width*height*components` does not fit into a usize
    TooLargeDimensions(usize, usize),
    /// The buffer length does not match the declared geometry
    LengthMismatch { expected: usize, found: usize },
    /// The row stride is smaller than a row of pixels
    StrideTooSmall { minimum: usize, found: usize },
    /// Result dimensions differ from the image that was quantized,
    /// both are `(width,height)`
    DimensionMismatch {
        expected: (usize, usize),
        found:    (usize, usize)
    }
}

/// Pixel formats an adapter can't convert
pub enum UnsupportedFormats {
    /// The colorspace is not a RGB or grayscale model
    ///
    /// The first argument is the colorspace encountered, the second
    /// the list of supported colorspaces
    Colorspace(ColorSpace, &'static [ColorSpace]),
    /// Only 8 bit channels are understood by the quantizer
    BitDepth(BitDepth),
    /// The element type of an array host is not `u8`
    SampleType(&'static str),
    /// Number of channels can't be mapped to a layout
    ChannelCount(usize),
    /// A host specific pixel format the adapter does not understand
    PixelFormat(String),
    /// The index plane doesn't cover the image
    IndexPlaneLength { expected: usize, found: usize },
    /// An index points past the end of the palette
    IndexOutOfRange { index: u8, palette_len: usize },
    /// Palette is empty or has more than 256 entries
    PaletteSize(usize)
}

impl LiqErrors {
    /// Whether this is a dimension or buffer length mismatch
    pub const fn is_shape_error(&self) -> bool {
        matches!(self, LiqErrors::ShapeError(_))
    }
    /// Whether an adapter refused the host format
    pub const fn is_unsupported_format(&self) -> bool {
        matches!(self, LiqErrors::UnsupportedFormat(_))
    }
    /// Whether the error originated in the quantization engine
    pub const fn is_quantization_error(&self) -> bool {
        matches!(self, LiqErrors::QuantizationError(_))
    }
}

impl Debug for ShapeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeErrors::ZeroDimensions(width, height) => {
                writeln!(f, "Zero sized image dimensions ({width},{height})")
            }
            ShapeErrors::TooLargeDimensions(width, height) => {
                writeln!(
                    f,
                    "Too large dimensions ({width},{height}), size overflows a usize"
                )
            }
            ShapeErrors::LengthMismatch { expected, found } => {
                writeln!(
                    f,
                    "Buffer length mismatch, expected {expected} bytes but found {found}"
                )
            }
            ShapeErrors::StrideTooSmall { minimum, found } => {
                writeln!(
                    f,
                    "Row stride {found} is smaller than a row of pixels ({minimum} bytes)"
                )
            }
            ShapeErrors::DimensionMismatch { expected, found } => {
                writeln!(
                    f,
                    "Dimension mismatch, expected {:?} but quantized image is {:?}",
                    expected, found
                )
            }
        }
    }
}

impl Debug for UnsupportedFormats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedFormats::Colorspace(found, supported) => {
                writeln!(
                    f,
                    "Unsupported colorspace {found:?}, supported ones are {supported:?}"
                )
            }
            UnsupportedFormats::BitDepth(depth) => {
                writeln!(
                    f,
                    "Unsupported bit depth {depth:?}, only 8 bit channels can be quantized"
                )
            }
            UnsupportedFormats::SampleType(name) => {
                writeln!(f, "Unsupported sample type {name}, expected u8")
            }
            UnsupportedFormats::ChannelCount(count) => {
                writeln!(f, "Unsupported number of channels {count}")
            }
            UnsupportedFormats::PixelFormat(format) => {
                writeln!(f, "Unsupported pixel format {format}")
            }
            UnsupportedFormats::IndexPlaneLength { expected, found } => {
                writeln!(
                    f,
                    "Index plane has {found} entries but image has {expected} pixels"
                )
            }
            UnsupportedFormats::IndexOutOfRange { index, palette_len } => {
                writeln!(
                    f,
                    "Index {index} is out of range for a palette of {palette_len} colors"
                )
            }
            UnsupportedFormats::PaletteSize(size) => {
                writeln!(f, "Invalid palette size {size}, expected 1..=256 colors")
            }
        }
    }
}

impl Debug for LiqErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LiqErrors::ShapeError(err) => {
                writeln!(f, "Shape error: {err:?}")
            }
            LiqErrors::UnsupportedFormat(err) => {
                writeln!(f, "Unsupported format: {err:?}")
            }
            LiqErrors::QuantizationError(err) => {
                writeln!(f, "Quantization failed: {err:?}")
            }
            LiqErrors::EncodeErrors(err) => {
                writeln!(f, "Encoding failed: {err}")
            }
            LiqErrors::DecodeErrors(err) => {
                writeln!(f, "Decoding failed: {err}")
            }
            LiqErrors::Generic(err) => {
                writeln!(f, "{err}")
            }
            LiqErrors::GenericStatic(err) => {
                writeln!(f, "{err}")
            }
        }
    }
}

impl Display for LiqErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for LiqErrors {}

impl From<ShapeErrors> for LiqErrors {
    fn from(value: ShapeErrors) -> Self {
        LiqErrors::ShapeError(value)
    }
}

impl From<UnsupportedFormats> for LiqErrors {
    fn from(value: UnsupportedFormats) -> Self {
        LiqErrors::UnsupportedFormat(value)
    }
}

impl From<imagequant::Error> for LiqErrors {
    fn from(value: imagequant::Error) -> Self {
        LiqErrors::QuantizationError(value)
    }
}

impl From<&'static str> for LiqErrors {
    fn from(value: &'static str) -> Self {
        LiqErrors::GenericStatic(value)
    }
}

impl From<String> for LiqErrors {
    fn from(value: String) -> Self {
        LiqErrors::Generic(value)
    }
}
