/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "ndarray")]

//! ndarray host
//!
//! Images are 3 dimensional arrays of shape `(height, width, channels)`,
//! the way scientific image libraries return them, with 1 (gray),
//! 2 (gray+alpha), 3 (RGB) or 4 (RGBA) channels.
//!
//! Arrays in any memory order are accepted, non-standard layouts (e.g. Fortran
//! order or transposed views) are copied to row-major order first.
//!
//! The output is a pair of arrays, indices of shape `(height, width, 1)`
//! and a palette of shape `(colors, 4)`.
use std::any::{type_name, TypeId};
use std::marker::PhantomData;

use ::ndarray::{Array2, Array3, ArrayView3};
use bytemuck::Pod;

use crate::bridge::{
    decode_indices, decode_palette, encode, CanonicalImage, PixelBuffer, PixelLayout
};
use crate::errors::{LiqErrors, UnsupportedFormats};
use crate::quantize::{Attr, LiqImage, QuantizationResult};
use crate::traits::HostAdapter;

/// Index array and palette array
pub type IndexedArrays = (Array3<u8>, Array2<u8>);

/// Adapter for [`Array3`] images with samples of type `T`
///
/// Only `u8` samples can be quantized, other types are accepted
/// by the type system so that callers get an error instead of a silent cast.
pub struct NdarrayAdapter<T = u8>(PhantomData<T>);

/// Read an array view into a canonical image
///
/// # Returns
/// - An unsupported format error if `T` isn't `u8` or the channel count isn't 1..=4
/// - A shape error if width or height is zero
pub fn canonical_from_view<T: Pod>(view: ArrayView3<'_, T>) -> Result<CanonicalImage, LiqErrors> {
    if TypeId::of::<T>() != TypeId::of::<u8>() {
        return Err(UnsupportedFormats::SampleType(type_name::<T>()).into());
    }
    let (height, width, channels) = view.dim();

    let layout = match channels {
        1 => PixelLayout::LUMA,
        2 => PixelLayout::LUMA_A,
        3 => PixelLayout::RGB,
        4 => PixelLayout::RGBA,
        _ => return Err(UnsupportedFormats::ChannelCount(channels).into())
    };
    let standard = view.as_standard_layout();
    let samples = standard
        .as_slice()
        .ok_or(LiqErrors::GenericStatic("Array is not contiguous"))?;

    encode(&PixelBuffer::new(
        bytemuck::cast_slice(samples),
        width,
        height,
        layout
    ))
}

impl<T: Pod> HostAdapter for NdarrayAdapter<T> {
    type Host = Array3<T>;
    type Output = IndexedArrays;

    const NAME: &'static str = "ndarray";
    const SUPPORTS_INDEXED_ALPHA: bool = true;

    fn to_canonical(host: &Array3<T>) -> Result<CanonicalImage, LiqErrors> {
        canonical_from_view(host.view())
    }

    fn from_canonical(
        result: &QuantizationResult, image: &LiqImage<'_, Self>
    ) -> Result<IndexedArrays, LiqErrors> {
        let (width, height) = image.dimensions();

        let indices = decode_indices(result, width, height)?;
        let palette = decode_palette(result);

        let indices = Array3::from_shape_vec((height, width, 1), indices)
            .map_err(|e| LiqErrors::Generic(format!("ndarray: {e:?}")))?;

        let colors = palette.len();
        let flat: Vec<u8> = palette
            .iter()
            .flat_map(|color| [color.r, color.g, color.b, color.a])
            .collect();

        let palette = Array2::from_shape_vec((colors, 4), flat)
            .map_err(|e| LiqErrors::Generic(format!("ndarray: {e:?}")))?;

        Ok((indices, palette))
    }
}

/// Create a quantizable image from an array of shape `(height,width,channels)`
pub fn to_liq<'a, T: Pod>(
    array: &'a Array3<T>, attr: &Attr
) -> Result<LiqImage<'a, NdarrayAdapter<T>>, LiqErrors> {
    crate::to_liq::<NdarrayAdapter<T>>(array, attr)
}

/// Build index and palette arrays from a quantization result
pub fn from_liq<T: Pod>(
    result: &QuantizationResult, image: &LiqImage<'_, NdarrayAdapter<T>>
) -> Result<IndexedArrays, LiqErrors> {
    crate::from_liq(result, image)
}
