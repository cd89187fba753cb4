/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Traits implemented by host adapters
use crate::bridge::CanonicalImage;
use crate::errors::LiqErrors;
use crate::quantize::{LiqImage, QuantizationResult};

/// Moves pixels between a host image representation and the quantizer
///
/// Adapters are stateless, each host library gets one zero sized
/// type implementing this, and callers pick it at compile time
/// via [`to_liq`](crate::to_liq) and [`from_liq`](crate::from_liq)
/// or the helpers in each host module.
pub trait HostAdapter: Sized {
    /// The host image read during conversion
    type Host: ?Sized;
    /// The indexed image handed back to the caller
    type Output;

    /// Name of the adapter, used in logs
    const NAME: &'static str;

    /// Whether the host's indexed format stores alpha for palette entries.
    ///
    /// When false, palette alpha is dropped when building the output
    /// and the reconstructed image is fully opaque.
    const SUPPORTS_INDEXED_ALPHA: bool;

    /// Read host pixels into a canonical image.
    ///
    /// The host image is not modified.
    fn to_canonical(host: &Self::Host) -> Result<CanonicalImage, LiqErrors>;

    /// Build an indexed host image from a quantization result
    ///
    /// Output dimensions are the dimensions of `image`.
    fn from_canonical(
        result: &QuantizationResult, image: &LiqImage<'_, Self>
    ) -> Result<Self::Output, LiqErrors>;
}
