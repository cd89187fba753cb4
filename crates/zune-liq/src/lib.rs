/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Moving pixels between image libraries and libimagequant
//!
//! Quantization needs one pixel layout, flat `RGBA` bytes, while every image library
//! stores pixels its own way, and stores paletted images in its own way.
//!
//! This crate contains
//! - A [bridge](crate::bridge) converting host buffers to the canonical layout and
//!   reading quantized results back
//! - [Host adapters](crate::hosts), one per image library, implementing [`HostAdapter`]
//!
//! # Features
//! Each host is behind a feature with the host library's name
//!
//! - `zune-image`: [`zune_image::image::Image`]
//! - `image`: `image::DynamicImage`
//! - `ndarray`: `ndarray::Array3`
//! - `png`: frames decoded by the `png` crate
//! - `toolkit`: toolkit surfaces, see [`hosts::toolkit`]
//!
//! `all` enables every host and is the default.
//!
//! # Usage
//! ```no_run
//! # #[cfg(feature = "png")]
//! # fn main() -> Result<(), zune_liq::errors::LiqErrors> {
//! use zune_liq::hosts::png::{self as liq_png, PngFrame};
//! use zune_liq::quantize::Attr;
//!
//! let file = std::fs::File::open("gradient.png").unwrap();
//! let frame = PngFrame::read(png::Decoder::new(file))?;
//!
//! let mut attr = Attr::new();
//! let image = liq_png::to_liq(&frame, &attr)?;
//! let result = image.quantize(&mut attr)?;
//!
//! let indexed = liq_png::from_liq(&result, &image)?;
//! indexed.write(std::fs::File::create("gradient-8bit.png").unwrap())?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "png"))]
//! # fn main() {}
//! ```
#![allow(clippy::needless_doctest_main)]

pub use crate::quantize::{from_liq, to_liq};
pub use crate::traits::HostAdapter;

pub mod bridge;
pub mod errors;
pub mod hosts;
pub mod options;
pub mod quantize;
pub mod traits;
