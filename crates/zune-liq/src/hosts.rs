/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Host image adapters
//!
//! Every host lives in its own module and is compiled in when
//! its feature is enabled.
//!
//! | Host                      | Indexed output                          | Palette alpha |
//! |---------------------------|-----------------------------------------|---------------|
//! | [`zune`] `Image`          | Luma index image + RGBA palette         | yes           |
//! | [`image`] `DynamicImage`  | `GrayImage` indices + RGB palette       | no            |
//! | [`toolkit`] `Surface`     | `Indexed8` surface + ARGB color table   | yes           |
//! | [`ndarray`] `Array3`      | `(H,W,1)` indices + `(N,4)` palette     | yes           |
//! | [`png`] `PngFrame`        | `PLTE` + `tRNS` indexed PNG             | yes           |
//!
//! Hosts without palette alpha declare it via
//! [`HostAdapter::SUPPORTS_INDEXED_ALPHA`](crate::traits::HostAdapter::SUPPORTS_INDEXED_ALPHA)

pub mod image;
pub mod ndarray;
pub mod png;
pub mod toolkit;
pub mod zune;
