/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "toolkit")]

//! GUI toolkit surfaces
//!
//! Toolkits store images as surfaces, rows of pixels in one of a fixed set
//! of formats, each row padded to a 32 bit boundary. 32 bit formats are
//! stored as native endian words (`0xAARRGGBB`), paletted surfaces store one
//! byte per pixel and a color table of such words.
//!
//! Two bindings of the same toolkit expose identical surfaces, so a single
//! adapter serves both.
//!
//! Surfaces can only be created once the toolkit is initialized, which is
//! modelled by requiring an [`Application`] token.
//!
//! ```
//! use zune_liq::hosts::toolkit::{Application, Surface, SurfaceFormat};
//!
//! let app = Application::new();
//! let surface = Surface::new(&app, 16, 16, SurfaceFormat::Argb32).unwrap();
//! assert_eq!(surface.bytes_per_line(), 64);
//! ```
use log::trace;

use crate::bridge::{
    decode_indices, decode_palette, encode, CanonicalImage, PixelBuffer, PixelLayout
};
use crate::errors::{LiqErrors, ShapeErrors, UnsupportedFormats};
use crate::quantize::{Attr, LiqImage, QuantizationResult};
use crate::traits::HostAdapter;

/// A toolkit color, `0xAARRGGBB`
pub type Rgb = u32;

/// Pack components into a toolkit color
pub const fn q_rgba(r: u8, g: u8, b: u8, a: u8) -> Rgb {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Unpack a toolkit color into `[R,G,B,A]`
pub const fn q_components(color: Rgb) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8
    ]
}

/// Undo alpha premultiplication of a `[R,G,B,A]` pixel in place
///
/// Components are divided by alpha with rounding, a fully transparent
/// pixel becomes transparent black.
pub fn unpremultiply(px: &mut [u8]) {
    let a = u32::from(px[3]);

    if a == 0 {
        px[..3].fill(0);
        return;
    }
    for c in &mut px[..3] {
        *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Proof that the toolkit was initialized
///
/// Every surface holds one, and indexed surfaces built by
/// [`from_liq`] reuse the token of the surface they came from.
#[derive(Clone, Debug)]
pub struct Application {
    _private: ()
}

impl Application {
    /// Initialize the toolkit
    pub fn new() -> Application {
        trace!("toolkit: application initialized");
        Application { _private: () }
    }
}

impl Default for Application {
    fn default() -> Self {
        Application::new()
    }
}

/// Pixel formats of a surface
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SurfaceFormat {
    /// 1 bit per pixel, most significant bit first
    Mono,
    /// 8 bit indices into a color table
    Indexed8,
    /// `0xffRRGGBB` words
    Rgb32,
    /// `0xAARRGGBB` words
    Argb32,
    /// `0xAARRGGBB` words, color premultiplied by alpha
    Argb32Premultiplied,
    /// 5-6-5 RGB
    Rgb16,
    /// `R`,`G`,`B` bytes
    Rgb888,
    /// `R`,`G`,`B`,`A` bytes
    Rgba8888,
    Grayscale8,
    Grayscale16,
    /// 16 bit `R`,`G`,`B`,`A`
    Rgba64,
    Cmyk8888
}

impl SurfaceFormat {
    pub const fn bits_per_pixel(self) -> usize {
        match self {
            SurfaceFormat::Mono => 1,
            SurfaceFormat::Indexed8 | SurfaceFormat::Grayscale8 => 8,
            SurfaceFormat::Rgb16 | SurfaceFormat::Grayscale16 => 16,
            SurfaceFormat::Rgb888 => 24,
            SurfaceFormat::Rgb32
            | SurfaceFormat::Argb32
            | SurfaceFormat::Argb32Premultiplied
            | SurfaceFormat::Rgba8888
            | SurfaceFormat::Cmyk8888 => 32,
            SurfaceFormat::Rgba64 => 64
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            SurfaceFormat::Argb32
                | SurfaceFormat::Argb32Premultiplied
                | SurfaceFormat::Rgba8888
                | SurfaceFormat::Rgba64
        )
    }

    /// Byte layout of a pixel for formats the bridge can read directly
    ///
    /// Word formats depend on the machine endianness, premultiplied
    /// words share the layout of straight ones.
    fn layout(self) -> Option<PixelLayout> {
        let little = cfg!(target_endian = "little");

        match self {
            SurfaceFormat::Argb32 | SurfaceFormat::Argb32Premultiplied if little => {
                Some(PixelLayout::BGRA)
            }
            SurfaceFormat::Argb32 | SurfaceFormat::Argb32Premultiplied => Some(PixelLayout::ARGB),
            SurfaceFormat::Rgb32 if little => Some(PixelLayout::BGRX),
            SurfaceFormat::Rgb32 => Some(PixelLayout::XRGB),
            SurfaceFormat::Rgba8888 => Some(PixelLayout::RGBA),
            SurfaceFormat::Rgb888 => Some(PixelLayout::RGB),
            SurfaceFormat::Grayscale8 => Some(PixelLayout::LUMA),
            _ => None
        }
    }
}

/// Bytes in a row of `width` pixels, padded to 4 bytes
fn aligned_line(width: usize, format: SurfaceFormat) -> Option<usize> {
    let bits = width.checked_mul(format.bits_per_pixel())?;
    let bytes = bits.checked_add(31)? / 32;

    bytes.checked_mul(4)
}

/// A toolkit image
#[derive(Clone, Debug)]
pub struct Surface {
    app:            Application,
    width:          usize,
    height:         usize,
    format:         SurfaceFormat,
    bytes_per_line: usize,
    bits:           Vec<u8>,
    color_table:    Vec<Rgb>
}

impl Surface {
    /// Create a zero filled surface
    ///
    /// # Returns
    /// A shape error if a dimension is zero or the surface is too large
    pub fn new(
        app: &Application, width: usize, height: usize, format: SurfaceFormat
    ) -> Result<Surface, LiqErrors> {
        let too_large = || ShapeErrors::TooLargeDimensions(width, height);

        if width == 0 || height == 0 {
            return Err(ShapeErrors::ZeroDimensions(width, height).into());
        }
        let bytes_per_line = aligned_line(width, format).ok_or_else(too_large)?;
        let size = bytes_per_line.checked_mul(height).ok_or_else(too_large)?;

        Ok(Surface {
            app: app.clone(),
            width,
            height,
            format,
            bytes_per_line,
            bits: vec![0; size],
            color_table: vec![]
        })
    }

    /// Create a surface from existing rows
    ///
    /// `bits` must hold `height` rows of `bytes_per_line` bytes,
    /// where a row may be longer than the pixels it holds.
    pub fn from_bits(
        app: &Application, bits: Vec<u8>, width: usize, height: usize, bytes_per_line: usize,
        format: SurfaceFormat
    ) -> Result<Surface, LiqErrors> {
        let too_large = || ShapeErrors::TooLargeDimensions(width, height);

        if width == 0 || height == 0 {
            return Err(ShapeErrors::ZeroDimensions(width, height).into());
        }
        let minimum = width
            .checked_mul(format.bits_per_pixel())
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(too_large)?;

        if bytes_per_line < minimum {
            return Err(ShapeErrors::StrideTooSmall {
                minimum,
                found: bytes_per_line
            }
            .into());
        }
        let expected = bytes_per_line.checked_mul(height).ok_or_else(too_large)?;

        if bits.len() != expected {
            return Err(ShapeErrors::LengthMismatch {
                expected,
                found: bits.len()
            }
            .into());
        }
        Ok(Surface {
            app: app.clone(),
            width,
            height,
            format,
            bytes_per_line,
            bits,
            color_table: vec![]
        })
    }

    /// The application this surface belongs to
    pub const fn application(&self) -> &Application {
        &self.app
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn format(&self) -> SurfaceFormat {
        self.format
    }

    pub const fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Bytes of row `y`, including padding
    pub fn scan_line(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.bytes_per_line;
        self.bits.get(start..start + self.bytes_per_line)
    }

    pub fn scan_line_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.bytes_per_line;
        self.bits.get_mut(start..start + self.bytes_per_line)
    }

    pub fn color_table(&self) -> &[Rgb] {
        &self.color_table
    }

    /// Replace the color table of an indexed surface
    pub fn set_color_table(&mut self, table: Vec<Rgb>) -> Result<(), LiqErrors> {
        if table.len() > 256 {
            return Err(UnsupportedFormats::PaletteSize(table.len()).into());
        }
        self.color_table = table;
        Ok(())
    }

    /// Color table index at `(x,y)` of an `Indexed8` surface
    pub fn pixel_index(&self, x: usize, y: usize) -> Option<u8> {
        if self.format != SurfaceFormat::Indexed8 || x >= self.width {
            return None;
        }
        self.scan_line(y).map(|line| line[x])
    }

    /// Straight (not premultiplied) color at `(x,y)`
    ///
    /// Returns `None` when out of bounds, when an index points outside the color table,
    /// or for formats without a direct byte layout other than `Indexed8`.
    pub fn pixel_color(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width {
            return None;
        }
        let line = self.scan_line(y)?;

        match self.format {
            SurfaceFormat::Indexed8 => self.color_table.get(usize::from(line[x])).copied(),
            SurfaceFormat::Argb32 => {
                let word: u32 = bytemuck::pod_read_unaligned(&line[x * 4..x * 4 + 4]);
                Some(word)
            }
            SurfaceFormat::Argb32Premultiplied => {
                let word: u32 = bytemuck::pod_read_unaligned(&line[x * 4..x * 4 + 4]);
                let mut px = q_components(word);

                unpremultiply(&mut px);
                Some(q_rgba(px[0], px[1], px[2], px[3]))
            }
            SurfaceFormat::Rgb32 => {
                let word: u32 = bytemuck::pod_read_unaligned(&line[x * 4..x * 4 + 4]);
                Some(word | 0xff00_0000)
            }
            SurfaceFormat::Rgba8888 => {
                let px = &line[x * 4..x * 4 + 4];
                Some(q_rgba(px[0], px[1], px[2], px[3]))
            }
            SurfaceFormat::Rgb888 => {
                let px = &line[x * 3..x * 3 + 3];
                Some(q_rgba(px[0], px[1], px[2], 255))
            }
            SurfaceFormat::Grayscale8 => Some(q_rgba(line[x], line[x], line[x], 255)),
            _ => None
        }
    }

    /// Set the color at `(x,y)`
    ///
    /// Only `Argb32` and `Rgba8888` surfaces can be written pixel by pixel.
    pub fn set_pixel_color(&mut self, x: usize, y: usize, color: Rgb) -> Result<(), LiqErrors> {
        let (width, height) = self.dimensions();
        let format = self.format;

        if x >= width || y >= height {
            return Err(LiqErrors::Generic(format!(
                "Pixel ({x},{y}) is outside a surface of ({width},{height})"
            )));
        }
        let bytes = match format {
            SurfaceFormat::Argb32 => color.to_ne_bytes(),
            SurfaceFormat::Rgba8888 => q_components(color),
            _ => {
                return Err(UnsupportedFormats::PixelFormat(format!(
                    "{format:?} does not support writing pixels"
                ))
                .into())
            }
        };
        let line = self
            .scan_line_mut(y)
            .ok_or(LiqErrors::GenericStatic("Surface row is missing"))?;

        line[x * 4..x * 4 + 4].copy_from_slice(&bytes);
        Ok(())
    }

    /// Convert to a 32 bit format
    ///
    /// Only `Argb32` and `Rgba8888` are accepted as targets, and
    /// only surfaces with a readable layout can be converted.
    pub fn convert_to_format(&self, format: SurfaceFormat) -> Result<Surface, LiqErrors> {
        if !matches!(format, SurfaceFormat::Argb32 | SurfaceFormat::Rgba8888) {
            return Err(UnsupportedFormats::PixelFormat(format!(
                "Can't convert to {format:?}"
            ))
            .into());
        }
        let mut output = Surface::new(&self.app, self.width, self.height, format)?;

        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.pixel_color(x, y).ok_or_else(|| {
                    UnsupportedFormats::PixelFormat(format!(
                        "Can't read pixel ({x},{y}) of a {:?} surface",
                        self.format
                    ))
                })?;
                output.set_pixel_color(x, y, color)?;
            }
        }
        Ok(output)
    }
}

/// Adapter for toolkit [`Surface`]s
pub struct SurfaceAdapter;

impl SurfaceAdapter {
    fn expand_indexed(host: &Surface) -> Result<CanonicalImage, LiqErrors> {
        let table = host.color_table();
        let mut pixels = Vec::with_capacity(host.width * host.height * 4);

        for y in 0..host.height {
            let line = host
                .scan_line(y)
                .ok_or(LiqErrors::GenericStatic("Surface row is missing"))?;

            for index in &line[..host.width] {
                let color = table.get(usize::from(*index)).ok_or(
                    UnsupportedFormats::IndexOutOfRange {
                        index:       *index,
                        palette_len: table.len()
                    }
                )?;
                pixels.extend_from_slice(&q_components(*color));
            }
        }
        CanonicalImage::new(pixels, host.width, host.height)
    }
}

impl HostAdapter for SurfaceAdapter {
    type Host = Surface;
    type Output = Surface;

    const NAME: &'static str = "toolkit";
    const SUPPORTS_INDEXED_ALPHA: bool = true;

    fn to_canonical(host: &Surface) -> Result<CanonicalImage, LiqErrors> {
        if host.format == SurfaceFormat::Indexed8 {
            return SurfaceAdapter::expand_indexed(host);
        }
        let layout = host
            .format
            .layout()
            .ok_or_else(|| UnsupportedFormats::PixelFormat(format!("{:?}", host.format)))?;

        let canonical = encode(
            &PixelBuffer::new(&host.bits, host.width, host.height, layout)
                .with_stride(host.bytes_per_line)
        )?;

        if host.format != SurfaceFormat::Argb32Premultiplied {
            return Ok(canonical);
        }
        trace!("toolkit: un-premultiplying {:?} surface", host.format);

        let (width, height) = canonical.dimensions();
        let mut pixels = canonical.into_bytes();

        pixels.chunks_exact_mut(4).for_each(unpremultiply);

        CanonicalImage::new(pixels, width, height)
    }

    fn from_canonical(
        result: &QuantizationResult, image: &LiqImage<'_, Self>
    ) -> Result<Surface, LiqErrors> {
        let (width, height) = image.dimensions();

        let indices = decode_indices(result, width, height)?;
        let palette = decode_palette(result);

        let mut surface = Surface::new(
            image.host().application(),
            width,
            height,
            SurfaceFormat::Indexed8
        )?;

        for (y, row) in indices.chunks_exact(width).enumerate() {
            let line = surface
                .scan_line_mut(y)
                .ok_or(LiqErrors::GenericStatic("Surface row is missing"))?;
            line[..width].copy_from_slice(row);
        }
        surface.set_color_table(
            palette
                .iter()
                .map(|color| q_rgba(color.r, color.g, color.b, color.a))
                .collect()
        )?;

        Ok(surface)
    }
}

/// Create a quantizable image from a surface
pub fn to_liq<'a>(
    surface: &'a Surface, attr: &Attr
) -> Result<LiqImage<'a, SurfaceAdapter>, LiqErrors> {
    crate::to_liq::<SurfaceAdapter>(surface, attr)
}

/// Build an `Indexed8` surface from a quantization result
pub fn from_liq(
    result: &QuantizationResult, image: &LiqImage<'_, SurfaceAdapter>
) -> Result<Surface, LiqErrors> {
    crate::from_liq(result, image)
}

#[cfg(test)]
mod tests {
    use crate::hosts::toolkit::{
        q_components, q_rgba, Application, Surface, SurfaceAdapter, SurfaceFormat
    };
    use crate::traits::HostAdapter;

    #[test]
    fn rows_are_word_aligned() {
        let app = Application::new();

        let surface = Surface::new(&app, 3, 2, SurfaceFormat::Rgb888).unwrap();
        assert_eq!(surface.bytes_per_line(), 12);

        let surface = Surface::new(&app, 5, 2, SurfaceFormat::Indexed8).unwrap();
        assert_eq!(surface.bytes_per_line(), 8);
        assert_eq!(surface.bits().len(), 16);
    }

    #[test]
    fn argb_words_read_as_rgba() {
        let app = Application::new();
        let mut surface = Surface::new(&app, 2, 1, SurfaceFormat::Argb32).unwrap();

        surface.set_pixel_color(0, 0, q_rgba(10, 20, 30, 40)).unwrap();
        surface.set_pixel_color(1, 0, q_rgba(200, 150, 100, 255)).unwrap();

        let image = SurfaceAdapter::to_canonical(&surface).unwrap();

        assert_eq!(image.as_bytes(), &[10, 20, 30, 40, 200, 150, 100, 255]);
        assert_eq!(surface.pixel_color(0, 0), Some(q_rgba(10, 20, 30, 40)));
    }

    #[test]
    fn padded_rgb888_rows() {
        let app = Application::new();
        let mut bits = vec![0_u8; 16];

        bits[0..6].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        bits[8..14].copy_from_slice(&[7, 8, 9, 10, 11, 12]);

        let surface = Surface::from_bits(&app, bits, 2, 2, 8, SurfaceFormat::Rgb888).unwrap();
        let image = SurfaceAdapter::to_canonical(&surface).unwrap();

        assert_eq!(image.pixel(1, 1), Some([10, 11, 12, 255]));
        assert_eq!(image.pixel(0, 1), Some([7, 8, 9, 255]));
    }

    #[test]
    fn indexed_input_expands_color_table() {
        let app = Application::new();
        let mut surface = Surface::new(&app, 2, 1, SurfaceFormat::Indexed8).unwrap();

        surface.scan_line_mut(0).unwrap()[..2].copy_from_slice(&[1, 0]);
        surface
            .set_color_table(vec![q_rgba(1, 2, 3, 4), q_rgba(5, 6, 7, 8)])
            .unwrap();

        let image = SurfaceAdapter::to_canonical(&surface).unwrap();
        assert_eq!(image.as_bytes(), &[5, 6, 7, 8, 1, 2, 3, 4]);

        surface.set_color_table(vec![q_rgba(1, 2, 3, 4)]).unwrap();
        assert!(SurfaceAdapter::to_canonical(&surface)
            .unwrap_err()
            .is_unsupported_format());
    }

    #[test]
    fn unreadable_formats_are_refused() {
        let app = Application::new();

        for format in [
            SurfaceFormat::Mono,
            SurfaceFormat::Rgb16,
            SurfaceFormat::Grayscale16,
            SurfaceFormat::Rgba64,
            SurfaceFormat::Cmyk8888
        ] {
            let surface = Surface::new(&app, 4, 4, format).unwrap();
            let err = SurfaceAdapter::to_canonical(&surface).unwrap_err();

            assert!(err.is_unsupported_format(), "{format:?}");
        }
    }

    #[test]
    fn convert_round_trips_colors() {
        let app = Application::new();
        let mut surface = Surface::new(&app, 1, 1, SurfaceFormat::Rgba8888).unwrap();

        surface.set_pixel_color(0, 0, q_rgba(9, 99, 199, 77)).unwrap();

        let argb = surface.convert_to_format(SurfaceFormat::Argb32).unwrap();

        assert_eq!(argb.pixel_color(0, 0), Some(q_rgba(9, 99, 199, 77)));
        assert_eq!(q_components(q_rgba(9, 99, 199, 77)), [9, 99, 199, 77]);
        assert!(surface.convert_to_format(SurfaceFormat::Mono).is_err());
    }

    #[test]
    fn premultiplied_words_are_straightened() {
        let app = Application::new();
        let words: [u32; 4] = [0x8080_0000, 0x0000_0000, 0xff10_2030, 0x4020_1000];
        let bits = words.iter().flat_map(|w| w.to_ne_bytes()).collect();

        let surface =
            Surface::from_bits(&app, bits, 4, 1, 16, SurfaceFormat::Argb32Premultiplied).unwrap();
        let image = SurfaceAdapter::to_canonical(&surface).unwrap();

        assert_eq!(image.pixel(0, 0), Some([255, 0, 0, 128]));
        assert_eq!(image.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(image.pixel(2, 0), Some([0x10, 0x20, 0x30, 255]));
        assert_eq!(image.pixel(3, 0), Some([128, 64, 0, 64]));

        // pixel reads agree with conversion
        assert_eq!(surface.pixel_color(0, 0), Some(q_rgba(255, 0, 0, 128)));

        let argb = surface.convert_to_format(SurfaceFormat::Argb32).unwrap();
        assert_eq!(argb.pixel_color(3, 0), Some(q_rgba(128, 64, 0, 64)));
    }

    #[test]
    fn alpha_formats() {
        assert!(SurfaceFormat::Argb32.has_alpha());
        assert!(SurfaceFormat::Argb32Premultiplied.has_alpha());
        assert!(!SurfaceFormat::Rgb32.has_alpha());
        assert!(!SurfaceFormat::Indexed8.has_alpha());
    }
}
