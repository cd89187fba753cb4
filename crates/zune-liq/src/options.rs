/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Quantizer options
//!
//! Options are plain values, they are validated by the quantization engine
//! once they are applied to an [`Attr`](crate::quantize::Attr)

/// Options passed to the quantization engine
///
/// # Example
/// ```
/// use zune_liq::options::QuantizeOptions;
///
/// let options = QuantizeOptions::default()
///     .set_max_colors(64)
///     .set_dithering_level(0.5);
///
/// assert_eq!(options.max_colors(), 64);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuantizeOptions {
    /// Maximum number of palette entries
    max_colors:        u32,
    /// Minimum quality, quantization fails below this
    min_quality:       u8,
    /// Quality the engine aims for
    target_quality:    u8,
    /// 1 (slow, best) to 10 (fast)
    speed:             i32,
    /// Number of least significant bits ignored in each channel
    min_posterization: u8,
    /// Error diffusion strength used when remapping
    dithering_level:   f32,
    /// Gamma of input pixels, 0.0 means sRGB
    gamma:             f64
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        QuantizeOptions {
            max_colors:        256,
            min_quality:       0,
            target_quality:    100,
            speed:             4,
            min_posterization: 0,
            dithering_level:   1.0,
            gamma:             0.0
        }
    }
}

impl QuantizeOptions {
    /// Options tuned for speed over quality
    pub fn new_fast() -> QuantizeOptions {
        QuantizeOptions::default().set_speed(10)
    }

    pub const fn max_colors(&self) -> u32 {
        self.max_colors
    }
    /// Set the maximum number of colors in the palette
    ///
    /// The engine accepts 2..=256
    #[must_use]
    pub const fn set_max_colors(mut self, colors: u32) -> Self {
        self.max_colors = colors;
        self
    }

    /// Returns `(minimum,target)` quality
    pub const fn quality(&self) -> (u8, u8) {
        (self.min_quality, self.target_quality)
    }
    /// Set quality range, both values are 0..=100
    ///
    /// If the engine can't reach `minimum` quantization fails
    /// with `QualityTooLow`
    #[must_use]
    pub const fn set_quality(mut self, minimum: u8, target: u8) -> Self {
        self.min_quality = minimum;
        self.target_quality = target;
        self
    }

    pub const fn speed(&self) -> i32 {
        self.speed
    }
    #[must_use]
    pub const fn set_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub const fn min_posterization(&self) -> u8 {
        self.min_posterization
    }
    #[must_use]
    pub const fn set_min_posterization(mut self, bits: u8) -> Self {
        self.min_posterization = bits;
        self
    }

    pub fn dithering_level(&self) -> f32 {
        self.dithering_level
    }
    /// Set dithering level, 0.0 disables dithering
    #[must_use]
    pub fn set_dithering_level(mut self, level: f32) -> Self {
        self.dithering_level = level;
        self
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
    #[must_use]
    pub fn set_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }
}
