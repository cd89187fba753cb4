/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "png")]

use png::{BitDepth, ColorType, Decoder, Encoder};
use zune_liq::bridge::CanonicalImage;
use zune_liq::hosts::png::{self as liq_png, PngAdapter, PngFrame, PngIndexed};
use zune_liq::quantize::Attr;
use zune_liq::HostAdapter;

mod common;

fn encode_png(
    pixels: &[u8], width: u32, height: u32, color: ColorType, depth: BitDepth
) -> Vec<u8> {
    let mut output = vec![];
    let mut encoder = Encoder::new(&mut output, width, height);

    encoder.set_color(color);
    encoder.set_depth(depth);

    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(pixels).unwrap();
    writer.finish().unwrap();

    output
}

fn gradient(alpha: bool) -> PngFrame {
    let size = common::SIZE as u32;
    let file = encode_png(
        &common::gradient_rgba(alpha),
        size,
        size,
        ColorType::Rgba,
        BitDepth::Eight
    );
    let frame = PngFrame::read(Decoder::new(&file[..])).unwrap();

    common::assert_input_corners(
        |x, y| {
            let start = y * frame.line_size() + x * 4;
            let px = &frame.pixels()[start..start + 4];
            [px[0], px[1], px[2], px[3]]
        },
        alpha
    );
    frame
}

fn quantize(frame: &PngFrame) -> PngIndexed {
    let mut attr = Attr::new();

    let liq = liq_png::to_liq(frame, &attr).unwrap();
    let result = liq.quantize(&mut attr).unwrap();

    liq_png::from_liq(&result, &liq).unwrap()
}

/// Write, then decode and expand the written file
fn write_and_expand(indexed: &PngIndexed) -> (Vec<u8>, CanonicalImage) {
    let mut file = vec![];
    indexed.write(&mut file).unwrap();

    let frame = PngFrame::read(Decoder::new(&file[..])).unwrap();
    let canonical = PngAdapter::to_canonical(&frame).unwrap();

    (file, canonical)
}

#[test]
fn opaque_gradient() {
    let indexed = quantize(&gradient(false));

    assert_eq!(indexed.dimensions(), (512, 512));
    assert!(indexed.trns().is_empty());

    let (file, canonical) = write_and_expand(&indexed);

    let reader = Decoder::new(&file[..]).read_info().unwrap();
    let info = reader.info();

    assert_eq!(info.color_type, ColorType::Indexed);
    assert_eq!(info.bit_depth, BitDepth::Eight);
    assert_eq!(
        info.palette.as_ref().map(|x| x.len()),
        Some(indexed.palette().len())
    );
    assert!(info.trns.is_none());

    common::assert_corners(|x, y| canonical.pixel(x, y).unwrap(), false);
}

#[test]
fn transparent_gradient() {
    assert!(PngAdapter::SUPPORTS_INDEXED_ALPHA);

    let indexed = quantize(&gradient(true));

    assert!(!indexed.trns().is_empty());
    assert!(indexed.trns().len() * 3 <= indexed.palette().len());

    let (file, canonical) = write_and_expand(&indexed);

    let reader = Decoder::new(&file[..]).read_info().unwrap();
    assert!(reader.info().palette.is_some());
    assert!(reader.info().trns.is_some());

    common::assert_corners(|x, y| canonical.pixel(x, y).unwrap(), true);
}

#[test]
fn low_depth_gray_is_expanded_on_read() {
    // 1 bit, 8 pixels, alternating
    let file = encode_png(&[0b1010_1010], 8, 1, ColorType::Grayscale, BitDepth::One);
    let frame = PngFrame::read(Decoder::new(&file[..])).unwrap();

    assert_eq!(frame.bit_depth(), BitDepth::Eight);

    let canonical = PngAdapter::to_canonical(&frame).unwrap();
    assert_eq!(canonical.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(canonical.pixel(1, 0), Some([0, 0, 0, 255]));
}

#[test]
fn sixteen_bit_is_unsupported() {
    let file = encode_png(&[0; 4 * 4 * 8], 4, 4, ColorType::Rgba, BitDepth::Sixteen);
    let frame = PngFrame::read(Decoder::new(&file[..])).unwrap();
    let attr = Attr::new();

    let err = liq_png::to_liq(&frame, &attr).unwrap_err();
    assert!(err.is_unsupported_format());
}

#[test]
fn host_is_untouched() {
    let frame = gradient(false);
    let before = frame.pixels().to_vec();

    let _ = quantize(&frame);

    assert_eq!(frame.pixels(), &before[..]);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = PngFrame::read(Decoder::new(&b"not a png"[..])).unwrap_err();

    assert!(matches!(err, zune_liq::errors::LiqErrors::DecodeErrors(_)));
}

#[test]
fn short_index_plane_is_refused() {
    let frame = PngFrame::from_raw(vec![0; 12], 2, 2, ColorType::Rgb, BitDepth::Eight);
    let liq = liq_png::to_liq(&frame, &Attr::new()).unwrap();
    let result = common::short_index_plane();

    let err = liq_png::from_liq(&result, &liq).unwrap_err();
    assert!(common::is_short_plane_error(&err));

    let err = PngAdapter::from_canonical(&result, &liq).unwrap_err();
    assert!(common::is_short_plane_error(&err));
}
