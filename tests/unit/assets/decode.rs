use std::io::Cursor;

use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn decode_image_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width, 1);
    assert_eq!(decoded.height, 1);
    assert_eq!(decoded.get(0, 0), Some(Rgba8::new(100, 50, 200, 128)));
}

#[test]
fn encode_then_decode_preserves_dimensions() {
    let buf = PixelBuffer::filled(3, 2, Rgba8::opaque(1, 2, 3));
    let png = encode_png(&buf).unwrap();
    let back = decode_image(&png).unwrap();
    assert_eq!((back.width, back.height), (3, 2));
    assert_eq!(back, buf);
}

#[test]
fn decode_garbage_is_error() {
    assert!(decode_image(b"not a png").is_err());
}
