use super::*;

#[test]
fn rect_contains_boundaries() {
    let r = Rect::new(-2, 3, 4, 2);
    assert!(r.contains(-2, 3));
    assert!(r.contains(1, 4));
    assert!(!r.contains(2, 4));
    assert!(!r.contains(0, 5));
    assert!(!r.contains(-3, 3));
}

#[test]
fn pixel_buffer_rejects_length_mismatch() {
    assert!(PixelBuffer::new(2, 2, vec![Rgba8::TRANSPARENT; 3]).is_err());
    assert!(PixelBuffer::new(2, 2, vec![Rgba8::TRANSPARENT; 4]).is_ok());
}

#[test]
fn extract_pads_out_of_bounds_with_transparent() {
    let red = Rgba8::opaque(255, 0, 0);
    let buf = PixelBuffer::filled(2, 2, red);
    let region = buf.extract(Rect::new(1, 1, 2, 2)).unwrap();
    assert_eq!(region.width, 2);
    assert_eq!(region.height, 2);
    assert_eq!(region.get(0, 0), Some(red));
    assert_eq!(region.get(1, 0), Some(Rgba8::TRANSPARENT));
    assert_eq!(region.get(0, 1), Some(Rgba8::TRANSPARENT));
    assert_eq!(region.get(2, 0), None);
}

#[test]
fn extract_reports_unallocatable_region() {
    let buf = PixelBuffer::filled(2, 2, Rgba8::WHITE);
    let err = buf
        .extract(Rect::new(0, 0, u32::MAX, u32::MAX))
        .unwrap_err();
    assert!(matches!(err, SpriteError::CompositionFailure(_)));
}

#[test]
fn rgba8_bytes_roundtrip_preserves_order() {
    let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
    let buf = PixelBuffer::from_rgba8_bytes(2, 1, &bytes).unwrap();
    assert_eq!(buf.get(1, 0), Some(Rgba8::new(5, 6, 7, 8)));
    assert_eq!(buf.to_rgba8_bytes(), bytes);
}
