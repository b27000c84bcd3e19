use super::*;
use crate::foundation::core::Rgba8;

fn strip() -> SpriteSheet {
    let mut px = Vec::new();
    for _ in 0..2 {
        for frame in 0..3u8 {
            px.extend([Rgba8::opaque(frame, 0, 0); 2]);
        }
    }
    SpriteSheet {
        pixels: PixelBuffer::new(6, 2, px).unwrap(),
        scale: 1.0,
        origin: Offset::default(),
        frame_width: 2,
        frames: 3,
        tick_duration: Some(100),
    }
}

#[test]
fn frame_rects_tile_the_strip() {
    let s = strip();
    assert!(s.is_animated());
    assert_eq!(s.height(), 2);
    assert_eq!(s.frame_rect(0), Some(Rect::new(0, 0, 2, 2)));
    assert_eq!(s.frame_rect(2), Some(Rect::new(4, 0, 2, 2)));
    assert_eq!(s.frame_rect(3), None);
}

#[test]
fn frame_extracts_its_slice() {
    let s = strip();
    let f = s.frame(1).unwrap();
    assert_eq!((f.width, f.height), (2, 2));
    assert!(f.pixels.iter().all(|p| *p == Rgba8::opaque(1, 0, 0)));
}

#[test]
fn frame_at_loops_over_ticks() {
    let s = strip();
    assert_eq!(s.frame_at(0), 0);
    assert_eq!(s.frame_at(99), 0);
    assert_eq!(s.frame_at(100), 1);
    assert_eq!(s.frame_at(250), 2);
    assert_eq!(s.frame_at(300), 0);

    let still = SpriteSheet {
        frames: 1,
        tick_duration: None,
        ..strip()
    };
    assert_eq!(still.frame_at(12345), 0);
}

#[test]
fn converts_to_image_buffer() {
    let img = strip().to_rgba_image().unwrap();
    assert_eq!(img.dimensions(), (6, 2));
    assert_eq!(img.get_pixel(4, 1).0, [2, 0, 0, 255]);
}
