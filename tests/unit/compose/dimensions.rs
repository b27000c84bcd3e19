use super::*;
use crate::{
    foundation::core::{PixelBuffer, Rgba8},
    layer::model::FrameDuration,
};

fn layer(w: u32, h: u32) -> crate::layer::model::PatchLayerBuilder {
    PatchLayer::builder(
        PixelBuffer::filled(w, h, Rgba8::opaque(9, 9, 9)),
        Rect::new(0, 0, w, h),
    )
}

#[test]
fn no_layers_is_the_requested_region() {
    let g = compute_canvas(Rect::new(5, 7, 16, 12), &[]);
    assert_eq!(g.origin, Offset::new(0, 0));
    assert_eq!((g.width, g.height), (16, 12));
    assert_eq!(g.master_scale, 1.0);
    assert_eq!(g.sheet_scale(), 1.0);
}

#[test]
fn aligned_layer_keeps_region_size() {
    let g = compute_canvas(Rect::new(0, 0, 16, 16), &[layer(16, 16).build()]);
    assert_eq!((g.width, g.height), (16, 16));
}

#[test]
fn negative_offset_moves_origin_and_grows_canvas() {
    let l = layer(8, 8).offset(-4, -2).build();
    let g = compute_canvas(Rect::new(0, 0, 8, 8), &[l.clone()]);
    assert_eq!(g.origin, Offset::new(4, 2));
    assert_eq!((g.width, g.height), (12, 10));
    assert_eq!(g.layer_anchor(&l), (0.0, 0.0));
}

#[test]
fn positive_offset_grows_right_and_down() {
    let g = compute_canvas(Rect::new(0, 0, 8, 8), &[layer(8, 8).offset(10, 3).build()]);
    assert_eq!(g.origin, Offset::new(0, 0));
    assert_eq!((g.width, g.height), (18, 11));
}

#[test]
fn half_scale_layer_doubles_resolution() {
    let l = layer(32, 32).scale(0.5).build();
    let g = compute_canvas(Rect::new(0, 0, 16, 16), &[l]);
    assert_eq!(g.master_scale, 2.0);
    assert_eq!(g.sheet_scale(), 0.5);
    assert_eq!((g.width, g.height), (32, 32));
}

#[test]
fn upscaled_only_layers_shrink_the_canvas() {
    let g = compute_canvas(Rect::new(0, 0, 8, 8), &[layer(8, 8).scale(2.0).build()]);
    assert_eq!(g.master_scale, 0.5);
    assert_eq!(g.sheet_scale(), 2.0);
    assert_eq!((g.width, g.height), (8, 8));
}

#[test]
fn smallest_layer_scale_sets_master_scale() {
    let layers = [
        layer(8, 8).scale(2.0).build(),
        layer(8, 8).scale(4.0).build(),
    ];
    let g = compute_canvas(Rect::new(0, 0, 4, 4), &layers);
    assert_eq!(g.master_scale, 0.5);
    assert_eq!((g.width, g.height), (16, 16));
}

#[test]
fn frame_count_divides_footprint_width() {
    let l = layer(64, 16).animation(4, FrameDuration::Fast).build();
    let g = compute_canvas(Rect::new(0, 0, 8, 8), &[l]);
    assert_eq!((g.width, g.height), (16, 16));
}

#[test]
fn source_area_position_anchors_layer_relative_to_region() {
    let tex = PixelBuffer::filled(32, 32, Rgba8::WHITE);
    let l = PatchLayer::builder(tex, Rect::new(16, 0, 8, 8)).build();
    let g = compute_canvas(Rect::new(16, 0, 8, 8), &[l.clone()]);
    assert_eq!(g.origin, Offset::new(0, 0));
    assert_eq!(g.layer_anchor(&l), (0.0, 0.0));
    assert_eq!((g.width, g.height), (8, 8));
}
