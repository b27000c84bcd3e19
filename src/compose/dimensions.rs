use crate::{
    foundation::core::{Offset, Rect},
    layer::model::PatchLayer,
};

// Absorbs float noise so that e.g. 16 * 2.0000001 still sizes to 32 pixels.
const CEIL_EPS: f64 = 1e-6;

/// Canvas layout for one composition request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGeometry {
    /// Requested base region.
    pub requested: Rect,
    /// Position of the requested region's top-left corner inside the canvas, in base pixels.
    pub origin: Offset,
    /// Per-frame canvas width in output pixels (already multiplied by `master_scale`).
    pub width: u32,
    /// Canvas height in output pixels (already multiplied by `master_scale`).
    pub height: u32,
    /// Output pixels per base pixel: `1 / min(layer scale)`, or `1` without layers.
    pub master_scale: f64,
}

impl CanvasGeometry {
    /// Fraction of the output resolution one base pixel occupies (`1 / master_scale`).
    pub fn sheet_scale(&self) -> f64 {
        1.0 / self.master_scale
    }

    /// Left/top edge of `layer` relative to the canvas, in base pixels.
    pub(crate) fn layer_anchor(&self, layer: &PatchLayer) -> (f64, f64) {
        let src = layer.source_area();
        let off = layer.offset();
        (
            f64::from(self.origin.x) + f64::from(off.x) + f64::from(src.x)
                - f64::from(self.requested.x),
            f64::from(self.origin.y) + f64::from(off.y) + f64::from(src.y)
                - f64::from(self.requested.y),
        )
    }
}

/// Size the canvas so that the requested region and every layer footprint fit.
///
/// Layers are expected to have passed validation.
pub fn compute_canvas(requested: Rect, layers: &[PatchLayer]) -> CanvasGeometry {
    let origin_x = layers
        .iter()
        .map(|l| i64::from(requested.x) - i64::from(l.source_area().x) - i64::from(l.offset().x))
        .fold(0, i64::max);
    let origin_y = layers
        .iter()
        .map(|l| i64::from(requested.y) - i64::from(l.source_area().y) - i64::from(l.offset().y))
        .fold(0, i64::max);

    let origin = Offset::new(clamp_i32(origin_x), clamp_i32(origin_y));
    let mut geometry = CanvasGeometry {
        requested,
        origin,
        width: 0,
        height: 0,
        master_scale: 1.0,
    };

    let mut width = f64::from(origin.x) + f64::from(requested.width);
    let mut height = f64::from(origin.y) + f64::from(requested.height);
    let mut min_scale: Option<f64> = None;
    for layer in layers {
        let (ax, ay) = geometry.layer_anchor(layer);
        let (fw, fh) = layer.frame_footprint();
        width = width.max(ax + fw);
        height = height.max(ay + fh);
        let scale = f64::from(layer.scale());
        min_scale = Some(min_scale.map_or(scale, |m| m.min(scale)));
    }

    geometry.master_scale = 1.0 / min_scale.unwrap_or(1.0);
    geometry.width = ceil_px(width * geometry.master_scale);
    geometry.height = ceil_px(height * geometry.master_scale);
    geometry
}

fn ceil_px(v: f64) -> u32 {
    let v = (v - CEIL_EPS).ceil();
    if v <= 0.0 {
        0
    } else if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v as u32
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/compose/dimensions.rs"]
mod tests;
