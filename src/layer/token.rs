use xxhash_rust::xxh3::Xxh3;

use crate::{
    foundation::core::{Offset, PixelBuffer, Rect, Rgba8},
    layer::model::{PatchLayer, PatchMode},
};

const XXH3_SEED: u64 = 0x5d1f_3c27_a8e4_0b69;

/// Stable identity of a [`PatchLayer`].
///
/// Two layers with equal tokens are guaranteed to render identically, so composite results can
/// be keyed on tokens alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerToken {
    hi: u64,
    lo: u64,
}

impl LayerToken {
    /// Token from a host-chosen 128-bit value.
    pub const fn from_raw(v: u128) -> Self {
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }

    /// Raw 128-bit value.
    pub const fn as_raw(self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }
}

impl std::fmt::Display for LayerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Content fingerprint over every field that influences rendering, texture pixels included.
pub(crate) fn fingerprint_layer(layer: &PatchLayer) -> LayerToken {
    let mut h = StableHasher::new();
    h.write_pixels(&layer.texture);
    h.write_rect(layer.source_area);
    h.write_rect(layer.destination_area);
    h.write_offset(layer.offset);
    h.write_f32(layer.scale);
    h.write_tint(layer.tint);
    h.write_f32(layer.opacity);
    h.write_u8(match layer.mode {
        PatchMode::Replace => 0,
        PatchMode::Overlay => 1,
    });
    h.write_u32(layer.frames);
    match layer.frame_duration.ticks() {
        Some(t) => {
            h.write_u8(1);
            h.write_u32(t);
        }
        None => h.write_u8(0),
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        // -0.0 and 0.0 render the same.
        let v = if v == 0.0 { 0.0 } else { v };
        self.write_u32(v.to_bits());
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_i32(r.x);
        self.write_i32(r.y);
        self.write_u32(r.width);
        self.write_u32(r.height);
    }

    fn write_offset(&mut self, o: Offset) {
        self.write_i32(o.x);
        self.write_i32(o.y);
    }

    fn write_tint(&mut self, tint: Option<Rgba8>) {
        match tint {
            Some(c) => {
                self.write_u8(1);
                self.write_bytes(&c.to_array());
            }
            None => self.write_u8(0),
        }
    }

    fn write_pixels(&mut self, buf: &PixelBuffer) {
        self.write_u32(buf.width);
        self.write_u32(buf.height);
        for px in buf.pixels.iter() {
            self.write_bytes(&px.to_array());
        }
    }

    fn finish(self) -> LayerToken {
        LayerToken::from_raw(self.inner.digest128())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/token.rs"]
mod tests;
