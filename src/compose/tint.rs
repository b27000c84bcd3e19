use std::{
    collections::HashMap,
    sync::{
        RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    foundation::{
        color::{hsl_to_rgb, rgb_to_hsl},
        core::{PixelBuffer, Rgba8},
        math::lerp_u8,
        sync,
    },
    layer::{model::PatchLayer, token::LayerToken},
};

const BOOST_MIX: f32 = 0.3;

/// Applies layer tints and memoizes the results by layer token.
#[derive(Debug, Default)]
pub struct TintProcessor {
    cache: RwLock<HashMap<LayerToken, PixelBuffer>>,
    computed: AtomicU64,
}

impl TintProcessor {
    /// Empty processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tinted pixels for `layer`.
    ///
    /// Layers without a tint, or with a white tint, return their own buffer unchanged.
    pub fn tint(&self, layer: &PatchLayer) -> PixelBuffer {
        let Some(tint) = layer.tint().filter(|c| !is_neutral(*c)) else {
            return layer.texture().clone();
        };
        let token = layer.token();
        if let Some(hit) = sync::read(&self.cache).get(&token) {
            return hit.clone();
        }

        let tinted = apply_tint(layer.texture(), tint);
        self.computed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%token, width = tinted.width, height = tinted.height, "tinted layer");

        sync::write(&self.cache)
            .entry(token)
            .or_insert(tinted)
            .clone()
    }

    /// Number of tint computations performed so far.
    pub fn computed_count(&self) -> u64 {
        self.computed.load(Ordering::Relaxed)
    }

    /// Number of cached tinted buffers.
    pub fn len(&self) -> usize {
        sync::read(&self.cache).len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached buffer.
    pub fn clear(&self) {
        sync::write(&self.cache).clear();
    }
}

fn is_neutral(c: Rgba8) -> bool {
    c.r == 255 && c.g == 255 && c.b == 255
}

pub(crate) fn apply_tint(src: &PixelBuffer, tint: Rgba8) -> PixelBuffer {
    let mut boosted = rgb_to_hsl(tint);
    boosted.s *= 2.0;
    boosted.l *= 2.0;
    let boosted = hsl_to_rgb(boosted, 255);

    let mul = |c: u8, t: u8| ((u16::from(c) * u16::from(t) + 127) / 255) as u8;

    let pixels = src
        .pixels
        .iter()
        .map(|&px| {
            if px.a == 0 {
                return px;
            }
            Rgba8::new(
                lerp_u8(mul(px.r, tint.r), boosted.r, BOOST_MIX),
                lerp_u8(mul(px.g, tint.g), boosted.g, BOOST_MIX),
                lerp_u8(mul(px.b, tint.b), boosted.b, BOOST_MIX),
                px.a,
            )
        })
        .collect();

    PixelBuffer {
        width: src.width,
        height: src.height,
        pixels: std::sync::Arc::new(pixels),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/tint.rs"]
mod tests;
