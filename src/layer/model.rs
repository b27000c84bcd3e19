use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{Offset, PixelBuffer, Rect, Rgba8},
    layer::token::{LayerToken, fingerprint_layer},
};

/// How a layer pixel is written over whatever is beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchMode {
    /// Always overwrite, transparent layer pixels included.
    Replace,
    /// Overwrite only where the layer pixel has non-zero alpha.
    #[default]
    Overlay,
}

/// Per-frame duration class of an animated layer, in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameDuration {
    /// Static: the layer never advances past its first frame.
    #[default]
    None,
    /// 50 ticks per frame.
    VeryFast,
    /// 100 ticks per frame.
    Fast,
    /// 150 ticks per frame.
    Medium,
    /// 300 ticks per frame.
    Slow,
    /// 600 ticks per frame.
    VerySlow,
    /// Explicit tick count per frame.
    Ticks(u32),
}

impl FrameDuration {
    /// Ticks per frame, or `None` for static layers.
    pub fn ticks(self) -> Option<u32> {
        match self {
            FrameDuration::None => None,
            FrameDuration::VeryFast => Some(50),
            FrameDuration::Fast => Some(100),
            FrameDuration::Medium => Some(150),
            FrameDuration::Slow => Some(300),
            FrameDuration::VerySlow => Some(600),
            FrameDuration::Ticks(n) => Some(n),
        }
    }
}

/// One contribution composited over a base texture.
///
/// Layers are immutable once built. Any change (a new tint, a different animation speed,
/// new texture content) means building a new layer, which gets a new [`LayerToken`].
///
/// Coordinates:
/// - `source_area` is the animation strip inside the layer's own texture; frame `i` occupies
///   the `i`-th horizontal slice of width `source_area.width / frames`. Its position also
///   anchors the layer relative to the requested base region.
/// - `destination_area` gives the strip's footprint before scaling; only its extent is used.
/// - `scale` is the number of base pixels one layer pixel covers (0.5 = double resolution).
#[derive(Clone, Debug)]
pub struct PatchLayer {
    pub(crate) texture: PixelBuffer,
    pub(crate) source_area: Rect,
    pub(crate) destination_area: Rect,
    pub(crate) offset: Offset,
    pub(crate) scale: f32,
    pub(crate) tint: Option<Rgba8>,
    pub(crate) opacity: f32,
    pub(crate) mode: PatchMode,
    pub(crate) frames: u32,
    pub(crate) frame_duration: FrameDuration,
    pub(crate) token: LayerToken,
}

impl PatchLayer {
    /// Start building a layer over `texture`, sampling `source_area`.
    pub fn builder(texture: PixelBuffer, source_area: Rect) -> PatchLayerBuilder {
        PatchLayerBuilder::new(texture, source_area)
    }

    /// The layer's own (untinted) texture.
    pub fn texture(&self) -> &PixelBuffer {
        &self.texture
    }

    /// Animation strip inside the layer texture.
    pub fn source_area(&self) -> Rect {
        self.source_area
    }

    /// Unscaled footprint of the strip.
    pub fn destination_area(&self) -> Rect {
        self.destination_area
    }

    /// Shift in output pixels.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Base pixels covered by one layer pixel.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Optional tint color.
    pub fn tint(&self) -> Option<Rgba8> {
        self.tint
    }

    /// Layer opacity in `0..=1`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Patch mode.
    pub fn mode(&self) -> PatchMode {
        self.mode
    }

    /// Number of animation frames in the strip.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Frame duration class.
    pub fn frame_duration(&self) -> FrameDuration {
        self.frame_duration
    }

    /// Identity token; equal tokens render identically.
    pub fn token(&self) -> LayerToken {
        self.token
    }

    /// Ticks per frame when the layer actually animates.
    pub fn animation_ticks(&self) -> Option<u32> {
        if self.frames <= 1 {
            return None;
        }
        self.frame_duration.ticks()
    }

    /// Width of one frame inside the layer texture.
    pub(crate) fn frame_source_width(&self) -> u32 {
        self.source_area.width / self.frames.max(1)
    }

    /// Footprint of a single frame in base pixels, `(width, height)`.
    pub(crate) fn frame_footprint(&self) -> (f64, f64) {
        let scale = f64::from(self.scale);
        (
            f64::from(self.destination_area.width) * scale / f64::from(self.frames.max(1)),
            f64::from(self.destination_area.height) * scale,
        )
    }
}

/// Builder for [`PatchLayer`].
#[derive(Clone, Debug)]
pub struct PatchLayerBuilder {
    texture: PixelBuffer,
    source_area: Rect,
    destination_area: Option<Rect>,
    offset: Offset,
    scale: f32,
    tint: Option<Rgba8>,
    opacity: f32,
    mode: PatchMode,
    frames: u32,
    frame_duration: FrameDuration,
    token: Option<LayerToken>,
}

impl PatchLayerBuilder {
    fn new(texture: PixelBuffer, source_area: Rect) -> Self {
        Self {
            texture,
            source_area,
            destination_area: None,
            offset: Offset::default(),
            scale: 1.0,
            tint: None,
            opacity: 1.0,
            mode: PatchMode::default(),
            frames: 1,
            frame_duration: FrameDuration::None,
            token: None,
        }
    }

    /// Footprint before scaling. Defaults to `source_area`.
    pub fn destination_area(mut self, area: Rect) -> Self {
        self.destination_area = Some(area);
        self
    }

    /// Shift in output pixels.
    pub fn offset(mut self, x: i32, y: i32) -> Self {
        self.offset = Offset::new(x, y);
        self
    }

    /// Base pixels per layer pixel.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Tint color.
    pub fn tint(mut self, tint: Rgba8) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Optional tint color.
    pub fn tint_opt(mut self, tint: Option<Rgba8>) -> Self {
        self.tint = tint;
        self
    }

    /// Opacity in `0..=1`.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Patch mode.
    pub fn mode(mut self, mode: PatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Animation frame count and duration class.
    pub fn animation(mut self, frames: u32, duration: FrameDuration) -> Self {
        self.frames = frames;
        self.frame_duration = duration;
        self
    }

    /// Use a host-supplied identity token instead of a content fingerprint.
    ///
    /// The host guarantees the token changes whenever the rendered output would.
    pub fn token(mut self, token: LayerToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Finish the layer. Validation happens at composition time so that a malformed layer can
    /// be reported and skipped without failing the whole request.
    pub fn build(self) -> PatchLayer {
        let mut layer = PatchLayer {
            destination_area: self.destination_area.unwrap_or(self.source_area),
            texture: self.texture,
            source_area: self.source_area,
            offset: self.offset,
            scale: self.scale,
            tint: self.tint,
            opacity: self.opacity,
            mode: self.mode,
            frames: self.frames,
            frame_duration: self.frame_duration,
            token: LayerToken::from_raw(0),
        };
        layer.token = match self.token {
            Some(token) => token,
            None => fingerprint_layer(&layer),
        };
        layer
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
