use rayon::prelude::*;

use crate::{
    compose::{dimensions::CanvasGeometry, schedule::AnimationSchedule},
    foundation::{
        core::{PixelBuffer, Rgba8},
        error::{SpriteError, SpriteResult},
        math::lerp_u8,
    },
    layer::model::{PatchLayer, PatchMode},
    settings::EngineSettings,
};

const OPAQUE_EPS: f32 = 1e-3;
// Keeps exact multiples like 3 / (1/3) from flooring to 2.
const FLOOR_EPS: f64 = 1e-9;

/// Layout of one composition: canvas geometry plus animation schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositePlan {
    /// Canvas geometry.
    pub geometry: CanvasGeometry,
    /// Animation schedule.
    pub schedule: AnimationSchedule,
}

impl CompositePlan {
    /// Total output pixels of the strip.
    pub fn canvas_pixels(&self) -> u64 {
        self.schedule
            .strip_width()
            .saturating_mul(u64::from(self.geometry.height))
    }
}

/// A validated layer paired with the pixels to sample (tinted when the layer has a tint).
#[derive(Clone, Debug)]
pub struct TintedLayer {
    /// The layer.
    pub layer: PatchLayer,
    /// Pixels to sample, same dimensions as the layer texture.
    pub pixels: PixelBuffer,
}

struct Sampler<'a> {
    layer: &'a PatchLayer,
    pixels: &'a PixelBuffer,
    anchor: (f64, f64),
    footprint: (f64, f64),
    // Source texels per base pixel along each axis.
    step: (f64, f64),
    frame_src_width: i64,
    opacity: Option<f32>,
}

impl<'a> Sampler<'a> {
    fn new(geometry: &CanvasGeometry, tl: &'a TintedLayer) -> Self {
        let layer = &tl.layer;
        let scale = f64::from(layer.scale());
        let src = layer.source_area();
        let dst = layer.destination_area();
        let opacity = layer.opacity();
        Self {
            layer,
            pixels: &tl.pixels,
            anchor: geometry.layer_anchor(layer),
            footprint: layer.frame_footprint(),
            step: (
                f64::from(src.width) / f64::from(dst.width) / scale,
                f64::from(src.height) / f64::from(dst.height) / scale,
            ),
            frame_src_width: i64::from(layer.frame_source_width()),
            opacity: (opacity < 1.0 - OPAQUE_EPS).then_some(opacity),
        }
    }

    fn sample(&self, u: f64, v: f64, frame: u32) -> Option<Rgba8> {
        let du = u - self.anchor.0;
        let dv = v - self.anchor.1;
        if du < 0.0 || dv < 0.0 || du >= self.footprint.0 || dv >= self.footprint.1 {
            return None;
        }
        let src = self.layer.source_area();
        let lx = i64::from(src.x)
            + i64::from(frame) * self.frame_src_width
            + floor_i64(du * self.step.0);
        let ly = i64::from(src.y) + floor_i64(dv * self.step.1);
        if !src.contains(lx, ly) {
            return None;
        }
        self.pixels.get(lx, ly)
    }

    fn blend(&self, dst: &mut Rgba8, src: Rgba8) {
        if self.layer.mode() == PatchMode::Overlay && src.a == 0 {
            return;
        }
        *dst = match self.opacity {
            None => src,
            Some(t) => Rgba8::new(
                lerp_u8(dst.r, src.r, t),
                lerp_u8(dst.g, src.g, t),
                lerp_u8(dst.b, src.b, t),
                lerp_u8(dst.a, src.a, t),
            ),
        };
    }
}

/// Blends a base region and layers into a sprite-sheet strip.
pub struct PixelCompositor {
    parallel: bool,
    pool: Option<rayon::ThreadPool>,
    max_canvas_pixels: u64,
}

impl PixelCompositor {
    /// Compositor configured from engine settings. Builds a dedicated pool when `threads` is set.
    pub fn new(settings: &EngineSettings) -> SpriteResult<Self> {
        let pool = match settings.threads {
            Some(n) if settings.parallel => Some(build_thread_pool(n)?),
            _ => None,
        };
        Ok(Self {
            parallel: settings.parallel,
            pool,
            max_canvas_pixels: settings.max_canvas_pixels,
        })
    }

    /// Compose `base_region` (the requested region of the base texture) and `layers`, in order,
    /// into a horizontal strip of `plan.schedule.total_frames` frames.
    pub fn compose(
        &self,
        plan: &CompositePlan,
        base_region: &PixelBuffer,
        layers: &[TintedLayer],
    ) -> SpriteResult<PixelBuffer> {
        let canvas_pixels = plan.canvas_pixels();
        if canvas_pixels > self.max_canvas_pixels {
            return Err(SpriteError::composition(format!(
                "canvas {}x{} exceeds the limit of {} pixels",
                plan.schedule.strip_width(),
                plan.geometry.height,
                self.max_canvas_pixels
            )));
        }
        let strip_width = u32::try_from(plan.schedule.strip_width()).map_err(|_| {
            SpriteError::composition("strip width does not fit in 32 bits".to_owned())
        })?;
        let len = usize::try_from(canvas_pixels)
            .map_err(|_| SpriteError::composition("canvas does not fit in memory".to_owned()))?;

        let mut out: Vec<Rgba8> = Vec::new();
        out.try_reserve_exact(len).map_err(|e| {
            SpriteError::composition(format!("allocate {len} canvas pixels: {e}"))
        })?;
        out.resize(len, Rgba8::TRANSPARENT);

        if len > 0 {
            let samplers: Vec<Sampler<'_>> = layers
                .iter()
                .map(|tl| Sampler::new(&plan.geometry, tl))
                .collect();
            let row_width = strip_width as usize;
            let fill = |(y, row): (usize, &mut [Rgba8])| {
                fill_row(plan, base_region, &samplers, y as u32, row)
            };

            if !self.parallel {
                out.chunks_mut(row_width).enumerate().for_each(fill);
            } else if let Some(pool) = &self.pool {
                pool.install(|| out.par_chunks_mut(row_width).enumerate().for_each(fill));
            } else {
                out.par_chunks_mut(row_width).enumerate().for_each(fill);
            }
        }

        PixelBuffer::new(strip_width, plan.geometry.height, out)
    }
}

impl std::fmt::Debug for PixelCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCompositor")
            .field("parallel", &self.parallel)
            .field(
                "threads",
                &self.pool.as_ref().map(|p| p.current_num_threads()),
            )
            .field("max_canvas_pixels", &self.max_canvas_pixels)
            .finish()
    }
}

fn fill_row(
    plan: &CompositePlan,
    base: &PixelBuffer,
    samplers: &[Sampler<'_>],
    y: u32,
    row: &mut [Rgba8],
) {
    let geo = &plan.geometry;
    let frame_width = plan.schedule.frame_width.max(1);
    let v = f64::from(y) / geo.master_scale;
    let by = floor_i64(v) - i64::from(geo.origin.y);

    // Frame indices only change at frame boundaries.
    let mut frames = vec![0u32; samplers.len()];
    let mut current_frame = None;

    for (x, px) in row.iter_mut().enumerate() {
        let x = x as u32;
        let frame = x / frame_width;
        if current_frame != Some(frame) {
            for (slot, s) in frames.iter_mut().zip(samplers) {
                *slot = plan.schedule.frame_for(s.layer, frame);
            }
            current_frame = Some(frame);
        }

        let u = f64::from(x % frame_width) / geo.master_scale;
        let bx = floor_i64(u) - i64::from(geo.origin.x);
        let mut acc = base.get(bx, by).unwrap_or(Rgba8::TRANSPARENT);

        for (s, &layer_frame) in samplers.iter().zip(&frames) {
            if let Some(src) = s.sample(u, v, layer_frame) {
                s.blend(&mut acc, src);
            }
        }
        *px = acc;
    }
}

fn floor_i64(v: f64) -> i64 {
    (v + FLOOR_EPS).floor() as i64
}

pub(crate) fn build_thread_pool(threads: usize) -> SpriteResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(SpriteError::validation(
            "compositor 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("spritepatch-{i}"))
        .build()
        .map_err(|e| SpriteError::composition(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
