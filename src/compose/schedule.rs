use crate::{foundation::math::lcm, layer::model::PatchLayer};

/// Shared animation cycle of a composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationSchedule {
    /// Number of output frames in the strip; `1` when nothing animates.
    pub total_frames: u32,
    /// Duration of one output frame in ticks; `None` when nothing animates.
    pub tick: Option<u32>,
    /// Per-frame width in output pixels.
    pub frame_width: u32,
}

impl AnimationSchedule {
    /// Width of the whole horizontal strip.
    pub fn strip_width(&self) -> u64 {
        u64::from(self.frame_width) * u64::from(self.total_frames)
    }

    /// Frame of `layer` shown in output frame `output_frame`.
    pub fn frame_for(&self, layer: &PatchLayer, output_frame: u32) -> u32 {
        match (self.tick, layer.animation_ticks()) {
            (Some(tick), Some(layer_tick)) => {
                let elapsed = u64::from(output_frame) * u64::from(tick);
                ((elapsed / u64::from(layer_tick)) % u64::from(layer.frames())) as u32
            }
            _ => 0,
        }
    }
}

/// Fold every animated layer into a single cycle.
///
/// The cycle length is the LCM of each layer's `frames * ticks`; the output advances at the
/// fastest layer tick.
pub fn compute_schedule(layers: &[PatchLayer], frame_width: u32) -> AnimationSchedule {
    let mut total_cycle = 1u64;
    let mut tick: Option<u32> = None;
    for layer in layers {
        let Some(layer_tick) = layer.animation_ticks() else {
            continue;
        };
        total_cycle = lcm(total_cycle, u64::from(layer.frames()) * u64::from(layer_tick));
        tick = Some(tick.map_or(layer_tick, |t| t.min(layer_tick)));
    }

    let total_frames = match tick {
        Some(t) => u32::try_from(total_cycle / u64::from(t)).unwrap_or(u32::MAX),
        None => 1,
    };
    AnimationSchedule {
        total_frames,
        tick,
        frame_width,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/schedule.rs"]
mod tests;
