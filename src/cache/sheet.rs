use crate::foundation::core::{Offset, PixelBuffer, Rect};

/// Result of one composition: a horizontal strip of equally wide frames.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSheet {
    /// Strip pixels, `frame_width * frames` wide.
    pub pixels: PixelBuffer,
    /// Base pixels per output pixel (`1 / master_scale`); the smallest layer scale, `1.0` without layers.
    pub scale: f64,
    /// Position of the requested region inside each frame, in base pixels.
    pub origin: Offset,
    /// Width of one frame in output pixels.
    pub frame_width: u32,
    /// Number of frames in the strip.
    pub frames: u32,
    /// Ticks per frame; `None` for a static sheet.
    pub tick_duration: Option<u32>,
}

impl SpriteSheet {
    /// Strip height in output pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height
    }

    /// `true` when the sheet has more than one frame.
    pub fn is_animated(&self) -> bool {
        self.frames > 1
    }

    /// Output-pixel rectangle of frame `index`, or `None` past the last frame.
    pub fn frame_rect(&self, index: u32) -> Option<Rect> {
        if index >= self.frames {
            return None;
        }
        let x = u64::from(index) * u64::from(self.frame_width);
        Some(Rect::new(
            i32::try_from(x).ok()?,
            0,
            self.frame_width,
            self.pixels.height,
        ))
    }

    /// Copy of frame `index`.
    pub fn frame(&self, index: u32) -> Option<PixelBuffer> {
        self.frame_rect(index)
            .and_then(|r| self.pixels.extract(r).ok())
    }

    /// Frame shown after `elapsed_ticks` of playback, looping over the strip.
    pub fn frame_at(&self, elapsed_ticks: u64) -> u32 {
        match self.tick_duration {
            Some(t) if t > 0 && self.frames > 1 => {
                ((elapsed_ticks / u64::from(t)) % u64::from(self.frames)) as u32
            }
            _ => 0,
        }
    }

    /// Strip as an `image` buffer for encoding.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(
            self.pixels.width,
            self.pixels.height,
            self.pixels.to_rgba8_bytes(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/sheet.rs"]
mod tests;
