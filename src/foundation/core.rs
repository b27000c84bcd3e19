use std::sync::Arc;

use crate::foundation::error::{SpriteError, SpriteResult};

/// Integer pixel rectangle. Position may be negative; extent is unsigned.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Build a rectangle from position and extent.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `true` when either extent is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Point containment (left/top inclusive, right/bottom exclusive).
    pub fn contains(self, x: i64, y: i64) -> bool {
        i64::from(self.x) <= x && x < self.right() && i64::from(self.y) <= y && y < self.bottom()
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Integer translation in output pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Offset {
    /// Horizontal shift.
    pub x: i32,
    /// Vertical shift.
    pub y: i32,
}

impl Offset {
    /// Build an offset.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels as an array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from an RGBA array.
    pub fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Immutable row-major pixel buffer shared by reference count.
///
/// Cloning is cheap; the pixel storage is never mutated once a buffer is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major pixels, `width * height` entries.
    pub pixels: Arc<Vec<Rgba8>>,
}

impl PixelBuffer {
    /// Wrap pixels, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba8>) -> SpriteResult<Self> {
        let expected = (width as usize).checked_mul(height as usize).ok_or_else(|| {
            SpriteError::validation(format!("pixel buffer {width}x{height} overflows usize"))
        })?;
        if pixels.len() != expected {
            return Err(SpriteError::validation(format!(
                "pixel buffer {width}x{height} expects {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: Arc::new(pixels),
        })
    }

    /// Buffer filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            pixels: Arc::new(vec![color; width as usize * height as usize]),
        }
    }

    /// Build from straight RGBA8 bytes (4 bytes per pixel).
    pub fn from_rgba8_bytes(width: u32, height: u32, bytes: &[u8]) -> SpriteResult<Self> {
        if !bytes.len().is_multiple_of(4) {
            return Err(SpriteError::validation(
                "rgba8 byte length must be a multiple of 4",
            ));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Flatten to straight RGBA8 bytes.
    pub fn to_rgba8_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in self.pixels.iter() {
            out.extend_from_slice(&px.to_array());
        }
        out
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn get(&self, x: i64, y: i64) -> Option<Rgba8> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Copy out a sub-rectangle. Pixels outside the buffer come back transparent.
    ///
    /// Fails with [`SpriteError::CompositionFailure`] when the copy cannot be allocated.
    pub fn extract(&self, rect: Rect) -> SpriteResult<PixelBuffer> {
        let len = usize::try_from(rect.area())
            .map_err(|_| SpriteError::composition("region does not fit in memory"))?;
        let mut out = Vec::new();
        out.try_reserve_exact(len).map_err(|e| {
            SpriteError::composition(format!("allocate {len} region pixels: {e}"))
        })?;
        for row in 0..i64::from(rect.height) {
            let sy = i64::from(rect.y) + row;
            for col in 0..i64::from(rect.width) {
                let sx = i64::from(rect.x) + col;
                out.push(self.get(sx, sy).unwrap_or(Rgba8::TRANSPARENT));
            }
        }
        Ok(PixelBuffer {
            width: rect.width,
            height: rect.height,
            pixels: Arc::new(out),
        })
    }

    /// `true` when both buffers share the same pixel storage.
    pub fn shares_storage(&self, other: &PixelBuffer) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Full bounds as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
