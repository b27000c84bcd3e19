//! Spritepatch composes layered sprite sheets.
//!
//! A host asks for a rectangular region of a base texture with an ordered list of patch layers
//! on top. Each layer carries its own texture, optional tint, opacity, patch mode and animation
//! strip. The engine returns a single [`SpriteSheet`]: a horizontal strip of equally wide frames
//! covering one full shared animation cycle, cached by content identity.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: malformed layers are skipped and reported as [`LayerDiagnostic`]s.
//! 2. **Lookup**: `(base, region, layer tokens)` is checked against the [`CompositeCache`].
//! 3. **Layout**: [`compute_canvas`] sizes the canvas and picks the master scale;
//!    [`compute_schedule`] folds layer animations into one cycle.
//! 4. **Blend**: [`PixelCompositor`] fills output rows in parallel, nearest-neighbor sampling
//!    each layer (tinted by [`TintProcessor`]) over the base region from [`PixelSource`].
//!
//! Everything is owned by an explicit [`SpriteEngine`] instance; there is no global state.
//!
//! ```no_run
//! use std::sync::Arc;
//! use spritepatch::{
//!     EngineSettings, MemoryAssetSource, PatchLayer, PixelBuffer, Rect, Rgba8, SpriteEngine,
//! };
//!
//! let assets = Arc::new(MemoryAssetSource::new());
//! assets.insert("tiles", PixelBuffer::filled(32, 32, Rgba8::opaque(40, 80, 40)));
//! let engine = SpriteEngine::new(assets, EngineSettings::default())?;
//!
//! let hat_pixels = PixelBuffer::filled(16, 16, Rgba8::opaque(200, 0, 0));
//! let hat = PatchLayer::builder(hat_pixels, Rect::new(0, 0, 16, 16))
//!     .tint(Rgba8::opaque(0, 0, 255))
//!     .build();
//! let composed = engine.try_compose("tiles", Rect::new(0, 0, 16, 16), &[hat])?;
//! assert_eq!(composed.sheet.frames, 1);
//! # Ok::<(), spritepatch::SpriteError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod cache;
mod compose;
mod engine;
mod foundation;
mod layer;
mod settings;

pub use assets::decode::{decode_image, encode_png};
pub use assets::pixel_source::PixelSource;
pub use assets::store::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use cache::composite::{CacheOutcome, CompositeCache, CompositeKey};
pub use cache::sheet::SpriteSheet;
pub use compose::compositor::{CompositePlan, PixelCompositor, TintedLayer};
pub use compose::dimensions::{CanvasGeometry, compute_canvas};
pub use compose::schedule::{AnimationSchedule, compute_schedule};
pub use compose::tint::TintProcessor;
pub use engine::{Composed, EngineStats, SpriteEngine};
pub use foundation::core::{Offset, PixelBuffer, Rect, Rgba8};
pub use foundation::error::{SpriteError, SpriteResult};
pub use layer::model::{FrameDuration, PatchLayer, PatchLayerBuilder, PatchMode};
pub use layer::token::LayerToken;
pub use layer::validate::{LayerDiagnostic, validate_layer};
pub use settings::{DEFAULT_MAX_CANVAS_PIXELS, EngineSettings};
