use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    assets::{pixel_source::PixelSource, store::AssetSource},
    cache::{
        composite::{CacheOutcome, CompositeCache, CompositeKey},
        sheet::SpriteSheet,
    },
    compose::{
        compositor::{CompositePlan, PixelCompositor, TintedLayer},
        dimensions::compute_canvas,
        schedule::compute_schedule,
        tint::TintProcessor,
    },
    foundation::{
        core::Rect,
        error::{SpriteError, SpriteResult},
    },
    layer::{
        model::PatchLayer,
        validate::{LayerDiagnostic, partition_layers},
    },
    settings::EngineSettings,
};

/// Outcome of [`SpriteEngine::try_compose`].
#[derive(Clone, Debug)]
pub struct Composed {
    /// The composed (possibly cached) sheet.
    pub sheet: Arc<SpriteSheet>,
    /// One entry per layer that was rejected and skipped.
    pub diagnostics: Vec<LayerDiagnostic>,
}

/// Counters describing engine activity since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Calls to `try_compose`.
    pub requests: u64,
    /// Requests answered from the composite cache.
    pub cache_hits: u64,
    /// Compositions whose sheet was installed in the cache.
    pub compositions: u64,
    /// Compositions whose sheet was not cached: a racing request installed first, or the base
    /// was invalidated while composing.
    pub discarded: u64,
    /// Layers rejected by validation across all requests.
    pub layers_rejected: u64,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    compositions: AtomicU64,
    discarded: AtomicU64,
    layers_rejected: AtomicU64,
}

/// Layered sprite compositing engine.
///
/// Owns every cache; share one instance (it is `Send + Sync`) across the threads that request
/// composites. Drop it to release all cached pixels.
#[derive(Debug)]
pub struct SpriteEngine {
    settings: EngineSettings,
    pixels: PixelSource,
    tints: TintProcessor,
    compositor: PixelCompositor,
    composites: CompositeCache,
    counters: Counters,
}

impl SpriteEngine {
    /// Engine over `source`. Fails when `settings` are invalid or the worker pool cannot start.
    pub fn new(source: Arc<dyn AssetSource>, settings: EngineSettings) -> SpriteResult<Self> {
        settings.validate()?;
        Ok(Self {
            compositor: PixelCompositor::new(&settings)?,
            settings,
            pixels: PixelSource::new(source),
            tints: TintProcessor::new(),
            composites: CompositeCache::new(),
            counters: Counters::default(),
        })
    }

    /// Active settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Compose `layers` over `region` of base texture `base`.
    ///
    /// Invalid layers are skipped and reported in [`Composed::diagnostics`]. Requests with the
    /// same base, region and surviving layer tokens return the same cached sheet. A region larger
    /// than [`EngineSettings::max_canvas_pixels`] fails with
    /// [`SpriteError::CompositionFailure`] before any pixels are read.
    #[tracing::instrument(skip(self, layers), fields(layers = layers.len()))]
    pub fn try_compose(
        &self,
        base: &str,
        region: Rect,
        layers: &[PatchLayer],
    ) -> SpriteResult<Composed> {
        self.counters.requests.fetch_add(1, Ordering::Relaxed);
        if region.is_empty() {
            return Err(SpriteError::validation(format!(
                "requested region {}x{} has zero extent",
                region.width, region.height
            )));
        }
        if region.area() > self.settings.max_canvas_pixels {
            return Err(SpriteError::composition(format!(
                "requested region {}x{} exceeds the limit of {} pixels",
                region.width, region.height, self.settings.max_canvas_pixels
            )));
        }

        let (valid, diagnostics) = partition_layers(layers);
        self.counters
            .layers_rejected
            .fetch_add(diagnostics.len() as u64, Ordering::Relaxed);

        let key = CompositeKey::new(base, region, valid.iter().map(|l| l.token()).collect());
        let (sheet, outcome) = self
            .composites
            .get_or_compose(&key, || self.compose_uncached(base, region, &valid))?;
        let counter = match outcome {
            CacheOutcome::Hit => &self.counters.cache_hits,
            CacheOutcome::Installed => &self.counters.compositions,
            CacheOutcome::Raced | CacheOutcome::Stale => &self.counters.discarded,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(Composed { sheet, diagnostics })
    }

    fn compose_uncached(
        &self,
        base: &str,
        region: Rect,
        layers: &[PatchLayer],
    ) -> SpriteResult<SpriteSheet> {
        let base_region = self.pixels.get_region(base, region)?;

        let geometry = compute_canvas(region, layers);
        let schedule = compute_schedule(layers, geometry.width);
        let plan = CompositePlan { geometry, schedule };

        let tinted: Vec<TintedLayer> = layers
            .iter()
            .map(|layer| TintedLayer {
                pixels: self.tints.tint(layer),
                layer: layer.clone(),
            })
            .collect();

        let pixels = self.compositor.compose(&plan, &base_region, &tinted)?;
        tracing::debug!(
            width = pixels.width,
            height = pixels.height,
            frames = schedule.total_frames,
            master_scale = geometry.master_scale,
            "composed sprite sheet"
        );

        Ok(SpriteSheet {
            pixels,
            scale: geometry.sheet_scale(),
            origin: geometry.origin,
            frame_width: geometry.width,
            frames: schedule.total_frames,
            tick_duration: schedule.tick,
        })
    }

    /// Drop cached pixels and composites for each base texture name.
    ///
    /// A composition of an invalidated base that is still running returns its sheet to its
    /// caller but does not cache it, so the next request recomposes from fresh pixels.
    pub fn invalidate<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let had_pixels = self.pixels.invalidate(name);
            let removed = self.composites.invalidate(name);
            tracing::debug!(name, had_pixels, removed, "invalidated base texture");
        }
    }

    /// Drop every cache: composites, tints and base pixels.
    pub fn clear(&self) {
        self.composites.clear();
        self.tints.clear();
        self.pixels.clear();
    }

    /// Activity counters.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            requests: self.counters.requests.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            compositions: self.counters.compositions.load(Ordering::Relaxed),
            discarded: self.counters.discarded.load(Ordering::Relaxed),
            layers_rejected: self.counters.layers_rejected.load(Ordering::Relaxed),
        }
    }

    /// Number of cached sprite sheets.
    pub fn cached_sheets(&self) -> usize {
        self.composites.len()
    }

    /// Number of times `name` was loaded from the asset source.
    pub fn load_count(&self, name: &str) -> u64 {
        self.pixels.load_count(name)
    }

    /// Number of tint computations performed.
    pub fn tint_computations(&self) -> u64 {
        self.tints.computed_count()
    }
}
