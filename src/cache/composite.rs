use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    cache::sheet::SpriteSheet,
    foundation::{core::Rect, error::SpriteResult},
    layer::token::LayerToken,
};

/// Identity of a composite: base texture, requested region, and the ordered tokens of the
/// layers that took part.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    /// Base texture name.
    pub base: String,
    /// Requested base region.
    pub region: Rect,
    /// Tokens of the layers that passed validation, in caller order.
    pub layers: Vec<LayerToken>,
}

impl CompositeKey {
    /// Build a key.
    pub fn new(base: impl Into<String>, region: Rect, layers: Vec<LayerToken>) -> Self {
        Self {
            base: base.into(),
            region,
            layers,
        }
    }
}

/// How [`CompositeCache::get_or_compose`] produced its sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from the cache without composing.
    Hit,
    /// Composed and installed.
    Installed,
    /// Composed, but a racing request installed first; its sheet is returned.
    Raced,
    /// Composed, but the base was invalidated meanwhile; returned without being cached.
    Stale,
}

impl CacheOutcome {
    /// `true` for [`CacheOutcome::Hit`].
    pub fn is_hit(self) -> bool {
        self == Self::Hit
    }
}

/// Memoized sprite sheets keyed by [`CompositeKey`].
///
/// Compositions run outside any lock. When two requests race on the same key, the first
/// finished sheet is kept and returned to both. Every base carries a generation that
/// [`invalidate`](Self::invalidate) and [`clear`](Self::clear) bump; a sheet whose composition
/// started under an older generation is never installed.
#[derive(Debug, Default)]
pub struct CompositeCache {
    sheets: DashMap<CompositeKey, Arc<SpriteSheet>>,
    generations: DashMap<String, u64>,
}

impl CompositeCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached sheet for `key`, if any.
    pub fn get(&self, key: &CompositeKey) -> Option<Arc<SpriteSheet>> {
        self.sheets.get(key).map(|s| Arc::clone(s.value()))
    }

    /// Return the cached sheet for `key` or run `compute` and install its result.
    ///
    /// Errors from `compute` are returned and not cached.
    pub fn get_or_compose<F>(
        &self,
        key: &CompositeKey,
        compute: F,
    ) -> SpriteResult<(Arc<SpriteSheet>, CacheOutcome)>
    where
        F: FnOnce() -> SpriteResult<SpriteSheet>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(base = %key.base, layers = key.layers.len(), "composite cache hit");
            return Ok((hit, CacheOutcome::Hit));
        }

        let started = *self.generations.entry(key.base.clone()).or_insert(0);
        let sheet = Arc::new(compute()?);

        // Holding the generation entry orders this install against invalidation of the base.
        let generation = self.generations.entry(key.base.clone()).or_insert(0);
        if *generation != started {
            tracing::debug!(base = %key.base, "base invalidated during composition, not caching");
            return Ok((sheet, CacheOutcome::Stale));
        }
        let installed = Arc::clone(
            self.sheets
                .entry(key.clone())
                .or_insert_with(|| Arc::clone(&sheet))
                .value(),
        );
        drop(generation);

        let outcome = if Arc::ptr_eq(&installed, &sheet) {
            CacheOutcome::Installed
        } else {
            CacheOutcome::Raced
        };
        Ok((installed, outcome))
    }

    /// Remove every sheet composed over `base`. Returns the number removed.
    ///
    /// Compositions of `base` still in flight will not be installed.
    pub fn invalidate(&self, base: &str) -> usize {
        *self.generations.entry(base.to_owned()).or_insert(0) += 1;
        let mut removed = 0;
        self.sheets.retain(|k, _| {
            let keep = k.base != base;
            removed += usize::from(!keep);
            keep
        });
        if removed > 0 {
            tracing::debug!(base, removed, "invalidated composites");
        }
        removed
    }

    /// Drop every sheet. Compositions still in flight will not be installed.
    pub fn clear(&self) {
        self.generations.iter_mut().for_each(|mut g| *g += 1);
        self.sheets.clear();
    }

    /// Number of cached sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// `true` when no sheet is cached.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/composite.rs"]
mod tests;
