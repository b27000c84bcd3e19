use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::{
    assets::store::AssetSource,
    foundation::{
        core::{PixelBuffer, Rect},
        error::SpriteResult,
        sync,
    },
};

#[derive(Debug, Default)]
struct BaseTexture {
    pixels: Option<PixelBuffer>,
    regions: HashMap<Rect, PixelBuffer>,
    loads: u64,
}

/// Read-only accessor for base texture pixels with lazily populated caches.
///
/// Each name owns its own lock. Loads for a name hold that lock for writing, so an
/// [`invalidate`](Self::invalidate) of the same name waits for an in-flight load to finish and
/// then clears it; loads of other names proceed independently. Names whose first load fails
/// are not remembered.
pub struct PixelSource {
    source: Arc<dyn AssetSource>,
    entries: RwLock<HashMap<String, Arc<RwLock<BaseTexture>>>>,
}

impl PixelSource {
    /// Wrap an asset source.
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn entry(&self, name: &str) -> Arc<RwLock<BaseTexture>> {
        if let Some(entry) = sync::read(&self.entries).get(name) {
            return Arc::clone(entry);
        }
        Arc::clone(
            sync::write(&self.entries)
                .entry(name.to_owned())
                .or_default(),
        )
    }

    /// Full pixel buffer for `name`, loading it from the asset source on first use.
    pub fn get_pixels(&self, name: &str) -> SpriteResult<PixelBuffer> {
        let entry = self.entry(name);
        if let Some(pixels) = &sync::read(&entry).pixels {
            return Ok(pixels.clone());
        }

        let mut tex = sync::write(&entry);
        if let Some(pixels) = &tex.pixels {
            return Ok(pixels.clone());
        }
        let loaded = match self.source.load(name) {
            Ok(loaded) => loaded,
            Err(err) => {
                let unused = tex.loads == 0 && tex.regions.is_empty();
                drop(tex);
                if unused {
                    self.forget(name, &entry);
                }
                return Err(err);
            }
        };
        tex.loads += 1;
        tex.pixels = Some(loaded.clone());
        tracing::debug!(
            name,
            width = loaded.width,
            height = loaded.height,
            "loaded base texture"
        );
        Ok(loaded)
    }

    fn forget(&self, name: &str, entry: &Arc<RwLock<BaseTexture>>) {
        let mut entries = sync::write(&self.entries);
        if entries.get(name).is_some_and(|e| Arc::ptr_eq(e, entry)) {
            entries.remove(name);
        }
    }

    /// Sub-rectangle of `name`. Areas outside the texture read as transparent.
    ///
    /// Extracted regions are cached per `(name, rect)` until the name is invalidated.
    pub fn get_region(&self, name: &str, rect: Rect) -> SpriteResult<PixelBuffer> {
        let entry = self.entry(name);
        if let Some(region) = sync::read(&entry).regions.get(&rect) {
            return Ok(region.clone());
        }

        let pixels = self.get_pixels(name)?;
        let region = pixels.extract(rect)?;

        let mut tex = sync::write(&entry);
        // Only cache against the buffer the region was cut from; an invalidation may have
        // cleared or replaced it in between.
        let current = tex
            .pixels
            .as_ref()
            .is_some_and(|p| p.shares_storage(&pixels));
        if current {
            return Ok(tex.regions.entry(rect).or_insert(region).clone());
        }
        Ok(region)
    }

    /// Drop cached pixels and regions for `name`. Returns `true` if anything was cached.
    pub fn invalidate(&self, name: &str) -> bool {
        let Some(entry) = sync::read(&self.entries).get(name).cloned() else {
            return false;
        };
        let mut tex = sync::write(&entry);
        let had = tex.pixels.is_some() || !tex.regions.is_empty();
        tex.pixels = None;
        tex.regions.clear();
        had
    }

    /// Drop every cached buffer.
    pub fn clear(&self) {
        let entries: Vec<_> = sync::read(&self.entries).values().cloned().collect();
        for entry in entries {
            let mut tex = sync::write(&entry);
            tex.pixels = None;
            tex.regions.clear();
        }
    }

    /// Number of times `name` was pulled from the asset source.
    pub fn load_count(&self, name: &str) -> u64 {
        sync::read(&self.entries)
            .get(name)
            .map(|e| sync::read(e).loads)
            .unwrap_or(0)
    }

    /// Number of cached regions for `name`.
    pub fn cached_regions(&self, name: &str) -> usize {
        sync::read(&self.entries)
            .get(name)
            .map(|e| sync::read(e).regions.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for PixelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelSource")
            .field("entries", &sync::read(&self.entries).len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pixel_source.rs"]
mod tests;
