use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

use anyhow::Context;

use crate::{
    assets::decode,
    foundation::{
        core::PixelBuffer,
        error::{SpriteError, SpriteResult},
        sync,
    },
};

/// Backing store the engine pulls base textures from.
///
/// Implementations must return [`SpriteError::AssetNotFound`] for names that do not resolve and
/// must be safe to call from several composition requests at once.
pub trait AssetSource: Send + Sync {
    /// Load the full pixel buffer for `name`.
    fn load(&self, name: &str) -> SpriteResult<PixelBuffer>;
}

/// In-memory asset source. The host pushes already-decoded textures into it.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    textures: RwLock<HashMap<String, PixelBuffer>>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a texture. Returns the previous buffer, if any.
    ///
    /// Replacing a texture does not invalidate engine caches; the host reports the change
    /// through [`SpriteEngine::invalidate`](crate::SpriteEngine::invalidate).
    pub fn insert(&self, name: impl Into<String>, pixels: PixelBuffer) -> Option<PixelBuffer> {
        sync::write(&self.textures).insert(name.into(), pixels)
    }

    /// Remove a texture.
    pub fn remove(&self, name: &str) -> Option<PixelBuffer> {
        sync::write(&self.textures).remove(name)
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, name: &str) -> SpriteResult<PixelBuffer> {
        sync::read(&self.textures)
            .get(name)
            .cloned()
            .ok_or_else(|| SpriteError::asset_not_found(name))
    }
}

/// Filesystem asset source rooted at a directory. Names are relative image paths.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Source reading images below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> SpriteResult<PathBuf> {
        let norm = normalize_rel_path(name)?;
        Ok(self.root.join(norm))
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, name: &str) -> SpriteResult<PixelBuffer> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(SpriteError::asset_not_found(name));
        }
        let bytes =
            std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
        decode::decode_image(&bytes)
    }
}

pub(crate) fn normalize_rel_path(source: &str) -> SpriteResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SpriteError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(SpriteError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SpriteError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SpriteError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
