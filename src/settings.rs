use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{SpriteError, SpriteResult};

/// Default canvas limit: 64 Mi pixels (256 MiB of RGBA8).
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Distribute output rows across rayon workers.
    pub parallel: bool,
    /// Size of a dedicated worker pool. `None` uses the global rayon pool.
    pub threads: Option<usize>,
    /// Upper bound on `strip_width * height`; larger canvases fail with a composition error.
    pub max_canvas_pixels: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
        }
    }
}

impl EngineSettings {
    /// Parse settings from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> SpriteResult<Self> {
        let settings: Self = serde_json::from_str(s).context("parse engine settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn from_json_file(path: &Path) -> SpriteResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> SpriteResult<()> {
        if self.threads == Some(0) {
            return Err(SpriteError::validation(
                "settings 'threads' must be >= 1 when set",
            ));
        }
        if self.max_canvas_pixels == 0 {
            return Err(SpriteError::validation(
                "settings 'max_canvas_pixels' must be >= 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
