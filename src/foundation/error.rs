/// Convenience result type used across spritepatch.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    /// A base texture name did not resolve in the asset source.
    #[error("asset not found: '{name}'")]
    AssetNotFound {
        /// Name that failed to resolve.
        name: String,
    },

    /// A patch layer failed validation and was excluded from composition.
    #[error("invalid layer #{index}: {reason}")]
    InvalidLayer {
        /// Position of the layer in the caller-supplied list.
        index: usize,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// Pixel blending could not be carried out (allocation limits, worker pool failure).
    #[error("composition failure: {0}")]
    CompositionFailure(String),

    /// Invalid engine settings or call arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpriteError {
    /// Build a [`SpriteError::AssetNotFound`] value.
    pub fn asset_not_found(name: impl Into<String>) -> Self {
        Self::AssetNotFound { name: name.into() }
    }

    /// Build a [`SpriteError::InvalidLayer`] value.
    pub fn invalid_layer(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidLayer {
            index,
            reason: reason.into(),
        }
    }

    /// Build a [`SpriteError::CompositionFailure`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::CompositionFailure(msg.into())
    }

    /// Build a [`SpriteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
