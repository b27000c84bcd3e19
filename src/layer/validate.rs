use crate::{
    foundation::error::SpriteError,
    layer::{model::PatchLayer, token::LayerToken},
};

/// A layer rejected by validation. The layer was skipped; the rest of the request went ahead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerDiagnostic {
    /// Position of the layer in the caller-supplied list.
    pub index: usize,
    /// Token of the rejected layer.
    pub token: LayerToken,
    /// Rejection reason.
    pub reason: String,
}

impl LayerDiagnostic {
    /// The diagnostic as a [`SpriteError::InvalidLayer`].
    pub fn to_error(&self) -> SpriteError {
        SpriteError::invalid_layer(self.index, self.reason.clone())
    }
}

impl std::fmt::Display for LayerDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer #{} ({}): {}", self.index, self.token, self.reason)
    }
}

/// Check a single layer. Returns the rejection reason on failure.
pub fn validate_layer(layer: &PatchLayer) -> Result<(), String> {
    if !layer.scale.is_finite() || layer.scale <= 0.0 {
        return Err(format!("scale must be finite and > 0, got {}", layer.scale));
    }
    if !layer.opacity.is_finite() || !(0.0..=1.0).contains(&layer.opacity) {
        return Err(format!(
            "opacity must be within 0..=1, got {}",
            layer.opacity
        ));
    }
    if layer.frames == 0 {
        return Err("frames must be >= 1".to_owned());
    }
    if layer.source_area.is_empty() {
        return Err("source area has zero extent".to_owned());
    }
    if layer.destination_area.is_empty() {
        return Err("destination area has zero extent".to_owned());
    }
    if layer.source_area.width < layer.frames {
        return Err(format!(
            "source area width {} is narrower than {} frames",
            layer.source_area.width, layer.frames
        ));
    }
    if layer.frame_duration.ticks() == Some(0) {
        return Err("frame duration must be > 0 ticks".to_owned());
    }
    Ok(())
}

/// Split `layers` into the ones that pass validation (order kept) and one diagnostic per reject.
pub(crate) fn partition_layers(layers: &[PatchLayer]) -> (Vec<PatchLayer>, Vec<LayerDiagnostic>) {
    let mut valid = Vec::with_capacity(layers.len());
    let mut diagnostics = Vec::new();
    for (index, layer) in layers.iter().enumerate() {
        match validate_layer(layer) {
            Ok(()) => valid.push(layer.clone()),
            Err(reason) => {
                tracing::warn!(index, token = %layer.token, %reason, "skipping invalid layer");
                diagnostics.push(LayerDiagnostic {
                    index,
                    token: layer.token,
                    reason,
                });
            }
        }
    }
    (valid, diagnostics)
}

#[cfg(test)]
#[path = "../../tests/unit/layer/validate.rs"]
mod tests;
