use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SpriteError::asset_not_found("hat.png")
            .to_string()
            .contains("asset not found: 'hat.png'")
    );
    assert!(
        SpriteError::invalid_layer(2, "scale must be > 0")
            .to_string()
            .contains("invalid layer #2")
    );
    assert!(
        SpriteError::composition("x")
            .to_string()
            .contains("composition failure:")
    );
    assert!(
        SpriteError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SpriteError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
