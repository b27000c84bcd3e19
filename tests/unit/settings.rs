use super::*;

#[test]
fn defaults_fill_missing_fields() {
    let s = EngineSettings::from_json_str("{}").unwrap();
    assert_eq!(s, EngineSettings::default());
    assert!(s.parallel);
    assert_eq!(s.threads, None);
    assert_eq!(s.max_canvas_pixels, DEFAULT_MAX_CANVAS_PIXELS);

    let s = EngineSettings::from_json_str(r#"{"threads": 2, "parallel": false}"#).unwrap();
    assert_eq!(s.threads, Some(2));
    assert!(!s.parallel);
}

#[test]
fn rejects_zero_threads_and_zero_limit() {
    assert!(matches!(
        EngineSettings::from_json_str(r#"{"threads": 0}"#),
        Err(SpriteError::Validation(_))
    ));
    let s = EngineSettings {
        max_canvas_pixels: 0,
        ..EngineSettings::default()
    };
    assert!(s.validate().is_err());
}

#[test]
fn rejects_unknown_fields() {
    assert!(matches!(
        EngineSettings::from_json_str(r#"{"chunk_size": 4}"#),
        Err(SpriteError::Other(_))
    ));
}

#[test]
fn reads_from_file() {
    let dir = std::env::temp_dir().join(format!("spritepatch_settings_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    std::fs::write(&path, r#"{"max_canvas_pixels": 1024}"#).unwrap();

    let s = EngineSettings::from_json_file(&path).unwrap();
    assert_eq!(s.max_canvas_pixels, 1024);

    assert!(EngineSettings::from_json_file(&dir.join("missing.json")).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
