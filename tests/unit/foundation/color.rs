use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::opaque(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, Rgba8::new(0, 0, 255, 128));

    assert!(serde_json::from_value::<Rgba8>(json!("#fff")).is_err());
}

#[test]
fn parses_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!({"r": 10, "g": 20, "b": 30})).unwrap();
    assert_eq!(c, Rgba8::opaque(10, 20, 30));

    let c: Rgba8 = serde_json::from_value(json!([10, 20, 30, 40])).unwrap();
    assert_eq!(c, Rgba8::new(10, 20, 30, 40));
}

#[test]
fn hsl_roundtrip_primaries() {
    for c in [
        Rgba8::opaque(255, 0, 0),
        Rgba8::opaque(0, 255, 0),
        Rgba8::opaque(0, 0, 255),
        Rgba8::opaque(255, 255, 255),
        Rgba8::opaque(0, 0, 0),
    ] {
        assert_eq!(hsl_to_rgb(rgb_to_hsl(c), 255), c);
    }
}

#[test]
fn pure_red_hsl_components() {
    let hsl = rgb_to_hsl(Rgba8::opaque(255, 0, 0));
    assert!(hsl.h.abs() < 1e-9);
    assert!((hsl.s - 1.0).abs() < 1e-9);
    assert!((hsl.l - 0.5).abs() < 1e-9);
}
