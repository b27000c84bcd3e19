use std::io::Cursor;

use super::*;
use crate::foundation::core::Rgba8;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "spritepatch_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
}

#[test]
fn memory_source_unknown_name_is_asset_not_found() {
    let src = MemoryAssetSource::new();
    let err = src.load("missing").unwrap_err();
    assert!(matches!(err, SpriteError::AssetNotFound { ref name } if name == "missing"));
}

#[test]
fn memory_source_insert_replace_remove() {
    let src = MemoryAssetSource::new();
    let red = PixelBuffer::filled(1, 1, Rgba8::opaque(255, 0, 0));
    let blue = PixelBuffer::filled(1, 1, Rgba8::opaque(0, 0, 255));
    assert!(src.insert("a", red.clone()).is_none());
    assert_eq!(src.insert("a", blue.clone()), Some(red));
    assert_eq!(src.load("a").unwrap(), blue);
    assert!(src.remove("a").is_some());
    assert!(src.load("a").is_err());
}

#[test]
fn fs_source_decodes_png_and_reports_missing() {
    let tmp = temp_dir("fs_source");
    std::fs::create_dir_all(tmp.join("sprites")).unwrap();

    let img = image::RgbaImage::from_raw(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 0]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(tmp.join("sprites").join("hat.png"), &buf).unwrap();

    let src = FsAssetSource::new(&tmp);
    let loaded = src.load("sprites\\hat.png").unwrap();
    assert_eq!((loaded.width, loaded.height), (2, 1));
    assert_eq!(loaded.get(0, 0), Some(Rgba8::new(1, 2, 3, 255)));
    assert_eq!(loaded.get(1, 0), Some(Rgba8::new(4, 5, 6, 0)));

    assert!(matches!(
        src.load("sprites/nope.png"),
        Err(SpriteError::AssetNotFound { .. })
    ));
    assert!(matches!(
        src.load("../escape.png"),
        Err(SpriteError::Validation(_))
    ));

    std::fs::remove_dir_all(&tmp).ok();
}
