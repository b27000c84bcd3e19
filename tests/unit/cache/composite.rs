use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::foundation::{
    core::{Offset, PixelBuffer, Rgba8},
    error::SpriteError,
};

fn sheet(color: Rgba8) -> SpriteSheet {
    SpriteSheet {
        pixels: PixelBuffer::filled(2, 2, color),
        scale: 1.0,
        origin: Offset::default(),
        frame_width: 2,
        frames: 1,
        tick_duration: None,
    }
}

fn key(base: &str, tokens: &[u128]) -> CompositeKey {
    CompositeKey::new(
        base,
        Rect::new(0, 0, 2, 2),
        tokens.iter().map(|t| LayerToken::from_raw(*t)).collect(),
    )
}

#[test]
fn miss_then_hit_returns_same_sheet() {
    let cache = CompositeCache::new();
    let runs = AtomicUsize::new(0);
    let compute = || {
        runs.fetch_add(1, Ordering::SeqCst);
        Ok(sheet(Rgba8::WHITE))
    };

    let (a, first) = cache.get_or_compose(&key("base", &[1, 2]), compute).unwrap();
    let (b, second) = cache.get_or_compose(&key("base", &[1, 2]), compute).unwrap();
    assert_eq!(first, CacheOutcome::Installed);
    assert_eq!(second, CacheOutcome::Hit);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn layer_order_is_part_of_the_key() {
    let cache = CompositeCache::new();
    cache
        .get_or_compose(&key("base", &[1, 2]), || Ok(sheet(Rgba8::WHITE)))
        .unwrap();
    let (_, outcome) = cache
        .get_or_compose(&key("base", &[2, 1]), || Ok(sheet(Rgba8::WHITE)))
        .unwrap();
    assert!(!outcome.is_hit());
    assert_eq!(cache.len(), 2);
}

#[test]
fn errors_are_not_cached() {
    let cache = CompositeCache::new();
    let err = cache
        .get_or_compose(&key("base", &[]), || {
            Err(SpriteError::composition("boom"))
        })
        .unwrap_err();
    assert!(matches!(err, SpriteError::CompositionFailure(_)));
    assert!(cache.is_empty());

    let (_, outcome) = cache
        .get_or_compose(&key("base", &[]), || Ok(sheet(Rgba8::WHITE)))
        .unwrap();
    assert_eq!(outcome, CacheOutcome::Installed);
}

#[test]
fn invalidate_removes_only_matching_base() {
    let cache = CompositeCache::new();
    for t in 0..20u128 {
        cache
            .get_or_compose(&key("a", &[t]), || Ok(sheet(Rgba8::WHITE)))
            .unwrap();
    }
    cache
        .get_or_compose(&key("b", &[0]), || Ok(sheet(Rgba8::WHITE)))
        .unwrap();

    assert_eq!(cache.invalidate("a"), 20);
    assert_eq!(cache.invalidate("a"), 0);
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&key("b", &[0])).is_some());

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn first_writer_wins_under_contention() {
    let cache = CompositeCache::new();
    let k = key("base", &[9]);
    let results: Vec<(Arc<SpriteSheet>, CacheOutcome)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let cache = &cache;
                let k = &k;
                s.spawn(move || {
                    cache
                        .get_or_compose(k, || Ok(sheet(Rgba8::opaque(i, 0, 0))))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let installed = cache.get(&k).unwrap();
    for (r, _) in &results {
        assert!(Arc::ptr_eq(r, &installed));
    }
    let installs = results
        .iter()
        .filter(|(_, o)| *o == CacheOutcome::Installed)
        .count();
    assert_eq!(installs, 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn invalidation_during_composition_is_not_installed() {
    let cache = CompositeCache::new();
    let k = key("base", &[3]);

    let (stale, outcome) = cache
        .get_or_compose(&k, || {
            cache.invalidate("base");
            Ok(sheet(Rgba8::opaque(255, 0, 0)))
        })
        .unwrap();
    assert_eq!(outcome, CacheOutcome::Stale);
    assert_eq!(stale.pixels.get(0, 0), Some(Rgba8::opaque(255, 0, 0)));
    assert!(cache.get(&k).is_none());

    let (fresh, outcome) = cache
        .get_or_compose(&k, || Ok(sheet(Rgba8::opaque(0, 0, 255))))
        .unwrap();
    assert_eq!(outcome, CacheOutcome::Installed);
    assert_eq!(fresh.pixels.get(0, 0), Some(Rgba8::opaque(0, 0, 255)));
}

#[test]
fn other_bases_still_install_during_invalidation() {
    let cache = CompositeCache::new();
    let (_, outcome) = cache
        .get_or_compose(&key("a", &[]), || {
            cache.invalidate("b");
            Ok(sheet(Rgba8::WHITE))
        })
        .unwrap();
    assert_eq!(outcome, CacheOutcome::Installed);
}

#[test]
fn clear_during_composition_is_not_installed() {
    let cache = CompositeCache::new();
    let (_, outcome) = cache
        .get_or_compose(&key("base", &[]), || {
            cache.clear();
            Ok(sheet(Rgba8::WHITE))
        })
        .unwrap();
    assert_eq!(outcome, CacheOutcome::Stale);
    assert!(cache.is_empty());
}
