use std::path::Path;

use scene_ngin::{
    data_structures::texture_cache::{MISSING_KEY, TextureCache},
    resources::Loader,
};

use crate::common::test_utils::TempAssets;

mod common;

#[test]
fn base_path_prefixes_later_registrations_only() {
    let mut loader = Loader::new(".");
    loader.image("early", "early.png");
    loader.set_path("assets").image("late", "late.png");
    loader.set_path("").image("reset", "reset.png");

    let paths: Vec<&Path> = loader.queued().iter().map(|a| a.path.as_path()).collect();
    assert_eq!(
        paths,
        vec![
            Path::new("early.png"),
            Path::new("assets/late.png"),
            Path::new("reset.png"),
        ]
    );
    assert_eq!(loader.path(), None);
}

#[test]
fn queued_paths_stay_relative_to_the_root() {
    let mut loader = Loader::new("game-data");
    loader.set_path("assets").image("logo", "logo.png");

    assert_eq!(loader.root(), Path::new("game-data"));
    assert_eq!(loader.queued()[0].path, Path::new("assets/logo.png"));
}

#[test]
fn duplicate_keys_are_ignored() {
    let mut loader = Loader::new(".");
    loader.image("logo", "logo.png").image("logo", "other.png");

    assert_eq!(loader.queued().len(), 1);
    assert_eq!(loader.queued()[0].path, Path::new("logo.png"));
}

#[tokio::test]
async fn start_decodes_every_queued_image() {
    let assets = TempAssets::with_game_assets("loader-ok");
    let mut cache = TextureCache::new();
    let mut loader = Loader::new(assets.root());
    loader
        .set_path("assets")
        .image("star", "star.png")
        .image("background", "background.png");

    let report = loader.start(&mut cache).await;

    assert!(report.is_complete());
    assert_eq!(report.loaded.len(), 2);
    assert!(loader.queued().is_empty());
    assert_eq!(cache.keys(), vec!["background", "star"]);
    let star = cache.get("star");
    assert_eq!((star.width, star.height), (32, 32));
    assert_eq!(star.rgba.len(), 32 * 32 * 4);
    assert_eq!(cache.get("background").size(), [64.0, 48.0]);
}

#[tokio::test]
async fn missing_and_corrupt_files_are_reported_not_cached() {
    let assets = TempAssets::new("loader-fail");
    assets.write_png("assets/logo.png", 4, 4);
    assets.write_bytes("assets/broken.png", b"definitely not a png");
    let mut cache = TextureCache::new();
    let mut loader = Loader::new(assets.root());
    loader
        .set_path("assets")
        .image("logo", "logo.png")
        .image("gone", "gone.png")
        .image("broken", "broken.png");

    let report = loader.start(&mut cache).await;

    assert!(!report.is_complete());
    assert_eq!(report.loaded, vec!["logo".to_string()]);
    let failed: Vec<&str> = report.failed.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(failed, vec!["gone", "broken"]);
    assert!(!cache.exists("gone"));
    // unknown keys render with the placeholder
    assert_eq!(cache.get("gone"), cache.get(MISSING_KEY));
}

#[tokio::test]
async fn cached_keys_are_skipped() {
    let assets = TempAssets::new("loader-skip");
    assets.write_png("a.png", 2, 2);
    let mut cache = TextureCache::new();

    let mut loader = Loader::new(assets.root());
    loader.image("a", "a.png");
    assert_eq!(loader.start(&mut cache).await.loaded, vec!["a".to_string()]);

    loader.image("a", "a.png");
    let report = loader.start(&mut cache).await;
    assert!(report.loaded.is_empty());
    assert_eq!(report.skipped, vec!["a".to_string()]);
}
