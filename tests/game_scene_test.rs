use std::path::Path;

use scene_ngin::{
    CURRENT_SCENE_READY, GameConfig, Scene, SceneContext,
    data_structures::{display::DisplayList, texture_cache::TextureCache},
    resources::{AssetKind, Loader},
    scenes::{Game, game::GAME_KEY},
};

use crate::common::test_utils::RecordingEmitter;

mod common;

fn create(game: &mut Game, display: &mut DisplayList, emitter: &RecordingEmitter) {
    let textures = TextureCache::new();
    let config = GameConfig::default();
    let mut ctx = SceneContext {
        add: display,
        textures: &textures,
        events: emitter,
        config: &config,
    };
    game.create(&mut ctx);
}

#[test]
fn game_is_registered_as_game() {
    assert_eq!(Game::new().key(), GAME_KEY);
    assert_eq!(GAME_KEY, "Game");
}

#[test]
fn preload_queues_three_images_under_assets() {
    let mut game = Game::new();
    let mut loader = Loader::new(".");
    game.preload(&mut loader);

    let queued: Vec<(&str, &Path)> = loader
        .queued()
        .iter()
        .map(|asset| (asset.key.as_str(), asset.path.as_path()))
        .collect();
    assert_eq!(
        queued,
        vec![
            ("star", Path::new("assets/star.png")),
            ("background", Path::new("assets/background.png")),
            ("logo", Path::new("assets/logo.png")),
        ]
    );
    assert!(loader.queued().iter().all(|a| a.kind == AssetKind::Image));
    assert_eq!(loader.path(), Some(Path::new("assets")));
}

#[test]
fn create_places_background_and_logo() {
    let mut game = Game::new();
    let mut display = DisplayList::new();
    let emitter = RecordingEmitter::new();
    create(&mut game, &mut display, &emitter);

    assert_eq!(display.len(), 2);
    let images: Vec<_> = display.iter().collect();

    assert_eq!(images[0].texture, "background");
    assert_eq!((images[0].position.x, images[0].position.y), (512.0, 384.0));
    assert_eq!(images[0].depth, 0.0);

    assert_eq!(images[1].texture, "logo");
    assert_eq!((images[1].position.x, images[1].position.y), (512.0, 350.0));
    assert_eq!(images[1].depth, 100.0);

    assert_eq!(game.background(), Some(images[0].id()));
    assert_eq!(game.logo(), Some(images[1].id()));
}

#[test]
fn logo_is_drawn_over_background() {
    let mut game = Game::new();
    let mut display = DisplayList::new();
    create(&mut game, &mut display, &RecordingEmitter::new());

    let order: Vec<&str> = display
        .depth_sorted()
        .into_iter()
        .map(|image| image.texture.as_str())
        .collect();
    assert_eq!(order, vec!["background", "logo"]);
}

#[test]
fn create_announces_readiness_once_after_placing_images() {
    let mut game = Game::new();
    let mut display = DisplayList::new();
    let emitter = RecordingEmitter::new();
    create(&mut game, &mut display, &emitter);

    let emitted = emitter.emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].event, CURRENT_SCENE_READY);
    // The payload is the scene itself, with both images already placed.
    let (background, logo) = emitted[0].game.expect("payload should be the Game scene");
    assert!(background.is_some());
    assert!(logo.is_some());
}
