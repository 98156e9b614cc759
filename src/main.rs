use std::{path::Path, sync::Arc};

use scene_ngin::{
    CURRENT_SCENE_READY, EventBus, GameConfig, Scene,
    flow::run,
    scenes::Game,
};

const CONFIG_FILE: &str = "game.toml";

fn main() -> anyhow::Result<()> {
    let config = if Path::new(CONFIG_FILE).exists() {
        GameConfig::load(CONFIG_FILE)?
    } else {
        GameConfig::default()
    };

    // Created once for the whole process and handed to the engine.
    let events = Arc::new(EventBus::new());
    events.on(CURRENT_SCENE_READY, |payload| {
        match payload.downcast_ref::<Game>() {
            Some(game) => log::info!("scene {} is ready", game.key()),
            None => log::info!("a scene is ready"),
        }
    });

    run(config, events, vec![Box::new(Game::new())])
}
