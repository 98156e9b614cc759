//! The main game screen: a full-screen background with the logo on top.

use crate::{
    data_structures::display::ImageId,
    events::CURRENT_SCENE_READY,
    resources::Loader,
    scene::{Scene, SceneContext},
};

pub const GAME_KEY: &str = "Game";

/// Depth that keeps the logo above everything else the scene adds.
pub const LOGO_DEPTH: f32 = 100.0;

#[derive(Debug, Default)]
pub struct Game {
    background: Option<ImageId>,
    logo: Option<ImageId>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set once `create` has run.
    pub fn background(&self) -> Option<ImageId> {
        self.background
    }

    /// Set once `create` has run.
    pub fn logo(&self) -> Option<ImageId> {
        self.logo
    }
}

impl Scene for Game {
    fn key(&self) -> &str {
        GAME_KEY
    }

    fn preload(&mut self, load: &mut Loader) {
        load.set_path("assets");

        load.image("star", "star.png");
        load.image("background", "background.png");
        load.image("logo", "logo.png");
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) {
        self.background = Some(ctx.add.image(512.0, 384.0, "background").id());
        self.logo = Some(ctx.add.image(512.0, 350.0, "logo").set_depth(LOGO_DEPTH).id());

        ctx.events.emit(CURRENT_SCENE_READY, &*self);
    }
}
