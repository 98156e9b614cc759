//! The scene abstraction.
//!
//! A [`Scene`] is one screen of a game. The engine drives it through a fixed
//! lifecycle:
//!
//! 1. `preload()` queues the assets the scene needs on a [`Loader`]
//! 2. the engine loads them into the texture cache
//! 3. `create()` builds display objects and may publish events
//! 4. `update()` runs every frame while the scene is active
//!
//! Scenes own no engine resources. Everything they touch is lent to them
//! through [`SceneContext`] for the duration of one call.

use std::{any::Any, fmt::Debug, time::Duration};

use crate::{
    config::GameConfig,
    data_structures::{display::DisplayList, texture_cache::TextureCache},
    events::Emitter,
    resources::Loader,
};

/// Where a scene is in its lifecycle. Transitions are made by the engine only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneStatus {
    /// Registered but never started.
    Pending,
    /// `preload` ran and assets are being loaded.
    Loading,
    /// `create` is running.
    Creating,
    /// Active and updated every frame.
    Running,
    /// Stopped or replaced; its display list has been released.
    Destroyed,
}

/// Engine resources lent to a scene during `create` and `update`.
pub struct SceneContext<'a> {
    /// The scene's display list; `ctx.add.image(x, y, key)` places an image.
    pub add: &'a mut DisplayList,
    pub textures: &'a TextureCache,
    pub events: &'a dyn Emitter,
    pub config: &'a GameConfig,
}

/// Trait for implementing a scene.
///
/// Implementors must be `'static` so that they can be handed to event
/// listeners as a `&dyn Any` payload.
pub trait Scene: Any {
    /// Unique name the scene is registered and started under.
    fn key(&self) -> &str;

    /// Queue assets. Called once before `create`; nothing is loaded yet.
    fn preload(&mut self, load: &mut Loader);

    /// Build display objects. Every asset queued in `preload` has been
    /// processed when this runs.
    fn create(&mut self, ctx: &mut SceneContext<'_>);

    /// Per-frame hook, called while the scene is running.
    fn update(&mut self, _ctx: &mut SceneContext<'_>, _dt: Duration) {}
}

impl Debug for dyn Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Scene").field(&self.key()).finish()
    }
}
