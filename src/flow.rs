//! Scene lifecycle and application event loop.
//!
//! This module drives scenes through their lifecycle. [`SceneManager`] is the
//! headless part: it registers scenes, runs their preload/load/create steps
//! and keeps the display list of the active scene. [`run`] wraps a manager in
//! a winit event loop and renders the active scene every frame.
//!
//! # Lifecycle Flow
//!
//! Starting a scene follows this pattern:
//! 1. Stop the running scene, if any, and release its display list
//! 2. Call `preload` with a fresh [`Loader`]
//! 3. Load every queued asset into the texture cache
//! 4. Call `create` with the scene's display list and the event bus
//! 5. Mark the scene running; `update` is called every frame from now on

use std::{future::Future, sync::Arc};

use anyhow::{anyhow, bail};
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::GameConfig,
    context::Context,
    data_structures::{display::DisplayList, texture_cache::TextureCache},
    events::Emitter,
    render::SpriteBatch,
    resources::Loader,
    scene::{Scene, SceneContext, SceneStatus},
};

struct SceneEntry {
    scene: Box<dyn Scene>,
    status: SceneStatus,
}

/// Owns the registered scenes, the texture cache and the display list of the
/// active scene. Only one scene runs at a time.
pub struct SceneManager {
    config: GameConfig,
    events: Arc<dyn Emitter>,
    async_runtime: tokio::runtime::Runtime,
    textures: TextureCache,
    display: DisplayList,
    scenes: Vec<SceneEntry>,
    active: Option<usize>,
}

impl std::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scenes: Vec<(&str, SceneStatus)> = self
            .scenes
            .iter()
            .map(|entry| (entry.scene.key(), entry.status))
            .collect();
        f.debug_struct("SceneManager")
            .field("scenes", &scenes)
            .field("active", &self.active_key())
            .field("display", &self.display.len())
            .finish()
    }
}

impl SceneManager {
    pub fn new(config: GameConfig, events: Arc<dyn Emitter>) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            events,
            async_runtime,
            textures: TextureCache::new(),
            display: DisplayList::new(),
            scenes: Vec::new(),
            active: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Register a scene. It stays `Pending` until started.
    pub fn add(&mut self, scene: Box<dyn Scene>) -> anyhow::Result<()> {
        let key = scene.key();
        if self.index_of(key).is_some() {
            bail!("a scene with key {key:?} is already registered");
        }
        log::debug!("registered scene {key}");
        self.scenes.push(SceneEntry {
            scene,
            status: SceneStatus::Pending,
        });
        Ok(())
    }

    /// Run the full preload -> load -> create sequence for `key`, replacing
    /// the active scene.
    pub fn start(&mut self, key: &str) -> anyhow::Result<()> {
        let idx = self
            .index_of(key)
            .ok_or_else(|| anyhow!("no scene registered under {key:?}"))?;
        self.stop();

        let entry = &mut self.scenes[idx];
        entry.status = SceneStatus::Loading;
        let mut loader = Loader::new(self.config.asset_root.clone());
        entry.scene.preload(&mut loader);
        log::info!("{key}: loading {} asset(s)", loader.queued().len());
        let report = self.async_runtime.block_on(loader.start(&mut self.textures));

        if !report.is_complete() {
            if self.config.strict_assets {
                entry.status = SceneStatus::Destroyed;
                let failed: Vec<String> = report
                    .failed
                    .iter()
                    .map(|(asset, e)| format!("{asset} ({e:#})"))
                    .collect();
                bail!("scene {key:?} could not load: {}", failed.join(", "));
            }
            log::warn!(
                "{key}: {} asset(s) failed to load and will render as missing",
                report.failed.len()
            );
        }

        entry.status = SceneStatus::Creating;
        let mut ctx = SceneContext {
            add: &mut self.display,
            textures: &self.textures,
            events: self.events.as_ref(),
            config: &self.config,
        };
        entry.scene.create(&mut ctx);
        entry.status = SceneStatus::Running;
        self.active = Some(idx);
        log::info!("{key}: running with {} display object(s)", self.display.len());
        Ok(())
    }

    /// Stop the active scene and release its display list.
    pub fn stop(&mut self) {
        if let Some(idx) = self.active.take() {
            let entry = &mut self.scenes[idx];
            log::info!("{}: shutting down", entry.scene.key());
            entry.status = SceneStatus::Destroyed;
            self.display.clear();
        }
    }

    pub fn update(&mut self, dt: Duration) {
        if let Some(idx) = self.active {
            let mut ctx = SceneContext {
                add: &mut self.display,
                textures: &self.textures,
                events: self.events.as_ref(),
                config: &self.config,
            };
            self.scenes[idx].scene.update(&mut ctx, dt);
        }
    }

    pub fn status(&self, key: &str) -> Option<SceneStatus> {
        self.index_of(key).map(|idx| self.scenes[idx].status)
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active.map(|idx| self.scenes[idx].scene.key())
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.display
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub(crate) fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.async_runtime.block_on(fut)
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.scenes.iter().position(|entry| entry.scene.key() == key)
    }
}

struct App {
    manager: SceneManager,
    first_scene: String,
    ctx: Option<Context>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(ctx) = &mut self.ctx else {
            return;
        };
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();
        self.manager.update(dt);

        let batch =
            SpriteBatch::from_display_list(self.manager.display_list(), self.manager.textures());
        ctx.upload_textures(&batch, self.manager.textures());
        match ctx.draw(&batch) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = ctx.window.inner_size();
                ctx.resize(size.width, size.height);
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
        ctx.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }
        let config = self.manager.config().clone();
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow!("could not create a window: {e}")),
        };

        let ctx = match self.manager.block_on(Context::new(window, &config)) {
            Ok(ctx) => ctx,
            Err(e) => return self.fail(event_loop, e),
        };
        let first_scene = self.first_scene.clone();
        if let Err(e) = self.manager.start(&first_scene) {
            return self.fail(event_loop, e);
        }
        ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.ctx = Some(ctx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.manager.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(ctx) = &mut self.ctx {
                    ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Open a window and run `scenes`, starting with the first one.
///
/// `events` is the process-wide bus; the caller keeps its own handle to
/// subscribe before the loop starts.
pub fn run(
    config: GameConfig,
    events: Arc<dyn Emitter>,
    scenes: Vec<Box<dyn Scene>>,
) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };
    config.validate()?;

    let first_scene = scenes
        .first()
        .map(|scene| scene.key().to_string())
        .ok_or_else(|| anyhow!("at least one scene is required"))?;
    let mut manager = SceneManager::new(config, events)?;
    for scene in scenes {
        manager.add(scene)?;
    }

    let event_loop = EventLoop::new()?;
    let mut app = App {
        manager,
        first_scene,
        ctx: None,
        last_time: Instant::now(),
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
