use std::{
    any::Any,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use scene_ngin::{
    Emitter,
    data_structures::display::ImageId,
    scenes::Game,
};

/// What a [`RecordingEmitter`] saw for one `emit` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Emitted {
    pub event: String,
    /// `Some((background, logo))` when the payload was a `Game`.
    pub game: Option<(Option<ImageId>, Option<ImageId>)>,
}

/// Stand-in for the process-wide bus that records every publish.
#[derive(Default)]
pub struct RecordingEmitter {
    emitted: Mutex<Vec<Emitted>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<Emitted> {
        self.emitted.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.emitted
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event == event)
            .count()
    }
}

impl Emitter for RecordingEmitter {
    fn emit(&self, event: &str, payload: &dyn Any) -> bool {
        let game = payload
            .downcast_ref::<Game>()
            .map(|game| (game.background(), game.logo()));
        self.emitted.lock().unwrap().push(Emitted {
            event: event.to_string(),
            game,
        });
        true
    }
}

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A scratch asset root under the system temp dir, removed on drop.
pub struct TempAssets {
    root: PathBuf,
}

impl TempAssets {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "scene-ngin-{}-{}-{}",
            name,
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// The three images the `Game` scene preloads, under `assets/`.
    pub fn with_game_assets(name: &str) -> Self {
        let assets = Self::new(name);
        assets.write_png("assets/star.png", 32, 32);
        assets.write_png("assets/background.png", 64, 48);
        assets.write_png("assets/logo.png", 40, 20);
        assets
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write_png(&self, relative: &str, width: u32, height: u32) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
        img.save(&path).unwrap();
    }

    pub fn write_bytes(&self, relative: &str, bytes: &[u8]) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, bytes).unwrap();
    }
}

impl Drop for TempAssets {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
