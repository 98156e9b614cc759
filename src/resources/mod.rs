use std::path::{Path, PathBuf};

use crate::data_structures::texture_cache::TextureCache;

/**
 * This module contains all logic for loading assets from external files.
 *
 * Scenes queue assets on a [`Loader`] in their preload step; the scene manager
 * then runs [`Loader::start`] which reads and decodes everything concurrently
 * and fills the [`TextureCache`].
 */
pub mod texture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Image,
}

/// One queued asset. `path` is relative to the loader's root directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRef {
    pub key: String,
    pub kind: AssetKind,
    pub path: PathBuf,
}

/// Outcome of one [`Loader::start`] run.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    /// Keys that were already in the cache and not loaded again.
    pub skipped: Vec<String>,
    pub failed: Vec<(String, anyhow::Error)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct Loader {
    root: PathBuf,
    path: Option<PathBuf>,
    queue: Vec<AssetRef>,
}

impl Loader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            path: None,
            queue: Vec::new(),
        }
    }

    /// Prefix for every file registered after this call. An empty path resets it.
    pub fn set_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = path.as_ref();
        self.path = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path.to_path_buf())
        };
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Queue an image file under `key`.
    pub fn image(&mut self, key: &str, file: impl AsRef<Path>) -> &mut Self {
        if self.queue.iter().any(|asset| asset.key == key) {
            log::warn!("asset key {key} is already queued, ignoring");
            return self;
        }
        let path = match &self.path {
            Some(base) => base.join(file),
            None => file.as_ref().to_path_buf(),
        };
        log::debug!("queued image {key} -> {}", path.display());
        self.queue.push(AssetRef {
            key: key.to_string(),
            kind: AssetKind::Image,
            path,
        });
        self
    }

    /// Assets queued so far, in registration order.
    pub fn queued(&self) -> &[AssetRef] {
        &self.queue
    }

    /// Load every queued asset into `cache`, emptying the queue.
    pub async fn start(&mut self, cache: &mut TextureCache) -> LoadReport {
        let mut report = LoadReport::default();
        let mut pending = Vec::new();
        for asset in self.queue.drain(..) {
            if cache.exists(&asset.key) {
                log::debug!("texture {} is cached, skipping", asset.key);
                report.skipped.push(asset.key);
            } else {
                pending.push(asset);
            }
        }

        let root = &self.root;
        let loads = pending.iter().map(|asset| async move {
            let full_path = root.join(&asset.path);
            match asset.kind {
                AssetKind::Image => texture::load_image(&full_path).await,
            }
        });
        let results = futures::future::join_all(loads).await;

        for (asset, result) in pending.into_iter().zip(results) {
            match result.and_then(|image| cache.add(&asset.key, image)) {
                Ok(()) => {
                    log::info!("loaded {} ({})", asset.key, asset.path.display());
                    report.loaded.push(asset.key);
                }
                Err(e) => {
                    log::warn!("failed to load {}: {:#}", asset.key, e);
                    report.failed.push((asset.key, e));
                }
            }
        }
        report
    }
}
