//! Decoded images keyed by name.
//!
//! The loader fills the [`TextureCache`] during a scene's preload phase and
//! display objects refer to entries by key. Unknown keys resolve to the
//! built-in `__MISSING` placeholder so a failed load shows up on screen
//! instead of taking the scene down.

use std::collections::HashMap;

use anyhow::bail;
use image::{DynamicImage, GenericImageView};

pub const DEFAULT_KEY: &str = "__DEFAULT";
pub const MISSING_KEY: &str = "__MISSING";

const PLACEHOLDER_SIZE: u32 = 32;

/// CPU side RGBA8 pixels of a loaded image.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SourceImage {
    pub fn from_image(img: &DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba: img.to_rgba8().into_raw(),
        }
    }

    /// A `width` x `height` image filled with one colour.
    pub fn solid(width: u32, height: u32, colour: [u8; 4]) -> Self {
        let rgba = colour
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

#[derive(Debug)]
pub struct TextureCache {
    entries: HashMap<String, SourceImage>,
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCache {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            DEFAULT_KEY.to_string(),
            SourceImage::solid(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, [0, 0, 0, 0]),
        );
        entries.insert(
            MISSING_KEY.to_string(),
            SourceImage::solid(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, [0, 255, 0, 255]),
        );
        Self { entries }
    }

    /// Insert `image` under `key`. Existing keys are kept and an error is returned.
    pub fn add(&mut self, key: &str, image: SourceImage) -> anyhow::Result<()> {
        if self.entries.contains_key(key) {
            bail!("texture key {key:?} is already in use");
        }
        self.entries.insert(key.to_string(), image);
        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up `key`, falling back to the `__MISSING` placeholder.
    pub fn get(&self, key: &str) -> &SourceImage {
        self.entries
            .get(key)
            .or_else(|| self.entries.get(MISSING_KEY))
            .unwrap_or_else(|| unreachable!("built-in textures are never removed"))
    }

    /// Remove a loaded texture. Built-in placeholders stay.
    pub fn remove(&mut self, key: &str) -> bool {
        if is_builtin(key) {
            log::warn!("refusing to remove built-in texture {key}");
            return false;
        }
        self.entries.remove(key).is_some()
    }

    /// Loaded keys, sorted, without the built-ins.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .keys()
            .map(String::as_str)
            .filter(|key| !is_builtin(key))
            .collect();
        keys.sort_unstable();
        keys
    }
}

pub fn is_builtin(key: &str) -> bool {
    key == DEFAULT_KEY || key == MISSING_KEY
}
