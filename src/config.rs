//! Engine configuration.
//!
//! [`GameConfig`] holds everything the runner needs before the first scene is
//! started: window size and title, the clear colour and where assets live on
//! disk. It can be built in code or read from a TOML file; every field has a
//! default so partial files are fine.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// `#rrggbb` hex string used to clear the frame.
    pub background_colour: String,
    /// Directory that loader base paths are resolved against.
    pub asset_root: PathBuf,
    /// Abort `SceneManager::start` when an asset fails to load instead of
    /// rendering the missing-texture placeholder.
    pub strict_assets: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "scene-ngin".to_string(),
            width: 1024,
            height: 768,
            background_colour: "#028af8".to_string(),
            asset_root: PathBuf::from("."),
            strict_assets: false,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text).context("invalid game config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.width, self.height);
        }
        parse_hex_colour(&self.background_colour)?;
        Ok(())
    }

    /// The clear colour as linear-ish RGBA components in `0.0..=1.0`.
    pub fn clear_colour(&self) -> [f64; 4] {
        // validate() guarantees the colour parses for loaded configs
        parse_hex_colour(&self.background_colour).unwrap_or([0.0, 0.0, 0.0, 1.0])
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into RGBA components with alpha 1.
pub fn parse_hex_colour(hex: &str) -> anyhow::Result<[f64; 4]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("expected a colour like #rrggbb, got {hex:?}");
    }
    let channel = |range: std::ops::Range<usize>| -> anyhow::Result<f64> {
        let value = u8::from_str_radix(&digits[range], 16)?;
        Ok(f64::from(value) / 255.0)
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?, 1.0])
}
