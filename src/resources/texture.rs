use std::path::Path;

use anyhow::Context as _;
use image::{ImageFormat, load_from_memory_with_format};

use crate::data_structures::texture_cache::SourceImage;

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(data)
}

/// Decode image file contents, using the file extension as a format hint
/// when it is one the `image` crate knows.
pub fn decode_image(bytes: &[u8], path: &Path) -> anyhow::Result<SourceImage> {
    let hint = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension);
    let img = match hint {
        Some(format) => load_from_memory_with_format(bytes, format),
        None => image::load_from_memory(bytes),
    }
    .with_context(|| format!("could not decode {}", path.display()))?;
    Ok(SourceImage::from_image(&img))
}

pub async fn load_image(path: &Path) -> anyhow::Result<SourceImage> {
    let data = load_binary(path).await?;
    decode_image(&data, path)
}
