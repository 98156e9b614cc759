//! Display objects and the per-scene display list.
//!
//! A scene adds [`Image`]s to its [`DisplayList`] in `create`. The renderer
//! draws them back to front by depth; images with equal depth keep the
//! order in which they were added.

use std::cmp::Ordering;

use cgmath::Vector2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u32);

/// A textured quad placed in screen space (pixels, y down).
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    id: ImageId,
    pub texture: String,
    pub position: Vector2<f32>,
    /// Normalised anchor inside the texture; (0.5, 0.5) centers it on `position`.
    pub origin: Vector2<f32>,
    pub scale: Vector2<f32>,
    pub depth: f32,
    pub alpha: f32,
    pub visible: bool,
}

impl Image {
    fn new(id: ImageId, x: f32, y: f32, texture: &str) -> Self {
        Self {
            id,
            texture: texture.to_string(),
            position: Vector2::new(x, y),
            origin: Vector2::new(0.5, 0.5),
            scale: Vector2::new(1.0, 1.0),
            depth: 0.0,
            alpha: 1.0,
            visible: true,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn set_depth(&mut self, depth: f32) -> &mut Self {
        self.depth = depth;
        self
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.position = Vector2::new(x, y);
        self
    }

    pub fn set_origin(&mut self, x: f32, y: f32) -> &mut Self {
        self.origin = Vector2::new(x, y);
        self
    }

    pub fn set_scale(&mut self, x: f32, y: f32) -> &mut Self {
        self.scale = Vector2::new(x, y);
        self
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }
}

#[derive(Debug, Default)]
pub struct DisplayList {
    images: Vec<Image>,
    next_id: u32,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image using the texture `key`, centered on (`x`, `y`).
    pub fn image(&mut self, x: f32, y: f32, key: &str) -> &mut Image {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        log::debug!("adding image {key} at ({x}, {y})");
        let idx = self.images.len();
        self.images.push(Image::new(id, x, y, key));
        &mut self.images[idx]
    }

    pub fn get(&self, id: ImageId) -> Option<&Image> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn get_mut(&mut self, id: ImageId) -> Option<&mut Image> {
        self.images.iter_mut().find(|image| image.id == id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Images in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.images.iter()
    }

    /// Images in draw order: ascending depth, ties by insertion order.
    pub fn depth_sorted(&self) -> Vec<&Image> {
        let mut sorted: Vec<&Image> = self.images.iter().collect();
        // sort_by is stable
        sorted.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(Ordering::Equal));
        sorted
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}
