//! Sprite batching.
//!
//! This module turns a scene's [`DisplayList`] into GPU-ready geometry. Each
//! visible image becomes one quad; quads are emitted in depth order and
//! consecutive quads that share a texture are merged into one draw call.
//!
//! # Key types
//!
//! - [`SpriteVertex`] is the vertex layout consumed by the sprite pipeline
//! - [`SpriteBatch`] holds vertices, indices and per-texture draw ranges
//!

use std::ops::Range;

use crate::data_structures::{
    display::{DisplayList, Image},
    texture_cache::{MISSING_KEY, TextureCache},
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    /// Screen position in pixels, y down.
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub alpha: f32,
}

impl SpriteVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// A run of indices drawn with one texture.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteDraw {
    /// Texture cache key, already resolved to `__MISSING` for unknown textures.
    pub texture: String,
    pub indices: Range<u32>,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u16>,
    pub draws: Vec<SpriteDraw>,
}

impl SpriteBatch {
    pub fn from_display_list(display: &DisplayList, textures: &TextureCache) -> Self {
        let mut batch = Self::default();
        display
            .depth_sorted()
            .into_iter()
            .filter(|image| image.visible && image.alpha > 0.0)
            .for_each(|image| batch.push_image(image, textures));
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    fn push_image(&mut self, image: &Image, textures: &TextureCache) {
        if self.vertices.len() + 4 > u16::MAX as usize {
            log::warn!("sprite batch is full, dropping image {}", image.texture);
            return;
        }
        let key = if textures.exists(&image.texture) {
            image.texture.as_str()
        } else {
            MISSING_KEY
        };
        let [width, height] = textures.get(key).size();
        let width = width * image.scale.x;
        let height = height * image.scale.y;
        let left = image.position.x - image.origin.x * width;
        let top = image.position.y - image.origin.y * height;
        let (right, bottom) = (left + width, top + height);

        let base = self.vertices.len() as u16;
        let alpha = image.alpha;
        self.vertices.extend_from_slice(&[
            SpriteVertex {
                position: [left, top],
                tex_coords: [0.0, 0.0],
                alpha,
            },
            SpriteVertex {
                position: [left, bottom],
                tex_coords: [0.0, 1.0],
                alpha,
            },
            SpriteVertex {
                position: [right, bottom],
                tex_coords: [1.0, 1.0],
                alpha,
            },
            SpriteVertex {
                position: [right, top],
                tex_coords: [1.0, 0.0],
                alpha,
            },
        ]);
        let start = self.indices.len() as u32;
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        let end = self.indices.len() as u32;

        match self.draws.last_mut() {
            Some(last) if last.texture == key && last.indices.end == start => {
                last.indices.end = end;
            }
            _ => self.draws.push(SpriteDraw {
                texture: key.to_string(),
                indices: start..end,
            }),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ProjectionUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ProjectionUniform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            view_proj: projection(width as f32, height as f32).into(),
        }
    }
}

/// Maps pixel coordinates (origin top left, y down) to clip space.
pub fn projection(width: f32, height: f32) -> cgmath::Matrix4<f32> {
    cgmath::ortho(0.0, width, height, 0.0, -1.0, 1.0)
}
