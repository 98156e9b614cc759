//! Engine data structures: display objects, decoded images and GPU textures.
//!
//! - `display` holds the [`display::Image`] display object and the scene's display list
//! - `texture_cache` holds decoded images by key, including the built-in placeholders
//! - `texture` contains the GPU texture wrapper used by the sprite pipeline

pub mod display;
pub mod texture;
pub mod texture_cache;
