//! Render pipelines.
//!
//! - `sprite` draws textured, alpha blended quads in pixel space

pub mod sprite;
