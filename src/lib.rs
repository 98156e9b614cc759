//! scene-ngin
//!
//! A small 2D scene engine. Scenes declare the assets they need in a preload
//! step, build display objects once those assets are available and talk to
//! the rest of the application through a process-wide event bus. The engine
//! owns the lifecycle, the texture cache and a wgpu sprite renderer.
//!
//! High-level modules
//! - `config`: window, colour and asset settings, loadable from TOML
//! - `context`: GPU context that owns device/queue/surface and the sprite pipeline
//! - `data_structures`: display objects, decoded images and GPU textures
//! - `events`: the publish/subscribe bus scenes emit on
//! - `flow`: scene lifecycle management and the winit event loop
//! - `pipelines`: render pipeline definitions
//! - `resources`: the preload queue and asset file loading
//! - `render`: sprite batching of a display list
//! - `scene`: the `Scene` trait and its context
//! - `scenes`: scenes shipped with the binary
//!

pub mod config;
pub mod context;
pub mod data_structures;
pub mod events;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod scenes;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::Vector2;
pub use config::GameConfig;
pub use events::{CURRENT_SCENE_READY, Emitter, EventBus};
pub use scene::{Scene, SceneContext, SceneStatus};
