//! Scenes shipped with the binary.

pub mod game;

pub use game::Game;
