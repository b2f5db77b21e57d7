//! Procedural side-scrolling platformer core: segment-based level generation,
//! the player controller, three enemy behaviors and the per-frame session loop.
//! Rendering, audio and asset loading belong to the host engine.

pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod generation;
pub mod input;
pub mod physics_core;
pub mod player;
pub mod random;
pub mod session;
pub mod spawn;
pub mod tilemap;

pub use config::GameConfig;
pub use error::LevelError;
pub use session::{Session, SessionPlugin};
