//! Brickbreak - a ball, a paddle and a wall of bricks
//!
//! Core modules:
//! - `ecs`: Entities, components, and the manager with its group indices
//! - `sim`: Components, AABB collisions and the fixed-timestep game loop
//! - `platform`: Render surface, keyboard and clock abstractions
//! - `settings`: Data-driven arena, entity and timing configuration

pub mod ecs;
pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Game, GameEvent};

/// Crate version, reported by `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
