//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Stable iteration order (entity creation order, group insertion order)
//! - No rendering or platform code beyond the surface traits

pub mod aabb;
pub mod collision;
pub mod components;
pub mod game;

pub use aabb::{Aabb, is_intersecting};
pub use collision::{brick_ball, brick_side, paddle_ball, paddle_side};
pub use components::{PaddleControl, Physics, Position, Shape, reflect_off_side};
pub use game::{Game, GameEvent, groups};
