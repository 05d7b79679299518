//! Entity-Component-System core
//!
//! - Entities own boxed components and carry a liveness flag and group set
//! - The manager owns entities in a generational arena and indexes them by group
//! - Destruction is a soft delete; `Manager::refresh` does the actual removal
//!
//! Everything here is single-threaded and runs inside the fixed-step loop.

pub mod component;
pub mod entity;
pub mod error;
pub mod group;
pub mod manager;

pub use component::{AsAny, Component, ComponentId, Frame, Registered};
pub use entity::{Entity, EntityId};
pub use error::EcsError;
pub use group::Group;
pub use manager::{EntityMut, Manager};

/// Distinct component types an entity can hold
pub const MAX_COMPONENTS: usize = 32;
/// Distinct groups an entity can belong to
pub const MAX_GROUPS: usize = 32;
