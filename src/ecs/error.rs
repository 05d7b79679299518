//! Errors raised by component access on entities
//!
//! These are content errors: a factory that forgot a component, or added one
//! twice. The simulation never recovers from them, it propagates them out of
//! the run with `?`.

use super::component::ComponentId;
use super::entity::EntityId;

/// Failure while wiring or accessing components
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    #[error("entity already has component `{name}` (id {id:?})")]
    DuplicateComponent { id: ComponentId, name: &'static str },
    #[error("entity has no component `{name}` (id {id:?})")]
    MissingComponent { id: ComponentId, name: &'static str },
    #[error("component id {id:?} is registered for a type other than `{name}`")]
    ComponentTypeMismatch { id: ComponentId, name: &'static str },
    #[error("entity {0:?} no longer exists")]
    DeadEntity(EntityId),
}
