//! Component contract
//!
//! A component is a boxed trait object owned by exactly one [`Entity`]. The
//! owning entity is handed to every hook as a parameter instead of being
//! stored as a back-reference, so a component can read and write its
//! siblings (Physics moving Position, PaddleControl steering Physics).

use std::any::Any;

use glam::Vec2;

use super::MAX_COMPONENTS;
use super::entity::Entity;
use super::error::EcsError;
use crate::platform::{Keyboard, RenderSurface};

/// Stable small integer identifying a component type
///
/// The set of component kinds is closed and enumerated as constants, so ids
/// are fixed at compile time. Building an id past [`MAX_COMPONENTS`] in a
/// `const` fails the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u8);

impl ComponentId {
    pub const fn new(id: usize) -> Self {
        assert!(id < MAX_COMPONENTS, "component id exceeds MAX_COMPONENTS");
        Self(id as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn bit(self) -> u32 {
        1 << self.0
    }
}

/// Per-step context shared by every component update
pub struct Frame<'a> {
    /// Keyboard state, queried on demand
    pub keys: &'a dyn Keyboard,
    /// Arena size; the playfield spans `[0, arena.x] × [0, arena.y]`
    pub arena: Vec2,
}

/// Upcast helper so boxed components can be downcast to their concrete type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour attached to an entity
///
/// `init` runs once, right after the component is inserted. Dependencies on
/// sibling components must be checked there, so the component must be added
/// after the ones it needs.
pub trait Component: AsAny {
    fn init(&mut self, _entity: &mut Entity) -> Result<(), EcsError> {
        Ok(())
    }

    fn update(&mut self, _entity: &mut Entity, _frame: &Frame<'_>, _ft: f32) -> Result<(), EcsError> {
        Ok(())
    }

    fn draw(&self, _entity: &Entity, _surface: &mut dyn RenderSurface) {}
}

/// A component type with a registered id
pub trait Registered: Component + Sized {
    const ID: ComponentId;

    /// Human readable name for error messages
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
