//! Entities: a liveness flag, a group set, and the components they own

use std::fmt;

use thunderdome as td;

use super::MAX_COMPONENTS;
use super::component::{Component, Frame, Registered};
use super::error::EcsError;
use super::group::Group;
use crate::platform::RenderSurface;

/// Handle to an entity stored in a [`Manager`][super::Manager].
///
/// Handles are generational: once the entity is removed by a refresh, lookups
/// through a stale handle return nothing instead of aliasing a new entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub(super) td::Index);

/// A bag of components with a liveness flag and group membership
pub struct Entity {
    alive: bool,
    // Option so a component can be lifted out while it updates against the
    // rest of the entity; boxes keep component addresses stable on growth.
    components: Vec<Option<Box<dyn Component>>>,
    // component id -> position in `components`
    slots: [Option<usize>; MAX_COMPONENTS],
    component_bits: u32,
    group_bits: u32,
}

impl Entity {
    pub(super) fn new() -> Self {
        Self {
            alive: true,
            components: Vec::new(),
            slots: [None; MAX_COMPONENTS],
            component_bits: 0,
            group_bits: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Soft delete. Storage and group indices are cleaned up by the next
    /// [`Manager::refresh`][super::Manager::refresh].
    pub fn destroy(&mut self) {
        self.alive = false;
    }

    #[inline]
    pub fn has_component<T: Registered>(&self) -> bool {
        self.component_bits & T::ID.bit() != 0
    }

    /// Number of components attached
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn has_group(&self, group: Group) -> bool {
        self.group_bits & group.bit() != 0
    }

    /// Set the membership bit only; indexing is the manager's job
    pub(super) fn mark_group(&mut self, group: Group) {
        self.group_bits |= group.bit();
    }

    /// Leave a group. The manager drops the index entry on its next refresh.
    pub fn del_group(&mut self, group: Group) {
        self.group_bits &= !group.bit();
    }

    /// Attach a component and run its `init`
    ///
    /// Fails if a component of the same type is already attached, or if
    /// `init` cannot resolve a dependency. A component whose `init` fails is
    /// detached again.
    pub fn add_component<T: Registered>(&mut self, component: T) -> Result<&mut T, EcsError> {
        if self.has_component::<T>() {
            return Err(EcsError::DuplicateComponent {
                id: T::ID,
                name: T::name(),
            });
        }

        let slot = self.components.len();
        self.components.push(Some(Box::new(component)));
        self.slots[T::ID.index()] = Some(slot);
        self.component_bits |= T::ID.bit();

        if let Err(err) = self.init_slot(slot) {
            self.detach_from(slot);
            return Err(err);
        }

        self.component_mut::<T>()
    }

    /// Drop every component stored at `slot` or later, including any that a
    /// failing `init` attached on its own
    fn detach_from(&mut self, slot: usize) {
        self.components.truncate(slot);
        for (id, entry) in self.slots.iter_mut().enumerate() {
            if entry.is_some_and(|stored| stored >= slot) {
                *entry = None;
                self.component_bits &= !(1u32 << id);
            }
        }
    }

    fn init_slot(&mut self, slot: usize) -> Result<(), EcsError> {
        let Some(mut component) = self.components[slot].take() else {
            return Ok(());
        };
        let result = component.init(self);
        self.components[slot] = Some(component);
        result
    }

    /// Borrow a component.
    ///
    /// A component that is currently running its own `update` is lifted out
    /// of the entity and reported missing.
    pub fn component<T: Registered>(&self) -> Result<&T, EcsError> {
        let component = self.slots[T::ID.index()]
            .and_then(|slot| self.components[slot].as_deref())
            .ok_or_else(missing::<T>)?;
        component
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(mismatch::<T>)
    }

    /// Mutably borrow a component
    pub fn component_mut<T: Registered>(&mut self) -> Result<&mut T, EcsError> {
        let slot = self.slots[T::ID.index()].ok_or_else(missing::<T>)?;
        let component = self.components[slot]
            .as_deref_mut()
            .ok_or_else(missing::<T>)?;
        component
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(mismatch::<T>)
    }

    /// Advance every component in insertion order
    pub fn update(&mut self, frame: &Frame<'_>, ft: f32) -> Result<(), EcsError> {
        for slot in 0..self.components.len() {
            let Some(mut component) = self.components[slot].take() else {
                continue;
            };
            let result = component.update(self, frame, ft);
            self.components[slot] = Some(component);
            result?;
        }
        Ok(())
    }

    /// Draw every component in insertion order
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        for component in self.components.iter().flatten() {
            component.draw(self, surface);
        }
    }
}

fn missing<T: Registered>() -> EcsError {
    EcsError::MissingComponent {
        id: T::ID,
        name: T::name(),
    }
}

fn mismatch<T: Registered>() -> EcsError {
    EcsError::ComponentTypeMismatch {
        id: T::ID,
        name: T::name(),
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("alive", &self.alive)
            .field("components", &format_args!("{:#034b}", self.component_bits))
            .field("groups", &format_args!("{:#034b}", self.group_bits))
            .finish()
    }
}
