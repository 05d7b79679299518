//! Entity manager
//!
//! Owns every entity in a generational arena and keeps one ordered index per
//! group. Index entries are plain handles: dead or departed entities stay in
//! the index until [`Manager::refresh`] prunes them, so collision passes can
//! walk a group while bricks are being destroyed.

use std::ops::{Deref, DerefMut};

use thunderdome as td;

use super::MAX_GROUPS;
use super::component::{Frame, Registered};
use super::entity::{Entity, EntityId};
use super::error::EcsError;
use super::group::Group;
use crate::platform::RenderSurface;

#[derive(Default)]
pub struct Manager {
    entities: td::Arena<Entity>,
    /// Creation order, used for update/draw traversal
    order: Vec<EntityId>,
    groups: [Vec<EntityId>; MAX_GROUPS],
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entity and return a handle for wiring it up
    pub fn add_entity(&mut self) -> EntityMut<'_> {
        let id = EntityId(self.entities.insert(Entity::new()));
        self.order.push(id);
        EntityMut { manager: self, id }
    }

    /// Number of stored entities, dead ones included until the next refresh
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    /// Entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.entities.get(id.0).map(|entity| (id, entity)))
    }

    /// Mark `id` as a member of `group` and append it to the group index
    pub fn add_to_group(&mut self, id: EntityId, group: Group) -> Result<(), EcsError> {
        let entity = self.entities.get_mut(id.0).ok_or(EcsError::DeadEntity(id))?;
        entity.mark_group(group);

        // Re-joining before a refresh must not index the entity twice
        let index = &mut self.groups[group.index()];
        if !index.contains(&id) {
            index.push(id);
        }
        Ok(())
    }

    /// Entities indexed under `group`, in insertion order
    ///
    /// May contain entities destroyed or removed from the group since the
    /// last refresh.
    pub fn entities_by_group(&self, group: Group) -> &[EntityId] {
        &self.groups[group.index()]
    }

    /// Advance every entity by one step, in creation order
    pub fn update(&mut self, frame: &Frame<'_>, ft: f32) -> Result<(), EcsError> {
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(id.0) {
                entity.update(frame, ft)?;
            }
        }
        Ok(())
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        for (_, entity) in self.iter() {
            entity.draw(surface);
        }
    }

    /// Drop stale group entries, then free dead entities
    ///
    /// Group indices are pruned first so no index ever points at a freed
    /// slot. Returns the number of entities freed.
    pub fn refresh(&mut self) -> usize {
        let entities = &self.entities;
        for group in Group::all() {
            self.groups[group.index()].retain(|id| {
                entities
                    .get(id.0)
                    .is_some_and(|entity| entity.is_alive() && entity.has_group(group))
            });
        }

        let before = self.order.len();
        let entities = &mut self.entities;
        self.order.retain(|id| {
            let alive = entities.get(id.0).is_some_and(Entity::is_alive);
            if !alive {
                entities.remove(id.0);
            }
            alive
        });

        let removed = before - self.order.len();
        if removed > 0 {
            log::debug!("refresh freed {removed} entities, {} remain", self.order.len());
        }
        removed
    }
}

/// Mutable access to one entity plus the manager that indexes it
///
/// Dereferences to [`Entity`]; group membership goes through here because
/// joining a group has to update the manager's index.
pub struct EntityMut<'a> {
    manager: &'a mut Manager,
    id: EntityId,
}

impl EntityMut<'_> {
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach a component; see [`Entity::add_component`]
    pub fn add_component<T: Registered>(&mut self, component: T) -> Result<&mut T, EcsError> {
        self.manager.entities[self.id.0].add_component(component)
    }

    pub fn add_group(&mut self, group: Group) -> Result<(), EcsError> {
        self.manager.add_to_group(self.id, group)
    }
}

impl Deref for EntityMut<'_> {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.manager.entities[self.id.0]
    }
}

impl DerefMut for EntityMut<'_> {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut self.manager.entities[self.id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, ComponentId};
    use crate::platform::HeadlessSurface;
    use glam::Vec2;

    const TAGGED: Group = Group::new(0);
    const OTHER: Group = Group::new(5);

    struct Counter(u32);
    impl Component for Counter {
        fn update(&mut self, _entity: &mut Entity, _frame: &Frame<'_>, _ft: f32) -> Result<(), EcsError> {
            self.0 += 1;
            Ok(())
        }
    }
    impl Registered for Counter {
        const ID: ComponentId = ComponentId::new(0);
    }

    fn frame(keys: &HeadlessSurface) -> Frame<'_> {
        Frame {
            keys,
            arena: Vec2::new(800.0, 600.0),
        }
    }

    #[test]
    fn test_group_index_keeps_insertion_order() {
        let mut manager = Manager::new();
        let ids: Vec<EntityId> = (0..4)
            .map(|_| {
                let mut entity = manager.add_entity();
                entity.add_group(TAGGED).unwrap();
                entity.id()
            })
            .collect();

        assert_eq!(manager.entities_by_group(TAGGED), ids.as_slice());
        assert!(manager.entities_by_group(OTHER).is_empty());
    }

    #[test]
    fn test_add_group_twice_indexes_once() {
        let mut manager = Manager::new();
        let mut entity = manager.add_entity();
        entity.add_group(TAGGED).unwrap();
        entity.add_group(TAGGED).unwrap();
        assert_eq!(manager.entities_by_group(TAGGED).len(), 1);
    }

    #[test]
    fn test_destroy_is_deferred_until_refresh() {
        let mut manager = Manager::new();
        let id = {
            let mut entity = manager.add_entity();
            entity.add_group(TAGGED).unwrap();
            entity.id()
        };
        manager.entity_mut(id).unwrap().destroy();

        // Still indexed and stored until refresh
        assert_eq!(manager.entities_by_group(TAGGED), &[id]);
        assert_eq!(manager.len(), 1);

        assert_eq!(manager.refresh(), 1);
        assert!(manager.entities_by_group(TAGGED).is_empty());
        assert!(manager.entity(id).is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut manager = Manager::new();
        for i in 0..6 {
            let mut entity = manager.add_entity();
            entity.add_group(TAGGED).unwrap();
            if i % 2 == 0 {
                entity.destroy();
            }
        }

        assert_eq!(manager.refresh(), 3);
        let remaining = manager.entities_by_group(TAGGED).to_vec();
        assert_eq!(manager.refresh(), 0);
        assert_eq!(manager.entities_by_group(TAGGED), remaining.as_slice());
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn test_del_group_prunes_index_but_keeps_entity() {
        let mut manager = Manager::new();
        let id = {
            let mut entity = manager.add_entity();
            entity.add_group(TAGGED).unwrap();
            entity.add_group(OTHER).unwrap();
            entity.id()
        };
        manager.entity_mut(id).unwrap().del_group(TAGGED);
        manager.refresh();

        assert!(manager.entities_by_group(TAGGED).is_empty());
        assert_eq!(manager.entities_by_group(OTHER), &[id]);
        assert!(manager.entity(id).is_some());
    }

    #[test]
    fn test_stale_handle_does_not_alias_new_entity() {
        let mut manager = Manager::new();
        let old = manager.add_entity().id();
        manager.entity_mut(old).unwrap().destroy();
        manager.refresh();

        let new = manager.add_entity().id();
        assert_ne!(old, new);
        assert!(manager.entity(old).is_none());
        assert!(manager.entity_mut(old).is_none());
        assert_eq!(manager.add_to_group(old, TAGGED), Err(EcsError::DeadEntity(old)));
    }

    #[test]
    fn test_update_visits_every_entity_in_creation_order() {
        let mut manager = Manager::new();
        let ids: Vec<EntityId> = (0..3)
            .map(|_| {
                let mut entity = manager.add_entity();
                entity.add_component(Counter(0)).unwrap();
                entity.id()
            })
            .collect();

        let keys = HeadlessSurface::new();
        manager.update(&frame(&keys), 1.0).unwrap();
        manager.update(&frame(&keys), 1.0).unwrap();

        let order: Vec<EntityId> = manager.iter().map(|(id, _)| id).collect();
        assert_eq!(order, ids);
        for id in ids {
            let counter = manager.entity(id).unwrap().component::<Counter>().unwrap();
            assert_eq!(counter.0, 2);
        }
    }
}
