use std::any::TypeId;
use std::collections::HashMap;

use retrace_core::abstract_editor::{Editable, EntityWorld, FocusRouter, Resolve};
use thiserror::Error;

use crate::components::{Header, HeaderKind};
use crate::entity::{Entity, EntityAllocator};
use crate::focus::{FocusQueue, FocusRequest};
use crate::reflected::{Reflect, Reflected};
use crate::storage::{ComponentStorage, SparseSet};

/// Errors returned by structural [`World`] operations.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The handle refers to an entity that was despawned (or never existed).
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),
}

/// Entity storage for the editor.
///
/// Every live entity has a [`Header`]; any other `Send + Sync` value can be
/// attached as a component, one per type. Handles stay valid until the
/// entity is despawned; after that every lookup through them returns
/// `None`, even if the slot is reused.
pub struct World {
    entities: EntityAllocator,
    headers: SparseSet<Header>,
    components: HashMap<TypeId, ComponentStorage>,
    focus: FocusQueue,
    tick: u64,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            headers: SparseSet::new(),
            components: HashMap::new(),
            focus: FocusQueue::new(),
            tick: 0,
        }
    }

    // ---- Entity management ----

    /// Spawns an entity with a default header.
    pub fn spawn(&mut self) -> Entity {
        self.spawn_with_header(Header::default())
    }

    /// Spawns an entity with the given display name.
    pub fn spawn_named(&mut self, name: impl Into<String>) -> Entity {
        self.spawn_with_header(Header::named(name))
    }

    pub fn spawn_with_header(&mut self, header: Header) -> Entity {
        let entity = self.entities.allocate(self.tick);
        self.headers.insert(entity.index(), header);
        entity
    }

    /// Despawns an entity, dropping its header and all its components.
    ///
    /// Returns `false` if the entity was already dead.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }

        let index = entity.index();
        self.headers.remove(index);
        for storage in self.components.values_mut() {
            if storage.remove_untyped(index) {
                log::trace!("Dropped {} of {entity}", storage.type_name());
            }
        }
        self.focus.deselect(entity);
        log::debug!("Despawned {entity}");
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> u32 {
        self.entities.count()
    }

    /// Iterates over all currently alive entities.
    pub fn iter_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    // ---- Header ----

    pub fn header(&self, entity: Entity) -> Option<&Header> {
        if !self.is_alive(entity) {
            return None;
        }
        self.headers.get(entity.index())
    }

    pub fn header_mut(&mut self, entity: Entity) -> Option<&mut Header> {
        if !self.is_alive(entity) {
            return None;
        }
        self.headers.get_mut(entity.index())
    }

    // ---- Components ----

    /// Attaches a component, returning the one of the same type it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DeadEntity`] if the entity is not alive.
    pub fn insert<T: Send + Sync + 'static>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<Option<T>, WorldError> {
        if !self.is_alive(entity) {
            return Err(WorldError::DeadEntity(entity));
        }
        let storage = self
            .components
            .entry(TypeId::of::<T>())
            .or_insert_with(ComponentStorage::new::<T>);
        Ok(storage
            .typed_mut::<T>()
            .and_then(|set| set.insert(entity.index(), component)))
    }

    /// Detaches a component. Returns `None` if the entity did not have it.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.components
            .get_mut(&TypeId::of::<T>())?
            .typed_mut::<T>()?
            .remove(entity.index())
    }

    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.components
            .get(&TypeId::of::<T>())?
            .typed::<T>()?
            .get(entity.index())
    }

    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.components
            .get_mut(&TypeId::of::<T>())?
            .typed_mut::<T>()?
            .get_mut(entity.index())
    }

    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    // ---- Ticks ----

    /// Returns the current world tick, stamped on entities spawned now.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances the world tick by one. Call once per frame.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    // ---- Focus ----

    /// The entity most recently selected by an applied change.
    pub fn selected(&self) -> Option<Entity> {
        self.focus.selected()
    }

    /// Takes the focus requests emitted since the last call.
    pub fn drain_focus_requests(&mut self) -> Vec<FocusRequest> {
        self.focus.drain()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entity_count())
            .field("component_types", &self.components.len())
            .field("tick", &self.tick)
            .finish()
    }
}

impl Editable for World {}

impl EntityWorld for World {
    type Handle = Entity;

    fn is_destroyed(&self, entity: Entity) -> bool {
        !self.is_alive(entity)
    }
}

impl Resolve<HeaderKind> for World {
    fn resolve(&self, entity: Entity) -> Option<&Header> {
        self.header(entity)
    }

    fn resolve_mut(&mut self, entity: Entity) -> Option<&mut Header> {
        self.header_mut(entity)
    }
}

impl<T: Reflect> Resolve<Reflected<T>> for World {
    fn resolve(&self, entity: Entity) -> Option<&T> {
        self.get::<T>(entity)
    }

    fn resolve_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.get_mut::<T>(entity)
    }
}

impl FocusRouter<Entity> for World {
    fn select_entity(&mut self, entity: Entity) {
        self.focus.select(entity);
    }

    fn focus_field(&mut self, entity: Entity, path: &str) {
        self.focus.focus_field(entity, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Speed(f32);

    #[test]
    fn spawn_gives_default_header() {
        let mut world = World::new();
        let e = world.spawn();
        let named = world.spawn_named("Player");

        assert_eq!(world.header(e), Some(&Header::default()));
        assert_eq!(world.header(named).unwrap().name, "Player");
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn despawn_drops_everything() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Speed(1.0)).unwrap();

        assert!(world.despawn(e));
        assert!(!world.despawn(e));
        assert!(world.is_destroyed(e));
        assert!(world.header(e).is_none());
        assert!(world.get::<Speed>(e).is_none());
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn stale_handle_does_not_see_successor() {
        let mut world = World::new();
        let old = world.spawn_named("Old");
        world.insert(old, Speed(1.0)).unwrap();
        world.despawn(old);

        let new = world.spawn_named("New");
        world.insert(new, Speed(2.0)).unwrap();
        assert_eq!(new.index(), old.index());

        assert!(world.header(old).is_none());
        assert!(world.get::<Speed>(old).is_none());
        assert!(world.header_mut(old).is_none());
        assert_eq!(world.get::<Speed>(new), Some(&Speed(2.0)));
    }

    #[test]
    fn insert_replace_remove() {
        let mut world = World::new();
        let e = world.spawn();

        assert_eq!(world.insert(e, Speed(1.0)).unwrap(), None);
        assert_eq!(world.insert(e, Speed(2.0)).unwrap(), Some(Speed(1.0)));
        world.get_mut::<Speed>(e).unwrap().0 = 3.0;
        assert!(world.has::<Speed>(e));
        assert_eq!(world.remove::<Speed>(e), Some(Speed(3.0)));
        assert!(!world.has::<Speed>(e));
        assert_eq!(world.remove::<Speed>(e), None);
    }

    #[test]
    fn insert_on_dead_entity_fails() {
        let mut world = World::new();
        let e = world.spawn();
        world.despawn(e);

        let err = world.insert(e, Speed(1.0)).unwrap_err();
        assert!(matches!(err, WorldError::DeadEntity(dead) if dead == e));
    }

    #[test]
    fn ticks_stamp_spawns() {
        let mut world = World::new();
        world.advance_tick();
        world.advance_tick();
        let e = world.spawn();
        assert_eq!(world.tick(), 2);
        assert_eq!(e.spawn_tick(), 2);
    }

    #[test]
    fn focus_routing_and_despawn_clears_selection() {
        let mut world = World::new();
        let e = world.spawn();

        world.select_entity(e);
        world.focus_field(e, "position");
        assert_eq!(world.selected(), Some(e));
        assert_eq!(
            world.drain_focus_requests(),
            vec![
                FocusRequest::Select(e),
                FocusRequest::Field(e, "position".into())
            ]
        );
        assert!(world.drain_focus_requests().is_empty());

        world.despawn(e);
        assert_eq!(world.selected(), None);
    }

    #[test]
    fn iter_entities_lists_alive() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();
        world.despawn(b);

        assert_eq!(world.iter_entities().collect::<Vec<_>>(), vec![a, c]);
        assert!(format!("{world:?}").contains("entities: 2"));
    }
}
