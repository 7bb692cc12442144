use std::fmt;
use std::hash::{Hash, Hasher};

/// A generational entity handle.
///
/// Layout: `u32 index` + `u64 spawn_tick`.
///
/// - **index**: slot index in the entity allocator
/// - **spawn_tick**: world tick when this entity was spawned. A reused slot
///   always gets a different spawn tick, so handles to a despawned entity
///   never resolve to its successor.
///
/// Handles are non-owning. Undo commands keep them across frames and look
/// the entity up again every time they are applied.
#[derive(Clone, Copy)]
pub struct Entity {
    index: u32,
    spawn_tick: u64,
}

impl Entity {
    pub(crate) fn new(index: u32, spawn_tick: u64) -> Self {
        Self { index, spawn_tick }
    }

    /// Returns the slot index of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the spawn tick of this entity.
    pub fn spawn_tick(&self) -> u64 {
        self.spawn_tick
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.spawn_tick == other.spawn_tick
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.spawn_tick.hash(state);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}@{})", self.index, self.spawn_tick)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Allocates and recycles entity slots with spawn-tick tracking.
///
/// Despawned slots go on a LIFO free list. Despawning bumps the slot's
/// stored tick, and reuse takes the larger of that and the current world
/// tick, so the new handle differs from every handle issued before.
pub(crate) struct EntityAllocator {
    /// Spawn tick for each slot. Index = entity index.
    spawn_ticks: Vec<u64>,
    alive: Vec<bool>,
    free_list: Vec<u32>,
    count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            spawn_ticks: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Allocates a new entity, reusing a recycled slot if available.
    pub fn allocate(&mut self, tick: u64) -> Entity {
        self.count += 1;

        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            let spawn_tick = tick.max(self.spawn_ticks[idx]);
            self.alive[idx] = true;
            self.spawn_ticks[idx] = spawn_tick;
            Entity::new(index, spawn_tick)
        } else {
            let index = self.spawn_ticks.len() as u32;
            self.spawn_ticks.push(tick);
            self.alive.push(true);
            Entity::new(index, tick)
        }
    }

    /// Deallocates an entity. Returns false if already dead or spawn_tick mismatch.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let idx = entity.index() as usize;
        self.alive[idx] = false;
        self.spawn_ticks[idx] = self.spawn_ticks[idx].wrapping_add(1);
        self.free_list.push(entity.index());
        self.count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.alive.len() && self.alive[idx] && self.spawn_ticks[idx] == entity.spawn_tick()
    }

    /// Returns the number of alive entities.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Iterates over all currently alive entities in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| Entity::new(idx as u32, self.spawn_ticks[idx]))
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
