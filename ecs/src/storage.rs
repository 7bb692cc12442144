//! Per-type component columns.

use std::any::Any;

/// Typed sparse set storing components of type `T`.
///
/// A sparse array maps entity index to dense index; the dense array keeps
/// component values contiguous. Insert, remove and lookup are O(1).
pub struct SparseSet<T: 'static> {
    /// `entity_index -> dense_index`. `None` means the entity does not
    /// have this component.
    sparse: Vec<Option<u32>>,
    dense: Vec<T>,
    /// Entity indices corresponding to each dense element.
    entities: Vec<u32>,
}

impl<T: 'static> SparseSet<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Inserts a component for the given entity index, returning the value
    /// it replaced.
    pub fn insert(&mut self, entity_index: u32, value: T) -> Option<T> {
        let idx = entity_index as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }

        if let Some(dense_idx) = self.sparse[idx] {
            Some(std::mem::replace(&mut self.dense[dense_idx as usize], value))
        } else {
            self.sparse[idx] = Some(self.dense.len() as u32);
            self.dense.push(value);
            self.entities.push(entity_index);
            None
        }
    }

    /// Removes a component for the given entity index.
    pub fn remove(&mut self, entity_index: u32) -> Option<T> {
        let slot = self.sparse.get_mut(entity_index as usize)?;
        let dense_idx = slot.take()? as usize;

        let last_dense = self.dense.len() - 1;
        if dense_idx != last_dense {
            // Swap-remove: the last element moves into the freed slot.
            let swapped_entity = self.entities[last_dense];
            self.sparse[swapped_entity as usize] = Some(dense_idx as u32);
            self.entities[dense_idx] = swapped_entity;
        }

        self.entities.pop();
        Some(self.dense.swap_remove(dense_idx))
    }

    pub fn get(&self, entity_index: u32) -> Option<&T> {
        let dense_idx = (*self.sparse.get(entity_index as usize)?)? as usize;
        self.dense.get(dense_idx)
    }

    pub fn get_mut(&mut self, entity_index: u32) -> Option<&mut T> {
        let dense_idx = (*self.sparse.get(entity_index as usize)?)? as usize;
        self.dense.get_mut(dense_idx)
    }

    pub fn contains(&self, entity_index: u32) -> bool {
        matches!(self.sparse.get(entity_index as usize), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Iterates over `(entity_index, &component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }
}

impl<T: 'static> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

type RemoveFn = fn(&mut dyn Any, u32) -> bool;

/// Type-erased [`SparseSet`] so the world can hold one column per type.
pub(crate) struct ComponentStorage {
    inner: Box<dyn Any + Send + Sync>,
    /// Human-readable type name for logs.
    type_name: &'static str,
    /// Type-erased remove operation for despawn.
    remove_fn: RemoveFn,
}

impl ComponentStorage {
    pub fn new<T: Send + Sync + 'static>() -> Self {
        Self {
            inner: Box::new(SparseSet::<T>::new()),
            type_name: std::any::type_name::<T>(),
            remove_fn: |any, entity_index| {
                any.downcast_mut::<SparseSet<T>>()
                    .is_some_and(|set| set.remove(entity_index).is_some())
            },
        }
    }

    /// Downcasts to the typed sparse set. `None` if `T` is not this
    /// storage's type.
    pub fn typed<T: 'static>(&self) -> Option<&SparseSet<T>> {
        self.inner.downcast_ref::<SparseSet<T>>()
    }

    pub fn typed_mut<T: 'static>(&mut self) -> Option<&mut SparseSet<T>> {
        self.inner.downcast_mut::<SparseSet<T>>()
    }

    /// Removes the component at `entity_index` without knowing its type.
    pub fn remove_untyped(&mut self, entity_index: u32) -> bool {
        (self.remove_fn)(self.inner.as_mut(), entity_index)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}
