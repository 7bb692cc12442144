//! Diff kind for arbitrary `serde` components.
//!
//! [`Reflected<T>`] snapshots a component as a [`Value`] tree and diffs two
//! trees with [`FieldPatch`]. Applying a patch serializes the live
//! component, writes or removes the patched keys and deserializes it back,
//! so only the recorded fields change.

use std::fmt;
use std::marker::PhantomData;

use retrace_core::abstract_editor::{DiffError, Diffable};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::serialize::{FieldPatch, Value, from_value, to_value};

/// Components that can be recorded through the reflection layer.
pub trait Reflect: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Reflect for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Diff kind for components of type `T`.
pub struct Reflected<T>(PhantomData<fn() -> T>);

/// Captured state of a `T` component.
///
/// Typed by the component so that snapshots of different component types
/// cannot be diffed against each other.
pub struct Snapshot<T> {
    value: Value,
    _component: PhantomData<fn() -> T>,
}

impl<T> Snapshot<T> {
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _component: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Snapshot")
            .field(&std::any::type_name::<T>())
            .field(&self.value)
            .finish()
    }
}

impl<T: Reflect> Diffable for Reflected<T> {
    type Target = T;
    type Snapshot = Snapshot<T>;
    type Diff = FieldPatch;

    fn snapshot(component: &T) -> Result<Snapshot<T>, DiffError> {
        let value = to_value(component).map_err(|e| DiffError::Capture(e.to_string()))?;
        Ok(Snapshot {
            value,
            _component: PhantomData,
        })
    }

    fn diff(from: &Snapshot<T>, to: &Snapshot<T>) -> FieldPatch {
        FieldPatch::between(&from.value, &to.value)
    }

    fn apply(component: &mut T, diff: &FieldPatch) -> Result<(), DiffError> {
        let mut value = to_value(component).map_err(|e| DiffError::Apply(e.to_string()))?;
        diff.apply_to(&mut value).map_err(|e| DiffError::Apply(e.to_string()))?;
        *component = from_value(value).map_err(|e| DiffError::Apply(e.to_string()))?;
        Ok(())
    }
}
