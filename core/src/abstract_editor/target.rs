//! Traits a world implements so recorded changes can find their entities.
//!
//! Commands and pending recordings never own the entities they edit. They
//! hold a handle and look it up again every time through [`Resolve`]; a
//! handle that no longer resolves means the entity was destroyed.

use std::fmt;

use super::action::Editable;
use super::diffable::Diffable;

/// An editable world addressed through copyable entity handles.
pub trait EntityWorld: Editable {
    /// Non-owning entity identifier.
    type Handle: Copy + Eq + fmt::Debug + Send + 'static;

    /// Returns `true` if `handle` no longer refers to a live entity.
    fn is_destroyed(&self, handle: Self::Handle) -> bool;
}

/// Lookup of the object of kind `K` attached to an entity.
///
/// Returns `None` when the entity was destroyed or does not carry a `K`.
pub trait Resolve<K: Diffable>: EntityWorld {
    fn resolve(&self, handle: Self::Handle) -> Option<&K::Target>;

    fn resolve_mut(&mut self, handle: Self::Handle) -> Option<&mut K::Target>;
}

/// Receiver for focus intents emitted after a command is applied.
///
/// Fire-and-forget: the command does not inspect any result. Whatever UI
/// observes the router decides how to render the selection.
pub trait FocusRouter<H> {
    /// Select the edited entity.
    fn select_entity(&mut self, handle: H);

    /// Route keyboard/selection focus to a field path on the entity.
    fn focus_field(&mut self, handle: H, path: &str);
}
