//! Editable targets and reversible editor actions.
//!
//! This module defines the core abstractions for an undo/redo editor system:
//!
//! - [`Editable`]: marker trait for types that can be edited
//! - [`EditAction`]: a reversible edit operation (Command pattern)
//! - [`EditActionError`] / [`EditActionResult`]: error handling for actions
//!
//! EditActions are self-contained: each implementation internally stores whatever
//! data it needs (target handles, forward and backward diffs, focus paths).

use std::any::Any;
use std::fmt;

/// Helper trait for downcasting trait objects to concrete types.
///
/// Automatically implemented for all `'static` types. Lets callers that
/// hold a `&dyn EditAction<T>` (for example while inspecting the history)
/// recover the concrete action type.
pub trait AsAny: 'static {
    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Marker trait for types that serve as editing targets.
///
/// Implement this on the type that owns the edited entities, such as an
/// ECS world or a scene graph.
///
/// # Example
///
/// ```ignore
/// struct MyScene { /* ... */ }
/// impl Editable for MyScene {}
/// ```
pub trait Editable: 'static {}

/// Error type for action execution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditActionError {
    /// The target object was not found (destroyed since the action was built).
    ///
    /// The history treats this as recoverable: the application is skipped
    /// with a warning and undo/redo traversal continues.
    TargetNotFound(String),
    /// The target is in an invalid state for this action.
    InvalidState(String),
    /// A custom error with a description.
    Custom(String),
}

impl EditActionError {
    /// Returns `true` for failures that only skip one application.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TargetNotFound(_))
    }
}

impl fmt::Display for EditActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound(msg) => write!(f, "target not found: {msg}"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EditActionError {}

/// Result type for action operations.
pub type EditActionResult<T = ()> = Result<T, EditActionError>;

/// A reversible editor action (Command pattern).
///
/// EditActions encapsulate a single logical edit and capture enough state to
/// undo the change and redo it. Each implementation stores its own data
/// internally.
///
/// # Object Safety
///
/// This trait is dyn-compatible so that different action types can be stored
/// in a single [`EditActionHistory`](super::EditActionHistory) undo/redo stack as
/// `Box<dyn EditAction<T>>`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct MoveEntity {
///     entity: Entity,
///     old_pos: Vec3,
///     new_pos: Vec3,
/// }
///
/// impl EditAction<World> for MoveEntity {
///     fn apply(&mut self, target: &mut World) -> EditActionResult {
///         target.set_position(self.entity, self.new_pos);
///         Ok(())
///     }
///
///     fn undo(&mut self, target: &mut World) -> EditActionResult {
///         target.set_position(self.entity, self.old_pos);
///         Ok(())
///     }
///
///     fn description(&self) -> &str {
///         "Move entity"
///     }
/// }
/// ```
pub trait EditAction<T: Editable>: fmt::Debug + AsAny + Send {
    /// Applies the action to the target (forward / redo direction).
    ///
    /// Returns `Ok(())` on success, or an [`EditActionError`] if the action
    /// could not be applied.
    fn apply(&mut self, target: &mut T) -> EditActionResult;

    /// Reverses the action (undo direction).
    ///
    /// Must restore the target to the state before [`apply`](Self::apply)
    /// was called.
    fn undo(&mut self, target: &mut T) -> EditActionResult;

    /// A short, human-readable description for display in the edit menu.
    ///
    /// Examples: `"Move entity"`, `"Edit name"`.
    fn description(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i32,
    }

    impl Editable for Counter {}

    #[derive(Debug)]
    struct Add {
        amount: i32,
    }

    impl EditAction<Counter> for Add {
        fn apply(&mut self, target: &mut Counter) -> EditActionResult {
            target.value += self.amount;
            Ok(())
        }

        fn undo(&mut self, target: &mut Counter) -> EditActionResult {
            target.value -= self.amount;
            Ok(())
        }

        fn description(&self) -> &str {
            "Add"
        }
    }

    #[test]
    fn undo_reverses_apply() {
        let mut counter = Counter { value: 0 };
        let mut action = Add { amount: 5 };
        action.apply(&mut counter).unwrap();
        assert_eq!(counter.value, 5);
        action.undo(&mut counter).unwrap();
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn action_error_display() {
        assert_eq!(
            EditActionError::TargetNotFound("entity 42".into()).to_string(),
            "target not found: entity 42"
        );
        assert_eq!(
            EditActionError::InvalidState("locked".into()).to_string(),
            "invalid state: locked"
        );
        assert_eq!(
            EditActionError::Custom("something went wrong".into()).to_string(),
            "something went wrong"
        );
    }

    #[test]
    fn only_missing_target_is_recoverable() {
        assert!(EditActionError::TargetNotFound("gone".into()).is_recoverable());
        assert!(!EditActionError::InvalidState("bad".into()).is_recoverable());
        assert!(!EditActionError::Custom("oops".into()).is_recoverable());
    }

    #[test]
    fn boxed_action_downcasts() {
        let mut counter = Counter { value: 0 };
        let mut boxed: Box<dyn EditAction<Counter>> = Box::new(Add { amount: 3 });
        boxed.apply(&mut counter).unwrap();
        assert_eq!(counter.value, 3);

        // Deref first: calling `as_any` on the box itself yields the box's type.
        let add = (*boxed).as_any().downcast_ref::<Add>().unwrap();
        assert_eq!(add.amount, 3);
    }
}
