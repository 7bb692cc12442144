//! Snapshot and diff capability for entity kinds.
//!
//! A [`Diffable`] kind knows how to capture an immutable snapshot of its
//! live object, how to compute a sparse [`Patch`] between two snapshots, and
//! how to write such a patch back onto the live object. Snapshots and diffs
//! are associated types, so two snapshots of different kinds can never be
//! diffed against each other.

use std::fmt;

/// Direction in which a recorded change is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Old state to new state (commit / redo).
    Forward,
    /// New state to old state (revert / undo).
    Backward,
}

/// Failure of the capture or apply primitives of a [`Diffable`] kind.
///
/// These indicate a caller bug (a value the reflection layer cannot
/// represent, or a patch that no longer fits its target type), not a
/// runtime race.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The live object could not be captured into a snapshot.
    #[error("failed to capture snapshot: {0}")]
    Capture(String),
    /// A diff could not be written back onto the live object.
    #[error("failed to apply diff: {0}")]
    Apply(String),
}

/// A sparse, directional set of field changes.
pub trait Patch: Clone + fmt::Debug + Send + 'static {
    /// Number of fields this patch writes.
    fn len(&self) -> usize;

    /// Returns `true` if no field differs.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Capture, diff and apply primitives for one entity kind.
///
/// Implemented on a marker type per kind rather than on the live object,
/// so that a single world can expose several kinds on the same entity.
///
/// # Laws
///
/// - `Self::diff(s, s)` is empty for every snapshot `s`.
/// - If `d = Self::diff(a, b)`, applying `d` to an object whose snapshot is
///   `a` yields `b` in every field `d` marks, and leaves the other fields
///   untouched.
pub trait Diffable: 'static {
    /// The live object this kind snapshots.
    type Target: ?Sized;
    /// Immutable capture of the target at one instant.
    type Snapshot: Clone + fmt::Debug + Send + 'static;
    /// Sparse field changes between two snapshots.
    type Diff: Patch;

    /// Captures the current state of `target` without modifying it.
    fn snapshot(target: &Self::Target) -> Result<Self::Snapshot, DiffError>;

    /// Computes the changes that turn `from` into `to`.
    fn diff(from: &Self::Snapshot, to: &Self::Snapshot) -> Self::Diff;

    /// Writes exactly the fields marked in `diff` onto `target`.
    fn apply(target: &mut Self::Target, diff: &Self::Diff) -> Result<(), DiffError>;
}
