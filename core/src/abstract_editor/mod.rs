//! Deferred, diff-based undo recording.
//!
//! Editing code does not describe its changes. It asks for a snapshot of
//! an entity right before mutating it, and at the next checkpoint the
//! snapshot is compared with the entity's state to produce a reversible
//! command. The pieces:
//!
//! - [`Diffable`]: how one kind of object is snapshotted, diffed and patched
//! - [`PendingRecordingSet`]: snapshots waiting for the next checkpoint
//! - [`ReversibleCommand`]: an immutable forward/backward diff pair
//! - [`EditActionHistory`]: undo/redo stack the commands are registered with
//! - [`SharedRecorder`]: the recording set behind a lock, for `&self` callers
//!
//! Commands locate their entity through a handle on every apply, so a
//! command whose entity has been destroyed is skipped instead of failing
//! the whole history.

mod action;
mod command;
mod diffable;
mod history;
mod pending;
mod shared;
mod target;

#[cfg(test)]
mod fixtures;

pub use action::{AsAny, EditAction, EditActionError, EditActionResult, Editable};
pub use command::ReversibleCommand;
pub use diffable::{DiffError, Diffable, Direction, Patch};
pub use history::{CommandStack, DEFAULT_MAX_UNDO, EditActionHistory};
pub use pending::{CheckpointReport, PendingRecordingSet};
pub use shared::SharedRecorder;
pub use target::{EntityWorld, FocusRouter, Resolve};
