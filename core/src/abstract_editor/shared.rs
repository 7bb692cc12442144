//! Lock-guarded recording set for hosts that record from several threads.
//!
//! [`SharedRecorder`] wraps a [`PendingRecordingSet`] in a [`Mutex`] so that
//! inspector code holding only `&self` can still queue recordings. The frame
//! loop checkpoints it once per frame, exactly like the unlocked set.

use std::fmt;

use parking_lot::Mutex;

use super::diffable::{DiffError, Diffable};
use super::history::CommandStack;
use super::pending::{CheckpointReport, PendingRecordingSet};
use super::target::{EntityWorld, FocusRouter, Resolve};

/// A [`PendingRecordingSet`] behind a mutex.
///
/// The lock is held for the duration of a single `record` or `checkpoint`
/// call, so a checkpoint sees either all or none of a concurrent
/// recording.
pub struct SharedRecorder<W: EntityWorld> {
    pending: Mutex<PendingRecordingSet<W>>,
}

impl<W: EntityWorld> SharedRecorder<W> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(PendingRecordingSet::new()),
        }
    }

    /// Locked [`PendingRecordingSet::record`].
    pub fn record<K>(
        &self,
        world: &W,
        handle: W::Handle,
        focus_path: impl Into<String>,
    ) -> Result<bool, DiffError>
    where
        W: Resolve<K> + FocusRouter<<W as EntityWorld>::Handle>,
        K: Diffable,
    {
        self.pending.lock().record::<K>(world, handle, focus_path)
    }

    /// Locked [`PendingRecordingSet::checkpoint`].
    pub fn checkpoint<S>(&self, world: &W, stack: &mut S) -> CheckpointReport
    where
        S: CommandStack<W> + ?Sized,
    {
        self.pending.lock().checkpoint(world, stack)
    }

    /// Drops all pending entries.
    pub fn clear(&self) {
        self.pending.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Unwraps the inner set.
    pub fn into_inner(self) -> PendingRecordingSet<W> {
        self.pending.into_inner()
    }
}

impl<W: EntityWorld> Default for SharedRecorder<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: EntityWorld> From<PendingRecordingSet<W>> for SharedRecorder<W> {
    fn from(pending: PendingRecordingSet<W>) -> Self {
        Self {
            pending: Mutex::new(pending),
        }
    }
}

impl<W: EntityWorld> fmt::Debug for SharedRecorder<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRecorder")
            .field("pending", &self.len())
            .finish()
    }
}
