//! Deferred recording: snapshot now, diff at the next checkpoint.
//!
//! Inspector code calls [`PendingRecordingSet::record`] right before it
//! mutates an entity. Once per frame the owner calls
//! [`PendingRecordingSet::checkpoint`], which compares every snapshot with
//! the entity's state at that moment and registers a [`ReversibleCommand`]
//! for each entity that actually changed.

use std::fmt;
use std::marker::PhantomData;

use super::action::EditAction;
use super::command::ReversibleCommand;
use super::diffable::{DiffError, Diffable, Patch};
use super::history::CommandStack;
use super::target::{EntityWorld, FocusRouter, Resolve};

/// Counts of what one [`checkpoint`](PendingRecordingSet::checkpoint) did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckpointReport {
    /// Commands handed to the command stack.
    pub emitted: usize,
    /// Entries skipped because their entity was destroyed.
    pub destroyed: usize,
    /// Entries whose entity did not change.
    pub unchanged: usize,
    /// Entries whose current state could not be captured.
    pub failed: usize,
}

impl CheckpointReport {
    /// Number of pending entries the checkpoint consumed.
    pub fn processed(&self) -> usize {
        self.emitted + self.destroyed + self.unchanged + self.failed
    }
}

/// What resolving one pending entry produced.
enum Resolution<W: EntityWorld> {
    Emit(Box<dyn EditAction<W>>),
    Destroyed,
    Unchanged,
    Failed(DiffError),
}

/// Type-erased pending entry, so entries of different kinds share one list.
trait PendingEntry<W: EntityWorld>: fmt::Debug + Send {
    fn handle(&self) -> W::Handle;

    fn resolve(self: Box<Self>, world: &W) -> Resolution<W>;
}

struct Entry<W: EntityWorld, K: Diffable> {
    handle: W::Handle,
    focus_path: String,
    snapshot: K::Snapshot,
    _kind: PhantomData<fn() -> K>,
}

impl<W, K> PendingEntry<W> for Entry<W, K>
where
    W: Resolve<K> + FocusRouter<<W as EntityWorld>::Handle>,
    K: Diffable,
{
    fn handle(&self) -> W::Handle {
        self.handle
    }

    fn resolve(self: Box<Self>, world: &W) -> Resolution<W> {
        if world.is_destroyed(self.handle) {
            return Resolution::Destroyed;
        }
        let Some(target) = world.resolve(self.handle) else {
            return Resolution::Destroyed;
        };
        let current = match K::snapshot(target) {
            Ok(current) => current,
            Err(e) => return Resolution::Failed(e),
        };

        let forward = K::diff(&self.snapshot, &current);
        if forward.is_empty() {
            return Resolution::Unchanged;
        }
        let backward = K::diff(&current, &self.snapshot);
        let Entry {
            handle, focus_path, ..
        } = *self;
        Resolution::Emit(Box::new(ReversibleCommand::<W, K>::new(
            handle, focus_path, forward, backward,
        )))
    }
}

impl<W: EntityWorld, K: Diffable> fmt::Debug for Entry<W, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("handle", &self.handle)
            .field("focus_path", &self.focus_path)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

/// Snapshots taken since the last checkpoint, in recording order.
///
/// Owned explicitly by whatever drives the frame loop; there is no global
/// instance. Entries are never coalesced: recording the same entity twice
/// yields two entries, each diffed independently against the state at the
/// checkpoint.
pub struct PendingRecordingSet<W: EntityWorld> {
    entries: Vec<Box<dyn PendingEntry<W>>>,
}

impl<W: EntityWorld> PendingRecordingSet<W> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Snapshots the current state of the `K` object on `handle` and queues
    /// it for the next checkpoint.
    ///
    /// Returns `Ok(false)` without queuing anything when the handle does not
    /// resolve (the entity is already destroyed). Returns an error when the
    /// object cannot be captured at all, which is a bug in the caller's
    /// component type rather than a runtime condition.
    pub fn record<K>(
        &mut self,
        world: &W,
        handle: W::Handle,
        focus_path: impl Into<String>,
    ) -> Result<bool, DiffError>
    where
        W: Resolve<K> + FocusRouter<<W as EntityWorld>::Handle>,
        K: Diffable,
    {
        let Some(target) = world.resolve(handle) else {
            log::warn!("Cannot record {handle:?}: entity is destroyed");
            return Ok(false);
        };
        let snapshot = K::snapshot(target)?;
        self.entries.push(Box::new(Entry::<W, K> {
            handle,
            focus_path: focus_path.into(),
            snapshot,
            _kind: PhantomData,
        }));
        Ok(true)
    }

    /// Resolves every pending entry against the current state of `world`.
    ///
    /// Entries are processed in recording order. Destroyed entities are
    /// skipped with a warning, unchanged ones silently, and entries whose
    /// current state cannot be captured are logged as errors; none of these
    /// stop the remaining entries. Every changed entity yields one command
    /// registered with `stack`. The set is empty afterwards in all cases.
    pub fn checkpoint<S>(&mut self, world: &W, stack: &mut S) -> CheckpointReport
    where
        S: CommandStack<W> + ?Sized,
    {
        let mut report = CheckpointReport::default();
        for entry in std::mem::take(&mut self.entries) {
            let handle = entry.handle();
            match entry.resolve(world) {
                Resolution::Emit(command) => {
                    log::debug!("Recorded '{}' for {handle:?}", command.description());
                    stack.register(command);
                    report.emitted += 1;
                }
                Resolution::Destroyed => {
                    log::warn!("Dropped recording for {handle:?}: entity was destroyed");
                    report.destroyed += 1;
                }
                Resolution::Unchanged => {
                    log::trace!("No changes recorded for {handle:?}");
                    report.unchanged += 1;
                }
                Resolution::Failed(e) => {
                    log::error!("Dropped recording for {handle:?}: {e}");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Drops all pending entries without resolving them.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is waiting for a checkpoint.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<W: EntityWorld> Default for PendingRecordingSet<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: EntityWorld> fmt::Debug for PendingRecordingSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRecordingSet")
            .field("pending", &self.entries.len())
            .finish()
    }
}
