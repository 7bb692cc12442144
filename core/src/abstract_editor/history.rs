//! Undo/redo action history.
//!
//! [`EditActionHistory`] manages a linear undo/redo stack of [`EditAction`] trait
//! objects. When a new action is pushed after undoing, the redo stack is
//! cleared (standard editor behavior).
//!
//! Actions reach the history two ways:
//!
//! - [`CommandStack::register`]: the change already happened (a checkpoint
//!   observed it), so the action is pushed without being applied.
//! - [`EditActionHistory::execute`]: the action performs the change itself
//!   and is pushed only if applying it succeeded.

use std::collections::VecDeque;
use std::fmt;

use super::action::{EditAction, EditActionError, EditActionResult, Editable};

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Receiver of recorded commands.
///
/// The pending recording set hands every non-empty command it builds to
/// its command stack and never applies commands itself; the stack decides
/// when `apply`/`undo` run during undo/redo traversal.
pub trait CommandStack<T: Editable> {
    /// Takes ownership of a command whose forward effect is already visible
    /// on the target.
    fn register(&mut self, action: Box<dyn EditAction<T>>);
}

/// Manages an undo/redo stack of editor actions.
///
/// The undo stack is a bounded [`VecDeque`]: when it exceeds `max_undo`,
/// the oldest action is dropped from the front. The redo stack is an
/// unbounded [`Vec`] (it can never grow larger than the undo stack was).
///
/// An action that fails with [`EditActionError::TargetNotFound`] during
/// undo or redo is skipped with a warning and still moves to the opposite
/// stack, so one destroyed entity never blocks traversal of the rest of the
/// history.
///
/// # Example
///
/// ```ignore
/// let mut history = EditActionHistory::new(50);
/// let mut world = World::new();
///
/// // Record what a checkpoint observed
/// pending.checkpoint(&world, &mut history);
///
/// // Undo the last recorded change
/// history.undo(&mut world).unwrap();
///
/// // Redo it
/// history.redo(&mut world).unwrap();
/// ```
pub struct EditActionHistory<T: Editable> {
    undo_stack: VecDeque<Box<dyn EditAction<T>>>,
    redo_stack: Vec<Box<dyn EditAction<T>>>,
    max_undo: usize,
    /// Tracks distance from the saved state.
    ///
    /// - `Some(0)`: the current state matches the last save.
    /// - `Some(n)` where `n > 0`: `n` undos needed to reach the saved state.
    /// - `Some(n)` where `n < 0`: `|n|` redos needed to reach the saved state.
    /// - `None`: the save point is permanently unreachable
    ///   (e.g. after capacity overflow dropped it, or the redo branch was discarded).
    save_distance: Option<i64>,
}

impl<T: Editable> EditActionHistory<T> {
    /// Creates a new empty action history with the given maximum undo depth.
    ///
    /// When the undo stack exceeds `max_undo`, the oldest action is dropped.
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo,
            save_distance: Some(0),
        }
    }

    /// Applies an action to the target and pushes it onto the undo stack.
    ///
    /// Clears the redo stack. If the action fails, it is not pushed.
    pub fn execute(
        &mut self,
        mut action: Box<dyn EditAction<T>>,
        target: &mut T,
    ) -> EditActionResult {
        action.apply(target)?;
        self.push_new(action);
        Ok(())
    }

    /// Undoes the most recent action.
    ///
    /// Returns an error if the undo stack is empty or the undo failed with
    /// a non-recoverable error; in the latter case the action stays on the
    /// undo stack.
    pub fn undo(&mut self, target: &mut T) -> EditActionResult {
        let mut action = self
            .undo_stack
            .pop_back()
            .ok_or_else(|| EditActionError::Custom("nothing to undo".into()))?;
        if let Err(e) = action.undo(target) {
            if !e.is_recoverable() {
                self.undo_stack.push_back(action);
                return Err(e);
            }
            log::warn!("Undo of '{}' skipped: {e}", action.description());
        }
        self.redo_stack.push(action);
        if let Some(d) = &mut self.save_distance {
            *d -= 1;
        }
        Ok(())
    }

    /// Redoes the most recently undone action.
    ///
    /// Returns an error if the redo stack is empty or the redo failed with
    /// a non-recoverable error; in the latter case the action stays on the
    /// redo stack.
    pub fn redo(&mut self, target: &mut T) -> EditActionResult {
        let mut action = self
            .redo_stack
            .pop()
            .ok_or_else(|| EditActionError::Custom("nothing to redo".into()))?;
        if let Err(e) = action.apply(target) {
            if !e.is_recoverable() {
                self.redo_stack.push(action);
                return Err(e);
            }
            log::warn!("Redo of '{}' skipped: {e}", action.description());
        }
        self.undo_stack.push_back(action);
        if let Some(d) = &mut self.save_distance {
            *d += 1;
        }
        self.drop_overflow();
        Ok(())
    }

    /// Returns `true` if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Returns the action the next [`undo`](Self::undo) would revert.
    pub fn peek_undo(&self) -> Option<&dyn EditAction<T>> {
        self.undo_stack.back().map(|a| &**a)
    }

    /// Returns the action the next [`redo`](Self::redo) would re-apply.
    pub fn peek_redo(&self) -> Option<&dyn EditAction<T>> {
        self.redo_stack.last().map(|a| &**a)
    }

    /// Returns an iterator over undo action descriptions, most recent first.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns an iterator over redo action descriptions, most recent first.
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns the number of actions in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of actions in the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns the maximum undo depth.
    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Records the current state as the saved state.
    ///
    /// After calling this, [`has_unsaved_changes`](Self::has_unsaved_changes)
    /// returns `false` until the history is modified by register, execute,
    /// undo, or redo.
    pub fn mark_saved(&mut self) {
        self.save_distance = Some(0);
    }

    /// Returns `true` if the current state differs from the last saved state.
    ///
    /// A fresh history counts as saved. The save point becomes permanently
    /// unreachable once capacity overflow drops it or the redo branch that
    /// contained it is discarded.
    pub fn has_unsaved_changes(&self) -> bool {
        self.save_distance != Some(0)
    }

    /// Clears both undo and redo stacks.
    ///
    /// If the current state was the saved state (`has_unsaved_changes` was
    /// `false`), it remains so after clearing. Otherwise the save point is
    /// permanently lost.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        if self.save_distance != Some(0) {
            self.save_distance = None;
        }
    }

    /// Pushes a freshly recorded action: discards the redo branch and moves
    /// the save point one step further away.
    fn push_new(&mut self, action: Box<dyn EditAction<T>>) {
        // Clearing the redo stack invalidates a save point that was in redo.
        self.redo_stack.clear();
        if let Some(d) = self.save_distance
            && d < 0
        {
            self.save_distance = None;
        }
        if let Some(d) = &mut self.save_distance {
            *d += 1;
        }
        self.undo_stack.push_back(action);
        self.drop_overflow();
    }

    fn drop_overflow(&mut self) {
        while self.undo_stack.len() > self.max_undo {
            self.undo_stack.pop_front();
            // If the save point was beyond the oldest surviving entry, it's gone.
            if let Some(d) = self.save_distance
                && d > self.undo_stack.len() as i64
            {
                self.save_distance = None;
            }
        }
    }
}

impl<T: Editable> CommandStack<T> for EditActionHistory<T> {
    fn register(&mut self, action: Box<dyn EditAction<T>>) {
        log::debug!("Recorded '{}'", action.description());
        self.push_new(action);
    }
}

impl<T: Editable> Default for EditActionHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl<T: Editable> fmt::Debug for EditActionHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditActionHistory")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_undo", &self.max_undo)
            .field("save_distance", &self.save_distance)
            .finish()
    }
}
