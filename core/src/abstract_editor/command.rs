//! Immutable command replaying a recorded pair of diffs.

use std::fmt;
use std::marker::PhantomData;

use super::action::{EditAction, EditActionError, EditActionResult};
use super::diffable::{Diffable, Direction};
use super::target::{EntityWorld, FocusRouter, Resolve};

/// A recorded change to one entity, applicable in either direction.
///
/// Holds the entity handle, the field path that was being edited, and the
/// forward (old → new) and backward (new → old) diffs computed when the
/// change was recorded. Nothing is recomputed on apply: each direction
/// writes exactly the fields its diff marks, even if unrelated fields of
/// the entity changed in the meantime.
///
/// After a successful apply the command routes focus back to the edited
/// entity and, when the focus path is non-empty, to that field.
pub struct ReversibleCommand<W, K>
where
    W: Resolve<K>,
    K: Diffable,
{
    handle: W::Handle,
    focus_path: String,
    description: String,
    forward: K::Diff,
    backward: K::Diff,
    _kind: PhantomData<fn() -> K>,
}

impl<W, K> ReversibleCommand<W, K>
where
    W: Resolve<K> + FocusRouter<<W as EntityWorld>::Handle>,
    K: Diffable,
{
    /// Builds a command from diffs computed by the caller.
    ///
    /// Emptiness is not checked here; the pending recording set never
    /// builds commands from an empty forward diff.
    pub fn new(
        handle: W::Handle,
        focus_path: impl Into<String>,
        forward: K::Diff,
        backward: K::Diff,
    ) -> Self {
        let focus_path = focus_path.into();
        let description = if focus_path.is_empty() {
            "Edit entity".to_owned()
        } else {
            format!("Edit {focus_path}")
        };
        Self {
            handle,
            focus_path,
            description,
            forward,
            backward,
            _kind: PhantomData,
        }
    }

    pub fn handle(&self) -> W::Handle {
        self.handle
    }

    pub fn focus_path(&self) -> &str {
        &self.focus_path
    }

    /// Old → new changes.
    pub fn forward(&self) -> &K::Diff {
        &self.forward
    }

    /// New → old changes.
    pub fn backward(&self) -> &K::Diff {
        &self.backward
    }

    /// The diff applied when moving in `direction`.
    pub fn diff(&self, direction: Direction) -> &K::Diff {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    /// Writes the diff for `direction` onto the entity, then routes focus.
    ///
    /// Returns [`EditActionError::TargetNotFound`] without touching the
    /// world when the entity no longer resolves; callers treat that as a
    /// skipped application. A diff the entity can no longer accept is
    /// reported as [`EditActionError::InvalidState`].
    pub fn apply(&self, world: &mut W, direction: Direction) -> EditActionResult {
        let Some(target) = world.resolve_mut(self.handle) else {
            return Err(EditActionError::TargetNotFound(format!(
                "{:?} was destroyed",
                self.handle
            )));
        };
        K::apply(target, self.diff(direction))
            .map_err(|e| EditActionError::InvalidState(e.to_string()))?;

        world.select_entity(self.handle);
        if !self.focus_path.is_empty() {
            world.focus_field(self.handle, &self.focus_path);
        }
        Ok(())
    }

    /// Applies the forward diff.
    pub fn commit(&self, world: &mut W) -> EditActionResult {
        self.apply(world, Direction::Forward)
    }

    /// Applies the backward diff.
    pub fn revert(&self, world: &mut W) -> EditActionResult {
        self.apply(world, Direction::Backward)
    }
}

impl<W, K> EditAction<W> for ReversibleCommand<W, K>
where
    W: Resolve<K> + FocusRouter<<W as EntityWorld>::Handle>,
    K: Diffable,
{
    fn apply(&mut self, target: &mut W) -> EditActionResult {
        self.commit(target)
    }

    fn undo(&mut self, target: &mut W) -> EditActionResult {
        self.revert(target)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<W, K> fmt::Debug for ReversibleCommand<W, K>
where
    W: Resolve<K>,
    K: Diffable,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReversibleCommand")
            .field("handle", &self.handle)
            .field("focus_path", &self.focus_path)
            .field("forward", &self.forward)
            .field("backward", &self.backward)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_editor::fixtures::{Board, Slider, SliderDiff, SliderKind};
    use crate::abstract_editor::history::{CommandStack, EditActionHistory};

    type SliderCommand = ReversibleCommand<Board, SliderKind>;

    fn rename(from: &str, to: &str) -> SliderCommand {
        SliderCommand::new(
            0,
            "label",
            SliderDiff {
                label: Some(to.into()),
                value: None,
            },
            SliderDiff {
                label: Some(from.into()),
                value: None,
            },
        )
    }

    #[test]
    fn commit_and_revert_write_only_marked_fields() {
        let mut board = Board::with(&[Slider::new("A", 1)]);
        let command = rename("A", "B");

        command.commit(&mut board).unwrap();
        assert_eq!(board.slider(0), &Slider::new("B", 1));

        // Unrelated drift is left alone in both directions.
        board.slider_mut(0).value = 7;
        command.revert(&mut board).unwrap();
        assert_eq!(board.slider(0), &Slider::new("A", 7));
    }

    #[test]
    fn apply_routes_focus() {
        let mut board = Board::with(&[Slider::new("A", 1)]);
        rename("A", "B").commit(&mut board).unwrap();
        assert_eq!(board.focus, vec!["select 0", "focus 0 label"]);

        let unfocused = SliderCommand::new(0, "", SliderDiff::default(), SliderDiff::default());
        board.focus.clear();
        unfocused.revert(&mut board).unwrap();
        assert_eq!(board.focus, vec!["select 0"]);
        assert_eq!(unfocused.description(), "Edit entity");
    }

    #[test]
    fn destroyed_target_is_reported_not_applied() {
        let mut board = Board::with(&[Slider::new("A", 1)]);
        board.destroy(0);

        let err = rename("A", "B").commit(&mut board).unwrap_err();
        assert!(matches!(err, EditActionError::TargetNotFound(_)));
        assert!(err.is_recoverable());
        assert!(board.focus.is_empty());
    }

    #[test]
    fn diff_by_direction() {
        let command = rename("A", "B");
        assert_eq!(command.diff(Direction::Forward).label.as_deref(), Some("B"));
        assert_eq!(command.diff(Direction::Backward).label.as_deref(), Some("A"));
        assert_eq!(command.handle(), 0);
        assert_eq!(command.focus_path(), "label");
        assert_eq!(command.description(), "Edit label");
    }

    #[test]
    fn undo_redo_through_history() {
        let mut board = Board::with(&[Slider::new("B", 1)]);
        let mut history = EditActionHistory::<Board>::default();
        history.register(Box::new(rename("A", "B")));

        history.undo(&mut board).unwrap();
        assert_eq!(board.slider(0).label, "A");
        history.redo(&mut board).unwrap();
        assert_eq!(board.slider(0).label, "B");
    }
}
