//! Focus intents emitted when undo/redo re-applies a change.

use std::collections::VecDeque;

use crate::entity::Entity;

/// Most requests kept between drains; older ones are dropped first.
pub const MAX_PENDING_FOCUS: usize = 256;

/// A request for the editor UI to move its focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusRequest {
    /// Select the entity in the hierarchy/inspector.
    Select(Entity),
    /// Scroll to and highlight a field of the entity.
    Field(Entity, String),
}

/// Ordered queue of focus requests plus the current selection.
///
/// The world only records intents; the UI drains them once per frame.
/// A host that never drains keeps only the newest [`MAX_PENDING_FOCUS`].
#[derive(Debug, Default)]
pub struct FocusQueue {
    requests: VecDeque<FocusRequest>,
    selected: Option<Entity>,
}

impl FocusQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, entity: Entity) {
        self.selected = Some(entity);
        self.push(FocusRequest::Select(entity));
    }

    pub fn focus_field(&mut self, entity: Entity, path: &str) {
        self.push(FocusRequest::Field(entity, path.to_owned()));
    }

    fn push(&mut self, request: FocusRequest) {
        if self.requests.len() == MAX_PENDING_FOCUS {
            self.requests.pop_front();
        }
        self.requests.push_back(request);
    }

    /// The most recently selected entity.
    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    /// Forgets the selection if it points at `entity`.
    pub fn deselect(&mut self, entity: Entity) {
        if self.selected == Some(entity) {
            self.selected = None;
        }
    }

    /// Takes all pending requests in submission order.
    pub fn drain(&mut self) -> Vec<FocusRequest> {
        self.requests.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
