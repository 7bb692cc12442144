//! # Retrace ECS
//!
//! Entity model for the Retrace undo recorder.
//!
//! ## Core Types
//!
//! - [`Entity`]: generational entity handle (slot index + spawn tick)
//! - [`World`]: entity container with per-entity [`Header`] and typed
//!   component columns
//! - [`HeaderKind`]: field-masked diff kind for headers
//! - [`Reflected`]: reflection-based diff kind for any `serde` component
//! - [`FocusRequest`]: focus intents emitted when changes are re-applied
//!
//! ## Recording
//!
//! ```
//! use retrace_core::abstract_editor::{EditActionHistory, PendingRecordingSet};
//! use retrace_ecs::{HeaderKind, World};
//!
//! let mut world = World::new();
//! let crate_entity = world.spawn_named("A");
//! let mut pending = PendingRecordingSet::new();
//! let mut history = EditActionHistory::<World>::default();
//!
//! pending.record::<HeaderKind>(&world, crate_entity, "name").unwrap();
//! world.header_mut(crate_entity).unwrap().name = "B".into();
//! pending.checkpoint(&world, &mut history);
//!
//! history.undo(&mut world).unwrap();
//! assert_eq!(world.header(crate_entity).unwrap().name, "A");
//! ```

pub mod components;
mod entity;
mod focus;
mod reflected;
pub mod serialize;
mod storage;
mod world;

pub use components::{Header, HeaderDiff, HeaderField, HeaderFields, HeaderKind, HeaderValue};
pub use entity::Entity;
pub use focus::{FocusQueue, FocusRequest, MAX_PENDING_FOCUS};
pub use reflected::{Reflect, Reflected, Snapshot};
pub use storage::SparseSet;
pub use world::{World, WorldError};
