//! # Retrace Core
//!
//! Deferred, diff-based undo/redo recording, independent of any particular
//! entity storage. See [`abstract_editor`] for the recording model and
//! [`math`] for the approximate comparisons used by structural diffs.

pub mod abstract_editor;
pub mod math;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
