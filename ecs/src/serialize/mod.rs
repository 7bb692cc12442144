//! Reflection layer used by composite undo recording.
//!
//! Any `serde`-serializable component can be captured as a [`Value`] tree,
//! compared structurally with [`FieldPatch::between`], and patched back
//! through [`from_value`]. No per-type diff code is needed.
//!
//! - [`Value`]: format-agnostic intermediate representation
//! - [`to_value`] / [`from_value`]: conversion through `serde`
//! - [`FieldPatch`]: sparse list of changed field paths and their new values

mod error;
mod patch;
pub mod value;

pub use error::{DeserializeError, SerializeError};
pub use patch::{FieldPatch, PatchEntry};
pub use value::{Value, from_value, to_value};
