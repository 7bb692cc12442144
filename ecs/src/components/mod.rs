mod header;

pub use header::{Header, HeaderDiff, HeaderField, HeaderFields, HeaderKind, HeaderValue};
