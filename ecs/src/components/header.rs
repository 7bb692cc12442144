//! Fixed per-entity header and its field-masked diff.
//!
//! Every entity carries a [`Header`]: display name, local transform and an
//! active flag. Because the field set is fixed, header changes are recorded
//! with an explicit bit mask instead of going through the reflection layer.

use bitflags::bitflags;
use retrace_core::abstract_editor::{DiffError, Diffable, Patch};
use retrace_core::math::{Quat, Vec3, quat_eq, quat_identity, vec3_eq};

/// Name, local transform and active flag of an entity.
///
/// Equality is field by field with [`Header::field_eq`], the same rule the
/// diff uses to decide which fields changed.
#[derive(Debug, Clone)]
pub struct Header {
    pub name: String,
    /// Position relative to parent (or world origin if no parent).
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Inactive entities are kept but skipped by gameplay code.
    pub active: bool,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec3::zeros(),
            rotation: quat_identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            active: true,
        }
    }
}

impl Header {
    /// Creates an active header at the origin with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the given position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Returns a copy with the given rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns a copy with the given scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Reads one field.
    pub fn get(&self, field: HeaderField) -> HeaderValue {
        match field {
            HeaderField::Name => HeaderValue::Name(self.name.clone()),
            HeaderField::Position => HeaderValue::Position(self.position),
            HeaderField::Rotation => HeaderValue::Rotation(self.rotation),
            HeaderField::Scale => HeaderValue::Scale(self.scale),
            HeaderField::Active => HeaderValue::Active(self.active),
        }
    }

    /// Writes one field.
    pub fn set(&mut self, value: HeaderValue) {
        match value {
            HeaderValue::Name(name) => self.name = name,
            HeaderValue::Position(position) => self.position = position,
            HeaderValue::Rotation(rotation) => self.rotation = rotation,
            HeaderValue::Scale(scale) => self.scale = scale,
            HeaderValue::Active(active) => self.active = active,
        }
    }

    /// Compares one field of two headers.
    ///
    /// Strings and flags compare exactly; vectors and rotations compare by
    /// component with [`vec3_eq`] and [`quat_eq`], so a header never differs
    /// from its own snapshot, NaN included.
    pub fn field_eq(&self, other: &Header, field: HeaderField) -> bool {
        match field {
            HeaderField::Name => self.name == other.name,
            HeaderField::Position => vec3_eq(&self.position, &other.position),
            HeaderField::Rotation => quat_eq(&self.rotation, &other.rotation),
            HeaderField::Scale => vec3_eq(&self.scale, &other.scale),
            HeaderField::Active => self.active == other.active,
        }
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        HeaderField::ALL
            .into_iter()
            .all(|field| self.field_eq(other, field))
    }
}

/// One of the five header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Name,
    Position,
    Rotation,
    Scale,
    Active,
}

impl HeaderField {
    /// All fields in diff order.
    pub const ALL: [HeaderField; 5] = [
        Self::Name,
        Self::Position,
        Self::Rotation,
        Self::Scale,
        Self::Active,
    ];

    /// The mask bit for this field.
    pub fn flag(self) -> HeaderFields {
        match self {
            Self::Name => HeaderFields::NAME,
            Self::Position => HeaderFields::POSITION,
            Self::Rotation => HeaderFields::ROTATION,
            Self::Scale => HeaderFields::SCALE,
            Self::Active => HeaderFields::ACTIVE,
        }
    }

    /// Field path used for focus routing.
    pub fn path(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Active => "active",
        }
    }
}

bitflags! {
    /// Set of header fields, used as the change mask of a [`HeaderDiff`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFields: u8 {
        const NAME = 1 << 0;
        const POSITION = 1 << 1;
        const ROTATION = 1 << 2;
        const SCALE = 1 << 3;
        const ACTIVE = 1 << 4;
    }
}

impl Default for HeaderFields {
    fn default() -> Self {
        Self::empty()
    }
}

/// The value of one header field.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Name(String),
    Position(Vec3),
    Rotation(Quat),
    Scale(Vec3),
    Active(bool),
}

impl HeaderValue {
    pub fn field(&self) -> HeaderField {
        match self {
            Self::Name(_) => HeaderField::Name,
            Self::Position(_) => HeaderField::Position,
            Self::Rotation(_) => HeaderField::Rotation,
            Self::Scale(_) => HeaderField::Scale,
            Self::Active(_) => HeaderField::Active,
        }
    }
}

/// Field-masked header diff: which fields changed, and their new values.
///
/// Holds exactly one [`HeaderValue`] per bit in [`changed`](Self::changed),
/// in [`HeaderField::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderDiff {
    changed: HeaderFields,
    values: Vec<HeaderValue>,
}

impl HeaderDiff {
    /// Adds or replaces the value for one field.
    pub fn with(mut self, value: HeaderValue) -> Self {
        let field = value.field();
        self.values.retain(|v| v.field() != field);
        self.changed.insert(field.flag());
        self.values.push(value);
        self.values.sort_by_key(|v| v.field() as u8);
        self
    }

    pub fn changed(&self) -> HeaderFields {
        self.changed
    }

    pub fn contains(&self, field: HeaderField) -> bool {
        self.changed.contains(field.flag())
    }

    /// New value recorded for `field`, if it changed.
    pub fn value(&self, field: HeaderField) -> Option<&HeaderValue> {
        self.values.iter().find(|v| v.field() == field)
    }

    pub fn values(&self) -> &[HeaderValue] {
        &self.values
    }

    /// Writes the marked fields onto `header`, leaving the rest alone.
    pub fn apply_to(&self, header: &mut Header) {
        for value in &self.values {
            header.set(value.clone());
        }
    }
}

impl Patch for HeaderDiff {
    fn len(&self) -> usize {
        self.values.len()
    }
}

/// Diff kind for entity headers.
pub struct HeaderKind;

impl Diffable for HeaderKind {
    type Target = Header;
    type Snapshot = Header;
    type Diff = HeaderDiff;

    fn snapshot(header: &Header) -> Result<Header, DiffError> {
        Ok(header.clone())
    }

    fn diff(from: &Header, to: &Header) -> HeaderDiff {
        HeaderField::ALL
            .into_iter()
            .filter(|&field| !from.field_eq(to, field))
            .fold(HeaderDiff::default(), |diff, field| diff.with(to.get(field)))
    }

    fn apply(header: &mut Header, diff: &HeaderDiff) -> Result<(), DiffError> {
        diff.apply_to(header);
        Ok(())
    }
}
