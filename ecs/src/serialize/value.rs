//! Format-agnostic intermediate value representation.
//!
//! [`to_value`] runs a component's `Serialize` impl against an in-memory
//! serializer and [`from_value`] feeds the tree back through `Deserialize`.
//! Structs and maps become [`Value::Map`] with fields in declaration order;
//! enum variants with data become a single-entry map keyed by the variant.

use std::fmt;

use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Serialize};

use super::error::{DeserializeError, SerializeError};

/// Format-agnostic value representation for component fields.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Looks up a direct field of a map value.
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Self::Map(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Follows a path of map keys from this value.
    pub fn at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |value, key| value.field(key.as_ref()))
    }

    pub fn at_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Value> {
        path.iter()
            .try_fold(self, |value, key| value.field_mut(key.as_ref()))
    }

    /// Structural identity. Floats compare by bit pattern, so a value is
    /// always identical to itself (NaN included) and `0.0` differs from
    /// `-0.0`.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.identical(vb))
            }
            _ => self == other,
        }
    }
}

// ---------------------------------------------------------------------------
// to_value / from_value
// ---------------------------------------------------------------------------

/// Convert any `T: Serialize` into a [`Value`].
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, SerializeError> {
    value
        .serialize(ValueSerializer)
        .map_err(|e| SerializeError::Custom {
            component: std::any::type_name::<T>(),
            message: e.0,
        })
}

/// Convert a [`Value`] back into any `T: DeserializeOwned`.
pub fn from_value<T: de::DeserializeOwned>(value: Value) -> Result<T, DeserializeError> {
    T::deserialize(value).map_err(|e| DeserializeError::Custom {
        component: std::any::type_name::<T>(),
        message: e.0,
    })
}

/// Error carried through serde's error plumbing.
#[derive(Debug)]
pub struct ValueError(String);

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValueError {}

impl ser::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

impl de::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

// ---------------------------------------------------------------------------
// Serializer: T -> Value
// ---------------------------------------------------------------------------

struct ValueSerializer;

macro_rules! widen {
    ($($method:ident($ty:ty) => $variant:ident as $wide:ty;)*) => {
        $(
            fn $method(self, v: $ty) -> Result<Value, ValueError> {
                Ok(Value::$variant(<$wide>::from(v)))
            }
        )*
    };
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValueError;
    type SerializeSeq = ListBuilder;
    type SerializeTuple = ListBuilder;
    type SerializeTupleStruct = ListBuilder;
    type SerializeTupleVariant = Tagged<ListBuilder>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = Tagged<MapBuilder>;

    widen! {
        serialize_bool(bool) => Bool as bool;
        serialize_i8(i8) => I64 as i64;
        serialize_i16(i16) => I64 as i64;
        serialize_i32(i32) => I64 as i64;
        serialize_i64(i64) => I64 as i64;
        serialize_u8(u8) => U64 as u64;
        serialize_u16(u16) => U64 as u64;
        serialize_u32(u32) => U64 as u64;
        serialize_u64(u64) => U64 as u64;
        serialize_f32(f32) => F32 as f32;
        serialize_f64(f64) => F64 as f64;
    }

    fn serialize_char(self, v: char) -> Result<Value, ValueError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ValueError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, ValueError> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, ValueError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, ValueError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, ValueError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, ValueError> {
        Ok(Value::Map(vec![(
            variant.to_owned(),
            value.serialize(ValueSerializer)?,
        )]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListBuilder, ValueError> {
        Ok(ListBuilder(Vec::with_capacity(len.unwrap_or(0))))
    }

    fn serialize_tuple(self, len: usize) -> Result<ListBuilder, ValueError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<ListBuilder, ValueError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Tagged<ListBuilder>, ValueError> {
        Ok(Tagged {
            variant,
            inner: ListBuilder(Vec::with_capacity(len)),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, ValueError> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapBuilder, ValueError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Tagged<MapBuilder>, ValueError> {
        Ok(Tagged {
            variant,
            inner: MapBuilder {
                entries: Vec::with_capacity(len),
                key: None,
            },
        })
    }
}

struct ListBuilder(Vec<Value>);

impl ListBuilder {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        self.0.push(value.serialize(ValueSerializer)?);
        Ok(())
    }
}

impl ser::SerializeSeq for ListBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::List(self.0))
    }
}

impl ser::SerializeTuple for ListBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::List(self.0))
    }
}

impl ser::SerializeTupleStruct for ListBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::List(self.0))
    }
}

struct MapBuilder {
    entries: Vec<(String, Value)>,
    key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), ValueError> {
        self.key = Some(match key.serialize(ValueSerializer)? {
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::I64(n) => n.to_string(),
            Value::U64(n) => n.to_string(),
            other => {
                return Err(ValueError(format!(
                    "map keys must be strings, integers or bools, found {}",
                    other.kind()
                )));
            }
        });
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        let key = self
            .key
            .take()
            .ok_or_else(|| ValueError("serialize_value called before serialize_key".into()))?;
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::Map(self.entries))
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ValueError> {
        self.entries
            .push((key.to_owned(), value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::Map(self.entries))
    }
}

/// Builder for enum variants with data; wraps the payload in a
/// single-entry map keyed by the variant name.
struct Tagged<B> {
    variant: &'static str,
    inner: B,
}

impl<B> Tagged<B> {
    fn wrap(variant: &'static str, payload: Value) -> Value {
        Value::Map(vec![(variant.to_owned(), payload)])
    }
}

impl ser::SerializeTupleVariant for Tagged<ListBuilder> {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        self.inner.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Self::wrap(self.variant, Value::List(self.inner.0)))
    }
}

impl ser::SerializeStructVariant for Tagged<MapBuilder> {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ValueError> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Self::wrap(self.variant, Value::Map(self.inner.entries)))
    }
}

// ---------------------------------------------------------------------------
// Deserializer: Value -> T
// ---------------------------------------------------------------------------

impl<'de> de::Deserializer<'de> for Value {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(v),
            Value::I64(v) => visitor.visit_i64(v),
            Value::U64(v) => visitor.visit_u64(v),
            Value::F32(v) => visitor.visit_f32(v),
            Value::F64(v) => visitor.visit_f64(v),
            Value::String(v) => visitor.visit_string(v),
            Value::Bytes(v) => visitor.visit_byte_buf(v),
            Value::List(items) => visitor.visit_seq(ListAccess(items.into_iter())),
            Value::Map(entries) => visitor.visit_map(EntryAccess {
                iter: entries.into_iter(),
                value: None,
            }),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        match self {
            Value::String(variant) => visitor.visit_enum(VariantAccess {
                variant,
                payload: None,
            }),
            Value::Map(entries) => {
                let mut entries = entries.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, payload)), None) => visitor.visit_enum(VariantAccess {
                        variant,
                        payload: Some(payload),
                    }),
                    _ => Err(ValueError("enum map must have exactly one entry".into())),
                }
            }
            other => Err(ValueError(format!(
                "expected string or map for enum, found {}",
                other.kind()
            ))),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, ValueError> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

struct ListAccess(std::vec::IntoIter<Value>);

impl<'de> SeqAccess<'de> for ListAccess {
    type Error = ValueError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, ValueError> {
        self.0.next().map(|v| seed.deserialize(v)).transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

struct EntryAccess {
    iter: std::vec::IntoIter<(String, Value)>,
    value: Option<Value>,
}

impl<'de> MapAccess<'de> for EntryAccess {
    type Error = ValueError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, ValueError> {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.value = Some(value);
        seed.deserialize(MapKey(key)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, ValueError> {
        let value = self
            .value
            .take()
            .ok_or_else(|| ValueError("next_value_seed called before next_key_seed".into()))?;
        seed.deserialize(value)
    }
}

/// Map key deserializer. Keys are stored as strings; integer and bool keys
/// are parsed back on request.
struct MapKey(String);

macro_rules! parse_key {
    ($($method:ident => $visit:ident($ty:ty);)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
                match self.0.parse::<$ty>() {
                    Ok(v) => visitor.$visit(v),
                    Err(_) => Err(ValueError(format!(
                        "map key '{}' is not a valid {}",
                        self.0,
                        stringify!($ty)
                    ))),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKey {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        visitor.visit_string(self.0)
    }

    parse_key! {
        deserialize_bool => visit_bool(bool);
        deserialize_i8 => visit_i64(i64);
        deserialize_i16 => visit_i64(i64);
        deserialize_i32 => visit_i64(i64);
        deserialize_i64 => visit_i64(i64);
        deserialize_u8 => visit_u64(u64);
        deserialize_u16 => visit_u64(u64);
        deserialize_u32 => visit_u64(u64);
        deserialize_u64 => visit_u64(u64);
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        visitor.visit_enum(VariantAccess {
            variant: self.0,
            payload: None,
        })
    }

    serde::forward_to_deserialize_any! {
        i128 u128 f32 f64 char str string bytes byte_buf option unit unit_struct
        seq tuple tuple_struct map struct identifier ignored_any
    }
}

/// Enum access over a variant name and its optional payload.
struct VariantAccess {
    variant: String,
    payload: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for VariantAccess {
    type Error = ValueError;
    type Variant = Payload;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Payload), ValueError> {
        let variant = seed.deserialize(Value::String(self.variant))?;
        Ok((variant, Payload(self.payload)))
    }
}

/// Data carried by an enum variant, if any.
struct Payload(Option<Value>);

impl<'de> de::VariantAccess<'de> for Payload {
    type Error = ValueError;

    fn unit_variant(self) -> Result<(), ValueError> {
        match self.0 {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(ValueError(format!(
                "expected unit variant, found {}",
                other.kind()
            ))),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, ValueError> {
        match self.0 {
            Some(payload) => seed.deserialize(payload),
            None => Err(ValueError("expected newtype variant".into())),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, ValueError> {
        match self.0 {
            Some(Value::List(items)) => visitor.visit_seq(ListAccess(items.into_iter())),
            _ => Err(ValueError("expected tuple variant".into())),
        }
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        match self.0 {
            Some(Value::Map(entries)) => visitor.visit_map(EntryAccess {
                iter: entries.into_iter(),
                value: None,
            }),
            _ => Err(ValueError("expected struct variant".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Inner {
        value: f64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Outer {
        name: String,
        inner: Inner,
        items: Vec<i32>,
        tag: Option<u8>,
    }

    fn outer() -> Outer {
        Outer {
            name: "test".to_string(),
            inner: Inner { value: 99.9 },
            items: vec![1, 2, 3],
            tag: None,
        }
    }

    #[test]
    fn struct_becomes_ordered_map() {
        let value = to_value(&outer()).unwrap();
        let Value::Map(entries) = &value else {
            panic!("expected map, got {value:?}");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["name", "inner", "items", "tag"]);
        assert_eq!(value.at(&["inner", "value"]), Some(&Value::F64(99.9)));
        assert_eq!(value.field("tag"), Some(&Value::Null));
    }

    #[test]
    fn roundtrip_nested() {
        let restored: Outer = from_value(to_value(&outer()).unwrap()).unwrap();
        assert_eq!(restored, outer());
    }

    #[test]
    fn roundtrip_enum_shapes() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        enum Shape {
            Empty,
            Circle(f32),
            Segment(i32, i32),
            Rect { w: u16, h: u16 },
        }
        for shape in [
            Shape::Empty,
            Shape::Circle(1.5),
            Shape::Segment(-1, 4),
            Shape::Rect { w: 2, h: 3 },
        ] {
            let value = to_value(&shape).unwrap();
            assert_eq!(from_value::<Shape>(value).unwrap(), shape);
        }
    }

    #[test]
    fn integer_map_keys_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert(3u32, "three".to_string());
        map.insert(7u32, "seven".to_string());

        let value = to_value(&map).unwrap();
        assert_eq!(value.field("7"), Some(&Value::String("seven".into())));
        assert_eq!(from_value::<BTreeMap<u32, String>>(value).unwrap(), map);
    }

    #[test]
    fn mismatched_shape_is_an_error() {
        let err = from_value::<Inner>(Value::Bool(true)).unwrap_err();
        assert!(matches!(err, DeserializeError::Custom { .. }));
    }

    #[test]
    fn identical_is_reflexive_for_nan() {
        let value = Value::List(vec![Value::F32(f32::NAN), Value::F64(f64::NAN)]);
        assert!(value.identical(&value.clone()));
        assert_ne!(value, value.clone());
        assert!(!Value::F32(0.0).identical(&Value::F32(-0.0)));
    }
}
