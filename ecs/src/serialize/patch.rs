//! Structural diff between two [`Value`] trees.

use std::fmt;

use retrace_core::abstract_editor::Patch;

use super::error::DeserializeError;
use super::value::Value;

/// One changed field: the key path from the root and what to write there.
///
/// An empty path addresses the root itself. `value` is `None` when the
/// key was removed from its parent map.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchEntry {
    pub path: Vec<String>,
    pub value: Option<Value>,
}

impl PatchEntry {
    /// The path joined with `.`, as used for focus routing and display.
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }

    pub fn is_removal(&self) -> bool {
        self.value.is_none()
    }

    fn parent(&self) -> Option<(&[String], &str)> {
        self.path
            .split_last()
            .map(|(key, parent)| (parent, key.as_str()))
    }
}

/// Sparse structural diff: the fields that differ and their new values.
///
/// Maps are compared key by key. Keys present only in the newer tree become
/// inserts, keys present only in the older tree become removals, and keys
/// in both are compared recursively. Anything else (scalars, lists, a map
/// turning into a non-map) is replaced as a whole. Entries follow the key
/// order of the newer tree, with removals last.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldPatch {
    entries: Vec<PatchEntry>,
}

impl FieldPatch {
    /// Computes the patch that turns `from` into `to`.
    pub fn between(from: &Value, to: &Value) -> Self {
        let mut patch = Self::default();
        let mut path = Vec::new();
        patch.collect(&mut path, from, to);
        patch
    }

    fn collect(&mut self, path: &mut Vec<String>, from: &Value, to: &Value) {
        if let (Value::Map(old), Value::Map(new)) = (from, to) {
            for (key, new_value) in new {
                path.push(key.clone());
                match from.field(key) {
                    Some(old_value) => self.collect(path, old_value, new_value),
                    None => self.push(path, Some(new_value.clone())),
                }
                path.pop();
            }
            for (key, _) in old {
                if to.field(key).is_none() {
                    path.push(key.clone());
                    self.push(path, None);
                    path.pop();
                }
            }
            return;
        }
        if !from.identical(to) {
            self.push(path, Some(to.clone()));
        }
    }

    fn push(&mut self, path: &[String], value: Option<Value>) {
        self.entries.push(PatchEntry {
            path: path.to_vec(),
            value,
        });
    }

    /// Writes every entry onto `target`.
    ///
    /// Replaced keys are overwritten and inserted keys appended to their
    /// parent map; other keys are left as they are. Fails without partial
    /// writes if the parent of any entry is not a map in `target`.
    pub fn apply_to(&self, target: &mut Value) -> Result<(), DeserializeError> {
        let missing = self.entries.iter().find(|e| match e.parent() {
            Some((parent, _)) => !matches!(target.at(parent), Some(Value::Map(_))),
            None => false,
        });
        if let Some(missing) = missing {
            return Err(DeserializeError::MissingField {
                path: missing.dotted(),
            });
        }

        for entry in &self.entries {
            let Some((parent, key)) = entry.parent() else {
                if let Some(value) = &entry.value {
                    *target = value.clone();
                }
                continue;
            };
            let Some(Value::Map(fields)) = target.at_mut(parent) else {
                continue;
            };
            let slot = fields.iter().position(|(k, _)| k == key);
            match (slot, &entry.value) {
                (Some(i), Some(value)) => fields[i].1 = value.clone(),
                (None, Some(value)) => fields.push((key.to_owned(), value.clone())),
                (Some(i), None) => {
                    fields.remove(i);
                }
                (None, None) => {}
            }
        }
        Ok(())
    }

    /// The entry recorded for exactly this key path.
    pub fn entry<S: AsRef<str>>(&self, path: &[S]) -> Option<&PatchEntry> {
        self.entries.iter().find(|e| {
            e.path.len() == path.len() && e.path.iter().zip(path).all(|(a, b)| a == b.as_ref())
        })
    }

    /// The new value written at `path`, if it changed and was not removed.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        self.entry(path)?.value.as_ref()
    }

    pub fn entries(&self) -> &[PatchEntry] {
        &self.entries
    }

    /// Dotted paths of all changed fields, in entry order.
    pub fn paths(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(PatchEntry::dotted)
    }
}

impl Patch for FieldPatch {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for FieldPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<_> = self
            .entries
            .iter()
            .map(|e| {
                if e.is_removal() {
                    format!("-{}", e.dotted())
                } else {
                    e.dotted()
                }
            })
            .collect();
        write!(f, "{{{}}}", paths.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::serialize::{from_value, to_value};

    #[derive(Clone, Serialize)]
    struct Light {
        name: String,
        color: [f32; 3],
        intensity: f32,
        shadow: Shadow,
    }

    #[derive(Clone, Serialize)]
    struct Shadow {
        enabled: bool,
        bias: f32,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Tag {
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        weight: f32,
    }

    fn light() -> Light {
        Light {
            name: "Key".into(),
            color: [1.0, 1.0, 1.0],
            intensity: 2.0,
            shadow: Shadow {
                enabled: true,
                bias: 0.01,
            },
        }
    }

    fn patch<T: Serialize>(from: &T, to: &T) -> FieldPatch {
        FieldPatch::between(&to_value(from).unwrap(), &to_value(to).unwrap())
    }

    #[test]
    fn identical_trees_give_empty_patch() {
        let value = to_value(&light()).unwrap();
        assert!(FieldPatch::between(&value, &value).is_empty());

        let mut nan = light();
        nan.intensity = f32::NAN;
        let value = to_value(&nan).unwrap();
        assert!(FieldPatch::between(&value, &value.clone()).is_empty());
    }

    #[test]
    fn nested_field_gets_full_path() {
        let mut changed = light();
        changed.shadow.bias = 0.5;
        changed.name = "Fill".into();

        let patch = patch(&light(), &changed);
        assert_eq!(patch.len(), 2);
        let paths: Vec<_> = patch.paths().collect();
        assert_eq!(paths, ["name", "shadow.bias"]);
        assert_eq!(patch.get(&["shadow", "bias"]), Some(&Value::F32(0.5)));
        assert_eq!(patch.to_string(), "{name, shadow.bias}");
    }

    #[test]
    fn lists_are_replaced_whole() {
        let mut changed = light();
        changed.color[1] = 0.5;

        let patch = patch(&light(), &changed);
        assert_eq!(patch.paths().collect::<Vec<_>>(), ["color"]);
    }

    #[test]
    fn apply_leaves_unmarked_fields() {
        let mut changed = light();
        changed.intensity = 5.0;
        let patch = patch(&light(), &changed);

        let mut drifted = light();
        drifted.name = "Rim".into();
        let mut target = to_value(&drifted).unwrap();
        patch.apply_to(&mut target).unwrap();

        assert_eq!(target.field("intensity"), Some(&Value::F32(5.0)));
        assert_eq!(target.field("name"), Some(&Value::String("Rim".into())));
    }

    #[test]
    fn scalar_root_uses_empty_path() {
        let patch = FieldPatch::between(&Value::I64(1), &Value::I64(2));
        assert_eq!(patch.entries()[0].path, Vec::<String>::new());

        let mut target = Value::I64(1);
        patch.apply_to(&mut target).unwrap();
        assert_eq!(target, Value::I64(2));
    }

    #[test]
    fn added_and_removed_keys_are_per_key() {
        let before: BTreeMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)].into();
        let after: BTreeMap<String, i32> = [("a".to_string(), 1), ("c".to_string(), 3)].into();

        let forward = patch(&before, &after);
        assert_eq!(forward.to_string(), "{c, -b}");
        assert_eq!(forward.get(&["c"]), Some(&Value::I64(3)));
        assert!(forward.entry(&["b"]).is_some_and(PatchEntry::is_removal));

        let mut drifted: BTreeMap<String, i32> = before.clone();
        drifted.insert("a".into(), 10);
        let mut target = to_value(&drifted).unwrap();
        forward.apply_to(&mut target).unwrap();
        let result: BTreeMap<String, i32> = from_value(target).unwrap();
        assert_eq!(
            result,
            [("a".to_string(), 10), ("c".to_string(), 3)].into()
        );
    }

    #[test]
    fn skipped_option_toggle_keeps_drifted_fields() {
        let before = Tag {
            label: None,
            weight: 1.0,
        };
        let after = Tag {
            label: Some("x".into()),
            weight: 1.0,
        };
        let forward = patch(&before, &after);
        let backward = patch(&after, &before);
        assert_eq!(forward.paths().collect::<Vec<_>>(), ["label"]);

        let drifted = Tag {
            label: None,
            weight: 5.0,
        };
        let mut target = to_value(&drifted).unwrap();
        forward.apply_to(&mut target).unwrap();
        let applied: Tag = from_value(target).unwrap();
        assert_eq!(
            applied,
            Tag {
                label: Some("x".into()),
                weight: 5.0
            }
        );

        let mut target = to_value(&applied).unwrap();
        backward.apply_to(&mut target).unwrap();
        let reverted: Tag = from_value(target).unwrap();
        assert_eq!(reverted, drifted);
    }

    #[test]
    fn dotted_keys_do_not_alias_nested_paths() {
        let before = Value::Map(vec![
            ("a.b".into(), Value::I64(1)),
            ("a".into(), Value::Map(vec![("b".into(), Value::I64(1))])),
        ]);
        let after = Value::Map(vec![
            ("a.b".into(), Value::I64(2)),
            ("a".into(), Value::Map(vec![("b".into(), Value::I64(3))])),
        ]);

        let patch = FieldPatch::between(&before, &after);
        assert_eq!(patch.get(&["a.b"]), Some(&Value::I64(2)));
        assert_eq!(patch.get(&["a", "b"]), Some(&Value::I64(3)));
    }

    #[test]
    fn missing_parent_fails_without_writing() {
        let patch = FieldPatch::between(
            &Value::Map(vec![
                ("a".into(), Value::I64(1)),
                ("gone".into(), Value::Map(vec![("x".into(), Value::I64(1))])),
            ]),
            &Value::Map(vec![
                ("a".into(), Value::I64(2)),
                ("gone".into(), Value::Map(vec![("x".into(), Value::I64(2))])),
            ]),
        );
        let mut target = Value::Map(vec![("a".into(), Value::I64(1))]);

        let err = patch.apply_to(&mut target).unwrap_err();
        assert!(matches!(err, DeserializeError::MissingField { ref path } if path == "gone.x"));
        assert_eq!(target.field("a"), Some(&Value::I64(1)));
    }
}
