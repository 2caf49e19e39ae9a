//! Navigation paths inside a JSON document.

use std::fmt;

use serde_json::Value;

use crate::error::EditorError;

/// One step of a navigation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Property of an object.
    Field(String),
    /// Element of an array.
    Index(usize),
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Field(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Field(value)
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Index(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(name) => write!(f, "{name}"),
            Key::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// Position of the editor in the configuration tree.
///
/// `keys` address the value inside the document currently being edited.
/// `base` is only non-empty while a value is under construction in a
/// draft: it holds the location the draft will be inserted at, so headers
/// and validation diagnostics still show the full location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavPath {
    base: Vec<Key>,
    keys: Vec<Key>,
}

impl NavPath {
    /// Path of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Root path of a draft that will end up at the location of `at`.
    pub fn draft(at: &NavPath) -> Self {
        Self {
            base: at.location(),
            keys: Vec::new(),
        }
    }

    /// Path of a child of this position.
    pub fn child(&self, key: impl Into<Key>) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key.into());
        Self {
            base: self.base.clone(),
            keys,
        }
    }

    /// Keys relative to the current document.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Full location, including the draft base.
    pub fn location(&self) -> Vec<Key> {
        let mut loc = self.base.clone();
        loc.extend(self.keys.iter().cloned());
        loc
    }

    /// Last key of the full location.
    pub fn last(&self) -> Option<&Key> {
        self.keys.last().or_else(|| self.base.last())
    }

    /// Location as a dot-separated string.
    pub fn dotted(&self) -> String {
        self.location()
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for NavPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// Render a location the way headers show it: `root."key".0`.
pub fn display_location(root: &str, location: &[Key]) -> String {
    let mut out = root.to_string();
    for key in location {
        match key {
            Key::Field(name) => out.push_str(&format!(".\"{name}\"")),
            Key::Index(idx) => out.push_str(&format!(".{idx}")),
        }
    }
    out
}

/// Resolve `keys` inside `root`.
pub fn lookup<'v>(root: &'v Value, keys: &[Key]) -> Option<&'v Value> {
    keys.iter().try_fold(root, |cur, key| match (key, cur) {
        (Key::Field(name), Value::Object(map)) => map.get(name),
        (Key::Index(idx), Value::Array(arr)) => arr.get(*idx),
        _ => None,
    })
}

/// Resolve `keys` inside `root` mutably.
pub fn lookup_mut<'v>(root: &'v mut Value, keys: &[Key]) -> Option<&'v mut Value> {
    keys.iter().try_fold(root, |cur, key| match (key, cur) {
        (Key::Field(name), Value::Object(map)) => map.get_mut(name),
        (Key::Index(idx), Value::Array(arr)) => arr.get_mut(*idx),
        _ => None,
    })
}

/// Write `value` at `keys`, replacing the previous value.
///
/// Object properties are inserted when missing; array elements may be
/// appended by addressing `len`.
pub fn assign(root: &mut Value, keys: &[Key], value: Value) -> Result<(), EditorError> {
    let Some((last, parent_keys)) = keys.split_last() else {
        *root = value;
        return Ok(());
    };
    let invalid = || EditorError::InvalidPath {
        path: keys
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join("."),
    };
    let parent = lookup_mut(root, parent_keys).ok_or_else(invalid)?;
    match (last, parent) {
        (Key::Field(name), Value::Object(map)) => {
            map.insert(name.clone(), value);
            Ok(())
        }
        (Key::Index(idx), Value::Array(arr)) if *idx < arr.len() => {
            arr[*idx] = value;
            Ok(())
        }
        (Key::Index(idx), Value::Array(arr)) if *idx == arr.len() => {
            arr.push(value);
            Ok(())
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let doc = json!({"a": {"list": [1, {"b": true}]}});
        let keys = vec![Key::from("a"), Key::from("list"), Key::from(1), Key::from("b")];
        assert_eq!(lookup(&doc, &keys), Some(&json!(true)));
        assert_eq!(lookup(&doc, &[Key::from("missing")]), None);
        assert_eq!(lookup(&doc, &[Key::from(0)]), None);
    }

    #[test]
    fn test_assign_inserts_and_appends() {
        let mut doc = json!({"list": [1]});
        assign(&mut doc, &[Key::from("name")], json!("bot")).unwrap();
        assign(&mut doc, &[Key::from("list"), Key::from(1)], json!(2)).unwrap();
        assign(&mut doc, &[Key::from("list"), Key::from(0)], json!(0)).unwrap();
        assert_eq!(doc, json!({"list": [0, 2], "name": "bot"}));

        let err = assign(&mut doc, &[Key::from("list"), Key::from(5)], json!(1)).unwrap_err();
        assert_eq!(
            err,
            EditorError::InvalidPath {
                path: "list.5".to_string()
            }
        );
    }

    #[test]
    fn test_draft_keeps_location() {
        let at = NavPath::root().child("tickets").child(2usize);
        let draft = NavPath::draft(&at).child("name");
        assert_eq!(draft.keys(), &[Key::from("name")]);
        assert_eq!(draft.dotted(), "tickets.2.name");
        assert_eq!(draft.last(), Some(&Key::from("name")));
        assert_eq!(NavPath::draft(&at).last(), Some(&Key::Index(2)));
    }

    #[test]
    fn test_display_location() {
        let loc = vec![Key::from("panels"), Key::from(0), Key::from("name")];
        assert_eq!(
            display_location("(./config/general.json)", &loc),
            "(./config/general.json).\"panels\".0.\"name\""
        );
    }
}
