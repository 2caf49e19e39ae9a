use std::fmt;

use regex::Regex;
use serde_json::Value;

use super::{
    ArraySchema, EnabledObjectSchema, NumberSchema, ObjectSchema, ObjectSwitchSchema, Schema,
    SchemaKind, StringSchema, TypeSwitchSchema, ValueKind,
};
use crate::path::Key;

/// Severity of a validation diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

/// A single validation message.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dot-separated location of the offending value.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=> [{}] {}", self.severity.label(), self.message)?;
        if !self.path.is_empty() {
            write!(f, " (path: {})", self.path)?;
        }
        Ok(())
    }
}

/// Outcome of checking a value against a schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub diagnostics: Vec<Diagnostic>,
}

impl Validation {
    /// A validation holding a single error.
    pub fn failed(path: &[Key], message: impl Into<String>) -> Self {
        let mut out = Self::default();
        out.error(path, message);
        out
    }

    /// True when no diagnostic is an error.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    fn push(&mut self, severity: Severity, path: &[Key], message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: dotted(path),
            message: message.into(),
        });
    }

    fn error(&mut self, path: &[Key], message: impl Into<String>) {
        self.push(Severity::Error, path, message);
    }
}

fn dotted(path: &[Key]) -> String {
    path.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn child_path(path: &[Key], key: impl Into<Key>) -> Vec<Key> {
    let mut out = path.to_vec();
    out.push(key.into());
    out
}

impl Schema {
    /// Check `value` against this schema.
    ///
    /// Every call returns a fresh [`Validation`]; `path` is only used to
    /// label diagnostics.
    pub fn check(&self, value: &Value, path: &[Key]) -> Validation {
        let mut out = Validation::default();
        self.check_into(value, path, &mut out);
        out
    }

    fn check_into(&self, value: &Value, path: &[Key], out: &mut Validation) {
        if let Some(expected) = self.kind.expected() {
            let actual = ValueKind::of(value);
            if actual != expected {
                out.error(path, format!("expected a {expected}, found a {actual}"));
                return;
            }
        }
        match &self.kind {
            SchemaKind::Boolean | SchemaKind::Null => {}
            SchemaKind::Number(opts) => check_number(opts, value, path, out),
            SchemaKind::String(opts) => check_string(opts, value, path, out),
            SchemaKind::Object(obj) => check_object(obj, value, path, out),
            SchemaKind::EnabledObject(en) => check_enabled(en, value, path, out),
            SchemaKind::ObjectSwitch(sw) => check_switch(sw, value, path, out),
            SchemaKind::Array(arr) => check_array(arr, value, path, out),
            SchemaKind::TypeSwitch(ts) => check_type_switch(ts, value, path, out),
        }
    }
}

fn check_number(opts: &NumberSchema, value: &Value, path: &[Key], out: &mut Validation) {
    let Some(n) = value.as_f64() else {
        out.error(path, "number is out of range");
        return;
    };
    if !n.is_finite() {
        out.error(path, "number must be finite");
        return;
    }
    if let Some(min) = opts.min
        && n < min
    {
        out.error(path, format!("number must be at least {min}"));
    }
    if let Some(max) = opts.max
        && n > max
    {
        out.error(path, format!("number must be at most {max}"));
    }
    if !opts.decimals_allowed && n.fract() != 0.0 {
        out.error(path, "decimal numbers are not allowed");
    }
    if !opts.negative_allowed && n < 0.0 {
        out.error(path, "negative numbers are not allowed");
    }
    if !opts.zero_allowed && n == 0.0 {
        out.error(path, "zero is not allowed");
    }
    if !opts.choices.is_empty() && !opts.choices.contains(&n) {
        out.error(path, format!("number must be one of {:?}", opts.choices));
    }
}

fn check_string(opts: &StringSchema, value: &Value, path: &[Key], out: &mut Validation) {
    let Some(s) = value.as_str() else {
        return;
    };
    let len = s.chars().count();
    if let Some(min) = opts.min_length
        && len < min
    {
        out.error(path, format!("text must be at least {min} characters long"));
    }
    if let Some(max) = opts.max_length
        && len > max
    {
        out.error(path, format!("text must be at most {max} characters long"));
    }
    if let Some(prefix) = &opts.starts_with
        && !s.starts_with(prefix.as_str())
    {
        out.error(path, format!("text must start with \"{prefix}\""));
    }
    if let Some(suffix) = &opts.ends_with
        && !s.ends_with(suffix.as_str())
    {
        out.error(path, format!("text must end with \"{suffix}\""));
    }
    if let Some(needle) = &opts.contains
        && !s.contains(needle.as_str())
    {
        out.error(path, format!("text must contain \"{needle}\""));
    }
    if !opts.choices.is_empty() && !opts.choices.iter().any(|c| c == s) {
        out.error(path, format!("text must be one of {:?}", opts.choices));
    }
    if let Some(pattern) = &opts.regex {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(s) => {
                out.error(path, format!("text does not match the pattern {pattern}"))
            }
            Ok(_) => {}
            Err(e) => out.error(path, format!("invalid pattern {pattern}: {e}")),
        }
    }
}

fn check_object(obj: &ObjectSchema, value: &Value, path: &[Key], out: &mut Validation) {
    let Some(map) = value.as_object() else {
        return;
    };
    let mut children: Vec<_> = obj.children.iter().collect();
    children.sort_by_key(|c| std::cmp::Reverse(c.priority));
    for child in children {
        let p = child_path(path, child.key.as_str());
        match map.get(&child.key) {
            Some(v) => child.schema.check_into(v, &p, out),
            None if child.optional => {}
            None => out.error(&p, format!("property \"{}\" is missing", child.key)),
        }
    }
    for key in map.keys() {
        if obj.child(key).is_none() {
            out.push(
                Severity::Warning,
                &child_path(path, key.as_str()),
                format!("unknown property \"{key}\""),
            );
        }
    }
}

fn check_enabled(en: &EnabledObjectSchema, value: &Value, path: &[Key], out: &mut Validation) {
    let p = child_path(path, en.property.as_str());
    let Some(toggle) = value.get(&en.property) else {
        out.error(&p, format!("property \"{}\" is missing", en.property));
        return;
    };
    en.toggle_schema().check_into(toggle, &p, out);
    if en.is_enabled(value) {
        check_object(&en.object_with_toggle(), value, path, out);
    } else {
        out.push(Severity::Info, path, "object is disabled, skipping checks");
    }
}

fn check_switch(sw: &ObjectSwitchSchema, value: &Value, path: &[Key], out: &mut Validation) {
    match sw.matching(value).first() {
        Some(template) => {
            let (object, _) = template.addition_schema();
            check_object(&object, value, path, out);
        }
        None => out.error(path, "object does not match any of the allowed object types"),
    }
}

fn check_array(arr: &ArraySchema, value: &Value, path: &[Key], out: &mut Validation) {
    let Some(items) = value.as_array() else {
        return;
    };
    if let Some(min) = arr.min_length
        && items.len() < min
    {
        out.error(path, format!("list must contain at least {min} items"));
    }
    if let Some(max) = arr.max_length
        && items.len() > max
    {
        out.error(path, format!("list must contain at most {max} items"));
    }
    if !arr.allow_duplicates {
        for (i, item) in items.iter().enumerate() {
            if items[..i].contains(item) {
                out.error(&child_path(path, i), "duplicate items are not allowed");
            }
        }
    }
    for (i, item) in items.iter().enumerate() {
        arr.element.check_into(item, &child_path(path, i), out);
    }
}

fn check_type_switch(ts: &TypeSwitchSchema, value: &Value, path: &[Key], out: &mut Validation) {
    let kind = ValueKind::of(value);
    match ts.for_kind(kind) {
        Some(schema) => schema.check_into(value, path, out),
        None => out.error(path, format!("a {kind} is not allowed here")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Literal, ObjectChild, ObjectTemplate, SwitchProperty};
    use serde_json::json;

    fn path(keys: &[&str]) -> Vec<Key> {
        keys.iter().map(|k| Key::from(*k)).collect()
    }

    #[test]
    fn test_number_rules() {
        let schema = Schema::number(NumberSchema {
            min: Some(1.0),
            max: Some(10.0),
            decimals_allowed: false,
            ..Default::default()
        });
        assert!(schema.check(&json!(5), &[]).is_valid());
        let res = schema.check(&json!(11.5), &path(&["limit"]));
        assert!(!res.is_valid());
        assert_eq!(res.errors().count(), 2);
        assert_eq!(res.diagnostics[0].path, "limit");
        assert!(!schema.check(&json!("5"), &[]).is_valid());
    }

    #[test]
    fn test_string_rules() {
        let schema = Schema::string(StringSchema {
            min_length: Some(2),
            starts_with: Some("#".into()),
            regex: Some("^#[0-9a-f]+$".into()),
            ..Default::default()
        });
        assert!(schema.check(&json!("#f8ba00"), &[]).is_valid());
        assert!(!schema.check(&json!("#"), &[]).is_valid());
        assert!(!schema.check(&json!("f8ba00"), &[]).is_valid());
    }

    #[test]
    fn test_fresh_result_per_call() {
        let schema = Schema::string(StringSchema {
            choices: vec!["a".into()],
            ..Default::default()
        });
        assert!(!schema.check(&json!("b"), &[]).is_valid());
        let second = schema.check(&json!("a"), &[]);
        assert!(second.is_valid());
        assert!(second.diagnostics.is_empty());
    }

    #[test]
    fn test_object_missing_and_unknown() {
        let schema = Schema::object(vec![
            ObjectChild::new("token", Schema::string(Default::default())),
            ObjectChild::new("prefix", Schema::string(Default::default())).optional(),
        ]);
        assert!(schema.check(&json!({"token": "x"}), &[]).is_valid());

        let res = schema.check(&json!({"extra": 1}), &[]);
        assert!(!res.is_valid());
        assert!(res.diagnostics.iter().any(|d| d.severity == Severity::Warning));
        assert_eq!(res.errors().next().unwrap().path, "token");
    }

    #[test]
    fn test_enabled_object_only_checked_when_enabled() {
        let schema = Schema::new(SchemaKind::EnabledObject(EnabledObjectSchema {
            property: "enabled".into(),
            enabled_value: Literal::Bool(true),
            object: ObjectSchema::new(vec![ObjectChild::new(
                "text",
                Schema::string(StringSchema {
                    min_length: Some(1),
                    ..Default::default()
                }),
            )]),
        }));
        assert!(schema.check(&json!({"enabled": false, "text": ""}), &[]).is_valid());
        assert!(!schema.check(&json!({"enabled": true, "text": ""}), &[]).is_valid());
        assert!(!schema.check(&json!({"text": "x"}), &[]).is_valid());
    }

    #[test]
    fn test_object_switch_and_array() {
        let switch = Schema::new(SchemaKind::ObjectSwitch(ObjectSwitchSchema {
            objects: vec![ObjectTemplate {
                name: "Role".into(),
                properties: vec![SwitchProperty {
                    key: "type".into(),
                    value: Literal::String("role".into()),
                }],
                object: ObjectSchema::new(vec![ObjectChild::new(
                    "id",
                    Schema::string(Default::default()),
                )]),
            }],
        }));
        let mut arr = ArraySchema::new(switch);
        arr.allow_duplicates = false;
        let schema = Schema::new(SchemaKind::Array(arr));

        assert!(schema.check(&json!([{"type": "role", "id": "1"}]), &[]).is_valid());
        let res = schema.check(&json!([{"type": "user", "id": "1"}]), &path(&["admins"]));
        assert_eq!(res.errors().next().unwrap().path, "admins.0");
        let dup = json!([{"type": "role", "id": "1"}, {"type": "role", "id": "1"}]);
        assert!(!schema.check(&dup, &[]).is_valid());
    }

    #[test]
    fn test_type_switch() {
        let schema = Schema::new(SchemaKind::TypeSwitch(TypeSwitchSchema {
            string: Some(Box::new(Schema::string(Default::default()))),
            number: Some(Box::new(Schema::number(NumberSchema {
                min: Some(0.0),
                ..Default::default()
            }))),
            ..Default::default()
        }));
        assert!(schema.check(&json!("x"), &[]).is_valid());
        assert!(schema.check(&json!(3), &[]).is_valid());
        assert!(!schema.check(&json!(-3), &[]).is_valid());
        assert!(!schema.check(&json!(true), &[]).is_valid());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            severity: Severity::Error,
            path: "a.b".into(),
            message: "bad".into(),
        };
        assert_eq!(d.to_string(), "=> [ERROR] bad (path: a.b)");
    }
}
