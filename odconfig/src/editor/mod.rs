//! Schema-driven tree walker.
//!
//! The editor has two entry points that mirror each other:
//!
//! - [`Editor::edit`] navigates and mutates a value that already exists in
//!   a [`Store`]. Accepted changes are written into the store and saved
//!   before control returns to the previous screen.
//! - [`Editor::add`] builds a brand-new value bottom-up and hands it to the
//!   caller once every part of it is resolved.
//!
//! Every screen runs in a loop: going back (escape) returns from the
//! function that drew it, so the caller's screen is shown again. The call
//! stack is the navigation stack.

use std::time::Duration;

use serde_json::Value;

use crate::{
    error::EditorError,
    path::{Key, NavPath, assign, display_location, lookup},
    prompt::{Answer, Prompt, Screen, Toast, ToastKind},
    schema::{Schema, SchemaKind, Validation, ValueKind},
    store::Store,
};

mod addition;
mod array;
mod navigate;
mod preview;
mod scalar;


pub use array::move_element;
pub use preview::preview;
pub use scalar::parse_number;

/// Timing of confirmation messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// How long "saved" confirmations stay visible.
    pub saved_delay: Duration,
    /// Base display time of validation failures.
    pub invalid_delay: Duration,
    /// Extra display time per validation message.
    pub invalid_delay_per_message: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            saved_delay: Duration::from_millis(400),
            invalid_delay: Duration::from_millis(1000),
            invalid_delay_per_message: Duration::from_millis(2000),
        }
    }
}

impl EditorOptions {
    /// No delays at all.
    pub fn instant() -> Self {
        Self {
            saved_delay: Duration::ZERO,
            invalid_delay: Duration::ZERO,
            invalid_delay_per_message: Duration::ZERO,
        }
    }
}

/// Interactive config editor.
pub struct Editor<'p> {
    prompt: &'p mut dyn Prompt,
    options: EditorOptions,
    label: String,
}

impl<'p> Editor<'p> {
    pub fn new(prompt: &'p mut dyn Prompt) -> Self {
        Self {
            prompt,
            options: EditorOptions::default(),
            label: String::new(),
        }
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    /// Open the editor on the root of `store`.
    ///
    /// Returns once the user goes back from the root screen.
    pub fn open(&mut self, store: &mut dyn Store, schema: &Schema) -> anyhow::Result<()> {
        self.label = store.label();
        debug!("opening editor for {}", self.label);
        self.edit(store, schema, &NavPath::root())
    }

    /// Edit the existing value at `at`.
    ///
    /// Fails with [`EditorError`] before drawing anything when the value's
    /// runtime type does not fit `schema`.
    pub fn edit(&mut self, store: &mut dyn Store, schema: &Schema, at: &NavPath) -> anyhow::Result<()> {
        let actual = ValueKind::of(value_at(store, at)?);
        debug!("edit {at} as {}", schema.kind.name());
        match (&schema.kind, actual) {
            (SchemaKind::Boolean, ValueKind::Boolean)
            | (SchemaKind::Number(_), ValueKind::Number)
            | (SchemaKind::String(_), ValueKind::String)
            | (SchemaKind::Null, ValueKind::Null) => self.edit_scalar(store, schema, at),
            (SchemaKind::Object(obj), ValueKind::Object) => self.edit_object(store, schema, obj, at),
            (SchemaKind::EnabledObject(en), ValueKind::Object) => {
                self.edit_object(store, schema, &en.object_with_toggle(), at)
            }
            (SchemaKind::ObjectSwitch(sw), ValueKind::Object) => {
                self.edit_object_switch(store, schema, sw, at)
            }
            (SchemaKind::Array(arr), ValueKind::Array) => self.edit_array(store, schema, arr, at),
            (SchemaKind::TypeSwitch(ts), kind) if ts.for_kind(kind).is_some() => {
                self.edit_type_switch(store, schema, ts, at)
            }
            (SchemaKind::TypeSwitch(_), _) => Err(EditorError::UnmatchedSwitch {
                kind: "type switch",
                path: at.dotted(),
            }
            .into()),
            (other, actual) => Err(EditorError::TypeMismatch {
                path: at.dotted(),
                expected: other.expected().map_or(other.name(), |k| k.name()).to_string(),
                actual: actual.name().to_string(),
            }
            .into()),
        }
    }

    /// Build a new value for `schema` that will be inserted at `at`.
    ///
    /// Nothing is written anywhere: the finished value is returned, or
    /// [`Answer::Cancel`] when the user backs out of the first screen.
    pub fn add(&mut self, schema: &Schema, at: &NavPath) -> anyhow::Result<Answer<Value>> {
        debug!("add {at} as {}", schema.kind.name());
        match &schema.kind {
            SchemaKind::Boolean | SchemaKind::Number(_) | SchemaKind::String(_) | SchemaKind::Null => {
                self.add_scalar(schema, at)
            }
            SchemaKind::Object(obj) => self.add_object(obj, at, Default::default()),
            SchemaKind::EnabledObject(en) => self.add_enabled(schema, en, at),
            SchemaKind::ObjectSwitch(sw) => self.add_object_switch(schema, sw, at),
            SchemaKind::Array(arr) => self.add_array(schema, arr, at),
            SchemaKind::TypeSwitch(ts) => self.add_type_switch(schema, ts, at),
        }
    }

    /// Show a menu and check the answer against the offered entries.
    fn choose(&mut self, screen: &Screen, items: &[String], at: &NavPath) -> anyhow::Result<Answer<usize>> {
        let answer = self.prompt.select(screen, items)?;
        if let Answer::Submit(index) = answer
            && index >= items.len()
        {
            return Err(EditorError::InvalidChoice {
                index,
                len: items.len(),
                path: at.dotted(),
            }
            .into());
        }
        Ok(answer)
    }

    fn location(&self, at: &NavPath) -> Option<String> {
        Some(display_location(&self.label, &at.location()))
    }

    /// Write `value` at `at` and persist the store.
    fn commit(&mut self, store: &mut dyn Store, at: &NavPath, value: Value) -> anyhow::Result<()> {
        assign(store.root_mut(), at.keys(), value)?;
        store.save()
    }

    fn toast_saved(&mut self, message: &str) -> anyhow::Result<()> {
        self.prompt.notify(&Toast {
            kind: ToastKind::Success,
            message: message.to_string(),
            details: Vec::new(),
            duration: self.options.saved_delay,
        })
    }

    fn toast_invalid(&mut self, validation: &Validation) -> anyhow::Result<()> {
        let count = validation.diagnostics.len() as u32;
        self.prompt.notify(&Toast {
            kind: ToastKind::Failure,
            message: "Variable is invalid! Please try again!".to_string(),
            details: validation.diagnostics.iter().map(|d| d.to_string()).collect(),
            duration: self.options.invalid_delay + self.options.invalid_delay_per_message * count,
        })
    }
}

fn value_at<'s>(store: &'s dyn Store, at: &NavPath) -> Result<&'s Value, EditorError> {
    lookup(store.root(), at.keys()).ok_or_else(|| EditorError::InvalidPath { path: at.dotted() })
}

/// "the number property "limit"" / "number property #3".
fn property_title(verb: &str, type_name: Option<&str>, at: &NavPath) -> String {
    let ty = type_name.map(|t| format!("{t} ")).unwrap_or_default();
    match at.last() {
        Some(Key::Field(name)) => format!("You are now {verb} the {ty}property \"{name}\"."),
        Some(Key::Index(idx)) => format!("You are now {verb} {ty}property #{}.", idx + 1),
        None => format!("You are now {verb} the {ty}property."),
    }
}

/// Name shown in the "Property" row.
fn property_name(schema: &Schema, at: &NavPath) -> String {
    match &schema.meta.display_name {
        Some(name) => name.clone(),
        None if at.location().is_empty() => "/".to_string(),
        None => at.dotted(),
    }
}

/// Value as shown in the "Current value" row.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains('\n') => format!("\n{s}"),
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}
