//! Declarative checker structures describing the expected shape of a config.
//!
//! A [`Schema`] pairs shared CLI metadata ([`SchemaMeta`]) with one of the
//! structural variants of [`SchemaKind`]. Schemas deserialize from JSON:
//!
//! ```json
//! {
//!   "type": "object",
//!   "display_name": "General",
//!   "children": [
//!     {"key": "token", "schema": {"type": "string", "min_length": 1}},
//!     {"key": "status", "schema": {
//!       "type": "enabled_object",
//!       "property": "enabled",
//!       "enabled_value": true,
//!       "object": {"children": [{"key": "text", "schema": {"type": "string"}}]}
//!     }}
//!   ]
//! }
//! ```

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validation of values against schemas.
pub mod check;

/// Preset colors for color inputs.
pub mod color;

pub use check::{Diagnostic, Severity, Validation};

/// Runtime type of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Number,
    String,
    Null,
    Object,
    Array,
}

impl ValueKind {
    /// Runtime type of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Null => ValueKind::Null,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Lowercase type name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Null => "null",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive literal used by enabled objects and object switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// Strict equality against a JSON value (no type coercion).
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => b.as_f64() == Some(*a),
            (Literal::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// The literal as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => number_value(*n),
            Literal::String(s) => Value::String(s.clone()),
        }
    }

    /// A scalar schema accepting values of the literal's type.
    pub fn scalar_schema(&self) -> Schema {
        match self {
            Literal::Bool(_) => Schema::boolean(),
            Literal::Number(_) => Schema::number(NumberSchema::default()),
            Literal::String(_) => Schema::string(StringSchema::default()),
        }
    }
}

/// Convert a float into a JSON number, keeping integral values integral.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Asynchronously computed autocomplete suggestions for string inputs.
#[derive(Clone)]
pub struct AutocompleteProvider(pub Arc<dyn Fn() -> Vec<String> + Send + Sync>);

impl AutocompleteProvider {
    pub fn new(f: impl Fn() -> Vec<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for AutocompleteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AutocompleteProvider")
    }
}

impl PartialEq for AutocompleteProvider {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// CLI metadata shared by every schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaMeta {
    /// Name shown instead of the property key.
    pub display_name: Option<String>,
    /// Description shown on the node's screen and in parent menus.
    pub display_description: Option<String>,
    /// Do not show the description in the parent's menu.
    pub hide_description_in_parent: bool,
    /// Value used when the node is pre-filled during addition.
    pub init_default_value: Option<Value>,
}

/// One node of the checker structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(flatten)]
    pub meta: SchemaMeta,
    #[serde(flatten)]
    pub kind: SchemaKind,
}

/// Structural variant of a schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaKind {
    Boolean,
    Number(NumberSchema),
    String(StringSchema),
    Null,
    Object(ObjectSchema),
    EnabledObject(EnabledObjectSchema),
    ObjectSwitch(ObjectSwitchSchema),
    Array(ArraySchema),
    TypeSwitch(TypeSwitchSchema),
}

impl SchemaKind {
    /// Runtime type required by this variant. Type switches accept several.
    pub fn expected(&self) -> Option<ValueKind> {
        match self {
            SchemaKind::Boolean => Some(ValueKind::Boolean),
            SchemaKind::Number(_) => Some(ValueKind::Number),
            SchemaKind::String(_) => Some(ValueKind::String),
            SchemaKind::Null => Some(ValueKind::Null),
            SchemaKind::Object(_) | SchemaKind::EnabledObject(_) | SchemaKind::ObjectSwitch(_) => {
                Some(ValueKind::Object)
            }
            SchemaKind::Array(_) => Some(ValueKind::Array),
            SchemaKind::TypeSwitch(_) => None,
        }
    }

    /// Human readable variant name.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Boolean => "boolean",
            SchemaKind::Number(_) => "number",
            SchemaKind::String(_) => "string",
            SchemaKind::Null => "null",
            SchemaKind::Object(_) => "object",
            SchemaKind::EnabledObject(_) => "enabled object",
            SchemaKind::ObjectSwitch(_) => "object switch",
            SchemaKind::Array(_) => "array",
            SchemaKind::TypeSwitch(_) => "type switch",
        }
    }
}

/// Options of a number node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberSchema {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub decimals_allowed: bool,
    pub negative_allowed: bool,
    pub zero_allowed: bool,
    /// When non-empty, the value must be one of these.
    pub choices: Vec<f64>,
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            decimals_allowed: true,
            negative_allowed: true,
            zero_allowed: true,
            choices: Vec::new(),
        }
    }
}

/// Options of a string node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringSchema {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub contains: Option<String>,
    /// When non-empty, the value must be one of these.
    pub choices: Vec<String>,
    pub regex: Option<String>,
    /// Fixed suggestions offered while typing.
    pub autocomplete_list: Option<Vec<String>>,
    /// Suggestions computed when the input opens. Takes precedence over
    /// `autocomplete_list`.
    #[serde(skip)]
    pub autocomplete: Option<AutocompleteProvider>,
    /// Offer the preset color names and store their hex code.
    pub preset_colors: bool,
}

impl StringSchema {
    /// Suggestions for the input field: provider, then list, then choices.
    pub fn suggestions(&self) -> Vec<String> {
        if let Some(provider) = &self.autocomplete {
            return (provider.0)();
        }
        if let Some(list) = &self.autocomplete_list {
            return list.clone();
        }
        if self.preset_colors && self.choices.is_empty() {
            return color::preset_names();
        }
        self.choices.clone()
    }

    /// Text stored for `input`. Escaped `\n` become line breaks and a
    /// preset color name becomes its hex code.
    pub fn resolve_input(&self, input: &str) -> String {
        let text = input.replace("\\n", "\n");
        if self.preset_colors
            && let Some(hex) = color::preset_color(&text)
        {
            return hex.to_string();
        }
        text
    }
}

/// A named property of an object node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectChild {
    pub key: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub priority: i32,
    /// Hide this property from the edit-mode menu.
    #[serde(default)]
    pub hide_in_edit_mode: bool,
    pub schema: Schema,
}

impl ObjectChild {
    pub fn new(key: impl Into<String>, schema: Schema) -> Self {
        Self {
            key: key.into(),
            optional: false,
            priority: 0,
            hide_in_edit_mode: false,
            schema,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide_in_edit_mode = true;
        self
    }
}

/// Options of an object node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSchema {
    pub children: Vec<ObjectChild>,
    /// Keys filled with their default instead of prompting during addition.
    pub init_skip_keys: Vec<String>,
    /// Property shown as the label when this object is an array element.
    pub display_key_in_parent_array: Option<String>,
    /// Extra properties shown next to the label in array previews.
    pub display_additional_keys_in_parent_array: Vec<String>,
}

impl ObjectSchema {
    pub fn new(children: Vec<ObjectChild>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    /// Child declared under `key`.
    pub fn child(&self, key: &str) -> Option<&ObjectChild> {
        self.children.iter().find(|c| c.key == key)
    }

    /// Copy of this object with `child` prepended unless its key exists.
    pub fn with_leading_child(&self, child: ObjectChild) -> ObjectSchema {
        let mut out = self.clone();
        if out.child(&child.key).is_none() {
            out.children.insert(0, child);
        }
        out
    }
}

/// An object gated by a single toggle property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnabledObjectSchema {
    /// Name of the toggle property.
    pub property: String,
    /// Value of the toggle that activates the object.
    pub enabled_value: Literal,
    pub object: ObjectSchema,
}

impl EnabledObjectSchema {
    /// Schema of the toggle property, typed after the enabled value.
    pub fn toggle_schema(&self) -> Schema {
        self.enabled_value.scalar_schema()
    }

    /// Whether `value` has the toggle set to the enabled value.
    pub fn is_enabled(&self, value: &Value) -> bool {
        value
            .get(&self.property)
            .is_some_and(|v| self.enabled_value.matches(v))
    }

    /// The underlying object with the toggle property listed first.
    pub fn object_with_toggle(&self) -> ObjectSchema {
        self.object
            .with_leading_child(ObjectChild::new(self.property.clone(), self.toggle_schema()))
    }
}

/// A literal property that selects an object template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchProperty {
    pub key: String,
    pub value: Literal,
}

/// One shape of an object switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    pub name: String,
    pub properties: Vec<SwitchProperty>,
    pub object: ObjectSchema,
}

impl ObjectTemplate {
    /// Whether every discriminator property of the template matches `value`.
    pub fn matches(&self, value: &Value) -> bool {
        self.properties
            .iter()
            .all(|p| value.get(&p.key).is_some_and(|v| p.value.matches(v)))
    }

    /// Object schema used to construct a new value of this template.
    ///
    /// Discriminator keys are returned as presets holding their fixed
    /// literal, and a scalar child is added for any discriminator the
    /// template's object does not declare.
    pub fn addition_schema(&self) -> (ObjectSchema, Map<String, Value>) {
        let mut object = self.object.clone();
        let mut presets = Map::new();
        for prop in self.properties.iter().rev() {
            let mut schema = prop.value.scalar_schema();
            schema.meta.init_default_value = Some(prop.value.to_value());
            object = object.with_leading_child(ObjectChild::new(prop.key.clone(), schema));
        }
        for prop in &self.properties {
            presets.insert(prop.key.clone(), prop.value.to_value());
        }
        (object, presets)
    }
}

/// Tagged union of object shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSwitchSchema {
    pub objects: Vec<ObjectTemplate>,
}

impl ObjectSwitchSchema {
    /// Every template matching `value`, in declaration order.
    pub fn matching<'s>(&'s self, value: &Value) -> Vec<&'s ObjectTemplate> {
        self.objects.iter().filter(|t| t.matches(value)).collect()
    }
}

/// Homogeneous list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySchema {
    pub element: Box<Schema>,
    /// Noun used in the array menus ("Add <name>").
    #[serde(default)]
    pub display_property_name: Option<String>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default = "default_true")]
    pub allow_duplicates: bool,
}

impl ArraySchema {
    pub fn new(element: Schema) -> Self {
        Self {
            element: Box::new(element),
            display_property_name: None,
            min_length: None,
            max_length: None,
            allow_duplicates: true,
        }
    }

    pub fn property_name(&self) -> &str {
        self.display_property_name.as_deref().unwrap_or("index")
    }
}

fn default_true() -> bool {
    true
}

/// Untagged union over JSON types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeSwitchSchema {
    pub boolean: Option<Box<Schema>>,
    pub string: Option<Box<Schema>>,
    pub number: Option<Box<Schema>>,
    pub object: Option<Box<Schema>>,
    pub array: Option<Box<Schema>>,
    pub null: Option<Box<Schema>>,
}

impl TypeSwitchSchema {
    /// Available alternatives in menu order.
    pub fn alternatives(&self) -> Vec<(ValueKind, &Schema)> {
        [
            (ValueKind::Boolean, &self.boolean),
            (ValueKind::String, &self.string),
            (ValueKind::Number, &self.number),
            (ValueKind::Object, &self.object),
            (ValueKind::Array, &self.array),
            (ValueKind::Null, &self.null),
        ]
        .into_iter()
        .filter_map(|(kind, schema)| schema.as_deref().map(|s| (kind, s)))
        .collect()
    }

    /// Alternative handling values of `kind`.
    pub fn for_kind(&self, kind: ValueKind) -> Option<&Schema> {
        let alt = match kind {
            ValueKind::Boolean => &self.boolean,
            ValueKind::String => &self.string,
            ValueKind::Number => &self.number,
            ValueKind::Object => &self.object,
            ValueKind::Array => &self.array,
            ValueKind::Null => &self.null,
        };
        alt.as_deref()
    }
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            meta: SchemaMeta::default(),
            kind,
        }
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn number(opts: NumberSchema) -> Self {
        Self::new(SchemaKind::Number(opts))
    }

    pub fn string(opts: StringSchema) -> Self {
        Self::new(SchemaKind::String(opts))
    }

    pub fn null() -> Self {
        Self::new(SchemaKind::Null)
    }

    pub fn object(children: Vec<ObjectChild>) -> Self {
        Self::new(SchemaKind::Object(ObjectSchema::new(children)))
    }

    pub fn array(element: Schema) -> Self {
        Self::new(SchemaKind::Array(ArraySchema::new(element)))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta.display_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.display_description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.meta.init_default_value = Some(value);
        self
    }

    /// Description shown on screens, `/` when missing.
    pub fn description(&self) -> &str {
        self.meta.display_description.as_deref().unwrap_or("/")
    }

    /// Value used when this node is pre-filled instead of prompted.
    ///
    /// The configured default wins when its type fits the node, otherwise
    /// the type's empty value is used. Type switches have no implicit
    /// default.
    pub fn preset(&self) -> Option<Value> {
        let default = self.meta.init_default_value.as_ref();
        let fits = |kind: ValueKind| default.filter(|v| ValueKind::of(v) == kind).cloned();
        match &self.kind {
            SchemaKind::Boolean => Some(fits(ValueKind::Boolean).unwrap_or(Value::Bool(false))),
            SchemaKind::Number(_) => Some(fits(ValueKind::Number).unwrap_or(Value::from(0))),
            SchemaKind::String(_) => {
                Some(fits(ValueKind::String).unwrap_or(Value::String(String::new())))
            }
            SchemaKind::Null => Some(Value::Null),
            SchemaKind::Array(_) => Some(fits(ValueKind::Array).unwrap_or(Value::Array(Vec::new()))),
            SchemaKind::Object(_) | SchemaKind::EnabledObject(_) | SchemaKind::ObjectSwitch(_) => {
                Some(fits(ValueKind::Object).unwrap_or(Value::Object(Map::new())))
            }
            SchemaKind::TypeSwitch(_) => default.cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_schema_json() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "display_name": "General",
            "children": [
                {"key": "token", "schema": {"type": "string", "min_length": 1}},
                {"key": "limit", "optional": true, "schema": {"type": "number", "min": 0}},
                {"key": "status", "schema": {
                    "type": "enabled_object",
                    "property": "enabled",
                    "enabled_value": true,
                    "object": {"children": [{"key": "text", "schema": {"type": "string"}}]}
                }},
                {"key": "list", "schema": {"type": "array", "element": {"type": "null"}}}
            ]
        }))
        .unwrap();

        assert_eq!(schema.meta.display_name.as_deref(), Some("General"));
        let SchemaKind::Object(obj) = &schema.kind else {
            panic!("expected object schema");
        };
        assert_eq!(obj.children.len(), 4);
        assert!(obj.child("limit").unwrap().optional);
        let SchemaKind::Number(num) = &obj.child("limit").unwrap().schema.kind else {
            panic!("expected number schema");
        };
        assert_eq!(num.min, Some(0.0));
        assert!(num.negative_allowed);
        let SchemaKind::EnabledObject(en) = &obj.child("status").unwrap().schema.kind else {
            panic!("expected enabled object schema");
        };
        assert_eq!(en.enabled_value, Literal::Bool(true));
        let SchemaKind::Array(arr) = &obj.child("list").unwrap().schema.kind else {
            panic!("expected array schema");
        };
        assert!(arr.allow_duplicates);
        assert_eq!(arr.property_name(), "index");
    }

    #[test]
    fn test_literal_matches_strictly() {
        assert!(Literal::Bool(true).matches(&json!(true)));
        assert!(!Literal::Bool(true).matches(&json!("true")));
        assert!(Literal::Number(2.0).matches(&json!(2)));
        assert!(!Literal::String("2".into()).matches(&json!(2)));
        assert_eq!(Literal::Number(3.0).to_value(), json!(3));
        assert_eq!(Literal::Number(1.5).to_value(), json!(1.5));
    }

    #[test]
    fn test_enabled_toggle_prepended_once() {
        let en = EnabledObjectSchema {
            property: "enabled".into(),
            enabled_value: Literal::String("yes".into()),
            object: ObjectSchema::new(vec![ObjectChild::new("text", Schema::string(Default::default()))]),
        };
        let obj = en.object_with_toggle();
        assert_eq!(obj.children[0].key, "enabled");
        assert!(matches!(obj.children[0].schema.kind, SchemaKind::String(_)));
        assert_eq!(obj.with_leading_child(obj.children[0].clone()).children.len(), 2);
    }

    #[test]
    fn test_template_addition_schema_presets_discriminators() {
        let template = ObjectTemplate {
            name: "Button".into(),
            properties: vec![SwitchProperty {
                key: "type".into(),
                value: Literal::String("button".into()),
            }],
            object: ObjectSchema::new(vec![ObjectChild::new("label", Schema::string(Default::default()))]),
        };
        let (obj, presets) = template.addition_schema();
        assert_eq!(obj.children[0].key, "type");
        assert_eq!(obj.children[1].key, "label");
        assert_eq!(presets.get("type"), Some(&json!("button")));
        assert!(template.matches(&json!({"type": "button", "label": "x"})));
        assert!(!template.matches(&json!({"label": "x"})));
    }

    #[test]
    fn test_preset_defaults() {
        assert_eq!(Schema::boolean().preset(), Some(json!(false)));
        assert_eq!(Schema::number(Default::default()).preset(), Some(json!(0)));
        assert_eq!(
            Schema::string(Default::default()).with_default(json!("hi")).preset(),
            Some(json!("hi"))
        );
        assert_eq!(
            Schema::string(Default::default()).with_default(json!(5)).preset(),
            Some(json!(""))
        );
        assert_eq!(Schema::array(Schema::null()).preset(), Some(json!([])));
        assert_eq!(
            Schema::new(SchemaKind::TypeSwitch(TypeSwitchSchema::default())).preset(),
            None
        );
    }

    #[test]
    fn test_number_value_keeps_integers_in_range() {
        assert_eq!(number_value(3.0), json!(3));
        assert_eq!(number_value(-2.5), json!(-2.5));
        assert_eq!(number_value(i64::MIN as f64), json!(i64::MIN));
        assert_eq!(number_value(9_223_372_036_854_775_808.0), json!(9.223372036854776e18));
    }
}
