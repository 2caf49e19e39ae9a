use serde_json::{Map, Value};

use crate::{
    prompt::align_labels,
    schema::{ObjectSchema, Schema, SchemaKind, ValueKind},
};

const UNKNOWN: &str = "<unknown-property>";

/// Short label of an array element: the main text and gray extra text.
pub fn preview(schema: &Schema, value: &Value) -> (String, String) {
    let plain = |label: &str| (label.to_string(), String::new());
    match (&schema.kind, value) {
        (SchemaKind::Boolean, Value::Bool(b)) => plain(&b.to_string()),
        (SchemaKind::Number(_), Value::Number(n)) => plain(&n.to_string()),
        (SchemaKind::String(_), Value::String(s)) => plain(&single_line(s)),
        (SchemaKind::Null, Value::Null) => plain("Null"),
        (SchemaKind::Array(_), Value::Array(_)) => plain("Array"),
        (SchemaKind::Object(obj), Value::Object(map)) => object_preview(obj, map),
        (SchemaKind::EnabledObject(en), Value::Object(map)) => object_preview(&en.object, map),
        (SchemaKind::ObjectSwitch(sw), Value::Object(map)) => match sw.matching(value).first() {
            Some(template) => object_preview(&template.object, map),
            None => plain(UNKNOWN),
        },
        (SchemaKind::TypeSwitch(ts), _) => match ts.for_kind(ValueKind::of(value)) {
            Some(alt) => preview(alt, value),
            None => plain(UNKNOWN),
        },
        _ => plain(UNKNOWN),
    }
}

/// Menu rows hold one line: line breaks are shown escaped.
fn single_line(text: &str) -> String {
    text.replace('\n', "\\n")
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => single_line(s),
        Some(other) => other.to_string(),
        None => "/".to_string(),
    }
}

fn object_preview(obj: &ObjectSchema, map: &Map<String, Value>) -> (String, String) {
    let Some(key) = &obj.display_key_in_parent_array else {
        return ("Object".to_string(), String::new());
    };
    let extra = obj
        .display_additional_keys_in_parent_array
        .iter()
        .map(|k| format!("{k}: {}", text(map.get(k))))
        .collect::<Vec<_>>();
    let extra = if extra.is_empty() {
        String::new()
    } else {
        format!("({})", extra.join(", "))
    };
    (text(map.get(key)), extra)
}

/// Numbered, aligned menu entries for every element.
pub(super) fn preview_items(element: &Schema, items: &[Value]) -> Vec<String> {
    let rows: Vec<_> = items.iter().map(|v| preview(element, v)).collect();
    align_labels(&rows)
        .into_iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {label}", i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectChild, TypeSwitchSchema};
    use serde_json::json;

    #[test]
    fn test_scalar_previews() {
        assert_eq!(preview(&Schema::boolean(), &json!(true)).0, "true");
        assert_eq!(preview(&Schema::number(Default::default()), &json!(2.5)).0, "2.5");
        assert_eq!(preview(&Schema::null(), &Value::Null).0, "Null");
        assert_eq!(preview(&Schema::boolean(), &json!("x")).0, UNKNOWN);
    }

    #[test]
    fn test_object_preview_keys() {
        let mut schema = Schema::object(vec![
            ObjectChild::new("name", Schema::string(Default::default())),
            ObjectChild::new("color", Schema::string(Default::default())),
        ]);
        let value = json!({"name": "Support", "color": "#f8ba00", "limit": 3});
        assert_eq!(preview(&schema, &value), ("Object".to_string(), String::new()));

        if let SchemaKind::Object(obj) = &mut schema.kind {
            obj.display_key_in_parent_array = Some("name".into());
            obj.display_additional_keys_in_parent_array = vec!["color".into(), "limit".into()];
        }
        assert_eq!(
            preview(&schema, &value),
            ("Support".to_string(), "(color: #f8ba00, limit: 3)".to_string())
        );
    }

    #[test]
    fn test_type_switch_delegates() {
        let schema = Schema::new(SchemaKind::TypeSwitch(TypeSwitchSchema {
            string: Some(Box::new(Schema::string(Default::default()))),
            ..Default::default()
        }));
        assert_eq!(preview(&schema, &json!("abc")).0, "abc");
        assert_eq!(preview(&schema, &json!(1)).0, UNKNOWN);
    }

    #[test]
    fn test_multiline_text_previews_on_one_line() {
        let schema = Schema::string(Default::default());
        assert_eq!(preview(&schema, &json!("Hello\nWorld")).0, "Hello\\nWorld");
    }

    #[test]
    fn test_preview_items_numbered() {
        let items = preview_items(&Schema::string(Default::default()), &[json!("a"), json!("b")]);
        assert_eq!(items, vec!["1. a", "2. b"]);
    }
}
