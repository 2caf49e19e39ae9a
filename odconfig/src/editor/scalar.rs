use serde_json::Value;

use super::{Editor, display_value, property_name, property_title, value_at};
use crate::{
    error::EditorError,
    path::NavPath,
    prompt::{Answer, Field, INPUT_HINT, MENU_HINT, Screen},
    schema::{Schema, SchemaKind, Validation, number_value},
    store::Store,
};

/// Parse user input as a number. A decimal comma is accepted.
pub fn parse_number(text: &str) -> Result<Value, String> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(number_value)
        .ok_or_else(|| format!("\"{text}\" is not a valid number"))
}

fn hint(schema: &Schema) -> &'static str {
    match schema.kind {
        SchemaKind::Number(_) | SchemaKind::String(_) => INPUT_HINT,
        _ => MENU_HINT,
    }
}

impl Editor<'_> {
    pub(super) fn edit_scalar(&mut self, store: &mut dyn Store, schema: &Schema, at: &NavPath) -> anyhow::Result<()> {
        let current = display_value(value_at(store, at)?);
        let screen = Screen::new(
            self.location(at),
            property_title("editing", Some(schema.kind.name()), at),
            hint(schema),
        )
        .detail("Current value", current)
        .detail("Description", schema.description());

        if let Answer::Submit(value) = self.prompt_scalar(schema, &screen, at)? {
            self.commit(store, at, value)?;
            self.toast_saved("Variable saved successfully!")?;
        }
        Ok(())
    }

    pub(super) fn add_scalar(&mut self, schema: &Schema, at: &NavPath) -> anyhow::Result<Answer<Value>> {
        let screen = Screen::new(
            self.location(at),
            property_title("creating", Some(schema.kind.name()), at),
            hint(schema),
        )
        .detail("Property", property_name(schema, at))
        .detail("Description", schema.description());

        let answer = self.prompt_scalar(schema, &screen, at)?;
        if !answer.is_cancel() {
            self.toast_saved("Variable saved successfully!")?;
        }
        Ok(answer)
    }

    /// Ask for a scalar until the user enters a valid one or goes back.
    ///
    /// Rejected text input is offered again as the prefill of the retry.
    fn prompt_scalar(&mut self, schema: &Schema, screen: &Screen, at: &NavPath) -> anyhow::Result<Answer<Value>> {
        let mut prefill = None;
        loop {
            let (candidate, typed) = match &schema.kind {
                SchemaKind::Boolean => {
                    let items = ["false (Disabled)".to_string(), "true (Enabled)".to_string()];
                    match self.choose(screen, &items, at)? {
                        Answer::Submit(i) => (Ok(Value::Bool(i == 1)), None),
                        Answer::Cancel => return Ok(Answer::Cancel),
                    }
                }
                SchemaKind::Null => match self.choose(screen, &["null".to_string()], at)? {
                    Answer::Submit(_) => (Ok(Value::Null), None),
                    Answer::Cancel => return Ok(Answer::Cancel),
                },
                SchemaKind::Number(_) => {
                    let field = Field {
                        prefill: prefill.take(),
                        suggestions: Vec::new(),
                    };
                    match self.prompt.input(screen, &field)? {
                        Answer::Submit(text) => (parse_number(&text), Some(text)),
                        Answer::Cancel => return Ok(Answer::Cancel),
                    }
                }
                SchemaKind::String(opts) => {
                    let field = Field {
                        prefill: prefill.take(),
                        suggestions: opts.suggestions(),
                    };
                    match self.prompt.input(screen, &field)? {
                        Answer::Submit(text) => (Ok(Value::String(opts.resolve_input(&text))), Some(text)),
                        Answer::Cancel => return Ok(Answer::Cancel),
                    }
                }
                other => {
                    return Err(EditorError::TypeMismatch {
                        path: at.dotted(),
                        expected: "boolean, number, string or null".to_string(),
                        actual: other.name().to_string(),
                    }
                    .into());
                }
            };

            let validation = match candidate {
                Ok(value) => {
                    let validation = schema.check(&value, &at.location());
                    if validation.is_valid() {
                        return Ok(Answer::Submit(value));
                    }
                    validation
                }
                Err(message) => Validation::failed(&at.location(), message),
            };
            debug!("rejected value at {at}: {} error(s)", validation.errors().count());
            self.toast_invalid(&validation)?;
            prefill = typed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Ok(json!(42)));
        assert_eq!(parse_number(" 1,5 "), Ok(json!(1.5)));
        assert_eq!(parse_number("-3.0"), Ok(json!(-3)));
        assert!(parse_number("").is_err());
        assert!(parse_number("abc").is_err());
        assert!(parse_number("inf").is_err());
    }
}
