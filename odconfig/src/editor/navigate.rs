use serde_json::Value;

use super::{Editor, display_value, property_title, value_at};
use crate::{
    error::EditorError,
    path::{NavPath, lookup},
    prompt::{Answer, MENU_HINT, Screen, align_labels},
    schema::{ObjectChild, ObjectSchema, ObjectSwitchSchema, Schema, TypeSwitchSchema, ValueKind},
    store::Store,
};

/// Gray text next to a property in its parent's menu.
fn child_hint(schema: &Schema) -> String {
    match &schema.meta.display_description {
        Some(desc) if !schema.meta.hide_description_in_parent => format!("=> {desc}"),
        _ => String::new(),
    }
}

pub(super) fn alternative_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Array => "array/list",
        other => other.name(),
    }
}

impl Editor<'_> {
    pub(super) fn edit_object(
        &mut self,
        store: &mut dyn Store,
        schema: &Schema,
        obj: &ObjectSchema,
        at: &NavPath,
    ) -> anyhow::Result<()> {
        let visible: Vec<&ObjectChild> = obj.children.iter().filter(|c| !c.hide_in_edit_mode).collect();
        if visible.is_empty() {
            debug!("{at} has no editable properties");
            return Ok(());
        }
        let rows: Vec<(String, String)> = visible
            .iter()
            .map(|c| {
                let name = c.schema.meta.display_name.clone().unwrap_or_else(|| c.key.clone());
                (name, child_hint(&c.schema))
            })
            .collect();

        let mut screen = Screen::new(
            self.location(at),
            "Please select which variable you would like to edit.",
            MENU_HINT,
        );
        if let Some(name) = &schema.meta.display_name {
            screen = screen
                .detail("Property", name.as_str())
                .detail("Description", schema.description());
        }

        loop {
            let Answer::Submit(i) = self.choose(&screen, &align_labels(&rows), at)? else {
                return Ok(());
            };
            let child = visible[i];
            let child_at = at.child(child.key.as_str());
            if lookup(store.root(), child_at.keys()).is_some() {
                self.edit(store, &child.schema, &child_at)?;
            } else {
                debug!("{child_at} is absent, creating it");
                if let Answer::Submit(value) = self.add(&child.schema, &child_at)? {
                    self.commit(store, &child_at, value)?;
                }
            }
        }
    }

    pub(super) fn edit_object_switch(
        &mut self,
        store: &mut dyn Store,
        schema: &Schema,
        sw: &ObjectSwitchSchema,
        at: &NavPath,
    ) -> anyhow::Result<()> {
        let templates = sw.matching(value_at(store, at)?);
        let Some(template) = templates.first() else {
            return Err(EditorError::UnmatchedSwitch {
                kind: "object switch",
                path: at.dotted(),
            }
            .into());
        };
        if templates.len() > 1 {
            warn!(
                "{} object types match {at}, editing it as \"{}\"",
                templates.len(),
                template.name
            );
        }
        self.edit_object(store, schema, &template.object, at)
    }

    pub(super) fn edit_type_switch(
        &mut self,
        store: &mut dyn Store,
        schema: &Schema,
        ts: &TypeSwitchSchema,
        at: &NavPath,
    ) -> anyhow::Result<()> {
        let alternatives = ts.alternatives();
        let items: Vec<String> = alternatives
            .iter()
            .map(|(kind, _)| format!("Edit as {}", alternative_name(*kind)))
            .collect();
        loop {
            let current: Value = value_at(store, at)?.clone();
            let screen = Screen::new(self.location(at), property_title("editing", None, at), MENU_HINT)
                .detail("Current value", display_value(&current))
                .detail("Description", schema.description());
            let Answer::Submit(i) = self.choose(&screen, &items, at)? else {
                return Ok(());
            };
            let (kind, alt) = alternatives[i];
            match kind {
                ValueKind::Object | ValueKind::Array if ValueKind::of(&current) == kind => {
                    self.edit(store, alt, at)?
                }
                ValueKind::Object | ValueKind::Array => {
                    if let Answer::Submit(value) = self.add(alt, at)? {
                        self.commit(store, at, value)?;
                    }
                }
                _ => self.edit_scalar(store, alt, at)?,
            }
        }
    }
}
