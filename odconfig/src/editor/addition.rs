use serde_json::{Map, Value};

use super::{Editor, navigate::alternative_name, property_name, property_title};
use crate::{
    error::EditorError,
    path::NavPath,
    prompt::{Answer, MENU_HINT, Screen},
    schema::{EnabledObjectSchema, ObjectChild, ObjectSchema, ObjectSwitchSchema, Schema, TypeSwitchSchema},
};

impl Editor<'_> {
    /// Build a new object child by child.
    ///
    /// `presets` are written as-is and never prompted. Keys listed in
    /// `init_skip_keys` take their schema default. Going back from a child
    /// re-opens the previous one; going back from the first child cancels
    /// the whole object.
    pub(super) fn add_object(
        &mut self,
        obj: &ObjectSchema,
        at: &NavPath,
        presets: Map<String, Value>,
    ) -> anyhow::Result<Answer<Value>> {
        let mut filled = Map::new();
        for key in &obj.init_skip_keys {
            if presets.contains_key(key) {
                continue;
            }
            let Some(child) = obj.child(key) else {
                warn!("skipped key \"{key}\" is not a property of {at}");
                continue;
            };
            let value = child.schema.preset().ok_or_else(|| EditorError::InvalidPreset {
                key: key.clone(),
                path: at.child(key.as_str()).dotted(),
            })?;
            filled.insert(key.clone(), value);
        }
        filled.extend(presets);

        let pending: Vec<&ObjectChild> = obj
            .children
            .iter()
            .filter(|c| !filled.contains_key(&c.key))
            .collect();
        let mut answers: Vec<Option<Value>> = vec![None; pending.len()];
        let mut idx = 0;
        while idx < pending.len() {
            let child = pending[idx];
            match self.add(&child.schema, &at.child(child.key.as_str()))? {
                Answer::Submit(value) => {
                    answers[idx] = Some(value);
                    idx += 1;
                }
                Answer::Cancel if idx == 0 => return Ok(Answer::Cancel),
                Answer::Cancel => idx -= 1,
            }
        }

        let mut prompted: Map<String, Value> = pending
            .iter()
            .zip(answers)
            .filter_map(|(c, v)| v.map(|v| (c.key.clone(), v)))
            .collect();
        let mut out = Map::new();
        for child in &obj.children {
            if let Some(value) = filled.remove(&child.key).or_else(|| prompted.remove(&child.key)) {
                out.insert(child.key.clone(), value);
            }
        }
        out.extend(filled);
        self.toast_saved("Variable saved successfully!")?;
        Ok(Answer::Submit(Value::Object(out)))
    }

    /// Ask for the toggle first. An enabled object is then built like a
    /// plain object, a disabled one takes the default of every property.
    pub(super) fn add_enabled(
        &mut self,
        schema: &Schema,
        en: &EnabledObjectSchema,
        at: &NavPath,
    ) -> anyhow::Result<Answer<Value>> {
        let object = en.object_with_toggle();
        let toggle_at = at.child(en.property.as_str());
        let mut toggle_schema = en.toggle_schema();
        toggle_schema.meta.display_description = schema.meta.display_description.clone();
        loop {
            let Answer::Submit(toggle) = self.add_scalar(&toggle_schema, &toggle_at)? else {
                return Ok(Answer::Cancel);
            };

            if en.enabled_value.matches(&toggle) {
                let mut presets = Map::new();
                presets.insert(en.property.clone(), toggle);
                match self.add_object(&object, at, presets)? {
                    Answer::Submit(value) => return Ok(Answer::Submit(value)),
                    Answer::Cancel => continue,
                }
            }

            debug!("{at} is disabled, filling defaults");
            let mut out = Map::new();
            for child in &object.children {
                if child.key == en.property {
                    out.insert(child.key.clone(), toggle.clone());
                    continue;
                }
                let value = child.schema.preset().ok_or_else(|| EditorError::InvalidPreset {
                    key: child.key.clone(),
                    path: at.child(child.key.as_str()).dotted(),
                })?;
                out.insert(child.key.clone(), value);
            }
            self.toast_saved("Variable saved successfully!")?;
            return Ok(Answer::Submit(Value::Object(out)));
        }
    }

    /// Pick a template, then build it with its discriminators preset.
    pub(super) fn add_object_switch(
        &mut self,
        schema: &Schema,
        sw: &ObjectSwitchSchema,
        at: &NavPath,
    ) -> anyhow::Result<Answer<Value>> {
        if sw.objects.is_empty() {
            return Err(EditorError::UnmatchedSwitch {
                kind: "object switch",
                path: at.dotted(),
            }
            .into());
        }
        let names: Vec<String> = sw.objects.iter().map(|t| t.name.clone()).collect();
        let screen = Screen::new(
            self.location(at),
            "What type of object would you like to add?",
            MENU_HINT,
        )
        .detail("Property", property_name(schema, at))
        .detail("Description", schema.description());
        loop {
            let Answer::Submit(i) = self.choose(&screen, &names, at)? else {
                return Ok(Answer::Cancel);
            };
            let (object, presets) = sw.objects[i].addition_schema();
            if let Answer::Submit(value) = self.add_object(&object, at, presets)? {
                return Ok(Answer::Submit(value));
            }
        }
    }

    pub(super) fn add_type_switch(
        &mut self,
        schema: &Schema,
        ts: &TypeSwitchSchema,
        at: &NavPath,
    ) -> anyhow::Result<Answer<Value>> {
        let alternatives = ts.alternatives();
        if alternatives.is_empty() {
            return Err(EditorError::UnmatchedSwitch {
                kind: "type switch",
                path: at.dotted(),
            }
            .into());
        }
        let items: Vec<String> = alternatives
            .iter()
            .map(|(kind, _)| format!("Create as {}", alternative_name(*kind)))
            .collect();
        let screen = Screen::new(self.location(at), property_title("creating", None, at), MENU_HINT)
            .detail("Property", property_name(schema, at))
            .detail("Description", schema.description());
        loop {
            let Answer::Submit(i) = self.choose(&screen, &items, at)? else {
                return Ok(Answer::Cancel);
            };
            if let Answer::Submit(value) = self.add(alternatives[i].1, at)? {
                return Ok(Answer::Submit(value));
            }
        }
    }
}
