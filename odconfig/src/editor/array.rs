use serde_json::Value;

use super::{Editor, preview::preview_items, property_name, value_at};
use crate::{
    error::EditorError,
    path::{NavPath, lookup_mut},
    prompt::{Answer, MENU_HINT, Screen},
    schema::{ArraySchema, Schema, ValueKind},
    store::{Draft, Store},
};

/// Move the item at `from` so it ends up at position `to`.
///
/// `to` is clamped to the last position.
pub fn move_element<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayOp {
    Edit,
    Move,
    Remove,
    Duplicate,
}

impl ArrayOp {
    const ALL: [ArrayOp; 4] = [ArrayOp::Edit, ArrayOp::Move, ArrayOp::Remove, ArrayOp::Duplicate];

    fn label(self) -> &'static str {
        match self {
            ArrayOp::Edit => "Edit",
            ArrayOp::Move => "Move",
            ArrayOp::Remove => "Remove",
            ArrayOp::Duplicate => "Duplicate",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            ArrayOp::Edit => "edit",
            ArrayOp::Move => "move",
            ArrayOp::Remove => "delete",
            ArrayOp::Duplicate => "duplicate",
        }
    }
}

fn array_len(store: &dyn Store, at: &NavPath) -> anyhow::Result<usize> {
    match value_at(store, at)? {
        Value::Array(items) => Ok(items.len()),
        other => Err(EditorError::TypeMismatch {
            path: at.dotted(),
            expected: "array".to_string(),
            actual: ValueKind::of(other).name().to_string(),
        }
        .into()),
    }
}

fn array_mut<'s>(store: &'s mut dyn Store, at: &NavPath) -> Result<&'s mut Vec<Value>, EditorError> {
    lookup_mut(store.root_mut(), at.keys())
        .and_then(Value::as_array_mut)
        .ok_or_else(|| EditorError::InvalidPath { path: at.dotted() })
}

fn action_items(arr: &ArraySchema, len: usize) -> Vec<String> {
    let name = arr.property_name();
    let mut items = vec![format!("Add {name}")];
    if len > 0 {
        items.extend(ArrayOp::ALL.iter().map(|op| format!("{} {name}", op.label())));
    }
    items
}

impl Editor<'_> {
    pub(super) fn edit_array(
        &mut self,
        store: &mut dyn Store,
        schema: &Schema,
        arr: &ArraySchema,
        at: &NavPath,
    ) -> anyhow::Result<()> {
        loop {
            let len = array_len(store, at)?;
            let screen = Screen::new(self.location(at), "Please select what you would like to do.", MENU_HINT)
                .detail("Property", property_name(schema, at))
                .detail("Description", schema.description());
            let Answer::Submit(i) = self.choose(&screen, &action_items(arr, len), at)? else {
                return Ok(());
            };
            if i == 0 {
                let new_at = at.child(len);
                if let Answer::Submit(value) = self.add(&arr.element, &new_at)? {
                    self.commit(store, &new_at, value)?;
                }
            } else {
                self.array_op(ArrayOp::ALL[i - 1], store, arr, at)?;
            }
        }
    }

    /// Build a new list in a draft. The list is returned once the user
    /// picks "continue" and it passes validation.
    pub(super) fn add_array(&mut self, schema: &Schema, arr: &ArraySchema, at: &NavPath) -> anyhow::Result<Answer<Value>> {
        let mut draft = Draft::new(Value::Array(Vec::new()), self.label.clone());
        let root = NavPath::draft(at);
        loop {
            let len = array_len(&draft, &root)?;
            let mut items = vec!["-> Continue to next variable".to_string()];
            items.extend(action_items(arr, len));
            let screen = Screen::new(
                self.location(at),
                "Please select what you would like to do with the new list.",
                MENU_HINT,
            )
            .detail("Property", property_name(schema, at))
            .detail("Description", schema.description());

            match self.choose(&screen, &items, at)? {
                Answer::Cancel => return Ok(Answer::Cancel),
                Answer::Submit(0) => {
                    let validation = schema.check(&draft.value, &at.location());
                    if validation.is_valid() {
                        return Ok(Answer::Submit(draft.value));
                    }
                    self.toast_invalid(&validation)?;
                }
                Answer::Submit(1) => {
                    let new_at = root.child(len);
                    if let Answer::Submit(value) = self.add(&arr.element, &new_at)? {
                        self.commit(&mut draft, &new_at, value)?;
                    }
                }
                Answer::Submit(i) => self.array_op(ArrayOp::ALL[i - 2], &mut draft, arr, &root)?,
            }
        }
    }

    fn array_op(&mut self, op: ArrayOp, store: &mut dyn Store, arr: &ArraySchema, at: &NavPath) -> anyhow::Result<()> {
        loop {
            let Answer::Submit(idx) = self.pick_element(store, arr, at, op)? else {
                return Ok(());
            };
            match op {
                ArrayOp::Edit => {
                    self.edit(store, &arr.element, &at.child(idx))?;
                    continue;
                }
                ArrayOp::Move => {
                    let len = array_len(store, at)?;
                    let screen = Screen::new(
                        self.location(&at.child(idx)),
                        "Please select the position you would like to move to.",
                        MENU_HINT,
                    );
                    let positions: Vec<String> = (1..=len).map(|p| format!("Position {p}")).collect();
                    let Answer::Submit(to) = self.choose(&screen, &positions, at)? else {
                        continue;
                    };
                    move_element(array_mut(store, at)?, idx, to);
                    store.save()?;
                    self.toast_saved("Property moved successfully!")?;
                }
                ArrayOp::Remove => {
                    array_mut(store, at)?.remove(idx);
                    store.save()?;
                    self.toast_saved("Property deleted successfully!")?;
                }
                ArrayOp::Duplicate => {
                    let items = array_mut(store, at)?;
                    let copy = items[idx].clone();
                    items.push(copy);
                    store.save()?;
                    self.toast_saved("Property duplicated successfully!")?;
                }
            }
            return Ok(());
        }
    }

    fn pick_element(
        &mut self,
        store: &dyn Store,
        arr: &ArraySchema,
        at: &NavPath,
        op: ArrayOp,
    ) -> anyhow::Result<Answer<usize>> {
        let items = match value_at(store, at)? {
            Value::Array(items) => preview_items(&arr.element, items),
            _ => Vec::new(),
        };
        if items.is_empty() {
            return Ok(Answer::Cancel);
        }
        let screen = Screen::new(
            self.location(at),
            format!("Please select the {} you would like to {}.", arr.property_name(), op.verb()),
            MENU_HINT,
        );
        self.choose(&screen, &items, at)
    }
}
