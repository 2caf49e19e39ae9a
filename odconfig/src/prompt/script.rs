//! Scripted prompt used by the editor tests.

use std::collections::VecDeque;

use anyhow::bail;

use super::{Answer, Field, Prompt, Screen, Toast};

/// One scripted user action.
#[derive(Debug, Clone)]
pub enum Step {
    /// Answer the menu with this index, even one past its end.
    Pick(usize),
    /// Pick the first menu entry starting with this text.
    PickText(&'static str),
    /// Type this text and press enter.
    Type(&'static str),
    /// Press escape.
    Back,
}

/// Something the editor showed.
#[derive(Debug, Clone)]
pub enum Shown {
    Menu { screen: Screen, items: Vec<String> },
    Input { screen: Screen, field: Field },
    Toast(Toast),
}

#[derive(Debug, Default)]
pub struct ScriptPrompt {
    steps: VecDeque<Step>,
    pub shown: Vec<Shown>,
}

impl ScriptPrompt {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            shown: Vec::new(),
        }
    }

    pub fn finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every input field shown, in order.
    pub fn fields(&self) -> Vec<&Field> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Input { field, .. } => Some(field),
                _ => None,
            })
            .collect()
    }

    /// Every screen shown, in order.
    pub fn screens(&self) -> Vec<&Screen> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Menu { screen, .. } | Shown::Input { screen, .. } => Some(screen),
                _ => None,
            })
            .collect()
    }

    /// Messages of every toast shown, in order.
    pub fn toasts(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Toast(t) => Some(t.message.as_str()),
                _ => None,
            })
            .collect()
    }

    fn next(&mut self) -> anyhow::Result<Step> {
        match self.steps.pop_front() {
            Some(step) => Ok(step),
            None => bail!("script exhausted"),
        }
    }
}

impl Prompt for ScriptPrompt {
    fn select(&mut self, screen: &Screen, items: &[String]) -> anyhow::Result<Answer<usize>> {
        self.shown.push(Shown::Menu {
            screen: screen.clone(),
            items: items.to_vec(),
        });
        match self.next()? {
            Step::Pick(i) => Ok(Answer::Submit(i)),
            Step::PickText(text) => match items.iter().position(|it| it.starts_with(text)) {
                Some(i) => Ok(Answer::Submit(i)),
                None => bail!("no menu entry starts with {text:?} in {items:?}"),
            },
            Step::Back => Ok(Answer::Cancel),
            other => bail!("unexpected {other:?} for menu {items:?}"),
        }
    }

    fn input(&mut self, screen: &Screen, field: &Field) -> anyhow::Result<Answer<String>> {
        self.shown.push(Shown::Input {
            screen: screen.clone(),
            field: field.clone(),
        });
        match self.next()? {
            Step::Type(text) => Ok(Answer::Submit(text.to_string())),
            Step::Back => Ok(Answer::Cancel),
            other => bail!("unexpected {other:?} for input {:?}", screen.title),
        }
    }

    fn notify(&mut self, toast: &Toast) -> anyhow::Result<()> {
        self.shown.push(Shown::Toast(toast.clone()));
        Ok(())
    }
}
