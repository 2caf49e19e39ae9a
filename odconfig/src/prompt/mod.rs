//! Terminal capability used by the editor.
//!
//! The editor never talks to the terminal directly. It describes each
//! screen with a [`Screen`] and asks a [`Prompt`] for either a menu
//! selection or a line of text. Cancellation is a normal answer
//! ([`Answer::Cancel`]), not an error.

use std::time::Duration;

use cursive::theme::Color;

/// Cursive implementation of [`Prompt`].
pub mod term;

#[cfg(test)]
pub(crate) mod script;

pub use term::TermPrompt;

/// Result of one interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    /// The user confirmed a choice or a value.
    Submit(T),
    /// The user went back (escape).
    Cancel,
}

impl<T> Answer<T> {
    pub fn is_cancel(&self) -> bool {
        matches!(self, Answer::Cancel)
    }
}

/// Everything shown above a menu or an input field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    /// Current location, `None` on top-level screens.
    pub location: Option<String>,
    /// Main instruction line.
    pub title: String,
    /// Key usage hint shown under the title.
    pub hint: String,
    /// Labelled information rows ("Current value", "Description", ...).
    pub details: Vec<(String, String)>,
}

/// Hint for menu screens.
pub const MENU_HINT: &str = "(use arrow keys to navigate, go back using escape)";
/// Hint for text input screens.
pub const INPUT_HINT: &str = "(insert a new value and press enter, go back using escape)";

impl Screen {
    pub fn new(location: Option<String>, title: impl Into<String>, hint: &str) -> Self {
        Self {
            location,
            title: title.into(),
            hint: hint.to_string(),
            details: Vec::new(),
        }
    }

    pub fn detail(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((label.into(), value.into()));
        self
    }
}

/// Text input configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// Text already present in the input when it opens.
    pub prefill: Option<String>,
    /// Autocomplete suggestions.
    pub suggestions: Vec<String>,
}

/// Kind of confirmation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Failure,
}

/// A timed confirmation or error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub details: Vec<String>,
    /// How long the message stays on screen before the next screen.
    pub duration: Duration,
}

/// Abstract "render menu / render text field" terminal.
pub trait Prompt {
    /// Show `screen` with a single column menu and wait for a choice.
    fn select(&mut self, screen: &Screen, items: &[String]) -> anyhow::Result<Answer<usize>>;

    /// Show `screen` with a text field and wait for a value.
    fn input(&mut self, screen: &Screen, field: &Field) -> anyhow::Result<Answer<String>>;

    /// Show a timed message below the current screen.
    fn notify(&mut self, toast: &Toast) -> anyhow::Result<()>;
}

/// Center `text` in a line of `width` columns.
pub fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if width < len {
        return text.to_string();
    }
    let pad = (width - len + 1) / 2;
    format!("{}{text}", " ".repeat(pad))
}

/// Columns between a label and its extra text.
const LABEL_GAP: usize = 5;

/// Align menu labels: names padded to the longest name plus five columns,
/// followed by the extra text.
pub fn align_labels(rows: &[(String, String)]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        + LABEL_GAP;
    rows.iter()
        .map(|(name, extra)| {
            if extra.is_empty() {
                name.clone()
            } else {
                format!("{name:<width$}{extra}")
            }
        })
        .collect()
}

/// Split an aligned label into its name and its extra text.
pub fn label_parts(label: &str) -> (&str, &str) {
    match label.find(&" ".repeat(LABEL_GAP)) {
        Some(pos) => {
            let extra = label[pos..].trim_start();
            (&label[..label.len() - extra.len()], extra)
        }
        None => (label, ""),
    }
}

/// Header drawn on top of every screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Logo lines.
    pub logo: Vec<String>,
    /// Centered line under the logo.
    pub subtitle: String,
    /// Location line used on top-level screens.
    pub welcome: String,
    /// Width used for centering.
    pub width: usize,
    /// Color of the logo.
    pub color: Color,
}

impl Default for Banner {
    fn default() -> Self {
        Self {
            logo: Vec::new(),
            subtitle: "Interactive Setup CLI".to_string(),
            welcome: "Hi! Welcome to the Interactive Setup CLI!".to_string(),
            width: 88,
            color: Color::Rgb(0xf8, 0xba, 0x00),
        }
    }
}

impl Banner {
    /// Header lines for a screen at `location`.
    pub fn render(&self, location: Option<&str>) -> Vec<String> {
        let mut lines = self.logo.clone();
        lines.push(center_text(&self.subtitle, self.width));
        match location {
            Some(loc) => lines.push(center_text(&format!("🌐 Current Location: {loc}"), self.width)),
            None => lines.push(center_text(&self.welcome, self.width)),
        }
        lines.push(String::new());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_text() {
        assert_eq!(center_text("abc", 2), "abc");
        assert_eq!(center_text("abc", 7), "  abc");
        assert_eq!(center_text("ab", 6), "  ab");
    }

    #[test]
    fn test_align_labels() {
        let rows = vec![
            ("token".to_string(), "=> The bot token".to_string()),
            ("status".to_string(), String::new()),
        ];
        let out = align_labels(&rows);
        assert_eq!(out[0], "token      => The bot token");
        assert_eq!(out[1], "status");
        assert_eq!(label_parts(&out[0]), ("token      ", "=> The bot token"));
        assert_eq!(label_parts(&out[1]), ("status", ""));
    }

    #[test]
    fn test_banner_location_line() {
        let banner = Banner {
            logo: vec!["LOGO".into()],
            width: 20,
            ..Default::default()
        };
        let lines = banner.render(Some("a.b"));
        assert_eq!(lines[0], "LOGO");
        assert!(lines[2].ends_with("Current Location: a.b"));
        let top = banner.render(None);
        assert!(top[2].contains("Welcome"));
    }
}
