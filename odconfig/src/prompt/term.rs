//! Cursive-backed prompt.
//!
//! Every menu or text field is one fullscreen layer under the header. The
//! terminal session opens with the first prompt and stays open until
//! [`TermPrompt::clear`], so consecutive screens replace each other without
//! leaving the alternate screen. Escape goes back, `Ctrl+C` aborts the whole
//! session.

use std::{cmp::Ordering, time::Instant};

use anyhow::bail;
use cursive::{
    Cursive, CursiveRunner, View,
    backends::crossterm::Backend,
    event::{Event, Key},
    theme::{BaseColor, BorderStyle, Color, Effect, PaletteColor, Style, Theme},
    utils::markup::StyledString,
    view::{Nameable, Scrollable},
    views::{Dialog, EditView, LinearLayout, OnEventView, SelectView, TextView},
};

use super::{Answer, Banner, Field, Prompt, Screen, Toast, ToastKind, label_parts};

/// Minimum terminal size the screens are laid out for.
pub const MIN_SIZE: (u16, u16) = (100, 35);

/// Maximum number of suggestions listed under a text field.
const MAX_HINTS: usize = 8;

const INPUT: &str = "input";
const HINTS: &str = "hints";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    Pending,
    Picked(usize),
    Typed(String),
    Back,
    Interrupted,
}

/// Cursive user data.
struct State {
    reply: Reply,
    completer: Completer,
}

/// Tab completion over a fixed suggestion list.
///
/// Repeated Tab presses cycle through the suggestions matching the text
/// typed before the first press.
#[derive(Debug, Default)]
struct Completer {
    suggestions: Vec<String>,
    stem: Option<String>,
    cycle: usize,
}

impl Completer {
    fn new(suggestions: Vec<String>) -> Self {
        Self {
            suggestions,
            ..Default::default()
        }
    }

    fn matches(&self, typed: &str) -> Vec<&String> {
        let typed = typed.to_lowercase();
        self.suggestions
            .iter()
            .filter(|s| s.to_lowercase().starts_with(&typed))
            .collect()
    }

    fn next(&mut self, typed: &str) -> Option<String> {
        let stem = self.stem.get_or_insert_with(|| typed.to_string()).clone();
        let pool = self.matches(&stem);
        if pool.is_empty() {
            return None;
        }
        let pick = pool[self.cycle % pool.len()].clone();
        self.cycle += 1;
        Some(pick)
    }

    /// Forget the cycle after the user edits the text.
    fn reset(&mut self) {
        self.stem = None;
        self.cycle = 0;
    }

    fn hint_line(&self, typed: &str) -> String {
        let found = self.matches(typed);
        if found.is_empty() {
            return String::new();
        }
        let list = found
            .iter()
            .take(MAX_HINTS)
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("  ");
        format!("Tab: {list}")
    }
}

fn reply(s: &mut Cursive, reply: Reply) {
    s.with_user_data(|st: &mut State| st.reply = reply);
}

fn complete(s: &mut Cursive) {
    let typed = s
        .call_on_name(INPUT, |v: &mut EditView| v.get_content().to_string())
        .unwrap_or_default();
    let Some(next) = s.with_user_data(|st: &mut State| st.completer.next(&typed)).flatten() else {
        return;
    };
    s.call_on_name(INPUT, |v: &mut EditView| {
        let _ = v.set_content(next);
    });
}

fn theme(base: &Theme) -> Theme {
    let mut theme = base.clone();
    theme.shadow = false;
    theme.borders = BorderStyle::Simple;
    theme.palette[PaletteColor::Background] = Color::TerminalDefault;
    theme.palette[PaletteColor::View] = Color::TerminalDefault;
    theme.palette[PaletteColor::Primary] = Color::TerminalDefault;
    theme.palette[PaletteColor::Highlight] = Color::Dark(BaseColor::Blue);
    theme.palette[PaletteColor::HighlightText] = Color::Light(BaseColor::White);
    theme
}

fn gray() -> Color {
    Color::Light(BaseColor::Black)
}

/// Menu entry: extra text in gray, "continue" entries in magenta.
fn menu_label(item: &str) -> StyledString {
    if item.starts_with("-> ") {
        return StyledString::styled(item, Color::Light(BaseColor::Magenta));
    }
    let (name, extra) = label_parts(item);
    let mut label = StyledString::plain(name);
    if !extra.is_empty() {
        label.append_styled(extra, gray());
    }
    label
}

/// Interactive terminal prompt.
pub struct TermPrompt {
    banner: Banner,
    session: Option<CursiveRunner<Cursive>>,
}

impl TermPrompt {
    pub fn new(banner: Banner) -> Self {
        Self { banner, session: None }
    }

    /// Warning text when the terminal is smaller than [`MIN_SIZE`].
    pub fn size_warning() -> Option<String> {
        let (w, h) = crossterm::terminal::size().ok()?;
        if w >= MIN_SIZE.0 && h >= MIN_SIZE.1 {
            return None;
        }
        Some(format!(
            "Make sure your terminal window has a minimum width & height of {}x{} characters, \
             otherwise screens will be rendered incorrectly. Current size: {w}x{h}.",
            MIN_SIZE.0, MIN_SIZE.1
        ))
    }

    /// Close the terminal session and restore the terminal.
    pub fn clear(&mut self) -> anyhow::Result<()> {
        if self.session.take().is_some() {
            debug!("terminal session closed");
        }
        Ok(())
    }

    fn session(&mut self) -> anyhow::Result<&mut CursiveRunner<Cursive>> {
        let runner = match self.session.take() {
            Some(runner) => runner,
            None => {
                let mut siv = Cursive::new();
                let theme = theme(siv.current_theme());
                siv.set_theme(theme);
                siv.set_user_data(State {
                    reply: Reply::Pending,
                    completer: Completer::default(),
                });
                siv.add_global_callback(Key::Esc, |s| reply(s, Reply::Back));
                siv.clear_global_callbacks(Event::CtrlChar('c'));
                siv.add_global_callback(Event::CtrlChar('c'), |s| reply(s, Reply::Interrupted));
                debug!("terminal session opened");
                siv.into_runner(Backend::init()?)
            }
        };
        Ok(self.session.insert(runner))
    }

    fn header(&self, screen: &Screen) -> TextView {
        let mut text = StyledString::new();
        let logo = self.banner.logo.len();
        for (i, line) in self.banner.render(screen.location.as_deref()).into_iter().enumerate() {
            let style = match i.cmp(&logo) {
                Ordering::Less => Style::from(self.banner.color),
                Ordering::Equal => Style::from(Effect::Bold),
                Ordering::Greater => Style::from(Color::Dark(BaseColor::Cyan)),
            };
            text.append_styled(line, style);
            text.append_plain("\n");
        }
        text.append_styled(
            screen.title.as_str(),
            Style::from(Color::Light(BaseColor::Green)).combine(Effect::Bold),
        );
        text.append_plain("\n");
        text.append_styled(screen.hint.as_str(), Style::from(gray()).combine(Effect::Italic));
        text.append_plain("\n");
        if !screen.details.is_empty() {
            text.append_plain("\n");
            for (label, value) in &screen.details {
                text.append_styled(format!("{label}: "), gray());
                text.append_styled(value.as_str(), Effect::Bold);
                text.append_plain("\n");
            }
        }
        TextView::new(text)
    }

    /// Replace the current screen with `body` under the header.
    fn show(&mut self, screen: &Screen, body: impl View) -> anyhow::Result<()> {
        let header = self.header(screen);
        let siv = self.session()?;
        while siv.pop_layer().is_some() {}
        siv.with_user_data(|st: &mut State| st.reply = Reply::Pending);
        siv.add_fullscreen_layer(LinearLayout::vertical().child(header).child(body));
        Ok(())
    }

    /// Run the event loop until the user answers the current screen.
    fn wait(&mut self) -> anyhow::Result<Reply> {
        let siv = self.session()?;
        siv.refresh();
        loop {
            let reply = siv
                .with_user_data(|st: &mut State| std::mem::replace(&mut st.reply, Reply::Pending))
                .unwrap_or(Reply::Pending);
            match reply {
                Reply::Pending => {
                    siv.step();
                }
                Reply::Interrupted => bail!("interrupted"),
                other => return Ok(other),
            }
        }
    }
}

impl Prompt for TermPrompt {
    fn select(&mut self, screen: &Screen, items: &[String]) -> anyhow::Result<Answer<usize>> {
        let mut menu = SelectView::<usize>::new();
        for (i, item) in items.iter().enumerate() {
            menu.add_item(menu_label(item), i);
        }
        menu.set_on_submit(|s: &mut Cursive, i: &usize| reply(s, Reply::Picked(*i)));
        self.show(screen, menu.scrollable())?;
        match self.wait()? {
            Reply::Picked(i) => Ok(Answer::Submit(i)),
            _ => Ok(Answer::Cancel),
        }
    }

    fn input(&mut self, screen: &Screen, field: &Field) -> anyhow::Result<Answer<String>> {
        let prefill = field.prefill.clone().unwrap_or_default();
        let completer = Completer::new(field.suggestions.clone());
        let hints = TextView::new(StyledString::styled(completer.hint_line(&prefill), gray())).with_name(HINTS);

        let edit = EditView::new()
            .content(prefill)
            .on_edit(|s: &mut Cursive, text: &str, _cursor: usize| {
                let line = s
                    .with_user_data(|st: &mut State| {
                        st.completer.reset();
                        st.completer.hint_line(text)
                    })
                    .unwrap_or_default();
                s.call_on_name(HINTS, |v: &mut TextView| {
                    v.set_content(StyledString::styled(line, gray()))
                });
            })
            .on_submit(|s: &mut Cursive, text: &str| reply(s, Reply::Typed(text.to_string())))
            .with_name(INPUT);
        let body = LinearLayout::vertical()
            .child(OnEventView::new(edit).on_pre_event(Key::Tab, complete))
            .child(hints);

        self.show(screen, body)?;
        self.session()?
            .with_user_data(|st: &mut State| st.completer = completer);
        match self.wait()? {
            Reply::Typed(text) => Ok(Answer::Submit(text)),
            _ => Ok(Answer::Cancel),
        }
    }

    fn notify(&mut self, toast: &Toast) -> anyhow::Result<()> {
        let icon = match toast.kind {
            ToastKind::Success => "✅",
            ToastKind::Failure => "❌",
        };
        let mut text = StyledString::styled(
            format!("{icon} {}", toast.message),
            Style::from(Color::Light(BaseColor::Blue)).combine(Effect::Bold),
        );
        for d in &toast.details {
            text.append_plain("\n");
            text.append_styled(d.as_str(), Color::Dark(BaseColor::Red));
        }

        let siv = self.session()?;
        siv.with_user_data(|st: &mut State| st.reply = Reply::Pending);
        siv.add_layer(Dialog::around(TextView::new(text)));
        siv.refresh();
        let deadline = Instant::now() + toast.duration;
        let mut interrupted = false;
        while Instant::now() < deadline {
            let reply = siv
                .with_user_data(|st: &mut State| std::mem::replace(&mut st.reply, Reply::Pending))
                .unwrap_or(Reply::Pending);
            match reply {
                Reply::Pending => {
                    siv.step();
                }
                Reply::Interrupted => {
                    interrupted = true;
                    break;
                }
                // any other key dismisses the message early
                _ => break,
            }
        }
        siv.pop_layer();
        if interrupted {
            bail!("interrupted");
        }
        Ok(())
    }
}
