//! Interactive config editing.
//!
//! With a single target config the editor opens on it directly. With more
//! than one, a config selector is shown first and the user returns to it
//! after leaving each config.

use std::path::PathBuf;

use anyhow::Result;
use odconfig::{
    Config, Editor, EditorOptions, Schema,
    prompt::{Answer, MENU_HINT, Prompt, Screen, TermPrompt, align_labels},
};

use crate::{ctx::AppContext, settings::ConfigEntry};

/// A config loaded together with its schema.
pub struct Loaded {
    pub entry: ConfigEntry,
    pub config: Config,
    pub schema: Schema,
}

/// Handler for the `edit` command.
pub struct MenuConfigHandler;

impl MenuConfigHandler {
    /// Handles the `edit` command.
    ///
    /// # Errors
    ///
    /// Returns an error if a config or schema cannot be loaded, a config does
    /// not fit its schema, or saving fails.
    pub async fn handle_menuconfig(ctx: &AppContext, paths: &[PathBuf]) -> Result<()> {
        let targets = ctx.targets(paths)?;
        let options = ctx.settings.editor_options();
        let banner = ctx.settings.banner();

        if let [entry] = targets.as_slice() {
            let (config, schema) = ctx.resolve(entry)?;
            odconfig::run(config, Some(schema), options, banner).await?;
            return Ok(());
        }
        if targets.is_empty() {
            bail!("No config files to edit. Add [[configs]] to the settings or pass config paths.");
        }

        let mut loaded = Vec::with_capacity(targets.len());
        for entry in targets {
            let (config_path, schema_path) = ctx.resolve(&entry)?;
            let (mut config, schema) = odconfig::load(&config_path, &schema_path).await?;
            config.backup = true;
            loaded.push(Loaded { entry, config, schema });
        }
        info!("{} configs loaded", loaded.len());

        tokio::task::spawn_blocking(move || {
            let mut prompt = TermPrompt::new(banner);
            let res = select_and_edit(&mut prompt, &options, &mut loaded);
            prompt.clear()?;
            res
        })
        .await?
    }
}

/// Entries of the config selector.
pub fn selector_items(loaded: &[Loaded]) -> Vec<String> {
    let rows: Vec<(String, String)> = loaded
        .iter()
        .map(|l| {
            let hint = l
                .entry
                .description
                .as_ref()
                .map(|d| format!("=> {d}"))
                .unwrap_or_default();
            (l.entry.name(), hint)
        })
        .collect();
    align_labels(&rows)
}

/// Show the config selector until the user goes back from it.
pub fn select_and_edit(prompt: &mut dyn Prompt, options: &EditorOptions, loaded: &mut [Loaded]) -> Result<()> {
    let screen = Screen::new(
        None,
        "Please select which config you would like to edit.",
        MENU_HINT,
    );
    let items = selector_items(loaded);
    loop {
        let Answer::Submit(i) = prompt.select(&screen, &items)? else {
            return Ok(());
        };
        let Some(Loaded { config, schema, .. }) = loaded.get_mut(i) else {
            bail!("config selector answered entry {i} of {}", items.len());
        };
        info!("editing {}", config.path().display());
        Editor::new(&mut *prompt)
            .with_options(options.clone())
            .open(config, schema)?;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use odconfig::{
        Value,
        prompt::{Field, Toast},
        schema::ObjectChild,
    };
    use serde_json::json;

    use super::*;

    /// Answers menus from a fixed list.
    struct Replay {
        answers: VecDeque<Answer<usize>>,
        titles: Vec<String>,
    }

    impl Prompt for Replay {
        fn select(&mut self, screen: &Screen, _items: &[String]) -> Result<Answer<usize>> {
            self.titles.push(screen.title.clone());
            self.answers.pop_front().ok_or_else(|| anyhow!("no answer left"))
        }

        fn input(&mut self, _screen: &Screen, _field: &Field) -> Result<Answer<String>> {
            bail!("unexpected text input")
        }

        fn notify(&mut self, _toast: &Toast) -> Result<()> {
            Ok(())
        }
    }

    fn loaded(dir: &std::path::Path, name: &str, description: Option<&str>) -> Loaded {
        let mut entry = ConfigEntry::new(format!("{name}.json"));
        entry.description = description.map(str::to_string);
        Loaded {
            entry,
            config: Config::from_value(dir.join(format!("{name}.json")), json!({"enabled": false})),
            schema: Schema::object(vec![ObjectChild::new("enabled", Schema::boolean())]),
        }
    }

    #[test]
    fn test_selector_items() {
        let dir = tempfile::tempdir().unwrap();
        let items = selector_items(&[
            loaded(dir.path(), "general", Some("The general settings.")),
            loaded(dir.path(), "options", None),
        ]);
        assert_eq!(items, vec!["general     => The general settings.", "options"]);
    }

    #[test]
    fn test_select_and_edit_returns_to_selector() {
        let dir = tempfile::tempdir().unwrap();
        let mut configs = vec![loaded(dir.path(), "general", None), loaded(dir.path(), "options", None)];
        let mut prompt = Replay {
            answers: VecDeque::from([
                Answer::Submit(1),
                Answer::Submit(0),
                Answer::Submit(1),
                Answer::Cancel,
                Answer::Cancel,
            ]),
            titles: Vec::new(),
        };

        select_and_edit(&mut prompt, &EditorOptions::instant(), &mut configs).unwrap();

        assert_eq!(prompt.titles.first(), prompt.titles.last());
        assert_eq!(prompt.titles.len(), 5);
        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("options.json")).unwrap()).unwrap();
        assert_eq!(saved, json!({"enabled": true}));
        assert!(!dir.path().join("general.json").exists());
    }

    #[test]
    fn test_select_and_edit_rejects_unknown_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut configs = vec![loaded(dir.path(), "general", None)];
        let mut prompt = Replay {
            answers: VecDeque::from([Answer::Submit(3)]),
            titles: Vec::new(),
        };
        let err = select_and_edit(&mut prompt, &EditorOptions::instant(), &mut configs).unwrap_err();
        assert!(err.to_string().contains("entry 3"));
    }
}
