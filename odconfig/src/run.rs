use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    editor::{Editor, EditorOptions},
    prompt::{Banner, TermPrompt},
    schema::Schema,
    store::{Config, default_schema_by_init},
};

/// Read a config file and the schema describing it.
///
/// A missing or empty config file starts from an empty object.
///
/// # Errors
///
/// Returns errors when the schema cannot be read, or either file cannot be
/// parsed.
pub async fn load(config_path: &Path, schema_path: &Path) -> anyhow::Result<(Config, Schema)> {
    let content = tokio::fs::read_to_string(config_path)
        .await
        .unwrap_or_default();
    let config = Config::parse(config_path, &content)?;

    let schema_content = tokio::fs::read_to_string(schema_path)
        .await
        .with_context(|| format!("Failed to read schema {}", schema_path.display()))?;
    let schema: Schema = serde_json::from_str(&schema_content)
        .with_context(|| format!("Failed to parse schema {}", schema_path.display()))?;
    Ok((config, schema))
}

/// Open the interactive editor on a config file.
///
/// `schema_path` defaults to `<name>-schema.json` next to the config. The
/// editor runs on a blocking thread until the user leaves the root screen.
/// Every accepted edit is already saved when this returns.
///
/// # Errors
///
/// Returns errors when loading fails, the config does not fit its schema,
/// or the terminal cannot be driven.
pub async fn run(
    config_path: impl AsRef<Path>,
    schema_path: Option<PathBuf>,
    options: EditorOptions,
    banner: Banner,
) -> anyhow::Result<Config> {
    let config_path = config_path.as_ref();
    let schema_path = schema_path.unwrap_or_else(|| default_schema_by_init(config_path));
    let (mut config, schema) = load(config_path, &schema_path).await?;
    config.backup = true;
    info!("editing {} with {}", config_path.display(), schema_path.display());

    tokio::task::spawn_blocking(move || {
        let mut prompt = TermPrompt::new(banner);
        let res = Editor::new(&mut prompt)
            .with_options(options)
            .open(&mut config, &schema);
        prompt.clear()?;
        res.map(|_| config)
    })
    .await?
}
