//! Backing stores for edited documents.

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::{Context, bail};
use serde_json::Value;

/// A JSON document the editor can mutate and persist.
pub trait Store {
    /// The whole document.
    fn root(&self) -> &Value;

    /// The whole document, mutably.
    fn root_mut(&mut self) -> &mut Value;

    /// Persist the current document.
    fn save(&mut self) -> anyhow::Result<()>;

    /// Label shown as the first element of the header location.
    fn label(&self) -> String;
}

/// A JSON config file.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    /// The parsed config tree.
    pub data: Value,
    /// Copy the original file aside before the first save.
    pub backup: bool,
    backed_up: bool,
}

impl Config {
    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(path, &content)
    }

    /// Build a config from file content that has already been read.
    pub fn parse(path: impl AsRef<Path>, content: &str) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        if ext != "json" {
            bail!("Unsupported config file extension: {ext:?}");
        }
        let data = if content.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        };
        Ok(Self::from_value(path, data))
    }

    /// Wrap an in-memory tree that will be saved to `path`.
    pub fn from_value(path: impl AsRef<Path>, data: Value) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data,
            backup: false,
            backed_up: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_original(&mut self) -> anyhow::Result<()> {
        if !self.backup || self.backed_up || !self.path.exists() {
            return Ok(());
        }
        let bk = format!(
            "bk-{:?}.json",
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)?
                .as_secs()
        );
        let backup_path = self.path.with_extension(bk);
        fs::copy(&self.path, &backup_path)?;
        debug!("backup of {} written to {}", self.path.display(), backup_path.display());
        self.backed_up = true;
        Ok(())
    }
}

impl Store for Config {
    fn root(&self) -> &Value {
        &self.data
    }

    fn root_mut(&mut self) -> &mut Value {
        &mut self.data
    }

    fn save(&mut self) -> anyhow::Result<()> {
        self.backup_original()?;
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!("saved {}", self.path.display());
        Ok(())
    }

    fn label(&self) -> String {
        format!("({})", self.path.display())
    }
}

/// A value under construction that has not been inserted anywhere yet.
///
/// Saving a draft is a no-op: the finished value is persisted by whoever
/// inserts it into a real store.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub value: Value,
    label: String,
}

impl Draft {
    pub fn new(value: Value, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

impl Store for Draft {
    fn root(&self) -> &Value {
        &self.value
    }

    fn root_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    fn save(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// Derive the schema path belonging to a config path.
///
/// `config/general.json` maps to `config/general-schema.json`.
pub fn default_schema_by_init(config: &Path) -> PathBuf {
    let binding = config
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut name_split = binding.split('.').collect::<Vec<_>>();
    if name_split.len() > 1 {
        name_split.pop();
    }

    let name = format!("{}-schema.json", name_split.join("."));

    if let Some(parent) = config.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}
