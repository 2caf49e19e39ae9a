//! Application context.
//!
//! [`AppContext`] holds the loaded settings and resolves the config files
//! a command works on.

use std::path::{Path, PathBuf};

use odconfig::store::default_schema_by_init;

use crate::{
    settings::{ConfigEntry, Settings},
    utils::replace_env_placeholders,
};

/// The main application context.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// Loaded CLI settings.
    pub settings: Settings,
    /// Directory relative config paths are resolved against.
    pub workspace: PathBuf,
}

impl AppContext {
    /// Load the settings file and use its directory as workspace.
    pub async fn new(settings_path: &Path) -> anyhow::Result<Self> {
        let settings = Settings::load(settings_path).await?;
        let workspace = settings_path.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!(
            "{} config(s) configured in {}",
            settings.configs.len(),
            settings_path.display()
        );
        Ok(Self { settings, workspace })
    }

    /// Config and schema paths of `entry`.
    pub fn resolve(&self, entry: &ConfigEntry) -> anyhow::Result<(PathBuf, PathBuf)> {
        let config = self.workspace.join(replace_env_placeholders(&entry.path)?);
        let schema = match &entry.schema {
            Some(schema) => self.workspace.join(replace_env_placeholders(schema)?),
            None => default_schema_by_init(&config),
        };
        Ok((config, schema))
    }

    /// Configs a command works on.
    ///
    /// Without explicit paths every configured entry is used. Explicit
    /// paths reuse the matching configured entry, so its name and schema
    /// still apply.
    pub fn targets(&self, paths: &[PathBuf]) -> anyhow::Result<Vec<ConfigEntry>> {
        if paths.is_empty() {
            return Ok(self.settings.configs.clone());
        }
        let mut out = Vec::with_capacity(paths.len());
        for path in paths {
            let wanted = std::path::absolute(path)?;
            let mut found = None;
            for entry in &self.settings.configs {
                let (config, _) = self.resolve(entry)?;
                if std::path::absolute(&config)? == wanted {
                    found = Some(entry.clone());
                    break;
                }
            }
            out.push(found.unwrap_or_else(|| ConfigEntry::new(wanted.to_string_lossy())));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AppContext {
        let mut settings = Settings::default();
        let mut general = ConfigEntry::new("config/general.json");
        general.display_name = Some("General".into());
        let mut panels = ConfigEntry::new("config/panels.json");
        panels.schema = Some("schemas/panels.json".into());
        settings.configs = vec![general, panels];
        AppContext {
            settings,
            workspace: PathBuf::from("bot"),
        }
    }

    #[test]
    fn test_resolve_paths() {
        let ctx = ctx();
        let (config, schema) = ctx.resolve(&ctx.settings.configs[0]).unwrap();
        assert_eq!(config, PathBuf::from("bot/config/general.json"));
        assert_eq!(schema, PathBuf::from("bot/config/general-schema.json"));

        let (_, schema) = ctx.resolve(&ctx.settings.configs[1]).unwrap();
        assert_eq!(schema, PathBuf::from("bot/schemas/panels.json"));
    }

    #[test]
    fn test_targets() {
        let ctx = ctx();
        assert_eq!(ctx.targets(&[]).unwrap().len(), 2);

        let picked = ctx.targets(&[PathBuf::from("bot/config/general.json")]).unwrap();
        assert_eq!(picked[0].name(), "General");

        let other = ctx.targets(&[PathBuf::from("other.json")]).unwrap();
        assert_eq!(other[0].name(), "other");
        assert!(Path::new(&other[0].path).is_absolute());
    }
}
