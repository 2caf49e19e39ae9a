//! Settings of the setup CLI.
//!
//! Settings are read from a TOML file (`odcli.toml` by default). Every
//! section is optional and falls back to its defaults.
//!
//! # Settings File Format
//!
//! ```toml
//! [header]
//! project_name = "Open Discord"
//! project_version = "1.0.0"
//! color = "#f8ba00"
//!
//! [timing]
//! saved_ms = 400
//!
//! [[configs]]
//! path = "config/general.json"
//! display_name = "General"
//! description = "The general settings of the bot."
//!
//! [[configs]]
//! path = "${env:OD_CONFIG_DIR}/panels.json"
//! schema = "schemas/panels.json"
//! ```

use std::{io::ErrorKind, path::Path, time::Duration};

use anyhow::Context;
use odconfig::{
    EditorOptions,
    cursive::theme::Color,
    prompt::Banner,
    schema::color::preset_color,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Header drawn on top of every screen.
    pub header: HeaderSettings,
    /// Display time of confirmation messages.
    pub timing: TimingSettings,
    /// Config files offered by the config selector.
    pub configs: Vec<ConfigEntry>,
}

/// Header shown on top of every screen.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct HeaderSettings {
    /// Project name used in the welcome line.
    pub project_name: String,
    /// Version shown under the logo.
    pub project_version: String,
    /// Support link shown under the logo.
    pub support: Option<String>,
    /// Logo color as `#rrggbb` or a preset color name.
    pub color: String,
    /// ASCII art logo, one entry per line.
    pub logo: Vec<String>,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            project_name: "Open Discord".to_string(),
            project_version: env!("CARGO_PKG_VERSION").to_string(),
            support: None,
            color: "#f8ba00".to_string(),
            logo: Vec::new(),
        }
    }
}

/// Display time of confirmation messages, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct TimingSettings {
    /// "Saved" confirmations.
    pub saved_ms: u64,
    /// Base time of validation failures.
    pub invalid_ms: u64,
    /// Extra time per validation message.
    pub invalid_per_message_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            saved_ms: 400,
            invalid_ms: 1000,
            invalid_per_message_ms: 2000,
        }
    }
}

/// One editable config file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConfigEntry {
    /// Path of the JSON config, relative to the settings file.
    ///
    /// `${env:NAME}` placeholders are replaced by environment variables.
    pub path: String,
    /// Path of the schema. Defaults to `<name>-schema.json` next to the
    /// config.
    #[serde(default)]
    pub schema: Option<String>,
    /// Name shown in the config selector. Defaults to the file name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Description shown next to the name in the config selector.
    #[serde(default)]
    pub description: Option<String>,
}

impl ConfigEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            schema: None,
            display_name: None,
            description: None,
        }
    }

    /// Name shown in the config selector.
    pub fn name(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        Path::new(&self.path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.clone())
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("Failed to parse settings {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, using default settings", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read settings {}", path.display())),
        }
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            saved_delay: Duration::from_millis(self.timing.saved_ms),
            invalid_delay: Duration::from_millis(self.timing.invalid_ms),
            invalid_delay_per_message: Duration::from_millis(self.timing.invalid_per_message_ms),
        }
    }

    pub fn banner(&self) -> Banner {
        let header = &self.header;
        let mut subtitle = format!(
            "Interactive Setup CLI  -  Version: {}",
            header.project_version
        );
        if let Some(support) = &header.support {
            subtitle.push_str(&format!("  -  Support: {support}"));
        }
        let defaults = Banner::default();
        Banner {
            logo: header.logo.clone(),
            subtitle,
            welcome: format!(
                "👋 Hi! Welcome to the {} Interactive Setup CLI! 👋",
                header.project_name
            ),
            color: parse_color(&header.color).unwrap_or_else(|| {
                warn!("invalid header color \"{}\", using the default", header.color);
                defaults.color
            }),
            ..defaults
        }
    }
}

/// Parse a `#rrggbb` color or a preset color name.
pub fn parse_color(text: &str) -> Option<Color> {
    let hex = preset_color(text).unwrap_or(text).strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings_toml() {
        let settings: Settings = toml::from_str(
            r##"
            [header]
            project_name = "Ticket Bot"
            color = "#ff0000"

            [timing]
            saved_ms = 0

            [[configs]]
            path = "config/general.json"
            description = "The general settings."
            "##,
        )
        .unwrap();
        assert_eq!(settings.header.project_name, "Ticket Bot");
        assert_eq!(settings.timing.saved_ms, 0);
        assert_eq!(settings.timing.invalid_ms, 1000);
        assert_eq!(settings.configs[0].name(), "general");

        let banner = settings.banner();
        assert!(banner.welcome.contains("Ticket Bot"));
        assert_eq!(banner.color, Color::Rgb(255, 0, 0));
        assert_eq!(settings.editor_options().saved_delay, Duration::ZERO);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#f8ba00"), Some(Color::Rgb(0xf8, 0xba, 0)));
        assert_eq!(parse_color("blurple"), Some(Color::Rgb(0x58, 0x65, 0xf2)));
        assert_eq!(parse_color("f8ba00"), None);
        assert_eq!(parse_color("#f8ba0"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[tokio::test]
    async fn test_missing_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("odcli.toml")).await.unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.configs.is_empty());
    }
}
