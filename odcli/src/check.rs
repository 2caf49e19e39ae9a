//! Non-interactive validation of config files.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use odconfig::{
    Store,
    schema::{Severity, Validation},
};

use crate::ctx::AppContext;

/// Handler for the `check` command.
pub struct CheckHandler;

impl CheckHandler {
    /// Validate every target config and print a report.
    ///
    /// Returns the total number of errors found.
    pub async fn handle_check(ctx: &AppContext, paths: &[PathBuf]) -> Result<usize> {
        let targets = ctx.targets(paths)?;
        if targets.is_empty() {
            bail!("No config files to check. Add [[configs]] to the settings or pass config paths.");
        }
        let mut errors = 0;
        for entry in targets {
            let (config_path, schema_path) = ctx.resolve(&entry)?;
            let (config, schema) = odconfig::load(&config_path, &schema_path).await?;
            let validation = schema.check(config.root(), &[]);
            for line in report(&entry.name(), &validation) {
                println!("{line}");
            }
            errors += validation.errors().count();
        }
        Ok(errors)
    }
}

/// Printable report of one config.
pub fn report(name: &str, validation: &Validation) -> Vec<String> {
    let count = validation.errors().count();
    let mut lines = if count == 0 {
        vec![format!("✅ {name}: valid").green().bold().to_string()]
    } else {
        vec![format!("❌ {name}: {count} error(s)").red().bold().to_string()]
    };
    for d in &validation.diagnostics {
        let text = d.to_string();
        let text = match d.severity {
            Severity::Error => text.red(),
            Severity::Warning => text.yellow(),
            Severity::Info => text.bright_black(),
        };
        lines.push(format!("   {text}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ConfigEntry;
    use odconfig::schema::Diagnostic;

    #[test]
    fn test_report() {
        colored::control::set_override(false);
        let validation = Validation {
            diagnostics: vec![
                Diagnostic {
                    severity: Severity::Error,
                    path: "token".into(),
                    message: "property \"token\" is missing".into(),
                },
                Diagnostic {
                    severity: Severity::Warning,
                    path: "extra".into(),
                    message: "unknown property \"extra\"".into(),
                },
            ],
        };
        let lines = report("general", &validation);
        assert_eq!(lines[0], "❌ general: 1 error(s)");
        assert_eq!(lines[1], "   => [ERROR] property \"token\" is missing (path: token)");
        assert_eq!(report("general", &Validation::default()), vec!["✅ general: valid"]);
    }

    #[tokio::test]
    async fn test_handle_check_counts_errors() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("general.json"), r#"{"limit": -1}"#)
            .await
            .unwrap();
        tokio::fs::write(
            dir.path().join("general-schema.json"),
            r#"{"type": "object", "children": [
                {"key": "limit", "schema": {"type": "number", "min": 0}},
                {"key": "token", "schema": {"type": "string"}}
            ]}"#,
        )
        .await
        .unwrap();

        let mut ctx = AppContext {
            workspace: dir.path().to_path_buf(),
            ..Default::default()
        };
        ctx.settings.configs.push(ConfigEntry::new("general.json"));
        assert_eq!(CheckHandler::handle_check(&ctx, &[]).await.unwrap(), 2);
    }
}
