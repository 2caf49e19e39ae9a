//! # odcli
//!
//! Interactive setup CLI for Open Discord configuration files.
//!
//! ## Modules
//!
//! - [`settings`] - The `odcli.toml` settings file
//! - [`ctx`] - Application context and config resolution
//! - [`menuconfig`] - Config selector and interactive editing
//! - [`check`] - Non-interactive validation
//! - [`utils`] - Common utilities and helper functions

/// Validation of config files without the editor.
pub mod check;

/// Application context.
pub mod ctx;

/// Config selector and interactive editing.
pub mod menuconfig;

/// CLI settings.
pub mod settings;

/// Common utilities and helper functions.
pub mod utils;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
