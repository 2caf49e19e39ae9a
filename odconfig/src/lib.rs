//! # odconfig
//!
//! Schema-driven terminal editor for Open Discord JSON configuration.
//!
//! A config file is described by a [`Schema`] tree: objects, lists, toggled
//! objects, tagged unions of object shapes and unions over JSON types. The
//! [`Editor`] walks the config along its schema, one screen at a time,
//! validates every change and saves the file after each accepted edit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odconfig::{Config, Editor, Schema, prompt::{Banner, TermPrompt}};
//!
//! let mut config = Config::load("config/general.json").unwrap();
//! let schema: Schema = serde_json::from_str(
//!     &std::fs::read_to_string("config/general-schema.json").unwrap(),
//! )
//! .unwrap();
//!
//! let mut prompt = TermPrompt::new(Banner::default());
//! Editor::new(&mut prompt).open(&mut config, &schema).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Checker structures and validation
//! - [`path`] - Locations inside a config tree
//! - [`store`] - Config files and in-memory drafts
//! - [`prompt`] - Terminal capability and its cursive implementation
//! - [`editor`] - The tree walker

#[macro_use]
extern crate log;

/// Schema-driven tree walker.
pub mod editor;

/// Structural errors.
pub mod error;

/// Locations inside a config tree.
pub mod path;

/// Terminal capability used by the editor.
pub mod prompt;

/// Checker structures and validation.
pub mod schema;

/// Config files and in-memory drafts.
pub mod store;

mod run;

pub use cursive;
pub use editor::{Editor, EditorOptions};
pub use error::EditorError;
pub use run::*;
pub use schema::Schema;
pub use serde_json::Value;
pub use store::{Config, Draft, Store};
