//! Configuration for Pinnote.
//!
//! Preferences live in `config.kdl` files:
//! - System: `~/.config/pinnote/config.kdl`
//! - Session: `<data-dir>/config.kdl` (next to `notes.json`)
//!
//! Keys:
//! - `output-format` - "json" or "human"
//! - `id-space` - ids are drawn from `[0, id-space)`
//! - `csv-escape` - quote CSV content that holds separators
//!
//! ## Precedence
//!
//! CLI flag > session config > system config > defaults.
//! Use the [`resolver`] module for resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_FILE_NAME, ConfigOverrides, ConfigPaths, Resolved, ResolvedConfig, ValueSource,
    resolve_config,
};
pub use schema::{CONFIG_KEYS, OutputFormat, PinnoteConfig};
