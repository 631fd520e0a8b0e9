//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Session config.kdl (`<data-dir>/config.kdl`)
//! 3. System config.kdl (`~/.config/pinnote/config.kdl`)
//! 4. Built-in defaults

use crate::Result;
use crate::config::schema::{KEY_CSV_ESCAPE, KEY_ID_SPACE, KEY_OUTPUT_FORMAT};
use crate::config::{OutputFormat, PinnoteConfig};
use crate::export::CsvMode;
use crate::storage::DEFAULT_ID_SPACE;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file name at every level.
pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from session-level config
    Session,
    /// Value from system-level config
    System,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Session => write!(f, "session"),
            ValueSource::System => write!(f, "system"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Output format preference
    pub output_format: Resolved<OutputFormat>,
    /// Size of the note id space
    pub id_space: Resolved<u32>,
    /// Quote CSV fields that need it
    pub csv_escape: Resolved<bool>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            id_space: Resolved::new(DEFAULT_ID_SPACE, ValueSource::Default),
            csv_escape: Resolved::new(true, ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn id_space(&self) -> u32 {
        self.id_space.value
    }

    /// CSV mode implied by `csv-escape`.
    pub fn csv_mode(&self) -> CsvMode {
        CsvMode::from_escape(self.csv_escape.value)
    }

    /// All keys with their value and source, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String, &ValueSource)> {
        vec![
            (
                KEY_OUTPUT_FORMAT,
                self.output_format.value.to_string(),
                &self.output_format.source,
            ),
            (
                KEY_ID_SPACE,
                self.id_space.value.to_string(),
                &self.id_space.source,
            ),
            (
                KEY_CSV_ESCAPE,
                self.csv_escape.value.to_string(),
                &self.csv_escape.source,
            ),
        ]
    }
}

/// CLI-level overrides for configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_format: Option<OutputFormat>,
    pub csv_escape: Option<bool>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_csv_escape(mut self, escape: bool) -> Self {
        self.csv_escape = Some(escape);
        self
    }
}

/// Locations of the config files taking part in resolution.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// System-level config: ~/.config/pinnote/config.kdl
    pub system: Option<PathBuf>,
    /// Session-level config: <data-dir>/config.kdl
    pub session: Option<PathBuf>,
}

impl ConfigPaths {
    /// Paths for a given data directory.
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self {
            system: Self::system_config_path(),
            session: Some(data_dir.join(CONFIG_FILE_NAME)),
        }
    }

    /// Get the system config path (~/.config/pinnote/config.kdl).
    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pinnote").join(CONFIG_FILE_NAME))
    }
}

/// Resolve configuration with full precedence chain.
pub fn resolve_config(paths: &ConfigPaths, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let system_config = load_optional(paths.system.as_deref())?;
    let session_config = load_optional(paths.session.as_deref())?;

    let mut result = ResolvedConfig::default();

    if let Some(format) = overrides.output_format {
        result.output_format = Resolved::new(format, ValueSource::CliFlag);
    } else if let Some(format) = session_config.output_format {
        result.output_format = Resolved::new(format, ValueSource::Session);
    } else if let Some(format) = system_config.output_format {
        result.output_format = Resolved::new(format, ValueSource::System);
    }

    // No CLI flag for the id space
    if let Some(space) = session_config.id_space {
        result.id_space = Resolved::new(space, ValueSource::Session);
    } else if let Some(space) = system_config.id_space {
        result.id_space = Resolved::new(space, ValueSource::System);
    }

    if let Some(escape) = overrides.csv_escape {
        result.csv_escape = Resolved::new(escape, ValueSource::CliFlag);
    } else if let Some(escape) = session_config.csv_escape {
        result.csv_escape = Resolved::new(escape, ValueSource::Session);
    } else if let Some(escape) = system_config.csv_escape {
        result.csv_escape = Resolved::new(escape, ValueSource::System);
    }

    debug!(
        output_format = %result.output_format.value,
        id_space = result.id_space.value,
        csv_escape = result.csv_escape.value,
        "resolved config"
    );
    Ok(result)
}

fn load_optional(path: Option<&Path>) -> Result<PinnoteConfig> {
    match path {
        Some(path) => PinnoteConfig::load(path),
        None => Ok(PinnoteConfig::new()),
    }
}
