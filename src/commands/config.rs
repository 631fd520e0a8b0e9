//! `pn config` commands.

use super::{Output, json_or_error};
use crate::config::{CONFIG_FILE_NAME, ConfigOverrides, ConfigPaths, PinnoteConfig, resolve_config};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A resolved config value with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

impl Output for ConfigEntry {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!("{} = {} ({})", self.key, self.value, self.source)
    }
}

/// Every resolved config value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigList {
    pub configs: Vec<ConfigEntry>,
}

impl Output for ConfigList {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        self.configs
            .iter()
            .map(|c| c.to_human())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A value written to the session config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
    pub path: PathBuf,
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Set {} = {} in {}",
            self.key,
            self.value,
            self.path.display()
        )
    }
}

/// Get one resolved config value.
pub fn config_get(
    paths: &ConfigPaths,
    overrides: &ConfigOverrides,
    key: &str,
) -> Result<ConfigEntry> {
    // Unknown keys fail here with the list of valid ones
    PinnoteConfig::new().get_value(key)?;

    config_list(paths, overrides)?
        .configs
        .into_iter()
        .find(|c| c.key == key)
        .ok_or_else(|| Error::Config(format!("unknown key {:?}", key)))
}

/// List every resolved config value.
pub fn config_list(paths: &ConfigPaths, overrides: &ConfigOverrides) -> Result<ConfigList> {
    let resolved = resolve_config(paths, overrides)?;
    let configs = resolved
        .entries()
        .into_iter()
        .map(|(key, value, source)| ConfigEntry {
            key: key.to_string(),
            value,
            source: source.to_string(),
        })
        .collect();
    Ok(ConfigList { configs })
}

/// Set a value in the session config at `<data_dir>/config.kdl`.
///
/// A session file that no longer parses or validates is replaced by one
/// holding only the new value.
pub fn config_set(data_dir: &Path, key: &str, value: &str) -> Result<ConfigSet> {
    let path = data_dir.join(CONFIG_FILE_NAME);

    let mut config = match PinnoteConfig::load(&path) {
        Err(Error::Config(reason)) => {
            warn!(path = %path.display(), %reason, "invalid session config, starting fresh");
            PinnoteConfig::new()
        }
        other => other?,
    };
    config.set_value(key, value)?;
    config.validate()?;
    config.save(&path)?;

    let stored = config.get_value(key)?.unwrap_or_default();
    info!(key, value = %stored, path = %path.display(), "config set");

    Ok(ConfigSet {
        key: key.to_string(),
        value: stored,
        path,
    })
}
