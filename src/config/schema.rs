//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation and string parsing for `pn config set`

use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Config key for the output format.
pub const KEY_OUTPUT_FORMAT: &str = "output-format";
/// Config key for the id space size.
pub const KEY_ID_SPACE: &str = "id-space";
/// Config key for CSV escaping.
pub const KEY_CSV_ESCAPE: &str = "csv-escape";

/// All recognised config keys, in display order.
pub const CONFIG_KEYS: [&str; 3] = [KEY_OUTPUT_FORMAT, KEY_ID_SPACE, KEY_CSV_ESCAPE];

/// Largest accepted id space.
pub const MAX_ID_SPACE: u32 = 1_000_000_000;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// output-format "human"  // or "json"
/// id-space 5000
/// csv-escape #true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnoteConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Size of the note id space
    pub id_space: Option<u32>,

    /// Quote CSV fields that need it
    pub csv_escape: Option<bool>,
}

impl PinnoteConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<()> {
        if let Some(space) = self.id_space {
            validate_id_space(i128::from(space))?;
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes are ignored. Known nodes with a value of the wrong type
    /// or out of range are rejected.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self> {
        let mut config = Self::new();

        if let Some(value) = first_value(doc, KEY_OUTPUT_FORMAT) {
            let format = value
                .as_string()
                .and_then(OutputFormat::parse)
                .ok_or_else(|| invalid(KEY_OUTPUT_FORMAT, value))?;
            config.output_format = Some(format);
        }

        if let Some(value) = first_value(doc, KEY_ID_SPACE) {
            let space = value
                .as_integer()
                .ok_or_else(|| invalid(KEY_ID_SPACE, value))?;
            config.id_space = Some(validate_id_space(space)?);
        }

        if let Some(value) = first_value(doc, KEY_CSV_ESCAPE) {
            let escape = value
                .as_bool()
                .ok_or_else(|| invalid(KEY_CSV_ESCAPE, value))?;
            config.csv_escape = Some(escape);
        }

        Ok(config)
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(format) = self.output_format {
            let mut node = KdlNode::new(KEY_OUTPUT_FORMAT);
            node.push(KdlEntry::new(KdlValue::String(format.as_str().to_string())));
            doc.nodes_mut().push(node);
        }

        if let Some(space) = self.id_space {
            let mut node = KdlNode::new(KEY_ID_SPACE);
            node.push(KdlEntry::new(KdlValue::Integer(i128::from(space))));
            doc.nodes_mut().push(node);
        }

        if let Some(escape) = self.csv_escape {
            let mut node = KdlNode::new(KEY_CSV_ESCAPE);
            node.push(KdlEntry::new(KdlValue::Bool(escape)));
            doc.nodes_mut().push(node);
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &PinnoteConfig) {
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.id_space.is_some() {
            self.id_space = other.id_space;
        }
        if other.csv_escape.is_some() {
            self.csv_escape = other.csv_escape;
        }
    }

    /// Set a key from its command-line string form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            KEY_OUTPUT_FORMAT => {
                let format = OutputFormat::parse(value).ok_or_else(|| {
                    Error::Config(format!(
                        "{} must be \"json\" or \"human\", got {:?}",
                        KEY_OUTPUT_FORMAT, value
                    ))
                })?;
                self.output_format = Some(format);
            }
            KEY_ID_SPACE => {
                let space: i128 = value.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "{} must be an integer, got {:?}",
                        KEY_ID_SPACE, value
                    ))
                })?;
                self.id_space = Some(validate_id_space(space)?);
            }
            KEY_CSV_ESCAPE => {
                let escape = parse_bool(value).ok_or_else(|| {
                    Error::Config(format!(
                        "{} must be true or false, got {:?}",
                        KEY_CSV_ESCAPE, value
                    ))
                })?;
                self.csv_escape = Some(escape);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Get a key's configured value in string form, if set.
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            KEY_OUTPUT_FORMAT => self.output_format.map(|f| f.to_string()),
            KEY_ID_SPACE => self.id_space.map(|s| s.to_string()),
            KEY_CSV_ESCAPE => self.csv_escape.map(|b| b.to_string()),
            _ => return Err(unknown_key(key)),
        })
    }

    /// Load config from a KDL file. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };

        let doc: KdlDocument = content
            .parse()
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_kdl(&doc)
    }

    /// Write config to a KDL file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_kdl().to_string())?;
        Ok(())
    }
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn validate_id_space(space: i128) -> Result<u32> {
    if !(1..=i128::from(MAX_ID_SPACE)).contains(&space) {
        return Err(Error::Config(format!(
            "{} must be 1-{}, got {}",
            KEY_ID_SPACE, MAX_ID_SPACE, space
        )));
    }
    Ok(space as u32)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str, value: &KdlValue) -> Error {
    Error::Config(format!("invalid value for {}: {}", key, value))
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "unknown key {:?} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
