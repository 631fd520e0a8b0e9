//! CLI argument definitions for Pinnote.

use crate::commands::Intent;
use crate::export::CsvMode;
use crate::models::NoteId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pinnote - a small local note pad.
///
/// Notes are listed pinned-first. Output is JSON unless -H is given or the
/// config says otherwise.
#[derive(Parser, Debug)]
#[command(name = "pn")]
#[command(
    author,
    version,
    about = "A small local note pad with pinning, search and CSV export",
    long_about = None
)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding notes.json and the session config.kdl.
    /// Defaults to ~/.local/share/pinnote.
    #[arg(short = 'D', long = "data-dir", global = true, env = "PINNOTE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr (PINNOTE_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new note
    Add {
        /// Note text (may be empty)
        #[arg(default_value = "")]
        content: String,
    },

    /// List notes, pinned first
    #[command(alias = "ls")]
    List,

    /// Show a single note
    Show {
        /// Note ID
        id: NoteId,
    },

    /// Replace the text of a note
    Edit {
        /// Note ID
        id: NoteId,
        /// New note text
        content: String,
    },

    /// Pin or unpin a note
    Pin {
        /// Note ID
        id: NoteId,
    },

    /// Delete a note
    #[command(alias = "delete")]
    Rm {
        /// Note ID
        id: NoteId,
    },

    /// Copy a note into a new, unpinned note
    Dup {
        /// Note ID
        id: NoteId,
    },

    /// Find notes containing text (case-sensitive); empty lists everything
    Search {
        /// Text to look for
        #[arg(default_value = "")]
        query: String,
    },

    /// Export all notes as CSV
    Export {
        /// Output file
        #[arg(short, long, default_value = "notes.csv")]
        output: PathBuf,

        /// Write content verbatim, without CSV quoting
        #[arg(long)]
        raw: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value in the session config
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// List all configuration values
    List,
}

impl Commands {
    /// Short command name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::List => "list",
            Commands::Show { .. } => "show",
            Commands::Edit { .. } => "edit",
            Commands::Pin { .. } => "pin",
            Commands::Rm { .. } => "rm",
            Commands::Dup { .. } => "dup",
            Commands::Search { .. } => "search",
            Commands::Export { .. } => "export",
            Commands::Config { command } => match command {
                ConfigCommands::Get { .. } => "config get",
                ConfigCommands::Set { .. } => "config set",
                ConfigCommands::List => "config list",
            },
        }
    }

    /// `csv-escape` value forced by this command's flags, if any.
    pub fn csv_escape_override(&self) -> Option<bool> {
        match self {
            Commands::Export { raw: true, .. } => Some(false),
            _ => None,
        }
    }

    /// The note intent this command expresses, or `None` for config commands.
    ///
    /// `csv_mode` is the export mode resolved from config and flags.
    pub fn into_intent(self, csv_mode: CsvMode) -> Option<Intent> {
        let intent = match self {
            Commands::Add { content } => Intent::Create { content },
            Commands::List => Intent::List,
            Commands::Show { id } => Intent::Show { id },
            Commands::Edit { id, content } => Intent::Edit { id, content },
            Commands::Pin { id } => Intent::TogglePin { id },
            Commands::Rm { id } => Intent::Delete { id },
            Commands::Dup { id } => Intent::Duplicate { id },
            Commands::Search { query } => Intent::Search { query },
            Commands::Export { output, .. } => Intent::Export {
                path: output,
                mode: csv_mode,
            },
            Commands::Config { .. } => return None,
        };
        Some(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pn").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["list", "-H", "--data-dir", "/tmp/notes"]);
        assert!(cli.human_readable);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/notes")));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_add_defaults_to_empty_content() {
        let cli = parse(&["add"]);
        assert_eq!(
            cli.command.into_intent(CsvMode::Quoted),
            Some(Intent::Create {
                content: String::new()
            })
        );
    }

    #[test]
    fn test_intents() {
        assert_eq!(
            parse(&["pin", "12"]).command.into_intent(CsvMode::Quoted),
            Some(Intent::TogglePin { id: 12 })
        );
        assert_eq!(
            parse(&["delete", "3"]).command.into_intent(CsvMode::Quoted),
            Some(Intent::Delete { id: 3 })
        );
        assert_eq!(
            parse(&["edit", "3", "new text"])
                .command
                .into_intent(CsvMode::Quoted),
            Some(Intent::Edit {
                id: 3,
                content: "new text".to_string()
            })
        );
        assert_eq!(
            parse(&["search"]).command.into_intent(CsvMode::Quoted),
            Some(Intent::Search {
                query: String::new()
            })
        );
        assert_eq!(
            parse(&["config", "list"])
                .command
                .into_intent(CsvMode::Quoted),
            None
        );
    }

    #[test]
    fn test_export_mode() {
        assert_eq!(
            parse(&["export"]).command.into_intent(CsvMode::Quoted),
            Some(Intent::Export {
                path: PathBuf::from("notes.csv"),
                mode: CsvMode::Quoted
            })
        );
        assert_eq!(
            parse(&["export", "-o", "out.csv"])
                .command
                .into_intent(CsvMode::Raw),
            Some(Intent::Export {
                path: PathBuf::from("out.csv"),
                mode: CsvMode::Raw
            })
        );
    }

    #[test]
    fn test_raw_flag_overrides_csv_escape() {
        assert_eq!(
            parse(&["export", "--raw"]).command.csv_escape_override(),
            Some(false)
        );
        assert_eq!(parse(&["export"]).command.csv_escape_override(), None);
        assert_eq!(parse(&["list"]).command.csv_escape_override(), None);
    }

    #[test]
    fn test_invalid_id_rejected() {
        assert!(Cli::try_parse_from(["pn", "pin", "abc"]).is_err());
        assert!(Cli::try_parse_from(["pn", "pin", "-1"]).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(parse(&["rm", "1"]).command.name(), "rm");
        assert_eq!(
            parse(&["config", "set", "id-space", "9"]).command.name(),
            "config set"
        );
    }
}
