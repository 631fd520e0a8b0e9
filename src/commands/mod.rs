//! Command implementations for Pinnote.
//!
//! User actions arrive as [`Intent`]s and are routed to [`NoteStore`]
//! operations by [`dispatch`]. The returned [`Outcome`] holds a result that
//! renders as JSON or human text, plus a [`Refresh`] hint telling the
//! presenter how much of its view is stale. Presenters never call the store
//! directly for mutations, so the store can be tested without any UI.
//!
//! Config commands live in [`config`].

pub mod config;

pub use config::{ConfigEntry, ConfigList, ConfigSet, config_get, config_list, config_set};

use crate::Result;
use crate::export::{CSV_MIME_TYPE, CsvMode, write_csv};
use crate::models::{Note, NoteId};
use crate::storage::{NoteStore, StorageBackend};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Serialize any result, falling back to an error object.
pub(crate) fn json_or_error<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// A user action against the note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Create { content: String },
    Edit { id: NoteId, content: String },
    TogglePin { id: NoteId },
    Delete { id: NoteId },
    Duplicate { id: NoteId },
    Search { query: String },
    List,
    Show { id: NoteId },
    Export { path: PathBuf, mode: CsvMode },
}

impl Intent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Create { .. } => "create",
            Intent::Edit { .. } => "edit",
            Intent::TogglePin { .. } => "pin",
            Intent::Delete { .. } => "delete",
            Intent::Duplicate { .. } => "duplicate",
            Intent::Search { .. } => "search",
            Intent::List => "list",
            Intent::Show { .. } => "show",
            Intent::Export { .. } => "export",
        }
    }
}

/// How much of a rendered listing is stale after an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Refresh {
    /// Nothing visible changed
    None,
    /// A new note goes at the end of the listing
    Append,
    /// One note disappears from the listing
    Remove,
    /// Order or membership changed, re-render everything
    Full,
}

/// Result of dispatching an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub result: IntentResult,
    pub refresh: Refresh,
}

impl Outcome {
    fn new(result: IntentResult, refresh: Refresh) -> Self {
        Self { result, refresh }
    }
}

/// Typed payload of an [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentResult {
    Created(NoteCreated),
    Changed(NoteChanged),
    Listed(NoteList),
    Shown(NoteShown),
    Exported(ExportResult),
}

impl Output for IntentResult {
    fn to_json(&self) -> String {
        match self {
            IntentResult::Created(r) => r.to_json(),
            IntentResult::Changed(r) => r.to_json(),
            IntentResult::Listed(r) => r.to_json(),
            IntentResult::Shown(r) => r.to_json(),
            IntentResult::Exported(r) => r.to_json(),
        }
    }

    fn to_human(&self) -> String {
        match self {
            IntentResult::Created(r) => r.to_human(),
            IntentResult::Changed(r) => r.to_human(),
            IntentResult::Listed(r) => r.to_human(),
            IntentResult::Shown(r) => r.to_human(),
            IntentResult::Exported(r) => r.to_human(),
        }
    }
}

/// Route an intent to the store.
pub fn dispatch<B: StorageBackend>(store: &mut NoteStore<B>, intent: Intent) -> Result<Outcome> {
    debug!(intent = intent.name(), "dispatch");

    let outcome = match intent {
        Intent::Create { content } => {
            let note = store.create(&content)?;
            Outcome::new(IntentResult::Created(NoteCreated { note }), Refresh::Append)
        }

        Intent::Edit { id, content } => {
            let note = store.update(id, &content)?;
            // The editor already shows the new text
            changed(ChangeAction::Edit, id, note, Refresh::None)
        }

        Intent::TogglePin { id } => {
            let note = store.toggle_fixed(id)?;
            changed(ChangeAction::Pin, id, note, Refresh::Full)
        }

        Intent::Delete { id } => {
            let note = store.remove(id)?;
            changed(ChangeAction::Delete, id, note, Refresh::Remove)
        }

        Intent::Duplicate { id } => {
            let note = store.duplicate(id)?;
            changed(ChangeAction::Duplicate, id, note, Refresh::Append)
        }

        Intent::Search { query } => {
            let notes = store.search(&query)?;
            let query = (!query.is_empty()).then_some(query);
            let list = NoteList::new(notes, query);
            Outcome::new(IntentResult::Listed(list), Refresh::Full)
        }

        Intent::List => {
            let notes = store.list()?;
            let list = NoteList::new(notes, None);
            Outcome::new(IntentResult::Listed(list), Refresh::None)
        }

        Intent::Show { id } => {
            let note = store.get(id)?;
            Outcome::new(IntentResult::Shown(NoteShown { note }), Refresh::None)
        }

        Intent::Export { path, mode } => {
            let notes = store.get_notes()?;
            let bytes = write_csv(&path, &notes, mode)?;
            let result = ExportResult {
                path,
                mime_type: CSV_MIME_TYPE,
                count: notes.len(),
                bytes,
                escaped: mode == CsvMode::Quoted,
            };
            Outcome::new(IntentResult::Exported(result), Refresh::None)
        }
    };

    Ok(outcome)
}

fn changed(action: ChangeAction, id: NoteId, note: Option<Note>, refresh: Refresh) -> Outcome {
    let found = note.is_some();
    let refresh = if found { refresh } else { Refresh::None };
    Outcome::new(
        IntentResult::Changed(NoteChanged {
            action,
            id,
            found,
            note,
        }),
        refresh,
    )
}

// === Results ===

/// A note was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCreated {
    #[serde(flatten)]
    pub note: Note,
}

impl Output for NoteCreated {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!("Created note {}", self.note.id)
    }
}

/// Mutations addressed at an existing note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Edit,
    Pin,
    Delete,
    Duplicate,
}

/// Result of a mutation addressed by id. `found` is false for absent ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteChanged {
    pub action: ChangeAction,
    pub id: NoteId,
    pub found: bool,
    /// The note after the change; for duplicates, the new copy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

impl Output for NoteChanged {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let Some(note) = &self.note else {
            return format!("No note with id {}", self.id);
        };

        match self.action {
            ChangeAction::Edit => format!("Updated note {}", note.id),
            ChangeAction::Pin if note.fixed => format!("Pinned note {}", note.id),
            ChangeAction::Pin => format!("Unpinned note {}", note.id),
            ChangeAction::Delete => format!("Deleted note {}", note.id),
            ChangeAction::Duplicate => format!("Duplicated note {} as {}", self.id, note.id),
        }
    }
}

/// A listing, from `list` or `search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub count: usize,
    pub notes: Vec<Note>,
}

impl NoteList {
    pub fn new(notes: Vec<Note>, query: Option<String>) -> Self {
        Self {
            query,
            count: notes.len(),
            notes,
        }
    }
}

impl Output for NoteList {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        if self.notes.is_empty() {
            return match &self.query {
                Some(q) => format!("No notes matching {:?}", q),
                None => "No notes.".to_string(),
            };
        }

        self.notes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteShown {
    #[serde(flatten)]
    pub note: Note,
}

impl Output for NoteShown {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let pin = if self.note.fixed { "pinned" } else { "not pinned" };
        format!("Note {} ({})\n{}", self.note.id, pin, self.note.content)
    }
}

/// A CSV export written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub count: usize,
    pub bytes: usize,
    pub escaped: bool,
}

impl Output for ExportResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Exported {} note{} to {}",
            self.count,
            if self.count == 1 { "" } else { "s" },
            self.path.display()
        )
    }
}
