//! Storage layer for Pinnote data.
//!
//! The whole note collection lives under a single key of a
//! [`StorageBackend`] as one JSON array. [`NoteStore`] keeps no cache:
//! every operation reloads the collection, and every mutation saves it
//! before returning.
//!
//! ## Storage Backends
//!
//! - **File backend** (default): `~/.local/share/pinnote/notes.json`
//! - **Memory backend**: volatile, used by tests and embedders
//!
//! ## Malformed data
//!
//! Reads treat a blob that fails to parse as an empty collection. Before a
//! mutation overwrites such a blob, the raw text is copied to the first free
//! key of `notes.corrupt`, `notes.corrupt.1`, `notes.corrupt.2`, ... so it
//! can be recovered by hand. Earlier backups are never replaced.

pub mod backend;
pub mod file;
pub mod memory;

pub use backend::{BackendType, StorageBackend};
pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::models::{Note, NoteId, sort_pinned_first};
use crate::{Error, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Key the note collection is stored under.
pub const NOTES_KEY: &str = "notes";

/// Key a malformed collection is copied to before being overwritten.
/// Later backups get a numeric suffix, see [`corrupt_backup_key`].
pub const CORRUPT_NOTES_KEY: &str = "notes.corrupt";

/// Default size of the id space, ids fall in `[0, DEFAULT_ID_SPACE)`.
pub const DEFAULT_ID_SPACE: u32 = 5000;

/// Hashed candidates tried before falling back to a linear probe.
const MAX_HASH_ATTEMPTS: u64 = 64;

/// Note collection manager over a storage backend.
pub struct NoteStore<B: StorageBackend> {
    backend: B,
    id_space: u32,
}

impl<B: StorageBackend> NoteStore<B> {
    /// Create a store with the default id space.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            id_space: DEFAULT_ID_SPACE,
        }
    }

    /// Use ids in `[0, space)`. A zero space is raised to one.
    pub fn with_id_space(mut self, space: u32) -> Self {
        self.id_space = space.max(1);
        self
    }

    pub fn id_space(&self) -> u32 {
        self.id_space
    }

    /// Get the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // === Raw persistence ===

    /// Load the collection in storage order.
    ///
    /// An absent or blank value is an empty collection. A value that is not a
    /// JSON array of notes yields [`Error::Parse`].
    pub fn load(&self) -> Result<Vec<Note>> {
        match self.backend.get(NOTES_KEY)? {
            Some(raw) => parse_notes(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Load the collection, recovering malformed data as empty.
    fn load_or_empty(&self) -> Result<Vec<Note>> {
        match self.load() {
            Err(Error::Parse(reason)) => {
                warn!(
                    backend = self.backend.backend_type(),
                    location = %self.backend.location(),
                    %reason,
                    "malformed note data, treating as empty"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Load the collection ahead of a mutation.
    ///
    /// Malformed data is copied to a free backup key first, since the
    /// following save replaces it.
    fn load_for_write(&mut self) -> Result<Vec<Note>> {
        let Some(raw) = self.backend.get(NOTES_KEY)? else {
            return Ok(Vec::new());
        };

        match parse_notes(&raw) {
            Ok(notes) => Ok(notes),
            Err(Error::Parse(reason)) => {
                let backup = self.free_backup_key()?;
                warn!(%reason, %backup, "malformed note data, backing up before overwrite");
                self.backend.set(&backup, &raw)?;
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the persisted collection.
    pub fn save_notes(&mut self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string(notes)?;
        self.backend.set(NOTES_KEY, &json)?;
        debug!(count = notes.len(), "saved notes");
        Ok(())
    }

    /// Load the collection in display order (pinned first).
    pub fn get_notes(&self) -> Result<Vec<Note>> {
        let mut notes = self.load_or_empty()?;
        sort_pinned_first(&mut notes);
        Ok(notes)
    }

    // === Note Operations ===

    /// List all notes, pinned first, storage order among equals.
    pub fn list(&self) -> Result<Vec<Note>> {
        self.get_notes()
    }

    /// Get a note by ID.
    pub fn get(&self, id: NoteId) -> Result<Note> {
        self.load_or_empty()?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Create a new unpinned note and persist it.
    pub fn create(&mut self, content: &str) -> Result<Note> {
        let mut notes = self.load_for_write()?;
        let note = Note::new(self.next_id(content, &notes)?, content);

        notes.push(note.clone());
        self.save_notes(&notes)?;

        info!(id = note.id, "created note");
        Ok(note)
    }

    /// Replace the content of a note. Returns `None` if the id is absent.
    pub fn update(&mut self, id: NoteId, content: &str) -> Result<Option<Note>> {
        self.modify(id, |note| note.content = content.to_string())
    }

    /// Flip the pin flag of a note. Returns `None` if the id is absent.
    pub fn toggle_fixed(&mut self, id: NoteId) -> Result<Option<Note>> {
        self.modify(id, |note| note.fixed = !note.fixed)
    }

    /// Delete a note. Returns the removed note, or `None` if the id is absent.
    pub fn remove(&mut self, id: NoteId) -> Result<Option<Note>> {
        let mut notes = self.load_for_write()?;
        let Some(removed) = notes.iter().find(|n| n.id == id).cloned() else {
            warn!(id, "remove: no such note");
            return Ok(None);
        };

        notes.retain(|n| n.id != id);
        self.save_notes(&notes)?;

        info!(id, "removed note");
        Ok(Some(removed))
    }

    /// Copy a note's content into a new unpinned note.
    /// Returns `None` if the source id is absent.
    pub fn duplicate(&mut self, id: NoteId) -> Result<Option<Note>> {
        let mut notes = self.load_for_write()?;
        let Some(source) = notes.iter().find(|n| n.id == id) else {
            warn!(id, "duplicate: no such note");
            return Ok(None);
        };

        let content = source.content.clone();
        let copy = Note::new(self.next_id(&content, &notes)?, content);

        notes.push(copy.clone());
        self.save_notes(&notes)?;

        info!(source = id, id = copy.id, "duplicated note");
        Ok(Some(copy))
    }

    /// Notes whose content contains `query`, in storage order.
    ///
    /// An empty query falls back to [`NoteStore::list`].
    pub fn search(&self, query: &str) -> Result<Vec<Note>> {
        if query.is_empty() {
            return self.list();
        }

        Ok(self
            .load_or_empty()?
            .into_iter()
            .filter(|n| n.matches(query))
            .collect())
    }

    // === Helpers ===

    /// Apply `change` to the first note with `id` and persist.
    fn modify(&mut self, id: NoteId, change: impl FnOnce(&mut Note)) -> Result<Option<Note>> {
        let mut notes = self.load_for_write()?;
        let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
            warn!(id, "no such note");
            return Ok(None);
        };

        change(note);
        let updated = note.clone();
        self.save_notes(&notes)?;

        info!(id, fixed = updated.fixed, "updated note");
        Ok(Some(updated))
    }

    /// First backup key that holds no value yet.
    fn free_backup_key(&self) -> Result<String> {
        let mut index = 0;
        loop {
            let key = corrupt_backup_key(index);
            if self.backend.get(&key)?.is_none() {
                return Ok(key);
            }
            index += 1;
        }
    }

    fn next_id(&self, seed: &str, notes: &[Note]) -> Result<NoteId> {
        let taken: HashSet<NoteId> = notes.iter().map(|n| n.id).collect();
        generate_id(seed, &taken, self.id_space)
    }
}

/// Key of the `index`-th malformed-data backup: `notes.corrupt`, then
/// `notes.corrupt.1`, `notes.corrupt.2`, ...
pub fn corrupt_backup_key(index: u32) -> String {
    match index {
        0 => CORRUPT_NOTES_KEY.to_string(),
        n => format!("{}.{}", CORRUPT_NOTES_KEY, n),
    }
}

/// Parse a stored collection. Blank text is an empty collection.
fn parse_notes(raw: &str) -> Result<Vec<Note>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| Error::Parse(e.to_string()))
}

/// Get the default data directory (`~/.local/share/pinnote` on Linux).
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;

    Ok(data_dir.join("pinnote"))
}

/// Generate an id in `[0, space)` that is not in `taken`.
///
/// Candidates come from a SHA-256 of the seed, the current time and an
/// attempt counter. If every hashed candidate is taken the space is probed
/// linearly, so a free id is always found when one exists.
pub fn generate_id(seed: &str, taken: &HashSet<NoteId>, space: u32) -> Result<NoteId> {
    let space = u64::from(space.max(1));
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut candidate = 0u64;
    for attempt in 0..MAX_HASH_ATTEMPTS {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hasher.update(nanos.to_le_bytes());
        hasher.update(attempt.to_le_bytes());
        let hash = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash[..8]);
        candidate = u64::from_le_bytes(bytes) % space;

        if !taken.contains(&(candidate as NoteId)) {
            return Ok(candidate as NoteId);
        }
        debug!(candidate, attempt, "id collision, redrawing");
    }

    (0..space)
        .map(|offset| ((candidate + offset) % space) as NoteId)
        .find(|id| !taken.contains(id))
        .ok_or(Error::IdSpaceExhausted(space as u32))
}
