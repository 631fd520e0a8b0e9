//! Data models for Pinnote.
//!
//! There is a single entity, [`Note`]. The whole collection is persisted as
//! one JSON array of notes; display order is derived, never stored.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a note within its collection.
pub type NoteId = u32;

/// A user-authored text entry with a pin flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identifier, unique within the collection
    pub id: NoteId,

    /// Free text, may be empty
    pub content: String,

    /// Pinned notes sort ahead of unpinned ones
    #[serde(default)]
    pub fixed: bool,
}

impl Note {
    /// Create an unpinned note.
    pub fn new(id: NoteId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            fixed: false,
        }
    }

    /// Whether the content contains `needle` as a literal, case-sensitive substring.
    pub fn matches(&self, needle: &str) -> bool {
        self.content.contains(needle)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pin = if self.fixed { "*" } else { " " };
        write!(f, "{}[{}] {}", pin, self.id, self.content)
    }
}

/// Pinned-first comparison. Equal flags compare equal.
pub fn pinned_first(a: &Note, b: &Note) -> Ordering {
    b.fixed.cmp(&a.fixed)
}

/// Sort notes pinned-first, keeping storage order among equal flags.
pub fn sort_pinned_first(notes: &mut [Note]) {
    // slice::sort_by is stable
    notes.sort_by(pinned_first);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned(id: NoteId, content: &str) -> Note {
        Note {
            fixed: true,
            ..Note::new(id, content)
        }
    }

    #[test]
    fn test_new_note_is_unpinned() {
        let note = Note::new(7, "buy milk");
        assert_eq!(note.id, 7);
        assert_eq!(note.content, "buy milk");
        assert!(!note.fixed);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&Note::new(1, "a")).unwrap();
        assert_eq!(json, r#"{"id":1,"content":"a","fixed":false}"#);
    }

    #[test]
    fn test_missing_fixed_defaults_to_false() {
        let note: Note = serde_json::from_str(r#"{"id":3,"content":"x"}"#).unwrap();
        assert!(!note.fixed);
    }

    #[test]
    fn test_matches_is_case_sensitive() {
        let note = Note::new(1, "Buy milk");
        assert!(note.matches("milk"));
        assert!(note.matches(""));
        assert!(!note.matches("buy"));
    }

    #[test]
    fn test_sort_pinned_first_is_stable() {
        let mut notes = vec![
            Note::new(1, "a"),
            pinned(2, "b"),
            Note::new(3, "c"),
            pinned(4, "d"),
        ];
        sort_pinned_first(&mut notes);
        let ids: Vec<NoteId> = notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_display_marks_pinned() {
        assert_eq!(pinned(9, "todo").to_string(), "*[9] todo");
        assert_eq!(Note::new(9, "todo").to_string(), " [9] todo");
    }
}
