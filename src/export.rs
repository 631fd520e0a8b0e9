//! CSV export of a note collection.
//!
//! Output is one header row followed by one row per note with the fields
//! `id, content, fixed`. Fields are joined by `,` and rows by `\n`, with no
//! trailing newline.

use crate::Result;
use crate::models::Note;
use std::fs;
use std::path::Path;
use tracing::info;

/// Header row of an export.
pub const CSV_HEADER: &str = "ID, Content, Fixed?";

/// Default file name for exports.
pub const CSV_FILE_NAME: &str = "notes.csv";

/// MIME type of exports.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// How note content is written into a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvMode {
    /// RFC 4180 quoting for content holding separators, quotes or line breaks
    #[default]
    Quoted,
    /// Content written verbatim
    Raw,
}

impl CsvMode {
    /// Pick a mode from the `csv-escape` setting.
    pub fn from_escape(escape: bool) -> Self {
        if escape { Self::Quoted } else { Self::Raw }
    }
}

/// Render notes as CSV text.
pub fn export_csv(notes: &[Note], mode: CsvMode) -> String {
    let mut rows = Vec::with_capacity(notes.len() + 1);
    rows.push(CSV_HEADER.to_string());

    for note in notes {
        let content = match mode {
            CsvMode::Quoted => quote_field(&note.content),
            CsvMode::Raw => note.content.clone(),
        };
        rows.push(format!("{},{},{}", note.id, content, note.fixed));
    }

    rows.join("\n")
}

/// Render notes as CSV and write them to `path`. Returns the bytes written.
pub fn write_csv(path: &Path, notes: &[Note], mode: CsvMode) -> Result<usize> {
    let csv = export_csv(notes, mode);
    fs::write(path, &csv)?;
    info!(path = %path.display(), notes = notes.len(), "exported notes");
    Ok(csv.len())
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_single_note_exact_output() {
        let notes = vec![Note::new(1, "a")];
        assert_eq!(
            export_csv(&notes, CsvMode::Quoted),
            "ID, Content, Fixed?\n1,a,false"
        );
        assert_eq!(
            export_csv(&notes, CsvMode::Raw),
            "ID, Content, Fixed?\n1,a,false"
        );
    }

    #[test]
    fn test_empty_collection_is_header_only() {
        assert_eq!(export_csv(&[], CsvMode::Quoted), CSV_HEADER);
    }

    #[test]
    fn test_pinned_flag_written() {
        let mut note = Note::new(12, "todo");
        note.fixed = true;
        assert_eq!(
            export_csv(&[note, Note::new(3, "x")], CsvMode::Quoted),
            "ID, Content, Fixed?\n12,todo,true\n3,x,false"
        );
    }

    #[test]
    fn test_quoted_mode_escapes_content() {
        let notes = vec![
            Note::new(1, "milk, eggs"),
            Note::new(2, "say \"hi\""),
            Note::new(3, "two\nlines"),
        ];
        assert_eq!(
            export_csv(&notes, CsvMode::Quoted),
            concat!(
                "ID, Content, Fixed?\n",
                "1,\"milk, eggs\",false\n",
                "2,\"say \"\"hi\"\"\",false\n",
                "3,\"two\nlines\",false"
            )
        );
    }

    #[test]
    fn test_raw_mode_is_verbatim() {
        let notes = vec![Note::new(1, "milk, eggs")];
        assert_eq!(
            export_csv(&notes, CsvMode::Raw),
            "ID, Content, Fixed?\n1,milk, eggs,false"
        );
    }

    #[test]
    fn test_mode_from_escape() {
        assert_eq!(CsvMode::from_escape(true), CsvMode::Quoted);
        assert_eq!(CsvMode::from_escape(false), CsvMode::Raw);
    }

    #[test]
    fn test_write_csv() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CSV_FILE_NAME);

        let written = write_csv(&path, &[Note::new(1, "a")], CsvMode::Quoted).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "ID, Content, Fixed?\n1,a,false");
        assert_eq!(written, content.len());
    }
}
