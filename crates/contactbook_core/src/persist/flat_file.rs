//! Comma-delimited flat file adapter.
//!
//! # Responsibility
//! - Write one `name,phone,category` line per contact, in book order.
//! - Read lines back, splitting on the first two commas only.
//! - A line that is not valid UTF-8 is reported on its own and the rest of
//!   the file still loads.
//!
//! # Invariants
//! - Saves go through a temporary file in the destination directory and an
//!   atomic rename, so a crash never leaves a truncated file behind.
//! - Fields are not escaped; a comma inside a name or phone shifts columns.

use super::{
    ContactPersistence, LoadOutcome, PersistError, PersistResult, RawContact, StoredRow,
};
use crate::model::contact::Contact;
use log::{debug, error, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

const FIELD_SEPARATOR: char = ',';

/// File-backed contact persistence.
#[derive(Debug, Clone)]
pub struct FlatFilePersistence {
    path: PathBuf,
}

impl FlatFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn write_all(&self, contacts: &[&Contact]) -> PersistResult<()> {
        let dir = self.parent_dir();
        let write_error = |source| PersistError::Write {
            path: dir.to_path_buf(),
            source,
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            for contact in contacts {
                writer
                    .write_all(encode_line(contact).as_bytes())
                    .map_err(write_error)?;
            }
            writer.flush().map_err(write_error)?;
        }
        temp.as_file().sync_all().map_err(write_error)?;

        temp.persist(&self.path)
            .map_err(|err| PersistError::Replace {
                path: self.path.clone(),
                source: err.error,
            })?;
        Ok(())
    }
}

impl ContactPersistence for FlatFilePersistence {
    fn save(&self, contacts: &[&Contact]) -> PersistResult<()> {
        let started_at = Instant::now();
        match self.write_all(contacts) {
            Ok(()) => {
                debug!(
                    "event=contacts_save module=persist status=ok count={} duration_ms={}",
                    contacts.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=contacts_save module=persist status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn load(&self) -> PersistResult<LoadOutcome> {
        let started_at = Instant::now();
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=contacts_load module=persist status=missing");
                return Ok(LoadOutcome::Missing(self.path.clone()));
            }
            Err(source) => {
                return Err(PersistError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_number = 0;
        let mut rows = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| PersistError::Read {
                    path: self.path.clone(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_number += 1;
            if let Some(row) = decode_line(line_number, &buf) {
                rows.push(row);
            }
        }

        info!(
            "event=contacts_load module=persist status=ok rows={} duration_ms={}",
            rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(LoadOutcome::Rows(rows))
    }
}

/// Encodes one contact as a terminated line.
pub fn encode_line(contact: &Contact) -> String {
    format!(
        "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{LINE_ENDING}",
        contact.name, contact.phone, contact.category
    )
}

/// Decodes one raw line, terminator included.
///
/// Bytes that are not UTF-8 spoil only their own line; the caller keeps
/// reading the rest of the file.
pub fn decode_line(line_number: usize, bytes: &[u8]) -> Option<StoredRow> {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(line) => parse_line(line_number, line).map(StoredRow::Parsed),
        Err(_) => {
            warn!(
                "event=contacts_load_line module=persist status=not_utf8 line={}",
                line_number
            );
            Some(StoredRow::Undecodable { line: line_number })
        }
    }
}

/// Splits one stored line into its three fields.
///
/// Missing trailing fields read as empty strings; everything after the second
/// comma belongs to the category. Blank lines yield `None`.
pub fn parse_line(line_number: usize, line: &str) -> Option<RawContact> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return None;
    }

    let mut parts = line.splitn(3, FIELD_SEPARATOR);
    let mut next = || parts.next().unwrap_or_default().to_string();
    Some(RawContact {
        line: line_number,
        name: next(),
        phone: next(),
        category: next(),
    })
}
