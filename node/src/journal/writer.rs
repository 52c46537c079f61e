// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-only journal writer.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use hidra_controller::journal::JournalEntry;

use super::reader::{scan_journal, JournalContents};
use super::{encode_frame, JournalError, JournalHeader, Result, HEADER_LEN};

/// # Safety Guarantees
/// - Write + fsync before `append` returns
/// - Sequences are checked on the way in, so the file never holds a gap
/// - A failed append is cut back to the last durable frame; if that fails too the writer
///   refuses every later append
pub struct JournalWriter {
    path: PathBuf,
    file: File,
    last_sequence: u64,
    /// File length up to the end of the last durable frame.
    valid_len: u64,
    poisoned: bool,
}

impl JournalWriter {
    /// Opens or creates a journal file.
    ///
    /// An existing file is scanned and its entries returned so the caller can replay them;
    /// a torn trailing frame is cut off first. A new file gets a header.
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, JournalContents)> {
        let path = path.as_ref().to_path_buf();
        let existing = path.exists() && std::fs::metadata(&path)?.len() > 0;

        let contents = if existing {
            let contents = scan_journal(&std::fs::read(&path)?)?;
            if contents.torn_tail > 0 {
                tracing::warn!(
                    "Dropping {} bytes of torn journal tail at {:?}",
                    contents.torn_tail,
                    path
                );
                let file = OpenOptions::new().write(true).open(&path)?;
                file.set_len(contents.valid_len)?;
                file.sync_all()?;
            }
            contents
        } else {
            JournalContents {
                valid_len: HEADER_LEN as u64,
                ..Default::default()
            }
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if !existing {
            file.write_all(&JournalHeader::current().to_bytes())?;
            file.sync_all()?;
        }

        let writer = Self {
            path,
            file,
            last_sequence: contents.entries.len() as u64,
            valid_len: contents.valid_len,
            poisoned: false,
        };
        Ok((writer, contents))
    }

    /// Appends one entry. Only returns `Ok` after the frame is durable.
    pub fn append(&mut self, entry: &JournalEntry) -> Result<()> {
        if self.poisoned {
            return Err(JournalError::Poisoned(self.path.clone()));
        }
        let expected = self.last_sequence + 1;
        if entry.sequence != expected {
            return Err(JournalError::Corrupted {
                offset: 0,
                reason: format!("append of sequence {} (expected {})", entry.sequence, expected),
            });
        }

        let frame = encode_frame(entry.sequence, &entry.encode()?);
        if let Err(e) = self.write_frame(&frame) {
            tracing::error!("Journal append of #{} failed: {}", entry.sequence, e);
            self.rollback();
            return Err(e.into());
        }

        self.valid_len += frame.len() as u64;
        self.last_sequence = entry.sequence;
        Ok(())
    }

    fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()> {
        self.file.write_all(frame)?;
        self.file.sync_data()
    }

    /// Drops whatever part of a frame made it past the last durable one.
    pub(crate) fn rollback(&mut self) {
        let result = self
            .file
            .set_len(self.valid_len)
            .and_then(|_| self.file.sync_all());
        if let Err(e) = result {
            tracing::error!("Journal {:?} could not be cut back to {} bytes: {}", self.path, self.valid_len, e);
            self.poisoned = true;
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
