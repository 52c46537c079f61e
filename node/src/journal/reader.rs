// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Journal reader.

use std::path::Path;

use hidra_controller::journal::JournalEntry;

use super::{JournalError, JournalHeader, Result, FRAME_HEADER_LEN, HEADER_LEN};

/// Everything recovered from a journal file.
#[derive(Debug, Default)]
pub struct JournalContents {
    pub entries: Vec<JournalEntry>,
    /// Bytes up to and including the last complete frame.
    pub valid_len: u64,
    /// Length of an incomplete trailing frame, if the last append was torn.
    pub torn_tail: u64,
}

pub fn read_journal(path: impl AsRef<Path>) -> Result<JournalContents> {
    let bytes = std::fs::read(path)?;
    scan_journal(&bytes)
}

/// Parses a whole journal image.
///
/// Frames must carry consecutive sequence numbers starting at 1. A frame cut short by the
/// end of the buffer is reported as a torn tail; any other defect is an error.
pub fn scan_journal(bytes: &[u8]) -> Result<JournalContents> {
    JournalHeader::from_bytes(bytes)?;

    let mut contents = JournalContents {
        valid_len: HEADER_LEN as u64,
        ..Default::default()
    };
    let mut offset = HEADER_LEN;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        if rest.len() < FRAME_HEADER_LEN {
            contents.torn_tail = rest.len() as u64;
            break;
        }

        let sequence = u64::from_le_bytes(fixed(&rest[0..8]));
        let len = u32::from_le_bytes(fixed(&rest[8..12])) as usize;
        let crc = u32::from_le_bytes(fixed(&rest[12..16]));

        if rest.len() < FRAME_HEADER_LEN + len {
            contents.torn_tail = rest.len() as u64;
            break;
        }
        let payload = &rest[FRAME_HEADER_LEN..FRAME_HEADER_LEN + len];

        let corrupted = |reason: String| JournalError::Corrupted {
            offset: offset as u64,
            reason,
        };

        if crc32fast::hash(payload) != crc {
            return Err(corrupted("checksum mismatch".into()));
        }
        let expected = contents.entries.len() as u64 + 1;
        if sequence != expected {
            return Err(corrupted(format!("sequence {} (expected {})", sequence, expected)));
        }
        let entry = JournalEntry::decode(payload).map_err(|e| corrupted(e.to_string()))?;
        if entry.sequence != sequence {
            return Err(corrupted(format!(
                "frame sequence {} disagrees with entry sequence {}",
                sequence, entry.sequence
            )));
        }

        contents.entries.push(entry);
        offset += FRAME_HEADER_LEN + len;
        contents.valid_len = offset as u64;
    }

    Ok(contents)
}

fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::super::{encode_frame, JournalHeader};
    use super::*;
    use hidra_controller::state::command::Command;
    use hidra_controller::types::Address;

    fn entry(sequence: u64) -> JournalEntry {
        JournalEntry {
            sequence,
            caller: Address::from_low_u64(sequence),
            command: Command::RegisterNode { spec: "SPECS".into() },
        }
    }

    fn image(entries: &[JournalEntry]) -> Vec<u8> {
        let mut bytes = JournalHeader::current().to_bytes().to_vec();
        for e in entries {
            bytes.extend(encode_frame(e.sequence, &e.encode().unwrap()));
        }
        bytes
    }

    #[test]
    fn reads_back_frames() {
        let entries = vec![entry(1), entry(2), entry(3)];
        let bytes = image(&entries);
        let contents = scan_journal(&bytes).unwrap();
        assert_eq!(contents.entries, entries);
        assert_eq!(contents.valid_len, bytes.len() as u64);
        assert_eq!(contents.torn_tail, 0);
    }

    #[test]
    fn torn_tail_is_reported_not_fatal() {
        let mut bytes = image(&[entry(1), entry(2)]);
        let full = bytes.len();
        bytes.truncate(full - 3);
        let contents = scan_journal(&bytes).unwrap();
        assert_eq!(contents.entries.len(), 1);
        assert!(contents.torn_tail > 0);
        assert_eq!(contents.valid_len + contents.torn_tail, bytes.len() as u64);
    }

    #[test]
    fn flipped_payload_byte_fails_closed() {
        let mut bytes = image(&[entry(1), entry(2)]);
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert!(matches!(scan_journal(&bytes), Err(JournalError::Corrupted { .. })));
    }

    #[test]
    fn sequence_gap_fails_closed() {
        let bytes = image(&[entry(1), entry(3)]);
        assert!(matches!(scan_journal(&bytes), Err(JournalError::Corrupted { .. })));
    }

    #[test]
    fn foreign_header_is_rejected() {
        let mut bytes = image(&[]);
        bytes[0] = 9;
        assert!(matches!(scan_journal(&bytes), Err(JournalError::InvalidHeader(_))));
    }
}
