//! Snapshot decoding.

use byteorder::{LittleEndian, ReadBytesExt};
use crc64fast::Digest;
use std::io::Cursor;

use super::{FORMAT_VERSION, HEADER_LEN, MAGIC, TRAILER_LEN};
use crate::error::{ControllerError, Result};
use crate::state::controller::ControllerState;

/// Header fields of a snapshot, readable without decoding the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub format: u32,
    pub version: u64,
    pub body_len: u64,
}

fn corrupted(msg: impl Into<String>) -> ControllerError {
    ControllerError::Corrupted(msg.into())
}

pub fn read_header(buf: &[u8]) -> Result<SnapshotHeader> {
    if buf.len() < HEADER_LEN + TRAILER_LEN {
        return Err(corrupted(format!("snapshot too short: {} bytes", buf.len())));
    }
    if &buf[0..4] != MAGIC {
        return Err(corrupted("bad snapshot magic"));
    }

    let mut cursor = Cursor::new(&buf[4..HEADER_LEN]);
    let format = cursor.read_u32::<LittleEndian>().map_err(|e| corrupted(e.to_string()))?;
    let version = cursor.read_u64::<LittleEndian>().map_err(|e| corrupted(e.to_string()))?;
    let body_len = cursor.read_u64::<LittleEndian>().map_err(|e| corrupted(e.to_string()))?;

    if format != FORMAT_VERSION {
        return Err(corrupted(format!("unsupported snapshot format {}", format)));
    }
    Ok(SnapshotHeader { format, version, body_len })
}

pub fn decode_state(buf: &[u8]) -> Result<ControllerState> {
    let header = read_header(buf)?;

    let expected_len = header
        .body_len
        .checked_add((HEADER_LEN + TRAILER_LEN) as u64)
        .ok_or_else(|| corrupted("snapshot length overflows"))?;
    if buf.len() as u64 != expected_len {
        return Err(corrupted(format!(
            "snapshot length {} does not match header ({})",
            buf.len(),
            expected_len
        )));
    }

    let crc_at = buf.len() - TRAILER_LEN;
    let mut cursor = Cursor::new(&buf[crc_at..]);
    let stored = cursor.read_u64::<LittleEndian>().map_err(|e| corrupted(e.to_string()))?;
    let mut digest = Digest::new();
    digest.write(&buf[..crc_at]);
    if digest.sum64() != stored {
        return Err(corrupted(format!(
            "snapshot checksum mismatch: expected {:#x}, found {:#x}",
            stored,
            digest.sum64()
        )));
    }

    let (state, _): (ControllerState, usize) =
        bincode::serde::decode_from_slice(&buf[HEADER_LEN..crc_at], bincode::config::standard())
            .map_err(|e| corrupted(e.to_string()))?;

    if state.version() != header.version {
        return Err(corrupted("snapshot header version does not match body"));
    }
    state.check_invariants()?;
    Ok(state)
}
