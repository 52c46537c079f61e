// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Durable Command Journal
//!
//! The journal file is the node's primary truth. Snapshots are an optimization and can
//! always be rebuilt from it.
//!
//! # File Format
//! ```text
//! [Header: 16 bytes][Frame][Frame][Frame]...
//! ```
//!
//! Header:
//! - format: u32 (1)
//! - protocol: u32 (controller protocol version)
//! - reserved: u64 (0)
//!
//! Frame:
//! - sequence: u64
//! - len: u32
//! - crc32: u32 (over the payload)
//! - payload: bincode `JournalEntry`
//!
//! All integers are little-endian.
//!
//! # Guarantees
//! - Frames are fsync'd before the command is applied in memory
//! - A torn final frame (crash mid-append) is dropped on reopen
//! - A checksum mismatch anywhere else fails closed

pub mod reader;
pub mod writer;

pub use reader::{read_journal, scan_journal, JournalContents};
pub use writer::JournalWriter;

use thiserror::Error;

use hidra_controller::error::ControllerError;

pub const JOURNAL_FORMAT: u32 = 1;
pub const HEADER_LEN: usize = 16;
pub const FRAME_HEADER_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Corrupted frame at offset {offset}: {reason}")]
    Corrupted { offset: u64, reason: String },

    #[error("Journal {0:?} is unusable after a failed append")]
    Poisoned(std::path::PathBuf),

    #[error("Entry encoding failed: {0}")]
    Encoding(#[from] ControllerError),
}

pub type Result<T> = std::result::Result<T, JournalError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JournalHeader {
    pub format: u32,
    pub protocol: u32,
}

impl JournalHeader {
    pub fn current() -> Self {
        Self {
            format: JOURNAL_FORMAT,
            protocol: hidra_controller::config::PROTOCOL_VERSION,
        }
    }

    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.format.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.protocol.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(JournalError::InvalidHeader(format!(
                "{} bytes, need {}",
                bytes.len(),
                HEADER_LEN
            )));
        }
        let header = Self {
            format: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            protocol: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        };
        let current = Self::current();
        if header.format != current.format {
            return Err(JournalError::InvalidHeader(format!(
                "format {} (expected {})",
                header.format, current.format
            )));
        }
        if header.protocol != current.protocol {
            return Err(JournalError::InvalidHeader(format!(
                "protocol {} (expected {})",
                header.protocol, current.protocol
            )));
        }
        Ok(header)
    }
}

/// Frames one encoded entry.
pub(crate) fn encode_frame(sequence: u64, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&sequence.to_le_bytes());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    frame.extend_from_slice(payload);
    frame
}
