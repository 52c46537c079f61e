// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshot format.
//!
//! ```text
//! [magic "HIDR"][format u32][version u64][body_len u64][body: bincode state][crc64 u64]
//! ```
//! All integers little endian. The CRC covers everything before it.

pub mod encode;
pub mod decode;

pub const MAGIC: &[u8; 4] = b"HIDR";
pub const FORMAT_VERSION: u32 = 1;
pub const HEADER_LEN: usize = 4 + 4 + 8 + 8;
pub const TRAILER_LEN: usize = 8;
