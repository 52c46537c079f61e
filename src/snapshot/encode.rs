//! Snapshot encoding.

use byteorder::{LittleEndian, WriteBytesExt};
use crc64fast::Digest;

use super::{FORMAT_VERSION, HEADER_LEN, MAGIC, TRAILER_LEN};
use crate::error::{ControllerError, Result};
use crate::state::controller::ControllerState;

fn io_err(e: std::io::Error) -> ControllerError {
    ControllerError::Corrupted(e.to_string())
}

pub fn encode_state(state: &ControllerState) -> Result<Vec<u8>> {
    let body = bincode::serde::encode_to_vec(state, bincode::config::standard())
        .map_err(|e| ControllerError::Corrupted(e.to_string()))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len() + TRAILER_LEN);
    buf.extend_from_slice(MAGIC);
    buf.write_u32::<LittleEndian>(FORMAT_VERSION).map_err(io_err)?;
    buf.write_u64::<LittleEndian>(state.version()).map_err(io_err)?;
    buf.write_u64::<LittleEndian>(body.len() as u64).map_err(io_err)?;
    buf.extend_from_slice(&body);

    let mut digest = Digest::new();
    digest.write(&buf);
    buf.write_u64::<LittleEndian>(digest.sum64()).map_err(io_err)?;
    Ok(buf)
}
