// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::bail;
use crc64fast::Digest;
use std::path::Path;

use hidra_controller::snapshot::decode::decode_state;
use hidra_controller::snapshot::TRAILER_LEN;
use hidra_controller::verify::{snapshot_hash, state_hash};

pub fn run(snapshot_path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(snapshot_path)?;
    if bytes.len() < TRAILER_LEN {
        bail!("{} is too short to be a snapshot", snapshot_path.display());
    }

    let crc_at = bytes.len() - TRAILER_LEN;
    let computed = compute_crc64(&bytes[..crc_at]);
    let mut stored = [0u8; TRAILER_LEN];
    stored.copy_from_slice(&bytes[crc_at..]);
    let stored = u64::from_le_bytes(stored);

    match decode_state(&bytes) {
        Ok(state) => {
            println!("\n✅ VERIFIED\n");
            println!("Version:       v{}", state.version());
            println!("Checksum:      {:016x} (CRC64)", computed);
            println!("File Hash:     {}", hex::encode(snapshot_hash(&bytes)));
            println!("State Hash:    {}\n", hex::encode(state_hash(&state)?));
            Ok(())
        }
        Err(e) => {
            println!("\n❌ CORRUPTED\n");
            println!("Expected CRC:  {:016x}", stored);
            println!("Found CRC:     {:016x}", computed);
            Err(e.into())
        }
    }
}

pub fn compute_crc64(data: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(data);
    digest.sum64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::solved_journal;
    use hidra_controller::snapshot::encode::encode_state;
    use tempfile::tempdir;

    #[test]
    fn verifies_good_snapshot_and_rejects_flipped_byte() {
        let dir = tempdir().unwrap();
        let (_, state) = solved_journal(dir.path());
        let path = dir.path().join("hidra.snapshot");
        let mut bytes = encode_state(&state).unwrap();
        std::fs::write(&path, &bytes).unwrap();
        run(&path).unwrap();

        bytes[30] ^= 0x40;
        std::fs::write(&path, &bytes).unwrap();
        assert!(run(&path).is_err());
    }
}
