//! Archive checksums

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a serialized archive
///
/// Reported in the export summary so a delivered file can be checked
/// against what the pipeline produced.
pub fn archive_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}
