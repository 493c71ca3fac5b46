//! BLAKE3 file hasher with streaming support.
//!
//! Reads file content in fixed-size chunks, so memory use stays constant
//! regardless of file size. Two files with equal digest are treated as
//! duplicates without further byte-by-byte comparison.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::HashError;

/// Content digest of a file (BLAKE3, 32 bytes).
pub type Hash = [u8; 32];

/// Read buffer size for streaming hashing (64 KiB).
const READ_BUF_SIZE: usize = 64 * 1024;

/// Hash a file's entire content with BLAKE3.
pub fn hash_file(path: &Path) -> Result<Hash, HashError> {
    let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| HashError::from_io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(*hasher.finalize().as_bytes())
}

/// Format a hash as a lowercase hexadecimal string.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write as _;
    let mut hex = String::with_capacity(64);
    for byte in hash {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Parse a 64-character hexadecimal string back into a hash.
///
/// Returns `None` for any other length or non-hex input.
#[must_use]
pub fn hex_to_hash(hex: &str) -> Option<Hash> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut hash = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let hi = (chunk[0] as char).to_digit(16)?;
        let lo = (chunk[1] as char).to_digit(16)?;
        hash[i] = (hi * 16 + lo) as u8;
    }
    Some(hash)
}

/// Serde codec storing a [`Hash`] as its hex string form.
pub(crate) mod serde_hex {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{hash_to_hex, hex_to_hash, Hash};

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hash_to_hex(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex_to_hash(&hex).ok_or_else(|| de::Error::custom("invalid content digest"))
    }
}
