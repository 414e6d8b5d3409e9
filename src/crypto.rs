//! Hash primitives shared by the Merkle tree and the ledger

use crate::error::ChainError;
use sha2::{Digest, Sha256};

/// A SHA-256 digest.
pub type Sha256Hash = [u8; 32];

/// Hash a single byte slice.
pub fn sha256(data: &[u8]) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash the concatenation of `parts` without allocating the joined buffer.
pub fn sha256_concat<I, T>(parts: I) -> Sha256Hash
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    hasher.finalize().into()
}

/// Convert a digest (or any byte string) to lowercase hex for display.
pub fn hash_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parse a 64 character hex string into a digest.
pub fn hash_from_hex(hex_str: &str) -> Result<Sha256Hash, ChainError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| ChainError::CryptoError(format!("Invalid hex digest: {}", e)))?;
    if bytes.len() != 32 {
        return Err(ChainError::CryptoError(format!(
            "Digest must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    bytes
        .try_into()
        .map_err(|_| ChainError::CryptoError("Failed to convert bytes into digest".to_string()))
}
