//! Transaction payloads carried by blocks

use crate::crypto::{sha256, Sha256Hash};

/// Maximum payload size in bytes (100KB) accepted from the shell
pub const MAX_PAYLOAD_SIZE: usize = 100_000;

/// An opaque record. There is no sender, amount or signature; the payload
/// bytes are all that is hashed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    #[serde(with = "serde_bytes")]
    payload: Vec<u8>,
}

impl Transaction {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Transaction { payload: payload.into() }
    }

    pub fn from_text(text: &str) -> Self {
        Transaction::new(text.as_bytes())
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload rendered as text, replacing invalid UTF-8.
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Leaf digest of this transaction in a Merkle tree.
    pub fn hash(&self) -> Sha256Hash {
        sha256(&self.payload)
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }
}

impl AsRef<[u8]> for Transaction {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}
