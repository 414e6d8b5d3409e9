//! Error types for the ledger

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    InvalidInput(String),
    EmptyTreeInput,
    InvalidBlockLinkage(String),
    InvalidBlock(String),
    InvalidMerkleRoot(String),
    BlockNotFound(usize),
    CryptoError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ChainError::EmptyTreeInput => write!(f, "Merkle tree has no records"),
            ChainError::InvalidBlockLinkage(msg) => write!(f, "Invalid block linkage: {}", msg),
            ChainError::InvalidBlock(msg) => write!(f, "Invalid block: {}", msg),
            ChainError::InvalidMerkleRoot(msg) => write!(f, "Invalid Merkle root: {}", msg),
            ChainError::BlockNotFound(index) => write!(f, "Block {} not found", index),
            ChainError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            ChainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ChainError::InvalidInput("empty batch".to_string()).to_string(),
            "Invalid input: empty batch"
        );
        assert_eq!(ChainError::BlockNotFound(7).to_string(), "Block 7 not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ChainError = io.into();
        assert!(matches!(err, ChainError::IoError(msg) if msg.contains("missing")));
    }
}
