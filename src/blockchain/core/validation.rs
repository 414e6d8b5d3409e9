use crate::error::ChainError;

use super::chain::{Block, Ledger};

/// Re-derives a block's digests from its current contents and compares them
/// with the stored values.
pub fn validate_contents(block: &Block) -> Result<(), ChainError> {
    if block.transactions().is_empty() {
        return Err(ChainError::InvalidBlock(format!(
            "Block {} carries no transactions.",
            block.hash_hex()
        )));
    }

    let expected_hash = block.recompute_hash();
    if &expected_hash != block.hash() {
        return Err(ChainError::InvalidBlock(format!(
            "Block hash mismatch. Expected {}, but got {}.",
            hex::encode(expected_hash),
            block.hash_hex()
        )));
    }

    if block.is_genesis() {
        if block.merkle_root().is_some() {
            return Err(ChainError::InvalidMerkleRoot(
                "Genesis block must not carry a Merkle root.".to_string(),
            ));
        }
        return Ok(());
    }

    let expected_root = block.recompute_merkle_root();
    if expected_root.as_ref() != block.merkle_root() {
        return Err(ChainError::InvalidMerkleRoot(format!(
            "Merkle root mismatch. Expected {}, but got {}.",
            expected_root.map(hex::encode).unwrap_or_default(),
            block.merkle_root_hex()
        )));
    }
    Ok(())
}

/// Checks that `block` links to `previous` and that its own digests hold.
pub fn validate_block(block: &Block, previous: &Block) -> Result<(), ChainError> {
    if block.previous_hash() != previous.hash().as_slice() {
        return Err(ChainError::InvalidBlockLinkage(format!(
            "Invalid previous block hash. Expected {}, but got {}.",
            previous.hash_hex(),
            block.previous_hash_hex()
        )));
    }
    validate_contents(block)
}

impl Ledger {
    /// Walks the whole chain from genesis, re-deriving every digest.
    pub fn verify(&self) -> Result<(), ChainError> {
        let genesis = self.genesis();
        if *genesis != Block::genesis() {
            return Err(ChainError::InvalidBlock(
                "Genesis block does not match the fixed genesis content.".to_string(),
            ));
        }
        validate_contents(genesis)?;

        for pair in self.blocks().windows(2) {
            validate_block(&pair[1], &pair[0])?;
        }
        Ok(())
    }
}
