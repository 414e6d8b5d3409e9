use crate::crypto::{sha256_concat, Sha256Hash};
use crate::error::ChainError;
use crate::merkle::MerkleTree;
use crate::transaction::Transaction;
use serde::Serializer;
use tracing::{debug, info, warn};

/// 2023-01-01T00:00:00Z, so the genesis block is identical on every run.
pub const GENESIS_TIMESTAMP: i64 = 1672531200;
pub const GENESIS_PAYLOAD: &str = "Genesis Block";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Block {
    timestamp: i64,
    transactions: Vec<Transaction>,
    #[serde(serialize_with = "serialize_hex")]
    previous_hash: Vec<u8>,
    #[serde(serialize_with = "serialize_hex")]
    hash: Sha256Hash,
    #[serde(serialize_with = "serialize_opt_hex")]
    merkle_root: Option<Sha256Hash>,
}

impl Block {
    /// Builds a block on top of `previous_hash`. The batch must not be empty.
    pub(crate) fn new(
        previous_hash: Vec<u8>,
        transactions: Vec<Transaction>,
        timestamp: i64,
    ) -> Result<Self, ChainError> {
        let tx_digest = Block::hash_transactions(&transactions);
        let merkle_root = MerkleTree::new(&transactions).try_root()?;
        debug!(
            tx_count = transactions.len(),
            merkle_root = %hex::encode(merkle_root),
            "Computed Merkle root"
        );
        let hash = Block::calculate_hash(&previous_hash, &tx_digest, timestamp);

        Ok(Block {
            timestamp,
            transactions,
            previous_hash,
            hash,
            merkle_root: Some(merkle_root),
        })
    }

    /// The fixed first block: one sentinel transaction, no predecessor and
    /// no Merkle root. Its hash uses the ordinary block formula.
    pub fn genesis() -> Self {
        let transactions = vec![Transaction::from_text(GENESIS_PAYLOAD)];
        let tx_digest = Block::hash_transactions(&transactions);
        let hash = Block::calculate_hash(&[], &tx_digest, GENESIS_TIMESTAMP);

        Block {
            timestamp: GENESIS_TIMESTAMP,
            transactions,
            previous_hash: Vec::new(),
            hash,
            merkle_root: None,
        }
    }

    /// Flat digest of all payloads joined in order. This is not the Merkle root.
    pub fn hash_transactions(transactions: &[Transaction]) -> Sha256Hash {
        sha256_concat(transactions.iter().map(Transaction::payload))
    }

    /// `SHA-256(previous_hash || tx_digest || hex(timestamp))`
    pub fn calculate_hash(previous_hash: &[u8], tx_digest: &Sha256Hash, timestamp: i64) -> Sha256Hash {
        let timestamp = timestamp_hex(timestamp);
        sha256_concat([previous_hash, tx_digest.as_slice(), timestamp.as_bytes()])
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Empty for the genesis block.
    pub fn previous_hash(&self) -> &[u8] {
        &self.previous_hash
    }

    pub fn hash(&self) -> &Sha256Hash {
        &self.hash
    }

    pub fn merkle_root(&self) -> Option<&Sha256Hash> {
        self.merkle_root.as_ref()
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash.is_empty()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn previous_hash_hex(&self) -> String {
        hex::encode(&self.previous_hash)
    }

    /// Hex of the Merkle root, empty when the block has none.
    pub fn merkle_root_hex(&self) -> String {
        self.merkle_root.map(hex::encode).unwrap_or_default()
    }

    /// Re-derives the identity hash from the current contents. The stored
    /// hash is left untouched.
    pub fn recompute_hash(&self) -> Sha256Hash {
        let tx_digest = Block::hash_transactions(&self.transactions);
        Block::calculate_hash(&self.previous_hash, &tx_digest, self.timestamp)
    }

    pub fn recompute_merkle_root(&self) -> Option<Sha256Hash> {
        MerkleTree::new(&self.transactions).root()
    }

    pub fn merkle_tree(&self) -> MerkleTree {
        MerkleTree::new(&self.transactions)
    }

    #[cfg(test)]
    pub(crate) fn transactions_mut(&mut self) -> &mut Vec<Transaction> {
        &mut self.transactions
    }
}

/// Lowercase hex of the seconds value, `-` prefixed when negative.
pub fn timestamp_hex(timestamp: i64) -> String {
    if timestamp < 0 {
        format!("-{:x}", timestamp.unsigned_abs())
    } else {
        format!("{:x}", timestamp)
    }
}

fn serialize_hex<S, T>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<[u8]>,
{
    serializer.serialize_str(&hex::encode(bytes))
}

fn serialize_opt_hex<S>(bytes: &Option<Sha256Hash>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match bytes {
        Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
        None => serializer.serialize_none(),
    }
}

/// Append-only sequence of blocks starting at genesis. The sequence is never
/// empty, so the last block always exists.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub(crate) blocks: Vec<Block>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            blocks: vec![Block::genesis()],
        }
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Appends a block stamped with the current wall-clock second.
    pub fn append(&mut self, transactions: Vec<Transaction>) -> Result<&Block, ChainError> {
        self.append_at(transactions, chrono::Utc::now().timestamp())
    }

    pub fn append_at(
        &mut self,
        transactions: Vec<Transaction>,
        timestamp: i64,
    ) -> Result<&Block, ChainError> {
        if transactions.is_empty() {
            warn!("Rejected block with an empty transaction batch");
            return Err(ChainError::InvalidInput(
                "cannot append a block with no transactions".to_string(),
            ));
        }

        let previous_hash = self.last_block().hash().to_vec();
        let block = Block::new(previous_hash, transactions, timestamp)?;

        info!(
            height = self.blocks.len(),
            hash = %block.hash_hex(),
            tx_count = block.transactions().len(),
            "Appended block"
        );
        self.blocks.push(block);
        Ok(self.last_block())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Result<&Block, ChainError> {
        self.blocks.get(index).ok_or(ChainError::BlockNotFound(index))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::validate_block;
    use crate::crypto::sha256;

    fn txs(texts: &[&str]) -> Vec<Transaction> {
        texts.iter().map(|t| Transaction::from_text(t)).collect()
    }

    #[test]
    fn test_fresh_ledger_holds_only_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        let genesis = ledger.genesis();
        assert!(genesis.previous_hash().is_empty());
        assert!(genesis.is_genesis());
        assert_eq!(genesis.merkle_root(), None);
        assert_eq!(genesis.timestamp(), GENESIS_TIMESTAMP);
        assert_eq!(genesis.transactions()[0].payload(), GENESIS_PAYLOAD.as_bytes());
        assert_eq!(
            genesis.hash_hex(),
            "55afcc1d4ad4e971e3423423f3b10a687d030a06915a05a25ef5b80a0a35fbe4"
        );
    }

    #[test]
    fn test_two_appends_link_and_hash() {
        let mut ledger = Ledger::new();
        ledger.append_at(txs(&["This is transaction 1"]), 1_700_000_000).unwrap();
        ledger.append_at(txs(&["This is transaction 2"]), 1_700_000_060).unwrap();

        assert_eq!(ledger.len(), 3);
        let blocks = ledger.blocks();
        assert_eq!(blocks[1].previous_hash(), blocks[0].hash().as_slice());
        assert_eq!(blocks[2].previous_hash(), blocks[1].hash().as_slice());
        assert_eq!(
            blocks[1].hash_hex(),
            "4da7146bb01a604a76ff983e4341c44540093dcffdddcea21aea792930e3dea3"
        );
        assert_eq!(
            blocks[2].hash_hex(),
            "dbd6a0440eb3e18d4527a47b92215d85b546c404dac11288b2ef3ec7fff73f37"
        );
        assert_eq!(
            blocks[1].merkle_root_hex(),
            "81ad9212d25730c7c6d5f667004fb0ed2c220e5067f4165604030ea13b606a29"
        );
    }

    #[test]
    fn test_append_uses_wall_clock() {
        let before = chrono::Utc::now().timestamp();
        let mut ledger = Ledger::new();
        let block = ledger.append(txs(&["now"])).unwrap();
        assert!(block.timestamp() >= before);
        assert!(block.timestamp() <= chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_empty_batch_rejected_without_mutation() {
        let mut ledger = Ledger::new();
        let err = ledger.append(Vec::new()).unwrap_err();
        assert!(matches!(err, ChainError::InvalidInput(_)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_flat_digest_differs_from_merkle_root() {
        let batch = txs(&["ab", "cd"]);
        assert_eq!(
            hex::encode(Block::hash_transactions(&batch)),
            "88d4266fd4e6338d13b845fcf289579d209c897823b9217da3e161936f031589"
        );
        let mut ledger = Ledger::new();
        let block = ledger.append_at(batch, 1).unwrap();
        let expected_root = sha256_concat([sha256(b"ab"), sha256(b"cd")]);
        assert_eq!(block.merkle_root(), Some(&expected_root));
    }

    #[test]
    fn test_timestamp_hex() {
        assert_eq!(timestamp_hex(1_700_000_000), "6553f100");
        assert_eq!(timestamp_hex(0), "0");
        assert_eq!(timestamp_hex(-31), "-1f");
    }

    #[test]
    fn test_tampered_payload_does_not_rewrite_stored_digests() {
        let mut ledger = Ledger::new();
        ledger.append_at(txs(&["pay alice", "pay bob"]), 42).unwrap();
        let original = ledger.blocks()[1].clone();

        let mut tampered = original.clone();
        tampered.transactions[0] = Transaction::from_text("pay mallory");

        assert_eq!(tampered.hash(), original.hash());
        assert_eq!(tampered.merkle_root(), original.merkle_root());
        assert_ne!(&tampered.recompute_hash(), tampered.hash());
        assert_ne!(tampered.recompute_merkle_root().as_ref(), tampered.merkle_root());
        assert!(validate_block(&tampered, ledger.genesis()).is_err());
        assert!(validate_block(&original, ledger.genesis()).is_ok());
    }

    #[test]
    fn test_block_json_uses_hex_digests() {
        let ledger = Ledger::new();
        let json = serde_json::to_value(ledger.genesis()).unwrap();
        assert_eq!(json["previous_hash"], "");
        assert_eq!(json["merkle_root"], serde_json::Value::Null);
        assert_eq!(json["hash"], ledger.genesis().hash_hex());
        assert_eq!(json["timestamp"], GENESIS_TIMESTAMP);
    }

    #[test]
    fn test_get_out_of_range() {
        let ledger = Ledger::new();
        assert!(ledger.get(0).is_ok());
        assert_eq!(ledger.get(3).unwrap_err(), ChainError::BlockNotFound(3));
    }
}
