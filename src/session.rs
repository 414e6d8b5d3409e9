//! Interactive shell state: the ledger plus a batch of pending transactions.
//!
//! Both collections are owned by the session; nothing is global.

use crate::blockchain::{Block, Ledger};
use crate::error::ChainError;
use crate::merkle::MerkleTree;
use crate::transaction::{Transaction, MAX_PAYLOAD_SIZE};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    AddTransaction(String),
    AddBlock,
    ViewBlockchain,
    ViewJson,
    ViewTree(usize),
    Verify,
    Exit,
    Unknown(String),
}

impl Command {
    /// Splits off the command name at the first space; the rest of the line is
    /// kept verbatim as the argument.
    pub fn parse(line: &str) -> Result<Command, ChainError> {
        let line = line.trim();
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));

        let command = match name {
            "help" => Command::Help,
            "add_transaction" => Command::AddTransaction(rest.to_string()),
            "add_block" => Command::AddBlock,
            "view_blockchain" => Command::ViewBlockchain,
            "view_json" => Command::ViewJson,
            "view_tree" => {
                let index = rest.trim().parse().map_err(|_| {
                    ChainError::InvalidInput(format!("view_tree expects a block index, got '{}'", rest.trim()))
                })?;
                Command::ViewTree(index)
            }
            "verify" => Command::Verify,
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        };
        Ok(command)
    }
}

#[derive(Debug)]
pub enum Reply<'a> {
    Help,
    TransactionAdded { pending: usize },
    BlockAdded(&'a Block),
    NoPendingTransactions,
    Blocks(&'a [Block]),
    Json(String),
    Tree { index: usize, tree: MerkleTree },
    Verified { blocks: usize },
    Exit,
    Unknown(String),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    ledger: Ledger,
    pending: Vec<Transaction>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queues a transaction whose payload is the raw bytes of `text`.
    pub fn add_transaction(&mut self, text: &str) -> Result<usize, ChainError> {
        if text.len() > MAX_PAYLOAD_SIZE {
            return Err(ChainError::InvalidInput(format!(
                "Transaction too large: {} bytes (max: {})",
                text.len(),
                MAX_PAYLOAD_SIZE
            )));
        }
        self.pending.push(Transaction::from_text(text));
        Ok(self.pending.len())
    }

    /// Appends the pending batch as a new block and clears it. Returns `None`
    /// without touching the ledger when nothing is pending.
    pub fn commit_block(&mut self) -> Result<Option<&Block>, ChainError> {
        if self.pending.is_empty() {
            info!("No pending transactions to commit");
            return Ok(None);
        }
        let batch = std::mem::take(&mut self.pending);
        self.ledger.append(batch).map(Some)
    }

    /// Every block from genesis onward. Call again to restart.
    pub fn list_blocks(&self) -> std::slice::Iter<'_, Block> {
        self.ledger.iter()
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply<'_>, ChainError> {
        let reply = match command {
            Command::Help => Reply::Help,
            Command::AddTransaction(text) => Reply::TransactionAdded {
                pending: self.add_transaction(&text)?,
            },
            Command::AddBlock => match self.commit_block()? {
                Some(block) => Reply::BlockAdded(block),
                None => Reply::NoPendingTransactions,
            },
            Command::ViewBlockchain => Reply::Blocks(self.ledger.blocks()),
            Command::ViewJson => Reply::Json(
                serde_json::to_string_pretty(self.ledger.blocks())
                    .map_err(|e| ChainError::IoError(format!("JSON encoding failed: {}", e)))?,
            ),
            Command::ViewTree(index) => Reply::Tree {
                index,
                tree: self.ledger.get(index)?.merkle_tree(),
            },
            Command::Verify => {
                self.ledger.verify()?;
                Reply::Verified {
                    blocks: self.ledger.len(),
                }
            }
            Command::Exit => Reply::Exit,
            Command::Unknown(name) => Reply::Unknown(name),
        };
        Ok(reply)
    }
}
