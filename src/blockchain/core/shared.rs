use crate::error::ChainError;
use crate::transaction::Transaction;
use parking_lot::RwLock;
use std::sync::Arc;

use super::chain::{Block, Ledger};

/// A ledger that can be handed to several threads.
///
/// Appends hold the write lock across the whole read-last-hash, build, push
/// sequence, so two writers can never both extend the same tip. Readers only
/// ever receive cloned, fully built blocks.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        SharedLedger {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn append(&self, transactions: Vec<Transaction>) -> Result<Block, ChainError> {
        let mut ledger = self.inner.write();
        ledger.append(transactions).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn last_block(&self) -> Block {
        self.inner.read().last_block().clone()
    }

    /// Copy of every block at the moment the read lock was taken.
    pub fn snapshot(&self) -> Vec<Block> {
        self.inner.read().blocks().to_vec()
    }

    pub fn verify(&self) -> Result<(), ChainError> {
        self.inner.read().verify()
    }

    /// Runs `f` against the ledger under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_appends_keep_chain_linked() {
        let ledger = SharedLedger::new();
        let writers: Vec<_> = (0..8)
            .map(|w| {
                let ledger = ledger.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        let tx = Transaction::from_text(&format!("writer {} tx {}", w, i));
                        ledger.append(vec![tx]).unwrap();
                    }
                })
            })
            .collect();

        for handle in writers {
            handle.join().unwrap();
        }

        assert_eq!(ledger.len(), 1 + 8 * 25);
        assert!(ledger.verify().is_ok());

        let blocks = ledger.snapshot();
        for pair in blocks.windows(2) {
            assert_eq!(pair[1].previous_hash(), pair[0].hash().as_slice());
        }
    }

    #[test]
    fn test_rejected_append_leaves_ledger_untouched() {
        let ledger = SharedLedger::new();
        assert!(ledger.append(Vec::new()).is_err());
        assert_eq!(ledger.len(), 1);
        assert!(ledger.last_block().is_genesis());
        assert!(!ledger.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_later_appends() {
        let ledger = SharedLedger::new();
        let before = ledger.snapshot();
        ledger.append(vec![Transaction::from_text("later")]).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(ledger.read(|l| l.len()), 2);
    }
}
