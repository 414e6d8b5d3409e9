// Thin re-export module: implementation lives in `blockchain/core.rs`, split
// into block/ledger construction, validation and the lock-guarded ledger.

pub mod core;
pub use core::*;
