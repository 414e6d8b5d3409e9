//! Merkle Ledger - a hash-linked ledger whose blocks carry a Merkle root
//!
//! # Architecture
//!
//! ## Hashing
//! - [`crypto`] - SHA-256 helpers and hex conversion
//! - [`merkle`] - Binary Merkle tree built level by level
//!
//! ## Ledger
//! - [`transaction`] - Opaque transaction payloads
//! - [`blockchain`] - Blocks, the append-only ledger, validation and the
//!   lock-guarded shared ledger
//!
//! ## Shell
//! - [`session`] - Command parsing and the pending-transaction batch
//! - [`cli`] - Text rendering of blocks, trees and replies
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Hashing
// ============================================================================
pub mod crypto;
pub mod merkle;

// ============================================================================
// Ledger
// ============================================================================
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Shell
// ============================================================================
pub mod cli;
pub mod session;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
