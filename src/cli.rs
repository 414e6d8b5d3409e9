//! Plain-text rendering for the shell. Colouring is left to the binaries.

use crate::blockchain::Block;
use crate::merkle::MerkleTree;
use crate::session::Reply;
use std::fmt::Write;

pub const SEPARATOR: &str = "-------------------------------";

pub fn help_text() -> String {
    [
        "help",
        "add_transaction <text>",
        "add_block",
        "view_blockchain",
        "view_json",
        "view_tree <block index>",
        "verify",
        "exit",
    ]
    .join("\n")
}

/// Digests as hex, payloads as text.
pub fn render_block(block: &Block) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Prev. Hash: {}", block.previous_hash_hex());
    let _ = writeln!(out, "Hash: {}", block.hash_hex());
    let _ = writeln!(out, "Timestamp: {}", block.timestamp());
    let _ = writeln!(out, "MerkleRoot: {}", block.merkle_root_hex());
    for tx in block.transactions() {
        let _ = writeln!(out, "Transaction Data: {}", tx.payload_lossy());
    }
    out
}

pub fn render_chain<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&render_block(block));
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}

/// One digest per line, indented four spaces per level below the root.
pub fn render_tree(tree: &MerkleTree) -> String {
    let mut out = String::new();
    for (depth, hash) in tree.traverse() {
        let _ = writeln!(out, "{:width$}{}", "", hex::encode(hash), width = depth * 4);
    }
    out
}

pub fn render_reply(reply: &Reply<'_>) -> String {
    match reply {
        Reply::Help => help_text(),
        Reply::TransactionAdded { pending } => {
            format!("Add transaction successfully! ({} pending)", pending)
        }
        Reply::BlockAdded(block) => format!("Add block successfully! Hash: {}", block.hash_hex()),
        Reply::NoPendingTransactions => "No pending transactions!".to_string(),
        Reply::Blocks(blocks) => render_chain(blocks.iter()),
        Reply::Json(json) => json.clone(),
        Reply::Tree { index, tree } => {
            format!("Merkle tree of block {}:\n{}", index, render_tree(tree))
        }
        Reply::Verified { blocks } => format!("Chain is valid ({} blocks)", blocks),
        Reply::Exit => "Exiting...".to_string(),
        Reply::Unknown(name) => format!(
            "Invalid command '{}'. Type 'help' for a list of commands.",
            name
        ),
    }
}
