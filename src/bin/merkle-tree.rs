#![forbid(unsafe_code)]
//! Prints the Merkle root and tree of the records given on the command line.

use clap::Parser;
use colored::*;
use merkle_ledger::cli::render_tree;
use merkle_ledger::merkle::MerkleTree;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Records, hashed in the order given
    records: Vec<String>,
    /// Print only the root digest
    #[arg(long)]
    root_only: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let tree = MerkleTree::new(&cli.records);

    let root = match tree.root_hex() {
        Some(root) => root,
        None => {
            eprintln!("{}", "No records given; the tree has no root.".yellow());
            return Ok(());
        }
    };

    if cli.root_only {
        println!("{}", root);
        return Ok(());
    }

    println!("{} {}", "Merkle root:".bright_green().bold(), root);
    println!(
        "{}",
        format!("{} leaves, {} levels", tree.leaf_count(), tree.height()).bright_cyan()
    );
    println!();
    print!("{}", render_tree(&tree));
    Ok(())
}
