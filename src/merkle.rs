//! Binary SHA-256 Merkle tree.
//!
//! The tree is built bottom-up, one level at a time, into a flat arena of
//! nodes. Leaves are `SHA-256(record)`; an internal node is
//! `SHA-256(left || right)`. When a level has an odd number of nodes the last
//! node's digest is paired with itself, so duplication always happens *after*
//! leaf hashing. A single record produces a root equal to its leaf digest.
//!
//! An empty input builds an empty tree with no root rather than failing.

use crate::crypto::{sha256, sha256_concat, Sha256Hash};
use crate::error::ChainError;
use rayon::prelude::*;
use std::ops::Range;

/// Levels at least this wide hash their sibling pairs on the rayon pool.
pub const PARALLEL_LEVEL_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleNode {
    pub hash: Sha256Hash,
    /// Arena indices of the (left, right) children. Both are equal when the
    /// node was formed by pairing an odd trailing node with itself.
    pub children: Option<(usize, usize)>,
}

impl MerkleNode {
    fn leaf(hash: Sha256Hash) -> Self {
        MerkleNode { hash, children: None }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MerkleTree {
    nodes: Vec<MerkleNode>,
    levels: Vec<Range<usize>>,
}

impl MerkleTree {
    pub fn new<T>(records: &[T]) -> Self
    where
        T: AsRef<[u8]> + Sync,
    {
        let mut nodes: Vec<MerkleNode> = if records.len() >= PARALLEL_LEVEL_THRESHOLD {
            records
                .par_iter()
                .map(|r| MerkleNode::leaf(sha256(r.as_ref())))
                .collect()
        } else {
            records
                .iter()
                .map(|r| MerkleNode::leaf(sha256(r.as_ref())))
                .collect()
        };

        if nodes.is_empty() {
            return MerkleTree::default();
        }

        let mut level = 0..nodes.len();
        let mut levels = vec![level.clone()];

        while level.len() > 1 {
            let pairs: Vec<(usize, usize)> = level
                .clone()
                .step_by(2)
                .map(|i| (i, if i + 1 < level.end { i + 1 } else { i }))
                .collect();

            let hashes: Vec<Sha256Hash> = if pairs.len() >= PARALLEL_LEVEL_THRESHOLD {
                pairs
                    .par_iter()
                    .map(|&(l, r)| hash_pair(&nodes[l].hash, &nodes[r].hash))
                    .collect()
            } else {
                pairs
                    .iter()
                    .map(|&(l, r)| hash_pair(&nodes[l].hash, &nodes[r].hash))
                    .collect()
            };

            let start = nodes.len();
            nodes.extend(
                pairs
                    .into_iter()
                    .zip(hashes)
                    .map(|(children, hash)| MerkleNode { hash, children: Some(children) }),
            );
            level = start..nodes.len();
            levels.push(level.clone());
        }

        MerkleTree { nodes, levels }
    }

    fn root_index(&self) -> Option<usize> {
        self.levels.last().map(|level| level.start)
    }

    /// The root digest, or `None` for a tree built from zero records.
    pub fn root(&self) -> Option<Sha256Hash> {
        self.root_index().map(|i| self.nodes[i].hash)
    }

    pub fn try_root(&self) -> Result<Sha256Hash, ChainError> {
        self.root().ok_or(ChainError::EmptyTreeInput)
    }

    pub fn root_hex(&self) -> Option<String> {
        self.root().map(hex::encode)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, |level| level.len())
    }

    /// Number of levels including the leaves; zero for an empty tree.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, index: usize) -> Option<&MerkleNode> {
        self.nodes.get(index)
    }

    /// Digests of every level, leaves first and root last.
    pub fn levels(&self) -> Vec<Vec<Sha256Hash>> {
        self.levels
            .iter()
            .map(|level| self.nodes[level.clone()].iter().map(|n| n.hash).collect())
            .collect()
    }

    /// Pre-order walk yielding `(depth, digest)` with the root at depth 0.
    /// Right children come before left ones; a self-paired child is yielded once.
    pub fn traverse(&self) -> Vec<(usize, Sha256Hash)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.root_index().map(|i| (i, 0)).into_iter().collect();

        while let Some((index, depth)) = stack.pop() {
            let node = &self.nodes[index];
            out.push((depth, node.hash));
            if let Some((left, right)) = node.children {
                stack.push((left, depth + 1));
                if right != left {
                    stack.push((right, depth + 1));
                }
            }
        }
        out
    }
}

fn hash_pair(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    sha256_concat([left, right])
}

/// Root digest of `records`, or `None` when there are no records.
pub fn build_tree<T>(records: &[T]) -> Option<Sha256Hash>
where
    T: AsRef<[u8]> + Sync,
{
    MerkleTree::new(records).root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash_to_hex;

    #[test]
    fn test_empty_input_has_no_root() {
        let records: Vec<&str> = Vec::new();
        let tree = MerkleTree::new(&records);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.try_root(), Err(ChainError::EmptyTreeInput));
        assert_eq!(tree.height(), 0);
        assert!(tree.traverse().is_empty());
        assert_eq!(build_tree(&records), None);
    }

    #[test]
    fn test_single_record_root_is_record_hash() {
        let tree = MerkleTree::new(&["hello"]);
        assert_eq!(tree.root(), Some(sha256(b"hello")));
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_pair_root() {
        let root = build_tree(&["a", "b"]).unwrap();
        assert_eq!(
            hash_to_hex(&root),
            "e5a01fee14e0ed5c48714f22180f25ad8365b53f9779f79dc4a3d7e93963f94a"
        );
    }

    #[test]
    fn test_odd_input_duplicates_last_digest() {
        let root = build_tree(&["a", "b", "c"]).unwrap();
        assert_eq!(
            hash_to_hex(&root),
            "d31a37ef6ac14a2db1470c4316beb5592e6afd4465022339adafda76a18ffabe"
        );

        let (a, b, c) = (sha256(b"a"), sha256(b"b"), sha256(b"c"));
        let expected = hash_pair(&hash_pair(&a, &b), &hash_pair(&c, &c));
        assert_eq!(root, expected);
    }

    #[test]
    fn test_odd_level_above_leaves() {
        // five leaves -> three nodes -> two -> one
        let tree = MerkleTree::new(&["a", "b", "c", "d", "e"]);
        assert_eq!(
            tree.root_hex().unwrap(),
            "dd14d0ba516bb654a3052b76f051db026f4e322d0be081468fab99440f9e7305"
        );
        let widths: Vec<usize> = tree.levels().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![5, 3, 2, 1]);
    }

    #[test]
    fn test_deterministic_and_order_sensitive() {
        let forward = build_tree(&["a", "b", "c"]);
        assert_eq!(forward, build_tree(&["a", "b", "c"]));
        assert_ne!(forward, build_tree(&["c", "b", "a"]));
        assert_ne!(build_tree(&["a", "b"]), build_tree(&["b", "a"]));
    }

    #[test]
    fn test_traverse_depths() {
        let tree = MerkleTree::new(&["a", "b", "c"]);
        let walk = tree.traverse();
        let depths: Vec<usize> = walk.iter().map(|(d, _)| *d).collect();
        // root, right subtree (c,c collapsed to one leaf), left subtree (b, a)
        assert_eq!(depths, vec![0, 1, 2, 1, 2, 2]);
        assert_eq!(walk[0].1, tree.root().unwrap());
        assert_eq!(walk[2].1, sha256(b"c"));
        assert_eq!(walk[4].1, sha256(b"b"));
        assert_eq!(walk[5].1, sha256(b"a"));
    }

    #[test]
    fn test_parallel_path_matches_sequential_reduction() {
        let records: Vec<Vec<u8>> = (0..(PARALLEL_LEVEL_THRESHOLD * 2 + 3))
            .map(|i| format!("record-{}", i).into_bytes())
            .collect();
        let tree = MerkleTree::new(&records);

        let mut level: Vec<Sha256Hash> = records.iter().map(|r| sha256(r)).collect();
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
        }
        assert_eq!(tree.root(), Some(level[0]));
        assert_eq!(tree.leaf_count(), records.len());
    }
}
