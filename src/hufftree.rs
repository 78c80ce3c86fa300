use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};
use crate::min_heap::MinHeap;

/// Symbol to prefix code, left branch = 0, right branch = 1.
pub type CodeTable = BTreeMap<u8, BitVec>;

/// Occurrence count of every byte value in one input.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [usize; 256],
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0usize; 256];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        FrequencyTable { counts }
    }

    pub fn get(&self, byte: u8) -> usize {
        self.counts[byte as usize]
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Non-zero entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(u8, usize)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, usize)>>(iter: I) -> Self {
        let mut counts = [0usize; 256];
        for (byte, count) in iter {
            counts[byte as usize] += count;
        }
        FrequencyTable { counts }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: usize,
        byte: u8,
    },
    Internal {
        weight: usize,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: usize) -> Self {
        HuffNode::Leaf { weight: f, byte: b }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn merge(a: Self, b: Self) -> Self {
        // a is the smaller node
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    pub fn generate_table(&self, code_table: &mut CodeTable, path: &mut BitVec) {
        match self {
            HuffNode::Leaf { byte, .. } => {
                code_table.insert(*byte, path.clone());
            }
            HuffNode::Internal { left, right, .. } => {
                let depth = path.len();
                path.push_bit(false);
                left.generate_table(code_table, path);
                path.truncate(depth);
                path.push_bit(true);
                right.generate_table(code_table, path);
                path.truncate(depth);
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            HuffNode::Leaf { byte, weight } => {
                writeln!(f, "{}{}-> Leaf: {:?} ({}) [weight: {}]",
                         indent, label, *byte as char, byte, weight)
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                left.fmt_node(f, depth + 1, "L")?;
                right.fmt_node(f, depth + 1, "R")
            }
        }
    }
}

/// Heap entry ordered by weight, then by a sequence key.
///
/// Leaves use their byte value as key and merged nodes use 256 + merge index,
/// so every pair of entries compares unequal and the build is reproducible.
#[derive(Debug)]
struct Weighted {
    key: usize,
    node: HuffNode,
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weighted {}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weighted {
    fn cmp(&self, other: &Self) -> Ordering {
        self.node
            .weight()
            .cmp(&other.node.weight())
            .then(self.key.cmp(&other.key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Builds the tree by repeatedly merging the two lightest subtrees.
    ///
    /// The first subtree taken from the heap becomes the left child.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let nodes: Vec<Weighted> = frequencies
            .iter()
            .map(|(byte, count)| Weighted {
                key: byte as usize,
                node: HuffNode::new(byte, count),
            })
            .collect();

        if nodes.is_empty() {
            return Err(HuffmanError::logic("cannot build a tree without symbols"));
        }

        let mut heap = MinHeap::build(nodes)?;
        let mut next_key = 256;
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            heap.insert(Weighted {
                key: next_key,
                node: HuffNode::merge(x.node, y.node),
            });
            next_key += 1;
        }
        let root = heap.into_single()?.node;

        Ok(HuffmanTree { root })
    }

    /// Maps every leaf symbol to its root-to-leaf path.
    ///
    /// A tree that is a lone leaf maps its symbol to the empty code.
    pub fn generate_table(&self) -> CodeTable {
        let mut table = BTreeMap::new();
        self.root.generate_table(&mut table, &mut BitVec::new());
        table
    }

    pub fn is_single_leaf(&self) -> bool {
        matches!(self.root, HuffNode::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        self.root.fmt_node(f, 0, "root")
    }
}
