//! Bit-level tree serialization.
//!
//! Preorder walk: an internal node is a single `0` followed by its left and
//! right subtrees, a leaf is a `1` followed by the 8 symbol bits, MSB first.

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};

/// Width of the tree-size field that precedes the tree in a frame.
pub const TREE_SIZE_BITS: usize = 16;

// A tree over at most 256 symbols is never deeper than 255.
const MAX_DEPTH: usize = 256;

pub fn serialize(tree: &HuffmanTree) -> BitVec {
    let mut out = BitVec::with_capacity(serialized_len(tree));
    serialize_node(&tree.root, &mut out);
    out
}

fn serialize_node(node: &HuffNode, out: &mut BitVec) {
    match node {
        HuffNode::Leaf { byte, .. } => {
            out.push_bit(true);
            out.push_bits(*byte as u32, 8);
        }
        HuffNode::Internal { left, right, .. } => {
            out.push_bit(false);
            serialize_node(left, out);
            serialize_node(right, out);
        }
    }
}

/// Bits the serialized form occupies: one marker per node plus 8 per leaf.
pub fn serialized_len(tree: &HuffmanTree) -> usize {
    let leaves = tree.leaf_count();
    // a full binary tree has leaves - 1 internal nodes
    (leaves - 1) + leaves * 9
}

/// Validates a tree size against the header range and the given limit.
pub fn tree_size_header(bits: usize, limit: u16) -> Result<u16> {
    match u16::try_from(bits) {
        Ok(size) if size <= limit => Ok(size),
        _ => Err(HuffmanError::TreeTooLarge {
            bits,
            limit: limit as usize,
        }),
    }
}

/// Rebuilds one subtree starting at `*cursor`, advancing the cursor past it.
///
/// Rebuilt leaves carry weight 0.
pub fn deserialize(bits: &BitVec, cursor: &mut usize) -> Result<HuffNode> {
    deserialize_node(bits, cursor, 0)
}

fn deserialize_node(bits: &BitVec, cursor: &mut usize, depth: usize) -> Result<HuffNode> {
    if depth > MAX_DEPTH {
        return Err(HuffmanError::malformed(*cursor, "tree nests deeper than any byte alphabet allows"));
    }

    let marker = bits
        .get(*cursor)
        .ok_or_else(|| HuffmanError::malformed(*cursor, "ran out of bits before a node marker"))?;
    *cursor += 1;

    if marker {
        let byte = bits.read_bits(*cursor, 8).ok_or_else(|| {
            HuffmanError::malformed(*cursor, "not enough bits for leaf symbol")
        })?;
        *cursor += 8;
        Ok(HuffNode::new(byte as u8, 0))
    } else {
        let left = deserialize_node(bits, cursor, depth + 1)?;
        let right = deserialize_node(bits, cursor, depth + 1)?;
        Ok(HuffNode::Internal {
            weight: 0,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Rebuilds a whole tree and requires that every bit was used.
pub fn deserialize_exact(bits: &BitVec) -> Result<HuffmanTree> {
    let mut cursor = 0;
    let root = deserialize(bits, &mut cursor)?;
    if cursor != bits.len() {
        return Err(HuffmanError::malformed(
            cursor,
            format!("{} trailing bits after tree", bits.len() - cursor),
        ));
    }
    Ok(HuffmanTree { root })
}

#[cfg(test)]
mod test {
    use super::*;

    fn bits(s: &str) -> BitVec {
        s.chars().filter(|c| !c.is_whitespace()).map(|c| c == '1').collect()
    }

    fn strip_weights(node: &HuffNode) -> HuffNode {
        match node {
            HuffNode::Leaf { byte, .. } => HuffNode::new(*byte, 0),
            HuffNode::Internal { left, right, .. } => HuffNode::Internal {
                weight: 0,
                left: Box::new(strip_weights(left)),
                right: Box::new(strip_weights(right)),
            },
        }
    }

    /// Balanced tree over `leaves` symbols, cycling through byte values.
    fn synthetic_tree(leaves: usize) -> HuffmanTree {
        let mut level: Vec<HuffNode> = (0..leaves).map(|i| HuffNode::new(i as u8, 1)).collect();
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut iter = level.into_iter();
            while let Some(a) = iter.next() {
                match iter.next() {
                    Some(b) => next.push(HuffNode::merge(a, b)),
                    None => next.push(a),
                }
            }
            level = next;
        }
        HuffmanTree { root: level.remove(0) }
    }

    #[test]
    fn test_serialize_two_leaves() {
        let tree = HuffmanTree::from_bytes(b"ab").unwrap();
        let out = serialize(&tree);
        assert_eq!(out, bits("0 1 01100001 1 01100010"));
        assert_eq!(out.len(), serialized_len(&tree));
    }

    #[test]
    fn test_serialize_lone_leaf() {
        let tree = HuffmanTree::from_bytes(&[0, 0, 0]).unwrap();
        assert_eq!(serialize(&tree), bits("1 00000000"));
        assert_eq!(serialized_len(&tree), 9);
    }

    #[test]
    fn test_serialized_len_matches() {
        let data: Vec<u8> = (0..=255u8).chain(b"hello world".iter().copied()).collect();
        let tree = HuffmanTree::from_bytes(&data).unwrap();
        assert_eq!(serialize(&tree).len(), serialized_len(&tree));
        assert_eq!(serialized_len(&tree), 255 + 256 * 9);
    }

    #[test]
    fn test_deserialize_restores_shape() {
        let tree = HuffmanTree::from_bytes(b"the quick brown fox jumps over the lazy dog").unwrap();
        let rebuilt = deserialize_exact(&serialize(&tree)).unwrap();
        assert_eq!(rebuilt.root, strip_weights(&tree.root));
        assert_eq!(rebuilt.generate_table(), tree.generate_table());
    }

    #[test]
    fn test_deserialize_shared_cursor() {
        let mut stream = bits("0 1 00000001 0 1 00000010 1 00000011");
        stream.push_bits(0b101, 3);
        let mut cursor = 0;
        let node = deserialize(&stream, &mut cursor).unwrap();
        assert_eq!(cursor, 29);
        assert_eq!(node.weight(), 0);
        match node {
            HuffNode::Internal { left, right, .. } => {
                assert_eq!(*left, HuffNode::new(1, 0));
                assert!(matches!(*right, HuffNode::Internal { .. }));
            }
            HuffNode::Leaf { .. } => panic!("expected internal root"),
        }
    }

    #[test]
    fn test_deserialize_short_symbol() {
        let err = deserialize_exact(&bits("0 1 0110")).unwrap_err();
        match err {
            HuffmanError::MalformedTree { position, .. } => assert_eq!(position, 2),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_missing_child() {
        let err = deserialize_exact(&bits("0 1 01100001")).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTree { position: 10, .. }));

        let err = deserialize_exact(&BitVec::new()).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTree { position: 0, .. }));
    }

    #[test]
    fn test_deserialize_trailing_bits() {
        let err = deserialize_exact(&bits("1 01100001 0")).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTree { position: 9, .. }));
    }

    #[test]
    fn test_deserialize_rejects_deep_nesting() {
        let stream: BitVec = std::iter::repeat(false).take(1000).collect();
        let err = deserialize_exact(&stream).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTree { .. }));
    }

    #[test]
    fn test_tree_size_header() {
        assert_eq!(tree_size_header(0, u16::MAX).unwrap(), 0);
        assert_eq!(tree_size_header(65535, u16::MAX).unwrap(), 65535);
        assert!(matches!(
            tree_size_header(65536, u16::MAX),
            Err(HuffmanError::TreeTooLarge { bits: 65536, limit: 65535 })
        ));
        assert!(matches!(
            tree_size_header(101, 100),
            Err(HuffmanError::TreeTooLarge { bits: 101, limit: 100 })
        ));
    }

    #[test]
    fn test_oversized_synthetic_tree() {
        // 6554 leaves: 6553 + 6554 * 9 = 65539 bits
        let tree = synthetic_tree(6554);
        let len = serialized_len(&tree);
        assert_eq!(len, serialize(&tree).len());
        assert!(len > 65535);
        assert!(matches!(
            tree_size_header(len, u16::MAX),
            Err(HuffmanError::TreeTooLarge { .. })
        ));

        let tree = synthetic_tree(6553);
        assert_eq!(tree_size_header(serialized_len(&tree), u16::MAX).unwrap(), 65529);
    }
}
