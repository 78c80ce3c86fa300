use crate::bit_vec::BitVec;
use crate::config::CodecConfig;
use crate::error::{HuffmanError, Result};
use crate::frame::{self, CompressedFrame, Frame};
use crate::hufftree::{CodeTable, FrequencyTable, HuffNode, HuffmanTree};
use crate::tree_codec;

/// Compresses and decompresses whole in-memory buffers.
///
/// A codec holds only its configuration; every tree and code table lives for
/// the duration of a single call.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        HuffmanCodec { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes `data` into a frame.
    ///
    /// Empty input gives empty output. When the compressed frame would not be
    /// smaller than `data` (and the stored fallback is enabled), the result is
    /// `data` followed by a single `0x00` flag byte instead.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let frequencies = FrequencyTable::from_bytes(data);
        log::trace!("Byte frequency: {:?}", frequencies);

        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        log::trace!("{}", tree);
        let table = tree.generate_table();

        let tree_bits = tree_codec::serialize(&tree);
        let data_bits = encode_data(data, &tree, &table, &frequencies)?;
        let compressed = CompressedFrame { tree_bits, data_bits }
            .serialize(self.config.tree_bits_limit)?;

        if self.config.stored_fallback && compressed.len() >= data.len() {
            log::debug!(
                "Storing {} bytes uncompressed (compressed frame would be {} bytes)",
                data.len(),
                compressed.len()
            );
            return Ok(frame::write_stored(data));
        }

        log::debug!(
            "Compressed {} bytes to {} ({} distinct symbols)",
            data.len(),
            compressed.len(),
            frequencies.distinct()
        );
        Ok(compressed)
    }

    /// Restores the bytes of a frame produced by [`compress`](Self::compress).
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match frame::read_frame(data)? {
            Frame::Empty => Ok(Vec::new()),
            Frame::Stored(body) => {
                log::debug!("Frame stored, {} bytes", body.len());
                Ok(body.to_vec())
            }
            Frame::Compressed(compressed) => {
                let tree = tree_codec::deserialize_exact(&compressed.tree_bits)?;
                log::trace!("{}", tree);
                let result = decode_data(&tree, &compressed.data_bits)?;
                log::debug!("Decompressed {} bytes to {}", data.len(), result.len());
                Ok(result)
            }
        }
    }
}

/// Concatenates each symbol's code in input order.
///
/// A lone-leaf tree has an empty code, so every occurrence is written as a
/// single `0` bit to keep the count recoverable.
fn encode_data(
    data: &[u8],
    tree: &HuffmanTree,
    table: &CodeTable,
    frequencies: &FrequencyTable,
) -> Result<BitVec> {
    if tree.is_single_leaf() {
        let mut bits = BitVec::with_capacity(data.len());
        for &byte in data {
            if !table.contains_key(&byte) {
                return Err(missing_code(byte));
            }
            bits.push_bit(false);
        }
        return Ok(bits);
    }

    let total: usize = frequencies
        .iter()
        .map(|(byte, count)| count * table.get(&byte).map_or(0, BitVec::len))
        .sum();

    let mut bits = BitVec::with_capacity(total);
    for &byte in data {
        let code = table.get(&byte).ok_or_else(|| missing_code(byte))?;
        bits.extend_from(code);
    }
    Ok(bits)
}

fn missing_code(byte: u8) -> HuffmanError {
    HuffmanError::logic(format!("byte {} not in code table", byte))
}

/// Walks the tree bit by bit, emitting a symbol at every leaf.
fn decode_data(tree: &HuffmanTree, bits: &BitVec) -> Result<Vec<u8>> {
    let root = &tree.root;

    if let HuffNode::Leaf { byte, .. } = root {
        let mut result = Vec::with_capacity(bits.len());
        for (index, bit) in bits.iter().enumerate() {
            if bit {
                return Err(HuffmanError::corrupt(format!(
                    "set bit {} in single-symbol data",
                    index
                )));
            }
            result.push(*byte);
        }
        return Ok(result);
    }

    let mut result = Vec::with_capacity(bits.len() / tree.depth().max(1));
    let mut current = root;
    for bit in bits.iter() {
        if let HuffNode::Internal { left, right, .. } = current {
            current = if bit { right } else { left };
        }
        if let HuffNode::Leaf { byte, .. } = current {
            result.push(*byte);
            current = root;
        }
    }

    if !std::ptr::eq(current, root) {
        return Err(HuffmanError::corrupt("data ends in the middle of a code"));
    }
    Ok(result)
}
