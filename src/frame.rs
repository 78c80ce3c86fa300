//! Wire layout of a compressed or stored buffer.
//!
//! ```text
//! stored:      [original bytes][0x00]
//! compressed:  [tree size: 16 bits][tree][data][0..7 zero bits][pad << 4 | 0b0001]
//! ```
//!
//! The final bit of every non-empty frame tells the two forms apart.

use crate::bit_vec::{BitVec, PackedBits};
use crate::error::{HuffmanError, Result};
use crate::tree_codec::{tree_size_header, TREE_SIZE_BITS};

pub const STORED_FLAG: u8 = 0b0000;
pub const COMPRESSED_FLAG: u8 = 0b0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    Empty,
    Stored,
    Compressed,
}

/// The bit regions of a compressed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFrame {
    pub tree_bits: BitVec,
    pub data_bits: BitVec,
}

/// A frame split into its parts, borrowing stored payloads from the input.
#[derive(Debug)]
pub enum Frame<'a> {
    Empty,
    Stored(&'a [u8]),
    Compressed(CompressedFrame),
}

/// Layout summary of a frame, read without decoding any symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub mode: FrameMode,
    /// Total frame length in bytes, trailer included
    pub frame_len: usize,
    pub tree_bits: usize,
    pub data_bits: usize,
    /// Zero bits filling the byte before the trailer
    pub padding: u8,
}

impl CompressedFrame {
    pub fn bit_len(&self) -> usize {
        TREE_SIZE_BITS + self.tree_bits.len() + self.data_bits.len()
    }

    /// Packs header, tree and data into bytes and appends the trailer.
    pub fn serialize(&self, tree_bits_limit: u16) -> Result<Vec<u8>> {
        let tree_size = tree_size_header(self.tree_bits.len(), tree_bits_limit)?;

        let mut bits = BitVec::with_capacity(self.bit_len());
        bits.push_bits(tree_size as u32, TREE_SIZE_BITS);
        bits.extend_from(&self.tree_bits);
        bits.extend_from(&self.data_bits);

        let PackedBits { mut bytes, padding } = bits.pack();
        bytes.push((padding << 4) | COMPRESSED_FLAG);
        Ok(bytes)
    }

    /// Splits a frame whose trailer carries the compressed flag.
    pub fn deserialize(bytes: &[u8]) -> Result<CompressedFrame> {
        let (&trailer, body) = bytes
            .split_last()
            .ok_or_else(|| HuffmanError::corrupt("missing trailer byte"))?;
        if trailer & 1 != 1 {
            return Err(HuffmanError::corrupt("trailer does not carry the compressed flag"));
        }

        let padding = trailer >> 4;
        if padding > 7 {
            return Err(HuffmanError::corrupt(format!("padding count {} out of range", padding)));
        }
        if body.is_empty() && padding > 0 {
            return Err(HuffmanError::corrupt("padding declared without a body"));
        }

        let bits = PackedBits { bytes: body.to_vec(), padding }.into_bits();

        let tree_size = bits
            .read_bits(0, TREE_SIZE_BITS)
            .ok_or_else(|| HuffmanError::corrupt("frame shorter than the tree-size header"))?
            as usize;
        let tree_end = TREE_SIZE_BITS + tree_size;
        if tree_end > bits.len() {
            return Err(HuffmanError::corrupt(format!(
                "tree of {} bits overruns a {}-bit frame",
                tree_size,
                bits.len()
            )));
        }

        Ok(CompressedFrame {
            tree_bits: bits.slice(TREE_SIZE_BITS..tree_end),
            data_bits: bits.slice(tree_end..bits.len()),
        })
    }
}

/// The original bytes followed by the stored flag byte.
pub fn write_stored(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 1);
    out.extend_from_slice(data);
    out.push(STORED_FLAG);
    out
}

pub fn read_frame(bytes: &[u8]) -> Result<Frame<'_>> {
    match bytes.split_last() {
        None => Ok(Frame::Empty),
        Some((&trailer, body)) if trailer & 1 == 0 => Ok(Frame::Stored(body)),
        Some(_) => CompressedFrame::deserialize(bytes).map(Frame::Compressed),
    }
}

pub fn inspect(bytes: &[u8]) -> Result<FrameInfo> {
    let info = match read_frame(bytes)? {
        Frame::Empty => FrameInfo {
            mode: FrameMode::Empty,
            frame_len: 0,
            tree_bits: 0,
            data_bits: 0,
            padding: 0,
        },
        Frame::Stored(body) => FrameInfo {
            mode: FrameMode::Stored,
            frame_len: bytes.len(),
            tree_bits: 0,
            data_bits: body.len() * 8,
            padding: 0,
        },
        Frame::Compressed(frame) => FrameInfo {
            mode: FrameMode::Compressed,
            frame_len: bytes.len(),
            tree_bits: frame.tree_bits.len(),
            data_bits: frame.data_bits.len(),
            padding: bytes[bytes.len() - 1] >> 4,
        },
    };
    Ok(info)
}
