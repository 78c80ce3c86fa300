//! # rust_huffman
//!
//! A lossless Huffman codec for in-memory byte buffers.
//!
//! Each compressed buffer carries its own decoding tree, so nothing besides
//! the returned bytes is needed to restore the input. Inputs that would not
//! shrink are stored as-is behind a single flag byte.
//!
//! ## Quick Start
//!
//! ```rust
//! let text = b"abracadabra abracadabra abracadabra abracadabra";
//!
//! let compressed = rust_huffman::compress(text)?;
//! assert!(compressed.len() < text.len());
//!
//! let restored = rust_huffman::decompress(&compressed)?;
//! assert_eq!(restored, text);
//! # Ok::<(), rust_huffman::HuffmanError>(())
//! ```

pub mod bit_vec;
pub mod config;
pub mod error;
pub mod frame;
pub mod huffman_codec;
pub mod hufftree;
pub mod tree_codec;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_vec::{BitVec, PackedBits};
pub use config::CodecConfig;
pub use error::{HuffmanError, Result};
pub use frame::{FrameInfo, FrameMode};
pub use huffman_codec::HuffmanCodec;
pub use hufftree::{FrequencyTable, HuffNode, HuffmanTree};

/// Compresses `data` with the default configuration.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().compress(data)
}

/// Restores a buffer produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().decompress(data)
}

/// Reports the layout of a frame without decoding it.
pub fn inspect(data: &[u8]) -> Result<FrameInfo> {
    frame::inspect(data)
}
