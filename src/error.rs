//! Error type shared by every stage of the codec.

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Errors produced while compressing or decompressing a frame.
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// The serialized tree does not fit the 16-bit size header.
    #[error("serialized tree is {bits} bits, limit is {limit}")]
    TreeTooLarge {
        /// Bits the serialized tree would occupy
        bits: usize,
        /// Largest tree size the header may carry
        limit: usize,
    },

    /// The tree region of a frame could not be rebuilt.
    #[error("malformed tree at bit {position}: {reason}")]
    MalformedTree {
        /// Bit offset inside the tree region
        position: usize,
        /// What was wrong
        reason: String,
    },

    /// The frame layout or the data region does not agree with the tree.
    #[error("corrupt stream: {reason}")]
    CorruptStream {
        /// What was wrong
        reason: String,
    },

    /// An internal invariant was violated.
    #[error("logic error: {reason}")]
    LogicError {
        /// The violated invariant
        reason: String,
    },

    /// The tree builder misused its heap.
    #[error("heap error: {0}")]
    HeapError(#[from] HeapErr),
}

impl HuffmanError {
    pub fn malformed<S: Into<String>>(position: usize, reason: S) -> Self {
        Self::MalformedTree { position, reason: reason.into() }
    }

    pub fn corrupt<S: Into<String>>(reason: S) -> Self {
        Self::CorruptStream { reason: reason.into() }
    }

    pub fn logic<S: Into<String>>(reason: S) -> Self {
        Self::LogicError { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        let err = HuffmanError::TreeTooLarge { bits: 70000, limit: 65535 };
        assert_eq!(err.to_string(), "serialized tree is 70000 bits, limit is 65535");

        let err = HuffmanError::malformed(12, "missing symbol bits");
        assert_eq!(err.to_string(), "malformed tree at bit 12: missing symbol bits");

        let err: HuffmanError = HeapErr::HeapUnderflow.into();
        assert_eq!(err.to_string(), "heap error: extract from empty heap");
        assert!(matches!(err, HuffmanError::HeapError(HeapErr::HeapUnderflow)));
    }
}
