/// Knobs for a [`HuffmanCodec`](crate::HuffmanCodec).
///
/// The defaults produce the standard frame: trees up to the full 16-bit
/// header range, and the stored fallback whenever compression does not pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest serialized tree, in bits, that compress will accept.
    pub tree_bits_limit: u16,
    /// Emit the stored form when the compressed frame is not smaller.
    ///
    /// Only while this is set is the output guaranteed to be at most one byte
    /// longer than the input. With it cleared, every non-empty input gets a
    /// compressed frame, which for tiny or high-entropy input can be larger.
    pub stored_fallback: bool,
}

impl CodecConfig {
    pub fn new() -> Self {
        CodecConfig {
            tree_bits_limit: u16::MAX,
            stored_fallback: true,
        }
    }

    pub fn with_tree_bits_limit(mut self, limit: u16) -> Self {
        self.tree_bits_limit = limit;
        self
    }

    pub fn with_stored_fallback(mut self, enabled: bool) -> Self {
        self.stored_fallback = enabled;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}
