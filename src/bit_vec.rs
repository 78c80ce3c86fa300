use std::ops::Range;

/// A logical sequence of bits, stored most-significant-bit first.
///
/// The length is exact; bits past `bit_count` in the last byte are always zero.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

/// Bits packed into whole bytes, remembering how many filler bits were added.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    pub bytes: Vec<u8>,
    pub padding: u8,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            // set bit with OR  and mask
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Appends the low `width` bits of `value`, high bit first.
    pub fn push_bits(&mut self, value: u32, width: usize) {
        debug_assert!(width <= 32);
        for bit_pos in (0..width).rev() {
            let bit = (value >> bit_pos) & 1;
            self.push_bit(bit != 0);
        }
    }

    pub fn extend_from(&mut self, other: &BitVec) {
        if self.bit_count % 8 == 0 {
            // byte aligned, copy whole bytes
            self.bits.truncate(self.bit_count / 8);
            self.bits.extend_from_slice(&other.bits);
            self.bit_count += other.bit_count;
        } else {
            for bit in other.iter() {
                self.push_bit(bit);
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some(self.bits[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    /// Reads `width` bits starting at `start` as a big-endian integer.
    ///
    /// Returns `None` if the range runs past the end.
    pub fn read_bits(&self, start: usize, width: usize) -> Option<u32> {
        debug_assert!(width <= 32);
        if start.checked_add(width)? > self.bit_count {
            return None;
        }
        let mut value = 0u32;
        for index in start..start + width {
            let bit = self.bits[index / 8] & (1 << (7 - index % 8)) != 0;
            value = (value << 1) | bit as u32;
        }
        Some(value)
    }

    pub fn truncate(&mut self, len: usize) {
        if len >= self.bit_count {
            return;
        }
        self.bits.truncate(len.div_ceil(8));
        let tail = len % 8;
        if tail != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last &= 0xFF << (8 - tail);
            }
        }
        self.bit_count = len;
    }

    /// Copies a sub-range of bits into a new vector.
    pub fn slice(&self, range: Range<usize>) -> BitVec {
        let end = range.end.min(self.bit_count);
        let start = range.start.min(end);
        let mut out = BitVec::with_capacity(end - start);
        for index in start..end {
            out.push_bit(self.bits[index / 8] & (1 << (7 - index % 8)) != 0);
        }
        out
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { vec: self, index: 0 }
    }

    /// Groups the bits into bytes, zero-filling the last partial byte.
    pub fn pack(&self) -> PackedBits {
        let padding = ((8 - self.bit_count % 8) % 8) as u8;
        PackedBits {
            bytes: self.bits.clone(),
            padding,
        }
    }

    /// Expands bytes into bits, eight per byte. Padding is kept.
    pub fn unpack(bytes: &[u8]) -> Self {
        BitVec::from((bytes.len() * 8, bytes.to_vec()))
    }
}

impl From<(usize, Vec<u8>)> for BitVec {
    fn from((bit_count, bits): (usize, Vec<u8>)) -> Self {
        let available = bits.len() * 8;
        let mut vec = BitVec { bits, bit_count: available };
        // clear anything past bit_count so equality and packing stay exact
        vec.truncate(bit_count);
        vec
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut vec = BitVec::new();
        for bit in iter {
            vec.push_bit(bit);
        }
        vec
    }
}

pub struct Iter<'a> {
    vec: &'a BitVec,
    index: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.vec.get(self.index)?;
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vec.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl PackedBits {
    /// Logical bit count: every byte minus the filler bits.
    pub fn bit_len(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.padding as usize)
    }

    /// Back to a logical sequence with the filler bits stripped.
    pub fn into_bits(self) -> BitVec {
        let len = self.bit_len();
        BitVec::from((len, self.bytes))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bits(s: &str) -> BitVec {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_push_and_read() {
        let mut vec = BitVec::new();
        vec.push_bits(0b101, 3);
        vec.push_bits(0xABCD, 16);
        assert_eq!(vec.len(), 19);
        assert_eq!(vec.read_bits(0, 3), Some(0b101));
        assert_eq!(vec.read_bits(3, 16), Some(0xABCD));
        assert_eq!(vec.read_bits(10, 10), None);
        assert_eq!(vec.get(0), Some(true));
        assert_eq!(vec.get(1), Some(false));
        assert_eq!(vec.get(19), None);
    }

    #[test]
    fn test_pack_is_msb_first_with_padding() {
        let packed = bits("1011").pack();
        assert_eq!(packed.bytes, vec![0b1011_0000]);
        assert_eq!(packed.padding, 4);

        let packed = bits("10000001").pack();
        assert_eq!(packed.bytes, vec![0x81]);
        assert_eq!(packed.padding, 0);

        let packed = BitVec::new().pack();
        assert!(packed.bytes.is_empty());
        assert_eq!(packed.padding, 0);
    }

    #[test]
    fn test_unpack_keeps_padding() {
        let vec = BitVec::unpack(&[0b1011_0000, 0x01]);
        assert_eq!(vec.len(), 16);
        assert_eq!(vec, bits("1011000000000001"));
    }

    #[test]
    fn test_packed_into_bits_strips_padding() {
        let original = bits("110100111");
        let packed = original.pack();
        assert_eq!(packed.padding, 7);
        assert_eq!(packed.bit_len(), 9);
        assert_eq!(packed.into_bits(), original);
    }

    #[test]
    fn test_extend_unaligned_and_aligned() {
        let mut vec = bits("101");
        vec.extend_from(&bits("0110"));
        assert_eq!(vec, bits("1010110"));

        let mut vec = bits("11110000");
        vec.extend_from(&bits("101"));
        assert_eq!(vec, bits("11110000101"));
    }

    #[test]
    fn test_truncate_and_slice() {
        let mut vec = bits("1111111111");
        vec.truncate(5);
        assert_eq!(vec, bits("11111"));
        assert_eq!(vec.pack().bytes, vec![0b1111_1000]);

        let vec = bits("0011010");
        assert_eq!(vec.slice(2..5), bits("110"));
        assert_eq!(vec.slice(5..20), bits("10"));
    }

    #[test]
    fn test_from_tuple_clears_tail() {
        let vec = BitVec::from((3, vec![0xFF]));
        assert_eq!(vec, bits("111"));
        assert_eq!(vec.iter().len(), 3);
    }
}
