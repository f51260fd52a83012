//! 21-bit indices packed three to a 64-bit word.
//!
//! Used for material texture slots and per-sphere material assignments,
//! where indices are small and density matters more than access cost.

use thiserror::Error;

/// Bits per packed value.
pub const PACKED_BITS: u32 = 21;

/// Largest value a slot can hold.
pub const PACKED_MAX: u32 = (1 << PACKED_BITS) - 1;

/// Values per 64-bit word.
pub const PACKED_PER_WORD: usize = 3;

/// Returned by [`unpack21x3`] for offsets past the end of the word.
pub const INVALID_INDEX: u32 = u32::MAX;

const MASK: u64 = PACKED_MAX as u64;

/// Errors from writing packed values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    #[error("offset {offset} is out of range (limit {limit})")]
    OffsetOutOfRange { offset: usize, limit: usize },

    #[error("value {0} does not fit in 21 bits")]
    ValueTooLarge(u32),
}

/// Read slot `offset` of `word`, or [`INVALID_INDEX`] if `offset >= 3`.
#[inline]
pub fn unpack21x3(word: u64, offset: usize) -> u32 {
    if offset >= PACKED_PER_WORD {
        return INVALID_INDEX;
    }
    ((word >> (offset as u32 * PACKED_BITS)) & MASK) as u32
}

/// Overwrite slot `offset` of `word` with `value`, leaving the others intact.
pub fn pack21x3(word: &mut u64, offset: usize, value: u32) -> Result<(), PackError> {
    if offset >= PACKED_PER_WORD {
        return Err(PackError::OffsetOutOfRange {
            offset,
            limit: PACKED_PER_WORD,
        });
    }
    if value > PACKED_MAX {
        return Err(PackError::ValueTooLarge(value));
    }

    let shift = offset as u32 * PACKED_BITS;
    *word = (*word & !(MASK << shift)) | ((value as u64) << shift);
    Ok(())
}

/// A growable list of 21-bit values stored three per word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedIndices {
    words: Vec<u64>,
    len: usize,
}

impl PackedIndices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: Vec::with_capacity(capacity.div_ceil(PACKED_PER_WORD)),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Backing words, for inspection.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn push(&mut self, value: u32) -> Result<(), PackError> {
        if value > PACKED_MAX {
            return Err(PackError::ValueTooLarge(value));
        }
        if self.len % PACKED_PER_WORD == 0 {
            self.words.push(0);
        }
        self.len += 1;
        self.set(self.len - 1, value)
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        if index >= self.len {
            return None;
        }
        Some(unpack21x3(
            self.words[index / PACKED_PER_WORD],
            index % PACKED_PER_WORD,
        ))
    }

    pub fn set(&mut self, index: usize, value: u32) -> Result<(), PackError> {
        if index >= self.len {
            return Err(PackError::OffsetOutOfRange {
                offset: index,
                limit: self.len,
            });
        }
        pack21x3(
            &mut self.words[index / PACKED_PER_WORD],
            index % PACKED_PER_WORD,
            value,
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len)
            .map(|i| unpack21x3(self.words[i / PACKED_PER_WORD], i % PACKED_PER_WORD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_slots() {
        let mut word = 0u64;
        for (offset, value) in [(0, 0), (1, 1), (2, PACKED_MAX)] {
            pack21x3(&mut word, offset, value).unwrap();
        }

        assert_eq!(unpack21x3(word, 0), 0);
        assert_eq!(unpack21x3(word, 1), 1);
        assert_eq!(unpack21x3(word, 2), PACKED_MAX);
    }

    #[test]
    fn test_pack_keeps_neighbours() {
        let mut word = u64::MAX;
        pack21x3(&mut word, 1, 12345).unwrap();

        assert_eq!(unpack21x3(word, 0), PACKED_MAX);
        assert_eq!(unpack21x3(word, 1), 12345);
        assert_eq!(unpack21x3(word, 2), PACKED_MAX);
        // The spare top bit is untouched
        assert_eq!(word >> 63, 1);
    }

    #[test]
    fn test_pack_round_trip_bit_patterns() {
        let values = [0, 1, 2, 0x15_5555, 0x0A_AAAA, 1 << 20, PACKED_MAX - 1, PACKED_MAX];
        for offset in 0..PACKED_PER_WORD {
            for value in values {
                let mut word = 0x5A5A_5A5A_5A5A_5A5A;
                pack21x3(&mut word, offset, value).unwrap();
                assert_eq!(unpack21x3(word, offset), value);
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        let mut word = 0u64;

        assert_eq!(unpack21x3(word, 3), INVALID_INDEX);
        assert_eq!(
            pack21x3(&mut word, 3, 1),
            Err(PackError::OffsetOutOfRange { offset: 3, limit: 3 })
        );
        assert_eq!(
            pack21x3(&mut word, 0, PACKED_MAX + 1),
            Err(PackError::ValueTooLarge(PACKED_MAX + 1))
        );
        assert_eq!(word, 0);
    }

    #[test]
    fn test_packed_indices() {
        let mut indices = PackedIndices::with_capacity(7);
        for i in 0..7u32 {
            indices.push(i * 1000).unwrap();
        }

        assert_eq!(indices.len(), 7);
        assert_eq!(indices.words().len(), 3);
        assert_eq!(indices.get(4), Some(4000));
        assert_eq!(indices.get(7), None);
        assert_eq!(indices.iter().collect::<Vec<_>>(), (0..7).map(|i| i * 1000).collect::<Vec<_>>());

        indices.set(6, 42).unwrap();
        assert_eq!(indices.get(6), Some(42));
        assert!(indices.set(7, 1).is_err());
        assert!(indices.push(PACKED_MAX + 1).is_err());
        assert_eq!(indices.len(), 7);
    }
}
