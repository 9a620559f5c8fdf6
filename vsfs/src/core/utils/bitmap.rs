// SPDX-License-Identifier: MIT

//! Bitmap operations trait for efficient bit manipulation.
//!
//! Provides a unified interface for setting, getting, counting and searching
//! bits in byte slices used as allocation bitmaps.

/// Extension trait for bitmap operations on byte slices.
///
/// All operations use little-endian bit ordering within bytes:
/// - Bit 0 is the LSB of byte 0
/// - Bit 7 is the MSB of byte 0
/// - Bit 8 is the LSB of byte 1, etc.
pub trait BitmapOps {
    /// Sets or clears a bit at the given position.
    ///
    /// Does nothing if `bit` is out of bounds.
    fn set_bit(&mut self, bit: usize, value: bool);

    /// Gets the value of a bit at the given position.
    ///
    /// Returns `false` if `bit` is out of bounds.
    fn get_bit(&self, bit: usize) -> bool;

    /// Counts the number of set bits in the given range `[start, end)`.
    fn count_ones_in_range(&self, start: usize, end: usize) -> usize;

    /// Finds the lowest zero bit strictly below `limit`.
    fn find_first_zero_below(&self, limit: usize) -> Option<usize>;

    /// Collects the `count` lowest zero bits strictly below `limit`, ascending.
    ///
    /// Returns `None` if fewer than `count` zero bits exist.
    fn find_zeros_below(&self, limit: usize, count: usize) -> Option<Vec<usize>>;

    /// Counts the total number of set bits in the entire bitmap.
    fn count_ones(&self) -> usize;
}

impl BitmapOps for [u8] {
    #[inline]
    fn set_bit(&mut self, bit: usize, value: bool) {
        if let Some(byte) = self.get_mut(bit / 8) {
            let mask = 1u8 << (bit % 8);
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    #[inline]
    fn get_bit(&self, bit: usize) -> bool {
        self.get(bit / 8)
            .is_some_and(|b| (b & (1 << (bit % 8))) != 0)
    }

    fn count_ones_in_range(&self, start: usize, end: usize) -> usize {
        (start..end).filter(|&i| self.get_bit(i)).count()
    }

    fn find_first_zero_below(&self, limit: usize) -> Option<usize> {
        let limit = limit.min(self.len() * 8);

        for (byte_idx, &byte) in self.iter().enumerate() {
            let base = byte_idx * 8;
            if base >= limit {
                return None;
            }
            if byte == 0xFF {
                continue;
            }
            let bit = (!byte).trailing_zeros() as usize;
            return (base + bit < limit).then_some(base + bit);
        }
        None
    }

    fn find_zeros_below(&self, limit: usize, count: usize) -> Option<Vec<usize>> {
        let limit = limit.min(self.len() * 8);
        let mut found = Vec::with_capacity(count);

        for bit in 0..limit {
            if found.len() == count {
                break;
            }
            if !self.get_bit(bit) {
                found.push(bit);
            }
        }

        (found.len() == count).then_some(found)
    }

    fn count_ones(&self) -> usize {
        self.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_bit() {
        let mut bitmap = [0u8; 4];

        bitmap.set_bit(0, true);
        assert!(bitmap.get_bit(0));
        assert_eq!(bitmap[0], 0b00000001);

        bitmap.set_bit(7, true);
        assert_eq!(bitmap[0], 0b10000001);

        // First bit of the second byte
        bitmap.set_bit(8, true);
        assert_eq!(bitmap[1], 0b00000001);

        bitmap.set_bit(0, false);
        assert!(!bitmap.get_bit(0));
        assert_eq!(bitmap[0], 0b10000000);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut bitmap = [0u8; 2];
        bitmap.set_bit(100, true);
        assert_eq!(bitmap, [0, 0]);
        assert!(!bitmap.get_bit(100));
    }

    #[test]
    fn test_count_ones() {
        let bitmap = [0b10101010u8, 0b11110000, 0b00001111];
        assert_eq!(bitmap.count_ones(), 12);
        assert_eq!(bitmap.count_ones_in_range(0, 8), 4);
        assert_eq!(bitmap.count_ones_in_range(4, 12), 4);
    }

    #[test]
    fn test_find_first_zero_below() {
        let bitmap = [0b11111111u8, 0b11111110, 0b00000000];
        assert_eq!(bitmap.find_first_zero_below(24), Some(8));

        // Bits 0 and 1 taken: lowest free is 2
        let bitmap = [0b00000011u8];
        assert_eq!(bitmap.find_first_zero_below(8), Some(2));

        let bitmap = [0xFFu8, 0b00000111];
        assert_eq!(bitmap.find_first_zero_below(11), None);
        assert_eq!(bitmap.find_first_zero_below(12), Some(11));
    }

    #[test]
    fn test_find_first_zero_below_full() {
        let bitmap = [0xFFu8; 4];
        assert_eq!(bitmap.find_first_zero_below(32), None);
        assert_eq!(bitmap.find_first_zero_below(1000), None);
    }

    #[test]
    fn test_find_zeros_below() {
        let bitmap = [0b00100101u8, 0x00];
        assert_eq!(bitmap.find_zeros_below(16, 3), Some(vec![1, 3, 4]));
        assert_eq!(bitmap.find_zeros_below(16, 0), Some(vec![]));
        assert_eq!(bitmap.find_zeros_below(4, 3), None);
        assert_eq!(bitmap.find_zeros_below(5, 2), Some(vec![1, 3]));
    }
}
