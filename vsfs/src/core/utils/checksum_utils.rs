// SPDX-License-Identifier: MIT

//! CRC-32 and XOR checksum helpers shared by the on-disk structures.

/// Standard reflected CRC-32 (polynomial 0xEDB88320, init and final xor 0xFFFFFFFF).
#[inline]
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC-32 of `data` as if it were the first bytes of a zero-padded block of
/// `block_size` bytes, covering only the first `covered` bytes of that block.
pub fn crc32_of_block(data: &[u8], block_size: usize, covered: usize) -> u32 {
    let covered = covered.min(block_size);
    let head = data.len().min(covered);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&data[..head]);

    const ZEROS: [u8; 256] = [0u8; 256];
    let mut remaining = covered - head;
    while remaining > 0 {
        let chunk = remaining.min(ZEROS.len());
        hasher.update(&ZEROS[..chunk]);
        remaining -= chunk;
    }
    hasher.finalize()
}

/// XOR of all bytes.
#[inline]
pub fn xor8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn test_crc32_of_block_matches_padded_buffer() {
        let data = [0xABu8; 116];
        let mut block = [0u8; 4096];
        block[..116].copy_from_slice(&data);

        assert_eq!(crc32_of_block(&data, 4096, 4092), crc32(&block[..4092]));
    }

    #[test]
    fn test_xor8() {
        assert_eq!(xor8(&[]), 0);
        assert_eq!(xor8(&[0x0F, 0xF0]), 0xFF);
        assert_eq!(xor8(&[0x55, 0x55]), 0);
    }
}
