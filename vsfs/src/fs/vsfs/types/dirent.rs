// SPDX-License-Identifier: MIT

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::core::errors::{FsParsingError, FsParsingResult};
use crate::core::utils::{checksum_utils::xor8, path_utils::decode_name, path_utils::encode_name};
use crate::fs::vsfs::constant::*;

/// 64-byte directory record. `inode_no == 0` marks a free slot.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct VsfsDirEntry {
    pub inode_no: U32,
    pub entry_type: u8,
    pub name: [u8; VSFS_NAME_LEN],
    pub checksum: u8,
}

const _: () = assert!(size_of::<VsfsDirEntry>() == VSFS_DIRENT_SIZE);

impl Default for VsfsDirEntry {
    fn default() -> Self {
        Self {
            inode_no: U32::new(0),
            entry_type: 0,
            name: [0u8; VSFS_NAME_LEN],
            checksum: 0,
        }
    }
}

impl VsfsDirEntry {
    /// Entry with `name` truncated to the field width. The checksum is finalized.
    pub fn new(inode_no: u32, entry_type: u8, name: &str) -> Self {
        let mut entry = Self {
            inode_no: U32::new(inode_no),
            entry_type,
            name: encode_name::<VSFS_NAME_LEN>(name),
            checksum: 0,
        };
        entry.finalize_checksum();
        entry
    }

    pub fn dot(inode_no: u32) -> Self {
        Self::new(inode_no, VSFS_DT_DIR, VSFS_DOT)
    }

    pub fn dotdot(inode_no: u32) -> Self {
        Self::new(inode_no, VSFS_DT_DIR, VSFS_DOTDOT)
    }

    pub fn file(inode_no: u32, name: &str) -> Self {
        Self::new(inode_no, VSFS_DT_FILE, name)
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.inode_no.get() == 0
    }

    pub fn name_lossy(&self) -> String {
        decode_name(&self.name)
    }

    pub fn to_bytes(&self) -> [u8; VSFS_DIRENT_SIZE] {
        let mut out = [0u8; VSFS_DIRENT_SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> FsParsingResult<Self> {
        let raw = bytes
            .get(..VSFS_DIRENT_SIZE)
            .ok_or(FsParsingError::Corrupted("directory entry truncated"))?;
        Self::read_from_bytes(raw)
            .map_err(|_| FsParsingError::Corrupted("directory entry truncated"))
    }

    /// XOR of the 63 bytes before the checksum byte.
    pub fn compute_checksum(&self) -> u8 {
        xor8(&self.as_bytes()[..VSFS_DIRENT_SIZE - 1])
    }

    pub fn finalize_checksum(&mut self) {
        self.checksum = self.compute_checksum();
    }

    pub fn verify_checksum(&self) -> FsParsingResult {
        let computed = self.compute_checksum();
        if self.checksum != computed {
            return Err(FsParsingError::BadChecksum {
                stored: self.checksum as u32,
                computed: computed as u32,
            });
        }
        Ok(())
    }
}

/// Iterates over the records of one directory block.
pub fn dir_entries(block: &[u8]) -> impl Iterator<Item = (usize, VsfsDirEntry)> + '_ {
    block
        .chunks_exact(VSFS_DIRENT_SIZE)
        .enumerate()
        .filter_map(|(slot, raw)| VsfsDirEntry::from_bytes(raw).ok().map(|e| (slot, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirent_layout() {
        let entry = VsfsDirEntry::file(2, "hello.txt");
        let raw = entry.to_bytes();

        assert_eq!(&raw[0..4], &2u32.to_le_bytes());
        assert_eq!(raw[4], VSFS_DT_FILE);
        assert_eq!(&raw[5..14], b"hello.txt");
        assert!(raw[14..63].iter().all(|&b| b == 0));
        assert_eq!(raw[63], xor8(&raw[..63]));
    }

    #[test]
    fn test_dirent_checksum() {
        let mut entry = VsfsDirEntry::dot(1);
        let sum = entry.checksum;
        // 0x01 ^ 0x02 ^ '.'
        assert_eq!(sum, 0x01 ^ 0x02 ^ b'.');

        entry.finalize_checksum();
        assert_eq!(entry.checksum, sum);
        assert!(entry.verify_checksum().is_ok());

        entry.name[1] = b'x';
        assert!(entry.verify_checksum().is_err());
    }

    #[test]
    fn test_dirent_full_width_name() {
        let name = "n".repeat(80);
        let entry = VsfsDirEntry::file(5, &name);
        assert_eq!(entry.name_lossy(), "n".repeat(VSFS_NAME_LEN));
        assert!(entry.verify_checksum().is_ok());
    }

    #[test]
    fn test_dir_entries_iterates_block() {
        let mut block = vec![0u8; VSFS_BLOCK_SIZE];
        block[..64].copy_from_slice(&VsfsDirEntry::dot(1).to_bytes());
        block[128..192].copy_from_slice(&VsfsDirEntry::file(4, "a").to_bytes());

        let live: Vec<_> = dir_entries(&block)
            .filter(|(_, e)| !e.is_free())
            .map(|(slot, e)| (slot, e.inode_no.get()))
            .collect();
        assert_eq!(live, vec![(0, 1), (2, 4)]);
        assert_eq!(dir_entries(&block).count(), VSFS_DIRENTS_PER_BLOCK);
    }
}
