// SPDX-License-Identifier: MIT

use zerocopy::byteorder::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::core::errors::{FsParsingError, FsParsingResult};
use crate::core::utils::checksum_utils::crc32;
use crate::fs::vsfs::constant::*;

/// One slot of the inode table.
///
/// `direct` holds block indices relative to the data region. Slots past the
/// file's block count stay zero; relative index 0 is a valid block, so only
/// the data bitmap says whether a pointer is live.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct VsfsInode {
    pub mode: U16,
    pub links: U16,
    pub uid: U32,
    pub gid: U32,
    pub size_bytes: U64,
    pub atime: U64,
    pub mtime: U64,
    pub ctime: U64,
    pub direct: [U32; VSFS_DIRECT_POINTERS],
    pub reserved_0: U32,
    pub reserved_1: U32,
    pub reserved_2: U32,
    pub proj_id: U32,
    pub uid16_gid16: U32,
    pub xattr_ptr: U64,
    pub checksum: U64,
}

const _: () = assert!(size_of::<VsfsInode>() == VSFS_INODE_SIZE);

impl Default for VsfsInode {
    fn default() -> Self {
        Self {
            mode: U16::new(0),
            links: U16::new(0),
            uid: U32::new(0),
            gid: U32::new(0),
            size_bytes: U64::new(0),
            atime: U64::new(0),
            mtime: U64::new(0),
            ctime: U64::new(0),
            direct: [U32::new(0); VSFS_DIRECT_POINTERS],
            reserved_0: U32::new(0),
            reserved_1: U32::new(0),
            reserved_2: U32::new(0),
            proj_id: U32::new(0),
            uid16_gid16: U32::new(0),
            xattr_ptr: U64::new(0),
            checksum: U64::new(0),
        }
    }
}

impl VsfsInode {
    /// Root directory inode holding "." and ".." in relative block `block`.
    pub fn root_dir(block: u32, now: u64) -> Self {
        let mut inode = Self {
            mode: U16::new(VSFS_MODE_DIR),
            links: U16::new(2),
            size_bytes: U64::new(2 * VSFS_DIRENT_SIZE as u64),
            ..Self::default()
        };
        inode.set_times(now);
        inode.direct[0].set(block);
        inode
    }

    /// Regular file inode spanning `blocks`, in order.
    pub fn file(size_bytes: u64, blocks: &[u32], now: u64) -> Self {
        let mut inode = Self {
            mode: U16::new(VSFS_MODE_FILE),
            links: U16::new(1),
            size_bytes: U64::new(size_bytes),
            ..Self::default()
        };
        inode.set_times(now);
        for (slot, &block) in inode.direct.iter_mut().zip(blocks) {
            slot.set(block);
        }
        inode
    }

    fn set_times(&mut self, now: u64) {
        self.atime.set(now);
        self.mtime.set(now);
        self.ctime.set(now);
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.mode.get() == VSFS_MODE_DIR
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.mode.get() == VSFS_MODE_FILE
    }

    /// Number of direct slots a file of this size occupies.
    pub fn block_count(&self) -> usize {
        let blocks = self.size_bytes.get().div_ceil(VSFS_BLOCK_SIZE as u64).max(1);
        (blocks as usize).min(VSFS_DIRECT_POINTERS)
    }

    /// Live direct pointers, in file order.
    pub fn blocks(&self) -> impl Iterator<Item = u32> + '_ {
        self.direct[..self.block_count()].iter().map(|p| p.get())
    }

    pub fn to_bytes(&self) -> [u8; VSFS_INODE_SIZE] {
        let mut out = [0u8; VSFS_INODE_SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> FsParsingResult<Self> {
        let raw = bytes
            .get(..VSFS_INODE_SIZE)
            .ok_or(FsParsingError::Corrupted("inode truncated"))?;
        Self::read_from_bytes(raw).map_err(|_| FsParsingError::Corrupted("inode truncated"))
    }

    /// CRC-32 of the first 120 bytes, zero-extended.
    pub fn compute_checksum(&self) -> u64 {
        crc32(&self.as_bytes()[..VSFS_INODE_CRC_SPAN]) as u64
    }

    pub fn finalize_checksum(&mut self) {
        self.checksum.set(self.compute_checksum());
    }

    pub fn verify_checksum(&self) -> FsParsingResult {
        let stored = self.checksum.get();
        let computed = self.compute_checksum();
        if stored != computed {
            return Err(FsParsingError::BadChecksum {
                stored: stored as u32,
                computed: computed as u32,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inode_layout() {
        let mut inode = VsfsInode::file(5000, &[3, 9], 42);
        inode.finalize_checksum();
        let raw = inode.to_bytes();

        assert_eq!(&raw[0..2], &VSFS_MODE_FILE.to_le_bytes());
        assert_eq!(&raw[2..4], &1u16.to_le_bytes());
        assert_eq!(&raw[12..20], &5000u64.to_le_bytes());
        assert_eq!(&raw[44..48], &3u32.to_le_bytes());
        assert_eq!(&raw[48..52], &9u32.to_le_bytes());
        assert!(raw[52..92].iter().all(|&b| b == 0));
        assert_eq!(&raw[120..124], &inode.checksum.get().to_le_bytes()[..4]);
        assert_eq!(&raw[124..128], &[0u8; 4]);
    }

    #[test]
    fn test_inode_checksum_ignores_trailing_field() {
        let mut inode = VsfsInode::root_dir(0, 7);
        inode.finalize_checksum();
        let sum = inode.checksum.get();

        assert_eq!(sum, crc32(&inode.to_bytes()[..120]) as u64);
        assert!(sum <= u32::MAX as u64);

        inode.finalize_checksum();
        assert_eq!(inode.checksum.get(), sum);
        assert!(inode.verify_checksum().is_ok());

        inode.links.set(3);
        assert!(inode.verify_checksum().is_err());
    }

    #[test]
    fn test_root_dir_inode() {
        let inode = VsfsInode::root_dir(0, 11);
        assert!(inode.is_dir());
        assert_eq!(inode.links.get(), 2);
        assert_eq!(inode.size_bytes.get(), 128);
        assert_eq!(inode.atime.get(), 11);
        assert_eq!(inode.ctime.get(), 11);
        assert_eq!(inode.blocks().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_block_count() {
        assert_eq!(VsfsInode::file(0, &[4], 0).block_count(), 1);
        assert_eq!(VsfsInode::file(4096, &[4], 0).block_count(), 1);
        assert_eq!(VsfsInode::file(4097, &[4, 5], 0).block_count(), 2);
        assert_eq!(
            VsfsInode::file(5000, &[8, 2], 0).blocks().collect::<Vec<_>>(),
            vec![8, 2]
        );
    }
}
