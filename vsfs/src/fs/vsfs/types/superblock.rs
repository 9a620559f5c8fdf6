// SPDX-License-Identifier: MIT

use bitflags::bitflags;
use zerocopy::byteorder::little_endian::{U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::core::errors::{FsParsingError, FsParsingResult};
use crate::core::utils::checksum_utils::crc32_of_block;
use crate::fs::vsfs::{constant::*, meta::VsfsMeta};

bitflags! {
    /// Superblock feature flags. No bit is defined by version 1.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VsfsFlags: u32 {}
}

/// Block 0 header. Fields are little-endian on disk.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct VsfsSuperblock {
    pub magic: U32,
    pub version: U32,
    pub block_size: U32,
    pub total_blocks: U64,
    pub inode_count: U64,
    pub inode_bitmap_start: U64,
    pub inode_bitmap_blocks: U64,
    pub data_bitmap_start: U64,
    pub data_bitmap_blocks: U64,
    pub inode_table_start: U64,
    pub inode_table_blocks: U64,
    pub data_region_start: U64,
    pub data_region_blocks: U64,
    pub root_inode: U64,
    pub mtime_epoch: U64,
    pub flags: U32,
    pub checksum: U32,
}

const _: () = assert!(size_of::<VsfsSuperblock>() == VSFS_SUPERBLOCK_SIZE);

impl VsfsSuperblock {
    /// Builds a superblock describing `meta`. The checksum is left at zero.
    pub fn from_meta(meta: &VsfsMeta, mtime_epoch: u64) -> Self {
        Self {
            magic: U32::new(VSFS_MAGIC),
            version: U32::new(VSFS_VERSION),
            block_size: U32::new(VSFS_BLOCK_SIZE as u32),
            total_blocks: U64::new(meta.total_blocks),
            inode_count: U64::new(meta.inode_count),
            inode_bitmap_start: U64::new(meta.inode_bitmap_start),
            inode_bitmap_blocks: U64::new(VSFS_BITMAP_BLOCKS),
            data_bitmap_start: U64::new(meta.data_bitmap_start),
            data_bitmap_blocks: U64::new(VSFS_BITMAP_BLOCKS),
            inode_table_start: U64::new(meta.inode_table_start),
            inode_table_blocks: U64::new(meta.inode_table_blocks),
            data_region_start: U64::new(meta.data_region_start),
            data_region_blocks: U64::new(meta.data_region_blocks),
            root_inode: U64::new(VSFS_ROOT_INODE as u64),
            mtime_epoch: U64::new(mtime_epoch),
            flags: U32::new(0),
            checksum: U32::new(0),
        }
    }

    pub fn to_bytes(&self) -> [u8; VSFS_SUPERBLOCK_SIZE] {
        let mut out = [0u8; VSFS_SUPERBLOCK_SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> FsParsingResult<Self> {
        let raw = bytes
            .get(..VSFS_SUPERBLOCK_SIZE)
            .ok_or(FsParsingError::Corrupted("superblock truncated"))?;
        Self::read_from_bytes(raw).map_err(|_| FsParsingError::Corrupted("superblock truncated"))
    }

    /// CRC-32 of the zero-padded block with the checksum field zeroed.
    pub fn compute_checksum(&self) -> u32 {
        let mut raw = self.to_bytes();
        raw[VSFS_SUPERBLOCK_CHECKSUM_OFFSET..].fill(0);
        crc32_of_block(&raw, VSFS_BLOCK_SIZE, VSFS_SUPERBLOCK_CRC_SPAN)
    }

    pub fn finalize_checksum(&mut self) {
        self.checksum.set(self.compute_checksum());
    }

    pub fn verify_checksum(&self) -> FsParsingResult {
        let stored = self.checksum.get();
        let computed = self.compute_checksum();
        if stored != computed {
            return Err(FsParsingError::BadChecksum { stored, computed });
        }
        Ok(())
    }

    pub fn flags(&self) -> Option<VsfsFlags> {
        VsfsFlags::from_bits(self.flags.get())
    }
}
