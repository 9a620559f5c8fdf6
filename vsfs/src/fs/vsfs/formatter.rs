// SPDX-License-Identifier: MIT

use vsfsio::{VsfsIO, VsfsIOExt, VsfsIOStructExt};

pub use crate::core::formatter::*;

use crate::core::utils::time_utils::now_unix;
use crate::fs::vsfs::{allocator::*, constant::*, meta::*, types::*};

/// Writes a fresh, empty image: superblock, bitmaps with the root reserved,
/// the root inode, and a root directory block holding "." and "..".
///
/// A quick format only zeroes the metadata blocks and the root directory
/// block. A full format also zeroes the rest of the data region.
pub struct VsfsFormatter<'a, IO: VsfsIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a VsfsMeta,
    timestamp: Option<u64>,
}

impl<'a, IO: VsfsIO + ?Sized> VsfsFormatter<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a VsfsMeta) -> Self {
        Self {
            io,
            meta,
            timestamp: None,
        }
    }

    /// Pins every timestamp written by the formatter (reproducible images).
    pub fn with_timestamp(mut self, epoch: u64) -> Self {
        self.timestamp = Some(epoch);
        self
    }

    fn zero_metadata(&mut self) -> FsFormatterResult {
        let len = self.meta.block_offset(self.meta.data_region_start);
        self.io.zero_fill(0, len as usize)?;
        Ok(())
    }

    fn write_superblock(&mut self, now: u64) -> FsFormatterResult {
        let mut sb = VsfsSuperblock::from_meta(self.meta, now);
        sb.finalize_checksum();
        self.io
            .write_struct(self.meta.block_offset(VSFS_SUPERBLOCK_BLOCK), &sb)?;
        Ok(())
    }

    /// Reserves inode 1 and relative block 0 in fresh bitmaps.
    fn write_bitmaps(&mut self) -> FsFormatterResult<VsfsHandle> {
        let mut alloc = VsfsAllocator::new(self.meta);
        let root = alloc
            .allocate_unit()
            .map_err(|_| FsFormatterError::Invalid("Cannot reserve root inode"))?;
        if root.inode != VSFS_ROOT_INODE {
            return Err(FsFormatterError::Invalid("Root inode must be 1"));
        }
        alloc.flush(&mut *self.io)?;
        Ok(root)
    }

    fn write_root(&mut self, root: &VsfsHandle, now: u64) -> FsFormatterResult {
        let block = root.blocks[0];

        let mut inode = VsfsInode::root_dir(block, now);
        inode.finalize_checksum();
        self.io
            .write_struct(self.meta.inode_offset(root.inode), &inode)?;

        let mut buf = [0u8; VSFS_BLOCK_SIZE];
        buf[..VSFS_DIRENT_SIZE].copy_from_slice(&VsfsDirEntry::dot(root.inode).to_bytes());
        buf[VSFS_DIRENT_SIZE..2 * VSFS_DIRENT_SIZE]
            .copy_from_slice(&VsfsDirEntry::dotdot(root.inode).to_bytes());
        self.io.write_at(self.meta.data_block_offset(block), &buf)?;
        Ok(())
    }
}

impl<'a, IO: VsfsIO + ?Sized> FsFormatter for VsfsFormatter<'a, IO> {
    fn format(&mut self, full_format: bool) -> FsFormatterResult {
        let now = self.timestamp.unwrap_or_else(now_unix);

        self.zero_metadata()?;
        if full_format {
            zero_data_region(&mut *self.io, self.meta)?;
        }

        self.write_superblock(now)?;
        let root = self.write_bitmaps()?;
        self.write_root(&root, now)?;

        self.flush()
    }

    fn flush(&mut self) -> FsFormatterResult {
        self.io.flush()?;
        Ok(())
    }
}
