// SPDX-License-Identifier: MIT

pub use crate::core::allocator::*;

use vsfsio::{VsfsIO, errors::VsfsIOResult};

use crate::core::utils::bitmap::BitmapOps;
use crate::fs::vsfs::{constant::*, meta::VsfsMeta};

/// One inode plus the relative data blocks reserved for it, in allocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsfsHandle {
    pub inode: u32,
    pub blocks: Vec<u32>,
}

impl FsHandle for VsfsHandle {}

/// First-fit allocator over the inode and data bitmaps.
///
/// Both bitmaps are held in memory; nothing reaches the image until [`flush`](Self::flush).
/// Bit `i` of the inode bitmap stands for inode `i + 1`, bit `i` of the data
/// bitmap for relative data block `i`.
#[derive(Debug, Clone)]
pub struct VsfsAllocator {
    inode_bitmap: Vec<u8>,
    data_bitmap: Vec<u8>,
    inode_count: usize,
    data_blocks: usize,
    inode_bitmap_offset: u64,
    data_bitmap_offset: u64,
}

impl VsfsAllocator {
    /// Allocator over empty bitmaps.
    pub fn new(meta: &VsfsMeta) -> Self {
        Self {
            inode_bitmap: vec![0u8; VSFS_BLOCK_SIZE],
            data_bitmap: vec![0u8; VSFS_BLOCK_SIZE],
            inode_count: meta.inode_count as usize,
            data_blocks: meta.data_region_blocks as usize,
            inode_bitmap_offset: meta.inode_bitmap_offset(),
            data_bitmap_offset: meta.data_bitmap_offset(),
        }
    }

    /// Reads both bitmap blocks from `io`.
    pub fn load<IO: VsfsIO + ?Sized>(io: &mut IO, meta: &VsfsMeta) -> VsfsIOResult<Self> {
        let mut alloc = Self::new(meta);
        io.read_at(alloc.inode_bitmap_offset, &mut alloc.inode_bitmap)?;
        io.read_at(alloc.data_bitmap_offset, &mut alloc.data_bitmap)?;
        Ok(alloc)
    }

    /// Writes both bitmap blocks back to `io`.
    pub fn flush<IO: VsfsIO + ?Sized>(&self, io: &mut IO) -> VsfsIOResult {
        io.write_at(self.inode_bitmap_offset, &self.inode_bitmap)?;
        io.write_at(self.data_bitmap_offset, &self.data_bitmap)?;
        Ok(())
    }

    pub fn inode_bitmap(&self) -> &[u8] {
        &self.inode_bitmap
    }

    pub fn data_bitmap(&self) -> &[u8] {
        &self.data_bitmap
    }

    #[inline]
    pub fn is_inode_allocated(&self, inode_no: u32) -> bool {
        inode_no >= 1 && self.inode_bitmap.get_bit(inode_no as usize - 1)
    }

    #[inline]
    pub fn is_block_allocated(&self, block: u32) -> bool {
        self.data_bitmap.get_bit(block as usize)
    }

    pub fn used_inodes(&self) -> usize {
        self.inode_bitmap.count_ones_in_range(0, self.inode_count)
    }

    pub fn free_inodes(&self) -> usize {
        self.inode_count - self.used_inodes()
    }
}

impl FsAllocator<VsfsHandle> for VsfsAllocator {
    /// Reserves the lowest free inode and the `count` lowest free data blocks.
    fn allocate_chain(&mut self, count: usize) -> FsAllocatorResult<VsfsHandle> {
        let inode_bit = self
            .inode_bitmap
            .find_first_zero_below(self.inode_count)
            .ok_or(FsAllocatorError::OutOfInodes)?;

        let blocks = self
            .data_bitmap
            .find_zeros_below(self.data_blocks, count)
            .ok_or_else(|| FsAllocatorError::OutOfBlocks {
                needed: count,
                free: self.remaining_units(),
            })?;

        self.inode_bitmap.set_bit(inode_bit, true);
        for &block in &blocks {
            self.data_bitmap.set_bit(block, true);
        }

        Ok(VsfsHandle {
            inode: inode_bit as u32 + 1,
            blocks: blocks.into_iter().map(|b| b as u32).collect(),
        })
    }

    fn release(&mut self, handle: &VsfsHandle) {
        if handle.inode >= 1 {
            self.inode_bitmap.set_bit(handle.inode as usize - 1, false);
        }
        for &block in &handle.blocks {
            self.data_bitmap.set_bit(block as usize, false);
        }
    }

    fn used_units(&self) -> usize {
        self.data_bitmap.count_ones_in_range(0, self.data_blocks)
    }

    fn remaining_units(&self) -> usize {
        self.data_blocks - self.used_units()
    }
}
