// SPDX-License-Identifier: MIT

pub use crate::core::meta::*;

use vsfsio::{VsfsIO, VsfsIOStructExt};

use crate::core::errors::{FsLayoutError, FsLayoutResult, FsParsingError, FsParsingResult};
use crate::fs::vsfs::{constant::*, types::VsfsSuperblock};

/// Named block range of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VsfsRegion {
    pub name: &'static str,
    pub start: u64,
    pub blocks: u64,
}

impl VsfsRegion {
    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.blocks
    }
}

/// Image geometry, in blocks.
///
/// Built either from build parameters ([`VsfsMeta::new`]) or from the values
/// recorded in an existing superblock ([`VsfsMeta::from_superblock`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsfsMeta {
    pub total_blocks: u64,
    pub inode_count: u64,
    pub inode_bitmap_start: u64,
    pub data_bitmap_start: u64,
    pub inode_table_start: u64,
    pub inode_table_blocks: u64,
    pub data_region_start: u64,
    pub data_region_blocks: u64,
}

impl VsfsMeta {
    /// Validates build parameters and computes the layout.
    ///
    /// `size_kib` must lie in 180..=4096 and be a multiple of 4, `inode_count` in 128..=512.
    pub fn new(size_kib: u64, inode_count: u64) -> FsLayoutResult<Self> {
        if !(VSFS_MIN_SIZE_KIB..=VSFS_MAX_SIZE_KIB).contains(&size_kib) {
            return Err(FsLayoutError::SizeOutOfRange(size_kib));
        }
        if size_kib % VSFS_SIZE_ALIGN_KIB != 0 {
            return Err(FsLayoutError::SizeNotAligned(size_kib));
        }
        if !(VSFS_MIN_INODES..=VSFS_MAX_INODES).contains(&inode_count) {
            return Err(FsLayoutError::InodesOutOfRange(inode_count));
        }

        let total_blocks = size_kib * 1024 / VSFS_BLOCK_SIZE as u64;
        Self::compute(total_blocks, inode_count)
    }

    /// Lays out `total_blocks` blocks: superblock, inode bitmap, data bitmap,
    /// inode table, then the data region up to the end.
    pub fn compute(total_blocks: u64, inode_count: u64) -> FsLayoutResult<Self> {
        if total_blocks < VSFS_MIN_TOTAL_BLOCKS {
            return Err(FsLayoutError::TooSmall(total_blocks));
        }
        if inode_count == 0 || inode_count > VSFS_BITS_PER_BITMAP as u64 {
            return Err(FsLayoutError::Invalid("Inode count exceeds bitmap capacity"));
        }

        let inode_table_blocks =
            (inode_count * VSFS_INODE_SIZE as u64).div_ceil(VSFS_BLOCK_SIZE as u64);
        let data_region_start = VSFS_INODE_TABLE_START + inode_table_blocks;
        if data_region_start >= total_blocks {
            return Err(FsLayoutError::NoDataRegion);
        }

        let data_region_blocks = total_blocks - data_region_start;
        if data_region_blocks > VSFS_BITS_PER_BITMAP as u64 {
            return Err(FsLayoutError::Invalid("Data region exceeds bitmap capacity"));
        }

        Ok(Self {
            total_blocks,
            inode_count,
            inode_bitmap_start: VSFS_INODE_BITMAP_START,
            data_bitmap_start: VSFS_DATA_BITMAP_START,
            inode_table_start: VSFS_INODE_TABLE_START,
            inode_table_blocks,
            data_region_start,
            data_region_blocks,
        })
    }

    /// Takes the geometry recorded in `sb` as-is, rejecting values that would
    /// address past `image_len` bytes or past a bitmap.
    pub fn from_superblock(sb: &VsfsSuperblock, image_len: u64) -> FsParsingResult<Self> {
        if sb.block_size.get() as usize != VSFS_BLOCK_SIZE {
            return Err(FsParsingError::Unsupported("Unsupported block size"));
        }
        if sb.inode_bitmap_blocks.get() != VSFS_BITMAP_BLOCKS
            || sb.data_bitmap_blocks.get() != VSFS_BITMAP_BLOCKS
        {
            return Err(FsParsingError::Unsupported("Multi-block bitmaps are not supported"));
        }
        if sb.root_inode.get() != VSFS_ROOT_INODE as u64 {
            return Err(FsParsingError::Unsupported("Root inode must be 1"));
        }

        let meta = Self {
            total_blocks: sb.total_blocks.get(),
            inode_count: sb.inode_count.get(),
            inode_bitmap_start: sb.inode_bitmap_start.get(),
            data_bitmap_start: sb.data_bitmap_start.get(),
            inode_table_start: sb.inode_table_start.get(),
            inode_table_blocks: sb.inode_table_blocks.get(),
            data_region_start: sb.data_region_start.get(),
            data_region_blocks: sb.data_region_blocks.get(),
        };

        let bs = VSFS_BLOCK_SIZE as u64;
        let image_blocks = image_len / bs;
        if meta.total_blocks > image_blocks {
            return Err(FsParsingError::Corrupted("Superblock geometry exceeds image size"));
        }
        if meta
            .regions()
            .iter()
            .any(|r| r.start.checked_add(r.blocks).is_none_or(|end| end > meta.total_blocks))
        {
            return Err(FsParsingError::Corrupted("Region lies outside the image"));
        }
        if meta.inode_count == 0
            || meta.inode_count > VSFS_BITS_PER_BITMAP as u64
            || meta.inode_count > meta.inode_table_blocks.saturating_mul(VSFS_INODES_PER_BLOCK as u64)
        {
            return Err(FsParsingError::Corrupted("Inode count does not fit the inode table"));
        }
        if meta.data_region_blocks == 0 || meta.data_region_blocks > VSFS_BITS_PER_BITMAP as u64 {
            return Err(FsParsingError::Corrupted("Data region size out of range"));
        }

        Ok(meta)
    }

    /// Reads and validates the superblock of an existing image.
    ///
    /// Checks, in order: magic, checksum, version, then the recorded geometry.
    /// The last block the geometry claims must be readable from `io`.
    pub fn load<IO: VsfsIO + ?Sized>(io: &mut IO) -> FsParsingResult<(VsfsSuperblock, Self)> {
        let sb: VsfsSuperblock = io.read_struct(0)?;

        if sb.magic.get() != VSFS_MAGIC {
            return Err(FsParsingError::BadMagic(sb.magic.get()));
        }
        sb.verify_checksum()?;
        if sb.version.get() != VSFS_VERSION {
            return Err(FsParsingError::Unsupported("Unsupported version"));
        }

        let claimed = sb
            .total_blocks
            .get()
            .checked_mul(VSFS_BLOCK_SIZE as u64)
            .ok_or(FsParsingError::Corrupted("Superblock geometry exceeds image size"))?;
        if claimed == 0 {
            return Err(FsParsingError::Corrupted("Empty image"));
        }
        let mut last_byte = [0u8; 1];
        io.read_at(claimed - 1, &mut last_byte)
            .map_err(|_| FsParsingError::Corrupted("Superblock geometry exceeds image size"))?;

        let meta = Self::from_superblock(&sb, claimed)?;
        Ok((sb, meta))
    }

    /// The five regions of the image, in on-disk order.
    pub fn regions(&self) -> [VsfsRegion; 5] {
        [
            VsfsRegion {
                name: "superblock",
                start: VSFS_SUPERBLOCK_BLOCK,
                blocks: 1,
            },
            VsfsRegion {
                name: "inode bitmap",
                start: self.inode_bitmap_start,
                blocks: VSFS_BITMAP_BLOCKS,
            },
            VsfsRegion {
                name: "data bitmap",
                start: self.data_bitmap_start,
                blocks: VSFS_BITMAP_BLOCKS,
            },
            VsfsRegion {
                name: "inode table",
                start: self.inode_table_start,
                blocks: self.inode_table_blocks,
            },
            VsfsRegion {
                name: "data region",
                start: self.data_region_start,
                blocks: self.data_region_blocks,
            },
        ]
    }

    #[inline]
    pub fn block_offset(&self, block: u64) -> u64 {
        block * VSFS_BLOCK_SIZE as u64
    }

    #[inline]
    pub fn inode_bitmap_offset(&self) -> u64 {
        self.block_offset(self.inode_bitmap_start)
    }

    #[inline]
    pub fn data_bitmap_offset(&self) -> u64 {
        self.block_offset(self.data_bitmap_start)
    }

    /// Byte offset of inode `inode_no` (1-based) in the inode table.
    #[inline]
    pub fn inode_offset(&self, inode_no: u32) -> u64 {
        debug_assert!(inode_no >= 1);
        self.block_offset(self.inode_table_start)
            + (inode_no as u64 - 1) * VSFS_INODE_SIZE as u64
    }

    /// Byte offset of relative data block `block`.
    #[inline]
    pub fn data_block_offset(&self, block: u32) -> u64 {
        self.block_offset(self.data_region_start + block as u64)
    }

    #[inline]
    pub fn image_len(&self) -> u64 {
        self.block_offset(self.total_blocks)
    }

    /// Image size rounded down to KiB, as given at build time.
    #[inline]
    pub fn size_kib(&self) -> u64 {
        self.image_len() / 1024
    }
}

impl FsMeta<u32> for VsfsMeta {
    fn unit_size(&self) -> usize {
        VSFS_BLOCK_SIZE
    }

    fn unit_offset(&self, unit: u32) -> u64 {
        self.data_block_offset(unit)
    }

    fn first_data_unit(&self) -> u32 {
        0
    }

    fn last_data_unit(&self) -> u32 {
        (self.data_region_blocks - 1) as u32
    }
}
