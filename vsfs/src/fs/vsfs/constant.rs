// SPDX-License-Identifier: MIT

// === Identity ===

pub const VSFS_MAGIC: u32 = 0x4D56_5346; // "MVSF"
pub const VSFS_VERSION: u32 = 1;

// === Geometry ===

pub const VSFS_BLOCK_SIZE: usize = 4096;
pub const VSFS_BITS_PER_BITMAP: usize = VSFS_BLOCK_SIZE * 8;

pub const VSFS_SUPERBLOCK_BLOCK: u64 = 0;
pub const VSFS_INODE_BITMAP_START: u64 = 1;
pub const VSFS_DATA_BITMAP_START: u64 = 2;
pub const VSFS_INODE_TABLE_START: u64 = 3;
pub const VSFS_BITMAP_BLOCKS: u64 = 1;

// === Superblock ===

pub const VSFS_SUPERBLOCK_SIZE: usize = 116;
pub const VSFS_SUPERBLOCK_CHECKSUM_OFFSET: usize = 112;
/// Bytes of the (zero-padded) superblock block covered by its CRC.
pub const VSFS_SUPERBLOCK_CRC_SPAN: usize = VSFS_BLOCK_SIZE - 4;

// === Inodes ===

pub const VSFS_INODE_SIZE: usize = 128;
pub const VSFS_INODE_CRC_SPAN: usize = 120;
pub const VSFS_INODES_PER_BLOCK: usize = VSFS_BLOCK_SIZE / VSFS_INODE_SIZE;
pub const VSFS_DIRECT_POINTERS: usize = 12;
pub const VSFS_MAX_FILE_SIZE: u64 = (VSFS_DIRECT_POINTERS * VSFS_BLOCK_SIZE) as u64;

pub const VSFS_ROOT_INODE: u32 = 1;

pub const VSFS_MODE_FILE: u16 = 0x8000;
pub const VSFS_MODE_DIR: u16 = 0x4000;

// === Directory entries ===

pub const VSFS_DIRENT_SIZE: usize = 64;
pub const VSFS_DIRENTS_PER_BLOCK: usize = VSFS_BLOCK_SIZE / VSFS_DIRENT_SIZE;
pub const VSFS_NAME_LEN: usize = 58;

pub const VSFS_DT_FILE: u8 = 1;
pub const VSFS_DT_DIR: u8 = 2;

pub const VSFS_DOT: &str = ".";
pub const VSFS_DOTDOT: &str = "..";

// === Build limits ===

pub const VSFS_MIN_SIZE_KIB: u64 = 180;
pub const VSFS_MAX_SIZE_KIB: u64 = 4096;
pub const VSFS_SIZE_ALIGN_KIB: u64 = 4;
pub const VSFS_MIN_INODES: u64 = 128;
pub const VSFS_MAX_INODES: u64 = 512;
pub const VSFS_MIN_TOTAL_BLOCKS: u64 = 8;
