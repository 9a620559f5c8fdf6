// SPDX-License-Identifier: MIT

use vsfsio::{VsfsIO, VsfsIOStructExt};

pub use crate::core::checker::*;

use crate::core::utils::bitmap::BitmapOps;
use crate::fs::vsfs::{allocator::*, constant::*, meta::*, types::*};

/// Read-only consistency checker.
///
/// Stops at the first inconsistency found.
pub struct VsfsChecker<'a, IO: VsfsIO + ?Sized> {
    io: &'a mut IO,
}

/// Everything the later phases need from the superblock phase.
struct Scan {
    meta: VsfsMeta,
    alloc: VsfsAllocator,
    seen_inodes: Vec<u8>,
    seen_blocks: Vec<u8>,
}

impl<'a, IO: VsfsIO + ?Sized> VsfsChecker<'a, IO> {
    pub fn new(io: &'a mut IO) -> Self {
        Self { io }
    }

    fn check_superblock(&mut self) -> FsCheckerResult<VsfsMeta> {
        let (sb, meta) = VsfsMeta::load(&mut *self.io)?;

        if sb.flags().is_none() {
            return Err(FsCheckerError::Invalid("Unknown superblock flags"));
        }

        let mut block = [0u8; VSFS_BLOCK_SIZE];
        self.io.read_at(0, &mut block)?;
        if block[VSFS_SUPERBLOCK_SIZE..].iter().any(|&b| b != 0) {
            return Err(FsCheckerError::Invalid("Superblock padding is not zero"));
        }

        Ok(meta)
    }

    fn check_bitmap_tails(scan: &Scan) -> FsCheckerResult {
        let ibm = scan.alloc.inode_bitmap();
        if ibm.count_ones_in_range(scan.meta.inode_count as usize, VSFS_BITS_PER_BITMAP) != 0 {
            return Err(FsCheckerError::Invalid("Inode bitmap has bits past inode_count"));
        }
        let dbm = scan.alloc.data_bitmap();
        if dbm.count_ones_in_range(scan.meta.data_region_blocks as usize, VSFS_BITS_PER_BITMAP) != 0 {
            return Err(FsCheckerError::Invalid("Data bitmap has bits past the data region"));
        }
        Ok(())
    }

    /// Validates every inode slot and records the blocks live inodes use.
    fn check_inodes(&mut self, scan: &mut Scan) -> FsCheckerResult {
        for inode_no in 1..=scan.meta.inode_count as u32 {
            let inode: VsfsInode = self.io.read_struct(scan.meta.inode_offset(inode_no))?;

            if !scan.alloc.is_inode_allocated(inode_no) {
                if inode != VsfsInode::default() {
                    return Err(FsCheckerError::Invalid("Free inode slot is not empty"));
                }
                continue;
            }

            inode.verify_checksum()?;
            if !inode.is_file() && !inode.is_dir() {
                return Err(FsCheckerError::Invalid("Inode mode is neither file nor directory"));
            }
            if inode.links.get() == 0 {
                return Err(FsCheckerError::Invalid("Allocated inode has no links"));
            }
            if inode.size_bytes.get() > VSFS_MAX_FILE_SIZE {
                return Err(FsCheckerError::Invalid("Inode size exceeds direct capacity"));
            }
            if inode.reserved_0.get() != 0
                || inode.reserved_1.get() != 0
                || inode.reserved_2.get() != 0
                || inode.proj_id.get() != 0
                || inode.uid16_gid16.get() != 0
                || inode.xattr_ptr.get() != 0
            {
                return Err(FsCheckerError::Invalid("Inode reserved fields are not zero"));
            }
            if inode.direct[inode.block_count()..]
                .iter()
                .any(|p| p.get() != 0)
            {
                return Err(FsCheckerError::Invalid("Unused direct pointer is not zero"));
            }

            for block in inode.blocks() {
                if !scan.meta.is_valid_unit(block) {
                    return Err(FsCheckerError::Invalid("Direct pointer outside data region"));
                }
                if !scan.alloc.is_block_allocated(block) {
                    return Err(FsCheckerError::Invalid("Direct pointer to a free block"));
                }
                if scan.seen_blocks.get_bit(block as usize) {
                    return Err(FsCheckerError::Invalid("Data block referenced twice"));
                }
                scan.seen_blocks.set_bit(block as usize, true);
            }
        }
        Ok(())
    }

    /// Validates the root inode and its directory block, and records the
    /// inodes reachable from it.
    fn check_root(&mut self, scan: &mut Scan) -> FsCheckerResult {
        if !scan.alloc.is_inode_allocated(VSFS_ROOT_INODE) {
            return Err(FsCheckerError::Invalid("Root inode is not allocated"));
        }
        let root: VsfsInode = self
            .io
            .read_struct(scan.meta.inode_offset(VSFS_ROOT_INODE))?;
        if !root.is_dir() {
            return Err(FsCheckerError::Invalid("Root inode is not a directory"));
        }
        let root_block = root.direct[0].get();
        if !scan.meta.is_valid_unit(root_block) {
            return Err(FsCheckerError::Invalid("Root data block invalid"));
        }
        scan.seen_inodes.set_bit(0, true);

        let mut buf = [0u8; VSFS_BLOCK_SIZE];
        self.io
            .read_at(scan.meta.data_block_offset(root_block), &mut buf)?;

        let mut live = 0u64;
        for (slot, entry) in dir_entries(&buf) {
            if entry.is_free() {
                continue;
            }
            entry.verify_checksum()?;
            live += 1;

            let inode_no = entry.inode_no.get();
            if slot < 2 {
                let expected = if slot == 0 { VSFS_DOT } else { VSFS_DOTDOT };
                if inode_no != VSFS_ROOT_INODE
                    || entry.entry_type != VSFS_DT_DIR
                    || entry.name_lossy() != expected
                {
                    return Err(FsCheckerError::Invalid("Root must start with \".\" and \"..\""));
                }
                continue;
            }

            if inode_no as u64 > scan.meta.inode_count || !scan.alloc.is_inode_allocated(inode_no) {
                return Err(FsCheckerError::Invalid("Directory entry points to a free inode"));
            }
            if entry.entry_type != VSFS_DT_FILE {
                return Err(FsCheckerError::Invalid("Unexpected entry type in root"));
            }
            let bit = inode_no as usize - 1;
            if scan.seen_inodes.get_bit(bit) {
                return Err(FsCheckerError::Invalid("Inode linked twice from root"));
            }
            scan.seen_inodes.set_bit(bit, true);

            let child: VsfsInode = self.io.read_struct(scan.meta.inode_offset(inode_no))?;
            if !child.is_file() {
                return Err(FsCheckerError::Invalid("Entry type does not match inode mode"));
            }
        }

        if live < 2 {
            return Err(FsCheckerError::Invalid("Root must start with \".\" and \"..\""));
        }
        if root.links.get() as u64 != live {
            return Err(FsCheckerError::Invalid("Root link count does not match entries"));
        }
        if root.size_bytes.get() != live * VSFS_DIRENT_SIZE as u64 {
            return Err(FsCheckerError::Invalid("Root size does not match entries"));
        }
        Ok(())
    }

    /// Allocated bits must be exactly the referenced inodes and blocks.
    fn check_bitmaps(scan: &Scan) -> FsCheckerResult {
        if scan.seen_inodes.as_slice() != scan.alloc.inode_bitmap() {
            return Err(FsCheckerError::Invalid("Inode bitmap does not match referenced inodes"));
        }
        if scan.seen_blocks.as_slice() != scan.alloc.data_bitmap() {
            return Err(FsCheckerError::Invalid("Data bitmap does not match referenced blocks"));
        }
        Ok(())
    }
}

impl<'a, IO: VsfsIO + ?Sized> FsChecker for VsfsChecker<'a, IO> {
    fn check_all(&mut self) -> FsCheckerResult {
        let meta = self.check_superblock()?;
        let alloc = VsfsAllocator::load(&mut *self.io, &meta)?;
        let mut scan = Scan {
            meta,
            alloc,
            seen_inodes: vec![0u8; VSFS_BLOCK_SIZE],
            seen_blocks: vec![0u8; VSFS_BLOCK_SIZE],
        };

        Self::check_bitmap_tails(&scan)?;
        self.check_inodes(&mut scan)?;
        self.check_root(&mut scan)?;
        Self::check_bitmaps(&scan)
    }

    fn fast_check(&mut self) -> FsCheckerResult {
        self.check_superblock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::FsParsingError;
    use crate::fs::vsfs::{formatter::*, injector::*};
    use vsfsio::prelude::*;

    fn image_with_file() -> (VsfsMeta, Vec<u8>) {
        let meta = VsfsMeta::new(180, 128).unwrap();
        let mut buf = vec![0u8; meta.image_len() as usize];
        let mut io = MemVsfsIO::new(&mut buf);
        VsfsFormatter::new(&mut io, &meta).format(true).unwrap();
        VsfsInjector::open(&mut io)
            .unwrap()
            .insert_file("a.txt", &[3u8; 9000])
            .unwrap();
        (meta, buf)
    }

    fn check(buf: &mut [u8]) -> FsCheckerResult {
        let mut io = MemVsfsIO::new(buf);
        VsfsChecker::new(&mut io).check_all()
    }

    #[test]
    fn test_valid_image_passes() {
        let (_, mut buf) = image_with_file();
        assert_eq!(check(&mut buf), Ok(()));
        let mut io = MemVsfsIO::new(&mut buf);
        assert_eq!(VsfsChecker::new(&mut io).fast_check(), Ok(()));
    }

    #[test]
    fn test_leaked_data_bit_detected() {
        let (_, mut buf) = image_with_file();
        buf[8192] |= 0b1000_0000;
        assert_eq!(
            check(&mut buf),
            Err(FsCheckerError::Invalid("Data bitmap does not match referenced blocks"))
        );
    }

    #[test]
    fn test_orphan_inode_detected() {
        let (meta, mut buf) = image_with_file();
        // Drop the directory entry but keep the inode allocated
        let off = meta.data_block_offset(0) as usize + 2 * VSFS_DIRENT_SIZE;
        buf[off..off + VSFS_DIRENT_SIZE].fill(0);
        assert!(check(&mut buf).is_err());
    }

    #[test]
    fn test_bad_dirent_checksum_detected() {
        let (meta, mut buf) = image_with_file();
        let off = meta.data_block_offset(0) as usize + 2 * VSFS_DIRENT_SIZE;
        buf[off + 63] ^= 0xFF;
        assert!(matches!(
            check(&mut buf),
            Err(FsCheckerError::Parsing(FsParsingError::BadChecksum { .. }))
        ));
    }

    #[test]
    fn test_unknown_flags_detected() {
        let (_, mut buf) = image_with_file();
        let mut sb = VsfsSuperblock::from_bytes(&buf).unwrap();
        sb.flags.set(0x8000_0000);
        sb.finalize_checksum();
        buf[..VSFS_SUPERBLOCK_SIZE].copy_from_slice(&sb.to_bytes());

        let mut io = MemVsfsIO::new(&mut buf);
        assert_eq!(
            VsfsChecker::new(&mut io).fast_check(),
            Err(FsCheckerError::Invalid("Unknown superblock flags"))
        );
    }
}
