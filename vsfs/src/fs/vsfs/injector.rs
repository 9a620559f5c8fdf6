// SPDX-License-Identifier: MIT

use vsfsio::{VsfsIO, VsfsIOStructExt, prelude::JournaledIO};

pub use crate::core::injector::*;

use crate::core::utils::{path_utils::base_name, time_utils::now_unix};
use crate::fs::vsfs::{allocator::*, constant::*, meta::*, types::*};

/// Adds regular files to the root directory of an existing image.
///
/// Every insertion runs through a [`JournaledIO`]: if any step fails after
/// the first write, the journal is replayed and the image is left
/// byte-identical to its state before the call.
pub struct VsfsInjector<'a, IO: VsfsIO + ?Sized> {
    io: &'a mut IO,
    sb: VsfsSuperblock,
    meta: VsfsMeta,
    allocator: VsfsAllocator,
    timestamp: Option<u64>,
}

impl<'a, IO: VsfsIO + ?Sized> VsfsInjector<'a, IO> {
    /// Validates the superblock and loads both bitmaps.
    pub fn open(io: &'a mut IO) -> FsInjectorResult<Self> {
        let (sb, meta) = VsfsMeta::load(&mut *io)?;
        let allocator = VsfsAllocator::load(&mut *io, &meta)?;
        Ok(Self {
            io,
            sb,
            meta,
            allocator,
            timestamp: None,
        })
    }

    /// Pins the timestamps written by subsequent insertions.
    pub fn with_timestamp(mut self, epoch: u64) -> Self {
        self.timestamp = Some(epoch);
        self
    }

    pub fn meta(&self) -> &VsfsMeta {
        &self.meta
    }

    pub fn superblock(&self) -> &VsfsSuperblock {
        &self.sb
    }

    pub fn allocator(&self) -> &VsfsAllocator {
        &self.allocator
    }

    /// Creates regular file `name` (final path component, truncated to 58
    /// bytes) holding `content`. Returns the new inode number.
    pub fn insert_file(&mut self, name: &str, content: &[u8]) -> FsInjectorResult<u32> {
        let size = content.len() as u64;
        if size > VSFS_MAX_FILE_SIZE {
            return Err(FsInjectorError::FileTooLarge(size));
        }
        let name = base_name(name);
        if name.is_empty() {
            return Err(FsInjectorError::Invalid("Empty file name"));
        }

        let now = self.timestamp.unwrap_or_else(now_unix);
        let mut allocator = self.allocator.clone();
        let mut sb = self.sb;

        let mut journal = JournaledIO::new(&mut *self.io);
        let mut tx = Insertion {
            io: &mut journal,
            meta: &self.meta,
            allocator: &mut allocator,
            sb: &mut sb,
            now,
        };

        match tx.run(name, content) {
            Ok(inode) => {
                journal.commit()?;
                self.allocator = allocator;
                self.sb = sb;
                Ok(inode)
            }
            Err(e) => {
                journal.rollback()?;
                Err(e)
            }
        }
    }
}

impl<'a, IO: VsfsIO + ?Sized> FsInjector for VsfsInjector<'a, IO> {
    fn write_file(&mut self, name: &str, content: &[u8]) -> FsInjectorResult<u32> {
        self.insert_file(name, content)
    }

    fn flush(&mut self) -> FsInjectorResult {
        self.io.flush()?;
        Ok(())
    }
}

/// Working state of one insertion. Writes go to the journal only.
struct Insertion<'j, J: VsfsIO + ?Sized> {
    io: &'j mut J,
    meta: &'j VsfsMeta,
    allocator: &'j mut VsfsAllocator,
    sb: &'j mut VsfsSuperblock,
    now: u64,
}

impl<'j, J: VsfsIO + ?Sized> Insertion<'j, J> {
    fn run(&mut self, name: &str, content: &[u8]) -> FsInjectorResult<u32> {
        let (mut root, root_block) = self.read_root()?;

        let need = content.len().div_ceil(VSFS_BLOCK_SIZE).max(1);
        let handle = self.allocator.allocate_chain(need)?;

        let mut inode = VsfsInode::file(content.len() as u64, &handle.blocks, self.now);
        inode.finalize_checksum();

        self.allocator.flush(&mut *self.io)?;
        self.copy_content(&handle.blocks, content)?;
        self.io
            .write_struct(self.meta.inode_offset(handle.inode), &inode)?;

        self.add_dir_entry(root_block, VsfsDirEntry::file(handle.inode, name))?;

        root.links.set(root.links.get() + 1);
        root.size_bytes
            .set(root.size_bytes.get() + VSFS_DIRENT_SIZE as u64);
        root.finalize_checksum();
        self.io
            .write_struct(self.meta.inode_offset(VSFS_ROOT_INODE), &root)?;

        self.sb.mtime_epoch.set(self.now);
        self.sb.finalize_checksum();
        self.io.write_struct(0, &*self.sb)?;

        Ok(handle.inode)
    }

    /// Reads the root inode and the relative block of its directory.
    fn read_root(&mut self) -> FsInjectorResult<(VsfsInode, u32)> {
        let root: VsfsInode = self
            .io
            .read_struct(self.meta.inode_offset(VSFS_ROOT_INODE))?;
        root.verify_checksum()?;
        if !root.is_dir() {
            return Err(FsInjectorError::Invalid("Root inode is not a directory"));
        }

        let block = root.direct[0].get();
        if !self.meta.is_valid_unit(block) {
            return Err(FsInjectorError::Invalid("Root data block invalid"));
        }
        Ok((root, block))
    }

    /// Writes `content` block by block, zero-padding the last one.
    fn copy_content(&mut self, blocks: &[u32], content: &[u8]) -> FsInjectorResult {
        let mut buf = [0u8; VSFS_BLOCK_SIZE];
        for (i, &block) in blocks.iter().enumerate() {
            let start = (i * VSFS_BLOCK_SIZE).min(content.len());
            let end = (start + VSFS_BLOCK_SIZE).min(content.len());
            let chunk = &content[start..end];
            buf[..chunk.len()].copy_from_slice(chunk);
            buf[chunk.len()..].fill(0);
            self.io.write_at(self.meta.data_block_offset(block), &buf)?;
        }
        Ok(())
    }

    /// Places `entry` in the first free slot of the root directory block.
    fn add_dir_entry(&mut self, root_block: u32, entry: VsfsDirEntry) -> FsInjectorResult {
        let offset = self.meta.data_block_offset(root_block);
        let mut buf = [0u8; VSFS_BLOCK_SIZE];
        self.io.read_at(offset, &mut buf)?;

        let (slot, _) = dir_entries(&buf)
            .find(|(_, e)| e.is_free())
            .ok_or(FsInjectorError::DirectoryFull)?;

        self.io
            .write_struct(offset + (slot * VSFS_DIRENT_SIZE) as u64, &entry)?;
        Ok(())
    }
}
