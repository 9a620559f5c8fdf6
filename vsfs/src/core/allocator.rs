// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsAllocatorError, FsAllocatorResult};

/// Trait implemented by all FS allocation handles.
///
/// Example: an inode number plus the data blocks reserved for it.
pub trait FsHandle {}

/// Trait for managing allocation of logical units in a filesystem.
///
/// - `Handle` is a handle representing an allocated unit (e.g., an inode and its blocks)
pub trait FsAllocator<Handle: FsHandle + Sized + Clone> {
    /// Allocate `count` units and return a handle covering them.
    ///
    /// On error no unit is reserved.
    fn allocate_chain(&mut self, count: usize) -> FsAllocatorResult<Handle>;

    /// Allocate a single unit and return its handle.
    fn allocate_unit(&mut self) -> FsAllocatorResult<Handle> {
        self.allocate_chain(1)
    }

    /// Give back everything reserved by `handle`.
    fn release(&mut self, handle: &Handle);

    /// Number of units currently used.
    fn used_units(&self) -> usize;

    /// Number of remaining units.
    fn remaining_units(&self) -> usize;
}
