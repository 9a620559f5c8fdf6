// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod errors;

// Backend modules
#[cfg(feature = "alloc")]
mod journal;

#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod std;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::VsfsIO;
    pub use super::VsfsIOExt;
    pub use super::VsfsIOStructExt;
    pub use super::errors::*;

    #[cfg(feature = "alloc")]
    pub use super::journal::JournaledIO;

    #[cfg(feature = "mem")]
    pub use super::mem::MemVsfsIO;

    #[cfg(feature = "std")]
    pub use super::std::StdVsfsIO;
}

// Internal use
use errors::*;

// Constants

/// Size of the stack scratch buffer used by chunked helpers.
/// Matches the image block size.
pub const BLOCK_BUF_SIZE: usize = 4096;

// Traits

/// Image IO abstraction trait.
///
/// Allows read/write/flush at absolute byte offsets.
/// Implementations may target RAM, files, or wrap another `VsfsIO`.
pub trait VsfsIO {
    /// Writes `data` at `offset` (absolute).
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsfsIOResult;

    /// Reads `buf.len()` bytes into `buf` from `offset` (absolute).
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsfsIOResult;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> VsfsIOResult;
}

/// Extension helpers for VsfsIO.
pub trait VsfsIOExt: VsfsIO {
    /// Fills a region with zeroes.
    #[inline(always)]
    fn zero_fill(&mut self, offset: u64, len: usize) -> VsfsIOResult {
        const ZERO_BUF: [u8; BLOCK_BUF_SIZE] = [0u8; BLOCK_BUF_SIZE];
        let mut remaining = len;
        let mut off = offset;
        while remaining > 0 {
            let chunk = remaining.min(ZERO_BUF.len());
            self.write_at(off, &ZERO_BUF[..chunk])?;
            off += chunk as u64;
            remaining -= chunk;
        }
        Ok(())
    }
}

impl<T: VsfsIO + ?Sized> VsfsIOExt for T {}

/// Typed record access for `zerocopy` structs.
pub trait VsfsIOStructExt: VsfsIO {
    /// Reads a struct of type `T` from the given offset.
    fn read_struct<T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
    ) -> VsfsIOResult<T> {
        let size = core::mem::size_of::<T>();
        if size > BLOCK_BUF_SIZE {
            return Err(VsfsIOError::Other("read_struct: type too large"));
        }
        let mut buf = [0u8; BLOCK_BUF_SIZE];
        self.read_at(offset, &mut buf[..size])?;
        T::read_from_bytes(&buf[..size]).map_err(|_| VsfsIOError::Other("read_struct failed"))
    }

    /// Writes a struct of type `T` at the given offset.
    fn write_struct<T: zerocopy::IntoBytes + zerocopy::Immutable>(
        &mut self,
        offset: u64,
        val: &T,
    ) -> VsfsIOResult {
        self.write_at(offset, val.as_bytes())
    }
}

impl<T: VsfsIO + ?Sized> VsfsIOStructExt for T {}
