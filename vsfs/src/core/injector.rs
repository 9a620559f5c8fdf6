// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsInjectorError, FsInjectorResult};

/// Places host content into an existing filesystem image.
///
/// Contract:
/// - `write_file` either fully succeeds, or leaves the image exactly as it
///   was before the call (allocation bits, records and data blocks included).
/// - Nothing is persisted by the injector itself; the caller owns the target
///   and decides when to write it out.
pub trait FsInjector {
    /// Create a regular file named `name` in the root directory.
    ///
    /// Returns the inode number assigned to the new file.
    fn write_file(&mut self, name: &str, content: &[u8]) -> FsInjectorResult<u32>;

    /// Flush the underlying target.
    fn flush(&mut self) -> FsInjectorResult {
        Ok(())
    }
}
