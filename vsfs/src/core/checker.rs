// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsCheckerError, FsCheckerResult};

/// Trait for verifying the integrity of a filesystem image.
///
/// Implementations perform internal consistency checks (superblock, inodes,
/// directory entries, allocation bitmaps).
pub trait FsChecker {
    /// Runs all available checks on the filesystem.
    ///
    /// Returns `Ok(())` if all checks pass, or an error detailing the first failure encountered.
    fn check_all(&mut self) -> FsCheckerResult;

    /// Only checks the structures needed to locate everything else.
    fn fast_check(&mut self) -> FsCheckerResult {
        self.check_all()
    }
}
