// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsFormatterError, FsFormatterResult};

use crate::core::meta::FsMeta;
use vsfsio::{VsfsIO, VsfsIOExt};

/// A Formatter for a filesystem type.
///
/// Implementations encapsulate all required state (I/O backend, metadata)
/// and lay down a fresh, empty filesystem on the target.
///
/// The formatter must perform a *full format* if `full_format` is `true`
/// (every byte of the image is rewritten), or a quick format otherwise
/// (only metadata regions are written).
pub trait FsFormatter {
    /// Format the filesystem.
    #[must_use = "format result must be checked for errors"]
    fn format(&mut self, full_format: bool) -> FsFormatterResult;

    /// Flush any buffered writes.
    #[must_use = "flush result must be checked for errors"]
    fn flush(&mut self) -> FsFormatterResult<()> {
        Ok(())
    }
}

/// Helper to zero out the data region of a filesystem.
pub fn zero_data_region<M: FsMeta<u32>, IO: VsfsIO + ?Sized>(
    io: &mut IO,
    meta: &M,
) -> FsFormatterResult {
    let first = meta.first_data_unit();
    let last = meta.last_data_unit();
    if first > last {
        return Ok(());
    }

    let start = meta.unit_offset(first);
    let end = meta.unit_offset(last) + meta.unit_size() as u64;
    let len = end.saturating_sub(start) as usize;

    io.zero_fill(start, len)?;
    Ok(())
}
