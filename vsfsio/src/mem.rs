// SPDX-License-Identifier: MIT

use crate::{VsfsIO, VsfsIOError, VsfsIOResult};

/// In-memory implementation of `VsfsIO`.
///
/// The whole image lives in a caller-owned buffer; nothing is persisted
/// until the caller hands the buffer to a host writer.
#[derive(Debug)]
pub struct MemVsfsIO<'a> {
    buffer: &'a mut [u8],
}

impl<'a> MemVsfsIO<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer }
    }

    /// Length of the backing buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    fn range(&self, offset: u64, len: usize) -> VsfsIOResult<core::ops::Range<usize>> {
        let end = offset
            .checked_add(len as u64)
            .ok_or(VsfsIOError::OutOfBounds)?;
        if end > self.buffer.len() as u64 {
            return Err(VsfsIOError::OutOfBounds);
        }
        Ok(offset as usize..end as usize)
    }
}

impl<'a> VsfsIO for MemVsfsIO<'a> {
    #[inline(always)]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsfsIOResult {
        let range = self.range(offset, data.len())?;
        self.buffer[range].copy_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsfsIOResult {
        let range = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> VsfsIOResult {
        Ok(())
    }
}
