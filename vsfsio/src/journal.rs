// SPDX-License-Identifier: MIT

use alloc::vec;
use alloc::vec::Vec;

use crate::{VsfsIO, VsfsIOResult};

/// Bytes overwritten by one `write_at`, kept for rollback.
#[derive(Debug)]
struct UndoRecord {
    offset: u64,
    before: Vec<u8>,
}

/// Write-ahead undo journal over another `VsfsIO`.
///
/// Every `write_at` first captures the bytes it is about to replace.
/// `rollback()` restores them newest-first, which leaves the wrapped target
/// byte-identical to its state when the journal was opened. `commit()`
/// keeps the writes and drops the records.
#[derive(Debug)]
pub struct JournaledIO<'a, IO: VsfsIO + ?Sized> {
    io: &'a mut IO,
    records: Vec<UndoRecord>,
}

impl<'a, IO: VsfsIO + ?Sized> JournaledIO<'a, IO> {
    pub fn new(io: &'a mut IO) -> Self {
        Self {
            io,
            records: Vec::new(),
        }
    }

    /// Number of writes recorded since the journal was opened.
    pub fn pending(&self) -> usize {
        self.records.len()
    }

    /// Keep all writes.
    pub fn commit(mut self) -> VsfsIOResult {
        self.records.clear();
        self.io.flush()
    }

    /// Undo all writes, newest first.
    pub fn rollback(mut self) -> VsfsIOResult {
        while let Some(record) = self.records.pop() {
            self.io.write_at(record.offset, &record.before)?;
        }
        Ok(())
    }
}

impl<'a, IO: VsfsIO + ?Sized> VsfsIO for JournaledIO<'a, IO> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsfsIOResult {
        let mut before = vec![0u8; data.len()];
        self.io.read_at(offset, &mut before)?;
        // Recorded before writing: a failed write may still have landed partially.
        self.records.push(UndoRecord { offset, before });
        self.io.write_at(offset, data)
    }

    #[inline]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsfsIOResult {
        self.io.read_at(offset, buf)
    }

    /// Flushing is deferred to `commit()`.
    #[inline]
    fn flush(&mut self) -> VsfsIOResult {
        Ok(())
    }
}
