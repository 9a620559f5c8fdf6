// SPDX-License-Identifier: MIT

use std::io::{Read, Seek, SeekFrom, Write};

use crate::{VsfsIO, VsfsIOResult};

/// `VsfsIO` over any seekable host stream (files, cursors).
#[derive(Debug)]
pub struct StdVsfsIO<'a, T: Read + Write + Seek> {
    io: &'a mut T,
}

impl<'a, T: Read + Write + Seek> StdVsfsIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self { io }
    }
}

impl<'a, T: Read + Write + Seek> VsfsIO for StdVsfsIO<'a, T> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsfsIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsfsIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> VsfsIOResult {
        self.io.flush()?;
        Ok(())
    }
}
