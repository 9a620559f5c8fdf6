// SPDX-License-Identifier: MIT

//! Glue between host files and in-memory MiniVSFS images.

use anyhow::{Context, bail};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use vsfs::vsfs::*;

/// Builds a freshly formatted image in memory.
pub fn build_image(size_kib: u64, inodes: u64, timestamp: Option<u64>) -> FsResult<(VsfsMeta, Vec<u8>)> {
    let meta = VsfsMeta::new(size_kib, inodes)?;
    let mut buf = vec![0u8; meta.image_len() as usize];
    {
        let mut io = MemVsfsIO::new(&mut buf);
        let mut formatter = VsfsFormatter::new(&mut io, &meta);
        if let Some(t) = timestamp {
            formatter = formatter.with_timestamp(t);
        }
        formatter.format(true)?;
    }
    Ok((meta, buf))
}

/// Inserts `content` as `name` into the root of `image`. Returns the new inode.
///
/// On error `image` is unchanged.
pub fn add_file(image: &mut [u8], name: &str, content: &[u8]) -> FsResult<u32> {
    if image.len() < VSFS_BLOCK_SIZE {
        return Err(FsParsingError::Corrupted("Input image too small").into());
    }
    let mut io = MemVsfsIO::new(image);
    let mut injector = VsfsInjector::open(&mut io)?;
    Ok(injector.write_file(name, content)?)
}

/// Name stored in the image for host file `path`: its final component,
/// as the host platform splits it.
pub fn host_file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Reads an existing image.
pub fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read image '{}'", path.display()))
}

/// Reads a host file to embed. Only regular files are accepted.
pub fn read_host_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    let meta = fs::metadata(path)
        .with_context(|| format!("cannot stat host file '{}'", path.display()))?;
    if !meta.is_file() {
        bail!("host file '{}' is not a regular file", path.display());
    }
    if meta.len() > VSFS_MAX_FILE_SIZE {
        return Err(FsError::Injector(FsInjectorError::FileTooLarge(meta.len())).into());
    }
    fs::read(path).with_context(|| format!("cannot read host file '{}'", path.display()))
}

/// Writes `bytes` to `path` atomically.
///
/// The data goes to a temporary file in the destination directory and is
/// renamed over `path` only once fully written and synced.
pub fn persist(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temporary file in '{}'", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("cannot write image '{}'", path.display()))?;
    Ok(())
}
