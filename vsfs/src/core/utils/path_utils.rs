// SPDX-License-Identifier: MIT

//! Path utilities for naming injected files.
//!
//! Only the final `/`-separated component of a name is stored in the image.
//! A `\` is an ordinary name byte.

/// Returns the final component of `path`.
///
/// Trailing separators are ignored. Returns an empty string for `""` or `"/"`.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Encodes `name` into a fixed, zero-padded byte field.
///
/// The name is truncated to `N` bytes. No terminator is reserved, so a
/// name of exactly `N` bytes fills the field.
pub fn encode_name<const N: usize>(name: &str) -> [u8; N] {
    let mut out = [0u8; N];
    let bytes = name.as_bytes();
    let len = bytes.len().min(N);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

/// Decodes a zero-padded name field, stopping at the first NUL.
pub fn decode_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
