// SPDX-License-Identifier: MIT

//! Time utilities for filesystem timestamps.
//!
//! All on-disk timestamps are whole seconds since the UNIX epoch.

use time::OffsetDateTime;

/// Returns the current UTC time.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Returns the current time as seconds since the UNIX epoch.
///
/// Clocks set before 1970 yield 0.
pub fn now_unix() -> u64 {
    to_unix(now_utc())
}

/// Converts an [`OffsetDateTime`] to seconds since the UNIX epoch, clamped at 0.
pub fn to_unix(t: OffsetDateTime) -> u64 {
    u64::try_from(t.unix_timestamp()).unwrap_or(0)
}
