// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for image IO operations.
pub type VsfsIOResult<T = ()> = core::result::Result<T, VsfsIOError>;

/// Error type for image IO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsfsIOError {
    Other(&'static str),
    OutOfBounds,
    Unsupported,
    /// Error reported by the host (`std::io`).
    #[cfg(feature = "std")]
    Host(std::io::ErrorKind),
}

impl VsfsIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            VsfsIOError::Other(msg) => msg,
            VsfsIOError::OutOfBounds => "Out of bounds",
            VsfsIOError::Unsupported => "Unsupported operation",
            #[cfg(feature = "std")]
            VsfsIOError::Host(_) => "Host IO error",
        }
    }
}

impl From<&'static str> for VsfsIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        VsfsIOError::Other(msg)
    }
}

impl fmt::Display for VsfsIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        #[cfg(feature = "std")]
        if let VsfsIOError::Host(kind) = self {
            write!(f, " ({kind})")?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VsfsIOError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for VsfsIOError {
    #[cold]
    #[inline(never)]
    fn from(e: std::io::Error) -> Self {
        VsfsIOError::Host(e.kind())
    }
}
