// SPDX-License-Identifier: MIT

use core::fmt;

pub use vsfsio::errors::*;

/// Coarse classification used by front-ends to report failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    /// Out-of-range or missing parameters.
    Configuration,
    /// The input image is not a valid MiniVSFS image.
    Format,
    /// A fixed-capacity structure is exhausted.
    Capacity,
    /// Host or image IO failed.
    Io,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsLayoutError {
    SizeOutOfRange(u64),
    SizeNotAligned(u64),
    InodesOutOfRange(u64),
    TooSmall(u64),
    NoDataRegion,
    Invalid(&'static str),
}

impl FsLayoutError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsLayoutError::SizeOutOfRange(_) => "Image size must be within 180..4096 KiB",
            FsLayoutError::SizeNotAligned(_) => "Image size must be a multiple of 4 KiB",
            FsLayoutError::InodesOutOfRange(_) => "Inode count must be within 128..512",
            FsLayoutError::TooSmall(_) => "Image too small",
            FsLayoutError::NoDataRegion => {
                "Not enough space for data region (increase size or reduce inodes)"
            }
            FsLayoutError::Invalid(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        None
    }

    fn fmt_detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsLayoutError::SizeOutOfRange(v) | FsLayoutError::SizeNotAligned(v) => {
                write!(f, " (got {v} KiB)")
            }
            FsLayoutError::InodesOutOfRange(v) => write!(f, " (got {v})"),
            FsLayoutError::TooSmall(blocks) => write!(f, " ({blocks} blocks)"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsParsingError {
    IO(VsfsIOError),
    BadMagic(u32),
    BadChecksum { stored: u32, computed: u32 },
    Unsupported(&'static str),
    Corrupted(&'static str),
    Other(&'static str),
}

impl FsParsingError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsParsingError::IO(_) => "IO error",
            FsParsingError::BadMagic(_) => "Bad magic",
            FsParsingError::BadChecksum { .. } => "Checksum mismatch",
            FsParsingError::Unsupported(msg) => msg,
            FsParsingError::Corrupted(msg) => msg,
            FsParsingError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsParsingError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }

    fn fmt_detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsParsingError::BadMagic(magic) => write!(f, " (0x{magic:08X})"),
            FsParsingError::BadChecksum { stored, computed } => {
                write!(f, " (stored 0x{stored:08X}, computed 0x{computed:08X})")
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAllocatorError {
    OutOfInodes,
    OutOfBlocks { needed: usize, free: usize },
    Other(&'static str),
}

impl FsAllocatorError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsAllocatorError::OutOfInodes => "No free inode",
            FsAllocatorError::OutOfBlocks { .. } => "Not enough free data blocks",
            FsAllocatorError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        None
    }

    fn fmt_detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsAllocatorError::OutOfBlocks { needed, free } => {
                write!(f, " (needed {needed}, free {free})")
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFormatterError {
    IO(VsfsIOError),
    Layout(FsLayoutError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsFormatterError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsFormatterError::IO(_) => "IO error",
            FsFormatterError::Layout(_) => "Invalid layout",
            FsFormatterError::Invalid(msg) => msg,
            FsFormatterError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsFormatterError::IO(e) => Some(FsError::IO(*e)),
            FsFormatterError::Layout(e) => Some(FsError::Layout(*e)),
            _ => None,
        }
    }

    fn fmt_detail(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsInjectorError {
    IO(VsfsIOError),
    Parsing(FsParsingError),
    Allocator(FsAllocatorError),
    FileTooLarge(u64),
    DirectoryFull,
    Invalid(&'static str),
    Other(&'static str),
}

impl FsInjectorError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsInjectorError::IO(_) => "IO error",
            FsInjectorError::Parsing(_) => "Invalid image",
            FsInjectorError::Allocator(_) => "Allocator error",
            FsInjectorError::FileTooLarge(_) => "File too large for 12 direct blocks",
            FsInjectorError::DirectoryFull => "No free directory entry in root",
            FsInjectorError::Invalid(msg) => msg,
            FsInjectorError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsInjectorError::IO(e) => Some(FsError::IO(*e)),
            FsInjectorError::Parsing(e) => Some(FsError::Parsing(*e)),
            FsInjectorError::Allocator(e) => Some(FsError::Allocator(*e)),
            _ => None,
        }
    }

    fn fmt_detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsInjectorError::FileTooLarge(size) => write!(f, " ({size} bytes)"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCheckerError {
    IO(VsfsIOError),
    Parsing(FsParsingError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsCheckerError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsCheckerError::IO(_) => "IO error",
            FsCheckerError::Parsing(_) => "Parsing error",
            FsCheckerError::Invalid(msg) => msg,
            FsCheckerError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsCheckerError::IO(e) => Some(FsError::IO(*e)),
            FsCheckerError::Parsing(e) => Some(FsError::Parsing(*e)),
            _ => None,
        }
    }

    fn fmt_detail(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

/// Top-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    IO(VsfsIOError),
    Layout(FsLayoutError),
    Parsing(FsParsingError),
    Allocator(FsAllocatorError),
    Formatter(FsFormatterError),
    Injector(FsInjectorError),
    Checker(FsCheckerError),
    Other(&'static str),
}

impl FsError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsError::IO(e) => e.msg(),
            FsError::Layout(e) => e.msg(),
            FsError::Parsing(e) => e.msg(),
            FsError::Allocator(e) => e.msg(),
            FsError::Formatter(e) => e.msg(),
            FsError::Injector(e) => e.msg(),
            FsError::Checker(e) => e.msg(),
            FsError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsError::Parsing(e) => e.source(),
            FsError::Formatter(e) => e.source(),
            FsError::Injector(e) => e.source(),
            FsError::Checker(e) => e.source(),
            FsError::IO(_) => None,
            FsError::Layout(_) => None,
            FsError::Allocator(_) => None,
            FsError::Other(_) => None,
        }
    }

    fn fmt_detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::IO(VsfsIOError::Host(kind)) => write!(f, " ({kind})"),
            FsError::IO(_) => Ok(()),
            FsError::Layout(e) => e.fmt_detail(f),
            FsError::Parsing(e) => e.fmt_detail(f),
            FsError::Allocator(e) => e.fmt_detail(f),
            FsError::Formatter(e) => e.fmt_detail(f),
            FsError::Injector(e) => e.fmt_detail(f),
            FsError::Checker(e) => e.fmt_detail(f),
            FsError::Other(_) => Ok(()),
        }
    }

    /// Classifies the innermost cause of this error.
    pub fn kind(&self) -> FsErrorKind {
        match self {
            FsError::IO(_) => FsErrorKind::Io,
            FsError::Layout(_) => FsErrorKind::Configuration,
            FsError::Parsing(FsParsingError::IO(_)) => FsErrorKind::Io,
            FsError::Parsing(_) => FsErrorKind::Format,
            FsError::Allocator(_) => FsErrorKind::Capacity,
            FsError::Formatter(FsFormatterError::IO(_)) => FsErrorKind::Io,
            FsError::Formatter(FsFormatterError::Layout(_)) => FsErrorKind::Configuration,
            FsError::Formatter(_) => FsErrorKind::Other,
            FsError::Injector(e) => match e {
                FsInjectorError::IO(_) => FsErrorKind::Io,
                FsInjectorError::Parsing(p) => FsError::Parsing(*p).kind(),
                FsInjectorError::Allocator(_)
                | FsInjectorError::FileTooLarge(_)
                | FsInjectorError::DirectoryFull => FsErrorKind::Capacity,
                FsInjectorError::Invalid(_) => FsErrorKind::Format,
                FsInjectorError::Other(_) => FsErrorKind::Other,
            },
            FsError::Checker(FsCheckerError::IO(_)) => FsErrorKind::Io,
            FsError::Checker(_) => FsErrorKind::Format,
            FsError::Other(_) => FsErrorKind::Other,
        }
    }
}

// === Display + std::error::Error ===

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        self.fmt_detail(f)?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            src.fmt_detail(f)?;
            current = src.source();
        }
        Ok(())
    }
}

impl std::error::Error for FsError {}

crate::__impl_error_display!(
    FsLayoutError,
    FsParsingError,
    FsAllocatorError,
    FsFormatterError,
    FsInjectorError,
    FsCheckerError,
);

// === type Fs*Result ===

pub type FsResult<T = ()> = Result<T, FsError>;
pub type FsLayoutResult<T = ()> = Result<T, FsLayoutError>;
pub type FsParsingResult<T = ()> = Result<T, FsParsingError>;
pub type FsAllocatorResult<T = ()> = Result<T, FsAllocatorError>;
pub type FsFormatterResult<T = ()> = Result<T, FsFormatterError>;
pub type FsInjectorResult<T = ()> = Result<T, FsInjectorError>;
pub type FsCheckerResult<T = ()> = Result<T, FsCheckerError>;

crate::fs_error_wiring! {
    top => FsError {
        VsfsIOError      : IO,
        FsLayoutError    : Layout,
        FsParsingError   : Parsing,
        FsAllocatorError : Allocator,
        FsFormatterError : Formatter,
        FsInjectorError  : Injector,
        FsCheckerError   : Checker,
    },
    str_into => [
        FsParsingError,
        FsAllocatorError,
        FsFormatterError,
        FsInjectorError,
        FsCheckerError,
    ],
    sub => {
        VsfsIOError      => [ FsParsingError::IO, FsFormatterError::IO, FsInjectorError::IO, FsCheckerError::IO ],
        FsLayoutError    => [ FsFormatterError::Layout ],
        FsParsingError   => [ FsInjectorError::Parsing, FsCheckerError::Parsing ],
        FsAllocatorError => [ FsInjectorError::Allocator ],
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_display() {
        let low = FsAllocatorError::OutOfBlocks { needed: 3, free: 1 };
        let inj = FsInjectorError::from(low);
        let top = FsError::Injector(inj);

        let text = top.to_string();
        assert!(text.starts_with("Allocator error"));
        assert!(text.contains("caused by: Not enough free data blocks (needed 3, free 1)"));
    }

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            FsError::from(FsLayoutError::NoDataRegion).kind(),
            FsErrorKind::Configuration
        );
        assert_eq!(
            FsError::Injector(FsInjectorError::Parsing(FsParsingError::BadMagic(0))).kind(),
            FsErrorKind::Format
        );
        assert_eq!(
            FsError::Injector(FsInjectorError::DirectoryFull).kind(),
            FsErrorKind::Capacity
        );
        assert_eq!(
            FsError::Injector(FsInjectorError::FileTooLarge(49153)).kind(),
            FsErrorKind::Capacity
        );
        assert_eq!(
            FsError::Formatter(FsFormatterError::IO(VsfsIOError::OutOfBounds)).kind(),
            FsErrorKind::Io
        );
    }

    #[test]
    fn test_layout_error_detail() {
        let err = FsLayoutError::SizeOutOfRange(100);
        assert_eq!(
            err.to_string(),
            "Image size must be within 180..4096 KiB (got 100 KiB)"
        );
    }
}
