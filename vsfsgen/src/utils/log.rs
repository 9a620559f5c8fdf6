// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicU8, Ordering};

#[doc(hidden)]
pub use colored::Colorize as __Colorize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LogLevel {
    Quiet = 0,
    Normal = 1,
    Verbose = 2,
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Normal as u8);

pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn log_level() -> LogLevel {
    match LOG_LEVEL.load(Ordering::Relaxed) {
        0 => LogLevel::Quiet,
        2 => LogLevel::Verbose,
        _ => LogLevel::Normal,
    }
}

/// Level from the `--quiet` / `--verbose` pair. Quiet wins.
pub fn level_from_flags(quiet: bool, verbose: bool) -> LogLevel {
    match (quiet, verbose) {
        (true, _) => LogLevel::Quiet,
        (false, true) => LogLevel::Verbose,
        _ => LogLevel::Normal,
    }
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if $crate::utils::log_level() != $crate::utils::LogLevel::Quiet {
            println!("[vsfs] {}", format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($($arg:tt)*) => {
        if $crate::utils::log_level() == $crate::utils::LogLevel::Verbose {
            println!("[vsfs] {}", format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use $crate::utils::log::__Colorize as _;
        eprintln!("{} {}", "[vsfs] error:".red().bold(), format_args!($($arg)*));
    }};
}
