// SPDX-License-Identifier: MIT

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use crate::core::traits::*;

// Utilities
pub use crate::core::utils::{path_utils::*, time_utils::*};

/// MiniVSFS image format.
///
/// See [`vsfs::VsfsMeta`], [`vsfs::VsfsFormatter`], [`vsfs::VsfsInjector`] and [`vsfs::VsfsChecker`].
pub mod vsfs {
    pub use super::fs::vsfs::prelude::*;
}
