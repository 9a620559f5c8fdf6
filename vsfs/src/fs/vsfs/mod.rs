// SPDX-License-Identifier: MIT

pub mod allocator;
pub mod checker;
pub mod constant;
pub mod formatter;
pub mod injector;
pub mod meta;
pub mod types;

// === Public Interface ===
pub mod traits {
    pub use super::allocator::{VsfsAllocator, VsfsHandle};
    pub use super::checker::VsfsChecker;
    pub use super::formatter::VsfsFormatter;
    pub use super::injector::VsfsInjector;
    pub use super::meta::{VsfsMeta, VsfsRegion};
}

pub mod prelude {
    pub use super::constant::*;
    pub use super::traits::*;
    pub use super::types::*;
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use vsfsio::prelude::*;
}
