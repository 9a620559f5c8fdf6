// SPDX-License-Identifier: MIT

pub mod config;
pub mod image;
pub mod utils;
