//! Core types for the rpzgen RPZ zone builder.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - **Types**: source descriptors, format tags, policy actions, output lanes
//! - **Errors**: workspace-wide error handling with [`RpzError`]

mod error;
pub mod types;

pub use error::{Result, RpzError};
pub use types::*;
