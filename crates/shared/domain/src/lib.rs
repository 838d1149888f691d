//! # Domain Types
//!
//! Plain data shared across the workspace with a single dependency (`serde`).
//! No I/O, networking or heavy logic here.

pub mod config;
pub mod constants;
pub mod registry;
