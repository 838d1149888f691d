//! Kernel utilities shared across slices.
//! Keep this crate lightweight: layered config loading, the shared-secret check
//! and, behind the `server` feature, the axum state, health route and response envelope.
//!
//! ## Config loading
//! ```rust,no_run
//! use rollcall_kernel::config::load_config;
//! use rollcall_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(None).unwrap_or_default();
//! ```
pub mod config;
pub mod prelude;
pub mod security;
#[cfg(feature = "server")]
pub mod server;

pub use rollcall_domain as domain;
