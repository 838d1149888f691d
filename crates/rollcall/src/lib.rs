//! Facade crate for `Rollcall` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `rollcall` with the `server` feature.
//! - Call `rollcall::init` to build the feature slices; extend as new slices appear.

use rollcall_database::Database;
pub use rollcall_domain as domain;
use rollcall_domain::config::ApiConfig;
pub use rollcall_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use rollcall_kernel::server::system_router;
        pub use rollcall_registration::router as registration_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use rollcall_registration as registration;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "registration",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices against the configured database.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Registration
    slices.push(features::registration::init(config, database)?);

    Ok(slices)
}
