//! Names shared between crates.

/// OpenAPI tag for health and other system routes.
pub const SYSTEM_TAG: &str = "System";
/// OpenAPI tag for the registration form routes.
pub const REGISTRATION_TAG: &str = "Registration";

/// Prefix for environment overrides, e.g. `ROLLCALL__SERVER__PORT`.
pub const ENV_PREFIX: &str = "ROLLCALL";
/// Separator between nested keys in environment overrides.
pub const ENV_SEPARATOR: &str = "__";
/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "server.toml";
